use anyhow::Result;
use raven::{operations, Settings};

pub fn run(mods: Vec<String>) -> Result<()> {
    let settings = Settings::load()?;
    let report = operations::yeet(&settings, &mods)?;

    for err in &report.unresolved {
        eprintln!("✗ {}", err);
    }
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(dir) => println!("✓ Yeeted {} ({})", outcome.name, dir.display()),
            Err(e) => eprintln!("✗ {}: {}", outcome.name, e),
        }
    }

    Ok(())
}
