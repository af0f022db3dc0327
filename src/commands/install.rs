use anyhow::Result;
use raven::{operations, ArtifactSource, Settings};

pub fn run(mods: Vec<String>) -> Result<()> {
    let settings = Settings::load()?;
    // Fail before any network traffic when setup hasn't run
    settings.game_dir()?;

    let (client, repo) = super::open_repository(&settings)?;
    let fetcher = super::fetcher(client)?;

    let report = operations::install(&settings, &repo, &fetcher, &mods)?;

    for err in &report.unresolved {
        eprintln!("✗ {}", err);
    }
    if let Some(missing) = &report.missing {
        eprintln!("⚠ {}", missing);
    }
    if report.outcomes.is_empty() {
        println!("Nothing to install.");
        return Ok(());
    }

    println!();
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(installed) => {
                match &installed.source {
                    ArtifactSource::Cache => {
                        println!("✓ Installed {} from cache", outcome.name)
                    }
                    ArtifactSource::Download(url) => {
                        println!("✓ Installed {} from {}", outcome.name, url)
                    }
                }
                super::print_warnings(&installed.warnings);
            }
            Err(e) => eprintln!("✗ {}: {}", outcome.name, e),
        }
    }

    println!();
    let installed = report.installed_count();
    let failed = report.failed_count();
    println!(
        "Installed {} mod{}{}",
        installed,
        if installed == 1 { "" } else { "s" },
        if failed > 0 {
            format!(", {} failed", failed)
        } else {
            String::new()
        }
    );

    Ok(())
}
