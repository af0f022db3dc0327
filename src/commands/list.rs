use anyhow::Result;
use raven::operations::{self, ListOptions};
use raven::Settings;

pub fn run(detailed: bool, installed_only: bool, search: Option<String>) -> Result<()> {
    let settings = Settings::load()?;
    if installed_only {
        settings.game_dir()?;
    }

    let (_, repo) = super::open_repository(&settings)?;

    let options = ListOptions {
        installed_only,
        search,
    };
    let mods = operations::list(&settings, &repo, &options)?;

    if mods.is_empty() {
        if installed_only {
            println!("No mods installed.");
            println!();
            println!("Install mods with: raven install <mod>...");
        } else {
            println!("No mods found.");
        }
        return Ok(());
    }

    for listed in &mods {
        let marker = match (&listed.record, listed.installed) {
            (None, _) => " (unknown)",
            (Some(_), true) if !installed_only => " (installed)",
            _ => "",
        };
        println!("{}{}", listed.name, marker);

        if detailed {
            let m = listed.record_or_placeholder();
            println!("  Repository: {}", m.repository);
            let dependencies = if m.dependencies.is_empty() {
                "none".to_string()
            } else {
                m.dependencies.join(", ")
            };
            println!("  Dependencies: {}", dependencies);
            for line in m.description.lines() {
                println!("    {}", line);
            }
            println!();
        }
    }

    if !detailed {
        println!();
    }
    println!(
        "Total: {} mod{}",
        mods.len(),
        if mods.len() == 1 { "" } else { "s" }
    );

    Ok(())
}
