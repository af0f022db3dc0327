use anyhow::Result;
use raven::{operations, ArtifactSource, Settings};
use std::path::PathBuf;

pub fn run(location: PathBuf) -> Result<()> {
    let current = Settings::load()?;

    // Validate before going to the network
    let game_dir = operations::check_game_at_path(&location)?;
    println!("Setting up Death's Door at {}", game_dir.display());
    println!();

    let (client, repo) = super::open_repository(&current)?;
    let fetcher = super::fetcher(client)?;

    let report = operations::setup(&current, &game_dir, &repo, &fetcher)?;
    match &report.loader_source {
        ArtifactSource::Cache => println!("  {} taken from cache", operations::LOADER_BASE_NAME),
        ArtifactSource::Download(url) => println!(
            "  {} downloaded from {}",
            operations::LOADER_BASE_NAME,
            url
        ),
    }
    super::print_warnings(&report.warnings);

    report.settings.save()?;
    println!();
    println!("✓ Setup complete");
    println!("  Game location: {}", report.settings.game_location);
    println!();
    println!("Install mods with: raven install <mod>...");

    Ok(())
}
