//! CLI subcommands
//!
//! Each module exposes a `run` function called from `main`. Commands load the
//! settings, call into [`raven::operations`] and print the report.

use anyhow::Result;
use raven::{config, Fetcher, Repository, Settings};

pub mod install;
pub mod list;
pub mod setup;
pub mod yeet;

/// Download the manifest repository using the configured network settings
fn open_repository(settings: &Settings) -> Result<(reqwest::blocking::Client, Repository)> {
    let client = settings.network.client()?;
    tracing::debug!("Fetching {}", raven::MODLINKS_URL);
    let repo = Repository::fetch(&client)?;
    Ok((client, repo))
}

/// Artifact fetcher backed by the user cache directory
fn fetcher(client: reqwest::blocking::Client) -> Result<Fetcher> {
    Ok(Fetcher::new(client, config::cache_root()?).with_progress(true))
}

/// Print the per-item warnings collected while installing
fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("  ⚠ {}", warning);
    }
}
