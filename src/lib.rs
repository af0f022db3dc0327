//! Raven - a mod installer for Death's Door
//!
//! Raven installs BepInEx plugins published in the community modlinks
//! repository. It provides:
//!
//! - Fuzzy mod-name resolution with deterministic tie-breaking
//! - Transitive dependency resolution that reports missing mods instead of failing
//! - A local artifact cache verified against manifest SHA-256 digests
//! - Zip extraction that cannot write outside a mod's own directory
//!
//! # Examples
//!
//! ```no_run
//! use raven::{config, operations, Fetcher, Repository, Settings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! let client = settings.network.client()?;
//! let repo = Repository::fetch(&client)?;
//! let fetcher = Fetcher::new(client, config::cache_root()?);
//!
//! let report = operations::install(&settings, &repo, &fetcher, &["rando".to_string()])?;
//! println!("Installed {} mods", report.installed_count());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`modlinks`] - Fetch and query the manifest repository
//! - [`names`] - Resolve typed mod names
//! - [`resolver`] - Dependency closure
//! - [`cache`] - Download and verify artifacts
//! - [`installer`] - Extract artifacts into the game
//! - [`operations`] - setup / install / list / yeet
//! - [`config`] - User settings
//! - [`error`] - Error types and result handling

pub mod cache;
pub mod config;
pub mod error;
pub mod installer;
pub mod modlinks;
pub mod names;
pub mod operations;
pub mod progress;
pub mod resolver;

#[cfg(test)]
mod testutil;

pub use cache::{ArtifactSource, Fetcher, ModFile};
pub use config::Settings;
pub use error::{Error, Result};
pub use modlinks::{Mod, Repository, MODLINKS_URL};
pub use names::resolve_mod_name;
pub use resolver::{transitive_closure, Closure, ModSource};
