//! Mod manifest repository
//!
//! The repository is a single zip archive (a GitHub branch snapshot) holding
//! one TOML manifest per mod under `<root>/mods/` and one per base component
//! under `<root>/base/`. It is downloaded once per invocation and kept in
//! memory; manifests are only decoded when looked up, so one malformed record
//! never breaks the listing or other lookups.
//!
//! # Examples
//!
//! ```no_run
//! use raven::{Repository, Settings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Settings::default().network.client()?;
//! let repo = Repository::fetch(&client)?;
//!
//! for name in repo.mod_names() {
//!     let m = repo.get_mod(&name)?;
//!     println!("{} - {}", m.name, m.description);
//! }
//! # Ok(())
//! # }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use tracing::{debug, warn};
use zip::ZipArchive;

/// Where the manifest archive is downloaded from
pub const MODLINKS_URL: &str = "https://github.com/dd-modding/modlinks/archive/refs/heads/main.zip";

/// A mod or base component as described by its manifest record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mod {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Description", default)]
    pub description: String,

    /// Source repository URL (informational)
    #[serde(rename = "Repository", default)]
    pub repository: String,

    #[serde(rename = "Dependencies", default)]
    pub dependencies: Vec<String>,

    /// Mods this one integrates with (informational, never resolved)
    #[serde(rename = "Integrations", default)]
    pub integrations: Vec<String>,

    /// Download URL of the artifact
    #[serde(rename = "Link")]
    pub link: String,

    /// Hex-encoded SHA-256 of the artifact
    #[serde(rename = "SHA256")]
    pub sha256: String,
}

impl Mod {
    /// Last path segment of [`Mod::link`], ignoring any query or fragment
    pub fn link_file_name(&self) -> String {
        match url::Url::parse(&self.link) {
            Ok(url) => url
                .path_segments()
                .and_then(|segments| segments.last())
                .unwrap_or_default()
                .to_string(),
            Err(_) => self
                .link
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Extension of the link's file name including the dot (`".zip"`), or `""`
    pub fn link_extension(&self) -> String {
        let file_name = self.link_file_name();
        match file_name.rfind('.') {
            Some(i) => file_name[i..].to_string(),
            None => String::new(),
        }
    }

    /// Whether the artifact is a zip archive rather than a single file
    pub fn is_zip(&self) -> bool {
        self.link_extension().eq_ignore_ascii_case(".zip")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Section {
    Mods,
    Base,
}

impl Section {
    fn from_dir(dir: &str) -> Option<Self> {
        match dir {
            "mods" => Some(Section::Mods),
            "base" => Some(Section::Base),
            _ => None,
        }
    }
}

/// Raw manifest text, or the reason the entry could not be read
type RawRecord = std::result::Result<String, String>;

/// In-memory index over one snapshot of the manifest archive
#[derive(Debug, Clone, Default)]
pub struct Repository {
    records: HashMap<(Section, String), RawRecord>,
}

impl Repository {
    /// Download the manifest archive from [`MODLINKS_URL`]
    pub fn fetch(client: &reqwest::blocking::Client) -> Result<Self> {
        Self::fetch_from(client, MODLINKS_URL)
    }

    /// Download the manifest archive from `url`
    ///
    /// Transport failures, a non-2xx status and a malformed archive all fail
    /// the whole fetch.
    pub fn fetch_from(client: &reqwest::blocking::Client, url: &str) -> Result<Self> {
        debug!("Fetching modlinks from {}", url);

        let response = client
            .get(url)
            .send()
            .map_err(|e| Error::RepositoryFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::RepositoryFetch(format!(
                "got HTTP status {}, expected 200 OK",
                status
            )));
        }

        let body = response
            .bytes()
            .map_err(|e| Error::RepositoryFetch(e.to_string()))?;

        Self::from_archive(body.to_vec())
    }

    /// Index an already-downloaded manifest archive
    pub fn from_archive(bytes: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::RepositoryFetch(format!("malformed archive: {}", e)))?;

        let mut records = HashMap::new();
        for i in 0..archive.len() {
            let mut entry = match archive.by_index(i) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable modlinks entry #{}: {}", i, e);
                    continue;
                }
            };

            let entry_name = entry.name().to_string();
            let Some((section, name)) = record_key(&entry_name) else {
                continue;
            };

            let mut text = String::new();
            let record = entry
                .read_to_string(&mut text)
                .map(|_| text)
                .map_err(|e| format!("read {}: {}", entry_name, e));
            records.insert((section, name), record);
        }

        debug!("Indexed {} manifest records", records.len());
        Ok(Self { records })
    }

    /// Names of all mods, derived from manifest file names, sorted
    pub fn mod_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .records
            .keys()
            .filter(|(section, _)| *section == Section::Mods)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn get_mod(&self, name: &str) -> Result<Mod> {
        self.get(Section::Mods, name)
    }

    /// Look up a base component (e.g. `BepInEx`) by its exact name
    pub fn get_base(&self, name: &str) -> Result<Mod> {
        self.get(Section::Base, name)
    }

    /// Resolve a typed name against the mod names, see [`crate::resolve_mod_name`]
    pub fn resolve_mod_name(&self, requested: &str) -> Result<String> {
        crate::resolve_mod_name(&self.mod_names(), requested)
    }

    fn get(&self, section: Section, name: &str) -> Result<Mod> {
        let not_found = |reason: String| Error::RecordNotFound {
            name: name.to_string(),
            reason,
        };

        let text = match self.records.get(&(section, name.to_string())) {
            Some(Ok(text)) => text,
            Some(Err(reason)) => return Err(not_found(reason.clone())),
            None => return Err(not_found("no such manifest".to_string())),
        };

        toml::from_str(text).map_err(|e| not_found(e.to_string()))
    }
}

/// Map `<root>/<section>/<name>.toml` to its section and name
fn record_key(entry_name: &str) -> Option<(Section, String)> {
    let mut parts = entry_name.split('/');
    let (_root, dir, file) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let section = Section::from_dir(dir)?;
    let name = file.strip_suffix(".toml")?;
    if name.is_empty() {
        return None;
    }
    Some((section, name.to_string()))
}
