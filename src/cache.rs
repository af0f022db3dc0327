//! Content-verified artifact cache
//!
//! Downloaded artifacts are kept at `<cache-root>/raven-installer/<mod><ext>`.
//! There is no metadata beside them: an entry is valid exactly when its
//! SHA-256 matches the digest in the mod's manifest, and that is re-checked on
//! every use. Anything else (absent, unreadable, stale, corrupted) is treated
//! as a miss and replaced by a fresh, verified download.
//!
//! # Examples
//!
//! ```no_run
//! use raven::{config, Fetcher, Repository, Settings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Settings::default().network.client()?;
//! let repo = Repository::fetch(&client)?;
//! let fetcher = Fetcher::new(client, config::cache_root()?);
//!
//! let artifact = fetcher.obtain(&repo.get_mod("Randomizer")?)?;
//! println!("{} bytes, zip: {}", artifact.size, artifact.is_zip);
//! # Ok(())
//! # }
//! ```

use crate::config::APP_DIR_NAME;
use crate::installer::check_safe_names;
use crate::progress::{DownloadProgress, UPDATE_PERIOD};
use crate::{Error, Mod, Result};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub type Sha256Digest = [u8; 32];

/// Where a [`ModFile`] came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    Cache,
    Download(String),
}

/// A verified artifact, open for reading from the start
#[derive(Debug)]
pub struct ModFile {
    pub file: File,
    pub size: u64,
    pub is_zip: bool,
    pub path: PathBuf,
    pub source: ArtifactSource,
}

/// Serves artifacts from the cache, downloading them when needed
pub struct Fetcher {
    client: reqwest::blocking::Client,
    cache_dir: PathBuf,
    show_progress: bool,
}

impl Fetcher {
    /// Cache entries go in `<cache_root>/raven-installer/`
    pub fn new(client: reqwest::blocking::Client, cache_root: impl AsRef<Path>) -> Self {
        Self {
            client,
            cache_dir: cache_root.as_ref().join(APP_DIR_NAME),
            show_progress: false,
        }
    }

    /// Draw download progress on stdout when it is a terminal
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Cache file for `m`: its name plus the extension of its link
    pub fn cache_entry(&self, m: &Mod) -> PathBuf {
        self.cache_dir
            .join(format!("{}{}", m.name, m.link_extension()))
    }

    /// Return a verified copy of the artifact for `m`
    ///
    /// A cached copy is used without touching the network if its digest
    /// matches; otherwise the link is downloaded, verified, and only then
    /// stored in the cache.
    pub fn obtain(&self, m: &Mod) -> Result<ModFile> {
        check_safe_names(m)?;
        let expected = expected_digest(m)?;
        let entry = self.cache_entry(m);

        if let Some(cached) = open_verified(&entry, &expected, m.is_zip()) {
            info!("Using cached {} from {}", m.name, entry.display());
            return Ok(cached);
        }

        self.download(m, &entry, &expected)
    }

    fn download(&self, m: &Mod, entry: &Path, expected: &Sha256Digest) -> Result<ModFile> {
        let url = m.link.as_str();
        let wrap_io = |e: io::Error| Error::io_at(format!("download {}", url), e);

        info!("Downloading {} from {}", m.name, url);
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::Download {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::DownloadStatus {
                url: url.to_string(),
                status,
            });
        }

        fs::create_dir_all(&self.cache_dir).map_err(wrap_io)?;
        let mut temp = NamedTempFile::new_in(&self.cache_dir).map_err(wrap_io)?;

        let mut progress = if self.show_progress {
            DownloadProgress::for_stdout(response.content_length())
        } else {
            DownloadProgress::new(response.content_length(), false, UPDATE_PERIOD)
        };

        let mut hasher = Sha256::new();
        let mut buffer = vec![0; 8192];
        loop {
            let bytes_read = response.read(&mut buffer).map_err(wrap_io)?;
            if bytes_read == 0 {
                break;
            }
            let chunk = &buffer[..bytes_read];
            temp.write_all(chunk).map_err(wrap_io)?;
            hasher.update(chunk);
            progress.advance(bytes_read as u64);
        }
        progress.finish();
        let size = progress.transferred();

        let actual: Sha256Digest = hasher.finalize().into();
        if &actual != expected {
            // The temp file is dropped here; an older cache entry is left alone
            return Err(Error::IntegrityMismatch {
                url: url.to_string(),
                expected: hex::encode(expected),
                actual: hex::encode(actual),
            });
        }

        let mut file = temp
            .persist(entry)
            .map_err(|e| Error::io_at(format!("cache {}", entry.display()), e.error))?;
        file.seek(SeekFrom::Start(0)).map_err(wrap_io)?;
        debug!("Cached {} ({} bytes) at {}", m.name, size, entry.display());

        Ok(ModFile {
            file,
            size,
            is_zip: m.is_zip(),
            path: entry.to_path_buf(),
            source: ArtifactSource::Download(url.to_string()),
        })
    }
}

/// Decode the manifest's hex digest
pub fn expected_digest(m: &Mod) -> Result<Sha256Digest> {
    let invalid = |reason: String| Error::InvalidDigest {
        name: m.name.clone(),
        digest: m.sha256.clone(),
        reason,
    };
    let bytes = hex::decode(m.sha256.trim()).map_err(|e| invalid(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| invalid(format!("expected 32 bytes, got {}", b.len())))
}

/// SHA-256 and length of everything readable from `reader`
pub fn hash_reader<R: Read>(reader: &mut R) -> io::Result<(Sha256Digest, u64)> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0; 8192];
    let mut size: u64 = 0;
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
        size += bytes_read as u64;
    }
    Ok((hasher.finalize().into(), size))
}

/// The cache entry at `path`, if it exists, is readable and matches `expected`
fn open_verified(path: &Path, expected: &Sha256Digest, is_zip: bool) -> Option<ModFile> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            debug!("Cache entry {} unreadable: {}", path.display(), e);
            return None;
        }
    };

    let (actual, size) = match hash_reader(&mut file) {
        Ok(result) => result,
        Err(e) => {
            debug!("Cache entry {} unreadable: {}", path.display(), e);
            return None;
        }
    };
    if &actual != expected {
        debug!("Cache entry {} is stale or corrupted", path.display());
        return None;
    }
    file.seek(SeekFrom::Start(0)).ok()?;

    Some(ModFile {
        file,
        size,
        is_zip,
        path: path.to_path_buf(),
        source: ArtifactSource::Cache,
    })
}
