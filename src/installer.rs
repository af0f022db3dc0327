//! Installing mod artifacts into the game's plugin directory
//!
//! Every mod owns `<game>/BepInEx/plugins/<mod-name>/`. Installing replaces
//! that directory wholesale: the previous version is removed first, then the
//! artifact is either extracted (zip) or copied in (single file, usually a
//! DLL).
//!
//! Archive entry paths are never trusted. Each one is anchored to the
//! destination directory before use, so `../../evil.txt` or `/etc/evil.txt`
//! inside an archive lands at `<dest>/evil.txt` and never above it.
//!
//! # Examples
//!
//! ```no_run
//! use raven::installer::{extract_zip, remove_previous_version};
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dest = std::path::Path::new("/games/dd/BepInEx/plugins/Randomizer");
//! remove_previous_version("Randomizer", dest)?;
//!
//! let mut archive = File::open("Randomizer.zip")?;
//! let size = archive.metadata()?.len();
//! let warnings = extract_zip(&mut archive, size, "Randomizer.zip", dest)?;
//! for warning in warnings {
//!     println!("warning: {}", warning);
//! }
//! # Ok(())
//! # }
//! ```

use crate::{Error, Mod, Result};
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use zip::ZipArchive;

/// Plugin directory that holds switched-off mods rather than a mod itself
pub const DISABLED_DIR: &str = "Disabled";

/// Join `child` onto `parent` as if `child` were rooted at `parent`
///
/// `..` segments can climb no higher than `parent`, and absolute paths or
/// drive prefixes in `child` are treated as relative to it.
pub fn join_no_escape(parent: &Path, child: &str) -> PathBuf {
    let mut anchored: Vec<&str> = Vec::new();
    for segment in child.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                anchored.pop();
            }
            s => {
                for component in Path::new(s).components() {
                    if let Component::Normal(part) = component {
                        if let Some(part) = part.to_str() {
                            anchored.push(part);
                        }
                    }
                }
            }
        }
    }

    let mut dest = parent.to_path_buf();
    dest.extend(anchored);
    dest
}

fn has_separator(s: &str) -> bool {
    s.contains('/') || s.contains('\\')
}

/// Refuse mod names and artifact file names that could leave the plugin root
///
/// Checked before any file-system work for the mod, independent of the
/// per-entry defence in [`extract_zip`].
pub fn check_safe_names(m: &Mod) -> Result<()> {
    let unsafe_path = |reason: &str| Error::UnsafePath {
        name: m.name.clone(),
        reason: reason.to_string(),
    };

    if has_separator(&m.name) {
        return Err(unsafe_path("contains path separator"));
    }
    if m.name.is_empty() || m.name == "." || m.name == ".." {
        return Err(unsafe_path("not a valid directory name"));
    }

    let file_name = m.link_file_name();
    if has_separator(&file_name) {
        return Err(unsafe_path("filename contains path separator"));
    }
    if file_name.is_empty() || file_name == "." || file_name == ".." {
        return Err(unsafe_path("link has no file name"));
    }
    Ok(())
}

/// Delete a previously installed copy of `name`; a missing directory is fine
pub fn remove_previous_version(name: &str, install_dir: &Path) -> Result<()> {
    match fs::remove_dir_all(install_dir) {
        Ok(()) => {
            debug!("Removed {}", install_dir.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io_at(
            format!("yeet installed version of {}", name),
            e,
        )),
    }
}

/// Extract a zip archive of `size` bytes into `install_dir`
///
/// Directory entries (names ending in `/`) are created empty; files get their
/// parents created and their stored modification time restored. Failing to
/// restore a timestamp does not fail the extraction; it is returned as a
/// warning instead. Entries that collide simply overwrite each other in
/// archive order.
pub fn extract_zip<R: Read + Seek>(
    archive: &mut R,
    size: u64,
    name: &str,
    install_dir: &Path,
) -> Result<Vec<String>> {
    extract_zip_with(archive, size, name, install_dir, |file, modified| {
        file.set_modified(modified)
    })
}

fn extract_zip_with<R, F>(
    archive: &mut R,
    size: u64,
    name: &str,
    install_dir: &Path,
    set_modified: F,
) -> Result<Vec<String>>
where
    R: Read + Seek,
    F: Fn(&File, SystemTime) -> io::Result<()>,
{
    let wrap = |e: io::Error| Error::io_at(format!("extract {}", name), e);

    let actual_size = archive.seek(SeekFrom::End(0)).map_err(wrap)?;
    if actual_size != size {
        return Err(Error::Other(format!(
            "extract {}: expected {} bytes, found {}",
            name, size, actual_size
        )));
    }
    archive.seek(SeekFrom::Start(0)).map_err(wrap)?;
    let context = || format!("extract {}", name);
    let mut zip = ZipArchive::new(archive).map_err(|e| Error::zip_at(context(), e))?;

    let mut warnings = Vec::new();
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| Error::zip_at(context(), e))?;

        let entry_name = entry.name().to_string();
        let dest = join_no_escape(install_dir, &entry_name);
        if dest == install_dir && !entry_name.ends_with('/') {
            warnings.push(format!("skipped entry {:?}: no file name", entry_name));
            continue;
        }

        if entry_name.ends_with('/') {
            fs::create_dir_all(&dest).map_err(wrap)?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
        let mut out = File::create(&dest).map_err(wrap)?;
        io::copy(&mut entry, &mut out).map_err(wrap)?;

        if let Some(modified) = entry.last_modified().and_then(zip_time_to_system) {
            if let Err(e) = set_modified(&out, modified) {
                warn!("set mtime of {}: {}", dest.display(), e);
                warnings.push(format!("{}: {}", dest.display(), e));
            }
        }
    }

    Ok(warnings)
}

/// Zip timestamps carry no zone; like most tools, read them as UTC
fn zip_time_to_system(time: zip::DateTime) -> Option<SystemTime> {
    let date = chrono::NaiveDate::from_ymd_opt(
        i32::from(time.year()),
        u32::from(time.month()),
        u32::from(time.day()),
    )?;
    let datetime = date.and_hms_opt(
        u32::from(time.hour()),
        u32::from(time.minute()),
        u32::from(time.second()),
    )?;
    Some(datetime.and_utc().into())
}

/// Copy a single-file artifact to `<install_dir>/<file_name>`
///
/// The source is rewound first; it has usually just been read for hashing.
pub fn install_file<R: Read + Seek>(
    source: &mut R,
    file_name: &str,
    install_dir: &Path,
) -> Result<PathBuf> {
    let wrap = |e: io::Error| Error::io_at(format!("extract {}", file_name), e);

    let dest = join_no_escape(install_dir, file_name);
    if dest == install_dir {
        return Err(Error::UnsafePath {
            name: file_name.to_string(),
            reason: "not a file name".to_string(),
        });
    }

    fs::create_dir_all(install_dir).map_err(wrap)?;
    source.seek(SeekFrom::Start(0)).map_err(wrap)?;
    let mut out = File::create(&dest).map_err(wrap)?;
    io::copy(source, &mut out).map_err(wrap)?;
    Ok(dest)
}

/// Names of the mod directories under `plugins_dir`
///
/// Plain files and the `Disabled` directory (any case, surrounding whitespace
/// ignored) are not mods.
pub fn installed_mods(plugins_dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(plugins_dir)
        .map_err(|e| Error::io_at("list installed mods", e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io_at("list installed mods", e))?;
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.trim().eq_ignore_ascii_case(DISABLED_DIR) {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}
