//! Batch operations: setup, install, list and yeet
//!
//! These are the entry points the CLI calls. Settings are passed in, never
//! read from disk here. Whole-command failures (no game location, manifest
//! unavailable, plugin directory unreadable) come back as `Err`; everything
//! that concerns a single mod is recorded in the returned report and the batch
//! carries on.

use crate::cache::{ArtifactSource, Fetcher};
use crate::installer::{
    check_safe_names, extract_zip, install_file, installed_mods, remove_previous_version,
};
use crate::names::substring_matcher;
use crate::{resolve_mod_name, transitive_closure, Error, Mod, Repository, Result, Settings};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The game executable that marks a game directory
pub const GAME_EXE_NAME: &str = "DeathsDoor.exe";

/// Base component providing the plugin loader
pub const LOADER_BASE_NAME: &str = "BepInEx";

// ============================================================================
// setup
// ============================================================================

#[derive(Debug)]
pub struct SetupReport {
    /// Settings with `GameLocation` pointing at the game directory; not yet saved
    pub settings: Settings,
    pub loader_source: ArtifactSource,
    pub warnings: Vec<String>,
}

/// Find the game directory given either it or the path to the game executable
pub fn check_game_at_path(location: &Path) -> Result<PathBuf> {
    let (game_dir, exe) = if location.file_name() == Some(OsStr::new(GAME_EXE_NAME)) {
        let dir = location
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        (dir, location.to_path_buf())
    } else {
        let info = location
            .metadata()
            .map_err(|e| Error::io_at(format!("setup at {}", location.display()), e))?;
        if !info.is_dir() {
            return Err(Error::Other(format!(
                "{} is not a directory",
                location.display()
            )));
        }
        (location.to_path_buf(), location.join(GAME_EXE_NAME))
    };

    match exe.metadata() {
        Ok(info) if info.is_file() => Ok(game_dir),
        Ok(_) => Err(Error::Other(format!(
            "thing at {} is not a regular file",
            exe.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::GameNotFound(exe)),
        Err(e) => Err(Error::io_at(format!("setup at {}", exe.display()), e)),
    }
}

/// Install the plugin loader into the game at `location`
pub fn setup(
    current: &Settings,
    location: &Path,
    repo: &Repository,
    fetcher: &Fetcher,
) -> Result<SetupReport> {
    let game_dir = check_game_at_path(location)?;
    info!("Setting up game at {}", game_dir.display());

    let loader = repo.get_base(LOADER_BASE_NAME)?;
    let mut artifact = fetcher.obtain(&loader)?;
    if !artifact.is_zip {
        return Err(Error::Other(format!(
            "base component {} is not a zip archive: {}",
            loader.name, loader.link
        )));
    }
    let warnings = extract_zip(&mut artifact.file, artifact.size, &loader.name, &game_dir)?;

    Ok(SetupReport {
        settings: Settings {
            game_location: game_dir.to_string_lossy().to_string(),
            ..current.clone()
        },
        loader_source: artifact.source,
        warnings,
    })
}

// ============================================================================
// install
// ============================================================================

#[derive(Debug)]
pub struct Installed {
    pub path: PathBuf,
    pub source: ArtifactSource,
    /// Non-fatal problems such as timestamps that could not be restored
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub struct ModOutcome<T> {
    pub name: String,
    pub result: Result<T>,
}

#[derive(Debug, Default)]
pub struct InstallReport {
    /// Requested names that did not resolve to exactly one mod
    pub unresolved: Vec<Error>,
    /// Aggregate [`Error::MissingDependencies`], if any dependency was absent
    pub missing: Option<Error>,
    /// One entry per mod in the dependency closure
    pub outcomes: Vec<ModOutcome<Installed>>,
}

impl InstallReport {
    pub fn installed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.installed_count()
    }
}

/// Install the requested mods and everything they depend on
///
/// Each requested name is resolved with [`Repository::resolve_mod_name`]; the
/// closure of the resolved names is then installed one mod at a time,
/// replacing any previous version.
pub fn install(
    settings: &Settings,
    repo: &Repository,
    fetcher: &Fetcher,
    requested: &[String],
) -> Result<InstallReport> {
    let plugins_dir = settings.plugins_dir()?;
    let mut report = InstallReport::default();

    let mut roots = Vec::with_capacity(requested.len());
    for name in requested {
        match repo.resolve_mod_name(name) {
            Ok(resolved) => roots.push(resolved),
            Err(e) => report.unresolved.push(e),
        }
    }

    let closure = transitive_closure(repo, &roots);
    report.missing = closure.missing_error();
    debug!(
        "Installing {} mods ({} missing)",
        closure.resolved.len(),
        closure.missing.len()
    );

    for (name, m) in &closure.resolved {
        let result = install_mod(fetcher, m, &plugins_dir);
        report.outcomes.push(ModOutcome {
            name: name.clone(),
            result,
        });
    }

    Ok(report)
}

/// Fetch and install one mod into `<plugins_dir>/<name>`
pub fn install_mod(fetcher: &Fetcher, m: &Mod, plugins_dir: &Path) -> Result<Installed> {
    check_safe_names(m)?;
    let mut artifact = fetcher.obtain(m)?;

    let install_dir = plugins_dir.join(&m.name);
    remove_previous_version(&m.name, &install_dir)?;

    let warnings = if artifact.is_zip {
        extract_zip(&mut artifact.file, artifact.size, &m.name, &install_dir)?
    } else {
        install_file(&mut artifact.file, &m.link_file_name(), &install_dir)?;
        Vec::new()
    };

    info!("Installed {} into {}", m.name, install_dir.display());
    Ok(Installed {
        path: install_dir,
        source: artifact.source,
        warnings,
    })
}

// ============================================================================
// list
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Only mods that have a directory in the plugin folder
    pub installed_only: bool,
    /// Case-insensitive substring the name must contain
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListedMod {
    pub name: String,
    /// Manifest record; `None` for installed mods the repository doesn't know
    /// or whose manifest can't be read
    pub record: Option<Mod>,
    pub installed: bool,
}

impl ListedMod {
    /// The record, or one filled with `N/A` placeholders
    pub fn record_or_placeholder(&self) -> Mod {
        const PLACEHOLDER: &str = "N/A";
        self.record.clone().unwrap_or_else(|| Mod {
            name: self.name.clone(),
            description: PLACEHOLDER.to_string(),
            repository: PLACEHOLDER.to_string(),
            dependencies: vec![PLACEHOLDER.to_string()],
            integrations: Vec::new(),
            link: String::new(),
            sha256: String::new(),
        })
    }
}

/// List known mods, optionally only installed ones, sorted by name
///
/// Installed state is read from the plugin folder when a game location is
/// configured. With `installed_only` a game location is required, and
/// installed mods missing from the repository are included as well.
pub fn list(
    settings: &Settings,
    repo: &Repository,
    options: &ListOptions,
) -> Result<Vec<ListedMod>> {
    let installed: BTreeSet<String> = if options.installed_only {
        installed_mods(&settings.plugins_dir()?)?.into_iter().collect()
    } else {
        settings
            .plugins_dir()
            .and_then(|dir| installed_mods(&dir))
            .map(|names| names.into_iter().collect())
            .unwrap_or_default()
    };

    let mut names: BTreeSet<String> = repo.mod_names().into_iter().collect();
    if options.installed_only {
        names = installed.clone();
    }

    if let Some(search) = &options.search {
        let matcher = substring_matcher(search)?;
        names.retain(|name| matcher.is_match(name));
    }

    Ok(names
        .into_iter()
        .map(|name| ListedMod {
            record: repo.get_mod(&name).ok(),
            installed: installed.contains(&name),
            name,
        })
        .collect())
}

// ============================================================================
// yeet
// ============================================================================

#[derive(Debug, Default)]
pub struct YeetReport {
    pub unresolved: Vec<Error>,
    /// One entry per distinct resolved mod, in request order
    pub outcomes: Vec<ModOutcome<PathBuf>>,
}

/// Uninstall mods by (partial) name
///
/// Names are resolved against the installed mod directories. Two fragments
/// resolving to the same mod remove it only once.
pub fn yeet(settings: &Settings, requested: &[String]) -> Result<YeetReport> {
    let plugins_dir = settings.plugins_dir()?;
    let installed = installed_mods(&plugins_dir)?;
    let mut report = YeetReport::default();

    let mut targets: Vec<String> = Vec::new();
    for name in requested {
        match resolve_mod_name(&installed, name) {
            Ok(resolved) if !targets.contains(&resolved) => targets.push(resolved),
            Ok(_) => {}
            Err(e) => report.unresolved.push(e),
        }
    }

    for name in targets {
        let dir = plugins_dir.join(&name);
        let result = remove_previous_version(&name, &dir).map(|()| dir);
        report.outcomes.push(ModOutcome { name, result });
    }

    Ok(report)
}
