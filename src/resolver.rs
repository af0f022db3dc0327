//! Dependency closure over the manifest graph
//!
//! There are no versions or constraints: a mod is either in the repository or
//! it isn't. The closure of a set of root mods is every mod reachable through
//! `Dependencies`, plus the names that could not be looked up. Missing names
//! never stop the walk; callers decide what to do with a partial result.
//!
//! # Examples
//!
//! ```no_run
//! use raven::{transitive_closure, Repository, Settings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Repository::fetch(&Settings::default().network.client()?)?;
//! let closure = transitive_closure(&repo, &["Randomizer".to_string()]);
//!
//! println!("Resolved {} mods", closure.resolved.len());
//! if let Some(err) = closure.missing_error() {
//!     eprintln!("{}", err);
//! }
//! # Ok(())
//! # }
//! ```

use crate::{Error, Mod, Repository};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Result of walking the dependency graph from a set of roots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
    /// Every reachable mod that exists in the repository, by name
    pub resolved: BTreeMap<String, Mod>,

    /// Names referenced as roots or dependencies that could not be looked up
    pub missing: BTreeSet<String>,
}

impl Closure {
    /// The aggregate [`Error::MissingDependencies`], if anything was missing
    pub fn missing_error(&self) -> Option<Error> {
        if self.missing.is_empty() {
            None
        } else {
            Some(Error::MissingDependencies(
                self.missing.iter().cloned().collect(),
            ))
        }
    }
}

/// Anything mods can be looked up in by exact name
pub trait ModSource {
    fn lookup(&self, name: &str) -> crate::Result<Mod>;
}

impl ModSource for Repository {
    fn lookup(&self, name: &str) -> crate::Result<Mod> {
        self.get_mod(name)
    }
}

/// Collect `roots` and all their transitive dependencies
///
/// Depth-first, in listed order. Each name is marked resolved or missing
/// before its dependencies are visited, so cycles terminate and every name is
/// looked up at most once. A missing mod's dependencies are not explored.
pub fn transitive_closure<S: ModSource + ?Sized>(source: &S, roots: &[String]) -> Closure {
    let mut closure = Closure::default();
    let mut stack: Vec<String> = roots.iter().rev().cloned().collect();

    while let Some(name) = stack.pop() {
        if closure.resolved.contains_key(&name) || closure.missing.contains(&name) {
            continue;
        }

        match source.lookup(&name) {
            Ok(m) => {
                stack.extend(m.dependencies.iter().rev().cloned());
                closure.resolved.insert(name, m);
            }
            Err(e) => {
                debug!("Dependency {} unavailable: {}", name, e);
                closure.missing.insert(name);
            }
        }
    }

    closure
}
