//! Resolving typed mod names
//!
//! Users may type any fragment of a mod name in any case. A fragment is
//! narrowed in tiers until exactly one candidate is left:
//!
//! 1. case-insensitive substring match
//! 2. case-insensitive match of the whole name
//! 3. case-sensitive match of the whole name
//!
//! so `rando` finds `Randomizer`, while typing `Foo` exactly still picks `Foo`
//! over `FooBar`.

use crate::{Error, Result};
use regex::Regex;

/// Resolve `requested` to exactly one of `candidates`
///
/// The requested text is matched literally; regex metacharacters in it have no
/// special meaning.
///
/// # Errors
///
/// - [`Error::NoMatch`] if no candidate contains `requested`
/// - [`Error::Ambiguous`] if several candidates match and none wins a later tier
/// - [`Error::DuplicateName`] if `candidates` holds `requested` more than once
///
/// # Examples
///
/// ```
/// use raven::resolve_mod_name;
///
/// let names = vec!["Foo".to_string(), "FooBar".to_string()];
/// assert_eq!(resolve_mod_name(&names, "bar").unwrap(), "FooBar");
/// assert_eq!(resolve_mod_name(&names, "Foo").unwrap(), "Foo");
/// assert_eq!(resolve_mod_name(&names, "foo").unwrap(), "Foo");
/// assert!(resolve_mod_name(&names, "fo").is_err());
/// ```
pub fn resolve_mod_name<S: AsRef<str>>(candidates: &[S], requested: &str) -> Result<String> {
    let literal = regex::escape(requested);
    let substring = substring_matcher(requested)?;

    let matches: Vec<&str> = candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| substring.is_match(name))
        .collect();
    match matches.len() {
        0 => return Err(Error::NoMatch(requested.to_string())),
        1 => return Ok(matches[0].to_string()),
        _ => {}
    }

    let whole = case_insensitive(&format!("^{}$", literal))?;
    let full_matches: Vec<&str> = matches
        .iter()
        .copied()
        .filter(|name| whole.is_match(name))
        .collect();
    match full_matches.len() {
        0 => {
            return Err(Error::Ambiguous {
                requested: requested.to_string(),
                candidates: owned(&matches),
            })
        }
        1 => return Ok(full_matches[0].to_string()),
        _ => {}
    }

    let exact = full_matches
        .iter()
        .filter(|name| **name == requested)
        .count();
    match exact {
        0 => Err(Error::Ambiguous {
            requested: requested.to_string(),
            candidates: owned(&full_matches),
        }),
        1 => Ok(requested.to_string()),
        count => Err(Error::DuplicateName {
            requested: requested.to_string(),
            count,
        }),
    }
}

/// Case-insensitive literal substring matcher, as used by the first tier
pub fn substring_matcher(text: &str) -> Result<Regex> {
    case_insensitive(&regex::escape(text))
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("(?i){}", pattern))
        .map_err(|e| Error::Other(format!("invalid name pattern: {}", e)))
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unique_substring_resolves() {
        let candidates = names(&["ItemChanger", "Randomizer", "SpeedrunTimer"]);
        assert_eq!(resolve_mod_name(&candidates, "rando").unwrap(), "Randomizer");
        assert_eq!(resolve_mod_name(&candidates, "TIMER").unwrap(), "SpeedrunTimer");
    }

    #[test]
    fn test_no_match() {
        let candidates = names(&["Foo", "FooBar"]);
        let err = resolve_mod_name(&candidates, "baz").unwrap_err();
        assert!(matches!(err, Error::NoMatch(ref r) if r == "baz"));
    }

    #[test]
    fn test_case_insensitive_fragment_is_ambiguous() {
        let candidates = names(&["Foo", "FooBar"]);
        let err = resolve_mod_name(&candidates, "fo").unwrap_err();
        match err {
            Error::Ambiguous {
                requested,
                candidates,
            } => {
                assert_eq!(requested, "fo");
                assert_eq!(candidates, vec!["Foo", "FooBar"]);
            }
            other => panic!("expected Ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_case_wins_over_substring_matches() {
        let candidates = names(&["Foo", "FooBar"]);
        assert_eq!(resolve_mod_name(&candidates, "Foo").unwrap(), "Foo");
    }

    #[test]
    fn test_full_case_insensitive_match_wins() {
        // "foo" is a substring of both but a whole-name match for only one
        let candidates = names(&["Foo", "FooBar"]);
        assert_eq!(resolve_mod_name(&candidates, "foo").unwrap(), "Foo");
        assert_eq!(resolve_mod_name(&candidates, "FOOBAR").unwrap(), "FooBar");
    }

    #[test]
    fn test_case_variants_need_exact_case() {
        let candidates = names(&["Foo", "FOO", "FooBar"]);
        assert_eq!(resolve_mod_name(&candidates, "FOO").unwrap(), "FOO");

        let err = resolve_mod_name(&candidates, "foo").unwrap_err();
        match err {
            Error::Ambiguous { candidates, .. } => assert_eq!(candidates, vec!["Foo", "FOO"]),
            other => panic!("expected Ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_names() {
        let candidates = names(&["Foo", "Foo", "FooBar"]);
        let err = resolve_mod_name(&candidates, "Foo").unwrap_err();
        assert!(matches!(err, Error::DuplicateName { count: 2, .. }));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let candidates = names(&["C++ Tools", "Cxx", "A.B", "AxB"]);
        assert_eq!(resolve_mod_name(&candidates, "c++").unwrap(), "C++ Tools");
        assert!(matches!(
            resolve_mod_name(&candidates, "a*b"),
            Err(Error::NoMatch(_))
        ));
        assert_eq!(resolve_mod_name(&candidates, "a.b").unwrap(), "A.B");
    }

    #[test]
    fn test_canonical_name_always_resolves_to_itself() {
        let candidates = names(&[
            "Foo",
            "FooBar",
            "foobar2",
            "Bar",
            "BarFoo",
            "Rando",
            "Randomizer",
        ]);
        for name in &candidates {
            assert_eq!(&resolve_mod_name(&candidates, name).unwrap(), name);
        }
    }

    #[test]
    fn test_substring_matcher() {
        let matcher = substring_matcher("(beta)").unwrap();
        assert!(matcher.is_match("Randomizer (Beta)"));
        assert!(!matcher.is_match("Randomizer beta"));
    }

    #[test]
    fn test_empty_candidates() {
        let candidates: Vec<String> = Vec::new();
        assert!(matches!(
            resolve_mod_name(&candidates, "x"),
            Err(Error::NoMatch(_))
        ));
    }
}
