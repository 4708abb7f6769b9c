// src/core/script_set.rs

use crate::{
    constants::ENV_PSEUDO_SCRIPT,
    models::{ResolvedScriptEntry, ScriptMap},
};
use thiserror::Error;

/// One or more requested scripts are not declared and tolerance is off.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("script not found: {}", .names.join(", "))]
pub struct MissingScriptsError {
    /// Missing names in request order. Duplicates are reported once.
    pub names: Vec<String>,
}

/// Whether `name` can be run: declared by the project, or the built-in `env`.
pub fn script_exists(name: &str, scripts: &ScriptMap) -> bool {
    scripts.contains_key(name) || name == ENV_PSEUDO_SCRIPT
}

/// Maps every requested name to an entry, preserving order and duplicates.
///
/// Missing names fail the whole request unless `if_present` is set, in which case
/// they come back with `exists == false` for the caller to skip.
///
/// An empty request is the caller's "list scripts" signal and should be handled
/// before getting here; it resolves to an empty list.
pub fn resolve(
    requested: &[String],
    scripts: &ScriptMap,
    if_present: bool,
) -> Result<Vec<ResolvedScriptEntry>, MissingScriptsError> {
    let entries: Vec<ResolvedScriptEntry> = requested
        .iter()
        .map(|name| ResolvedScriptEntry {
            name: name.clone(),
            exists: script_exists(name, scripts),
        })
        .collect();

    if if_present {
        return Ok(entries);
    }

    let mut missing: Vec<String> = Vec::new();
    for entry in entries.iter().filter(|e| !e.exists) {
        if !missing.contains(&entry.name) {
            missing.push(entry.name.clone());
        }
    }

    if missing.is_empty() {
        Ok(entries)
    } else {
        Err(MissingScriptsError { names: missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripts(names: &[&str]) -> ScriptMap {
        names
            .iter()
            .map(|n| (n.to_string(), format!("echo {}", n)))
            .collect()
    }

    fn request(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_all_present_keeps_order() {
        let map = scripts(&["build", "lint", "test"]);
        let entries = resolve(&request(&["test", "build", "lint"]), &map, false).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["test", "build", "lint"]);
        assert!(entries.iter().all(|e| e.exists));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let map = scripts(&["build"]);
        let entries = resolve(&request(&["build", "build"]), &map, false).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_missing_without_tolerance_fails_with_names() {
        let map = scripts(&["build"]);
        let err = resolve(&request(&["foo"]), &map, false).unwrap_err();
        assert_eq!(err.names, vec!["foo".to_string()]);
        assert_eq!(err.to_string(), "script not found: foo");
    }

    #[test]
    fn test_all_missing_names_reported_at_once() {
        let map = scripts(&["build"]);
        let err = resolve(&request(&["x", "build", "y", "x"]), &map, false).unwrap_err();
        assert_eq!(err.names, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_missing_with_tolerance_is_marked() {
        let map = scripts(&["build"]);
        let entries = resolve(&request(&["foo", "build"]), &map, true).unwrap();
        assert_eq!(
            entries,
            vec![
                ResolvedScriptEntry { name: "foo".into(), exists: false },
                ResolvedScriptEntry { name: "build".into(), exists: true },
            ]
        );
    }

    #[test]
    fn test_env_always_exists() {
        let map = ScriptMap::new();
        let entries = resolve(&request(&["env"]), &map, false).unwrap();
        assert!(entries[0].exists);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let map = scripts(&["Build"]);
        assert!(resolve(&request(&["build"]), &map, false).is_err());
    }
}
