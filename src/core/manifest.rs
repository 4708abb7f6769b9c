//! # Manifest Loader
//!
//! Finds the project manifest by walking up from a start directory and extracts the
//! scripts mapping and the declared script shell. The first ancestor holding a
//! manifest is the project root; scripts run there.
//!
//! Supported manifests, checked in this order within each directory:
//! - `nrun.toml`: `script_shell = "..."` and a `[scripts]` table.
//! - `package.json`: the `"scripts"` object and an optional top-level `"scriptShell"`.

use crate::{
    constants::MANIFEST_FILENAMES,
    models::{LoadedProject, NrunManifest, PackageManifest, ScriptMap},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("No manifest ({}) found in '{}' or any parent directory.", MANIFEST_FILENAMES.join(", "), .0.display())]
    NotFound(PathBuf),
    #[error("Could not read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to parse '{}': {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Locates and loads the manifest governing `start_dir`.
pub async fn load_project(start_dir: &Path) -> Result<LoadedProject, ManifestError> {
    let start_dir = dunce::simplified(start_dir);
    let manifest_path = find_manifest(start_dir)
        .await
        .ok_or_else(|| ManifestError::NotFound(start_dir.to_path_buf()))?;
    log::debug!("Using manifest '{}'", manifest_path.display());

    let content = tokio::fs::read_to_string(&manifest_path)
        .await
        .map_err(|source| ManifestError::Io {
            path: manifest_path.clone(),
            source,
        })?;
    let (scripts, script_shell) = parse_manifest(&manifest_path, &content)?;

    let root = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start_dir.to_path_buf());

    Ok(LoadedProject {
        root,
        manifest_path,
        scripts,
        script_shell,
    })
}

async fn find_manifest(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        for file_name in MANIFEST_FILENAMES {
            let candidate = dir.join(file_name);
            if tokio::fs::metadata(&candidate)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
            {
                return Some(candidate);
            }
        }
    }
    None
}

/// Parses manifest text; the format is chosen by the file name.
pub fn parse_manifest(
    path: &Path,
    content: &str,
) -> Result<(ScriptMap, Option<String>), ManifestError> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        let manifest: NrunManifest =
            toml::from_str(content).map_err(|source| ManifestError::Toml {
                path: path.to_path_buf(),
                source,
            })?;
        Ok((manifest.scripts, manifest.script_shell))
    } else {
        let manifest: PackageManifest =
            serde_json::from_str(content).map_err(|source| ManifestError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Ok((manifest.scripts, manifest.script_shell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_package_json() {
        let json = r#"{
            "name": "demo",
            "version": "1.0.0",
            "scripts": { "build": "tsc && node dist", "test": "jest" },
            "scriptShell": "bash"
        }"#;
        let (scripts, shell) = parse_manifest(Path::new("package.json"), json).unwrap();
        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts["build"], "tsc && node dist");
        assert_eq!(shell.as_deref(), Some("bash"));
    }

    #[test]
    fn test_package_json_without_scripts() {
        let (scripts, shell) = parse_manifest(Path::new("package.json"), r#"{"name":"x"}"#).unwrap();
        assert!(scripts.is_empty());
        assert!(shell.is_none());
    }

    #[test]
    fn test_parse_nrun_toml() {
        let toml_str = r#"
            script_shell = "/bin/bash"

            [scripts]
            lint = "cargo clippy"
            "ci:test" = "cargo test --all"
        "#;
        let (scripts, shell) = parse_manifest(Path::new("nrun.toml"), toml_str).unwrap();
        assert_eq!(scripts["ci:test"], "cargo test --all");
        assert_eq!(shell.as_deref(), Some("/bin/bash"));
    }

    #[test]
    fn test_unknown_toml_field_is_rejected() {
        let result = parse_manifest(Path::new("nrun.toml"), "shell = \"bash\"\n");
        assert!(matches!(result, Err(ManifestError::Toml { .. })));
    }

    #[test]
    fn test_non_string_script_is_malformed() {
        let result = parse_manifest(Path::new("package.json"), r#"{"scripts":{"a":1}}"#);
        assert!(matches!(result, Err(ManifestError::Json { .. })));
    }

    #[tokio::test]
    async fn test_load_walks_up_to_parent_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"scripts":{"hello":"echo hi"}}"#,
        )
        .unwrap();
        let nested = dir.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();

        let project = load_project(&nested).await.unwrap();
        assert_eq!(project.root, dunce::simplified(dir.path()));
        assert_eq!(project.scripts["hello"], "echo hi");
    }

    #[tokio::test]
    async fn test_nrun_toml_wins_in_same_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"scripts":{"a":"json"}}"#).unwrap();
        fs::write(dir.path().join("nrun.toml"), "[scripts]\na = \"toml\"\n").unwrap();

        let project = load_project(dir.path()).await.unwrap();
        assert_eq!(project.scripts["a"], "toml");
        assert!(project.manifest_path.ends_with("nrun.toml"));
    }

    #[tokio::test]
    async fn test_nearest_manifest_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"scripts":{"a":"outer"}}"#).unwrap();
        let inner = dir.path().join("pkg");
        fs::create_dir_all(&inner).unwrap();
        fs::write(inner.join("package.json"), r#"{"scripts":{"a":"inner"}}"#).unwrap();

        let project = load_project(&inner).await.unwrap();
        assert_eq!(project.scripts["a"], "inner");
        assert_eq!(project.root, inner);
    }

    #[tokio::test]
    async fn test_malformed_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{ not json").unwrap();

        let err = load_project(dir.path()).await.unwrap_err();
        assert!(matches!(err, ManifestError::Json { .. }));
        assert!(err.to_string().contains("package.json"));
    }
}
