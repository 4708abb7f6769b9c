// src/core/settings.rs

use crate::{core::paths, models::Settings};
use anyhow::{Context, Result, anyhow};
use std::{fs, path::Path};

impl Settings {
    /// Loads the user settings file, or defaults when it does not exist.
    ///
    /// A config directory that cannot be determined is treated like a missing file.
    pub fn load() -> Result<Self> {
        match paths::get_settings_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                log::debug!("No settings directory: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Loads settings from an explicit path. Missing file means defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            log::trace!("Settings file '{}' not present; using defaults.", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file '{}'", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file '{}'", path.display()))
    }

    /// The configured shell with `~` and environment variables expanded.
    pub fn expanded_script_shell(&self) -> Result<Option<String>> {
        self.script_shell
            .as_deref()
            .map(|shell| {
                shellexpand::full(shell)
                    .map(|expanded| expanded.into_owned())
                    .map_err(|e| anyhow!("Failed to expand script_shell '{}': {}", shell, e))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_settings() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"script_shell = \"/bin/bash\"\nsilent = true\n")
            .unwrap();
        file.flush().unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.script_shell.as_deref(), Some("/bin/bash"));
        assert!(settings.silent);
        assert!(!settings.verbose);
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"shell = \"zsh\"\n").unwrap();
        file.flush().unwrap();

        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
    }

    #[test]
    fn test_script_shell_expansion() {
        let settings = Settings {
            script_shell: Some("~/bin/myshell".to_string()),
            ..Default::default()
        };
        let expanded = settings.expanded_script_shell().unwrap().unwrap();
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/bin/myshell"));

        assert_eq!(Settings::default().expanded_script_shell().unwrap(), None);
    }
}
