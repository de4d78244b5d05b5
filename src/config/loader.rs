//! Configuration file discovery and loading.
//!
//! Resolution order (later overrides earlier):
//! 1. Built-in defaults
//! 2. `appstate.yml` in the working directory, or an explicit `--config` path
//! 3. The `APPSTATE_DB` environment variable for the store path

use crate::config::schema::AppStateConfig;
use crate::error::{Result, StateError};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "appstate.yml";

/// Environment variable overriding `store.path`.
pub const DB_ENV_VAR: &str = "APPSTATE_DB";

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<AppStateConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StateError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            StateError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into AppStateConfig.
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<AppStateConfig> {
    if content.trim().is_empty() {
        return Ok(AppStateConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| StateError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the effective configuration.
///
/// An explicit path must exist. Without one, `appstate.yml` in
/// `working_dir` is used when present and defaults otherwise.
pub fn load_config(explicit: Option<&Path>, working_dir: &Path) -> Result<AppStateConfig> {
    let config = match explicit {
        Some(path) => load_config_file(path)?,
        None => {
            let path = working_dir.join(DEFAULT_CONFIG_FILE);
            if path.exists() {
                load_config_file(&path)?
            } else {
                AppStateConfig::default()
            }
        }
    };

    Ok(apply_env_overrides(config, |name| std::env::var(name).ok()))
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides(
    mut config: AppStateConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppStateConfig {
    if let Some(db) = lookup(DB_ENV_VAR).filter(|v| !v.is_empty()) {
        tracing::debug!("Using database path from {}", DB_ENV_VAR);
        config.store.path = PathBuf::from(db);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clone::DanglingPolicy;
    use tempfile::TempDir;

    #[test]
    fn missing_explicit_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.yml");
        let err = load_config(Some(&path), temp.path()).unwrap_err();
        assert!(matches!(err, StateError::ConfigNotFound { .. }));
    }

    #[test]
    fn no_file_in_working_dir_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(None, temp.path()).unwrap();
        assert_eq!(config.cloning, AppStateConfig::default().cloning);
    }

    #[test]
    fn discovers_file_in_working_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            "clone:\n  dangling_references: lenient\n",
        )
        .unwrap();

        let config = load_config(None, temp.path()).unwrap();
        assert_eq!(config.cloning.dangling_references, DanglingPolicy::Lenient);
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yml");
        fs::write(&path, "store: [unclosed").unwrap();

        let err = load_config_file(&path).unwrap_err();
        match err {
            StateError::ConfigParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn empty_file_is_defaults() {
        let config = parse_config("  \n", Path::new("appstate.yml")).unwrap();
        assert_eq!(config, AppStateConfig::default());
    }

    #[test]
    fn env_override_replaces_store_path() {
        let config = apply_env_overrides(AppStateConfig::default(), |name| {
            (name == DB_ENV_VAR).then(|| "/tmp/other.json".to_string())
        });
        assert_eq!(config.store.path, PathBuf::from("/tmp/other.json"));
    }

    #[test]
    fn empty_env_override_is_ignored() {
        let config = apply_env_overrides(AppStateConfig::default(), |_| Some(String::new()));
        assert_eq!(config, AppStateConfig::default());
    }
}
