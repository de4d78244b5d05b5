//! Configuration schema definitions.
//!
//! This module contains the struct definitions that map to the
//! `appstate.yml` file format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::clone::DanglingPolicy;

/// Root configuration structure for appstate.yml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppStateConfig {
    /// Storage settings
    pub store: StoreSettings,

    /// Release and duplicate settings
    #[serde(rename = "clone")]
    pub cloning: CloneSettings,
}

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// JSON database file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".appstate").join("db.json")
}

/// Behavior of release and duplicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloneSettings {
    /// Handling of tree references that point outside the tree
    pub dangling_references: DanglingPolicy,

    /// Audit fields of snapshot rows
    pub release_audit: ReleaseAudit,
}

/// Audit handling for rows copied by a release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseAudit {
    /// Snapshot rows keep the draft rows' creator and timestamps
    #[default]
    Preserve,
    /// Snapshot rows are stamped with the releasing actor and time
    Stamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_all_defaults() {
        let config: AppStateConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppStateConfig::default());
        assert_eq!(config.store.path, PathBuf::from(".appstate/db.json"));
        assert_eq!(config.cloning.dangling_references, DanglingPolicy::Strict);
        assert_eq!(config.cloning.release_audit, ReleaseAudit::Preserve);
    }

    #[test]
    fn parses_all_keys() {
        let yaml = r#"
store:
  path: /var/lib/appstate/db.json
clone:
  dangling_references: lenient
  release_audit: stamp
"#;
        let config: AppStateConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.store.path, PathBuf::from("/var/lib/appstate/db.json"));
        assert_eq!(config.cloning.dangling_references, DanglingPolicy::Lenient);
        assert_eq!(config.cloning.release_audit, ReleaseAudit::Stamp);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let yaml = "clone:\n  dangling_references: ignore\n";
        assert!(serde_yaml::from_str::<AppStateConfig>(yaml).is_err());
    }
}
