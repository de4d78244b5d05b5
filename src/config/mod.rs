//! Configuration loading for appstate.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, loading and environment overrides in [`loader`]
//!
//! # Example
//!
//! ```
//! use appstate::config::{parse_config, ReleaseAudit};
//! use std::path::Path;
//!
//! let config = parse_config("clone:\n  release_audit: stamp\n", Path::new("appstate.yml")).unwrap();
//! assert_eq!(config.cloning.release_audit, ReleaseAudit::Stamp);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    apply_env_overrides, load_config, load_config_file, parse_config, DB_ENV_VAR,
    DEFAULT_CONFIG_FILE,
};
pub use schema::{AppStateConfig, CloneSettings, ReleaseAudit, StoreSettings};
