//! appstate - Versioned low-code app state.
//!
//! Every app owns four kinds of state (component tree, key/value, set and
//! action rows), each partitioned by app and version. Version 0 is the
//! mutable draft. A release snapshots the draft into the next immutable
//! version; a duplicate copies the draft into a brand-new app. Both go
//! through the same clone pipeline, which remaps row ids and relinks tree
//! references so the copy is isomorphic to its source.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`clone`] - Two-phase clone with compensation on failure
//! - [`config`] - Configuration loading and schema
//! - [`error`] - Error types and result aliases
//! - [`model`] - Rows, scopes and the app record
//! - [`service`] - App operations: create, release, duplicate, editor view
//! - [`store`] - Storage ports and the JSON-file database
//!
//! # Example
//!
//! ```
//! use appstate::config::CloneSettings;
//! use appstate::service::AppService;
//! use appstate::store::Database;
//!
//! let service = AppService::new(Database::in_memory(), CloneSettings::default());
//! let app = service.create_app("shop", 0).unwrap();
//! assert_eq!(service.release_app(app.id, None).unwrap(), 1);
//!
//! let snapshot = service.editor_document(app.id, 1).unwrap();
//! assert_eq!(snapshot.components.unwrap().display_name, "root");
//! ```

pub mod cli;
pub mod clone;
pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use error::{Result, StateError};
