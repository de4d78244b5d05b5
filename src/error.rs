//! Error types for app state operations.
//!
//! This module defines [`StateError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Not-found conditions (`AppNotFound`, `VersionNotFound`, `UserNotFound`)
//!   are reported to callers as-is and never trigger compensation on their own
//! - `StructuralCorruption` marks a tree whose references do not resolve
//! - `Storage` wraps any failure of an underlying create/update/retrieve/delete
//! - Use `anyhow::Error` (via `StateError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::model::{Id, Version};

/// Core error type for app state operations.
#[derive(Debug, Error)]
pub enum StateError {
    /// The app does not exist.
    #[error("App not found: {app}")]
    AppNotFound { app: Id },

    /// The requested version is beyond the app's mainline version.
    #[error("Version {version} of app {app} not found (mainline is {mainline})")]
    VersionNotFound {
        app: Id,
        version: Version,
        mainline: Version,
    },

    /// The user does not exist.
    #[error("User not found: {user}")]
    UserNotFound { user: Id },

    /// A tree reference failed to resolve, or the tree has no root or a cycle.
    #[error("Corrupt component tree in app {app} version {version}: {message}")]
    StructuralCorruption {
        app: Id,
        version: Version,
        message: String,
    },

    /// A clone was asked to copy a scope onto itself.
    #[error("Invalid clone scope: {message}")]
    InvalidScope { message: String },

    /// An underlying storage operation failed.
    #[error("Storage {operation} failed: {message}")]
    Storage { operation: String, message: String },

    /// Configuration file not found at the given location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// JSON encode/decode error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StateError {
    /// Build a storage error for the named operation.
    pub fn storage(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Whether this error is one of the not-found conditions.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AppNotFound { .. } | Self::VersionNotFound { .. } | Self::UserNotFound { .. }
        )
    }

    /// Whether this error reports a corrupt tree.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::StructuralCorruption { .. })
    }
}

/// Result type alias for app state operations.
pub type Result<T> = std::result::Result<T, StateError>;
