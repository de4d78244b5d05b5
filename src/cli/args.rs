//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::model::{Id, Version, EDIT_VERSION};

/// appstate - Versioned app state with release and duplicate.
#[derive(Debug, Parser)]
#[command(name = "appstate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default appstate.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the database file (overrides store.path and APPSTATE_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage users
    #[command(subcommand)]
    User(UserCommands),

    /// Create, list and delete apps
    #[command(subcommand)]
    App(AppCommands),

    /// Publish an app's draft as a new version
    Release(ReleaseArgs),

    /// Copy an app's draft into a new app
    Duplicate(DuplicateArgs),

    /// Print the editor document of one version
    Editor(EditorArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// `user` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum UserCommands {
    /// Register a user
    Add {
        /// Display nickname
        nickname: String,
    },

    /// Show one user
    Show {
        /// User id
        user: Id,
    },
}

/// `app` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum AppCommands {
    /// Create an app with an empty draft
    Create {
        /// App name
        name: String,

        /// Acting user id
        #[arg(short, long, default_value_t = 0)]
        user: Id,
    },

    /// Rename an app
    Rename {
        /// App id
        app: Id,

        /// New name
        name: String,

        /// Acting user id
        #[arg(short, long, default_value_t = 0)]
        user: Id,
    },

    /// Show one app
    Show {
        /// App id
        app: Id,
    },

    /// List apps, most recently updated first
    List,

    /// Delete an app and all of its versions
    Delete {
        /// App id
        app: Id,
    },
}

/// Arguments for the `release` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ReleaseArgs {
    /// App id
    pub app: Id,

    /// Acting user id (defaults to the app's last updater)
    #[arg(short, long)]
    pub user: Option<Id>,
}

/// Arguments for the `duplicate` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DuplicateArgs {
    /// Source app id
    pub app: Id,

    /// Name of the new app
    #[arg(short, long)]
    pub name: String,

    /// Acting user id
    #[arg(short, long, default_value_t = 0)]
    pub user: Id,
}

/// Arguments for the `editor` command.
#[derive(Debug, Clone, clap::Args)]
pub struct EditorArgs {
    /// App id
    pub app: Id,

    /// Version to load (0 is the draft)
    #[arg(id = "target_version", value_name = "VERSION", default_value_t = EDIT_VERSION)]
    pub version: Version,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
