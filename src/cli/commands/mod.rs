//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which opens the
//! configured database and routes CLI subcommands to their implementations.
//! Commands write JSON to the writer they are given.

pub mod app;
pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod duplicate;
pub mod editor;
pub mod release;
pub mod user;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
