//! appstate CLI entry point.

use std::io::Write;
use std::process::ExitCode;

use appstate::cli::{Cli, CommandDispatcher};
use appstate::config::load_config;
use appstate::StateError;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so stdout carries only command output.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("appstate=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("appstate=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> appstate::Result<i32> {
    let working_dir = std::env::current_dir()?;
    let mut config = load_config(cli.config.as_deref(), &working_dir)?;
    if let Some(db) = &cli.db {
        config.store.path = db.clone();
    }

    tracing::debug!("Using database at {}", config.store.path.display());

    let dispatcher = CommandDispatcher::new(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = dispatcher.dispatch(cli, &mut out)?;
    out.flush()?;
    Ok(result.exit_code)
}

fn exit_code_for(error: &StateError) -> u8 {
    if error.is_not_found() {
        2
    } else {
        1
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("appstate starting with args: {:?}", cli);

    match run(&cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}
