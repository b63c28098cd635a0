//! CLI command dispatch and handlers.
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod run;
pub mod timeline;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use crate::cli::args::{Cli, Commands};
use crate::error::OvertureError;
use crate::script::{self, Script};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), OvertureError> {
    match cli.command {
        Commands::Run(args) => run::run(&args).await,
        Commands::Validate(args) => validate::run(&args).await,
        Commands::Timeline(args) => timeline::run(&args).await,
    }
}

/// Loads a script file, logging its warnings, or falls back to the
/// built-in defaults when no path was given.
pub(crate) fn load_script_or_default(path: Option<&Path>) -> Result<Arc<Script>, OvertureError> {
    match path {
        Some(path) => {
            let loaded = script::load_script(path)?;
            for warning in &loaded.warnings {
                tracing::warn!("{warning}");
            }
            Ok(loaded.script)
        }
        None => {
            tracing::debug!("no script given, playing the built-in defaults");
            Ok(Arc::new(Script::default()))
        }
    }
}
