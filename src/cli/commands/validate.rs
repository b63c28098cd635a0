//! `validate` command: checks script files without playing them.

use crate::cli::args::ValidateArgs;
use crate::error::{OvertureError, ScriptError, ValidationIssue};
use crate::script;

/// Validate script files.
///
/// Stops at the first file that fails. With `--strict`, warnings are
/// promoted to errors.
///
/// # Errors
///
/// Returns a script error for the first file that fails to load, parse,
/// or validate.
#[allow(clippy::unused_async)] // dispatch awaits every command handler
pub async fn run(args: &ValidateArgs) -> Result<(), OvertureError> {
    for path in &args.files {
        tracing::info!(file = %path.display(), "validating script");
        let loaded = script::load_script(path)?;

        if args.strict && !loaded.warnings.is_empty() {
            let errors = loaded
                .warnings
                .iter()
                .map(|w| ValidationIssue::error(w.path.clone(), w.message.clone()))
                .collect();
            return Err(ScriptError::Validation { errors }.into());
        }
        for warning in &loaded.warnings {
            tracing::warn!("{warning}");
        }

        println!("{}: ok", path.display());
    }
    Ok(())
}
