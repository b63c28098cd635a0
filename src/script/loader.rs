//! Script loading.
//!
//! Takes a path on disk to a validated, shareable [`Script`]: read the
//! file, parse the YAML, run semantic validation. Validation errors fail
//! the load; warnings ride along in the [`LoadResult`] for the caller to
//! log.

use std::path::Path;
use std::sync::Arc;

use crate::error::{ScriptError, ValidationIssue};
use crate::script::schema::Script;
use crate::script::validation::Validator;

/// A successfully loaded script plus any validation warnings.
#[derive(Debug)]
pub struct LoadResult {
    /// The validated script.
    pub script: Arc<Script>,

    /// Non-fatal issues found during validation.
    pub warnings: Vec<ValidationIssue>,
}

/// Loads and validates a script file.
///
/// # Errors
///
/// Returns [`ScriptError::Read`] if the file cannot be read,
/// [`ScriptError::Parse`] on YAML syntax errors, and
/// [`ScriptError::Validation`] when semantic validation fails.
pub fn load_script(path: &Path) -> Result<LoadResult, ScriptError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&raw, path)
}

/// Parses and validates script text. `origin` names the source in errors.
///
/// # Errors
///
/// Returns [`ScriptError::Parse`] on YAML syntax errors and
/// [`ScriptError::Validation`] when semantic validation fails.
pub fn parse_script(raw: &str, origin: &Path) -> Result<LoadResult, ScriptError> {
    let script: Script = serde_yaml::from_str(raw).map_err(|e| ScriptError::Parse {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;

    let result = Validator::new().validate(&script);
    if result.has_errors() {
        return Err(ScriptError::Validation {
            errors: result.errors,
        });
    }

    tracing::debug!(
        origin = %origin.display(),
        warnings = result.warnings.len(),
        "script loaded"
    );

    Ok(LoadResult {
        script: Arc::new(script),
        warnings: result.warnings,
    })
}
