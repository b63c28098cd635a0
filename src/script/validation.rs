//! Script validation.
//!
//! Semantic validation of a deserialized [`Script`]. Runs after YAML
//! parsing and collects ALL issues rather than stopping at the first, so a
//! script author sees every problem in one pass. Errors prevent the script
//! from loading; warnings are logged and the script plays anyway.

use chrono::Utc;

use crate::error::{Severity, ValidationIssue};
use crate::script::schema::Script;

/// Number of retry messages the escalation ladder requires.
pub const RETRY_MESSAGE_COUNT: usize = 3;

/// Upper bound on the per-character interval before a script is considered
/// unplayable rather than merely slow.
const MAX_CHAR_INTERVAL_MS: u64 = 10_000;

// ============================================================================
// Public API
// ============================================================================

/// Result of script validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Script validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a script and returns every issue found.
    pub fn validate(&mut self, script: &Script) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_intro(script);
        self.validate_globe(script);
        self.validate_letter(script);
        self.validate_retry(script);
        self.validate_countdown(script);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue::error(path, message));
    }

    fn warning(&mut self, path: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::warning(path, message));
    }

    // ------------------------------------------------------------------
    // Section checks
    // ------------------------------------------------------------------

    fn validate_intro(&mut self, script: &Script) {
        if script.intro.lines.is_empty() {
            self.error("intro.lines", "at least one intro line is required");
        }
    }

    fn validate_globe(&mut self, script: &Script) {
        let globe = &script.globe;

        if globe.arc_ms == 0 {
            self.error("globe.arc_ms", "arc duration must be non-zero");
        }
        if globe.frame_interval_ms == 0 {
            self.error("globe.frame_interval_ms", "frame interval must be non-zero");
        }
        if globe.poll_attempts == 0 {
            self.warning(
                "globe.poll_attempts",
                "zero poll attempts: the globe sequence will always be skipped",
            );
        }
        if globe.counter_target == 0 {
            self.warning(
                "globe.counter_target",
                "counter target is zero; the counter will not move",
            );
        }
    }

    fn validate_letter(&mut self, script: &Script) {
        let letter = &script.letter;

        if letter.blocks.is_empty() {
            self.warning(
                "letter.blocks",
                "no text blocks: the letter phase will be empty",
            );
        }
        if letter.char_interval_ms > MAX_CHAR_INTERVAL_MS {
            self.error(
                "letter.char_interval_ms",
                format!(
                    "character interval {}ms exceeds the {MAX_CHAR_INTERVAL_MS}ms maximum",
                    letter.char_interval_ms
                ),
            );
        }
    }

    fn validate_retry(&mut self, script: &Script) {
        let count = script.retry.messages.len();
        if count != RETRY_MESSAGE_COUNT {
            self.error(
                "retry.messages",
                format!("expected exactly {RETRY_MESSAGE_COUNT} messages, got {count}"),
            );
        }
    }

    fn validate_countdown(&mut self, script: &Script) {
        if script.countdown.target <= Utc::now() {
            self.warning(
                "countdown.target",
                "target is in the past; the countdown will render its completion text",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn default_script_validates_cleanly() {
        let script = Script::default();
        let result = Validator::new().validate(&script);
        assert!(result.is_valid(), "errors: {:?}", result.errors);
    }

    #[test]
    fn wrong_retry_arity_is_an_error() {
        let mut script = Script::default();
        script.retry.messages.pop();
        let result = Validator::new().validate(&script);
        assert!(result.has_errors());
        assert!(
            result
                .errors
                .iter()
                .any(|i| i.path == "retry.messages" && i.severity == Severity::Error)
        );
    }

    #[test]
    fn zero_arc_duration_is_an_error() {
        let mut script = Script::default();
        script.globe.arc_ms = 0;
        let result = Validator::new().validate(&script);
        assert!(result.errors.iter().any(|i| i.path == "globe.arc_ms"));
    }

    #[test]
    fn zero_poll_attempts_is_a_warning_only() {
        let mut script = Script::default();
        script.globe.poll_attempts = 0;
        let result = Validator::new().validate(&script);
        assert!(result.is_valid());
        assert!(
            result
                .warnings
                .iter()
                .any(|i| i.path == "globe.poll_attempts")
        );
    }

    #[test]
    fn past_target_is_a_warning() {
        let mut script = Script::default();
        script.countdown.target = Utc::now() - Duration::days(1);
        let result = Validator::new().validate(&script);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|i| i.path == "countdown.target"));
    }

    #[test]
    fn empty_blocks_warn_but_pass() {
        let mut script = Script::default();
        script.letter.blocks.clear();
        let result = Validator::new().validate(&script);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|i| i.path == "letter.blocks"));
    }

    #[test]
    fn all_issues_are_collected_in_one_pass() {
        let mut script = Script::default();
        script.retry.messages.clear();
        script.globe.arc_ms = 0;
        script.globe.frame_interval_ms = 0;
        script.intro.lines.clear();
        let result = Validator::new().validate(&script);
        assert_eq!(result.errors.len(), 4);
    }
}
