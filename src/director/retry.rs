//! Escalating retry interaction.
//!
//! The retry control resists activation harder on every attempt: shake,
//! shake then dart away, vanish. Three attempts, three messages, then every
//! further trigger is a silent no-op. Only the relocation offset is random;
//! the escalation itself is a fixed ladder keyed by the attempt count.
//!
//! The auto-clear and relocate cues are fire-and-forget. Each one is
//! stamped with the attempt it belongs to and checks the stamp when it
//! lands, so a cue firing after a newer attempt (or after the control is
//! gone) does nothing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::script::RetrySection;
use crate::sequence::{Anchor, spawn_cue};
use crate::stage::{Stage, Viewport};

/// The triggered behavior for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// Brief shake.
    Shake,
    /// Shake, then relocate to a bounded-random offset.
    ShakeAndRelocate,
    /// Permanently hide the control.
    Disappear,
}

/// Maps an attempt index (0-based, at time of call) to its behavior.
///
/// Returns `None` past the final attempt: the ladder is exhausted and the
/// trigger is a no-op.
#[must_use]
pub const fn escalation_for(attempt: usize) -> Option<Escalation> {
    match attempt {
        0 => Some(Escalation::Shake),
        1 => Some(Escalation::ShakeAndRelocate),
        2 => Some(Escalation::Disappear),
        _ => None,
    }
}

/// Retry interaction state for one session.
///
/// The attempt count only ever grows, and saturates at the number of
/// configured messages.
pub struct RetryChoreography {
    cfg: RetrySection,
    attempts: AtomicUsize,
    rng: Mutex<StdRng>,
}

impl RetryChoreography {
    /// Creates the interaction state with an OS-seeded offset generator.
    #[must_use]
    pub fn new(cfg: RetrySection) -> Self {
        Self::with_rng(cfg, StdRng::from_os_rng())
    }

    /// Creates the interaction state with a fixed seed, for deterministic
    /// relocation offsets.
    #[must_use]
    pub fn with_seed(cfg: RetrySection, seed: u64) -> Self {
        Self::with_rng(cfg, StdRng::seed_from_u64(seed))
    }

    fn with_rng(cfg: RetrySection, rng: StdRng) -> Self {
        Self {
            cfg,
            attempts: AtomicUsize::new(0),
            rng: Mutex::new(rng),
        }
    }

    /// Number of attempts made so far.
    #[must_use]
    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Handles one activation of the retry control.
    ///
    /// Shows the attempt's message, plays its escalation, and schedules the
    /// message clear. Past the final attempt this does nothing at all.
    pub fn on_trigger(self: &Arc<Self>, stage: &Arc<dyn Stage>) {
        let limit = self.cfg.messages.len();
        let claimed = self
            .attempts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| {
                if c >= limit { None } else { Some(c + 1) }
            });
        let Ok(attempt) = claimed else {
            tracing::trace!("retry exhausted, trigger ignored");
            return;
        };

        let Some(escalation) = escalation_for(attempt) else {
            // Unreachable with the standard three-message ladder; a script
            // with fewer messages saturates before reaching here.
            return;
        };
        tracing::debug!(attempt, ?escalation, "retry triggered");

        if let Some(message) = self.cfg.messages.get(attempt) {
            stage.set_retry_message(message);
        }

        let anchor = Anchor::now();
        match escalation {
            Escalation::Shake => {
                stage.shake_retry();
                self.schedule_clear(stage, &anchor, self.cfg.message_clear_ms, attempt);
            }
            Escalation::ShakeAndRelocate => {
                stage.shake_retry();
                self.schedule_relocate(stage, &anchor, attempt);
                self.schedule_clear(stage, &anchor, self.cfg.message_clear_ms, attempt);
            }
            Escalation::Disappear => {
                stage.hide_retry();
                // Final message clears when the hide animation ends.
                self.schedule_clear(stage, &anchor, self.cfg.hide_ms, attempt);
            }
        }
    }

    /// True while `attempt` is still the latest attempt.
    fn is_current(&self, attempt: usize) -> bool {
        self.attempts.load(Ordering::SeqCst) == attempt + 1
    }

    fn schedule_clear(
        self: &Arc<Self>,
        stage: &Arc<dyn Stage>,
        anchor: &Anchor,
        delay_ms: u64,
        attempt: usize,
    ) {
        let this = Arc::clone(self);
        let stage = Arc::clone(stage);
        drop(spawn_cue(anchor, Duration::from_millis(delay_ms), move || {
            if this.is_current(attempt) {
                stage.clear_retry_message();
            } else {
                tracing::trace!(attempt, "stale clear cue ignored");
            }
        }));
    }

    fn schedule_relocate(
        self: &Arc<Self>,
        stage: &Arc<dyn Stage>,
        anchor: &Anchor,
        attempt: usize,
    ) {
        let this = Arc::clone(self);
        let stage = Arc::clone(stage);
        drop(spawn_cue(
            anchor,
            Duration::from_millis(self.cfg.shake_ms),
            move || {
                if !this.is_current(attempt) {
                    tracing::trace!(attempt, "stale relocate cue ignored");
                    return;
                }
                let (dx, dy) = this.relocation_offset(stage.viewport());
                stage.relocate_retry(dx, dy);
            },
        ));
    }

    /// Draws a relocation offset, clamped so the control stays reachable on
    /// small viewports.
    fn relocation_offset(&self, viewport: Viewport) -> (i32, i32) {
        let bound_x = i32::try_from(self.cfg.max_offset_x.min(viewport.width / 4)).unwrap_or(0);
        let bound_y = i32::try_from(self.cfg.max_offset_y.min(viewport.height / 4)).unwrap_or(0);

        let mut rng = self.rng.lock().expect("rng lock poisoned");
        let dx = if bound_x == 0 {
            0
        } else {
            rng.random_range(-bound_x..=bound_x)
        };
        let dy = if bound_y == 0 {
            0
        } else {
            rng.random_range(-bound_y..=bound_y)
        };
        (dx, dy)
    }
}

impl std::fmt::Debug for RetryChoreography {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryChoreography")
            .field("attempts", &self.attempt_count())
            .field("messages", &self.cfg.messages.len())
            .finish_non_exhaustive()
    }
}
