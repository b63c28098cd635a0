//! Presentation phases and phase state.
//!
//! The four phases run strictly forward. Activation and deactivation of
//! phase containers is driven exclusively by the director; the tracker here
//! only records where the presentation is and enforces exactly-once
//! transitions via compare-and-exchange, so a duplicated trigger can never
//! advance twice.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::time::Instant;

/// A top-level presentation state.
///
/// Exactly one phase is active in the UI at a time. `Transition` is a
/// logical phase only: it has no container of its own, it covers the
/// scripted delay chain between the globe fading out and the letter
/// appearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Terminal-styled intro with the begin control.
    Landing,
    /// Globe arc animation and status overlay.
    Globe,
    /// Theme swap between Globe and Letter; no container.
    Transition,
    /// Typewriter letter, countdown, accept/retry controls.
    Letter,
}

impl Phase {
    /// All phases in presentation order.
    pub const ALL: [Self; 4] = [Self::Landing, Self::Globe, Self::Transition, Self::Letter];

    /// Zero-based position in the fixed phase order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Landing => 0,
            Self::Globe => 1,
            Self::Transition => 2,
            Self::Letter => 3,
        }
    }

    /// Stable lowercase name, used in logs and by frontends.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Globe => "globe",
            Self::Transition => "transition",
            Self::Letter => "letter",
        }
    }

    /// The phase following this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Landing => Some(Self::Globe),
            Self::Globe => Some(Self::Transition),
            Self::Transition => Some(Self::Letter),
            Self::Letter => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Atomic phase position for one presentation session.
///
/// The current phase index advances via CAS so each transition happens
/// exactly once even if triggered from more than one task. Phases never
/// move backwards and never repeat; `Letter` is terminal.
pub struct PhaseTracker {
    /// Current phase index, advanced via CAS
    current: AtomicUsize,
    /// Timestamp when the current phase was entered
    entered_at: Mutex<Instant>,
}

impl PhaseTracker {
    /// Creates a tracker starting at `Landing`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: AtomicUsize::new(Phase::Landing.index()),
            entered_at: Mutex::new(Instant::now()),
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn current(&self) -> Phase {
        Phase::ALL[self.current.load(Ordering::SeqCst)]
    }

    /// Returns `true` once the presentation has reached `Letter`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current() == Phase::Letter
    }

    /// Returns the instant when the current phase was entered.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn entered_at(&self) -> Instant {
        *self.entered_at.lock().expect("entered_at lock poisoned")
    }

    /// Attempts to atomically advance from `from` to its successor.
    ///
    /// Returns `true` if the transition happened. Fails (returns `false`)
    /// when the tracker is not currently at `from`, which covers both
    /// duplicate triggers and out-of-order attempts.
    pub fn try_advance(&self, from: Phase) -> bool {
        let Some(to) = from.next() else {
            return false;
        };
        let advanced = self
            .current
            .compare_exchange(from.index(), to.index(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if advanced {
            let mut entered = self.entered_at.lock().expect("entered_at lock poisoned");
            *entered = Instant::now();
            tracing::debug!(from = %from, to = %to, "phase advanced");
        }
        advanced
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PhaseTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseTracker")
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_at_landing() {
        let tracker = PhaseTracker::new();
        assert_eq!(tracker.current(), Phase::Landing);
        assert!(!tracker.is_complete());
    }

    #[test]
    fn advances_in_fixed_order() {
        let tracker = PhaseTracker::new();
        assert!(tracker.try_advance(Phase::Landing));
        assert_eq!(tracker.current(), Phase::Globe);
        assert!(tracker.try_advance(Phase::Globe));
        assert_eq!(tracker.current(), Phase::Transition);
        assert!(tracker.try_advance(Phase::Transition));
        assert_eq!(tracker.current(), Phase::Letter);
        assert!(tracker.is_complete());
    }

    #[test]
    fn letter_is_terminal() {
        let tracker = PhaseTracker::new();
        tracker.try_advance(Phase::Landing);
        tracker.try_advance(Phase::Globe);
        tracker.try_advance(Phase::Transition);
        assert!(!tracker.try_advance(Phase::Letter));
        assert_eq!(tracker.current(), Phase::Letter);
    }

    #[test]
    fn no_phase_is_reentered() {
        let tracker = PhaseTracker::new();
        assert!(tracker.try_advance(Phase::Landing));
        // A stale trigger from the phase we already left does nothing.
        assert!(!tracker.try_advance(Phase::Landing));
        assert_eq!(tracker.current(), Phase::Globe);
    }

    #[test]
    fn out_of_order_advance_fails() {
        let tracker = PhaseTracker::new();
        assert!(!tracker.try_advance(Phase::Globe));
        assert_eq!(tracker.current(), Phase::Landing);
    }

    #[test]
    fn concurrent_advance_only_one_wins() {
        let tracker = Arc::new(PhaseTracker::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let t = Arc::clone(&tracker);
            handles.push(thread::spawn(move || t.try_advance(Phase::Landing)));
        }

        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|&&r| r).count(), 1);
        assert_eq!(tracker.current(), Phase::Globe);
    }

    #[test]
    fn phase_names_are_stable() {
        assert_eq!(Phase::Landing.to_string(), "landing");
        assert_eq!(Phase::Letter.name(), "letter");
        for (i, phase) in Phase::ALL.iter().enumerate() {
            assert_eq!(phase.index(), i);
        }
    }
}
