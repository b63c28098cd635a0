//! Presentation director.
//!
//! The director owns the phase tracker and the collaborator handles and
//! drives the single scripted run: landing intro, the begin action, the
//! globe bridge, the timed transition chain, and the letter with its
//! typewriter, countdown, and interaction choreographies.
//!
//! `begin` is consumed exactly once. Everything after it is a straight
//! line: phases advance in fixed order through the compare-and-swap
//! tracker and can never re-enter an earlier phase.

pub mod accept;
pub mod countdown;
pub mod globe;
pub mod intro;
pub mod retry;
pub mod typewriter;

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;

pub use accept::AcceptAction;
pub use globe::{GlobeOutcome, GlobeProbe};
pub use retry::{Escalation, RetryChoreography};
pub use typewriter::TypewriterQueue;

use crate::phase::{Phase, PhaseTracker};
use crate::script::Script;
use crate::sequence::Anchor;
use crate::stage::{GlobeRenderer, ParticleCannon, Stage, Starfield, StarfieldHandle};

// ============================================================================
// Director
// ============================================================================

/// Drives one presentation from landing to letter.
pub struct Director {
    script: Arc<Script>,
    stage: Arc<dyn Stage>,
    starfield: Arc<dyn Starfield>,
    globe: Arc<dyn GlobeRenderer>,
    cannon: Option<Arc<dyn ParticleCannon>>,
    tracker: Arc<PhaseTracker>,
    begun: AtomicBool,
    starfield_handle: Mutex<Option<StarfieldHandle>>,
    retry: Arc<RetryChoreography>,
    accept: AcceptAction,
}

impl Director {
    /// Creates a director over the given script and collaborators.
    ///
    /// A missing particle cannon is a supported configuration: accept still
    /// completes, only the bursts are skipped.
    #[must_use]
    pub fn new(
        script: Arc<Script>,
        stage: Arc<dyn Stage>,
        starfield: Arc<dyn Starfield>,
        globe: Arc<dyn GlobeRenderer>,
        cannon: Option<Arc<dyn ParticleCannon>>,
    ) -> Self {
        let retry = Arc::new(RetryChoreography::new(script.retry.clone()));
        let accept = AcceptAction::new(script.accept.clone());
        Self {
            script,
            stage,
            starfield,
            globe,
            cannon,
            tracker: Arc::new(PhaseTracker::new()),
            begun: AtomicBool::new(false),
            starfield_handle: Mutex::new(None),
            retry,
            accept,
        }
    }

    /// Replaces the retry choreography with a seeded one, for reproducible
    /// relocation offsets.
    #[must_use]
    pub fn with_retry_seed(mut self, seed: u64) -> Self {
        self.retry = Arc::new(RetryChoreography::with_seed(self.script.retry.clone(), seed));
        self
    }

    /// Current phase of the presentation.
    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.tracker.current()
    }

    /// Whether the begin action has been consumed.
    #[must_use]
    pub fn has_begun(&self) -> bool {
        self.begun.load(Ordering::SeqCst)
    }

    /// Opens the presentation on the landing phase: starfield running,
    /// begin control locked until the intro lines have played.
    pub fn open(&self) {
        tracing::info!(title = %self.script.title, "presentation opened");
        self.stage.activate(Phase::Landing);
        self.stage.set_begin_enabled(false);

        let handle = self.starfield.start();
        *self
            .starfield_handle
            .lock()
            .expect("starfield handle lock poisoned") = Some(handle);

        intro::spawn_intro(&self.stage, &self.tracker, &self.script.intro);
    }

    /// Consumes the begin action and plays the rest of the presentation.
    ///
    /// The first caller wins; every later invocation is a silent no-op.
    /// Returns when the letter phase is active and its long-running tasks
    /// have been spawned.
    pub async fn begin(&self) {
        if self.begun.swap(true, Ordering::SeqCst) {
            tracing::trace!("begin already consumed, ignoring");
            return;
        }
        tracing::info!("begin consumed");

        self.stage.set_begin_enabled(false);
        self.stop_starfield();
        self.stage.deactivate(Phase::Landing);

        tokio::time::sleep(Duration::from_millis(self.script.intro.begin_fade_ms)).await;
        if !self.tracker.try_advance(Phase::Landing) {
            tracing::warn!(phase = %self.tracker.current(), "phase advance rejected");
            return;
        }
        self.stage.activate(Phase::Globe);

        match globe::run_globe_sequence(&self.stage, &self.globe, &self.script.globe).await {
            GlobeOutcome::Played => tracing::debug!("globe sequence played"),
            GlobeOutcome::Skipped => {
                tracing::info!("globe unavailable, going straight to the letter");
            }
        }

        self.transition_to_letter().await;
    }

    /// Retry interaction: escalates through the scripted ladder, exhausted
    /// after the control disappears. Ignored once accept has retired the
    /// controls.
    pub fn trigger_retry(&self) {
        if !self.tracker.is_complete() {
            tracing::trace!(phase = %self.tracker.current(), "retry before letter, ignored");
            return;
        }
        if self.accept.is_done() {
            tracing::trace!("retry after accept, ignored");
            return;
        }
        self.retry.on_trigger(&self.stage);
    }

    /// Accept interaction: hides the controls, fires the bursts, reveals
    /// the accepted display. Consumed exactly once.
    pub fn trigger_accept(&self) {
        if !self.tracker.is_complete() {
            tracing::trace!(phase = %self.tracker.current(), "accept before letter, ignored");
            return;
        }
        self.accept.trigger(&self.stage, self.cannon.as_ref());
    }

    /// Stops the starfield through its teardown handle. The handle is taken
    /// out of its slot, so the stop runs at most once.
    fn stop_starfield(&self) {
        let handle = self
            .starfield_handle
            .lock()
            .expect("starfield handle lock poisoned")
            .take();
        if let Some(handle) = handle {
            handle.stop();
            tracing::debug!("starfield stopped");
        } else {
            tracing::trace!("no starfield handle to stop");
        }
    }

    /// Plays the timed transition chain and activates the letter.
    async fn transition_to_letter(&self) {
        if !self.tracker.try_advance(Phase::Globe) {
            tracing::warn!(phase = %self.tracker.current(), "transition rejected");
            return;
        }
        tracing::debug!("transition begun");

        let cfg = &self.script.transition;
        let anchor = Anchor::now();
        let fade = Duration::from_millis(cfg.globe_fade_ms);
        let theme = fade + Duration::from_millis(cfg.theme_delay_ms);
        let letter = theme + Duration::from_millis(cfg.letter_delay_ms);

        anchor.reached(fade).await;
        self.stage.deactivate(Phase::Globe);

        anchor.reached(theme).await;
        self.stage.apply_theme();

        anchor.reached(letter).await;
        if !self.tracker.try_advance(Phase::Transition) {
            tracing::warn!(phase = %self.tracker.current(), "letter activation rejected");
            return;
        }
        self.stage.activate(Phase::Letter);
        self.stage.unlock_scroll();
        self.spawn_letter_tasks();
        tracing::info!("letter active");
    }

    /// Kicks off the letter's long-running tasks. The countdown runs for
    /// the life of the presentation.
    fn spawn_letter_tasks(&self) {
        let stage = Arc::clone(&self.stage);
        let letter = self.script.letter.clone();
        drop(tokio::spawn(async move {
            typewriter::reveal(stage.as_ref(), &letter).await;
        }));

        let stage = Arc::clone(&self.stage);
        let countdown = self.script.countdown.clone();
        drop(tokio::spawn(async move {
            countdown::run(stage.as_ref(), &countdown).await;
        }));

        self.stage
            .spawn_ambient_particles(self.script.letter.ambient_particles);
    }
}

impl fmt::Debug for Director {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Director")
            .field("phase", &self.tracker.current())
            .field("begun", &self.begun.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Timeline
// ============================================================================

/// One row of the presentation's nominal schedule.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineCue {
    /// Milliseconds after the begin action.
    pub offset_ms: u64,
    /// Which part of the presentation the cue belongs to.
    pub channel: &'static str,
    /// Human-readable cue text.
    pub description: String,
}

fn cue(offset_ms: u64, channel: &'static str, description: String) -> TimelineCue {
    TimelineCue {
        offset_ms,
        channel,
        description,
    }
}

/// Computes the nominal schedule for a script, with the begin action at
/// offset zero and the globe renderer assumed ready on the first poll.
///
/// The live run anchors each stretch when it actually starts, so real
/// offsets shift uniformly when polling or settling run long.
#[must_use]
pub fn timeline(script: &Script) -> Vec<TimelineCue> {
    let globe = &script.globe;
    let letter = &script.letter;
    let mut cues = vec![cue(
        0,
        "phase",
        "begin consumed; controls lock, starfield stops, landing fades".to_string(),
    )];

    let globe_at = script.intro.begin_fade_ms;
    cues.push(cue(globe_at, "phase", "globe phase activates".to_string()));

    let arc_start = globe_at + globe.settle_ms;
    cues.push(cue(
        arc_start,
        "globe",
        format!("arc launches ({})", globe.status_launched),
    ));
    cues.push(cue(
        arc_start + globe.arc_ms * 3 / 4,
        "globe",
        format!("status: {}", globe.status_arriving),
    ));
    cues.push(cue(
        arc_start + globe.arc_ms * 4 / 5,
        "globe",
        format!("counter reaches {}", globe.counter_target),
    ));
    cues.push(cue(
        arc_start + globe.arc_ms,
        "globe",
        format!("status: {}", globe.status_delivered),
    ));
    let established = arc_start + globe.arc_ms + globe.established_delay_ms;
    cues.push(cue(
        established,
        "globe",
        format!("established indicator ({})", globe.established_text),
    ));

    let resolve = established + globe.established_hold_ms;
    cues.push(cue(
        resolve,
        "phase",
        "globe sequence resolves; transition begins".to_string(),
    ));

    let transition = &script.transition;
    cues.push(cue(
        resolve + transition.globe_fade_ms,
        "stage",
        "globe fades out".to_string(),
    ));
    let theme = resolve + transition.globe_fade_ms + transition.theme_delay_ms;
    cues.push(cue(theme, "stage", "romantic theme applies".to_string()));

    let letter_at = theme + transition.letter_delay_ms;
    cues.push(cue(
        letter_at,
        "phase",
        format!(
            "letter phase activates; scroll unlocks, {} ambient particles",
            letter.ambient_particles
        ),
    ));
    cues.push(cue(
        letter_at,
        "letter",
        "countdown starts ticking every 1000 ms".to_string(),
    ));

    let typing_at = letter_at + letter.start_delay_ms;
    cues.push(cue(typing_at, "letter", "typing begins".to_string()));

    let mut typing = 0u64;
    for (index, block) in letter.blocks.iter().enumerate() {
        if index > 0 {
            typing += letter.block_pause_ms;
        }
        typing += letter.char_interval_ms * block.chars().count() as u64;
    }
    let typed = typing_at + typing;
    cues.push(cue(typed, "letter", "letter fully revealed".to_string()));
    cues.push(cue(
        typed + letter.cursor_hold_ms,
        "letter",
        "cursor retires".to_string(),
    ));

    cues.sort_by_key(|c| c.offset_ms);
    cues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_is_chronological() {
        let cues = timeline(&Script::default());
        assert!(!cues.is_empty());
        for pair in cues.windows(2) {
            assert!(pair[0].offset_ms <= pair[1].offset_ms);
        }
    }

    #[test]
    fn timeline_matches_default_script_arithmetic() {
        let script = Script::default();
        let cues = timeline(&script);
        let offset_of = |needle: &str| {
            cues.iter()
                .find(|c| c.description.contains(needle))
                .map(|c| c.offset_ms)
                .unwrap_or_else(|| panic!("missing cue: {needle}"))
        };

        assert_eq!(offset_of("globe phase activates"), 400);
        assert_eq!(offset_of("arc launches"), 1_000);
        assert_eq!(offset_of("arriving"), 4_000);
        assert_eq!(offset_of("counter reaches"), 4_200);
        assert_eq!(offset_of("delivered"), 5_000);
        assert_eq!(offset_of("established indicator"), 5_800);
        assert_eq!(offset_of("transition begins"), 8_300);
        assert_eq!(offset_of("romantic theme"), 9_300);
        assert_eq!(offset_of("letter phase activates"), 10_500);
        assert_eq!(offset_of("typing begins"), 11_400);
    }

    #[test]
    fn timeline_letter_math_counts_chars_and_pauses() {
        let mut script = Script::default();
        script.letter.blocks = vec!["ab".to_string(), "c".to_string()];
        let cues = timeline(&script);
        let offset_of = |needle: &str| {
            cues.iter()
                .find(|c| c.description.contains(needle))
                .map(|c| c.offset_ms)
                .unwrap_or_else(|| panic!("missing cue: {needle}"))
        };

        // Typing starts at 11 400; two chars, a pause, then one more char.
        assert_eq!(offset_of("fully revealed"), 11_400 + 50 + 400 + 25);
        assert_eq!(offset_of("cursor retires"), 11_875 + 1_200);
    }
}
