//! Landing intro: staggered line reveals, then the begin control unlocks.

use std::sync::Arc;
use std::time::Duration;

use crate::phase::{Phase, PhaseTracker};
use crate::script::IntroSection;
use crate::sequence::{Anchor, spawn_cue};
use crate::stage::Stage;

/// Schedules the intro line reveals and the final begin unlock.
///
/// Every cue re-checks the phase when it fires: a reveal that lands after
/// the presentation has already left the landing is dropped, never applied
/// retroactively.
pub fn spawn_intro(stage: &Arc<dyn Stage>, tracker: &Arc<PhaseTracker>, cfg: &IntroSection) {
    let anchor = Anchor::now();
    let interval = Duration::from_millis(cfg.line_interval_ms);
    let mut offset = Duration::ZERO;

    for (index, line) in cfg.lines.iter().enumerate() {
        offset += interval;
        let stage = Arc::clone(stage);
        let tracker = Arc::clone(tracker);
        let text = line.clone();
        drop(spawn_cue(&anchor, offset, move || {
            if tracker.current() == Phase::Landing {
                stage.reveal_intro_line(index, &text);
            } else {
                tracing::trace!(index, "intro line fired after landing, dropped");
            }
        }));
    }

    offset += interval;
    let stage = Arc::clone(stage);
    let tracker = Arc::clone(tracker);
    drop(spawn_cue(&anchor, offset, move || {
        if tracker.current() == Phase::Landing {
            stage.set_begin_enabled(true);
            tracing::debug!("begin control unlocked");
        }
    }));
}
