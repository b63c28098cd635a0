//! Timing substrate: anchored cues and frame loops.
//!
//! Every timed sequence in the engine captures one [`Anchor`] and schedules
//! its effects at absolute offsets from it. Relative ordering of cues within
//! a sequence is then a property of the computed offsets, not of callback
//! nesting, and survives scheduler jitter between individual firings.
//!
//! One-shot cues carry no cancellation handle. A cue whose phase has ended
//! fires anyway and its effect is guarded where it lands; only frame loops
//! get a collective teardown token.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// A captured reference instant for one timed sequence.
#[derive(Debug, Clone, Copy)]
pub struct Anchor {
    origin: Instant,
}

impl Anchor {
    /// Captures the current instant.
    #[must_use]
    pub fn now() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// The absolute deadline for a cue at `offset`.
    #[must_use]
    pub fn deadline(&self, offset: Duration) -> Instant {
        self.origin + offset
    }

    /// Time elapsed since the anchor was captured.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Suspends until `offset` past the anchor. Returns immediately if the
    /// deadline has already passed.
    pub async fn reached(&self, offset: Duration) {
        tokio::time::sleep_until(self.deadline(offset)).await;
    }
}

/// Spawns a one-shot cue: `effect` runs once at `offset` past the anchor.
///
/// The returned handle is normally dropped (fire-and-forget); tests can
/// await it.
pub fn spawn_cue<F>(anchor: &Anchor, offset: Duration, effect: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    let anchor = *anchor;
    tokio::spawn(async move {
        anchor.reached(offset).await;
        effect();
    })
}

/// An interval suitable for animation frames: missed ticks are skipped,
/// never burst, so a stalled frame loop drops frames instead of replaying
/// them.
#[must_use]
pub fn frame_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Spawns a frame loop that invokes `on_frame` every `period` until the
/// token is cancelled.
pub fn spawn_frame_loop<F>(
    period: Duration,
    cancel: CancellationToken,
    mut on_frame: F,
) -> JoinHandle<()>
where
    F: FnMut() + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = frame_interval(period);
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::trace!("frame loop cancelled");
                    break;
                }
                _ = interval.tick() => {
                    on_frame();
                }
            }
        }
    })
}
