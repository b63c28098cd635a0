//! Globe synchronization bridge.
//!
//! Waits for the external globe renderer, configures it, and plays the
//! scripted arc sequence: an eased distance counter rendered every frame
//! plus status cues at fixed fractions of the arc duration. Everything is
//! scheduled against the single anchor captured when the arc begins, so the
//! cues' relative order holds by construction; the anchor itself may sit
//! later than nominal if polling or settling ran long, which shifts the
//! whole schedule uniformly.
//!
//! The availability poll is bounded. A renderer that never loads resolves
//! the sequence immediately: the presentation must never deadlock on a
//! missing dependency.

use std::sync::Arc;
use std::time::Duration;

use crate::script::GlobeSection;
use crate::sequence::{Anchor, frame_interval, spawn_cue};
use crate::stage::{ArcPath, GlobeRenderer, GlobeScene, Marker, PointOfView, Stage, Viewport};

/// Fraction of the arc duration after which the counter completes.
const COUNT_FRACTION: f64 = 0.8;

/// Fraction of the arc duration at which the arriving status shows.
const ARRIVING_FRACTION: f64 = 0.75;

/// Outcome of one availability poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobeProbe {
    /// The renderer is loaded and can be configured.
    Ready,
    /// The renderer never became available within the polling window.
    Unavailable,
}

/// Outcome of the full sequence, for the caller's log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobeOutcome {
    /// The arc sequence ran to completion.
    Played,
    /// The renderer was unavailable and the sequence fell through.
    Skipped,
}

/// Cubic ease-out counter value at progress `p` (clamped to `0..=1`).
///
/// At `p = 1` the value equals `target` exactly.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn eased_counter(progress: f64, target: u64) -> u64 {
    let p = progress.clamp(0.0, 1.0);
    let eased = 1.0 - (1.0 - p).powi(3);
    (eased * target as f64).round() as u64
}

/// Polls the renderer's availability at a fixed interval, a bounded number
/// of times. Resolves immediately after the final failed attempt; there is
/// no trailing sleep.
pub async fn poll_renderer(globe: &dyn GlobeRenderer, cfg: &GlobeSection) -> GlobeProbe {
    let interval = Duration::from_millis(cfg.poll_interval_ms);
    for attempt in 1..=cfg.poll_attempts {
        if globe.is_ready() {
            tracing::debug!(attempt, "globe renderer ready");
            return GlobeProbe::Ready;
        }
        if attempt < cfg.poll_attempts {
            tokio::time::sleep(interval).await;
        }
    }
    tracing::warn!(
        attempts = cfg.poll_attempts,
        "globe renderer unavailable, skipping arc sequence"
    );
    GlobeProbe::Unavailable
}

/// Runs the scripted globe sequence to completion.
///
/// Returns once the arc, the established indicator, and its display hold
/// have all finished, or immediately when the renderer is unavailable.
/// Resolves exactly once and never fails.
pub async fn run_globe_sequence(
    stage: &Arc<dyn Stage>,
    globe: &Arc<dyn GlobeRenderer>,
    cfg: &GlobeSection,
) -> GlobeOutcome {
    if poll_renderer(globe.as_ref(), cfg).await == GlobeProbe::Unavailable {
        return GlobeOutcome::Skipped;
    }

    globe.configure(&build_scene(cfg, stage.viewport()));
    tokio::time::sleep(Duration::from_millis(cfg.settle_ms)).await;

    // One anchor for the whole arc; every offset below is absolute.
    let anchor = Anchor::now();
    let arc = Duration::from_millis(cfg.arc_ms);
    let established_offset = arc + Duration::from_millis(cfg.established_delay_ms);
    let resolve_offset = established_offset + Duration::from_millis(cfg.established_hold_ms);

    stage.set_arc_status(&cfg.status_launched);
    tracing::debug!(arc_ms = cfg.arc_ms, "arc launched");

    spawn_counter(stage, &anchor, arc.mul_f64(COUNT_FRACTION), cfg);

    schedule_status(stage, &anchor, arc.mul_f64(ARRIVING_FRACTION), &cfg.status_arriving);
    schedule_status(stage, &anchor, arc, &cfg.status_delivered);

    let established_stage = Arc::clone(stage);
    let established_text = cfg.established_text.clone();
    drop(spawn_cue(&anchor, established_offset, move || {
        established_stage.show_established(&established_text);
        tracing::debug!("connection established");
    }));

    anchor.reached(resolve_offset).await;
    tracing::debug!("globe sequence resolved");
    GlobeOutcome::Played
}

/// Spawns the frame-driven counter: eased from 0 to the target over
/// `count_duration`, with a final render of the exact target value.
fn spawn_counter(
    stage: &Arc<dyn Stage>,
    anchor: &Anchor,
    count_duration: Duration,
    cfg: &GlobeSection,
) {
    let stage = Arc::clone(stage);
    let anchor = *anchor;
    let frame = Duration::from_millis(cfg.frame_interval_ms);
    let target = cfg.counter_target;
    drop(tokio::spawn(async move {
        let mut ticks = frame_interval(frame);
        loop {
            ticks.tick().await;
            let p = if count_duration.is_zero() {
                1.0
            } else {
                anchor.elapsed().as_secs_f64() / count_duration.as_secs_f64()
            };
            stage.set_counter(eased_counter(p, target));
            if p >= 1.0 {
                break;
            }
        }
    }));
}

fn schedule_status(stage: &Arc<dyn Stage>, anchor: &Anchor, offset: Duration, text: &str) {
    let stage = Arc::clone(stage);
    let text = text.to_string();
    drop(spawn_cue(anchor, offset, move || {
        stage.set_arc_status(&text);
    }));
}

/// Builds the renderer scene from the script: both endpoints marked, one
/// animated arc between them, camera over the origin.
fn build_scene(cfg: &GlobeSection, viewport: Viewport) -> GlobeScene {
    let visual = &cfg.visual;
    GlobeScene {
        globe_texture: visual.globe_texture.clone(),
        background_texture: visual.background_texture.clone(),
        width: viewport.width,
        height: viewport.height,
        atmosphere_color: visual.atmosphere_color.clone(),
        atmosphere_altitude: visual.atmosphere_altitude,
        pov: PointOfView {
            lat: cfg.origin.lat,
            lng: cfg.origin.lng,
            altitude: visual.pov_altitude,
            transition_ms: visual.pov_transition_ms,
        },
        markers: vec![
            Marker {
                lat: cfg.origin.lat,
                lng: cfg.origin.lng,
                label: cfg.origin.label.clone(),
                color: visual.marker_color.clone(),
            },
            Marker {
                lat: cfg.destination.lat,
                lng: cfg.destination.lng,
                label: cfg.destination.label.clone(),
                color: visual.marker_color.clone(),
            },
        ],
        arcs: vec![ArcPath {
            start_lat: cfg.origin.lat,
            start_lng: cfg.origin.lng,
            end_lat: cfg.destination.lat,
            end_lng: cfg.destination.lng,
            colors: visual.arc_colors.clone(),
            dash_length: visual.arc_dash_length,
            dash_gap: visual.arc_dash_gap,
            animate_ms: cfg.arc_ms,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NeverReady;

    impl GlobeRenderer for NeverReady {
        fn is_ready(&self) -> bool {
            false
        }
        fn configure(&self, _scene: &GlobeScene) {}
    }

    /// Becomes ready on the nth `is_ready` call.
    struct EventuallyReady {
        calls: AtomicUsize,
        ready_on: usize,
    }

    impl GlobeRenderer for EventuallyReady {
        fn is_ready(&self) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst) + 1 >= self.ready_on
        }
        fn configure(&self, _scene: &GlobeScene) {}
    }

    fn cfg(attempts: u32) -> GlobeSection {
        GlobeSection {
            poll_attempts: attempts,
            ..GlobeSection::default()
        }
    }

    #[test]
    fn eased_counter_starts_at_zero_and_ends_exact() {
        assert_eq!(eased_counter(0.0, 9_862), 0);
        assert_eq!(eased_counter(1.0, 9_862), 9_862);
        assert_eq!(eased_counter(2.5, 9_862), 9_862);
        assert_eq!(eased_counter(-1.0, 9_862), 0);
    }

    #[test]
    fn eased_counter_is_monotonic() {
        let target = 9_862;
        let mut last = 0;
        for i in 0..=100 {
            let value = eased_counter(f64::from(i) / 100.0, target);
            assert!(value >= last, "counter went backwards at step {i}");
            last = value;
        }
        assert_eq!(last, target);
    }

    #[test]
    fn eased_counter_front_loads_progress() {
        // Cubic ease-out covers most of the distance in the first half.
        let halfway = eased_counter(0.5, 1000);
        assert!(halfway > 800, "expected front-loaded easing, got {halfway}");
    }

    #[tokio::test(start_paused = true)]
    async fn unavailable_renderer_resolves_after_final_attempt() {
        let start = tokio::time::Instant::now();
        let probe = poll_renderer(&NeverReady, &cfg(5)).await;
        assert_eq!(probe, GlobeProbe::Unavailable);
        // Five checks, four sleeps between them, no trailing sleep.
        assert_eq!(start.elapsed(), Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_resolve_immediately() {
        let start = tokio::time::Instant::now();
        let probe = poll_renderer(&NeverReady, &cfg(0)).await;
        assert_eq!(probe, GlobeProbe::Unavailable);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn late_renderer_is_found() {
        let globe = EventuallyReady {
            calls: AtomicUsize::new(0),
            ready_on: 4,
        };
        let start = tokio::time::Instant::now();
        let probe = poll_renderer(&globe, &cfg(50)).await;
        assert_eq!(probe, GlobeProbe::Ready);
        assert_eq!(start.elapsed(), Duration::from_millis(600));
    }

    #[test]
    fn scene_covers_both_endpoints() {
        let section = GlobeSection::default();
        let scene = build_scene(
            &section,
            Viewport {
                width: 800,
                height: 600,
            },
        );
        assert_eq!(scene.markers.len(), 2);
        assert_eq!(scene.arcs.len(), 1);
        assert_eq!(scene.width, 800);
        let arc = &scene.arcs[0];
        assert_eq!(arc.start_lat, section.origin.lat);
        assert_eq!(arc.end_lng, section.destination.lng);
        assert_eq!(arc.animate_ms, section.arc_ms);
    }
}
