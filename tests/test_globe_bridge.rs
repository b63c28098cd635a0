//! Globe synchronization bridge: bounded availability polling, the eased
//! counter, and the anchored status cues.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeGlobe, RecordingStage, brisk_script};
use overture::director::globe::{GlobeOutcome, run_globe_sequence};
use overture::stage::{GlobeRenderer, Stage, StageEvent};

#[tokio::test(start_paused = true)]
async fn unavailable_renderer_resolves_within_one_interval() {
    let script = brisk_script();
    let stage = RecordingStage::new();
    let stage_dyn: Arc<dyn Stage> = stage.clone();
    let globe = FakeGlobe::never();
    let globe_dyn: Arc<dyn GlobeRenderer> = globe.clone();

    let start = tokio::time::Instant::now();
    let outcome = run_globe_sequence(&stage_dyn, &globe_dyn, &script.globe).await;

    assert_eq!(outcome, GlobeOutcome::Skipped);
    // Five checks with four 10 ms waits between them; the final failed
    // check resolves without a trailing wait.
    assert_eq!(start.elapsed(), Duration::from_millis(40));
    assert_eq!(globe.poll_count(), 5);
    assert_eq!(stage.len(), 0, "a skipped sequence must not touch the stage");
}

#[tokio::test(start_paused = true)]
async fn late_renderer_still_plays() {
    let script = brisk_script();
    let stage = RecordingStage::new();
    let stage_dyn: Arc<dyn Stage> = stage.clone();
    let globe = FakeGlobe::ready_after(3);
    let globe_dyn: Arc<dyn GlobeRenderer> = globe.clone();

    let outcome = run_globe_sequence(&stage_dyn, &globe_dyn, &script.globe).await;

    assert_eq!(outcome, GlobeOutcome::Played);
    assert!(globe.scene().is_some());
    assert_eq!(globe.poll_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn counter_runs_from_zero_to_exact_target() {
    let script = brisk_script();
    let stage = RecordingStage::new();
    let stage_dyn: Arc<dyn Stage> = stage.clone();
    let globe_dyn: Arc<dyn GlobeRenderer> = FakeGlobe::ready();

    run_globe_sequence(&stage_dyn, &globe_dyn, &script.globe).await;

    let values = stage.counter_values();
    assert!(!values.is_empty());
    assert_eq!(values[0], 0, "the counter starts from zero");
    assert_eq!(
        *values.last().unwrap(),
        script.globe.counter_target,
        "the final frame renders the target exactly"
    );
    for pair in values.windows(2) {
        assert!(pair[0] <= pair[1], "counter must never run backwards");
    }
}

#[tokio::test(start_paused = true)]
async fn status_cues_fire_in_arc_order() {
    let script = brisk_script();
    let stage = RecordingStage::new();
    let stage_dyn: Arc<dyn Stage> = stage.clone();
    let globe_dyn: Arc<dyn GlobeRenderer> = FakeGlobe::ready();

    let start = tokio::time::Instant::now();
    run_globe_sequence(&stage_dyn, &globe_dyn, &script.globe).await;

    // settle + arc + established delay + display hold
    assert_eq!(start.elapsed(), Duration::from_millis(20 + 1_000 + 80 + 100));

    let pos = |event: StageEvent| {
        stage
            .position(|e| *e == event)
            .unwrap_or_else(|| panic!("missing event: {event:?}"))
    };
    let launched = pos(StageEvent::ArcStatus(script.globe.status_launched.clone()));
    let arriving = pos(StageEvent::ArcStatus(script.globe.status_arriving.clone()));
    let delivered = pos(StageEvent::ArcStatus(script.globe.status_delivered.clone()));
    let established = pos(StageEvent::Established(script.globe.established_text.clone()));

    assert!(launched < arriving);
    assert!(arriving < delivered);
    assert!(delivered < established);
}

#[tokio::test(start_paused = true)]
async fn scene_is_built_from_the_script() {
    let script = brisk_script();
    let stage = RecordingStage::new();
    let stage_dyn: Arc<dyn Stage> = stage.clone();
    let globe = FakeGlobe::ready();
    let globe_dyn: Arc<dyn GlobeRenderer> = globe.clone();

    run_globe_sequence(&stage_dyn, &globe_dyn, &script.globe).await;

    let scene = globe.scene().expect("scene should be configured");
    assert_eq!(scene.width, 1280);
    assert_eq!(scene.height, 720);
    assert_eq!(scene.markers.len(), 2);
    assert_eq!(scene.markers[0].label, script.globe.origin.label);
    assert_eq!(scene.markers[1].label, script.globe.destination.label);
    assert_eq!(scene.arcs.len(), 1);
    assert_eq!(scene.arcs[0].animate_ms, script.globe.arc_ms);
    assert_eq!(scene.arcs[0].start_lat, script.globe.origin.lat);
    assert_eq!(scene.arcs[0].end_lat, script.globe.destination.lat);
}
