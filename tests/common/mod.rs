//! Shared integration-test doubles: a recording stage and controllable
//! collaborator fakes.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use overture::script::Script;
use overture::stage::{
    BurstConfig, GlobeRenderer, GlobeScene, ParticleCannon, Stage, StageEvent, Starfield,
    StarfieldHandle, Viewport,
};

// ============================================================================
// Recording stage
// ============================================================================

/// Stage double that records every effect in call order.
pub struct RecordingStage {
    events: Mutex<Vec<StageEvent>>,
    viewport: Viewport,
}

impl RecordingStage {
    pub fn new() -> Arc<Self> {
        Self::with_viewport(1280, 720)
    }

    pub fn with_viewport(width: u32, height: u32) -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            viewport: Viewport { width, height },
        })
    }

    fn record(&self, event: StageEvent) {
        self.events.lock().unwrap().push(event);
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<StageEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn contains(&self, event: &StageEvent) -> bool {
        self.events.lock().unwrap().iter().any(|e| e == event)
    }

    /// Index of the first event matching the predicate.
    pub fn position<F>(&self, pred: F) -> Option<usize>
    where
        F: Fn(&StageEvent) -> bool,
    {
        self.events.lock().unwrap().iter().position(pred)
    }

    pub fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&StageEvent) -> bool,
    {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }

    /// Concatenation of every revealed character, in call order.
    pub fn typed_text(&self) -> String {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                StageEvent::CharRevealed { ch, .. } => Some(*ch),
                _ => None,
            })
            .collect()
    }

    /// All counter values, in call order.
    pub fn counter_values(&self) -> Vec<u64> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                StageEvent::Counter(value) => Some(*value),
                _ => None,
            })
            .collect()
    }
}

impl Stage for RecordingStage {
    fn activate(&self, phase: overture::phase::Phase) {
        self.record(StageEvent::Activated(phase));
    }
    fn deactivate(&self, phase: overture::phase::Phase) {
        self.record(StageEvent::Deactivated(phase));
    }
    fn apply_theme(&self) {
        self.record(StageEvent::ThemeApplied);
    }
    fn unlock_scroll(&self) {
        self.record(StageEvent::ScrollUnlocked);
    }
    fn reveal_intro_line(&self, index: usize, text: &str) {
        self.record(StageEvent::IntroLine {
            index,
            text: text.to_string(),
        });
    }
    fn set_begin_enabled(&self, enabled: bool) {
        self.record(StageEvent::BeginEnabled(enabled));
    }
    fn set_arc_status(&self, text: &str) {
        self.record(StageEvent::ArcStatus(text.to_string()));
    }
    fn set_counter(&self, value: u64) {
        self.record(StageEvent::Counter(value));
    }
    fn show_established(&self, text: &str) {
        self.record(StageEvent::Established(text.to_string()));
    }
    fn show_letter_block(&self, index: usize) {
        self.record(StageEvent::BlockShown(index));
    }
    fn append_letter_char(&self, index: usize, ch: char) {
        self.record(StageEvent::CharRevealed { index, ch });
    }
    fn move_cursor(&self, index: usize) {
        self.record(StageEvent::CursorMoved(index));
    }
    fn retire_cursor(&self) {
        self.record(StageEvent::CursorRetired);
    }
    fn render_countdown(&self, text: &str) {
        self.record(StageEvent::Countdown(text.to_string()));
    }
    fn set_retry_message(&self, text: &str) {
        self.record(StageEvent::RetryMessage(text.to_string()));
    }
    fn clear_retry_message(&self) {
        self.record(StageEvent::RetryMessageCleared);
    }
    fn shake_retry(&self) {
        self.record(StageEvent::RetryShake);
    }
    fn relocate_retry(&self, dx: i32, dy: i32) {
        self.record(StageEvent::RetryRelocated { dx, dy });
    }
    fn hide_retry(&self) {
        self.record(StageEvent::RetryHidden);
    }
    fn hide_accept(&self) {
        self.record(StageEvent::AcceptHidden);
    }
    fn show_accepted(&self, text: &str) {
        self.record(StageEvent::Accepted(text.to_string()));
    }
    fn spawn_ambient_particles(&self, count: u32) {
        self.record(StageEvent::AmbientParticles(count));
    }
    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

// ============================================================================
// Collaborator fakes
// ============================================================================

/// Starfield double that counts starts and exposes whether it was stopped.
pub struct FakeStarfield {
    starts: AtomicUsize,
    token: Mutex<Option<CancellationToken>>,
}

impl FakeStarfield {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            starts: AtomicUsize::new(0),
            token: Mutex::new(None),
        })
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.token
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

impl Starfield for FakeStarfield {
    fn start(&self) -> StarfieldHandle {
        self.starts.fetch_add(1, Ordering::SeqCst);
        let token = CancellationToken::new();
        *self.token.lock().unwrap() = Some(token.clone());
        StarfieldHandle::new(token)
    }
}

/// Globe double that becomes ready after a fixed number of availability
/// checks and captures the configured scene.
pub struct FakeGlobe {
    ready_after: usize,
    polls: AtomicUsize,
    scene: Mutex<Option<GlobeScene>>,
}

impl FakeGlobe {
    /// Ready on the first check.
    pub fn ready() -> Arc<Self> {
        Self::ready_after(0)
    }

    /// `failed_checks` availability checks fail before the renderer loads.
    pub fn ready_after(failed_checks: usize) -> Arc<Self> {
        Arc::new(Self {
            ready_after: failed_checks,
            polls: AtomicUsize::new(0),
            scene: Mutex::new(None),
        })
    }

    /// Never becomes ready.
    pub fn never() -> Arc<Self> {
        Self::ready_after(usize::MAX)
    }

    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn scene(&self) -> Option<GlobeScene> {
        self.scene.lock().unwrap().clone()
    }
}

impl GlobeRenderer for FakeGlobe {
    fn is_ready(&self) -> bool {
        self.polls.fetch_add(1, Ordering::SeqCst) >= self.ready_after
    }

    fn configure(&self, scene: &GlobeScene) {
        *self.scene.lock().unwrap() = Some(scene.clone());
    }
}

/// Particle cannon double that records every burst.
pub struct FakeCannon {
    bursts: Mutex<Vec<BurstConfig>>,
}

impl FakeCannon {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            bursts: Mutex::new(Vec::new()),
        })
    }

    pub fn bursts(&self) -> Vec<BurstConfig> {
        self.bursts.lock().unwrap().clone()
    }
}

impl ParticleCannon for FakeCannon {
    fn fire(&self, burst: &BurstConfig) {
        self.bursts.lock().unwrap().push(burst.clone());
    }
}

// ============================================================================
// Script helpers
// ============================================================================

/// A compact script with short timings, for paused-clock runs where the
/// arithmetic should stay easy to follow.
pub fn brisk_script() -> Script {
    let mut script = Script::default();

    script.intro.lines = vec!["ready?".to_string()];
    script.intro.line_interval_ms = 100;
    script.intro.begin_fade_ms = 50;

    script.globe.poll_interval_ms = 10;
    script.globe.poll_attempts = 5;
    script.globe.settle_ms = 20;
    script.globe.arc_ms = 1_000;
    script.globe.frame_interval_ms = 16;
    script.globe.counter_target = 500;
    script.globe.established_delay_ms = 80;
    script.globe.established_hold_ms = 100;

    script.transition.globe_fade_ms = 40;
    script.transition.theme_delay_ms = 60;
    script.transition.letter_delay_ms = 120;

    script.letter.start_delay_ms = 90;
    script.letter.char_interval_ms = 10;
    script.letter.block_pause_ms = 40;
    script.letter.cursor_hold_ms = 60;
    script.letter.blocks = vec!["hi".to_string(), "you".to_string()];
    script.letter.ambient_particles = 3;

    script.retry.message_clear_ms = 200;
    script.retry.shake_ms = 50;
    script.retry.hide_ms = 40;

    script.accept.burst_stagger_ms = 15;
    script.accept.accepted_reveal_ms = 40;

    script
}

/// Lets spawned cue tasks run after the clock has been advanced.
pub async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}
