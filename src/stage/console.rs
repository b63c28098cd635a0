//! Line-oriented console frontends.
//!
//! The reference implementations behind `overture run`: stage effects are
//! rendered as stdout lines and inline character appends, the collaborator
//! stand-ins log what a real renderer would draw. Diagnostics go to stderr
//! through `tracing`, so stdout stays clean presentation output.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::phase::Phase;
use crate::sequence::spawn_frame_loop;
use crate::stage::{
    BurstConfig, GlobeRenderer, GlobeScene, ParticleCannon, Stage, Starfield, StarfieldHandle,
    Viewport,
};

/// Fixed viewport reported by the console stage.
const CONSOLE_VIEWPORT: Viewport = Viewport {
    width: 1280,
    height: 720,
};

/// Console starfield frame period. Purely a pacing detail; frames render
/// nothing visible at this frontend.
const STARFIELD_FRAME: Duration = Duration::from_millis(50);

// ============================================================================
// Stage
// ============================================================================

/// Line-oriented stdout stage.
///
/// Phase containers become banners, the typewriter appends characters
/// inline, and countdown renders are suppressed while a letter block is
/// mid-reveal so the two displays do not fight over the same line.
#[derive(Debug, Default)]
pub struct ConsoleStage {
    typing: AtomicBool,
}

impl ConsoleStage {
    /// Creates a console stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{text}") {
            tracing::debug!(error = %e, "stdout write failed");
        }
    }

    fn inline(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        let result = write!(out, "{text}").and_then(|()| out.flush());
        if let Err(e) = result {
            tracing::debug!(error = %e, "stdout write failed");
        }
    }
}

impl Stage for ConsoleStage {
    fn activate(&self, phase: Phase) {
        self.line(&format!("\n==============[ {phase} ]=============="));
    }

    fn deactivate(&self, phase: Phase) {
        tracing::debug!(%phase, "container fading out");
    }

    fn apply_theme(&self) {
        self.line("[the room turns rose]");
    }

    fn unlock_scroll(&self) {
        tracing::debug!("scroll unlocked");
    }

    fn reveal_intro_line(&self, _index: usize, text: &str) {
        self.line(text);
    }

    fn set_begin_enabled(&self, enabled: bool) {
        if enabled {
            self.line("(type 'begin' when you are ready)");
        } else {
            tracing::debug!("begin control disabled");
        }
    }

    fn set_arc_status(&self, text: &str) {
        self.line(&format!("\n-> {text}"));
    }

    fn set_counter(&self, value: u64) {
        self.inline(&format!("\r   {value} km"));
    }

    fn show_established(&self, text: &str) {
        self.line(&format!("\n** {text} **"));
    }

    fn show_letter_block(&self, index: usize) {
        self.typing.store(true, Ordering::SeqCst);
        if index > 0 {
            self.line("");
        }
    }

    fn append_letter_char(&self, _index: usize, ch: char) {
        self.inline(&ch.to_string());
    }

    fn move_cursor(&self, index: usize) {
        tracing::trace!(block = index, "cursor moved");
    }

    fn retire_cursor(&self) {
        self.typing.store(false, Ordering::SeqCst);
        self.line("");
    }

    fn render_countdown(&self, text: &str) {
        // Catches up on the next tick once the block finishes.
        if self.typing.load(Ordering::SeqCst) {
            tracing::trace!(%text, "countdown render suppressed while typing");
            return;
        }
        self.line(&format!("[ {text} ]"));
    }

    fn set_retry_message(&self, text: &str) {
        self.line(&format!("! {text}"));
    }

    fn clear_retry_message(&self) {
        tracing::debug!("retry message cleared");
    }

    fn shake_retry(&self) {
        self.line("[the no button shakes]");
    }

    fn relocate_retry(&self, dx: i32, dy: i32) {
        self.line(&format!("[the no button darts {dx:+}px, {dy:+}px]"));
    }

    fn hide_retry(&self) {
        self.line("[the no button vanishes]");
    }

    fn hide_accept(&self) {
        tracing::debug!("accept control hidden");
    }

    fn show_accepted(&self, text: &str) {
        self.line(&format!("\n** {text} **"));
    }

    fn spawn_ambient_particles(&self, count: u32) {
        self.line(&format!("[{count} hearts drift upward]"));
    }

    fn viewport(&self) -> Viewport {
        CONSOLE_VIEWPORT
    }
}

// ============================================================================
// Starfield
// ============================================================================

/// Console starfield stand-in.
///
/// Runs a real frame loop so the teardown path is exercised end to end;
/// each frame is only a trace event at this frontend.
#[derive(Debug, Default)]
pub struct ConsoleStarfield;

impl ConsoleStarfield {
    /// Creates a console starfield.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Starfield for ConsoleStarfield {
    fn start(&self) -> StarfieldHandle {
        let cancel = CancellationToken::new();
        let mut frames: u64 = 0;
        drop(spawn_frame_loop(
            STARFIELD_FRAME,
            cancel.clone(),
            move || {
                frames += 1;
                tracing::trace!(frames, "starfield frame");
            },
        ));
        tracing::debug!("starfield started");
        StarfieldHandle::new(cancel)
    }
}

// ============================================================================
// Globe renderer
// ============================================================================

/// Console globe stand-in.
///
/// Either ready from construction or never ready, so both bridge outcomes
/// can be played from the command line.
#[derive(Debug)]
pub struct ConsoleGlobe {
    ready: bool,
}

impl ConsoleGlobe {
    /// A renderer that reports ready immediately.
    #[must_use]
    pub const fn new() -> Self {
        Self { ready: true }
    }

    /// A renderer that never becomes ready, forcing the fallback path.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { ready: false }
    }
}

impl Default for ConsoleGlobe {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobeRenderer for ConsoleGlobe {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn configure(&self, scene: &GlobeScene) {
        let route = scene
            .markers
            .iter()
            .map(|m| m.label.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");
        let arc_ms = scene.arcs.first().map_or(0, |a| a.animate_ms);
        tracing::info!(
            route,
            arcs = scene.arcs.len(),
            arc_ms,
            width = scene.width,
            height = scene.height,
            "globe configured"
        );
    }
}

// ============================================================================
// Particle cannon
// ============================================================================

/// Console particle-burst stand-in.
#[derive(Debug, Default)]
pub struct ConsoleCannon;

impl ConsoleCannon {
    /// Creates a console cannon.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ParticleCannon for ConsoleCannon {
    fn fire(&self, burst: &BurstConfig) {
        tracing::info!(
            particles = burst.particle_count,
            spread = burst.spread_deg,
            origin_x = burst.origin_x,
            origin_y = burst.origin_y,
            "confetti burst"
        );
    }
}
