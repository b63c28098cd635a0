//! Stage surface: the boundary between the engine and whatever renders it.
//!
//! The engine never touches pixels, markup, or styling. Everything visual
//! goes through the traits here: [`Stage`] is the host UI surface,
//! [`Starfield`], [`GlobeRenderer`], and [`ParticleCannon`] are the three
//! external effect collaborators. All methods are infallible by contract; a
//! frontend that cannot perform an effect degrades internally and the
//! presentation continues.
//!
//! [`console`] provides the line-oriented reference frontends used by the
//! binary.

pub mod console;

use tokio_util::sync::CancellationToken;

use crate::phase::Phase;

pub use console::{ConsoleCannon, ConsoleGlobe, ConsoleStage, ConsoleStarfield};

// ============================================================================
// Host UI surface
// ============================================================================

/// Viewport dimensions in pixels, used to clamp the retry relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The host UI surface.
///
/// One method per display target or control operation the engine drives.
/// Implementations render however they like; the engine only guarantees the
/// order and timing of the calls. Methods take `&self` and must be safe to
/// call from any task.
pub trait Stage: Send + Sync {
    /// Makes a phase container visible. Never called for
    /// [`Phase::Transition`], which has no container.
    fn activate(&self, phase: Phase);

    /// Hides a phase container, beginning its fade-out.
    fn deactivate(&self, phase: Phase);

    /// Applies the romantic visual theme during the transition.
    fn apply_theme(&self);

    /// Unlocks page scrolling once the letter is reachable.
    fn unlock_scroll(&self);

    /// Reveals intro line `index` with the given text.
    fn reveal_intro_line(&self, index: usize, text: &str);

    /// Enables or disables the begin control.
    fn set_begin_enabled(&self, enabled: bool);

    /// Updates the packet status display.
    fn set_arc_status(&self, text: &str);

    /// Updates the distance counter display.
    fn set_counter(&self, value: u64);

    /// Reveals the connection-established indicator.
    fn show_established(&self, text: &str);

    /// Makes letter block `index` visible, ready to receive characters.
    fn show_letter_block(&self, index: usize);

    /// Appends one revealed character to letter block `index`.
    fn append_letter_char(&self, index: usize, ch: char);

    /// Moves the shared cursor to the end of letter block `index`.
    fn move_cursor(&self, index: usize);

    /// Retires the shared cursor after the last block completes.
    fn retire_cursor(&self);

    /// Renders the countdown display.
    fn render_countdown(&self, text: &str);

    /// Shows a retry error message.
    fn set_retry_message(&self, text: &str);

    /// Clears the retry error message.
    fn clear_retry_message(&self);

    /// Plays the retry control's shake animation.
    fn shake_retry(&self);

    /// Moves the retry control by a pixel offset.
    fn relocate_retry(&self, dx: i32, dy: i32);

    /// Permanently hides the retry control.
    fn hide_retry(&self);

    /// Permanently hides the accept control.
    fn hide_accept(&self);

    /// Reveals the accepted display.
    fn show_accepted(&self, text: &str);

    /// Spawns the ambient floating particles of the letter phase.
    fn spawn_ambient_particles(&self, count: u32);

    /// Current viewport dimensions.
    fn viewport(&self) -> Viewport;
}

// ============================================================================
// Effect collaborators
// ============================================================================

/// The continuously rendering background starfield.
///
/// Owns its own frame loop and resize handling; the engine only starts it
/// and, on leaving the landing phase, stops it through the returned handle.
pub trait Starfield: Send + Sync {
    /// Starts rendering. Returns the teardown handle.
    fn start(&self) -> StarfieldHandle;
}

/// Teardown handle for a running starfield.
///
/// `stop` takes the handle by value, so teardown can only happen once.
#[derive(Debug)]
pub struct StarfieldHandle {
    cancel: CancellationToken,
}

impl StarfieldHandle {
    /// Wraps a cancellation token controlling the frame loop.
    #[must_use]
    pub const fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Stops the frame loop, consuming the handle.
    pub fn stop(self) {
        self.cancel.cancel();
    }
}

/// The external 3D globe renderer.
///
/// Polled for availability, then configured once, fire-and-forget: the
/// engine never reads state back from it.
pub trait GlobeRenderer: Send + Sync {
    /// Whether the renderer has finished loading and can be configured.
    fn is_ready(&self) -> bool;

    /// Applies the full scene configuration.
    fn configure(&self, scene: &GlobeScene);
}

/// Complete scene configuration handed to the globe renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeScene {
    /// Globe surface texture.
    pub globe_texture: String,
    /// Background sky texture.
    pub background_texture: String,
    /// Render width in pixels.
    pub width: u32,
    /// Render height in pixels.
    pub height: u32,
    /// Atmosphere tint.
    pub atmosphere_color: String,
    /// Atmosphere shell altitude in globe radii.
    pub atmosphere_altitude: f64,
    /// Initial camera position.
    pub pov: PointOfView,
    /// Endpoint markers.
    pub markers: Vec<Marker>,
    /// Animated arcs.
    pub arcs: Vec<ArcPath>,
}

/// Camera position for the globe renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointOfView {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Altitude in globe radii.
    pub altitude: f64,
    /// Fly-to duration in milliseconds.
    pub transition_ms: u64,
}

/// A labeled point on the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Label shown next to the point.
    pub label: String,
    /// Marker color.
    pub color: String,
}

/// An animated arc between two points on the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPath {
    /// Start latitude in degrees.
    pub start_lat: f64,
    /// Start longitude in degrees.
    pub start_lng: f64,
    /// End latitude in degrees.
    pub end_lat: f64,
    /// End longitude in degrees.
    pub end_lng: f64,
    /// Color gradient, start to end.
    pub colors: Vec<String>,
    /// Dash length as a fraction of arc length.
    pub dash_length: f64,
    /// Dash gap as a fraction of arc length.
    pub dash_gap: f64,
    /// One dash animation cycle in milliseconds.
    pub animate_ms: u64,
}

/// The particle-burst effect.
///
/// The engine holds it as an `Option` and checks presence before firing;
/// absence is not an error.
pub trait ParticleCannon: Send + Sync {
    /// Fires one burst.
    fn fire(&self, burst: &BurstConfig);
}

/// Configuration for a single particle burst.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstConfig {
    /// Number of particles.
    pub particle_count: u32,
    /// Spread angle in degrees.
    pub spread_deg: f64,
    /// Horizontal origin, 0.0 (left) to 1.0 (right).
    pub origin_x: f64,
    /// Vertical origin, 0.0 (top) to 1.0 (bottom).
    pub origin_y: f64,
    /// Particle colors.
    pub colors: Vec<String>,
    /// Particle shapes.
    pub shapes: Vec<String>,
    /// Size multiplier.
    pub size_scalar: f64,
    /// Particle lifetime in animation ticks.
    pub lifetime_ticks: u32,
}

// ============================================================================
// Stage events
// ============================================================================

/// A typed record of one stage effect.
///
/// Mirrors the [`Stage`] methods one to one. The engine does not emit these
/// itself; recording frontends produce them so tests and tooling can assert
/// on the exact effect order a run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    /// A phase container became visible.
    Activated(Phase),
    /// A phase container was hidden.
    Deactivated(Phase),
    /// The romantic theme was applied.
    ThemeApplied,
    /// Scrolling was unlocked.
    ScrollUnlocked,
    /// An intro line was revealed.
    IntroLine {
        /// Line index.
        index: usize,
        /// Line text.
        text: String,
    },
    /// The begin control was enabled or disabled.
    BeginEnabled(bool),
    /// The packet status display changed.
    ArcStatus(String),
    /// The distance counter display changed.
    Counter(u64),
    /// The established indicator was revealed.
    Established(String),
    /// A letter block became visible.
    BlockShown(usize),
    /// A character was appended to a letter block.
    CharRevealed {
        /// Block index.
        index: usize,
        /// The revealed character.
        ch: char,
    },
    /// The cursor moved to a block.
    CursorMoved(usize),
    /// The cursor was retired.
    CursorRetired,
    /// The countdown display changed.
    Countdown(String),
    /// A retry message was shown.
    RetryMessage(String),
    /// The retry message was cleared.
    RetryMessageCleared,
    /// The retry control shook.
    RetryShake,
    /// The retry control moved.
    RetryRelocated {
        /// Horizontal offset in pixels.
        dx: i32,
        /// Vertical offset in pixels.
        dy: i32,
    },
    /// The retry control was hidden.
    RetryHidden,
    /// The accept control was hidden.
    AcceptHidden,
    /// The accepted display was revealed.
    Accepted(String),
    /// Ambient particles were spawned.
    AmbientParticles(u32),
}
