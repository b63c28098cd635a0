//! Script schema for `overture`.
//!
//! A script is a single YAML document holding every tunable of one
//! presentation: phase timings, globe endpoints, letter text, interaction
//! copy, and the countdown target. Every section and every field carries a
//! default, so the empty document deserializes to the built-in presentation
//! and a script file only needs to name what it overrides.
//!
//! Durations are `*_ms` integer fields; instants are RFC 3339 strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Top-level script
// ============================================================================

/// A complete presentation script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    /// Presentation title, shown by frontends that have somewhere to put it.
    pub title: String,

    /// Landing-phase terminal intro.
    pub intro: IntroSection,

    /// Globe phase: polling, arc timing, endpoints, status copy.
    pub globe: GlobeSection,

    /// Globe → Letter transition delays.
    pub transition: TransitionSection,

    /// Letter phase: typewriter timing and text blocks.
    pub letter: LetterSection,

    /// Escalating retry interaction.
    pub retry: RetrySection,

    /// One-shot accept interaction.
    pub accept: AcceptSection,

    /// Countdown target and completion copy.
    pub countdown: CountdownSection,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            title: "overture".to_string(),
            intro: IntroSection::default(),
            globe: GlobeSection::default(),
            transition: TransitionSection::default(),
            letter: LetterSection::default(),
            retry: RetrySection::default(),
            accept: AcceptSection::default(),
            countdown: CountdownSection::default(),
        }
    }
}

// ============================================================================
// Intro
// ============================================================================

/// Terminal-styled intro shown during the Landing phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroSection {
    /// Lines revealed one at a time, in order.
    pub lines: Vec<String>,

    /// Gap between consecutive line reveals.
    pub line_interval_ms: u64,

    /// Landing fade-out length; the Globe phase activates after this once
    /// "begin" is triggered.
    pub begin_fade_ms: u64,
}

impl Default for IntroSection {
    fn default() -> Self {
        Self {
            lines: vec![
                "> initializing overture ...".to_string(),
                "> locating recipient ...".to_string(),
                "> recipient found: 9,862 km away".to_string(),
                "> composing transmission ...".to_string(),
                "> ready.".to_string(),
            ],
            line_interval_ms: 450,
            begin_fade_ms: 400,
        }
    }
}

// ============================================================================
// Globe
// ============================================================================

/// A geographic endpoint of the arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Marker label shown next to the point.
    pub label: String,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lng: 0.0,
            label: String::new(),
        }
    }
}

/// Globe phase configuration.
///
/// `arc_ms` paces the whole sequence: the status cues fire at fixed
/// fractions of the arc and the distance counter finishes at four fifths
/// of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeSection {
    /// Renderer availability polling interval.
    pub poll_interval_ms: u64,

    /// Maximum availability polls before giving up. Zero means the globe
    /// is always skipped.
    pub poll_attempts: u32,

    /// Pause between configuring the renderer and starting the arc.
    pub settle_ms: u64,

    /// Arc animation duration.
    pub arc_ms: u64,

    /// Counter render tick.
    pub frame_interval_ms: u64,

    /// Counter end value (displayed as kilometers).
    pub counter_target: u64,

    /// Delay after arc completion before the established indicator shows.
    pub established_delay_ms: u64,

    /// Hold after the established indicator before the sequence resolves.
    pub established_hold_ms: u64,

    /// Arc start point.
    pub origin: Endpoint,

    /// Arc end point.
    pub destination: Endpoint,

    /// Status text at arc start.
    pub status_launched: String,

    /// Status text at three quarters of the arc.
    pub status_arriving: String,

    /// Status text when the arc completes.
    pub status_delivered: String,

    /// Established indicator text.
    pub established_text: String,

    /// Purely visual renderer settings.
    pub visual: GlobeVisual,
}

impl Default for GlobeSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
            poll_attempts: 50,
            settle_ms: 600,
            arc_ms: 4000,
            frame_interval_ms: 16,
            counter_target: 9_862,
            established_delay_ms: 800,
            established_hold_ms: 2500,
            origin: Endpoint {
                lat: 31.2304,
                lng: 121.4737,
                label: "shanghai".to_string(),
            },
            destination: Endpoint {
                lat: 37.7749,
                lng: -122.4194,
                label: "san francisco".to_string(),
            },
            status_launched: "packet launched".to_string(),
            status_arriving: "packet arriving ...".to_string(),
            status_delivered: "packet delivered".to_string(),
            established_text: "connection established".to_string(),
            visual: GlobeVisual::default(),
        }
    }
}

/// Visual settings handed to the globe renderer verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeVisual {
    /// Globe surface texture.
    pub globe_texture: String,

    /// Background sky texture.
    pub background_texture: String,

    /// Atmosphere tint.
    pub atmosphere_color: String,

    /// Atmosphere shell altitude (globe radii).
    pub atmosphere_altitude: f64,

    /// Point-of-view altitude (globe radii).
    pub pov_altitude: f64,

    /// Point-of-view fly-to duration.
    pub pov_transition_ms: u64,

    /// Arc color gradient, start to end.
    pub arc_colors: Vec<String>,

    /// Arc dash length as a fraction of arc length.
    pub arc_dash_length: f64,

    /// Arc dash gap as a fraction of arc length.
    pub arc_dash_gap: f64,

    /// Endpoint marker color.
    pub marker_color: String,
}

impl Default for GlobeVisual {
    fn default() -> Self {
        Self {
            globe_texture: "https://unpkg.com/three-globe/example/img/earth-night.jpg".to_string(),
            background_texture: "https://unpkg.com/three-globe/example/img/night-sky.png"
                .to_string(),
            atmosphere_color: "#f0a6bf".to_string(),
            atmosphere_altitude: 0.25,
            pov_altitude: 2.5,
            pov_transition_ms: 1000,
            arc_colors: vec!["#ff9ecf".to_string(), "#ffd166".to_string()],
            arc_dash_length: 0.45,
            arc_dash_gap: 0.2,
            marker_color: "#ff9ecf".to_string(),
        }
    }
}

// ============================================================================
// Transition
// ============================================================================

/// The three-step delay chain between the globe resolving and the letter
/// appearing. The steps are cumulative offsets from one anchor, letting each
/// fade complete before the next state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSection {
    /// Anchor → Globe phase deactivates.
    pub globe_fade_ms: u64,

    /// Further delay → the romantic theme applies.
    pub theme_delay_ms: u64,

    /// Further delay → the Letter phase activates.
    pub letter_delay_ms: u64,
}

impl Default for TransitionSection {
    fn default() -> Self {
        Self {
            globe_fade_ms: 400,
            theme_delay_ms: 600,
            letter_delay_ms: 1200,
        }
    }
}

// ============================================================================
// Letter
// ============================================================================

/// Letter phase configuration: the typewriter and its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterSection {
    /// Delay between the phase activating and the first character.
    pub start_delay_ms: u64,

    /// Per-character reveal interval.
    pub char_interval_ms: u64,

    /// Pause between blocks.
    pub block_pause_ms: u64,

    /// Hold after the last block before the cursor retires.
    pub cursor_hold_ms: u64,

    /// Text blocks revealed in order.
    pub blocks: Vec<String>,

    /// Ambient particles spawned when the phase activates.
    pub ambient_particles: u32,
}

impl Default for LetterSection {
    fn default() -> Self {
        Self {
            start_delay_ms: 900,
            char_interval_ms: 25,
            block_pause_ms: 400,
            cursor_hold_ms: 1200,
            blocks: vec![
                "i counted the kilometers once. nine thousand eight hundred and sixty-two. \
                 the number stopped meaning anything the day you first said hello back."
                    .to_string(),
                "so i built you this: a small machine that sends one packet across the world \
                 and watches it land. it is not much. but every part of it runs toward you."
                    .to_string(),
                "stay with me while the counter below runs out. after that, ask me again \
                 in person."
                    .to_string(),
            ],
            ambient_particles: 14,
        }
    }
}

// ============================================================================
// Retry
// ============================================================================

/// Escalating retry interaction. Exactly three messages, one per attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    /// Messages shown on the first, second, and third attempt.
    pub messages: Vec<String>,

    /// Message auto-clear delay (attempts one and two).
    pub message_clear_ms: u64,

    /// Shake animation length; the second attempt relocates once it ends.
    pub shake_ms: u64,

    /// Hide animation length; the final message clears when it ends.
    pub hide_ms: u64,

    /// Relocation bound on the x axis, pixels.
    pub max_offset_x: u32,

    /// Relocation bound on the y axis, pixels.
    pub max_offset_y: u32,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            messages: vec![
                "hmm, that button seems broken".to_string(),
                "no, really, it will not work".to_string(),
                "we both knew the answer already".to_string(),
            ],
            message_clear_ms: 2000,
            shake_ms: 500,
            hide_ms: 400,
            max_offset_x: 160,
            max_offset_y: 80,
        }
    }
}

// ============================================================================
// Accept
// ============================================================================

/// One-shot accept interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptSection {
    /// Number of particle bursts fired.
    pub burst_count: u32,

    /// Gap between consecutive bursts.
    pub burst_stagger_ms: u64,

    /// Delay before the accepted display appears.
    pub accepted_reveal_ms: u64,

    /// Accepted display text.
    pub accepted_text: String,
}

impl Default for AcceptSection {
    fn default() -> Self {
        Self {
            burst_count: 3,
            burst_stagger_ms: 150,
            accepted_reveal_ms: 400,
            accepted_text: "it's a date ♥".to_string(),
        }
    }
}

// ============================================================================
// Countdown
// ============================================================================

/// Countdown target and completion copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownSection {
    /// The instant counted down to.
    pub target: DateTime<Utc>,

    /// Rendered once the target has passed.
    pub done_text: String,
}

impl Default for CountdownSection {
    fn default() -> Self {
        Self {
            target: DateTime::parse_from_rfc3339("2027-02-14T00:00:00Z")
                .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc)),
            done_text: "it's time ♥".to_string(),
        }
    }
}
