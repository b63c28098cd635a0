//! Countdown driver.
//!
//! Re-renders the time remaining to the script's target once a second.
//! Nothing is accumulated: every tick derives the remaining duration fresh
//! from `target - now`, so a suspended laptop or a dropped tick cannot
//! skew the display.

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

use crate::script::CountdownSection;
use crate::sequence::frame_interval;
use crate::stage::Stage;

const TICK: Duration = Duration::from_secs(1);

/// Formats a positive remaining duration as `1d 01h 01m 01s`.
///
/// Integer floor cascade; the days field is omitted entirely when zero,
/// smaller fields are always two digits.
#[must_use]
pub fn format_remaining(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{hours:02}h {minutes:02}m {seconds:02}s")
    }
}

/// Renders the countdown display for one instant: the remaining-time
/// breakdown before the target, the fixed completion text at or past it.
#[must_use]
pub fn render(target: DateTime<Utc>, done_text: &str, now: DateTime<Utc>) -> String {
    let remaining = target - now;
    if remaining <= TimeDelta::zero() {
        done_text.to_string()
    } else {
        format_remaining(remaining.num_seconds().unsigned_abs())
    }
}

/// Runs the countdown against the stage, for the rest of the session.
///
/// Renders immediately, then once per tick. Ticking continues harmlessly
/// past the target, re-rendering the completion text.
pub async fn run(stage: &dyn Stage, cfg: &CountdownSection) {
    let mut ticks = frame_interval(TICK);
    loop {
        ticks.tick().await;
        stage.render_countdown(&render(cfg.target, &cfg.done_text, Utc::now()));
    }
}
