//! One-shot accept interaction.
//!
//! Accepting retires both controls, fires a staggered series of particle
//! bursts, and reveals the accepted display. The whole action is guarded by
//! an atomic flag: the first trigger wins, every later one is a no-op.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::script::AcceptSection;
use crate::sequence::{Anchor, spawn_cue};
use crate::stage::{BurstConfig, ParticleCannon, Stage};

/// Burst origins, cycled so consecutive bursts land in different spots.
const BURST_ORIGINS: [(f64, f64); 3] = [(0.5, 0.6), (0.3, 0.65), (0.7, 0.65)];

/// Accept interaction state for one session.
pub struct AcceptAction {
    cfg: AcceptSection,
    done: AtomicBool,
}

impl AcceptAction {
    /// Creates the accept action.
    #[must_use]
    pub const fn new(cfg: AcceptSection) -> Self {
        Self {
            cfg,
            done: AtomicBool::new(false),
        }
    }

    /// Whether accept has already been triggered.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    /// Handles one activation of the accept control.
    ///
    /// A missing particle cannon skips the bursts and the rest of the
    /// action proceeds unchanged.
    pub fn trigger(&self, stage: &Arc<dyn Stage>, cannon: Option<&Arc<dyn ParticleCannon>>) {
        if self.done.swap(true, Ordering::SeqCst) {
            tracing::trace!("accept already done, trigger ignored");
            return;
        }
        tracing::info!("accepted");

        stage.hide_accept();
        stage.hide_retry();

        let anchor = Anchor::now();

        if let Some(cannon) = cannon {
            for k in 0..self.cfg.burst_count {
                let cannon = Arc::clone(cannon);
                let offset = Duration::from_millis(u64::from(k) * self.cfg.burst_stagger_ms);
                drop(spawn_cue(&anchor, offset, move || {
                    cannon.fire(&burst_for(k));
                }));
            }
        } else {
            tracing::debug!("particle effect unavailable, bursts skipped");
        }

        let stage = Arc::clone(stage);
        let text = self.cfg.accepted_text.clone();
        drop(spawn_cue(
            &anchor,
            Duration::from_millis(self.cfg.accepted_reveal_ms),
            move || stage.show_accepted(&text),
        ));
    }
}

impl std::fmt::Debug for AcceptAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcceptAction")
            .field("done", &self.is_done())
            .finish_non_exhaustive()
    }
}

/// Configuration for the `k`-th burst of the layered effect: a wide central
/// burst first, tighter side bursts after.
fn burst_for(k: u32) -> BurstConfig {
    let (origin_x, origin_y) = BURST_ORIGINS[(k as usize) % BURST_ORIGINS.len()];
    let central = k == 0;
    BurstConfig {
        particle_count: if central { 90 } else { 55 },
        spread_deg: if central { 75.0 } else { 100.0 },
        origin_x,
        origin_y,
        colors: vec![
            "#ff9ecf".to_string(),
            "#ffd166".to_string(),
            "#ffffff".to_string(),
        ],
        shapes: vec!["circle".to_string(), "square".to_string()],
        size_scalar: 1.0,
        lifetime_ticks: 200,
    }
}
