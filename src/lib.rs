//! `overture` - Scripted single-run presentation player
//!
//! This library provides the phase orchestration and timed animation
//! engine behind a scripted, single-session presentation: a landing
//! intro over a starfield, a globe arc sequence, a timed transition,
//! and a typewritten letter with countdown and interaction
//! choreographies.

pub mod cli;
pub mod director;
pub mod error;
pub mod observability;
pub mod phase;
pub mod script;
pub mod sequence;
pub mod stage;
