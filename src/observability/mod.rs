//! Observability module
//!
//! Logging infrastructure for following a presentation run: phase entries,
//! cue firings, bridge polling, and interaction triggers all land here.

pub mod logging;

pub use logging::{LogFormat, init_logging};
