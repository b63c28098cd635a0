//! Script configuration for `overture`.
//!
//! A presentation is driven entirely by its script: a YAML document with
//! defaults for every field. [`schema`] defines the document shape,
//! [`loader`] turns files into validated scripts, [`validation`] holds the
//! semantic checks.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{LoadResult, load_script, parse_script};
pub use schema::{
    AcceptSection, CountdownSection, Endpoint, GlobeSection, GlobeVisual, IntroSection,
    LetterSection, RetrySection, Script, TransitionSection,
};
pub use validation::{ValidationResult, Validator};
