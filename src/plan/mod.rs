//! Transcoding path planning module
//!
//! This module decides how an input stream reaches the requested output:
//! - Decision table over (input format, output kind)
//! - Explicit rule precedence
//! - Abstract stage chains (parse, decode, resample, encode)

pub mod selector;

pub use selector::{match_rule, select_path, select_rule, Rule, Stage, StageChain};
