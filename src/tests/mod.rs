//! Crate-level scenario tests
//!
//! Drive a `TranscodeElement` against a recording host graph:
//! - Static and notification-driven format resolution
//! - Duplicate notification suppression
//! - Graph topology per decision-table rule
//! - Unsupported conversions leaving the graph untouched

pub mod e2e;
