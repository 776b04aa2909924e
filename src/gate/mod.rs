//! Format resolution module
//!
//! This module owns the moment an element learns its input format:
//! - One-shot `Unresolved` -> `Resolved` latch
//! - The element surface driven by the host (`new`, `on_format_observed`)
//! - Async driver for channel-based format notifications

pub mod element;
pub mod notify;

pub use element::{Resolution, TranscodeElement};
pub use notify::drive_format_notifications;

use crate::format::InputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Unresolved,
    /// Terminal: the format is fixed for the rest of the instance's life
    Resolved(InputFormat),
}

/// Latch holding the input format once it becomes known
#[derive(Debug, Clone, Default)]
pub struct ResolutionGate {
    state: GateState,
}

impl ResolutionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, GateState::Resolved(_))
    }

    pub fn format(&self) -> Option<&InputFormat> {
        match &self.state {
            GateState::Resolved(format) => Some(format),
            GateState::Unresolved => None,
        }
    }

    /// Latch `format` if nothing is latched yet.
    ///
    /// Returns `true` only for the call that performs the transition; every
    /// later call leaves the stored format untouched and returns `false`.
    pub fn resolve(&mut self, format: InputFormat) -> bool {
        match self.state {
            GateState::Unresolved => {
                self.state = GateState::Resolved(format);
                true
            }
            GateState::Resolved(_) => false,
        }
    }
}
