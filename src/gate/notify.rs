//! Channel-based format notifications
//!
//! Hosts whose format sniffer runs as a separate task can hand the element a
//! `tokio::sync::mpsc` receiver instead of calling `on_format_observed` directly.

use tokio::sync::mpsc;

use crate::error::Result;
use crate::format::InputFormat;
use crate::graph::HostGraph;

use super::element::{Resolution, TranscodeElement};

/// Feed every format received on `rx` into `element` until the sender side closes.
///
/// The first format assembles the graph; the rest are ignored by the gate.
/// Returns the number of notifications that were ignored. An invalid format or
/// an assembly failure stops the loop with its error.
pub async fn drive_format_notifications<G: HostGraph>(
    element: &mut TranscodeElement<G>,
    mut rx: mpsc::Receiver<InputFormat>,
) -> Result<usize> {
    let mut ignored = 0;
    while let Some(format) = rx.recv().await {
        if element.on_format_observed(format)? == Resolution::Ignored {
            ignored += 1;
        }
    }
    tracing::debug!(ignored, "format notification channel closed");
    Ok(ignored)
}
