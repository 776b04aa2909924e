//! Transcoding element
//!
//! The surface a host drives: construct it with an optional static input
//! format and an output kind, then forward the sniffer's format notification.
//! The host graph is assembled exactly once, on the first known format.

use crate::config::ElementConfig;
use crate::error::Result;
use crate::format::{InputFormat, OutputKind};
use crate::graph::{Assembly, GraphAssembler, HostGraph};

use super::ResolutionGate;

/// What a format notification did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The gate resolved and the path was spliced into the graph
    Assembled,
    /// The gate was already resolved; nothing changed
    Ignored,
}

pub struct TranscodeElement<G: HostGraph> {
    gate: ResolutionGate,
    assembler: GraphAssembler,
    graph: G,
    assembly: Option<Assembly>,
}

impl<G: HostGraph> TranscodeElement<G> {
    /// Create an element on `graph`.
    ///
    /// A statically configured input format resolves the gate and assembles
    /// the graph before this returns.
    pub fn new(config: ElementConfig, graph: G) -> Result<Self> {
        config.validate()?;

        let mut element = Self {
            gate: ResolutionGate::new(),
            assembler: GraphAssembler::new(config.output, config.encoder),
            graph,
            assembly: None,
        };

        if let Some(format) = config.input_format {
            tracing::debug!(%format, "input format statically configured");
            element.on_format_observed(format)?;
        }

        Ok(element)
    }

    /// Handle the format sniffer's notification.
    ///
    /// Only the first valid notification has an effect. A format with a zero
    /// sample rate or channel count is rejected with `InvalidFormat` and leaves
    /// the gate unresolved. An unsupported conversion is returned as an error
    /// and leaves the element resolved but unassembled; the instance cannot do
    /// useful work after that.
    pub fn on_format_observed(&mut self, format: InputFormat) -> Result<Resolution> {
        // An out-of-range format neither latches the gate nor reaches the graph
        format.validate()?;

        if !self.gate.resolve(format) {
            tracing::debug!(
                %format,
                resolved = ?self.gate.format(),
                "format already resolved, ignoring notification"
            );
            return Ok(Resolution::Ignored);
        }

        tracing::info!(%format, output = %self.assembler.output(), "input format resolved");

        let assembly = self
            .assembler
            .assemble(&format, &mut self.graph)
            .inspect_err(|e| tracing::error!("failed to assemble transcoding path: {}", e))?;

        self.assembly = Some(assembly);
        Ok(Resolution::Assembled)
    }

    pub fn input_format(&self) -> Option<&InputFormat> {
        self.gate.format()
    }

    pub fn output_kind(&self) -> &OutputKind {
        self.assembler.output()
    }

    pub fn is_resolved(&self) -> bool {
        self.gate.is_resolved()
    }

    /// The spliced path, once assembled
    pub fn assembly(&self) -> Option<&Assembly> {
        self.assembly.as_ref()
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn into_graph(self) -> G {
        self.graph
    }
}
