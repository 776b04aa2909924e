//! Graph assembler
//!
//! Selects the path for a resolved input format and splices it into the host
//! graph between the fixed input tap and output merge point.

use crate::config::EncoderConfig;
use crate::error::Result;
use crate::format::{InputFormat, OutputKind};
use crate::plan::{select_rule, Rule};

use super::splice::{ComponentSpec, Endpoint, GraphInstruction, SplicePlan};

/// The processing graph an element is embedded in.
///
/// The host owns data transport between components; the assembler only asks
/// it to create components and link them.
pub trait HostGraph {
    /// Instantiate `component` for the stage at `slot`
    fn add_component(&mut self, slot: usize, component: &ComponentSpec) -> Result<()>;

    /// Link the output of `from` to the input of `to`
    fn link(&mut self, from: Endpoint, to: Endpoint) -> Result<()>;
}

impl<G: HostGraph + ?Sized> HostGraph for &mut G {
    fn add_component(&mut self, slot: usize, component: &ComponentSpec) -> Result<()> {
        (**self).add_component(slot, component)
    }

    fn link(&mut self, from: Endpoint, to: Endpoint) -> Result<()> {
        (**self).link(from, to)
    }
}

/// Outcome of a successful assembly
#[derive(Debug, Clone)]
pub struct Assembly {
    pub input: InputFormat,
    pub output: OutputKind,
    /// Decision-table rule that produced the spliced stages
    pub rule: Rule,
    pub plan: SplicePlan,
}

/// Builds and applies splice plans for one output kind
#[derive(Debug, Clone)]
pub struct GraphAssembler {
    output: OutputKind,
    encoder: EncoderConfig,
}

impl GraphAssembler {
    pub fn new(output: OutputKind, encoder: EncoderConfig) -> Self {
        Self { output, encoder }
    }

    pub fn output(&self) -> &OutputKind {
        &self.output
    }

    /// Select the stage chain for `input` and translate it, without touching any graph
    pub fn plan(&self, input: &InputFormat) -> Result<(Rule, SplicePlan)> {
        let rule = select_rule(input, &self.output)?;
        let chain = rule.chain();
        let plan = SplicePlan::build(input, &chain, &self.output, &self.encoder)?;
        Ok((rule, plan))
    }

    /// Splice the path for `input` into `graph`.
    ///
    /// The plan is fully built before the first graph call, so an unsupported
    /// conversion leaves the graph untouched.
    pub fn assemble<G: HostGraph>(&self, input: &InputFormat, graph: &mut G) -> Result<Assembly> {
        let (rule, plan) = self.plan(input)?;

        tracing::info!(
            %input,
            output = %self.output,
            rule = rule.number(),
            components = plan.components().len(),
            "assembling transcoding path"
        );

        for instruction in plan.instructions() {
            match instruction {
                GraphInstruction::Spawn { slot, component } => {
                    tracing::debug!(slot, %component, "spawn component");
                    graph.add_component(*slot, component)?;
                }
                GraphInstruction::Link { from, to } => {
                    tracing::debug!(%from, %to, "link");
                    graph.link(*from, *to)?;
                }
            }
        }

        Ok(Assembly {
            input: *input,
            output: self.output,
            rule,
            plan,
        })
    }
}
