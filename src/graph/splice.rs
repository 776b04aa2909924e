//! Declarative graph splicing
//!
//! Translates a [`StageChain`] into the ordered list of "spawn component, then
//! link it after its predecessor" instructions a host graph executes. Nothing
//! here decides *which* stages are needed; it only maps each stage onto the
//! external component that implements it.

use serde::Serialize;
use std::fmt;

use crate::config::EncoderConfig;
use crate::error::{PathError, Result};
use crate::format::{Codec, InputFormat, OutputKind, SampleFormat};
use crate::plan::{Stage, StageChain};

/// External component realizing one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum ComponentSpec {
    /// Identity element
    Passthrough,
    /// Container de-framer yielding bare packets of `codec`
    Parser { codec: Codec },
    Decoder { codec: Codec },
    Encoder {
        codec: Codec,
        bitrate: u64,
        /// Channel count of the PCM fed to the encoder, when known
        channels: Option<u16>,
    },
    Resampler {
        sample_rate: u32,
        sample_format: SampleFormat,
        channels: u16,
    },
}

impl fmt::Display for ComponentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentSpec::Passthrough => f.write_str("passthrough"),
            ComponentSpec::Parser { codec } => write!(f, "{} parser", codec),
            ComponentSpec::Decoder { codec } => write!(f, "{} decoder", codec),
            ComponentSpec::Encoder { codec, bitrate, .. } => {
                write!(f, "{} encoder @ {} bps", codec, bitrate)
            }
            ComponentSpec::Resampler {
                sample_rate,
                sample_format,
                channels,
            } => write!(
                f,
                "resampler -> {} Hz {} {} ch",
                sample_rate, sample_format, channels
            ),
        }
    }
}

/// A point in the host graph a link may start or end at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// Fixed point where raw media enters the element
    InputTap,
    /// The component spawned for the stage at this slot
    Stage(usize),
    /// Fixed point the element's output is merged into
    OutputMerge,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::InputTap => f.write_str("input"),
            Endpoint::Stage(slot) => write!(f, "stage#{}", slot),
            Endpoint::OutputMerge => f.write_str("output"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GraphInstruction {
    Spawn { slot: usize, component: ComponentSpec },
    Link { from: Endpoint, to: Endpoint },
}

/// Ordered instructions splicing a stage chain between input tap and output merge point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplicePlan {
    instructions: Vec<GraphInstruction>,
}

impl SplicePlan {
    /// Map every stage of `chain` to its component and link them in order.
    ///
    /// Decode and parse components take the input's codec, the encoder takes
    /// the output's. A stage that has no codec to work with is rejected.
    pub fn build(
        input: &InputFormat,
        chain: &StageChain,
        output: &OutputKind,
        encoder: &EncoderConfig,
    ) -> Result<Self> {
        let mut instructions = Vec::with_capacity(chain.len() * 2 + 1);
        let mut upstream = Endpoint::InputTap;
        let mut channels = input.channels();

        for (slot, stage) in chain.iter().enumerate() {
            let component = match *stage {
                Stage::Passthrough => ComponentSpec::Passthrough,
                Stage::Parse => ComponentSpec::Parser {
                    codec: compressed(input.codec(), stage, input)?,
                },
                Stage::Decode => ComponentSpec::Decoder {
                    codec: compressed(input.codec(), stage, input)?,
                },
                Stage::Resample {
                    sample_rate,
                    sample_format,
                    channels: target_channels,
                } => {
                    channels = Some(target_channels);
                    ComponentSpec::Resampler {
                        sample_rate,
                        sample_format,
                        channels: target_channels,
                    }
                }
                Stage::Encode => {
                    let codec = compressed(output.codec(), stage, output)?;
                    ComponentSpec::Encoder {
                        codec,
                        bitrate: encoder.bitrate_for(codec, channels),
                        channels,
                    }
                }
            };

            instructions.push(GraphInstruction::Spawn { slot, component });
            instructions.push(GraphInstruction::Link {
                from: upstream,
                to: Endpoint::Stage(slot),
            });
            upstream = Endpoint::Stage(slot);
        }

        instructions.push(GraphInstruction::Link {
            from: upstream,
            to: Endpoint::OutputMerge,
        });

        Ok(Self { instructions })
    }

    pub fn instructions(&self) -> &[GraphInstruction] {
        &self.instructions
    }

    /// Spawned components in link order
    pub fn components(&self) -> Vec<ComponentSpec> {
        self.instructions
            .iter()
            .filter_map(|i| match i {
                GraphInstruction::Spawn { component, .. } => Some(*component),
                GraphInstruction::Link { .. } => None,
            })
            .collect()
    }

    /// True when the input tap is linked straight to the output merge point
    pub fn is_passthrough(&self) -> bool {
        self.components().is_empty()
    }

    /// The plan as JSON, for hosts that schedule linking specifications as data
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.instructions)?)
    }
}

fn compressed(codec: Option<Codec>, stage: &Stage, format: &dyn fmt::Display) -> Result<Codec> {
    codec.ok_or_else(|| {
        PathError::InvalidChain(format!("{} stage has no codec for {}", stage, format))
    })
}
