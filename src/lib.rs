//! Audio transcoding path selection
//!
//! Given the format of an incoming audio stream and the codec family an
//! element must emit, picks the minimal chain of parse/decode/resample/encode
//! stages and splices it into a host processing graph, once, when the input
//! format first becomes known. Codecs and data transport stay with the host.

pub mod config;
pub mod config_file;
pub mod error;
pub mod format;
pub mod gate;
pub mod graph;
pub mod logging;
pub mod plan;

#[cfg(test)]
pub(crate) mod tests;

pub use config::{ElementConfig, EncoderConfig, LogFormat, LoggingConfig};
pub use error::{PathError, Result};
pub use format::{Codec, InputFormat, OutputKind, RawAudioParams, SampleFormat, OPUS_SAMPLE_RATE};
pub use gate::{drive_format_notifications, GateState, Resolution, ResolutionGate, TranscodeElement};
pub use graph::{Assembly, ComponentSpec, Endpoint, GraphAssembler, GraphInstruction, HostGraph, SplicePlan};
pub use logging::init_logging;
pub use plan::{match_rule, select_path, select_rule, Rule, Stage, StageChain};
