//! Path selector - determines which stages bridge an input format to an output kind

use serde::Serialize;
use std::fmt;

use crate::error::{PathError, Result};
use crate::format::{InputFormat, OutputKind, SampleFormat, OPUS_SAMPLE_FORMAT, OPUS_SAMPLE_RATE};

/// One abstract conversion step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    /// Forward buffers unchanged
    Passthrough,
    /// Strip the container framing around an already-compressed payload
    Parse,
    /// Compressed input to raw PCM
    Decode,
    /// Raw PCM to the output codec
    Encode,
    /// PCM rate/format conversion; `channels` is carried over from the input
    Resample {
        sample_rate: u32,
        sample_format: SampleFormat,
        channels: u16,
    },
}

impl Stage {
    /// The only resample target the table ever uses: Opus encoder input
    pub fn resample_for_opus(channels: u16) -> Self {
        Stage::Resample {
            sample_rate: OPUS_SAMPLE_RATE,
            sample_format: OPUS_SAMPLE_FORMAT,
            channels,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Passthrough => f.write_str("passthrough"),
            Stage::Parse => f.write_str("parse"),
            Stage::Decode => f.write_str("decode"),
            Stage::Encode => f.write_str("encode"),
            Stage::Resample {
                sample_rate,
                sample_format,
                channels,
            } => write!(
                f,
                "resample({} Hz, {}, {} ch)",
                sample_rate, sample_format, channels
            ),
        }
    }
}

/// Ordered stages between the input tap and the output merge point.
/// Empty means the input is linked straight through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageChain(Vec<Stage>);

impl StageChain {
    pub fn passthrough() -> Self {
        Self(Vec::new())
    }

    pub fn is_passthrough(&self) -> bool {
        self.0.is_empty()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stage> {
        self.0.iter()
    }

    pub fn has_resample(&self) -> bool {
        self.0.iter().any(|s| matches!(s, Stage::Resample { .. }))
    }
}

impl From<Vec<Stage>> for StageChain {
    fn from(stages: Vec<Stage>) -> Self {
        Self(stages)
    }
}

impl<'a> IntoIterator for &'a StageChain {
    type Item = &'a Stage;
    type IntoIter = std::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for StageChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("passthrough");
        }
        for (i, stage) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", stage)?;
        }
        Ok(())
    }
}

/// A row of the decision table. Variants are listed in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// 1: output already matches the input
    Identity,
    /// 2: containerized Opus to bare Opus
    Deframe,
    /// 3: Opus-like to raw
    DecodeOpus,
    /// 4: Opus-like to AAC
    OpusToAac,
    /// 5: 48 kHz AAC to Opus
    AacToOpus,
    /// 6: AAC at any other rate to Opus
    AacToOpusResampled { channels: u16 },
    /// 7: AAC to raw
    DecodeAac,
    /// 8: 48 kHz raw to Opus
    RawToOpus,
    /// 9: raw at any other rate to Opus
    RawToOpusResampled { channels: u16 },
    /// 10: raw to AAC
    RawToAac,
}

impl Rule {
    /// Position of the rule in the precedence order, 1-based
    pub fn number(&self) -> u8 {
        match self {
            Rule::Identity => 1,
            Rule::Deframe => 2,
            Rule::DecodeOpus => 3,
            Rule::OpusToAac => 4,
            Rule::AacToOpus => 5,
            Rule::AacToOpusResampled { .. } => 6,
            Rule::DecodeAac => 7,
            Rule::RawToOpus => 8,
            Rule::RawToOpusResampled { .. } => 9,
            Rule::RawToAac => 10,
        }
    }

    pub fn chain(&self) -> StageChain {
        let stages = match *self {
            Rule::Identity => vec![],
            Rule::Deframe => vec![Stage::Parse],
            Rule::DecodeOpus | Rule::DecodeAac => vec![Stage::Decode],
            Rule::OpusToAac | Rule::AacToOpus => vec![Stage::Decode, Stage::Encode],
            Rule::AacToOpusResampled { channels } => vec![
                Stage::Decode,
                Stage::resample_for_opus(channels),
                Stage::Encode,
            ],
            Rule::RawToOpus | Rule::RawToAac => vec![Stage::Encode],
            Rule::RawToOpusResampled { channels } => {
                vec![Stage::resample_for_opus(channels), Stage::Encode]
            }
        };
        StageChain(stages)
    }
}

/// Find the first decision-table rule matching `(input, output)`.
///
/// Arms are in precedence order and the match has no wildcard, so adding a
/// format variant fails to compile until its combinations are placed here.
/// `None` means the conversion is unsupported.
pub fn match_rule(input: &InputFormat, output: &OutputKind) -> Option<Rule> {
    use InputFormat as In;
    use OutputKind as Out;

    match (*input, *output) {
        // 1. identity
        (In::Aac { .. }, Out::Aac) | (In::Opus, Out::Opus) => Some(Rule::Identity),
        (In::RawAudio { .. }, Out::RawAudio { format: None }) => Some(Rule::Identity),
        (In::RawAudio { .. }, Out::RawAudio { format: Some(pinned) })
            if input.raw_params() == Some(pinned) =>
        {
            Some(Rule::Identity)
        }

        // 2. payload is already Opus, only the framing goes
        (In::OpusInContainer, Out::Opus) => Some(Rule::Deframe),

        // 3-4. Opus-like sources never need a resample
        (In::Opus | In::OpusInContainer, Out::RawAudio { .. }) => Some(Rule::DecodeOpus),
        (In::Opus | In::OpusInContainer, Out::Aac) => Some(Rule::OpusToAac),

        // 5-7. AAC
        (In::Aac { sample_rate: OPUS_SAMPLE_RATE, .. }, Out::Opus) => Some(Rule::AacToOpus),
        (In::Aac { channels, .. }, Out::Opus) => Some(Rule::AacToOpusResampled { channels }),
        (In::Aac { .. }, Out::RawAudio { .. }) => Some(Rule::DecodeAac),

        // 8-10. raw PCM
        (In::RawAudio { sample_rate: OPUS_SAMPLE_RATE, .. }, Out::Opus) => Some(Rule::RawToOpus),
        (In::RawAudio { channels, .. }, Out::Opus) => {
            Some(Rule::RawToOpusResampled { channels })
        }
        (In::RawAudio { .. }, Out::Aac) => Some(Rule::RawToAac),

        // 11. raw to raw with different pinned parameters
        (In::RawAudio { .. }, Out::RawAudio { format: Some(_) }) => None,
    }
}

/// Like [`match_rule`], but an unmatched pair is an `UnsupportedConversion` error
pub fn select_rule(input: &InputFormat, output: &OutputKind) -> Result<Rule> {
    match_rule(input, output).ok_or(PathError::UnsupportedConversion {
        input: *input,
        output: *output,
    })
}

/// Compute the stage chain bridging `input` to `output`
pub fn select_path(input: &InputFormat, output: &OutputKind) -> Result<StageChain> {
    let rule = select_rule(input, output)?;
    let chain = rule.chain();
    tracing::debug!(
        %input,
        %output,
        rule = rule.number(),
        %chain,
        "select_path: rule matched"
    );
    Ok(chain)
}
