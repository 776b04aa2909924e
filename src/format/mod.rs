//! Stream format model
//!
//! The closed set of audio formats an element can receive, the output codec
//! families it can be asked to produce, and the predicates the path selector
//! dispatches on.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PathError, Result};

/// Sample rate Opus always operates at
pub const OPUS_SAMPLE_RATE: u32 = 48000;
/// Sample format the Opus encoder takes from a resampler
pub const OPUS_SAMPLE_FORMAT: SampleFormat = SampleFormat::S16LE;

/// PCM sample layout carried by raw audio streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    S8,
    U8,
    S16LE,
    S16BE,
    S24LE,
    S32LE,
    F32LE,
    F64LE,
}

impl SampleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleFormat::S8 => "s8",
            SampleFormat::U8 => "u8",
            SampleFormat::S16LE => "s16le",
            SampleFormat::S16BE => "s16be",
            SampleFormat::S24LE => "s24le",
            SampleFormat::S32LE => "s32le",
            SampleFormat::F32LE => "f32le",
            SampleFormat::F64LE => "f64le",
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compressed codec family, as configured on parser/decoder/encoder components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Codec {
    Aac,
    Opus,
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Aac => f.write_str("AAC"),
            Codec::Opus => f.write_str("Opus"),
        }
    }
}

/// Parameters fully describing a raw PCM stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawAudioParams {
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
    pub channels: u16,
}

impl fmt::Display for RawAudioParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "raw {} ({} Hz, {} ch)",
            self.sample_format, self.sample_rate, self.channels
        )
    }
}

/// Format of the stream arriving at the element's input tap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "codec", rename_all = "snake_case")]
pub enum InputFormat {
    /// AAC elementary stream
    Aac { sample_rate: u32, channels: u16 },
    /// Bare Opus packets, always 48 kHz
    Opus,
    /// Opus packets inside a packetized container; needs de-framing to become bare Opus
    OpusInContainer,
    /// Uncompressed PCM
    RawAudio {
        sample_rate: u32,
        sample_format: SampleFormat,
        channels: u16,
    },
}

impl InputFormat {
    /// Whether the payload is Opus, framed or not
    pub fn is_opus_like(&self) -> bool {
        matches!(self, InputFormat::Opus | InputFormat::OpusInContainer)
    }

    /// Sample rate of the stream. Opus-like streams are always 48 kHz.
    pub fn sample_rate(&self) -> Option<u32> {
        match self {
            InputFormat::Aac { sample_rate, .. } | InputFormat::RawAudio { sample_rate, .. } => {
                Some(*sample_rate)
            }
            InputFormat::Opus | InputFormat::OpusInContainer => Some(OPUS_SAMPLE_RATE),
        }
    }

    /// Channel count, when the format carries one
    pub fn channels(&self) -> Option<u16> {
        match self {
            InputFormat::Aac { channels, .. } | InputFormat::RawAudio { channels, .. } => {
                Some(*channels)
            }
            InputFormat::Opus | InputFormat::OpusInContainer => None,
        }
    }

    /// Compressed codec of the payload; `None` for raw PCM
    pub fn codec(&self) -> Option<Codec> {
        match self {
            InputFormat::Aac { .. } => Some(Codec::Aac),
            InputFormat::Opus | InputFormat::OpusInContainer => Some(Codec::Opus),
            InputFormat::RawAudio { .. } => None,
        }
    }

    pub fn raw_params(&self) -> Option<RawAudioParams> {
        match *self {
            InputFormat::RawAudio {
                sample_rate,
                sample_format,
                channels,
            } => Some(RawAudioParams {
                sample_rate,
                sample_format,
                channels,
            }),
            _ => None,
        }
    }

    /// Reject formats with a zero sample rate or channel count
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate() == Some(0) {
            return Err(PathError::InvalidFormat(format!(
                "{}: sample rate must be non-zero",
                self
            )));
        }
        if self.channels() == Some(0) {
            return Err(PathError::InvalidFormat(format!(
                "{}: channel count must be non-zero",
                self
            )));
        }
        Ok(())
    }
}

impl From<RawAudioParams> for InputFormat {
    fn from(params: RawAudioParams) -> Self {
        InputFormat::RawAudio {
            sample_rate: params.sample_rate,
            sample_format: params.sample_format,
            channels: params.channels,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Aac {
                sample_rate,
                channels,
            } => write!(f, "AAC ({} Hz, {} ch)", sample_rate, channels),
            InputFormat::Opus => f.write_str("Opus"),
            InputFormat::OpusInContainer => f.write_str("Opus (in container)"),
            InputFormat::RawAudio {
                sample_rate,
                sample_format,
                channels,
            } => write!(
                f,
                "raw {} ({} Hz, {} ch)",
                sample_format, sample_rate, channels
            ),
        }
    }
}

/// Codec family the element must emit
///
/// A raw target either inherits its parameters from upstream (`format: None`)
/// or pins them. Pinned parameters never cause a conversion on their own: a raw
/// input only passes when it already matches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "codec", rename_all = "snake_case")]
pub enum OutputKind {
    Aac,
    Opus,
    RawAudio {
        #[serde(default)]
        format: Option<RawAudioParams>,
    },
}

impl OutputKind {
    /// Raw output inheriting upstream parameters
    pub fn raw() -> Self {
        OutputKind::RawAudio { format: None }
    }

    /// Raw output with fixed parameters
    pub fn raw_pinned(params: RawAudioParams) -> Self {
        OutputKind::RawAudio {
            format: Some(params),
        }
    }

    pub fn codec(&self) -> Option<Codec> {
        match self {
            OutputKind::Aac => Some(Codec::Aac),
            OutputKind::Opus => Some(Codec::Opus),
            OutputKind::RawAudio { .. } => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let OutputKind::RawAudio {
            format: Some(params),
        } = self
        {
            InputFormat::from(*params).validate()?;
        }
        Ok(())
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Aac => f.write_str("AAC"),
            OutputKind::Opus => f.write_str("Opus"),
            OutputKind::RawAudio { format: None } => f.write_str("raw audio"),
            OutputKind::RawAudio {
                format: Some(params),
            } => fmt::Display::fmt(params, f),
        }
    }
}
