//! Element configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PathError, Result};
use crate::format::{Codec, InputFormat, OutputKind};

/// Get recommended AAC bitrate for a given channel count.
pub fn recommended_aac_bitrate(channels: Option<u16>) -> u64 {
    match channels {
        Some(1) => 64_000,
        Some(2) => 128_000,
        Some(6) => 384_000,
        Some(8) => 512_000,
        _ => 128_000,
    }
}

/// Get recommended Opus bitrate for a given channel count.
pub fn recommended_opus_bitrate(channels: Option<u16>) -> u64 {
    match channels {
        Some(1) => 32_000,
        Some(n) if n > 2 => 48_000 * n as u64,
        _ => 64_000,
    }
}

/// Encoder settings applied to the encode stage, when the path has one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// AAC bitrate in bps; derived from the channel count when unset
    #[serde(default)]
    pub aac_bitrate: Option<u64>,

    /// Opus bitrate in bps; derived from the channel count when unset
    #[serde(default)]
    pub opus_bitrate: Option<u64>,
}

impl EncoderConfig {
    pub fn bitrate_for(&self, codec: Codec, channels: Option<u16>) -> u64 {
        match codec {
            Codec::Aac => self
                .aac_bitrate
                .unwrap_or_else(|| recommended_aac_bitrate(channels)),
            Codec::Opus => self
                .opus_bitrate
                .unwrap_or_else(|| recommended_opus_bitrate(channels)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.aac_bitrate == Some(0) || self.opus_bitrate == Some(0) {
            return Err(PathError::Config("encoder bitrate must be non-zero".into()));
        }
        Ok(())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive (trace, debug, info, warn, error, or a full EnvFilter string)
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "audio_transcode_path=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Construction-time configuration of a transcoding element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementConfig {
    /// Statically known input format; `None` waits for a format notification
    #[serde(default)]
    pub input_format: Option<InputFormat>,

    /// Codec family to emit
    pub output: OutputKind,

    /// Encoder configuration
    #[serde(default)]
    pub encoder: EncoderConfig,
}

impl ElementConfig {
    pub fn new(output: OutputKind) -> Self {
        Self {
            input_format: None,
            output,
            encoder: EncoderConfig::default(),
        }
    }

    pub fn with_input_format(mut self, format: InputFormat) -> Self {
        self.input_format = Some(format);
        self
    }

    pub fn with_encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(format) = &self.input_format {
            format.validate()?;
        }
        self.output.validate()?;
        self.encoder.validate()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ElementConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}
