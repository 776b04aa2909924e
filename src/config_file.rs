//! Configuration file support
//!
//! Loads element configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{ElementConfig, EncoderConfig, LogFormat, LoggingConfig};
use crate::error::Result;
use crate::format::{InputFormat, OutputKind};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Element settings
    pub element: ElementSettings,
    /// Encoder settings
    pub encoder: Option<EncoderSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementSettings {
    /// Codec family to emit
    pub output: OutputKind,
    /// Statically known input format
    pub input: Option<InputFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSettings {
    /// AAC bitrate in bps
    pub aac_bitrate: Option<u64>,
    /// Opus bitrate in bps
    pub opus_bitrate: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<LogFormat>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        Self {
            element: ElementSettings {
                output: OutputKind::Opus,
                input: None,
            },
            encoder: Some(EncoderSettings {
                aac_bitrate: Some(128_000),
                opus_bitrate: Some(64_000),
            }),
            logging: Some(LoggingSettings {
                level: LoggingConfig::default().level,
                format: Some(LogFormat::Pretty),
            }),
        }
    }

    /// Convert to a validated ElementConfig
    pub fn into_element_config(self) -> Result<ElementConfig> {
        let config = ElementConfig {
            input_format: self.element.input,
            output: self.element.output,
            encoder: self
                .encoder
                .map(|e| EncoderConfig {
                    aac_bitrate: e.aac_bitrate,
                    opus_bitrate: e.opus_bitrate,
                })
                .unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn logging_config(&self) -> LoggingConfig {
        match &self.logging {
            Some(l) => LoggingConfig {
                level: l.level.clone(),
                format: l.format.unwrap_or_default(),
            },
            None => LoggingConfig::default(),
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
