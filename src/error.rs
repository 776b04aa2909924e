use thiserror::Error;

use crate::format::{InputFormat, OutputKind};

/// Main error type for transcoding path selection and assembly
#[derive(Error, Debug)]
pub enum PathError {
    /// No rule of the decision table bridges the input to the requested output
    #[error("Unsupported conversion: no transcoding path from {input} to {output}")]
    UnsupportedConversion {
        input: InputFormat,
        output: OutputKind,
    },

    /// A stage chain that cannot be mapped onto components for its formats
    #[error("Invalid stage chain: {0}")]
    InvalidChain(String),

    /// A configured format with out-of-range parameters
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The host graph refused a component or link
    #[error("Host graph error: {0}")]
    Graph(String),

    /// Element configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PathError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SampleFormat;

    #[test]
    fn test_unsupported_conversion_names_both_formats() {
        let err = PathError::UnsupportedConversion {
            input: InputFormat::RawAudio {
                sample_rate: 44100,
                sample_format: SampleFormat::S16LE,
                channels: 2,
            },
            output: OutputKind::Opus,
        };
        let msg = err.to_string();
        assert!(msg.contains("raw s16le (44100 Hz, 2 ch)"));
        assert!(msg.contains("Opus"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PathError = io.into();
        assert!(matches!(err, PathError::Io(_)));
    }
}
