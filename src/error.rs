use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}: minimum {min} exceeds maximum {max}")]
    InvertedRange {
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{name}: value {value} is outside the accepted range")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("failed to read maze config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse maze config: {0}")]
    Parse(#[from] serde_json::Error),
}
