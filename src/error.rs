use thiserror::Error;

/// Malformed numeric text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty numeric value")]
    Empty,
    #[error("'{0}' is not a valid number")]
    Malformed(String),
    #[error("exponent of '{0}' is out of range")]
    ExponentOutOfRange(String),
}

/// A value that cannot take part in ratio metrics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0} is not finite.")]
    NotFinite(String),
    #[error("{0} is zero, and ratio metrics would fail.")]
    Zero(String),
    #[error("Midpoint is zero, so percent difference cannot be computed.")]
    ZeroMidpoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing OPENAI_API_KEY. Set it and run again.")]
    MissingApiKey,
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("input stream closed")]
    InputClosed,
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
