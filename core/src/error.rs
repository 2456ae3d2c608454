//! Error types for parsing and specification loading.

use thiserror::Error;

use crate::ValidationError;

/// Errors raised while turning command-line tokens into a [`ParserOutput`].
///
/// [`ParserOutput`]: crate::ParserOutput
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The effective flag set failed validation.
    #[error("invalid command specification: {0}")]
    InvalidSpec(ValidationError),

    /// A string flag was given without a value.
    #[error("option requires argument: {0}")]
    MissingValue(String),

    /// A string short flag appeared before other short flags in one group
    /// (e.g. `-nv` where `-n` takes a value).
    #[error("option requires argument (but was followed by another short argument): {0}")]
    MissingValueInGroup(String),

    /// Unrecognized option token; only raised when the engine is not permissive.
    #[error("unknown or unexpected option: {0}")]
    UnknownFlag(String),

    /// A required positional argument had no value and no default.
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    /// A positional value was outside the argument's allowed options.
    #[error("expected {name} to be one of {allowed:?}, got `{value}`")]
    InvalidArgument {
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    /// More positional values than declared arguments in strict mode.
    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

impl From<ValidationError> for ParseError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidSpec(err)
    }
}

/// Errors that can occur while reading or writing specification files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Failure reported by a command's `run`.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Failed(String),
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T, E = ParseError> = std::result::Result<T, E>;
