//! Error types for the engine, the parameter bag and the hook registry.
//!
//! Every variant belongs to one [`ErrorKind`] and carries a stable code for
//! structured output, so callers can tell a missing attribute from a corrupt
//! state file without matching on message text.

use crate::config::ValidationError;
use thiserror::Error;

/// Result type alias for bucle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A name was looked up and nothing answered to it.
    Attribute,
    /// Persisted state could not be produced or read back.
    Deserialization,
    /// The engine, a hook or a config file is set up wrong.
    Configuration,
    /// Filesystem failure.
    Io,
    /// Failure raised by a collaborator (network, optimizer, data source).
    External,
}

/// Errors raised by bucle.
#[derive(Error, Debug)]
pub enum Error {
    /// Lookup of an undefined name on the bag or the engine.
    #[error("No attribute named '{name}'\n  → Set it on the parameter bag or pass it to the engine builder")]
    Attribute { name: String },

    /// The attribute exists but holds a different kind of value.
    #[error("Attribute '{name}' is not {expected}")]
    TypeMismatch { name: String, expected: String },

    /// Attempt to overwrite or remove a counter the engine owns.
    #[error("'{name}' is a reserved counter managed by the engine")]
    Reserved { name: String },

    /// Saved state is malformed or does not fit the bag.
    #[error("Cannot restore state: {message}")]
    Deserialization { message: String },

    /// A persistent entry holds an opaque object with no state contract.
    #[error("Attribute '{name}' is an opaque object and cannot be saved\n  → Implement Stateful for it or store it under '_{name}' to keep it out of saved state")]
    NotSerializable { name: String },

    /// A value could not be turned into a storable form.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Hook registered with a stride below one.
    #[error("Invalid hook stride {stride}: must be at least 1")]
    InvalidStride { stride: u64 },

    /// A required extension point was never supplied.
    #[error("Engine is missing its '{name}' implementation\n  → Provide it before calling run()")]
    MissingExtension { name: &'static str },

    /// Engine configuration is inconsistent.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Config file failed validation.
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Error raised by user code or a collaborator, passed through untouched.
    #[error(transparent)]
    External(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an attribute error for `name`.
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute { name: name.into() }
    }

    /// Create a type mismatch error for `name`.
    pub fn mismatch(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected: expected.into(),
        }
    }

    /// Create a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization {
            message: message.into(),
        }
    }

    /// Wrap a collaborator error.
    pub fn external(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::External(err.into())
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Attribute { .. } | Self::TypeMismatch { .. } | Self::Reserved { .. } => {
                ErrorKind::Attribute
            }
            Self::Deserialization { .. }
            | Self::NotSerializable { .. }
            | Self::Serialization { .. } => ErrorKind::Deserialization,
            Self::InvalidStride { .. }
            | Self::MissingExtension { .. }
            | Self::Config { .. }
            | Self::Validation(_) => ErrorKind::Configuration,
            Self::Io { .. } => ErrorKind::Io,
            Self::External(_) => ErrorKind::External,
        }
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Attribute { .. } => "E001",
            Self::Reserved { .. } => "E002",
            Self::TypeMismatch { .. } => "E003",
            Self::Deserialization { .. } => "E010",
            Self::NotSerializable { .. } => "E011",
            Self::Serialization { .. } => "E012",
            Self::InvalidStride { .. } => "E020",
            Self::MissingExtension { .. } => "E021",
            Self::Config { .. } => "E022",
            Self::Validation(_) => "E023",
            Self::Io { .. } => "E030",
            Self::External(_) => "E040",
        }
    }
}
