//! Errors raised while parsing and authorizing a command line.

use thiserror::Error;
use warrant_auth::ParseError;
use warrant_types::{ErrorCode, IdError};

/// A command rejected before any engine operation ran.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command '{word}', expected one of: {expected}")]
    UnknownCommand { word: String, expected: String },

    #[error("incomplete command '{command}', expected one of: {expected}")]
    Incomplete { command: String, expected: String },

    #[error("missing argument <{0}>")]
    MissingArgument(&'static str),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error(transparent)]
    InvalidPermission(#[from] ParseError),

    #[error("invalid <{name}>: {source}")]
    InvalidId {
        name: &'static str,
        #[source]
        source: IdError,
    },

    /// The actor neither holds the permission nor has the operator level.
    #[error("missing permission '{0}'")]
    PermissionDenied(&'static str),
}

impl ErrorCode for CommandError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand { .. } => "COMMAND_UNKNOWN",
            Self::Incomplete { .. } => "COMMAND_INCOMPLETE",
            Self::MissingArgument(_) => "COMMAND_MISSING_ARGUMENT",
            Self::UnexpectedArgument(_) => "COMMAND_UNEXPECTED_ARGUMENT",
            Self::InvalidPermission(_) => "COMMAND_INVALID_PERMISSION",
            Self::InvalidId { .. } => "COMMAND_INVALID_ID",
            Self::PermissionDenied(_) => "COMMAND_PERMISSION_DENIED",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}
