//! Errors raised by the permission primitives.
//!
//! | Type | Variant | Code | Recoverable |
//! |------|---------|------|-------------|
//! | [`ParseError`] | `Empty` | `PERMISSION_EMPTY` | Yes |
//! | [`ParseError`] | `EmptySegment` | `PERMISSION_EMPTY_SEGMENT` | Yes |
//! | [`ParseError`] | `InvalidCharacter` | `PERMISSION_INVALID_CHARACTER` | Yes |
//! | [`TreeError`] | `NumericParent` | `TREE_NUMERIC_PARENT` | No |
//!
//! A [`ParseError`] is an input mistake reported back to whoever typed the
//! permission. A [`TreeError`] means a caller tried to build a structure the
//! tree forbids, or a stored tree was edited by hand; it is never retried.

use thiserror::Error;
use warrant_types::ErrorCode;

/// A permission string rejected at the input boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing was given.
    #[error("permission must not be empty")]
    Empty,

    /// Two dots in a row, or a leading/trailing dot.
    #[error("empty segment in permission '{0}'")]
    EmptySegment(String),

    /// A character outside `[0-9A-Za-z_.*-]`.
    #[error("invalid character in permission: '{0}'")]
    InvalidCharacter(char),
}

impl ErrorCode for ParseError {
    fn code(&self) -> &'static str {
        match self {
            Self::Empty => "PERMISSION_EMPTY",
            Self::EmptySegment(_) => "PERMISSION_EMPTY_SEGMENT",
            Self::InvalidCharacter(_) => "PERMISSION_INVALID_CHARACTER",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

/// Structural invariant violation in a [`PermissionTree`](crate::PermissionTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A numeric node would get (or already has) children.
    #[error("nodes with numerical values cannot have child nodes: '{segment}' in '{path}'")]
    NumericParent {
        /// The numeric segment.
        segment: String,
        /// The permission path (or record root) being processed.
        path: String,
    },
}

impl ErrorCode for TreeError {
    fn code(&self) -> &'static str {
        match self {
            Self::NumericParent { .. } => "TREE_NUMERIC_PARENT",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
