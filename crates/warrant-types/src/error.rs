//! Error code interface shared by every warrant crate.
//!
//! Each layer defines its own `thiserror` enum and implements
//! [`ErrorCode`] on it, so callers (the CLI, an embedding server) can
//! branch on a stable code and decide whether to report and continue or
//! abort.
//!
//! # Example
//!
//! ```
//! use warrant_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum AdminError {
//!     GroupMissing(String),
//!     CorruptTree,
//! }
//!
//! impl ErrorCode for AdminError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::GroupMissing(_) => "ADMIN_GROUP_MISSING",
//!             Self::CorruptTree => "ADMIN_CORRUPT_TREE",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::GroupMissing(_))
//!     }
//! }
//!
//! let err = AdminError::GroupMissing("admins".into());
//! assert_eq!(err.code(), "ADMIN_GROUP_MISSING");
//! assert!(err.is_recoverable());
//! ```

/// Machine-readable error classification.
///
/// # Code Format
///
/// - UPPER_SNAKE_CASE
/// - Prefixed with the owning layer (`PERMISSION_`, `TREE_`, `STORAGE_`, `ENGINE_`, `CONFIG_`, `COMMAND_`)
/// - Stable once published
///
/// # Recoverability
///
/// Recoverable errors are ordinary outcomes reported to the caller:
/// a missing group, an existing membership, a transient I/O failure.
/// Non-recoverable errors point at corrupt data or a programming error
/// and must not be retried blindly.
pub trait ErrorCode {
    /// Returns the stable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the caller may report the error and carry on.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that `err` carries a well-formed code with the given prefix.
///
/// Intended for tests that walk every variant of an error enum.
///
/// # Panics
///
/// Panics if the code is empty, lacks the prefix, or is not UPPER_SNAKE_CASE.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// Runs [`assert_error_code`] over a slice of variants.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
