//! Permission strings accepted at the input boundary.
//!
//! Anything typed by an operator (a permission to grant, revoke or check)
//! goes through [`PermissionString::parse`] before it reaches the engine.
//! Existence probes (`scope.?`) are built by code, never typed, so `?` is
//! not part of the accepted alphabet.

use crate::ParseError;
use std::fmt;
use std::str::FromStr;

/// Example permissions shown in help output.
pub const EXAMPLES: [&str; 2] = ["permissions.edit.player.grant", "permissions.groups.*"];

/// A validated, dot-delimited permission.
///
/// Accepted characters: `[0-9A-Za-z_.*-]`. Segments must be non-empty.
///
/// # Example
///
/// ```
/// use warrant_auth::{ParseError, PermissionString};
///
/// let perm = PermissionString::parse("permissions.groups.*").unwrap();
/// assert_eq!(perm.segments().count(), 3);
///
/// assert_eq!(
///     PermissionString::parse("chat color"),
///     Err(ParseError::InvalidCharacter(' '))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionString(String);

impl PermissionString {
    /// Validates `input` as a permission.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Empty`] for an empty string
    /// - [`ParseError::InvalidCharacter`] for the first disallowed character
    /// - [`ParseError::EmptySegment`] for `a..b`, `.a` or `a.`
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty);
        }
        if let Some(c) = input.chars().find(|c| !is_permission_char(*c)) {
            return Err(ParseError::InvalidCharacter(c));
        }
        if input.split('.').any(str::is_empty) {
            return Err(ParseError::EmptySegment(input.to_string()));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates the dot-delimited segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn is_permission_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '*')
}

impl FromStr for PermissionString {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PermissionString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermissionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_alphabet() {
        for ok in [
            "server.stop",
            "chat.*",
            "*",
            "home.limit.5",
            "mod-tools.ban_user",
            "A.Z.0.9",
        ] {
            assert!(PermissionString::parse(ok).is_ok(), "should accept {ok}");
        }
    }

    #[test]
    fn examples_are_valid() {
        for example in EXAMPLES {
            assert!(PermissionString::parse(example).is_ok());
        }
    }

    #[test]
    fn rejects_first_invalid_character() {
        assert_eq!(
            PermissionString::parse("a.b?c!"),
            Err(ParseError::InvalidCharacter('?'))
        );
        assert_eq!(
            PermissionString::parse("ünicode"),
            Err(ParseError::InvalidCharacter('ü'))
        );
    }

    #[test]
    fn rejects_existence_probe() {
        assert_eq!(
            PermissionString::parse("permissions.groups.?"),
            Err(ParseError::InvalidCharacter('?'))
        );
    }

    #[test]
    fn rejects_empty_and_empty_segments() {
        assert_eq!(PermissionString::parse(""), Err(ParseError::Empty));
        for bad in ["a..b", ".a", "a."] {
            assert!(matches!(
                PermissionString::parse(bad),
                Err(ParseError::EmptySegment(_))
            ));
        }
    }
}
