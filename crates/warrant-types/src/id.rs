//! Subject identifiers.
//!
//! A user is identified by a stable account UUID ([`UserId`]); a group by
//! a validated name ([`GroupName`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Name of the group every connecting user is enrolled into.
///
/// Members can never be removed from it.
pub const EVERYONE: &str = "everyone";

/// Errors produced while parsing identifiers at the input boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The user identifier is not a UUID.
    #[error("invalid user id '{0}': expected a UUID")]
    InvalidUser(String),

    /// The group name is empty.
    #[error("group name must not be empty")]
    EmptyGroup,

    /// The group name contains a character outside `[0-9A-Za-z_-]`.
    #[error("invalid character in group name: '{0}'")]
    InvalidGroupCharacter(char),
}

/// Stable identifier of a user account.
///
/// # Example
///
/// ```
/// use warrant_types::UserId;
///
/// let id: UserId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
/// assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Creates a random user id (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| IdError::InvalidUser(s.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated group name.
///
/// Group names are non-empty and use only `[0-9A-Za-z_-]`, which keeps
/// them safe to embed in storage keys and file names.
///
/// # Example
///
/// ```
/// use warrant_types::GroupName;
///
/// let admins = GroupName::new("admins").unwrap();
/// assert_eq!(admins.as_str(), "admins");
/// assert!(GroupName::new("ad mins").is_err());
/// assert!(GroupName::everyone().is_everyone());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupName(String);

impl GroupName {
    /// Validates and wraps a group name.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] for an empty name or a disallowed character.
    pub fn new(name: impl Into<String>) -> Result<Self, IdError> {
        let name = name.into();
        if name.is_empty() {
            return Err(IdError::EmptyGroup);
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(IdError::InvalidGroupCharacter(c));
        }
        Ok(Self(name))
    }

    /// The protected default group.
    #[must_use]
    pub fn everyone() -> Self {
        Self(EVERYONE.to_string())
    }

    /// Returns `true` for the protected default group.
    #[must_use]
    pub fn is_everyone(&self) -> bool {
        self.0 == EVERYONE
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for GroupName {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for GroupName {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GroupName> for String {
    fn from(value: GroupName) -> Self {
        value.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_roundtrip_through_string() {
        let id = UserId::new();
        let parsed: UserId = id.to_string().parse().expect("should parse own display");
        assert_eq!(parsed, id);
    }

    #[test]
    fn user_id_rejects_garbage() {
        let err = "not-a-uuid".parse::<UserId>().unwrap_err();
        assert_eq!(err, IdError::InvalidUser("not-a-uuid".into()));
    }

    #[test]
    fn group_name_validation() {
        assert!(GroupName::new("mods_2-eu").is_ok());
        assert_eq!(GroupName::new(""), Err(IdError::EmptyGroup));
        assert_eq!(
            GroupName::new("a/b"),
            Err(IdError::InvalidGroupCharacter('/'))
        );
        assert_eq!(
            GroupName::new("a.b"),
            Err(IdError::InvalidGroupCharacter('.'))
        );
    }

    #[test]
    fn everyone_is_protected_name() {
        assert!(GroupName::new("everyone").expect("valid").is_everyone());
        assert!(!GroupName::new("admins").expect("valid").is_everyone());
    }

    #[test]
    fn group_name_serde_validates() {
        let ok: GroupName = serde_json::from_str("\"admins\"").expect("valid name");
        assert_eq!(ok.as_str(), "admins");

        let bad = serde_json::from_str::<GroupName>("\"../etc\"");
        assert!(bad.is_err());
    }
}
