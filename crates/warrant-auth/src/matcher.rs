//! Match a granted path against a queried permission.
//!
//! Only a trailing `*` segment is a wildcard. A `*` anywhere else, or a
//! segment such as `b*`, is compared literally.
//!
//! | Grant | Query | Result |
//! |-------|-------|--------|
//! | `chat.color` | `chat.color` | permitted |
//! | `chat.*` | `chat.color`, `chat.color.red` | permitted |
//! | `chat.*` | `chat` | not permitted |
//! | `*` | anything non-empty | permitted |
//! | `a.*.c` | `a.x.c` | not permitted |
//! | `permissions.groups.create` | `permissions.groups.?` | permitted |

/// Suffix marking an existence query.
pub const EXISTENCE_SUFFIX: &str = ".?";

/// The wildcard segment.
pub const WILDCARD: &str = "*";

/// Returns `true` if `query` ends with [`EXISTENCE_SUFFIX`].
#[must_use]
pub fn is_existence_query(query: &str) -> bool {
    query.ends_with(EXISTENCE_SUFFIX)
}

/// Decides whether the grant at `path` permits `query`.
///
/// An existence query `scope.?` is permitted when the grant covers `scope`
/// itself or lies anywhere under it.
#[must_use]
pub fn permits(path: &str, query: &str) -> bool {
    match query.strip_suffix(EXISTENCE_SUFFIX) {
        Some(scope) if !scope.is_empty() => covers(path, scope) || is_under(path, scope),
        Some(_) => false,
        None => covers(path, query),
    }
}

/// Exact or trailing-wildcard match of a concrete query.
#[must_use]
pub fn covers(path: &str, query: &str) -> bool {
    if query.is_empty() {
        return false;
    }
    if path == query || path == WILDCARD {
        return true;
    }
    match path.strip_suffix(WILDCARD) {
        Some(prefix) if prefix.ends_with('.') => {
            query.len() > prefix.len() && query.starts_with(prefix)
        }
        _ => false,
    }
}

/// Returns `true` if `path` is strictly below `scope`.
#[must_use]
pub fn is_under(path: &str, scope: &str) -> bool {
    path.len() > scope.len() + 1
        && path.starts_with(scope)
        && path.as_bytes()[scope.len()] == b'.'
}
