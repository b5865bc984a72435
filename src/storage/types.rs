use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error_handling::types::IdError;

/// Unique key of a stored todo.
///
/// Travels over HTTP as 32 lowercase hex digits and is only ever produced by
/// the storage layer on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TodoId(Uuid);

impl TodoId {
    const HEX_LEN: usize = 32;

    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the hex form sent by clients. Hyphenated or braced UUID forms are
    /// rejected so that only what the server itself renders is accepted.
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        if raw.is_empty() {
            return Err(IdError::Empty);
        }
        if raw.len() != Self::HEX_LEN || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(IdError::Malformed(raw.to_string()));
        }
        Uuid::try_parse(raw)
            .map(Self)
            .map_err(|_| IdError::Malformed(raw.to_string()))
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for TodoId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_plain_hex() {
        let id = TodoId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 32);
        assert!(text.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        assert_eq!(TodoId::parse(&text).unwrap(), id);
    }

    #[test]
    fn test_parse_accepts_uppercase() {
        let id = TodoId::new();
        let upper = id.to_string().to_uppercase();
        assert_eq!(upper.parse::<TodoId>().unwrap(), id);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(TodoId::parse(""), Err(IdError::Empty));
        for raw in [
            "abc",
            "5f1d7a3c9b8e4f2a",
            "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz",
            "67e55044-10b1-426f-9247-bb680e5fe0c8",
            " 67e5504410b1426f9247bb680e5fe0c8",
        ] {
            assert_eq!(
                TodoId::parse(raw),
                Err(IdError::Malformed(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }
}
