//! Bus stop types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest identifier accepted for stops and services.
const MAX_IDENT_LEN: usize = 32;

/// Check the lexical rules shared by stop ids and service numbers.
pub(super) fn check_ident(s: &str) -> Result<(), &'static str> {
    if s.is_empty() {
        return Err("must not be empty");
    }

    if s.len() > MAX_IDENT_LEN {
        return Err("must be at most 32 characters");
    }

    if !s
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err("must contain only ASCII letters, digits, '-' or '_'");
    }

    Ok(())
}

/// Error returned when parsing an invalid stop id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// Identifier of a bus stop.
///
/// Stop ids are 1 to 32 ASCII letters, digits, dashes or underscores, which
/// keeps them safe to embed in URL paths.
///
/// # Examples
///
/// ```
/// use bus_server::domain::StopId;
///
/// let id = StopId::parse("Stop-001").unwrap();
/// assert_eq!(id.as_str(), "Stop-001");
///
/// assert!(StopId::parse("").is_err());
/// assert!(StopId::parse("a/b").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Parse a stop id from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        check_ident(s).map_err(|reason| InvalidStopId { reason })?;
        Ok(StopId(s.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopId {
    type Error = InvalidStopId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        check_ident(&s).map_err(|reason| InvalidStopId { reason })?;
        Ok(StopId(s))
    }
}

impl From<StopId> for String {
    fn from(id: StopId) -> Self {
        id.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A physical bus stop.
///
/// Ordering compares the id first, so sets of stops iterate in id order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
}

impl Stop {
    /// Creates a new stop.
    pub fn new(id: StopId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Anything built from the allowed alphabet parses and round-trips
        #[test]
        fn roundtrip(s in "[A-Za-z0-9_-]{1,32}") {
            let id = StopId::parse(&s).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }

        /// Any character outside the alphabet is rejected
        #[test]
        fn foreign_chars_rejected(prefix in "[A-Za-z0-9]{0,8}", bad in "[ /?#.:%]") {
            let s = format!("{prefix}{bad}");
            prop_assert!(StopId::parse(&s).is_err());
        }
    }
}
