//! Job identifier and port definitions.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::IdError;

// =============================================================================
// Job identifier
// =============================================================================

/// Identifier of a scheduler job.
///
/// Unique key of a workload on the cluster. The same string is used for the
/// job, its task group, its task and its port label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(String);

impl JobId {
    /// Maximum identifier length accepted by the scheduler.
    pub const MAX_LEN: usize = 128;

    /// Parses a job id from a string.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        let len = s.chars().count();
        if len > Self::MAX_LEN {
            return Err(IdError::TooLong {
                len,
                max: Self::MAX_LEN,
            });
        }

        if let Some(ch) = s.chars().find(|c| c.is_control()) {
            return Err(IdError::ControlCharacter { ch });
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for JobId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for JobId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JobId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for JobId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

// =============================================================================
// Ports
// =============================================================================

/// A non-zero TCP/UDP port number.
///
/// All port values, whether they come from action inputs or scheduler
/// responses, are normalized into this type on receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Port(u16);

impl Port {
    /// Creates a port, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u16) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Returns the port number.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Parses a port from its decimal string form.
    ///
    /// Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid_port(s, "value is empty"));
        }

        let value: u64 = trimmed
            .parse()
            .map_err(|_| invalid_port(s, "not a decimal number"))?;

        Self::from_u64(value).map_err(|reason| invalid_port(s, reason))
    }

    /// Converts a wide integer into a port.
    pub fn try_from_u64(value: u64) -> Result<Self, IdError> {
        Self::from_u64(value).map_err(|reason| invalid_port(&value.to_string(), reason))
    }

    fn from_u64(value: u64) -> Result<Self, &'static str> {
        if value == 0 {
            return Err("port 0 is not allocatable");
        }
        u16::try_from(value)
            .map(Self)
            .map_err(|_| "out of range (1-65535)")
    }
}

fn invalid_port(value: &str, reason: &'static str) -> IdError {
    IdError::InvalidPort {
        value: value.to_string(),
        reason,
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Port {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl Serialize for Port {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> Deserialize<'de> for Port {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(PortVisitor)
    }
}

/// Accepts both JSON numbers and numeric strings.
struct PortVisitor;

impl<'de> Visitor<'de> for PortVisitor {
    type Value = Port;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-zero port number or numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Port::try_from_u64(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        let v = u64::try_from(v).map_err(|_| E::custom(format!("negative port {v}")))?;
        self.visit_u64(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Port::parse(v).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn job_id_rejects_empty() {
        assert_eq!(JobId::parse(""), Err(IdError::Empty));
    }

    #[test]
    fn job_id_rejects_control_characters() {
        let err = JobId::parse("web\napi").unwrap_err();
        assert_eq!(err, IdError::ControlCharacter { ch: '\n' });
    }

    #[test]
    fn job_id_rejects_overlong() {
        let long = "a".repeat(JobId::MAX_LEN + 1);
        assert!(matches!(
            JobId::parse(&long),
            Err(IdError::TooLong { len: 129, max: 128 })
        ));
        assert!(JobId::parse(&"a".repeat(JobId::MAX_LEN)).is_ok());
    }

    #[test]
    fn job_id_serializes_as_plain_string() {
        let id = JobId::parse("scholar-web").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"scholar-web\"");
        let back: JobId = serde_json::from_str("\"scholar-web\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn port_parse_trims_whitespace() {
        assert_eq!(Port::parse(" 8080 ").unwrap().get(), 8080);
    }

    #[test]
    fn port_parse_rejects_zero_and_garbage() {
        assert!(Port::parse("0").unwrap_err().is_port_error());
        assert!(Port::parse("").is_err());
        assert!(Port::parse("80a").is_err());
        assert!(Port::parse("65536").is_err());
        assert!(Port::parse("-1").is_err());
    }

    #[test]
    fn port_deserializes_from_number_or_string() {
        let a: Port = serde_json::from_str("8080").unwrap();
        let b: Port = serde_json::from_str("\"8080\"").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<Port>("0").is_err());
        assert!(serde_json::from_str::<Port>("-5").is_err());
        assert!(serde_json::from_str::<Port>("70000").is_err());
    }

    #[test]
    fn port_serializes_as_number() {
        let port = Port::new(9090).unwrap();
        assert_eq!(serde_json::to_value(port).unwrap(), serde_json::json!(9090));
    }

    proptest! {
        #[test]
        fn port_display_parses_back(value in 1u16..=u16::MAX) {
            let port = Port::new(value).unwrap();
            prop_assert_eq!(Port::parse(&port.to_string()).unwrap(), port);
        }

        #[test]
        fn job_id_accepts_printable_ascii(s in "[ -~]{1,128}") {
            let id = JobId::parse(&s).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }
    }
}
