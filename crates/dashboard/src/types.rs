//! Shared value types for dashboard payloads.
//!
//! Unlike the entities in [`crate::entities`], these carry backend data that
//! the client passes through without interpretation: free-form option maps,
//! per-service status records, and health-check records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form key/value map sent along with start and upsert requests
/// (instance parameters, instance options, application options).
pub type Options = Map<String, Value>;

/// Per-service status reported for an instance, keyed by service name.
///
/// The inner value is an opaque mapping passed through verbatim.
pub type Services = Map<String, Value>;

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parses an RFC 3339 timestamp such as `2017-05-08T12:10:42.228Z`.
    pub fn parse_rfc3339(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Creates a [`Timestamp`] from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Health checks
// ---------------------------------------------------------------------------

/// One health-check record from the dashboard's status endpoint.
///
/// The record is kept verbatim; the accessors only read well-known fields and
/// return `None` when a field is missing or has an unexpected shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusRecord(Value);

impl StatusRecord {
    /// Wraps a decoded record.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Name of the check, e.g. `"Available IPs"`.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Whether the check passed.
    pub fn is_ok(&self) -> Option<bool> {
        self.0.get("isOk").and_then(Value::as_bool)
    }

    /// Description text; may contain HTML markup.
    pub fn description(&self) -> Option<&str> {
        self.0.get("description").and_then(Value::as_str)
    }

    /// Check-specific numeric details.
    pub fn details(&self) -> Option<&Map<String, Value>> {
        self.0.get("details").and_then(Value::as_object)
    }

    /// When the check last ran.
    ///
    /// Read from `lastCheck.ISO`, falling back to the millisecond
    /// `lastCheck.time` field.
    pub fn last_checked(&self) -> Option<Timestamp> {
        let last = self.0.get("lastCheck")?;
        last.get("ISO")
            .and_then(Value::as_str)
            .and_then(Timestamp::parse_rfc3339)
            .or_else(|| last.get("time").and_then(Value::as_i64).and_then(Timestamp::from_millis))
    }

    /// Returns the record exactly as the backend sent it.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}
