//! Timestamps: time provider abstraction and the stored text encoding
//!
//! Records carry their timestamp as RFC 3339 text in UTC with exactly nine
//! fractional digits (`2024-05-01T12:00:00.000000000Z`). Fixed width means
//! lexicographic order equals chronological order, which is what the store
//! uses to sort index entries and evaluate `<` conditions.

use chrono::{DateTime, SecondsFormat, Utc};
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// Abstraction over wall-clock time for testable timestamp generation
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production time provider using the system clock
#[derive(Debug, Default, Clone)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Encode a timestamp in its stored, lexicographically sortable form
pub fn encode_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Decode a stored timestamp; any RFC 3339 offset is accepted and normalised to UTC
pub fn decode_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|t| t.with_timezone(&Utc))
}

/// Mock time provider for deterministic testing
#[derive(Clone)]
#[cfg(test)]
pub struct MockTimeProvider {
    current: Arc<Mutex<DateTime<Utc>>>,
}

#[cfg(test)]
impl MockTimeProvider {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut current = self.current.lock().unwrap();
        *current += duration;
    }
}

#[cfg(test)]
impl TimeProvider for MockTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap()
    }
}
