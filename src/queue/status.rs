//! Delivery status values
//!
//! A status is free text; the queue only compares it for equality. The
//! well-known values describe the usual lifecycle:
//!
//! ```text
//! READY ──▶ DELIVERED
//!   └─────▶ FAILED-PROVENANCE
//! ```
//!
//! Which transitions are legal is left to the caller.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Status(String);

impl Status {
    pub const READY: &'static str = "READY";
    pub const DELIVERED: &'static str = "DELIVERED";
    pub const FAILED_PROVENANCE: &'static str = "FAILED-PROVENANCE";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn ready() -> Self {
        Self::new(Self::READY)
    }

    pub fn delivered() -> Self {
        Self::new(Self::DELIVERED)
    }

    pub fn failed_provenance() -> Self {
        Self::new(Self::FAILED_PROVENANCE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ready()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Status {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_values() {
        assert_eq!(Status::default().as_str(), "READY");
        assert_eq!(Status::delivered().to_string(), "DELIVERED");
        assert_eq!(Status::failed_provenance().as_str(), "FAILED-PROVENANCE");
    }

    #[test]
    fn test_custom_values_are_accepted() {
        let status = Status::from("ARCHIVED");
        assert_eq!(status.as_str(), "ARCHIVED");
        assert!(!status.is_empty());
        assert!(Status::from(" ").is_empty());
    }
}
