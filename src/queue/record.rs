//! Records written by producers and receipts handed to consumers

use crate::core::time::{decode_timestamp, encode_timestamp};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::status::Status;
use crate::schema::QueueConfig;
use crate::store::Item;
use chrono::{DateTime, Utc};

/// One event as produced
///
/// `(id, timestamp, payload_sum)` is the deduplication fingerprint: a re-send
/// of the same triple is a no-op, a newer timestamp replaces the stored copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Content fingerprint; may be empty
    pub payload_sum: String,
    pub provenance: String,
    /// Initial status written for every destination
    pub status: Status,
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        provenance: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            payload_sum: String::new(),
            provenance: provenance.into(),
            status: Status::ready(),
        }
    }

    pub fn with_payload_sum(mut self, payload_sum: impl Into<String>) -> Self {
        self.payload_sum = payload_sum.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<Status>) -> Self {
        self.status = status.into();
        self
    }

    pub fn validate(&self) -> QueueResult<()> {
        if self.id.trim().is_empty() {
            return Err(QueueError::validation("record id must not be empty"));
        }
        if self.provenance.trim().is_empty() {
            return Err(QueueError::validation(format!(
                "record '{}' has no provenance",
                self.id
            )));
        }
        if self.status.is_empty() {
            return Err(QueueError::validation(format!(
                "record '{}' has no initial status",
                self.id
            )));
        }
        Ok(())
    }

    /// Stored form: base attributes plus one status attribute per destination
    pub(crate) fn to_item(&self, config: &QueueConfig) -> Item {
        let names = &config.attributes;
        let mut item = Item::new();
        item.insert(names.id.clone(), self.id.clone());
        item.insert(names.timestamp.clone(), encode_timestamp(&self.timestamp));
        item.insert(names.payload_sum.clone(), self.payload_sum.clone());
        item.insert(names.provenance.clone(), self.provenance.clone());
        for destination in &config.destinations {
            item.insert(
                destination.status_attribute.clone(),
                self.status.to_string(),
            );
        }
        item
    }
}

/// Handle for one dequeued record
///
/// The timestamp is the optimistic-lock token: acknowledging succeeds only if
/// the stored timestamp still equals it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub provenance: String,
}

impl Receipt {
    pub(crate) fn from_item(item: &Item, config: &QueueConfig) -> QueueResult<Self> {
        let names = &config.attributes;
        let id = item
            .get(&names.id)
            .cloned()
            .ok_or_else(|| QueueError::InvalidRecord {
                id: "<unknown>".to_string(),
                reason: format!("missing attribute '{}'", names.id),
            })?;

        let field = |name: &String| {
            item.get(name).ok_or_else(|| QueueError::InvalidRecord {
                id: id.clone(),
                reason: format!("missing attribute '{}'", name),
            })
        };

        let raw_timestamp = field(&names.timestamp)?;
        let timestamp =
            decode_timestamp(raw_timestamp).map_err(|e| QueueError::InvalidRecord {
                id: id.clone(),
                reason: format!("timestamp '{}' is not RFC 3339: {}", raw_timestamp, e),
            })?;
        let provenance = field(&names.provenance)?.clone();

        Ok(Self {
            id,
            timestamp,
            provenance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, second).unwrap()
    }

    #[test]
    fn test_record_defaults_to_ready() {
        let record = Record::new("7", at(0), "https://example.com");
        assert_eq!(record.status, Status::ready());
        assert!(record.payload_sum.is_empty());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_record_validation() {
        assert!(Record::new("", at(0), "p").validate().is_err());
        assert!(Record::new("1", at(0), " ").validate().is_err());
        assert!(Record::new("1", at(0), "p")
            .with_status("")
            .validate()
            .is_err());
    }

    #[test]
    fn test_item_fans_out_status() {
        let config = QueueConfig::default();
        let item = Record::new("1", at(5), "p")
            .with_payload_sum("abc")
            .to_item(&config);

        assert_eq!(item["id"], "1");
        assert_eq!(item["timestamp"], "2024-05-01T12:00:05.000000000Z");
        assert_eq!(item["payload-sum"], "abc");
        assert_eq!(item["primary-status"], "READY");
        assert_eq!(item["secondary-status"], "READY");
        assert_eq!(item.len(), 6);
    }

    #[test]
    fn test_receipt_from_projected_item() {
        let config = QueueConfig::default();
        let mut item = Item::new();
        item.insert("id".into(), "1".into());
        item.insert("timestamp".into(), "2024-05-01T12:00:05.000000000Z".into());
        item.insert("provenance".into(), "p".into());

        let receipt = Receipt::from_item(&item, &config).unwrap();
        assert_eq!(receipt.id, "1");
        assert_eq!(receipt.timestamp, at(5));
        assert_eq!(receipt.provenance, "p");
    }

    #[test]
    fn test_receipt_rejects_malformed_items() {
        let config = QueueConfig::default();
        let mut item = Item::new();
        item.insert("id".into(), "1".into());
        item.insert("timestamp".into(), "not a time".into());
        item.insert("provenance".into(), "p".into());
        assert!(matches!(
            Receipt::from_item(&item, &config),
            Err(QueueError::InvalidRecord { id, .. }) if id == "1"
        ));

        item.remove("provenance");
        item.insert("timestamp".into(), "2024-05-01T12:00:05Z".into());
        assert!(matches!(
            Receipt::from_item(&item, &config),
            Err(QueueError::InvalidRecord { .. })
        ));
    }
}
