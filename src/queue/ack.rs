//! Per-record acknowledgment results

use crate::queue::record::Receipt;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckOutcome {
    /// Status attribute now holds the new value
    Acknowledged,
    /// Stored timestamp no longer matches the receipt, or the record is gone
    Conflict,
    /// Any other store failure for this record
    Failed(StoreError),
}

impl AckOutcome {
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, Self::Acknowledged)
    }
}

/// Outcomes in receipt order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AckReport {
    entries: Vec<(Receipt, AckOutcome)>,
}

impl AckReport {
    pub(crate) fn push(&mut self, receipt: Receipt, outcome: AckOutcome) {
        self.entries.push((receipt, outcome));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Receipt, &AckOutcome)> {
        self.entries.iter().map(|(receipt, outcome)| (receipt, outcome))
    }

    pub fn all_acknowledged(&self) -> bool {
        self.entries.iter().all(|(_, outcome)| outcome.is_acknowledged())
    }

    pub fn acknowledged(&self) -> Vec<&Receipt> {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.is_acknowledged())
            .map(|(receipt, _)| receipt)
            .collect()
    }

    pub fn conflicts(&self) -> Vec<&Receipt> {
        self.entries
            .iter()
            .filter(|(_, outcome)| matches!(outcome, AckOutcome::Conflict))
            .map(|(receipt, _)| receipt)
            .collect()
    }

    pub fn failures(&self) -> Vec<(&Receipt, &StoreError)> {
        self.entries
            .iter()
            .filter_map(|(receipt, outcome)| match outcome {
                AckOutcome::Failed(error) => Some((receipt, error)),
                _ => None,
            })
            .collect()
    }
}
