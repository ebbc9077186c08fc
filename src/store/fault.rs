//! Fault and latency injection for store backends
//!
//! Lets tests script store failures ("fail the third query with a throttle")
//! and slow every call down to exercise cancellation and timeouts.

use crate::core::sync::handle_mutex_poison;
use crate::store::error::{StoreError, StoreResult};
use std::sync::Mutex;
use std::time::Duration;

/// Store primitive a fault applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateTable,
    DeleteTable,
    DescribeTable,
    PutItem,
    Query,
    UpdateItem,
}

#[derive(Debug)]
struct PlannedFault {
    operation: Operation,
    /// Matching calls still to let through before failing
    skip: usize,
    error: StoreError,
}

#[derive(Debug, Default)]
pub struct FaultInjector {
    planned: Mutex<Vec<PlannedFault>>,
    latency: Mutex<Option<Duration>>,
}

impl FaultInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call of `operation` with `error`
    pub fn fail_next(&self, operation: Operation, error: StoreError) -> StoreResult<()> {
        self.fail_after(operation, 0, error)
    }

    /// Let `skip` calls of `operation` succeed, then fail the following one
    pub fn fail_after(
        &self,
        operation: Operation,
        skip: usize,
        error: StoreError,
    ) -> StoreResult<()> {
        let mut planned = handle_mutex_poison(self.planned.lock(), unavailable)?;
        planned.push(PlannedFault {
            operation,
            skip,
            error,
        });
        Ok(())
    }

    /// Delay every subsequent call by `latency`, `None` to disable
    pub fn set_latency(&self, latency: Option<Duration>) -> StoreResult<()> {
        *handle_mutex_poison(self.latency.lock(), unavailable)? = latency;
        Ok(())
    }

    /// Apply latency and consume a planned fault for this call, if one is due
    pub async fn before(&self, operation: Operation) -> StoreResult<()> {
        let latency = *handle_mutex_poison(self.latency.lock(), unavailable)?;
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }

        let mut planned = handle_mutex_poison(self.planned.lock(), unavailable)?;
        let mut due = None;
        for (position, fault) in planned.iter_mut().enumerate() {
            if fault.operation != operation {
                continue;
            }
            if fault.skip == 0 {
                due = Some(position);
                break;
            }
            fault.skip -= 1;
        }

        match due {
            Some(position) => {
                let fault = planned.remove(position);
                log::debug!("Injecting {:?} fault: {}", operation, fault.error);
                Err(fault.error)
            }
            None => Ok(()),
        }
    }
}

fn unavailable(message: String) -> StoreError {
    StoreError::Unavailable { message }
}
