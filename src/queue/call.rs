//! Store calls under a caller's context

use crate::core::context::CallContext;
use crate::queue::error::{QueueError, QueueResult};
use crate::store::StoreResult;
use std::future::Future;

/// Run one store call, keeping the store's own result separate
///
/// The outer error is cancellation or timeout; the inner result is what the
/// store answered. Callers that treat some store errors as outcomes (a failed
/// condition, for instance) inspect the inner result themselves.
pub(crate) async fn call_store<F, T>(
    ctx: &CallContext,
    operation: &'static str,
    call: F,
) -> QueueResult<StoreResult<T>>
where
    F: Future<Output = StoreResult<T>>,
{
    ctx.run(call)
        .await
        .map_err(|interruption| QueueError::interrupted(operation, interruption))
}

/// Run one store call, converting every store error into `QueueError::Store`
pub(crate) async fn call<F, T>(ctx: &CallContext, operation: &'static str, call: F) -> QueueResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    call_store(ctx, operation, call)
        .await?
        .map_err(|source| QueueError::Store { operation, source })
}
