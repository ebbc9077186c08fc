//! Mutex poisoning helpers
//!
//! Converts a poisoned lock into the caller's own error type so that a panic
//! in one task surfaces as an ordinary error in the next one.

use std::sync::LockResult;

/// Map a poisoned `lock()` result into an application error
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use sprinkler::core::sync::handle_mutex_poison;
/// use sprinkler::store::StoreError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |message| StoreError::Unavailable { message })
///     .unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). A panic occurred while holding the lock. PoisonError: {:?}",
            poison_err
        ))
    })
}
