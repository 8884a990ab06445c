//! Lock primitives used by [`Set`](crate::Set).
//!
//! Regular builds use `parking_lot::Mutex`, which cannot be poisoned.
//! Building with `--features loom` and `RUSTFLAGS="--cfg loom"` swaps in
//! `loom`'s primitives so the lock ordering can be model checked.

#[cfg(not(all(feature = "loom", loom)))]
pub(crate) use parking_lot::{Mutex, MutexGuard};
#[cfg(not(all(feature = "loom", loom)))]
pub(crate) use std::sync::Arc;

#[cfg(all(feature = "loom", loom))]
pub(crate) use loom::sync::{Arc, Mutex, MutexGuard};

/// Acquires `mutex`, blocking until it is available.
#[cfg(not(all(feature = "loom", loom)))]
#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock()
}

/// Acquires `mutex`, blocking until it is available.
///
/// No operation leaves the guarded storage half-updated, so a poisoned
/// lock still holds a valid set.
#[cfg(all(feature = "loom", loom))]
#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(all(test, not(all(feature = "loom", loom))))]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_lock_gives_exclusive_access() {
        let mutex = Arc::new(Mutex::new(0));
        {
            let mut guard = lock(&mutex);
            *guard += 1;
            assert!(mutex.try_lock().is_none());
        }
        assert_eq!(*lock(&mutex), 1);
    }
}
