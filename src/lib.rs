//! # lockset
//!
//! A thread-safe hash set with set algebra.
//!
//! ## Overview
//!
//! [`Set`] is an unordered collection of unique elements protected by a
//! single mutex per set. Every operation takes `&self`, so a set can be
//! mutated from many threads at once:
//!
//! - **Mutators**: `add`, `discard`, `subtract`, `extend`, `clear`
//! - **Queries**: `size`, `has`, `values`, `equal_to`, `subset_of`, `superset_of`
//! - **Set algebra**: `union`, `intersection`, `difference`, `disjoint`
//!
//! Operations on two sets lock both of them in a fixed global order, so
//! combining the same pair of sets from two threads in opposite roles
//! never deadlocks.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Set`]
//! - `fxhash`: [`FxSet`], a [`Set`] hashed with `rustc-hash`
//! - `ahash`: [`AHashSet`], a [`Set`] hashed with `ahash`
//! - `loom`: model-check the locking with `loom` (needs `--cfg loom`)
//! - `full`: Enable `serde`, `fxhash` and `ahash`
//!
//! ## Example
//!
//! ```rust
//! use lockset::{Set, set};
//! use std::thread;
//!
//! let set: Set<i32> = set![1, 2, 3, 14];
//! assert_eq!(set.size(), 4);
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|index| {
//!         let set = set.clone();
//!         thread::spawn(move || set.add([100 + index]))
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(set.size(), 8);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod set;
mod sync;

pub use set::Set;

/// A [`Set`] hashed with `rustc-hash`'s `FxHasher`.
///
/// Faster than the default hasher for small keys, but not resistant to
/// collision attacks.
///
/// ```rust
/// use lockset::FxSet;
///
/// let set: FxSet<u32> = FxSet::default();
/// set.add([1, 2, 3]);
/// assert_eq!(set.size(), 3);
/// ```
#[cfg(feature = "fxhash")]
pub type FxSet<T> = Set<T, rustc_hash::FxBuildHasher>;

/// A [`Set`] hashed with `ahash`.
#[cfg(feature = "ahash")]
pub type AHashSet<T> = Set<T, ahash::RandomState>;

/// Creates a [`Set`] holding the given elements.
///
/// Duplicate elements collapse into one.
///
/// # Example
///
/// ```
/// use lockset::{Set, set};
///
/// let numbers = set![1, 2, 3, 14, 14];
/// assert_eq!(numbers.size(), 4);
///
/// let empty: Set<String> = set![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! set {
    () => {
        $crate::Set::new()
    };
    ($($element:expr),+ $(,)?) => {
        $crate::Set::from([$($element),+])
    };
}
