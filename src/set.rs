//! Thread-safe hash set.
//!
//! This module provides [`Set`], a handle to an unordered collection of
//! unique elements guarded by a single mutex.
//!
//! # Overview
//!
//! Every method takes `&self` and locks the set for its whole duration, so
//! a `Set` can be shared between threads (directly or behind an `Arc`) and
//! mutated concurrently.
//!
//! - `Clone` clones the *handle*: both handles see the same elements.
//! - [`Set::duplicate`] makes an independent copy with its own lock.
//! - `union`, `intersection`, `difference` and `disjoint` always return a
//!   freshly allocated set.
//!
//! # Lock Ordering
//!
//! Operations on two sets lock both of them. The two locks are always
//! taken in ascending address order of the shared allocations, so
//! `a.union(&b)` and `b.union(&a)` running at the same time cannot
//! deadlock. When both operands are handles to the same set, the lock is
//! taken once.
//!
//! # Examples
//!
//! ```rust
//! use lockset::Set;
//!
//! let set_a = Set::from([1, 2, 3]);
//! let set_b = Set::from([2, 3, 4]);
//!
//! let union = set_a.union(&set_b);           // {1, 2, 3, 4}
//! let intersection = set_a.intersection(&set_b);  // {2, 3}
//! let disjoint = set_a.disjoint(&set_b);     // {1, 4}
//!
//! assert_eq!(union.size(), 4);
//! assert_eq!(intersection.size(), 2);
//! assert_eq!(disjoint.size(), 2);
//! ```

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::{BuildHasher, Hash, RandomState};
use std::iter::FromIterator;

use crate::sync::{Arc, Mutex, MutexGuard, lock};

type Storage<T, S> = HashSet<T, S>;

// =============================================================================
// Set Definition
// =============================================================================

/// A thread-safe, unordered collection of unique elements.
///
/// `Set` is a cheap handle around one heap-allocated, mutex-guarded
/// `HashSet`. Cloning the handle shares the storage; use
/// [`duplicate`](Set::duplicate) for an independent copy.
///
/// # Time Complexity
///
/// | Operation                        | Complexity |
/// |----------------------------------|------------|
/// | `add` / `discard` (per value)    | O(1) average |
/// | `has`                            | O(1) average |
/// | `size` / `is_empty`              | O(1)       |
/// | `values`                         | O(n)       |
/// | `union` / `disjoint`             | O(n + m)   |
/// | `intersection`                   | O(min(n, m)) |
/// | `difference` / `subset_of`       | O(n)       |
/// | `subtract`                       | O(min(n, m)) |
/// | `extend`                         | O(m)       |
///
/// # Examples
///
/// ```rust
/// use lockset::Set;
///
/// let set = Set::new();
/// set.add([4, 8, 15, 16]);
/// assert_eq!(set.size(), 4);
///
/// set.discard([8]);
/// assert!(!set.has(&8));
/// ```
pub struct Set<T, S = RandomState> {
    shared: Arc<Mutex<Storage<T, S>>>,
}

/// Guards held by an operation that reads two sets.
enum Locked<'a, T, S> {
    /// Both operands are handles to the same set.
    Same(MutexGuard<'a, Storage<T, S>>),
    Distinct {
        receiver: MutexGuard<'a, Storage<T, S>>,
        other: MutexGuard<'a, Storage<T, S>>,
    },
}

impl<T, S> Locked<'_, T, S> {
    fn views(&self) -> (&Storage<T, S>, &Storage<T, S>) {
        match self {
            Self::Same(guard) => (&**guard, &**guard),
            Self::Distinct { receiver, other } => (&**receiver, &**other),
        }
    }
}

impl<T> Set<T, RandomState> {
    /// Creates a new empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let set: Set<i32> = Set::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates an empty set with room for at least `capacity` elements.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<T, S> Set<T, S> {
    /// Creates an empty set which will use `hasher` to hash its elements.
    ///
    /// Sets produced by `union`, `intersection`, `difference` and
    /// `disjoint` reuse a clone of the receiver's hasher.
    #[inline]
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_storage(HashSet::with_hasher(hasher))
    }

    /// Creates an empty set with room for at least `capacity` elements,
    /// using `hasher` to hash them.
    #[inline]
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from_storage(HashSet::with_capacity_and_hasher(capacity, hasher))
    }

    fn from_storage(elements: Storage<T, S>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(elements)),
        }
    }

    fn storage(&self) -> MutexGuard<'_, Storage<T, S>> {
        lock(&self.shared)
    }

    /// Locks `self` and `other` in address order.
    fn lock_with<'a>(&'a self, other: &'a Self) -> Locked<'a, T, S> {
        let receiver_address: *const Mutex<Storage<T, S>> = &*self.shared;
        let other_address: *const Mutex<Storage<T, S>> = &*other.shared;

        if std::ptr::eq(receiver_address, other_address) {
            return Locked::Same(self.storage());
        }

        if receiver_address < other_address {
            let receiver = self.storage();
            let other = other.storage();
            Locked::Distinct { receiver, other }
        } else {
            let other = other.storage();
            let receiver = self.storage();
            Locked::Distinct { receiver, other }
        }
    }

    /// Returns `true` if `self` and `other` are handles to the same set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let set = Set::from([1]);
    /// assert!(set.same_as(&set.clone()));
    /// assert!(!set.same_as(&set.duplicate()));
    /// ```
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(&*self.shared, &*other.shared)
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let set = Set::new();
    /// set.add([40]);
    /// set.add([40]);
    /// assert_eq!(set.size(), 1);
    /// ```
    #[must_use]
    pub fn size(&self) -> usize {
        self.storage().len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage().is_empty()
    }

    /// Removes every element, leaving the set empty.
    pub fn clear(&self) {
        self.storage().clear();
    }
}

impl<T, S> Set<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Adds each of `values` to the set. Values already present are left
    /// as they are.
    ///
    /// `values` is drained before the lock is taken, so it may itself read
    /// from this set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let set = Set::new();
    /// set.add([4, 8, 15, 16]);
    /// assert_eq!(set.size(), 4);
    /// ```
    pub fn add<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        self.storage().extend(values);
    }

    /// Removes each of `values` from the set. Absent values are ignored.
    ///
    /// Accepts both owned elements and references to them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let set = Set::from(["Hello", "World", "banana"]);
    /// set.discard(["Hello", "banana"]);
    ///
    /// assert!(!set.has("Hello"));
    /// assert!(set.has("World"));
    /// ```
    pub fn discard<I>(&self, values: I)
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let values: Vec<I::Item> = values.into_iter().collect();
        let mut elements = self.storage();
        for value in &values {
            let value: &T = value.borrow();
            elements.remove(value);
        }
    }

    /// Returns `true` if the set contains `value`.
    ///
    /// The value may be any borrowed form of the element type, as with
    /// [`HashSet::contains`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let set: Set<String> = Set::new();
    /// assert!(!set.has("Hello"));
    /// set.add(["Hello".to_string()]);
    /// assert!(set.has("Hello"));
    /// ```
    #[must_use]
    pub fn has<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.storage().contains(value)
    }

    /// Removes from the set every element that is also in `other`.
    /// `other` is not modified.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let set = Set::from([4, 8, 15]);
    /// set.subtract(&Set::from([8]));
    /// assert_eq!(set.size(), 2);
    /// ```
    pub fn subtract(&self, other: &Self) {
        match self.lock_with(other) {
            Locked::Same(mut elements) => elements.clear(),
            Locked::Distinct {
                mut receiver,
                other,
            } => {
                if other.len() < receiver.len() {
                    for element in &*other {
                        receiver.remove(element);
                    }
                } else {
                    receiver.retain(|element| !other.contains(element));
                }
            }
        }
    }

    /// Returns `true` if every element of the set is also in `other`.
    ///
    /// The empty set is a subset of every set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let a = Set::from([1, 2, 3]);
    /// let b = Set::from([1, 2, 3, 4, 5]);
    ///
    /// assert!(a.subset_of(&b));
    /// assert!(!b.subset_of(&a));
    /// ```
    #[must_use]
    pub fn subset_of(&self, other: &Self) -> bool {
        let locked = self.lock_with(other);
        let (receiver, other) = locked.views();
        receiver.is_subset(other)
    }

    /// Returns `true` if every element of `other` is also in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let a = Set::from([1, 2, 3]);
    /// let b = Set::from([1, 2, 3, 4, 5]);
    ///
    /// assert!(!a.superset_of(&b));
    /// assert!(b.superset_of(&a));
    /// ```
    #[must_use]
    pub fn superset_of(&self, other: &Self) -> bool {
        other.subset_of(self)
    }

    /// Returns `true` if both sets hold exactly the same elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let x = Set::from([40]);
    /// let y = Set::new();
    /// y.add([40]);
    /// assert!(x.equal_to(&y));
    /// ```
    #[must_use]
    pub fn equal_to(&self, other: &Self) -> bool {
        let locked = self.lock_with(other);
        let (receiver, other) = locked.views();
        receiver.len() == other.len() && receiver.is_subset(other)
    }
}

impl<T, S> Set<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// Creates an independent copy of the set with its own storage and
    /// lock. Later changes to either set are not seen by the other.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self::from_storage(self.storage().clone())
    }

    /// Returns the current elements in no particular order.
    ///
    /// The returned vector is a snapshot; the set may change as soon as
    /// the call returns.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let set = Set::from([4, 8, 15, 16, 23, 42]);
    /// let values = set.values();
    ///
    /// assert_eq!(values.len(), 6);
    /// assert!(values.contains(&4));
    /// assert!(!values.contains(&-5));
    /// ```
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.storage().iter().cloned().collect()
    }

    /// Adds to the set every element of `other`. `other` is not modified.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let a = Set::from([1, 2, 3]);
    /// a.extend(&Set::from([4, 18]));
    ///
    /// assert!(a.has(&4));
    /// assert!(a.has(&18));
    /// ```
    pub fn extend(&self, other: &Self) {
        if let Locked::Distinct {
            mut receiver,
            other,
        } = self.lock_with(other)
        {
            receiver.extend(other.iter().cloned());
        }
    }

    /// Returns a new set with every element that is in either set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let x = Set::from(["Bread", "Jam"]);
    /// let s = Set::from(["Hello", "World"]);
    /// assert_eq!(x.union(&s).size(), 4);
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let locked = self.lock_with(other);
        let (receiver, other) = locked.views();
        let capacity = receiver.len().max(other.len());
        let mut result = HashSet::with_capacity_and_hasher(capacity, receiver.hasher().clone());
        result.extend(receiver.union(other).cloned());
        Self::from_storage(result)
    }

    /// Returns a new set with the elements present in both sets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let x = Set::from(["Bread", "World"]);
    /// let s = Set::from(["Hello", "World"]);
    ///
    /// let both = x.intersection(&s);
    /// assert_eq!(both.size(), 1);
    /// assert!(both.has("World"));
    /// ```
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let locked = self.lock_with(other);
        let (receiver, other) = locked.views();
        let mut result = HashSet::with_hasher(receiver.hasher().clone());
        result.extend(receiver.intersection(other).cloned());
        Self::from_storage(result)
    }

    /// Returns a new set with the elements of the set that are not in
    /// `other`. Neither operand is modified; see [`subtract`](Set::subtract)
    /// for the in-place form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let a = Set::from([1, 2, 3]);
    /// let rest = a.difference(&Set::from([2, 3, 4]));
    ///
    /// assert_eq!(rest.values(), vec![1]);
    /// assert_eq!(a.size(), 3);
    /// ```
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let locked = self.lock_with(other);
        let (receiver, other) = locked.views();
        let mut result = HashSet::with_hasher(receiver.hasher().clone());
        result.extend(receiver.difference(other).cloned());
        Self::from_storage(result)
    }

    /// Returns a new set with the elements that are in exactly one of the
    /// two sets (the symmetric difference).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lockset::Set;
    ///
    /// let s = Set::from(["Hello", "World"]);
    /// let x = Set::from(["Bread", "World"]);
    ///
    /// let y = s.disjoint(&x);
    /// assert_eq!(y.size(), 2);
    /// assert!(y.has("Hello"));
    /// assert!(y.has("Bread"));
    /// assert!(!y.has("World"));
    /// ```
    #[must_use]
    pub fn disjoint(&self, other: &Self) -> Self {
        let locked = self.lock_with(other);
        let (receiver, other) = locked.views();
        let mut result = HashSet::with_hasher(receiver.hasher().clone());
        result.extend(receiver.symmetric_difference(other).cloned());
        Self::from_storage(result)
    }
}

static_assertions::assert_impl_all!(Set<i32>: Send, Sync, Clone);
static_assertions::assert_impl_all!(Set<String>: Send, Sync, Clone);
static_assertions::assert_not_impl_any!(Set<std::rc::Rc<i32>>: Send, Sync);

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, S> Clone for Set<T, S> {
    /// Clones the handle. The clone shares storage and lock with `self`.
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, S: Default> Default for Set<T, S> {
    #[inline]
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> FromIterator<T> for Set<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_storage(iter.into_iter().collect())
    }
}

impl<T: Hash + Eq, const N: usize> From<[T; N]> for Set<T, RandomState> {
    /// Creates a set holding the distinct values of `values`.
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, S> PartialEq for Set<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.equal_to(other)
    }
}

impl<T: Hash + Eq, S: BuildHasher> Eq for Set<T, S> {}

impl<T: fmt::Debug, S> fmt::Debug for Set<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.storage().iter()).finish()
    }
}

impl<T: fmt::Display, S> fmt::Display for Set<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elements = self.storage();
        write!(formatter, "{{")?;
        let mut first = true;
        for element in elements.iter() {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, S> serde::Serialize for Set<T, S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let elements = self.storage();
        let mut seq = serializer.serialize_seq(Some(elements.len()))?;
        for element in elements.iter() {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct SetVisitor<T, S> {
    marker: std::marker::PhantomData<(T, S)>,
}

#[cfg(feature = "serde")]
impl<T, S> SetVisitor<T, S> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::de::Visitor<'de> for SetVisitor<T, S>
where
    T: serde::Deserialize<'de> + Hash + Eq,
    S: BuildHasher + Default,
{
    type Value = Set<T, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        // The size hint comes from the input; cap the preallocation.
        let capacity = seq.size_hint().unwrap_or(0).min(4096);
        let mut elements = HashSet::with_capacity_and_hasher(capacity, S::default());
        while let Some(element) = seq.next_element()? {
            elements.insert(element);
        }
        Ok(Set::from_storage(elements))
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::Deserialize<'de> for Set<T, S>
where
    T: serde::Deserialize<'de> + Hash + Eq,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(SetVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
