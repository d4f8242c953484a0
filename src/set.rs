use crate::map::{self, HashMap, Keys};
use crate::{DefaultHashBuilder, DefaultLoad, Error, IterStatus, LoadPolicy, Status};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;

/// A hash set implemented as a [`HashMap`] where the value is `()`.
///
/// Growth, probing and status reporting all behave exactly as for the map.
///
/// ```
/// use bitprobe::HashSet;
///
/// let mut books = HashSet::new();
/// assert!(books.insert("A Dance With Dragons"));
/// assert!(books.insert("The Odyssey"));
/// assert!(!books.insert("The Odyssey"));
///
/// assert!(books.contains("The Odyssey"));
/// assert!(books.remove("The Odyssey"));
/// assert_eq!(books.len(), 1);
/// ```
pub struct HashSet<T, S = DefaultHashBuilder, L = DefaultLoad> {
    pub(crate) map: HashMap<T, (), S, L>,
}

impl<T: Clone, S: Clone, L: Clone> Clone for HashSet<T, S, L> {
    fn clone(&self) -> Self {
        HashSet {
            map: self.map.clone(),
        }
    }
}

#[cfg(feature = "ahash")]
impl<T> HashSet<T, DefaultHashBuilder> {
    /// Creates an empty `HashSet`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Creates an empty `HashSet` with exactly `capacity` slots.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }
}

impl<T, S> HashSet<T, S> {
    /// Creates a new empty hash set which will use the given hasher to hash keys.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            map: HashMap::with_hasher(hasher),
        }
    }

    /// Creates an empty `HashSet` with exactly `capacity` slots, using `hasher` to hash the
    /// keys.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, hasher),
        }
    }
}

impl<T, S, L> HashSet<T, S, L> {
    /// Creates an empty `HashSet` with exactly `capacity` slots, using `hasher` to hash the
    /// keys and `load` to decide when to grow.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_capacity_hasher_and_load(capacity: usize, hasher: S, load: L) -> Self {
        Self {
            map: HashMap::with_capacity_hasher_and_load(capacity, hasher, load),
        }
    }

    /// Returns a reference to the set's [`BuildHasher`].
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn hasher(&self) -> &S {
        self.map.hasher()
    }

    /// Returns the number of slots in the set.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Returns the number of elements in the set.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no elements.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the outcome of the most recent lookup or mutation.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn status(&self) -> Status {
        self.map.status()
    }

    /// An iterator visiting all elements in slot order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            iter: self.map.keys(),
        }
    }

    /// Clears the set, returning all elements in an iterator.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            iter: self.map.drain(),
        }
    }

    /// Clears the set, removing all values.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn clear(&mut self) {
        self.map.clear()
    }

    /// Retains only the elements specified by the predicate.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.map.retain(|k, _| f(k));
    }
}

impl<T, S, L> HashSet<T, S, L>
where
    T: Eq + Hash,
    S: BuildHasher,
    L: LoadPolicy,
{
    /// Returns `true` if the set contains a value.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn contains<Q: ?Sized>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.map.contains_key(value)
    }

    /// Returns a reference to the value in the set, if any, that is equal to the given value.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn get<Q: ?Sized>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.map.get_key_value(value).map(|(k, _)| k)
    }

    /// Adds a value to the set.
    ///
    /// If the set did not have this value present, `true` is returned. If it did, `false` is
    /// returned and the stored value is left as it was; [`HashSet::replace`] swaps it instead.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ()).is_none()
    }

    /// Adds a value to the set, reporting allocation failure.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn try_insert(&mut self, value: T) -> Result<bool, Error> {
        self.map.try_insert(value, ()).map(|old| old.is_none())
    }

    /// Adds a value to the set, replacing the existing value, if any, that is equal to the given
    /// one. Returns the replaced value.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn replace(&mut self, value: T) -> Option<T> {
        let old = self.take(&value);
        self.insert(value);
        old
    }

    /// Removes a value from the set. Returns whether the value was present in the set.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn remove<Q: ?Sized>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the value in the set, if any, that is equal to the given one.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn take<Q: ?Sized>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.map.remove_entry(value).map(|(k, _)| k)
    }

    /// Rebuilds the set with exactly `capacity` slots. See [`HashMap::resize`].
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn resize(&mut self, capacity: usize) -> Result<(), Error> {
        self.map.resize(capacity)
    }

    /// Reserves room for at least `additional` more elements.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn reserve(&mut self, additional: usize) {
        self.map.reserve(additional)
    }

    /// Tries to reserve room for at least `additional` more elements.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.map.try_reserve(additional)
    }

    /// Shrinks the set to exactly as many slots as it has elements.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn shrink_to_fit(&mut self) {
        self.map.shrink_to_fit()
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.iter().all(|v| !other.contains(v))
    }

    /// Returns `true` if the set is a subset of another.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl<T, S, L> PartialEq for HashSet<T, S, L>
where
    T: Eq + Hash,
    S: BuildHasher,
    L: LoadPolicy,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }
}

impl<T, S, L> Eq for HashSet<T, S, L>
where
    T: Eq + Hash,
    S: BuildHasher,
    L: LoadPolicy,
{
}

impl<T: fmt::Debug, S, L> fmt::Debug for HashSet<T, S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S, L> Default for HashSet<T, S, L>
where
    S: Default,
    L: Default,
{
    /// Creates an empty `HashSet<T, S, L>` with the `Default` value for the hasher and the load
    /// policy.
    #[cfg_attr(feature = "inline-more", inline)]
    fn default() -> Self {
        Self {
            map: HashMap::default(),
        }
    }
}

impl<T, S, L> FromIterator<T> for HashSet<T, S, L>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
    L: LoadPolicy + Default,
{
    #[cfg_attr(feature = "inline-more", inline)]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, S, L> Extend<T> for HashSet<T, S, L>
where
    T: Eq + Hash,
    S: BuildHasher,
    L: LoadPolicy,
{
    #[cfg_attr(feature = "inline-more", inline)]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.map.extend(iter.into_iter().map(|k| (k, ())));
    }
}

impl<'a, T, S, L> Extend<&'a T> for HashSet<T, S, L>
where
    T: 'a + Eq + Hash + Copy,
    S: BuildHasher,
    L: LoadPolicy,
{
    #[cfg_attr(feature = "inline-more", inline)]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T, S, L> IntoIterator for &'a HashSet<T, S, L> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[cfg_attr(feature = "inline-more", inline)]
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, S, L> IntoIterator for HashSet<T, S, L> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Creates a consuming iterator, that is, one that moves each value out of the set in slot
    /// order. The set cannot be used after calling this.
    #[cfg_attr(feature = "inline-more", inline)]
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            iter: self.map.into_iter(),
        }
    }
}

/// An iterator over the items of a `HashSet`.
///
/// This `struct` is created by the [`iter`] method on [`HashSet`].
///
/// [`iter`]: struct.HashSet.html#method.iter
pub struct Iter<'a, K> {
    iter: Keys<'a, K, ()>,
}

impl<K> Iter<'_, K> {
    /// Where the iterator is in its lifecycle.
    pub fn status(&self) -> IterStatus {
        self.iter.status()
    }
}

impl<K> Clone for Iter<'_, K> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        Iter {
            iter: self.iter.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Iter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<&'a K> {
        self.iter.next()
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

/// An owning iterator over the items of a `HashSet`.
///
/// This `struct` is created by the [`into_iter`] method on [`HashSet`] (provided by the
/// `IntoIterator` trait).
///
/// [`into_iter`]: struct.HashSet.html#method.into_iter
pub struct IntoIter<K> {
    iter: map::IntoIter<K, ()>,
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<K> {
        self.iter.next().map(|(k, _)| k)
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}
impl<K> FusedIterator for IntoIter<K> {}

/// A draining iterator over the items of a `HashSet`.
///
/// This `struct` is created by the [`drain`] method on [`HashSet`].
///
/// [`drain`]: struct.HashSet.html#method.drain
pub struct Drain<'a, K> {
    iter: map::Drain<'a, K, ()>,
}

impl<K> Iterator for Drain<'_, K> {
    type Item = K;

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<K> {
        self.iter.next().map(|(k, _)| k)
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K> ExactSizeIterator for Drain<'_, K> {}
impl<K> FusedIterator for Drain<'_, K> {}
