use crate::raw::{IterStatus, RawDrain, RawIntoIter, RawIter, RawIterMut, RawTable};
use crate::{DefaultHashBuilder, DefaultLoad, Error, LoadPolicy, Status};
use core::borrow::Borrow;
use core::cell::Cell;
use core::fmt::{self, Debug};
use core::hash::{BuildHasher, Hash, Hasher};
use core::iter::FusedIterator;
use core::mem;
use core::ops::Index;

/// A hash map implemented with open addressing, linear probing and an occupancy bitmap.
///
/// Entries live in one flat buffer of `capacity` slots. A key is placed in the first free slot
/// at or after `hash(key) % capacity`, wrapping around at the end. The map grows to
/// `2 * capacity + 1` slots whenever it is full, and also whenever its [`LoadPolicy`] says it
/// has become too crowded (by default, more than three quarters full).
///
/// Every lookup and mutation records its outcome, which [`HashMap::status`] reports:
///
/// ```
/// use bitprobe::{HashMap, Status};
///
/// let mut map = HashMap::new();
/// map.insert("a", 1);
/// assert_eq!(map.get("b"), None);
/// assert_eq!(map.status(), Status::NotFound);
/// assert!(map.resize(0).is_err());
/// assert_eq!(map.status(), Status::InvalidRequest);
/// ```
///
/// It is a logic error for a key to be modified in such a way that its hash or its equality
/// changes while it is in the map.
pub struct HashMap<K, V, S = DefaultHashBuilder, L = DefaultLoad> {
    pub(crate) hash_builder: S,
    pub(crate) load: L,
    pub(crate) table: RawTable<K, V>,
    status: Cell<Status>,
}

#[cfg_attr(feature = "inline-more", inline)]
pub(crate) fn make_hash<K: Hash + ?Sized>(hash_builder: &impl BuildHasher, val: &K) -> u64 {
    let mut state = hash_builder.build_hasher();
    val.hash(&mut state);
    state.finish()
}

#[cfg(feature = "ahash")]
impl<K, V> HashMap<K, V, DefaultHashBuilder> {
    /// Creates an empty `HashMap`.
    ///
    /// The hash map has no slots and will not allocate them until it is first inserted into.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty `HashMap` with exactly `capacity` slots.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Creates an empty `HashMap` which will use the given hash builder to hash keys.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty `HashMap` with exactly `capacity` slots, using `hash_builder` to hash
    /// the keys.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self::with_capacity_hasher_and_load(capacity, hash_builder, DefaultLoad)
    }
}

impl<K, V, S, L> HashMap<K, V, S, L> {
    /// Creates an empty `HashMap` with exactly `capacity` slots, using `hash_builder` to hash
    /// the keys and `load` to decide when to grow.
    pub fn with_capacity_hasher_and_load(capacity: usize, hash_builder: S, load: L) -> Self {
        match Self::try_with_capacity_hasher_and_load(capacity, hash_builder, load) {
            Ok(map) => map,
            Err(e) => e.abort(),
        }
    }

    /// Like [`HashMap::with_capacity_hasher_and_load`], but reports allocation failure.
    pub fn try_with_capacity_hasher_and_load(
        capacity: usize,
        hash_builder: S,
        load: L,
    ) -> Result<Self, Error> {
        Ok(Self {
            hash_builder,
            load,
            table: RawTable::try_with_capacity(capacity)?,
            status: Cell::new(Status::Success),
        })
    }

    /// Returns a reference to the map's [`BuildHasher`].
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns a reference to the map's [`LoadPolicy`].
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn load_policy(&self) -> &L {
        &self.load
    }

    /// Returns the number of slots in the map.
    ///
    /// This is an exact count, not a lower bound: the map holds at most this many entries
    /// before it must grow.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of entries in the map.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the outcome of the most recent lookup or mutation.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn status(&self) -> Status {
        self.status.get()
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn record<T>(&self, r: Result<T, Error>) -> Result<T, Error> {
        self.status.set(Status::from(&r));
        r
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn found<T>(&self, r: Option<T>) -> Option<T> {
        self.status.set(if r.is_some() {
            Status::Success
        } else {
            Status::NotFound
        });
        r
    }

    /// An iterator visiting all key-value pairs in slot order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// An iterator visiting all key-value pairs in slot order, with mutable references to the
    /// values.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// An iterator visiting all keys in slot order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// An iterator visiting all values in slot order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// An iterator visiting all values mutably in slot order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Clears the map, returning all key-value pairs as an iterator. Keeps the allocated
    /// memory for reuse.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        self.status.set(Status::Success);
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Clears the map, removing all key-value pairs. Keeps the allocated memory for reuse.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn clear(&mut self) {
        self.table.clear();
        self.status.set(Status::Success);
    }

    /// Retains only the entries specified by the predicate.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.table.retain(|k, v| f(k, v));
        self.status.set(Status::Success);
    }
}

impl<K, V, S, L> HashMap<K, V, S, L>
where
    K: Eq + Hash,
    S: BuildHasher,
    L: LoadPolicy,
{
    #[cfg_attr(feature = "inline-more", inline)]
    fn find<Q: ?Sized>(&self, k: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        let hash = make_hash(&self.hash_builder, k);
        self.table.find(hash, |x| k.eq(x.borrow()))
    }

    /// Returns a reference to the value corresponding to the key.
    #[inline]
    pub fn get<Q: ?Sized>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.get_key_value(k).map(|(_, v)| v)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    #[inline]
    pub fn get_key_value<Q: ?Sized>(&self, k: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        let r = self.find(k).and_then(|i| self.table.get(i));
        self.found(r)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[inline]
    pub fn get_mut<Q: ?Sized>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        match self.find(k) {
            Some(index) => {
                self.status.set(Status::Success);
                self.table.get_mut(index).map(|(_, v)| v)
            }
            None => {
                self.status.set(Status::NotFound);
                None
            }
        }
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn contains_key<Q: ?Sized>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.get_key_value(k).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, [`None`] is returned. If it did, the value is
    /// updated in place and the old value is returned; the key is not updated.
    ///
    /// # Panics
    ///
    /// Aborts through [`handle_alloc_error`](alloc::alloc::handle_alloc_error) if the map must
    /// grow and the allocation fails. Use [`HashMap::try_insert`] to handle that case.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        match self.try_insert(k, v) {
            Ok(old) => old,
            Err(e) => e.abort(),
        }
    }

    /// Inserts a key-value pair into the map, reporting allocation failure.
    ///
    /// A map holding as many entries as it has slots grows before anything else happens, even
    /// when `k` is already present. If it cannot, the map is left unchanged and the key and
    /// value are dropped. Once the entry is in, the load policy may ask for more room; failing
    /// to get it is not an error, but [`HashMap::status`] reports it.
    pub fn try_insert(&mut self, k: K, v: V) -> Result<Option<V>, Error> {
        let hash_builder = &self.hash_builder;
        let hasher = |x: &K| make_hash(hash_builder, x);
        if self.table.len() + 1 > self.table.capacity() {
            if let Err(e) = self.table.grow(hasher) {
                self.status.set(e.status());
                return Err(e);
            }
        }

        let hash = make_hash(hash_builder, &k);
        if let Some((_, slot)) = self
            .table
            .find(hash, |x| *x == k)
            .and_then(|i| self.table.get_mut(i))
        {
            let old = mem::replace(slot, v);
            self.status.set(Status::Success);
            return Ok(Some(old));
        }

        if let Err(e) = self.table.insert(hash, k, v, hasher) {
            self.status.set(e.status());
            return Err(e);
        }
        if self.load.should_grow(self.table.len(), self.table.capacity()) {
            if let Err(e) = self.table.grow(hasher) {
                log::warn!("could not grow crowded table: {}", e);
                self.status.set(e.status());
                return Ok(None);
            }
        }
        self.status.set(Status::Success);
        Ok(None)
    }

    /// Removes a key from the map, returning the value at the key if the key was previously in
    /// the map.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn remove<Q: ?Sized>(&mut self, k: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.remove_entry(k).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the key was previously
    /// in the map.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn remove_entry<Q: ?Sized>(&mut self, k: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        let r = self.find(k).and_then(|i| self.table.remove(i));
        self.found(r)
    }

    /// Rebuilds the map with exactly `capacity` slots.
    ///
    /// Fails with [`Error::InvalidRequest`] if `capacity` is smaller than the number of entries
    /// (or zero), and with an allocation error if the new slots cannot be allocated; either way
    /// the map is left unchanged. Asking for the current capacity does nothing.
    ///
    /// ```
    /// use bitprobe::HashMap;
    ///
    /// let mut map: HashMap<u32, u32> = (0..10).map(|i| (i, i)).collect();
    /// assert!(map.resize(5).is_err());
    /// map.resize(50).unwrap();
    /// assert_eq!(map.capacity(), 50);
    /// assert_eq!(map[&7], 7);
    /// ```
    pub fn resize(&mut self, capacity: usize) -> Result<(), Error> {
        let hash_builder = &self.hash_builder;
        let r = self
            .table
            .resize(capacity, |x| make_hash(hash_builder, x));
        self.record(r)
    }

    /// Reserves room for at least `additional` more entries.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`, and aborts if the allocation fails.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(e) = self.try_reserve(additional) {
            e.abort();
        }
    }

    /// Tries to reserve room for at least `additional` more entries.
    ///
    /// The map grows to the larger of what is needed and its usual `2 * capacity + 1`.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        let r = self.reserve_inner(additional);
        self.record(r)
    }

    fn reserve_inner(&mut self, additional: usize) -> Result<(), Error> {
        let need = self
            .len()
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow)?;
        if need <= self.capacity() {
            return Ok(());
        }
        let target = usize::max(need, crate::raw::grown(self.capacity())?);
        self.resize(target)
    }

    /// Shrinks the map to exactly as many slots as it has entries.
    ///
    /// An empty map gives up its slots entirely.
    pub fn shrink_to_fit(&mut self) {
        if self.is_empty() {
            self.table = RawTable::new();
            self.status.set(Status::Success);
        } else if let Err(e) = self.resize(self.len()) {
            log::debug!("shrink_to_fit left the map as it was: {}", e);
        }
    }
}

impl<K, V, S, L> Clone for HashMap<K, V, S, L>
where
    K: Clone,
    V: Clone,
    S: Clone,
    L: Clone,
{
    fn clone(&self) -> Self {
        HashMap {
            hash_builder: self.hash_builder.clone(),
            load: self.load.clone(),
            table: self.table.clone(),
            status: Cell::new(self.status.get()),
        }
    }
}

impl<K, V, S, L> PartialEq for HashMap<K, V, S, L>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
    L: LoadPolicy,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter()
            .all(|(key, value)| other.get(key).map_or(false, |v| *value == *v))
    }
}

impl<K, V, S, L> Eq for HashMap<K, V, S, L>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
    L: LoadPolicy,
{
}

impl<K, V, S, L> Debug for HashMap<K, V, S, L>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S, L> Default for HashMap<K, V, S, L>
where
    S: Default,
    L: Default,
{
    /// Creates an empty `HashMap<K, V, S, L>`, with the `Default` value for the hasher and the
    /// load policy.
    #[cfg_attr(feature = "inline-more", inline)]
    fn default() -> Self {
        Self::with_capacity_hasher_and_load(0, S::default(), L::default())
    }
}

impl<K, Q: ?Sized, V, S, L> Index<&Q> for HashMap<K, V, S, L>
where
    K: Eq + Hash + Borrow<Q>,
    Q: Eq + Hash,
    S: BuildHasher,
    L: LoadPolicy,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `HashMap`.
    #[cfg_attr(feature = "inline-more", inline)]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, S, L> FromIterator<(K, V)> for HashMap<K, V, S, L>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
    L: LoadPolicy + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S, L> Extend<(K, V)> for HashMap<K, V, S, L>
where
    K: Eq + Hash,
    S: BuildHasher,
    L: LoadPolicy,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, S, L> Extend<(&'a K, &'a V)> for HashMap<K, V, S, L>
where
    K: Eq + Hash + Copy,
    V: Copy,
    S: BuildHasher,
    L: LoadPolicy,
{
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<'a, K, V, S, L> IntoIterator for &'a HashMap<K, V, S, L> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    #[cfg_attr(feature = "inline-more", inline)]
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S, L> IntoIterator for &'a mut HashMap<K, V, S, L> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    #[cfg_attr(feature = "inline-more", inline)]
    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, S, L> IntoIterator for HashMap<K, V, S, L> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Creates a consuming iterator, that is, one that moves each key-value pair out of the
    /// map in slot order. The map cannot be used after calling this.
    #[cfg_attr(feature = "inline-more", inline)]
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

/// An iterator over the entries of a `HashMap`.
///
/// This `struct` is created by the [`iter`] method on [`HashMap`]. See its documentation for
/// more.
///
/// [`iter`]: struct.HashMap.html#method.iter
pub struct Iter<'a, K, V> {
    inner: RawIter<'a, K, V>,
}

impl<K, V> Iter<'_, K, V> {
    /// Where the iterator is in its lifecycle.
    pub fn status(&self) -> IterStatus {
        self.inner.status()
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: Debug, V: Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next()
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a `HashMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`HashMap`].
///
/// [`iter_mut`]: struct.HashMap.html#method.iter_mut
pub struct IterMut<'a, K, V> {
    inner: RawIterMut<'a, K, V>,
}

impl<K, V> IterMut<'_, K, V> {
    /// Where the iterator is in its lifecycle.
    pub fn status(&self) -> IterStatus {
        self.inner.status()
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<(&'a K, &'a mut V)> {
        self.inner.next()
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An owning iterator over the entries of a `HashMap`.
///
/// This `struct` is created by the [`into_iter`] method on [`HashMap`] (provided by the
/// `IntoIterator` trait).
///
/// [`into_iter`]: struct.HashMap.html#method.into_iter
pub struct IntoIter<K, V> {
    inner: RawIntoIter<K, V>,
}

impl<K: Debug, V: Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.iter()).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

/// An iterator over the keys of a `HashMap`.
///
/// This `struct` is created by the [`keys`] method on [`HashMap`].
///
/// [`keys`]: struct.HashMap.html#method.keys
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> Keys<'_, K, V> {
    /// Where the iterator is in its lifecycle.
    pub fn status(&self) -> IterStatus {
        self.inner.status()
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
///
/// This `struct` is created by the [`values`] method on [`HashMap`].
///
/// [`values`]: struct.HashMap.html#method.values
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> Values<'_, K, V> {
    /// Where the iterator is in its lifecycle.
    pub fn status(&self) -> IterStatus {
        self.inner.status()
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of a `HashMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`HashMap`].
///
/// [`values_mut`]: struct.HashMap.html#method.values_mut
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// A draining iterator over the entries of a `HashMap`.
///
/// This `struct` is created by the [`drain`] method on [`HashMap`].
///
/// [`drain`]: struct.HashMap.html#method.drain
pub struct Drain<'a, K, V> {
    inner: RawDrain<'a, K, V>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}
impl<K, V> FusedIterator for Drain<'_, K, V> {}

#[cfg(test)]
mod test_map {
    use super::*;
    use crate::LoadFactor;
    use core::hash::BuildHasherDefault;
    use std::string::{String, ToString};
    use std::vec::Vec;

    // Hashes a string by its length, so distinct keys collide a lot.
    #[derive(Default)]
    struct LenHasher(u64);

    impl Hasher for LenHasher {
        fn finish(&self) -> u64 {
            self.0
        }
        fn write(&mut self, bytes: &[u8]) {
            self.0 = self.0.wrapping_add(bytes.len() as u64);
        }
    }

    type LenMap<V> = HashMap<String, V, BuildHasherDefault<LenHasher>>;

    #[test]
    fn test_zero_capacities() {
        type HM = HashMap<i32, i32>;

        let m = HM::new();
        assert_eq!(m.capacity(), 0);

        let m = HM::default();
        assert_eq!(m.capacity(), 0);

        let m = HM::with_hasher(DefaultHashBuilder::default());
        assert_eq!(m.capacity(), 0);

        let m = HM::with_capacity(0);
        assert_eq!(m.capacity(), 0);

        let mut m = HM::new();
        assert_eq!(m.get(&1), None);
        m.insert(1, 1);
        m.insert(2, 2);
        m.remove(&1);
        m.remove(&2);
        m.shrink_to_fit();
        assert_eq!(m.capacity(), 0);
    }

    #[test]
    fn test_create_capacity_zero() {
        let mut m = HashMap::with_capacity(0);

        assert!(m.insert(1, 1).is_none());

        assert!(m.contains_key(&1));
        assert!(!m.contains_key(&0));
    }

    #[test]
    fn test_insert() {
        let mut m = HashMap::new();
        assert_eq!(m.len(), 0);
        assert!(m.insert(1, 2).is_none());
        assert_eq!(m.len(), 1);
        assert!(m.insert(2, 4).is_none());
        assert_eq!(m.len(), 2);
        assert_eq!(*m.get(&1).unwrap(), 2);
        assert_eq!(*m.get(&2).unwrap(), 4);
    }

    #[test]
    fn test_update_in_place() {
        let mut m = HashMap::with_capacity(4);
        assert_eq!(m.insert("k", 1), None);
        let cap = m.capacity();
        assert_eq!(m.insert("k", 2), Some(1));
        assert_eq!(m.len(), 1);
        assert_eq!(m.capacity(), cap);
        assert_eq!(m["k"], 2);
    }

    #[test]
    fn test_full_map_grows_before_update() {
        let mut m = HashMap::with_capacity_hasher_and_load(
            2,
            DefaultHashBuilder::default(),
            |_: usize, _: usize| false,
        );
        m.insert(1, 1);
        m.insert(2, 2);
        assert_eq!(m.capacity(), 2);
        assert_eq!(m.insert(1, 10), Some(1));
        assert_eq!(m.capacity(), 5);
        assert_eq!(m.len(), 2);
        assert_eq!(m[&1], 10);
        assert_eq!(m[&2], 2);
    }

    #[test]
    fn test_growth_policy() {
        // capacity + 1 > capacity forces 2n + 1 growth, whatever the policy says.
        let mut m = HashMap::with_capacity_hasher_and_load(
            2,
            DefaultHashBuilder::default(),
            |_: usize, _: usize| false,
        );
        m.insert(1, ());
        m.insert(2, ());
        assert_eq!(m.capacity(), 2);
        m.insert(3, ());
        assert_eq!(m.capacity(), 5);

        // The default policy grows as soon as the map is more than 3/4 full.
        let mut m = HashMap::with_capacity(4);
        for i in 0..3 {
            m.insert(i, ());
        }
        assert_eq!(m.capacity(), 4);
        m.insert(3, ());
        assert_eq!(m.capacity(), 9);

        let mut m = HashMap::with_capacity_hasher_and_load(
            10,
            DefaultHashBuilder::default(),
            LoadFactor(0.5),
        );
        for i in 0..5 {
            m.insert(i, ());
        }
        assert_eq!(m.capacity(), 10);
        m.insert(5, ());
        assert_eq!(m.capacity(), 21);
    }

    #[test]
    fn test_collisions() {
        let mut m: LenMap<usize> = HashMap::default();
        let words = ["aa", "bb", "cc", "dd", "eee", "fff", "g", "hh"];
        for (i, w) in words.iter().enumerate() {
            m.insert(w.to_string(), i);
        }
        for (i, w) in words.iter().enumerate() {
            assert_eq!(m.get(*w), Some(&i));
        }
        assert_eq!(m.remove("bb"), Some(1));
        assert_eq!(m.remove("bb"), None);
        assert_eq!(m.get("cc"), Some(&2));
        assert_eq!(m.get("hh"), Some(&7));
        assert_eq!(m.get("ii"), None);
        assert_eq!(m.len(), words.len() - 1);
    }

    #[test]
    fn test_remove_not_found() {
        let mut m = HashMap::new();
        m.insert(1, 1);
        assert_eq!(m.remove(&2), None);
        assert_eq!(m.status(), Status::NotFound);
        assert_eq!(m.len(), 1);
        assert_eq!(m.remove(&1), Some(1));
        assert_eq!(m.status(), Status::Success);
        assert_eq!(m.remove(&1), None);
        assert!(m.is_empty());
    }

    #[test]
    fn test_resize() {
        let mut m: HashMap<i32, i32> = (0..10).map(|i| (i, i * i)).collect();
        assert_eq!(
            m.resize(5),
            Err(Error::InvalidRequest {
                requested: 5,
                entries: 10
            })
        );
        assert_eq!(m.status(), Status::InvalidRequest);
        let cap = m.capacity();
        assert_eq!(m.resize(cap), Ok(()));
        assert_eq!(m.resize(10), Ok(()));
        assert_eq!(m.capacity(), 10);
        assert_eq!(m.resize(100), Ok(()));
        for i in 0..10 {
            assert_eq!(m[&i], i * i);
        }
        assert_eq!(m.len(), 10);
    }

    #[test]
    fn test_reserve_shrink() {
        let mut m = HashMap::new();
        m.reserve(100);
        assert!(m.capacity() >= 100);
        for i in 0..10 {
            m.insert(i, i);
        }
        m.shrink_to_fit();
        assert_eq!(m.capacity(), 10);
        for i in 0..10 {
            assert_eq!(m[&i], i);
        }
        assert_eq!(m.try_reserve(usize::MAX), Err(Error::CapacityOverflow));
        assert_eq!(m.status(), Status::NoMem);
        assert_eq!(m.len(), 10);
    }

    #[test]
    fn test_iterate() {
        let mut m = HashMap::with_capacity(4);
        for i in 0..32 {
            assert!(m.insert(i, i * 2).is_none());
        }
        assert_eq!(m.len(), 32);

        let mut observed: u32 = 0;

        for (k, v) in &m {
            assert_eq!(*v, *k * 2);
            observed |= 1 << *k;
        }
        assert_eq!(observed, 0xFFFF_FFFF);
    }

    #[test]
    fn test_iter_status() {
        let m: HashMap<_, _> = (0..3).map(|i| (i, i)).collect();
        let mut it = m.keys();
        assert_eq!(it.status(), IterStatus::Ready);
        for _ in 0..3 {
            assert!(it.next().is_some());
            assert_eq!(it.status(), IterStatus::Continue);
        }
        assert_eq!(it.next(), None);
        assert_eq!(it.status(), IterStatus::Stop);
        assert_eq!(it.next(), None);
        assert_eq!(it.status(), IterStatus::Stop);
    }

    #[test]
    fn test_keys_values() {
        let map: HashMap<_, _> = [(1, 'a'), (2, 'b'), (3, 'c')].iter().cloned().collect();
        let mut keys: Vec<_> = map.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, [1, 2, 3]);
        let mut values: Vec<_> = map.values().cloned().collect();
        values.sort();
        assert_eq!(values, ['a', 'b', 'c']);
    }

    #[test]
    fn test_values_mut() {
        let mut map: HashMap<_, _> = [(1, 1), (2, 2), (3, 3)].iter().cloned().collect();
        for value in map.values_mut() {
            *value *= 2
        }
        let mut values: Vec<_> = map.values().cloned().collect();
        values.sort();
        assert_eq!(values, [2, 4, 6]);
    }

    #[test]
    fn test_get_mut() {
        let mut m = HashMap::new();
        assert!(m.insert(1, 12).is_none());
        assert!(m.insert(2, 8).is_none());
        assert!(m.insert(5, 14).is_none());
        let new = 100;
        match m.get_mut(&5) {
            None => panic!(),
            Some(x) => *x = new,
        }
        assert_eq!(m.get(&5), Some(&new));
        assert!(m.get_mut(&6).is_none());
        assert_eq!(m.status(), Status::NotFound);
    }

    #[test]
    fn test_drain_into_iter() {
        let mut m: HashMap<_, _> = (0..8).map(|i| (i, i.to_string())).collect();
        let mut drained: Vec<_> = m.drain().collect();
        drained.sort();
        assert_eq!(drained.len(), 8);
        assert!(m.is_empty());

        m.extend((0..4).map(|i| (i, i.to_string())));
        let mut owned: Vec<_> = m.into_iter().map(|(k, _)| k).collect();
        owned.sort();
        assert_eq!(owned, [0, 1, 2, 3]);
    }

    #[test]
    fn test_retain_clear() {
        let mut map: HashMap<i32, i32> = (0..100).map(|x| (x, x * 10)).collect();
        map.retain(|&k, _| k % 2 == 0);
        assert_eq!(map.len(), 50);
        assert_eq!(map[&2], 20);
        assert_eq!(map.get(&3), None);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.get(&2), None);
    }

    #[test]
    fn test_eq_clone_debug() {
        let mut m1 = HashMap::new();
        m1.insert(1, 2);
        m1.insert(2, 3);
        m1.insert(3, 4);

        let mut m2 = m1.clone();
        assert_eq!(m1, m2);
        m2.remove(&3);
        assert!(m1 != m2);

        let mut single = HashMap::new();
        single.insert(1, 2);
        assert_eq!(format!("{:?}", single), "{1: 2}");
        let empty: HashMap<i32, i32> = HashMap::new();
        assert_eq!(format!("{:?}", empty), "{}");
    }

    #[test]
    fn test_capacity_invariant() {
        let mut m = HashMap::with_capacity(1);
        for i in 0..200u32 {
            m.insert(i % 37, i);
            if i % 3 == 0 {
                m.remove(&(i % 11));
            }
            assert!(m.len() <= m.capacity());
        }
    }

    #[test]
    #[should_panic]
    fn test_index_nonexistent() {
        let mut map = HashMap::new();
        map.insert(1, 2);
        map[&4];
    }
}
