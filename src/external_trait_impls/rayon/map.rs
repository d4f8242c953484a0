//! Rayon extensions for `HashMap`.

use super::raw::RawParIter;
use crate::hash_map::HashMap;
use crate::map::make_hash;
use crate::LoadPolicy;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use rayon_::iter::plumbing::UnindexedConsumer;
use rayon_::iter::{FromParallelIterator, IntoParallelIterator, ParallelExtend, ParallelIterator};

/// Parallel iterator over shared references to entries in a map.
///
/// This iterator is created by the [`par_iter`] method on [`HashMap`]
/// (provided by the [`IntoParallelRefIterator`] trait).
/// See its documentation for more.
///
/// [`par_iter`]: /bitprobe/struct.HashMap.html#method.par_iter
/// [`HashMap`]: /bitprobe/struct.HashMap.html
/// [`IntoParallelRefIterator`]: https://docs.rs/rayon/1.0/rayon/iter/trait.IntoParallelRefIterator.html
pub struct ParIter<'a, K, V> {
    inner: RawParIter<'a, K, V>,
}

impl<'a, K: Sync, V: Sync> ParallelIterator for ParIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner.drive_unindexed(consumer)
    }
}

impl<K, V> Clone for ParIter<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        ParIter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ParIter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.iter()).finish()
    }
}

/// Parallel iterator over shared references to keys in a map.
///
/// This iterator is created by the [`par_keys`] method on [`HashMap`].
/// See its documentation for more.
///
/// [`par_keys`]: /bitprobe/struct.HashMap.html#method.par_keys
/// [`HashMap`]: /bitprobe/struct.HashMap.html
pub struct ParKeys<'a, K, V> {
    inner: RawParIter<'a, K, V>,
}

impl<'a, K: Sync, V: Sync> ParallelIterator for ParKeys<'a, K, V> {
    type Item = &'a K;

    #[cfg_attr(feature = "inline-more", inline)]
    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner.map(|(k, _)| k).drive_unindexed(consumer)
    }
}

impl<K, V> Clone for ParKeys<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        ParKeys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for ParKeys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.iter().map(|(k, _)| k)).finish()
    }
}

/// Parallel iterator over shared references to values in a map.
///
/// This iterator is created by the [`par_values`] method on [`HashMap`].
/// See its documentation for more.
///
/// [`par_values`]: /bitprobe/struct.HashMap.html#method.par_values
/// [`HashMap`]: /bitprobe/struct.HashMap.html
pub struct ParValues<'a, K, V> {
    inner: RawParIter<'a, K, V>,
}

impl<'a, K: Sync, V: Sync> ParallelIterator for ParValues<'a, K, V> {
    type Item = &'a V;

    #[cfg_attr(feature = "inline-more", inline)]
    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner.map(|(_, v)| v).drive_unindexed(consumer)
    }
}

impl<K, V> Clone for ParValues<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        ParValues {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for ParValues<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.iter().map(|(_, v)| v)).finish()
    }
}

impl<K: Sync, V: Sync, S, L> HashMap<K, V, S, L> {
    /// Visits (potentially in parallel) immutably borrowed keys in an arbitrary order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn par_keys(&self) -> ParKeys<'_, K, V> {
        ParKeys {
            inner: self.table.par_iter(),
        }
    }

    /// Visits (potentially in parallel) immutably borrowed values in an arbitrary order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn par_values(&self) -> ParValues<'_, K, V> {
        ParValues {
            inner: self.table.par_iter(),
        }
    }
}

impl<K, V, S, L> HashMap<K, V, S, L>
where
    K: Eq + Hash + Sync,
    V: PartialEq + Sync,
    S: BuildHasher + Sync,
{
    /// Returns `true` if the map is equal to another,
    /// i.e. both maps contain the same keys mapped to the same values.
    ///
    /// This method runs in a potentially parallel fashion. Unlike the sequential lookups, it
    /// does not update the [`status`](HashMap::status) of `other`.
    pub fn par_eq(&self, other: &Self) -> bool {
        let table = &other.table;
        let hash_builder = &other.hash_builder;
        self.len() == other.len()
            && self.into_par_iter().all(move |(key, value)| {
                table
                    .find(make_hash(hash_builder, key), |k| k == key)
                    .and_then(|i| table.get(i))
                    .map_or(false, |(_, v)| *value == *v)
            })
    }
}

impl<'a, K: Sync, V: Sync, S, L> IntoParallelIterator for &'a HashMap<K, V, S, L> {
    type Item = (&'a K, &'a V);
    type Iter = ParIter<'a, K, V>;

    #[cfg_attr(feature = "inline-more", inline)]
    fn into_par_iter(self) -> Self::Iter {
        ParIter {
            inner: self.table.par_iter(),
        }
    }
}

impl<K: Send, V: Send, S, L> IntoParallelIterator for HashMap<K, V, S, L> {
    type Item = (K, V);
    type Iter = rayon_::vec::IntoIter<(K, V)>;

    /// Moves the entries out in slot order, then hands them to rayon.
    fn into_par_iter(self) -> Self::Iter {
        self.into_iter().collect::<Vec<_>>().into_par_iter()
    }
}

/// Collect (key, value) pairs from a parallel iterator into a
/// hashmap. If multiple pairs correspond to the same key, then the
/// ones produced earlier in the parallel iterator will be
/// overwritten, just as with a sequential iterator.
impl<K, V, S, L> FromParallelIterator<(K, V)> for HashMap<K, V, S, L>
where
    K: Eq + Hash + Send,
    V: Send,
    S: BuildHasher + Default,
    L: LoadPolicy + Default,
{
    fn from_par_iter<P>(par_iter: P) -> Self
    where
        P: IntoParallelIterator<Item = (K, V)>,
    {
        let mut map = HashMap::default();
        map.par_extend(par_iter);
        map
    }
}

/// Extend a hash map with items from a parallel iterator.
impl<K, V, S, L> ParallelExtend<(K, V)> for HashMap<K, V, S, L>
where
    K: Eq + Hash + Send,
    V: Send,
    S: BuildHasher,
    L: LoadPolicy,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = (K, V)>,
    {
        extend(self, par_iter);
    }
}

/// Extend a hash map with copied items from a parallel iterator.
impl<'a, K, V, S, L> ParallelExtend<(&'a K, &'a V)> for HashMap<K, V, S, L>
where
    K: Copy + Eq + Hash + Sync,
    V: Copy + Sync,
    S: BuildHasher,
    L: LoadPolicy,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = (&'a K, &'a V)>,
    {
        extend(self, par_iter);
    }
}

// Items are gathered in parallel but inserted on the calling thread.
fn extend<K, V, S, L, I>(map: &mut HashMap<K, V, S, L>, par_iter: I)
where
    K: Eq + Hash,
    S: BuildHasher,
    L: LoadPolicy,
    I: IntoParallelIterator,
    HashMap<K, V, S, L>: Extend<I::Item>,
{
    let (list, len) = super::helpers::collect(par_iter);

    // Keys may be already present or show multiple times in the iterator.
    // Reserve the entire length if the map is empty.
    // Otherwise reserve half the length (rounded up), so the map
    // will only resize twice in the worst case.
    let reserve = if map.is_empty() { len } else { (len + 1) / 2 };
    map.reserve(reserve);
    for vec in list {
        map.extend(vec);
    }
}

#[cfg(test)]
mod test_par_map {
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use rayon_::prelude::*;

    use crate::hash_map::HashMap;

    #[test]
    fn test_debug_lists_entries() {
        let mut m = HashMap::new();
        m.insert(1, 'a');
        assert_eq!(format!("{:?}", m.par_iter()), "[(1, 'a')]");
        assert_eq!(format!("{:?}", m.par_keys()), "[1]");
        assert_eq!(format!("{:?}", m.par_values()), "['a']");
    }

    #[test]
    fn test_empty_iter() {
        let m: HashMap<isize, bool> = HashMap::new();
        assert_eq!(m.par_keys().count(), 0);
        assert_eq!(m.par_values().count(), 0);
        assert_eq!(m.par_iter().count(), 0);
        assert_eq!(m.len(), 0);
        assert!(m.is_empty());
        assert_eq!(m.into_par_iter().count(), 0);
    }

    #[test]
    fn test_iterate() {
        let mut m = HashMap::with_capacity(4);
        for i in 0..32 {
            assert!(m.insert(i, i * 2).is_none());
        }
        assert_eq!(m.len(), 32);

        let observed = AtomicUsize::new(0);

        m.par_iter().for_each(|(k, v)| {
            assert_eq!(*v, *k * 2);
            observed.fetch_or(1 << *k, Ordering::Relaxed);
        });
        assert_eq!(observed.into_inner(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_keys() {
        let vec = vec![(1, 'a'), (2, 'b'), (3, 'c')];
        let map: HashMap<_, _> = vec.into_par_iter().collect();
        let keys: Vec<_> = map.par_keys().cloned().collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&1));
        assert!(keys.contains(&2));
        assert!(keys.contains(&3));
    }

    #[test]
    fn test_values() {
        let vec = vec![(1, 'a'), (2, 'b'), (3, 'c')];
        let map: HashMap<_, _> = vec.into_par_iter().collect();
        let values: Vec<_> = map.par_values().cloned().collect();
        assert_eq!(values.len(), 3);
        assert!(values.contains(&'a'));
        assert!(values.contains(&'b'));
        assert!(values.contains(&'c'));
    }

    #[test]
    fn test_into_par_iter() {
        let map: HashMap<_, _> = (0..100).map(|i| (i, i + 1)).collect();
        let mut pairs: Vec<_> = map.into_par_iter().collect();
        pairs.sort_unstable();
        assert_eq!(pairs, (0..100).map(|i| (i, i + 1)).collect::<Vec<_>>());
    }

    #[test]
    fn test_par_eq() {
        let a: HashMap<_, _> = (0..50).into_par_iter().map(|i| (i, i)).collect();
        let mut b: HashMap<_, _> = (0..50).map(|i| (i, i)).collect();
        assert!(a.par_eq(&b));
        b.insert(7, 8);
        assert!(!a.par_eq(&b));
        b.remove(&7);
        assert!(!a.par_eq(&b));
    }

    #[test]
    fn test_extend_ref() {
        let mut a = HashMap::new();
        a.insert(1, "one");
        let mut b = HashMap::new();
        b.insert(2, "two");
        b.insert(3, "three");

        a.par_extend(&b);

        assert_eq!(a.len(), 3);
        assert_eq!(a[&1], "one");
        assert_eq!(a[&2], "two");
        assert_eq!(a[&3], "three");
    }
}
