//! Rayon extensions for `HashSet`.

use super::map::ParKeys;
use crate::hash_set::HashSet;
use crate::LoadPolicy;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use rayon_::iter::plumbing::UnindexedConsumer;
use rayon_::iter::{FromParallelIterator, IntoParallelIterator, ParallelExtend, ParallelIterator};

/// Parallel iterator over shared references to elements in a set.
///
/// This iterator is created by the [`par_iter`] method on [`HashSet`]
/// (provided by the [`IntoParallelRefIterator`] trait).
/// See its documentation for more.
///
/// [`par_iter`]: /bitprobe/struct.HashSet.html#method.par_iter
/// [`HashSet`]: /bitprobe/struct.HashSet.html
/// [`IntoParallelRefIterator`]: https://docs.rs/rayon/1.0/rayon/iter/trait.IntoParallelRefIterator.html
pub struct ParIter<'a, T> {
    inner: ParKeys<'a, T, ()>,
}

impl<'a, T: Sync> ParallelIterator for ParIter<'a, T> {
    type Item = &'a T;

    #[cfg_attr(feature = "inline-more", inline)]
    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        self.inner.drive_unindexed(consumer)
    }
}

impl<T> Clone for ParIter<'_, T> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        ParIter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ParIter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<'a, T: Sync, S, L> IntoParallelIterator for &'a HashSet<T, S, L> {
    type Item = &'a T;
    type Iter = ParIter<'a, T>;

    #[cfg_attr(feature = "inline-more", inline)]
    fn into_par_iter(self) -> Self::Iter {
        ParIter {
            inner: self.map.par_keys(),
        }
    }
}

/// Collect values from a parallel iterator into a hashset.
impl<T, S, L> FromParallelIterator<T> for HashSet<T, S, L>
where
    T: Eq + Hash + Send,
    S: BuildHasher + Default,
    L: LoadPolicy + Default,
{
    fn from_par_iter<P>(par_iter: P) -> Self
    where
        P: IntoParallelIterator<Item = T>,
    {
        let mut set = HashSet::default();
        set.par_extend(par_iter);
        set
    }
}

/// Extend a hash set with items from a parallel iterator.
impl<T, S, L> ParallelExtend<T> for HashSet<T, S, L>
where
    T: Eq + Hash + Send,
    S: BuildHasher,
    L: LoadPolicy,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = T>,
    {
        self.map
            .par_extend(par_iter.into_par_iter().map(|k| (k, ())));
    }
}

/// Extend a hash set with copied items from a parallel iterator.
impl<'a, T, S, L> ParallelExtend<&'a T> for HashSet<T, S, L>
where
    T: 'a + Copy + Eq + Hash + Sync + Send,
    S: BuildHasher,
    L: LoadPolicy,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = &'a T>,
    {
        self.par_extend(par_iter.into_par_iter().copied());
    }
}
