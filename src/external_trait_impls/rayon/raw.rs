use crate::raw::{RawIter, RawTable};
use rayon_::iter::{plumbing::UnindexedConsumer, IntoParallelIterator, ParallelIterator};

/// Parallel iterator which returns every occupied slot in the table.
///
/// The slot indices are split across threads; each thread skips the free slots in its range.
pub struct RawParIter<'a, K, V> {
    table: &'a RawTable<K, V>,
}

impl<'a, K, V> RawParIter<'a, K, V> {
    /// Walks the same entries sequentially.
    pub(super) fn iter(&self) -> RawIter<'a, K, V> {
        self.table.iter()
    }
}

impl<K, V> Clone for RawParIter<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        RawParIter { table: self.table }
    }
}

impl<'a, K: Sync, V: Sync> ParallelIterator for RawParIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        let table = self.table;
        (0..table.capacity())
            .into_par_iter()
            .filter_map(move |index| table.get(index))
            .drive_unindexed(consumer)
    }
}

impl<K, V> RawTable<K, V> {
    /// Returns a parallel iterator over the entries in a `RawTable`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn par_iter(&self) -> RawParIter<'_, K, V> {
        RawParIter { table: self }
    }
}
