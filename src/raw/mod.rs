//! The open-addressing table underneath [`HashMap`](crate::HashMap) and
//! [`HashSet`](crate::HashSet).
//!
//! A [`RawTable`] packs each key and its value into one fixed-size slot of a [`DynaBuf`]: the
//! key at offset zero and the value at [`RawTable::val_offset`]. Whether a slot holds anything is
//! recorded only in a side [`Bitset`]; the slot bytes themselves are never inspected to decide
//! that, so any key or value, including all-zero ones, can be stored.
//!
//! Collisions are resolved by linear probing from `hash % capacity`. Removal clears the slot's
//! occupancy bit and nothing else moves, so a freed slot may sit in the middle of another key's
//! probe run. A second bitmap remembers every slot used since the table was last rebuilt, and a
//! lookup only stops at a slot that has never been used. Inserts reuse freed slots, and once
//! freed-but-used slots make up more than an eighth of the table it is rebuilt in place.
//!
//! This API is unsafe-free but low level: the caller supplies hashes and equality closures, and
//! is responsible for never inserting a key that is already present.

use crate::{Bitset, DynaBuf, Error};
use core::alloc::Layout;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;
use core::ptr;

/// What one slot of a table holds.
#[derive(Debug, PartialEq, Eq)]
pub enum Slot<'a, K, V> {
    /// Nothing; the slot is free.
    Empty,
    /// A live key and its value.
    Occupied(&'a K, &'a V),
}

/// Progress of an iterator over a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IterStatus {
    /// Nothing has been pulled yet.
    Ready,
    /// The last pull produced an item.
    Continue,
    /// The iterator is exhausted; it keeps returning `None`.
    Stop,
}

/// A linear-probing hash table of key/value slots gated by an occupancy bitmap.
pub struct RawTable<K, V> {
    slots: DynaBuf,
    filter: Bitset,
    // Slots occupied at some point since the last rebuild. Probe runs end outside it.
    used: Bitset,
    // Slots in `used` that are no longer occupied.
    stale: usize,
    entries: usize,
    slot: Layout,
    val_offset: usize,
    marker: PhantomData<(K, V)>,
}

#[cfg_attr(feature = "inline-more", inline)]
fn next(index: usize, capacity: usize) -> usize {
    if index + 1 == capacity {
        0
    } else {
        index + 1
    }
}

#[cfg_attr(feature = "inline-more", inline)]
fn home(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

/// The size of the table the containers grow to from `capacity`.
pub(crate) fn grown(capacity: usize) -> Result<usize, Error> {
    capacity
        .checked_mul(2)
        .and_then(|c| c.checked_add(1))
        .ok_or(Error::CapacityOverflow)
}

impl<K, V> RawTable<K, V> {
    /// Creates an empty table with no slots.
    ///
    /// Only the one-byte occupancy bitmap is allocated.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Allocates a table with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(t) => t,
            Err(e) => e.abort(),
        }
    }

    /// Allocates a table with exactly `capacity` slots, reporting allocation failure.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        let (slot, val_offset) = Layout::new::<K>()
            .extend(Layout::new::<V>())
            .map_err(|_| Error::CapacityOverflow)?;
        Ok(Self {
            slots: DynaBuf::with_layout(capacity, slot)?,
            filter: Bitset::new(capacity)?,
            used: Bitset::new(capacity)?,
            stale: 0,
            entries: 0,
            slot,
            val_offset,
            marker: PhantomData,
        })
    }

    /// Returns the number of slots.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Returns the number of occupied slots.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Returns `true` if no slot is occupied.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Returns the offset of the value within a slot.
    pub fn val_offset(&self) -> usize {
        self.val_offset
    }

    /// Returns `true` if slot `index` holds an entry.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn is_occupied(&self, index: usize) -> bool {
        index < self.capacity() && self.filter.contains(index)
    }

    #[cfg_attr(feature = "inline-more", inline)]
    unsafe fn key_ptr(&self, index: usize) -> *mut K {
        self.slots.slot_unchecked(index).as_ptr().cast()
    }

    #[cfg_attr(feature = "inline-more", inline)]
    unsafe fn value_ptr(&self, index: usize) -> *mut V {
        self.slots
            .slot_unchecked(index)
            .as_ptr()
            .add(self.val_offset)
            .cast()
    }

    /// Returns what slot `index` holds. Indices past the end are reported as empty.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn slot(&self, index: usize) -> Slot<'_, K, V> {
        match self.get(index) {
            Some((k, v)) => Slot::Occupied(k, v),
            None => Slot::Empty,
        }
    }

    /// Returns the entry in slot `index`, if it is occupied.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn get(&self, index: usize) -> Option<(&K, &V)> {
        if self.is_occupied(index) {
            // SAFETY: the bitmap says the slot holds an initialized key and value.
            unsafe { Some((&*self.key_ptr(index), &*self.value_ptr(index))) }
        } else {
            None
        }
    }

    /// Returns the entry in slot `index` with a mutable value, if it is occupied.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn get_mut(&mut self, index: usize) -> Option<(&K, &mut V)> {
        if self.is_occupied(index) {
            // SAFETY: as for `get`, and we hold `&mut self`.
            unsafe { Some((&*self.key_ptr(index), &mut *self.value_ptr(index))) }
        } else {
            None
        }
    }

    /// Searches for a key, returning the index of its slot.
    ///
    /// `eq` is only ever called on occupied slots.
    #[inline]
    pub fn find(&self, hash: u64, mut eq: impl FnMut(&K) -> bool) -> Option<usize> {
        let capacity = self.capacity();
        if self.entries == 0 {
            return None;
        }
        let start = home(hash, capacity);
        let mut index = start;
        loop {
            if self.filter.contains(index) {
                // SAFETY: occupied, so the key is initialized.
                if eq(unsafe { &*self.key_ptr(index) }) {
                    return Some(index);
                }
            } else if !self.used.contains(index) {
                return None;
            }
            index = next(index, capacity);
            if index == start {
                return None;
            }
        }
    }

    fn find_free(&self, hash: u64) -> Option<usize> {
        let capacity = self.capacity();
        if capacity == 0 {
            return None;
        }
        let start = home(hash, capacity);
        let mut index = start;
        while self.filter.contains(index) {
            index = next(index, capacity);
            if index == start {
                return None;
            }
        }
        Some(index)
    }

    /// Inserts a new entry into the table, growing it first if it is full.
    ///
    /// This does not check if the given key already exists in the table. If growing fails, the
    /// table is left unchanged and the entry is dropped.
    pub fn insert(
        &mut self,
        hash: u64,
        key: K,
        value: V,
        hasher: impl Fn(&K) -> u64,
    ) -> Result<usize, Error> {
        if self.entries + 1 > self.capacity() {
            let target = grown(self.capacity())?;
            log::debug!(
                "table full at {} entries, growing to {}",
                self.entries,
                target
            );
            self.rehash(target, &hasher)?;
        } else if self.stale > self.capacity() / 8 {
            if let Err(e) = self.rehash(self.capacity(), &hasher) {
                log::warn!(
                    "could not rebuild table with {} freed slots: {}",
                    self.stale,
                    e
                );
            }
        }

        let index = loop {
            match self.find_free(hash) {
                Some(index) => break index,
                None => {
                    log::warn!(
                        "probe wrapped around with {} of {} slots occupied",
                        self.entries,
                        self.capacity()
                    );
                    self.rehash(grown(self.capacity())?, &hasher)?;
                }
            }
        };

        // SAFETY: index is in bounds and unoccupied, so nothing is overwritten.
        unsafe {
            ptr::write(self.key_ptr(index), key);
            ptr::write(self.value_ptr(index), value);
        }
        self.filter.add(index);
        if self.used.contains(index) {
            self.stale -= 1;
        } else {
            self.used.add(index);
        }
        self.entries += 1;
        Ok(index)
    }

    /// Removes the entry in slot `index` and hands it back.
    pub fn remove(&mut self, index: usize) -> Option<(K, V)> {
        if !self.is_occupied(index) {
            return None;
        }
        self.filter.remove(index);
        self.entries -= 1;
        self.stale += 1;
        // SAFETY: the slot was occupied; clearing its bit above means it will not be read again.
        unsafe { Some((ptr::read(self.key_ptr(index)), ptr::read(self.value_ptr(index)))) }
    }

    /// Changes the number of slots to exactly `capacity`, re-placing every entry.
    ///
    /// Asking for fewer slots than there are entries (or for none at all) fails with
    /// [`Error::InvalidRequest`]. Asking for the current capacity does nothing.
    pub fn resize(&mut self, capacity: usize, hasher: impl Fn(&K) -> u64) -> Result<(), Error> {
        if capacity < self.entries || capacity == 0 {
            return Err(Error::InvalidRequest {
                requested: capacity,
                entries: self.entries,
            });
        }
        if capacity == self.capacity() {
            log::trace!("resize to current capacity {} is a no-op", capacity);
            return Ok(());
        }
        self.rehash(capacity, hasher)
    }

    /// Grows the table to `2 * capacity + 1` slots.
    pub fn grow(&mut self, hasher: impl Fn(&K) -> u64) -> Result<(), Error> {
        self.rehash(grown(self.capacity())?, hasher)
    }

    fn rehash(&mut self, capacity: usize, hasher: impl Fn(&K) -> u64) -> Result<(), Error> {
        debug_assert!(capacity >= self.entries && capacity > 0);
        log::debug!(
            "rehashing {} entries from {} to {} slots",
            self.entries,
            self.capacity(),
            capacity
        );

        let mut slots = DynaBuf::with_layout(capacity, self.slot)?;
        let mut filter = Bitset::new(capacity)?;
        let mut used = Bitset::new(capacity)?;
        for old in 0..self.capacity() {
            if !self.filter.contains(old) {
                continue;
            }
            // SAFETY: occupied, so the key is initialized.
            let hash = hasher(unsafe { &*self.key_ptr(old) });
            // There are at least as many new slots as entries, so this finds a free one.
            let mut new = home(hash, capacity);
            while filter.contains(new) {
                new = next(new, capacity);
            }
            // SAFETY: both indices are in bounds of their buffers, which share a slot layout and
            // are distinct allocations.
            unsafe {
                ptr::copy_nonoverlapping(
                    self.slots.slot_unchecked(old).as_ptr(),
                    slots.slot_unchecked(new).as_ptr(),
                    self.slot.size(),
                );
            }
            filter.add(new);
            used.add(new);
        }

        // The entries now live in the new buffer; dropping the old one only frees its memory.
        self.slots = slots;
        self.filter = filter;
        self.used = used;
        self.stale = 0;
        Ok(())
    }

    /// Removes every entry, keeping the allocation.
    pub fn clear(&mut self) {
        if mem::needs_drop::<(K, V)>() {
            for index in 0..self.capacity() {
                drop(self.remove(index));
            }
        }
        self.filter.clear();
        self.used.clear();
        self.stale = 0;
        self.entries = 0;
    }

    /// Removes the entries for which `f` returns `false`.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        for index in 0..self.capacity() {
            if let Some((k, v)) = self.get_mut(index) {
                if !f(k, v) {
                    drop(self.remove(index));
                }
            }
        }
    }

    /// Returns an iterator over the occupied slots, in slot order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn iter(&self) -> RawIter<'_, K, V> {
        RawIter {
            table: self,
            index: 0,
            remaining: self.entries,
            status: IterStatus::Ready,
        }
    }

    /// Returns an iterator over the occupied slots with mutable values, in slot order.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn iter_mut(&mut self) -> RawIterMut<'_, K, V> {
        RawIterMut {
            remaining: self.entries,
            table: self,
            index: 0,
            status: IterStatus::Ready,
            marker: PhantomData,
        }
    }

    /// Returns an iterator that removes every entry, in slot order.
    ///
    /// Entries not yet yielded when the iterator is dropped are dropped too.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn drain(&mut self) -> RawDrain<'_, K, V> {
        RawDrain {
            table: self,
            index: 0,
        }
    }
}

impl<K, V> Default for RawTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for RawTable<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Clone, V: Clone> Clone for RawTable<K, V> {
    fn clone(&self) -> Self {
        let mut new = Self::with_capacity(self.capacity());
        // Same slots, so every probe run is preserved.
        for (index, (k, v)) in self.iter().enumerate_slots() {
            let (k, v) = (k.clone(), v.clone());
            // SAFETY: index is in bounds and still free in `new`.
            unsafe {
                ptr::write(new.key_ptr(index), k);
                ptr::write(new.value_ptr(index), v);
            }
            new.filter.add(index);
            new.entries += 1;
        }
        new.used = self.used.clone();
        new.stale = self.stale;
        new
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RawTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> IntoIterator for RawTable<K, V> {
    type Item = (K, V);
    type IntoIter = RawIntoIter<K, V>;

    #[cfg_attr(feature = "inline-more", inline)]
    fn into_iter(self) -> RawIntoIter<K, V> {
        RawIntoIter {
            table: self,
            index: 0,
        }
    }
}

/// Iterator over the occupied slots of a table.
pub struct RawIter<'a, K, V> {
    table: &'a RawTable<K, V>,
    index: usize,
    remaining: usize,
    status: IterStatus,
}

impl<'a, K, V> RawIter<'a, K, V> {
    /// Where the iterator is in its lifecycle.
    pub fn status(&self) -> IterStatus {
        self.status
    }

    fn next_slot(&mut self) -> Option<(usize, (&'a K, &'a V))> {
        while self.index < self.table.capacity() {
            let index = self.index;
            self.index += 1;
            if let Slot::Occupied(k, v) = self.table.slot(index) {
                self.remaining -= 1;
                self.status = IterStatus::Continue;
                return Some((index, (k, v)));
            }
        }
        self.status = IterStatus::Stop;
        None
    }

    fn enumerate_slots(self) -> impl Iterator<Item = (usize, (&'a K, &'a V))> {
        let mut it = self;
        core::iter::from_fn(move || it.next_slot())
    }
}

impl<K, V> Clone for RawIter<'_, K, V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            index: self.index,
            remaining: self.remaining,
            status: self.status,
        }
    }
}

impl<'a, K, V> Iterator for RawIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<Self::Item> {
        self.next_slot().map(|(_, kv)| kv)
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for RawIter<'_, K, V> {}
impl<K, V> FusedIterator for RawIter<'_, K, V> {}

/// Iterator over the occupied slots of a table, with mutable access to the values.
pub struct RawIterMut<'a, K, V> {
    table: &'a RawTable<K, V>,
    index: usize,
    remaining: usize,
    status: IterStatus,
    marker: PhantomData<&'a mut V>,
}

impl<K, V> RawIterMut<'_, K, V> {
    /// Where the iterator is in its lifecycle.
    pub fn status(&self) -> IterStatus {
        self.status
    }
}

impl<'a, K, V> Iterator for RawIterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.table.capacity() {
            let index = self.index;
            self.index += 1;
            if self.table.is_occupied(index) {
                self.remaining -= 1;
                self.status = IterStatus::Continue;
                // SAFETY: the slot is occupied, the iterator was created from `&mut RawTable`
                // and visits every slot at most once, so the value is not aliased.
                return unsafe {
                    Some((
                        &*self.table.key_ptr(index),
                        &mut *self.table.value_ptr(index),
                    ))
                };
            }
        }
        self.status = IterStatus::Stop;
        None
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for RawIterMut<'_, K, V> {}
impl<K, V> FusedIterator for RawIterMut<'_, K, V> {}

/// Iterator which consumes a table and returns its entries.
pub struct RawIntoIter<K, V> {
    table: RawTable<K, V>,
    index: usize,
}

impl<K, V> RawIntoIter<K, V> {
    /// Returns a by-reference iterator over the remaining entries of this iterator.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn iter(&self) -> RawIter<'_, K, V> {
        RawIter {
            table: &self.table,
            index: self.index,
            remaining: self.table.len(),
            status: IterStatus::Ready,
        }
    }
}

impl<K, V> Iterator for RawIntoIter<K, V> {
    type Item = (K, V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<(K, V)> {
        while self.index < self.table.capacity() {
            let index = self.index;
            self.index += 1;
            if let Some(kv) = self.table.remove(index) {
                return Some(kv);
            }
        }
        None
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.len(), Some(self.table.len()))
    }
}

impl<K, V> ExactSizeIterator for RawIntoIter<K, V> {}
impl<K, V> FusedIterator for RawIntoIter<K, V> {}

/// Iterator which removes every entry of a table.
pub struct RawDrain<'a, K, V> {
    table: &'a mut RawTable<K, V>,
    index: usize,
}

impl<K, V> Iterator for RawDrain<'_, K, V> {
    type Item = (K, V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<(K, V)> {
        while self.index < self.table.capacity() {
            let index = self.index;
            self.index += 1;
            if let Some(kv) = self.table.remove(index) {
                return Some(kv);
            }
        }
        None
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.len(), Some(self.table.len()))
    }
}

impl<K, V> Drop for RawDrain<'_, K, V> {
    fn drop(&mut self) {
        self.table.clear();
    }
}

impl<K, V> ExactSizeIterator for RawDrain<'_, K, V> {}
impl<K, V> FusedIterator for RawDrain<'_, K, V> {}
