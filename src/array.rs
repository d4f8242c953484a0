//! An unordered, swap-based dynamic array.
//!
//! Inserting into the middle of an [`Array`] moves the displaced element to the end, and removing
//! moves the last element into the hole, so both are O(1). The price is that the relative order of
//! the other elements is not preserved.

use crate::{DynaBuf, Error};
use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::ptr;
use core::slice;

/// A contiguous growable array over a [`DynaBuf`].
pub struct Array<T> {
    data: DynaBuf,
    len: usize,
    marker: PhantomData<T>,
}

impl<T> Array<T> {
    /// Creates an empty array without allocating.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty array with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(a) => a,
            Err(e) => e.abort(),
        }
    }

    /// Creates an empty array with room for `capacity` elements, reporting allocation failure.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        Ok(Self {
            data: DynaBuf::with_layout(capacity, Layout::new::<T>())?,
            len: 0,
            marker: PhantomData,
        })
    }

    /// Returns the number of elements.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array holds no elements.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the array can hold without reallocating.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn ptr(&self, index: usize) -> *mut T {
        // SAFETY: callers stay within the allocation; slots are laid out as a `[T]`.
        unsafe { self.data.as_ptr().cast::<T>().add(index) }
    }

    fn reserve_one(&mut self) -> Result<(), Error> {
        if self.len < self.capacity() {
            return Ok(());
        }
        let grown = self
            .len
            .checked_mul(2)
            .and_then(|n| n.checked_add(1))
            .ok_or(Error::CapacityOverflow)?;
        self.data.resize(grown)
    }

    /// Appends `item` to the end of the array.
    pub fn append(&mut self, item: T) {
        if let Err(e) = self.try_append(item) {
            e.abort();
        }
    }

    /// Appends `item`, reporting allocation failure instead of aborting.
    pub fn try_append(&mut self, item: T) -> Result<(), Error> {
        self.reserve_one()?;
        // SAFETY: reserve_one guarantees slot `len` exists and is unused.
        unsafe { ptr::write(self.ptr(self.len), item) };
        self.len += 1;
        Ok(())
    }

    /// Places `item` at `index`, moving whatever was there to the end.
    ///
    /// `index` may be `len()`, in which case this is an append.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), Error> {
        if index > self.len {
            return Err(Error::OutOfBounds {
                index,
                len: self.len,
            });
        }
        self.reserve_one()?;
        // SAFETY: index <= len < capacity, and slot `len` is unused.
        unsafe {
            if index < self.len {
                ptr::copy_nonoverlapping(self.ptr(index), self.ptr(self.len), 1);
            }
            ptr::write(self.ptr(index), item);
        }
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the element at `index`, moving the last element into its place.
    pub fn remove(&mut self, index: usize) -> Result<T, Error> {
        if index >= self.len {
            return Err(Error::OutOfBounds {
                index,
                len: self.len,
            });
        }
        self.len -= 1;
        // SAFETY: both slots were live; after the read, slot `index` is refilled from the old
        // last slot, which is no longer counted.
        unsafe {
            let item = ptr::read(self.ptr(index));
            if index != self.len {
                ptr::copy_nonoverlapping(self.ptr(self.len), self.ptr(index), 1);
            }
            Ok(item)
        }
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<T> {
        self.len.checked_sub(1).and_then(|i| self.remove(i).ok())
    }

    /// Returns the element at `index`.
    pub fn fetch(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    /// Returns the element at `index` for writing.
    pub fn fetch_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }

    /// Exchanges the elements at `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), Error> {
        let index = usize::max(a, b);
        if index >= self.len {
            return Err(Error::OutOfBounds {
                index,
                len: self.len,
            });
        }
        self.as_mut_slice().swap(a, b);
        Ok(())
    }

    /// Reallocates to hold exactly `count` elements.
    ///
    /// Fails with [`Error::InvalidRequest`] if that would not fit the current elements.
    pub fn resize(&mut self, count: usize) -> Result<(), Error> {
        if count < self.len {
            return Err(Error::InvalidRequest {
                requested: count,
                entries: self.len,
            });
        }
        self.data.resize(count)
    }

    /// Drops every element, keeping the allocation.
    pub fn clear(&mut self) {
        let live: *mut [T] = self.as_mut_slice();
        self.len = 0;
        // SAFETY: the elements are no longer reachable through `self`.
        unsafe { ptr::drop_in_place(live) };
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized `T`s and the base pointer is aligned.
        unsafe { slice::from_raw_parts(self.ptr(0), self.len) }
    }

    /// The elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for `as_slice`, plus we hold `&mut self`.
        unsafe { slice::from_raw_parts_mut(self.ptr(0), self.len) }
    }
}

impl<T> Drop for Array<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for Array<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Array<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone> Clone for Array<T> {
    fn clone(&self) -> Self {
        let mut new = Self::with_capacity(self.len);
        for item in self.iter() {
            new.append(item.clone());
        }
        new
    }
}

impl<T: fmt::Debug> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for Array<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.append(item);
        }
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut a = Self::new();
        a.extend(iter);
        a
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
