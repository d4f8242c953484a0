//! A growable raw buffer divided into fixed-size slots.
//!
//! A [`DynaBuf`] owns one contiguous, zero-initialized allocation and hands out its slots as raw
//! bytes. It does not know or care what the bytes mean: a slot may hold a whole record, or be
//! assembled piecewise from several discontiguous inputs with [`DynaBuf::set_sequential`].
//! Interpreting the bytes is left to the caller.

use crate::Error;
use alloc::alloc::{alloc_zeroed, dealloc, realloc};
use core::alloc::Layout;
use core::fmt;
use core::ptr::{self, NonNull};
use core::slice;

/// A zero-initialized buffer of `capacity` slots of `unit` bytes each.
pub struct DynaBuf {
    ptr: NonNull<u8>,
    capacity: usize,
    // Size is always a multiple of the alignment, so every slot is aligned.
    unit: Layout,
}

// SAFETY: a DynaBuf uniquely owns its bytes, exactly like a `Vec<u8>`.
unsafe impl Send for DynaBuf {}
// SAFETY: shared access only ever hands out `&[u8]`.
unsafe impl Sync for DynaBuf {}

impl DynaBuf {
    /// Allocates `count` slots of `unit` bytes, byte-aligned.
    pub fn new(count: usize, unit: usize) -> Result<Self, Error> {
        let unit = Layout::from_size_align(unit, 1).map_err(|_| Error::CapacityOverflow)?;
        Self::with_layout(count, unit)
    }

    /// Allocates `count` slots, each large and aligned enough to hold `unit`.
    ///
    /// The slot size is `unit` padded to its own alignment.
    pub fn with_layout(count: usize, unit: Layout) -> Result<Self, Error> {
        let unit = unit.pad_to_align();
        let layout = Self::region(count, unit)?;
        let ptr = if layout.size() == 0 {
            dangling(unit)
        } else {
            // SAFETY: the layout has a non-zero size.
            let p = unsafe { alloc_zeroed(layout) };
            NonNull::new(p).ok_or(Error::AllocError { layout })?
        };
        Ok(Self {
            ptr,
            capacity: count,
            unit,
        })
    }

    fn region(count: usize, unit: Layout) -> Result<Layout, Error> {
        let size = count
            .checked_mul(unit.size())
            .ok_or(Error::CapacityOverflow)?;
        Layout::from_size_align(size, unit.align()).map_err(|_| Error::CapacityOverflow)
    }

    fn layout(&self) -> Layout {
        // SAFETY: this exact layout was validated when the region was (re)allocated.
        unsafe {
            Layout::from_size_align_unchecked(self.capacity * self.unit.size(), self.unit.align())
        }
    }

    /// Returns the number of slots.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the size of one slot, in bytes.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn unit(&self) -> usize {
        self.unit.size()
    }

    /// Copies `value` into slot `index`. `value` must be exactly one slot long.
    pub fn set(&mut self, index: usize, value: &[u8]) -> Result<(), Error> {
        if value.len() != self.unit() {
            return Err(Error::WrongUnitSize {
                unit: self.unit(),
                got: value.len(),
            });
        }
        self.fetch_mut(index)?.copy_from_slice(value);
        Ok(())
    }

    /// Copies `value` into slot `index` starting `offset` bytes into the slot.
    ///
    /// Returns the offset just past the written bytes, so that a slot can be built up from
    /// several pieces:
    ///
    /// ```
    /// use bitprobe::DynaBuf;
    ///
    /// let mut buf = DynaBuf::new(1, 16).unwrap();
    /// let next = buf.set_sequential(0, 0, b"hello world").unwrap();
    /// assert_eq!(buf.set_sequential(0, next, b"!test").unwrap(), 16);
    /// assert_eq!(buf.fetch(0).unwrap(), b"hello world!test");
    /// ```
    ///
    /// Nothing is written if the span does not fit inside the slot.
    pub fn set_sequential(
        &mut self,
        index: usize,
        offset: usize,
        value: &[u8],
    ) -> Result<usize, Error> {
        let unit = self.unit();
        let end = offset
            .checked_add(value.len())
            .filter(|&end| end <= unit)
            .ok_or(Error::SpanOutOfSlot {
                offset,
                len: value.len(),
                unit,
            })?;
        self.fetch_mut(index)?[offset..end].copy_from_slice(value);
        Ok(end)
    }

    /// Returns the bytes of slot `index`.
    pub fn fetch(&self, index: usize) -> Result<&[u8], Error> {
        self.check(index)?;
        // SAFETY: index is in bounds, and the region is initialized.
        Ok(unsafe { slice::from_raw_parts(self.slot_unchecked(index).as_ptr(), self.unit()) })
    }

    /// Returns the bytes of slot `index` for writing.
    pub fn fetch_mut(&mut self, index: usize) -> Result<&mut [u8], Error> {
        self.check(index)?;
        // SAFETY: index is in bounds, and we hold the only reference to the region.
        Ok(unsafe { slice::from_raw_parts_mut(self.slot_unchecked(index).as_ptr(), self.unit()) })
    }

    /// Changes the number of slots, preserving the bytes of the slots that remain.
    ///
    /// New slots are zeroed. If the allocation fails, the buffer is left as it was.
    pub fn resize(&mut self, count: usize) -> Result<(), Error> {
        let old = self.layout();
        let new = Self::region(count, self.unit)?;
        if old.size() == new.size() {
            self.capacity = count;
            return Ok(());
        }

        if new.size() == 0 {
            // SAFETY: old is the live, non-empty allocation.
            unsafe { dealloc(self.ptr.as_ptr(), old) };
            self.ptr = dangling(self.unit);
        } else if old.size() == 0 {
            // SAFETY: new has a non-zero size.
            let p = unsafe { alloc_zeroed(new) };
            self.ptr = NonNull::new(p).ok_or(Error::AllocError { layout: new })?;
        } else {
            // SAFETY: ptr was allocated with `old`, and new.size() is non-zero and was validated
            // against the alignment by `region`.
            let p = unsafe { realloc(self.ptr.as_ptr(), old, new.size()) };
            let p = NonNull::new(p).ok_or(Error::AllocError { layout: new })?;
            if new.size() > old.size() {
                // SAFETY: the grown tail lies inside the new allocation.
                unsafe { ptr::write_bytes(p.as_ptr().add(old.size()), 0, new.size() - old.size()) };
            }
            self.ptr = p;
        }
        self.capacity = count;
        Ok(())
    }

    /// The whole region as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: the region is initialized (zeroed on allocation) and `layout().size()` long.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.layout().size()) }
    }

    /// The whole region as mutable bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as for `as_bytes`, plus we hold `&mut self`.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.layout().size()) }
    }

    #[cfg_attr(feature = "inline-more", inline)]
    fn check(&self, index: usize) -> Result<(), Error> {
        if index < self.capacity {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                index,
                len: self.capacity,
            })
        }
    }

    /// Returns a pointer to the start of the region, aligned to the unit layout.
    #[cfg_attr(feature = "inline-more", inline)]
    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Returns a pointer to the start of slot `index`, aligned to the unit layout.
    ///
    /// # Safety
    ///
    /// `index` must be less than `capacity()`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub(crate) unsafe fn slot_unchecked(&self, index: usize) -> NonNull<u8> {
        debug_assert!(index < self.capacity);
        NonNull::new_unchecked(self.ptr.as_ptr().add(index * self.unit.size()))
    }
}

fn dangling(unit: Layout) -> NonNull<u8> {
    // SAFETY: alignments are never zero.
    unsafe { NonNull::new_unchecked(unit.align() as *mut u8) }
}

impl Drop for DynaBuf {
    fn drop(&mut self) {
        let layout = self.layout();
        if layout.size() != 0 {
            // SAFETY: ptr was allocated with exactly this layout.
            unsafe { dealloc(self.ptr.as_ptr(), layout) };
        }
    }
}

impl Clone for DynaBuf {
    fn clone(&self) -> Self {
        let mut new = match Self::with_layout(self.capacity, self.unit) {
            Ok(new) => new,
            Err(e) => e.abort(),
        };
        new.as_bytes_mut().copy_from_slice(self.as_bytes());
        new
    }
}

impl fmt::Debug for DynaBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynaBuf")
            .field("capacity", &self.capacity)
            .field("unit", &self.unit.size())
            .finish()
    }
}
