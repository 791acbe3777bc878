//! Owning handles to blocks of uninitialised element storage.
//!
//! A [`RawBuffer`] knows how many `T` its block can hold and nothing about
//! which of those slots are live. It never runs a constructor or destructor
//! of `T`; whoever places values into the block is responsible for dropping
//! them before the buffer goes away.
//!
//! # Safety invariant
//!
//! `ptr` and `capacity` are private to this module and only ever set by
//! [`RawBuffer::allocate`], [`RawBuffer::new`] and [`RawBuffer::swap`]. As a
//! consequence, whenever `capacity != 0` and `T` is not zero-sized, `ptr` is
//! the start of a live allocation made with `Layout::array::<T>(capacity)`
//! that this buffer alone owns. `Drop` relies on that to deallocate.

use std::alloc::{alloc, dealloc, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ops::{Index, IndexMut};
use std::ptr::NonNull;
use std::slice;

use crate::error::AllocationError;

/// An owning handle to uninitialised storage for exactly `capacity` values
/// of `T`.
///
/// The buffer is movable but not clonable: duplicating the handle would
/// duplicate ownership of the block. [`RawBuffer::take`] (or
/// [`mem::take`]) moves the block out and leaves an empty buffer behind.
pub struct RawBuffer<T> {
    /// Start of the block. Dangling but aligned when no block is owned.
    ptr: NonNull<T>,
    /// Number of `T` the block can hold.
    capacity: usize,
    _marker: PhantomData<T>,
}

// SAFETY: the buffer owns its block exclusively; sending it sends the
// values the owner placed inside, so `T: Send` suffices.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: `&RawBuffer` hands out only raw pointers and `&[MaybeUninit<T>]`,
// which are shareable whenever `T` is.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// An empty buffer. Performs no allocation.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocate uninitialised storage for `capacity` values.
    ///
    /// A zero capacity yields the same empty buffer as [`RawBuffer::new`].
    /// Zero-sized `T` never touches the allocator.
    ///
    /// # Errors
    ///
    /// [`AllocationError::CapacityOverflow`] when the block would exceed
    /// `isize::MAX` bytes, [`AllocationError::Exhausted`] when the global
    /// allocator cannot satisfy the request.
    pub fn allocate(capacity: usize) -> Result<Self, AllocationError> {
        if capacity == 0 {
            return Ok(Self::new());
        }
        let layout = Layout::array::<T>(capacity)
            .map_err(|_| AllocationError::CapacityOverflow {
                requested: capacity,
            })?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            });
        }

        // SAFETY: `layout` has a non-zero size, checked above.
        let raw = unsafe { alloc(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            tracing::warn!(capacity, bytes = layout.size(), "raw buffer allocation failed");
            return Err(AllocationError::Exhausted {
                requested: capacity,
                layout,
            });
        };
        tracing::trace!(capacity, bytes = layout.size(), "allocated raw buffer");

        Ok(Self {
            ptr,
            capacity,
            _marker: PhantomData,
        })
    }

    /// Number of values the block can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Address of the first slot, or `None` when the buffer holds no block.
    #[inline]
    pub fn address(&self) -> Option<NonNull<T>> {
        (self.capacity != 0).then_some(self.ptr)
    }

    /// Pointer to the first slot.
    ///
    /// Never null: an empty buffer returns a dangling, well-aligned pointer
    /// so that zero-length slices can be formed from it.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable pointer to the first slot. See [`RawBuffer::as_ptr`].
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to slot `offset`.
    ///
    /// `offset == capacity` is allowed and yields the one-past-end address,
    /// which must never be dereferenced.
    ///
    /// # Panics
    ///
    /// Panics if `offset > capacity`.
    #[inline]
    #[track_caller]
    pub fn offset(&self, offset: usize) -> *mut T {
        assert!(
            offset <= self.capacity,
            "offset {offset} past end of buffer (capacity {})",
            self.capacity
        );
        // SAFETY: `offset <= capacity`, so the result lies inside the block
        // or one past its end. For an empty buffer the offset is 0.
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// The whole block as a slice of possibly-uninitialised slots.
    #[inline]
    pub fn as_uninit_slice(&self) -> &[MaybeUninit<T>] {
        // SAFETY: `MaybeUninit<T>` has the layout of `T`, the block holds
        // `capacity` slots (or `ptr` is dangling and aligned when the slot
        // count is zero or `T` is zero-sized), and any bit pattern is a
        // valid `MaybeUninit<T>`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast::<MaybeUninit<T>>(), self.capacity) }
    }

    /// The whole block as a mutable slice of possibly-uninitialised slots.
    #[inline]
    pub fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>] {
        // SAFETY: as in `as_uninit_slice`; `&mut self` guarantees exclusivity.
        unsafe {
            slice::from_raw_parts_mut(self.ptr.as_ptr().cast::<MaybeUninit<T>>(), self.capacity)
        }
    }

    /// Exchange blocks with `other`. Never touches element lifetimes.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Move the block out, leaving an empty buffer in its place.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Size of the block in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.capacity * mem::size_of::<T>()
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        let bytes = self.memory_bytes();
        if bytes == 0 {
            return;
        }
        // SAFETY: a non-zero byte size means `ptr` came from `alloc` with
        // `Layout::array::<T>(capacity)`, which validated this size and
        // alignment (module invariant).
        let layout = unsafe { Layout::from_size_align_unchecked(bytes, mem::align_of::<T>()) };
        // SAFETY: the block is owned by this buffer alone and is released
        // exactly once, here.
        unsafe { dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
        tracing::trace!(capacity = self.capacity, bytes, "released raw buffer");
    }
}

impl<T> Index<usize> for RawBuffer<T> {
    type Output = MaybeUninit<T>;

    #[track_caller]
    fn index(&self, index: usize) -> &MaybeUninit<T> {
        assert!(
            index < self.capacity,
            "slot {index} out of range for buffer of capacity {}",
            self.capacity
        );
        &self.as_uninit_slice()[index]
    }
}

impl<T> IndexMut<usize> for RawBuffer<T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut MaybeUninit<T> {
        assert!(
            index < self.capacity,
            "slot {index} out of range for buffer of capacity {}",
            self.capacity
        );
        &mut self.as_uninit_slice_mut()[index]
    }
}

impl<T> fmt::Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("address", &self.address())
            .field("capacity", &self.capacity)
            .finish()
    }
}
