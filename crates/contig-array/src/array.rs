//! The growable array and its element-lifetime operations.
//!
//! [`DynamicArray`] owns one [`RawBuffer`] and a live length. The buffer
//! knows nothing about element lifetimes; the array constructs, moves,
//! copies and drops every `T` it holds.
//!
//! # Growth
//!
//! Growth never extends a block in place. Every reallocating operation
//! follows the same sequence:
//!
//! 1. allocate a fresh buffer (failure leaves the array untouched)
//! 2. construct anything new directly in the fresh buffer
//! 3. transfer the live elements under a [`PartialInit`] guard
//! 4. release the originals and swap the buffers (the commit point)
//!
//! A panic in steps 2–3 unwinds through the guards, which drop only what
//! they built, and through the fresh buffer, which frees its block.
//!
//! # Safety invariant
//!
//! `len <= storage.capacity()`, the first `len` slots of `storage` hold live
//! values, and the remaining slots are uninitialised. Every method restores
//! this before it can unwind.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr;
use std::slice;

use contig_raw::{AllocationError, PartialInit, RawBuffer};

use crate::growth;
use crate::policy::{Relocate, TransferPolicy};

/// A growable, contiguous array built on a [`RawBuffer`].
///
/// `P` chooses how live elements are carried across reallocations and
/// shifts; see [`crate::policy`]. The default [`Relocate`] moves them.
pub struct DynamicArray<T, P = Relocate> {
    storage: RawBuffer<T>,
    len: usize,
    _policy: PhantomData<P>,
}

impl<T> DynamicArray<T> {
    /// An empty array. Performs no allocation.
    pub const fn new() -> Self {
        Self {
            storage: RawBuffer::new(),
            len: 0,
            _policy: PhantomData,
        }
    }

    /// An empty array with storage for exactly `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics (or aborts, for allocator exhaustion) if the storage cannot be
    /// allocated. See [`DynamicArray::try_with_capacity`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Relocate)
    }

    /// Fallible form of [`DynamicArray::with_capacity`].
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocationError> {
        Self::try_with_capacity_in(capacity, Relocate)
    }

    /// `len` default-constructed elements in a block of exactly `len`.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self::with_len_in(len, Relocate)
    }

    /// Fallible form of [`DynamicArray::with_len`].
    pub fn try_with_len(len: usize) -> Result<Self, AllocationError>
    where
        T: Default,
    {
        Self::try_with_len_in(len, Relocate)
    }

    /// `len` clones of `value` in a block of exactly `len`.
    pub fn from_elem(len: usize, value: &T) -> Self
    where
        T: Clone,
    {
        Self::from_elem_in(len, value, Relocate)
    }

    /// Fallible form of [`DynamicArray::from_elem`].
    pub fn try_from_elem(len: usize, value: &T) -> Result<Self, AllocationError>
    where
        T: Clone,
    {
        Self::try_from_elem_in(len, value, Relocate)
    }
}

impl<T, P: TransferPolicy<T>> DynamicArray<T, P> {
    pub(crate) fn empty() -> Self {
        Self {
            storage: RawBuffer::new(),
            len: 0,
            _policy: PhantomData,
        }
    }

    fn from_raw_parts(storage: RawBuffer<T>, len: usize) -> Self {
        debug_assert!(len <= storage.capacity());
        Self {
            storage,
            len,
            _policy: PhantomData,
        }
    }

    /// An empty array using transfer policy `P`.
    pub fn new_in(_policy: P) -> Self {
        Self::empty()
    }

    /// An empty array using policy `P`, with storage for `capacity` elements.
    pub fn with_capacity_in(capacity: usize, policy: P) -> Self {
        Self::try_with_capacity_in(capacity, policy).unwrap_or_else(|err| err.handle())
    }

    /// Fallible form of [`DynamicArray::with_capacity_in`].
    pub fn try_with_capacity_in(capacity: usize, _policy: P) -> Result<Self, AllocationError> {
        Ok(Self::from_raw_parts(RawBuffer::allocate(capacity)?, 0))
    }

    /// `len` default-constructed elements using policy `P`.
    ///
    /// If `T::default` panics, the elements built so far are dropped and the
    /// block is freed before the panic continues.
    pub fn with_len_in(len: usize, policy: P) -> Self
    where
        T: Default,
    {
        Self::try_with_len_in(len, policy).unwrap_or_else(|err| err.handle())
    }

    /// Fallible form of [`DynamicArray::with_len_in`].
    pub fn try_with_len_in(len: usize, _policy: P) -> Result<Self, AllocationError>
    where
        T: Default,
    {
        let mut storage = RawBuffer::allocate(len)?;
        let mut run = PartialInit::new(storage.as_uninit_slice_mut());
        run.fill_with(T::default);
        let len = run.commit();
        Ok(Self::from_raw_parts(storage, len))
    }

    /// `len` clones of `value` using policy `P`.
    pub fn from_elem_in(len: usize, value: &T, policy: P) -> Self
    where
        T: Clone,
    {
        Self::try_from_elem_in(len, value, policy).unwrap_or_else(|err| err.handle())
    }

    /// Fallible form of [`DynamicArray::from_elem_in`].
    pub fn try_from_elem_in(len: usize, value: &T, _policy: P) -> Result<Self, AllocationError>
    where
        T: Clone,
    {
        let mut storage = RawBuffer::allocate(len)?;
        let mut run = PartialInit::new(storage.as_uninit_slice_mut());
        run.fill_with(|| value.clone());
        let len = run.commit();
        Ok(Self::from_raw_parts(storage, len))
    }

    /// Clone `values` into a block of exactly `values.len()`.
    ///
    /// A panicking clone drops the clones made so far; `values` is untouched.
    pub(crate) fn from_slice(values: &[T]) -> Self
    where
        T: Clone,
    {
        let mut storage = RawBuffer::allocate(values.len()).unwrap_or_else(|err| err.handle());
        let mut run = PartialInit::new(storage.as_uninit_slice_mut());
        for value in values {
            run.push(value.clone());
        }
        let len = run.commit();
        Self::from_raw_parts(storage, len)
    }

    /// Copy-assign from `source`, reusing the block when it is large enough.
    ///
    /// See [`Clone::clone_from`] on [`DynamicArray`] for the guarantees.
    pub(crate) fn assign_from_slice(&mut self, source: &[T])
    where
        T: Clone,
    {
        if self.capacity() < source.len() {
            let mut copy = Self::from_slice(source);
            self.swap_with(&mut copy);
            return;
        }

        let shared = self.len.min(source.len());
        self.as_mut_slice()[..shared].clone_from_slice(&source[..shared]);
        if self.len > source.len() {
            self.truncate(source.len());
            return;
        }

        let len = self.len;
        let mut extra = PartialInit::new(&mut self.storage.as_uninit_slice_mut()[len..source.len()]);
        for value in &source[len..] {
            extra.push(value.clone());
        }
        self.len += extra.commit();
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no live elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current block can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// The live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are live (module invariant) and the
        // pointer is non-null and aligned even for an empty buffer.
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.len) }
    }

    /// Pointer to the first slot of the current block.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Exchange contents with `other` without touching any element.
    pub fn swap_with(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Move the contents out, leaving an empty array (capacity 0) behind.
    pub fn take(&mut self) -> Self {
        let mut taken = Self::empty();
        self.swap_with(&mut taken);
        taken
    }

    /// Ensure the block can hold at least `new_capacity` elements.
    ///
    /// `new_capacity` is a total, not an increment. A request at or below
    /// the current capacity does nothing; otherwise the block is replaced by
    /// one of exactly `new_capacity`.
    pub fn reserve(&mut self, new_capacity: usize) {
        self.try_reserve(new_capacity)
            .unwrap_or_else(|err| err.handle());
    }

    /// Fallible form of [`DynamicArray::reserve`].
    ///
    /// On `Err`, or if a clone panics under [`CloneOnGrow`], the array is
    /// unchanged.
    ///
    /// [`CloneOnGrow`]: crate::CloneOnGrow
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), AllocationError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        let mut fresh = RawBuffer::allocate(new_capacity)?;
        {
            let mut moved = PartialInit::new(&mut fresh.as_uninit_slice_mut()[..self.len]);
            // SAFETY: the buffers are disjoint, and the originals are
            // released by `replace_storage` without being read again.
            unsafe { P::transfer(self.as_slice(), &mut moved) };
            moved.commit();
        }
        self.replace_storage(fresh, self.len);
        Ok(())
    }

    /// Set the length to `new_len`, dropping or default-constructing the
    /// difference.
    ///
    /// Shrinking never reallocates. Growing past capacity allocates exactly
    /// `new_len`.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.try_resize(new_len).unwrap_or_else(|err| err.handle());
    }

    /// Fallible form of [`DynamicArray::resize`].
    ///
    /// On `Err`, or if `T::default` panics, the array is unchanged.
    pub fn try_resize(&mut self, new_len: usize) -> Result<(), AllocationError>
    where
        T: Default,
    {
        let len = self.len;
        if new_len <= len {
            self.truncate(new_len);
            return Ok(());
        }

        if new_len > self.capacity() {
            let mut fresh = RawBuffer::allocate(new_len)?;
            {
                let (head, tail) = fresh.as_uninit_slice_mut().split_at_mut(len);
                let mut extra = PartialInit::new(tail);
                extra.fill_with(T::default);
                let mut moved = PartialInit::new(head);
                // SAFETY: disjoint buffers; originals are released below.
                unsafe { P::transfer(self.as_slice(), &mut moved) };
                moved.commit();
                extra.commit();
            }
            self.replace_storage(fresh, new_len);
        } else {
            let mut extra = PartialInit::new(&mut self.storage.as_uninit_slice_mut()[len..new_len]);
            extra.fill_with(T::default);
            extra.commit();
            self.len = new_len;
        }
        Ok(())
    }

    /// Drop every element from `new_len` on. No-op if `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(self.storage.offset(new_len), self.len - new_len);
        self.len = new_len;
        // SAFETY: `[new_len, old len)` were live and are no longer counted,
        // so a panicking destructor cannot cause a second drop.
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drop every element, keeping the block.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Append `value`.
    pub fn push(&mut self, value: T) {
        self.emplace_back(move || value);
    }

    /// Fallible form of [`DynamicArray::push`]. `value` is dropped on `Err`.
    pub fn try_push(&mut self, value: T) -> Result<(), AllocationError> {
        let end = self.len;
        self.try_emplace(end, move || value).map(|_| ())
    }

    /// Append the value produced by `make`, constructed in its final slot.
    pub fn emplace_back(&mut self, make: impl FnOnce() -> T) -> &mut T {
        let end = self.len;
        self.emplace(end, make)
    }

    /// Destroy the last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    #[track_caller]
    pub fn pop_back(&mut self) {
        assert!(self.len != 0, "pop on empty array");
        self.truncate(self.len - 1);
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and has just left the live range.
        Some(unsafe { self.storage[self.len].assume_init_read() })
    }

    /// Insert `value` at `index`, shifting the tail right.
    ///
    /// Returns the inserted element at its final position.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        self.emplace(index, move || value)
    }

    /// Insert the value produced by `make` at `index`.
    ///
    /// When the array is full, `make` runs after the new block is allocated
    /// and its result is written straight into its final slot there.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn emplace(&mut self, index: usize, make: impl FnOnce() -> T) -> &mut T {
        self.try_emplace(index, make)
            .unwrap_or_else(|err| err.handle())
    }

    /// Fallible form of [`DynamicArray::emplace`].
    ///
    /// On `Err` the array is unchanged and `make` has not been called.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn try_emplace(
        &mut self,
        index: usize,
        make: impl FnOnce() -> T,
    ) -> Result<&mut T, AllocationError> {
        let len = self.len;
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );

        if len == self.capacity() {
            let mut fresh = RawBuffer::allocate(growth::grown_capacity(len)?)?;
            {
                let (head, tail) = fresh.as_uninit_slice_mut().split_at_mut(index);
                let (before, after) = self.as_slice().split_at(index);
                let mut placed = PartialInit::new(tail);
                placed.push(make());
                // SAFETY: disjoint buffers; originals are released below.
                unsafe { P::transfer(after, &mut placed) };
                let mut moved = PartialInit::new(head);
                // SAFETY: as above.
                unsafe { P::transfer(before, &mut moved) };
                moved.commit();
                placed.commit();
            }
            self.replace_storage(fresh, len + 1);
        } else if index == len {
            let value = make();
            self.storage[len].write(value);
            self.len = len + 1;
        } else {
            let value = make();
            let base = self.storage.as_mut_ptr();
            // SAFETY: `len` live elements are followed by a free slot
            // (`len < capacity`) and `index < len`.
            unsafe { P::shift_insert(base, &mut self.len, index, value) };
        }
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Destroy the element at `index`, shifting the tail left.
    ///
    /// Returns the position now occupied by the erased element's successor,
    /// which equals `len` when the last element was erased.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn erase(&mut self, index: usize) -> usize {
        let len = self.len;
        assert!(
            index < len,
            "removal index (is {index}) should be < len (is {len})"
        );
        let base = self.storage.as_mut_ptr();
        // SAFETY: `len` live elements start at `base` and `index < len`.
        unsafe { P::shift_erase(base, &mut self.len, index) };
        index
    }

    /// Remove and return the element at `index`, shifting the tail left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(
            index < len,
            "removal index (is {index}) should be < len (is {len})"
        );
        let base = self.storage.as_mut_ptr();
        // SAFETY: `len` live elements start at `base` and `index < len`.
        unsafe { P::shift_remove(base, &mut self.len, index) }
    }

    /// Commit a fully populated `fresh` block holding `new_len` elements.
    ///
    /// The array owns the new block before the originals are released, so
    /// a panicking destructor in the release leaves it fully populated. The
    /// old block is freed when it goes out of scope here.
    fn replace_storage(&mut self, fresh: RawBuffer<T>, new_len: usize) {
        let mut old = mem::replace(&mut self.storage, fresh);
        let old_len = mem::replace(&mut self.len, new_len);
        tracing::debug!(
            from = old.capacity(),
            to = self.capacity(),
            len = new_len,
            mode = ?P::MODE,
            "array storage replaced"
        );
        // SAFETY: the originals were transferred into the new block and are
        // no longer counted as live; `old` only frees its block on drop.
        unsafe { P::release(old.as_mut_ptr(), old_len) };
    }

    /// Bytes held by the current block.
    pub fn memory_bytes(&self) -> usize {
        self.storage.memory_bytes()
    }

    /// Detach the block, leaving an empty buffer and a zero length.
    ///
    /// The live elements become the caller's responsibility.
    pub(crate) fn take_storage(&mut self) -> RawBuffer<T> {
        self.len = 0;
        self.storage.take()
    }
}

impl<T, P> Drop for DynamicArray<T, P> {
    fn drop(&mut self) {
        let live = ptr::slice_from_raw_parts_mut(self.storage.as_mut_ptr(), self.len);
        // SAFETY: exactly the first `len` slots are live; the block itself
        // is released afterwards by the buffer's own `Drop`.
        unsafe { ptr::drop_in_place(live) };
    }
}

impl<T, P> fmt::Debug for DynamicArray<T, P>
where
    T: fmt::Debug,
    P: TransferPolicy<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
