//! Rollback accounting for partially initialised runs of slots.
//!
//! [`PartialInit`] borrows a run of uninitialised slots and fills it front to
//! back, counting each value it places. If it is dropped before
//! [`PartialInit::commit`] (an element constructor panicked, a clone failed,
//! the caller returned early) it drops exactly the values it placed and no
//! others. Bulk construction paths in `contig-array` are all written in terms
//! of this guard.

use std::mem::{self, MaybeUninit};
use std::ptr;

/// Scoped owner of the initialised prefix of a slot run.
///
/// The guard owns `slots[..initialized]` until it is committed, at which
/// point ownership of those values passes to the caller.
#[must_use = "dropping the guard without committing destroys what it built"]
pub struct PartialInit<'a, T> {
    slots: &'a mut [MaybeUninit<T>],
    initialized: usize,
}

impl<'a, T> PartialInit<'a, T> {
    /// Start filling `slots` from the front.
    ///
    /// The slots are treated as uninitialised; any values already in them
    /// are neither read nor dropped.
    pub fn new(slots: &'a mut [MaybeUninit<T>]) -> Self {
        Self {
            slots,
            initialized: 0,
        }
    }

    /// Number of values placed so far.
    #[inline]
    pub fn initialized(&self) -> usize {
        self.initialized
    }

    /// Number of slots still free.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.slots.len() - self.initialized
    }

    /// Place `value` in the next free slot.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already initialised.
    #[inline]
    #[track_caller]
    pub fn push(&mut self, value: T) {
        assert!(self.remaining() > 0, "partial-init run is full");
        self.slots[self.initialized].write(value);
        self.initialized += 1;
    }

    /// Fill every remaining slot with values produced by `f`.
    ///
    /// A panic inside `f` unwinds through the guard, which then drops the
    /// values placed so far.
    pub fn fill_with(&mut self, mut f: impl FnMut() -> T) {
        while self.remaining() > 0 {
            self.push(f());
        }
    }

    /// Bitwise-move `count` values from `src` into the next free slots.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `count` slots remain.
    ///
    /// # Safety
    ///
    /// `src` must be valid for reads of `count` initialised values and must
    /// not overlap the guard's slots. The caller must treat those source
    /// values as moved-out afterwards: they must not be read as live values
    /// or dropped again.
    #[track_caller]
    pub unsafe fn relocate_from(&mut self, src: *const T, count: usize) {
        assert!(count <= self.remaining(), "partial-init run is full");
        let dst = self.slots[self.initialized..].as_mut_ptr().cast::<T>();
        // SAFETY: `dst` has room for `count` values (checked above), `src`
        // is readable for `count` values and disjoint from `dst` (caller
        // contract).
        unsafe { ptr::copy_nonoverlapping(src, dst, count) };
        self.initialized += count;
    }

    /// Disarm the guard and hand the initialised prefix to the caller.
    ///
    /// Returns the number of values placed.
    #[inline]
    pub fn commit(self) -> usize {
        let initialized = self.initialized;
        mem::forget(self);
        initialized
    }
}

impl<T> Drop for PartialInit<'_, T> {
    fn drop(&mut self) {
        let placed = ptr::slice_from_raw_parts_mut(
            self.slots.as_mut_ptr().cast::<T>(),
            self.initialized,
        );
        // SAFETY: exactly the first `initialized` slots were written by
        // `push` or `relocate_from`, and the guard was never committed, so
        // it still owns them.
        unsafe { ptr::drop_in_place(placed) };
    }
}
