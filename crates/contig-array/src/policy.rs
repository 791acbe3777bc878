//! Move-vs-copy capability of an element type during bulk transfers.
//!
//! Every operation that moves live elements between slots (growth into a new
//! buffer, shifting for a mid-array insert or erase) goes through a
//! [`TransferPolicy`]. The policy is a type parameter of
//! [`DynamicArray`](crate::DynamicArray), so the choice between moving and
//! copying is fixed per element type at compile time and never depends on
//! the data being transferred.
//!
//! # The tie-break rule
//!
//! Move whenever the move cannot fail or the type cannot be copied at all;
//! otherwise copy, because a copy that fails halfway leaves the source intact
//! while a half-finished move cannot be undone.
//!
//! Moves in Rust are bitwise and cannot fail, so [`Relocate`] is correct for
//! every `T`, including types without `Clone`. [`CloneOnGrow`] is the copy
//! side of the rule: the originals stay live and untouched until every clone
//! has succeeded, and a panicking clone is unwound without disturbing them.
//!
//! The trait is sealed; these two policies are the complete set.

use std::ptr;

use contig_raw::PartialInit;

mod sealed {
    pub trait Sealed {}
}

/// How a policy carries elements across a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferMode {
    /// Bitwise relocation; the source slots become moved-from.
    Move,
    /// Clone construction and clone assignment; the source stays live.
    Copy,
}

/// Strategy used to carry live elements across a transfer.
///
/// All methods are `unsafe`: they operate on raw slot runs whose liveness
/// is tracked by the caller.
pub trait TransferPolicy<T>: sealed::Sealed {
    /// The transfer mode, resolved once per element type.
    const MODE: TransferMode;

    /// Append every element of `src` to the run being built by `dst`.
    ///
    /// May panic only in [`TransferMode::Copy`]; values already placed in
    /// `dst` are then dropped by the guard and `src` is left untouched.
    ///
    /// # Safety
    ///
    /// `src` must not alias `dst`'s slots. In [`TransferMode::Move`] the
    /// caller must treat every element of `src` as moved-out once this
    /// returns: it must not be dropped or read again.
    unsafe fn transfer(src: &[T], dst: &mut PartialInit<'_, T>);

    /// Dispose of the originals after a successful [`transfer`](Self::transfer).
    ///
    /// # Safety
    ///
    /// `src` must point to `len` elements that were just passed to
    /// `transfer` and that the caller no longer counts as live.
    unsafe fn release(src: *mut T, len: usize);

    /// Insert `value` at `index`, shifting `[index, *len)` one slot right.
    ///
    /// On return `*len` has grown by one. If a clone panics part-way, every
    /// slot below `*len` still holds a live value.
    ///
    /// # Safety
    ///
    /// `base` must point to `*len` live elements followed by at least one
    /// uninitialised slot, and `index < *len`.
    unsafe fn shift_insert(base: *mut T, len: &mut usize, index: usize, value: T);

    /// Erase the element at `index`, shifting `[index + 1, *len)` one slot
    /// left and destroying the vacated last slot.
    ///
    /// # Safety
    ///
    /// `base` must point to `*len` live elements and `index < *len`.
    unsafe fn shift_erase(base: *mut T, len: &mut usize, index: usize);

    /// Like [`shift_erase`](Self::shift_erase), but hands the erased
    /// element back instead of destroying it.
    ///
    /// If a clone panics, no slot has been modified yet.
    ///
    /// # Safety
    ///
    /// As for [`shift_erase`](Self::shift_erase).
    unsafe fn shift_remove(base: *mut T, len: &mut usize, index: usize) -> T;
}

/// Move elements by bitwise relocation. Available for every `T`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Relocate;

impl sealed::Sealed for Relocate {}

impl<T> TransferPolicy<T> for Relocate {
    const MODE: TransferMode = TransferMode::Move;

    #[inline]
    unsafe fn transfer(src: &[T], dst: &mut PartialInit<'_, T>) {
        // SAFETY: `src` is readable for `src.len()` elements and disjoint
        // from `dst`; the caller treats it as moved-out from here on.
        unsafe { dst.relocate_from(src.as_ptr(), src.len()) };
    }

    #[inline]
    unsafe fn release(_src: *mut T, _len: usize) {}

    #[inline]
    unsafe fn shift_insert(base: *mut T, len: &mut usize, index: usize, value: T) {
        let n = *len;
        // SAFETY: `index < n` and slot `n` is writable, so the shifted run
        // `[index + 1, n + 1)` stays inside the block. After the copy slot
        // `index` is a stale duplicate and is overwritten without a drop.
        unsafe {
            let hole = base.add(index);
            ptr::copy(hole, hole.add(1), n - index);
            ptr::write(hole, value);
        }
        *len = n + 1;
    }

    #[inline]
    unsafe fn shift_erase(base: *mut T, len: &mut usize, index: usize) {
        // SAFETY: forwarded caller contract.
        drop(unsafe { Self::shift_remove(base, len, index) });
    }

    #[inline]
    unsafe fn shift_remove(base: *mut T, len: &mut usize, index: usize) -> T {
        let n = *len;
        // SAFETY: `index < n`; the value is read out before its slot is
        // overwritten by the left shift of `[index + 1, n)`.
        let removed = unsafe {
            let hole = base.add(index);
            let removed = ptr::read(hole);
            ptr::copy(hole.add(1), hole, n - index - 1);
            removed
        };
        *len = n - 1;
        removed
    }
}

/// Copy elements with `Clone` during transfers and shifts.
///
/// Growth never disturbs the originals until the new buffer is complete, so
/// a panicking `clone` leaves the array exactly as it was.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CloneOnGrow;

impl sealed::Sealed for CloneOnGrow {}

impl<T: Clone> TransferPolicy<T> for CloneOnGrow {
    const MODE: TransferMode = TransferMode::Copy;

    unsafe fn transfer(src: &[T], dst: &mut PartialInit<'_, T>) {
        for value in src {
            dst.push(value.clone());
        }
    }

    unsafe fn release(src: *mut T, len: usize) {
        // SAFETY: the caller hands over `len` live originals it no longer
        // counts as live.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(src, len)) };
    }

    unsafe fn shift_insert(base: *mut T, len: &mut usize, index: usize, value: T) {
        let n = *len;
        // SAFETY: slot `n - 1` is live (`index < n`) and slot `n` is free.
        unsafe {
            let last = base.add(n - 1);
            ptr::write(last.add(1), (*last).clone());
        }
        *len = n + 1;
        for slot in (index + 1..n).rev() {
            // SAFETY: both slots are live and distinct.
            unsafe { (*base.add(slot)).clone_from(&*base.add(slot - 1)) };
        }
        // SAFETY: slot `index` is live; assignment drops its old value.
        unsafe { *base.add(index) = value };
    }

    unsafe fn shift_erase(base: *mut T, len: &mut usize, index: usize) {
        let n = *len;
        for slot in index..n - 1 {
            // SAFETY: both slots are live and distinct.
            unsafe { (*base.add(slot)).clone_from(&*base.add(slot + 1)) };
        }
        *len = n - 1;
        // SAFETY: slot `n - 1` is live and no longer counted by `*len`.
        unsafe { ptr::drop_in_place(base.add(n - 1)) };
    }

    unsafe fn shift_remove(base: *mut T, len: &mut usize, index: usize) -> T {
        // SAFETY: `index < *len`, so the slot is live.
        let removed = unsafe { (*base.add(index)).clone() };
        // SAFETY: forwarded caller contract.
        unsafe { Self::shift_erase(base, len, index) };
        removed
    }
}

#[cfg(test)]
mod tests {
    use contig_raw::RawBuffer;

    use super::*;

    fn filled(values: &[&str]) -> (RawBuffer<String>, usize) {
        let mut buf = RawBuffer::allocate(values.len() + 1).unwrap();
        let mut run = PartialInit::new(buf.as_uninit_slice_mut());
        for v in values {
            run.push((*v).to_owned());
        }
        let len = run.commit();
        (buf, len)
    }

    fn drain(buf: &mut RawBuffer<String>, len: usize) -> Vec<String> {
        (0..len)
            // SAFETY: the first `len` slots are live and read exactly once.
            .map(|i| unsafe { buf[i].assume_init_read() })
            .collect()
    }

    #[test]
    fn modes_are_fixed_per_policy() {
        assert_eq!(<Relocate as TransferPolicy<String>>::MODE, TransferMode::Move);
        assert_eq!(<CloneOnGrow as TransferPolicy<String>>::MODE, TransferMode::Copy);
    }

    #[test]
    fn relocate_shift_insert_opens_hole() {
        let (mut buf, mut len) = filled(&["a", "b", "c"]);
        // SAFETY: three live values plus one free slot; index 1 < 3.
        unsafe { Relocate::shift_insert(buf.as_mut_ptr(), &mut len, 1, "x".to_owned()) };
        assert_eq!(len, 4);
        assert_eq!(drain(&mut buf, len), ["a", "x", "b", "c"]);
    }

    #[test]
    fn clone_shift_insert_matches_relocate() {
        let (mut buf, mut len) = filled(&["a", "b", "c"]);
        // SAFETY: three live values plus one free slot; index 0 < 3.
        unsafe { CloneOnGrow::shift_insert(buf.as_mut_ptr(), &mut len, 0, "x".to_owned()) };
        assert_eq!(len, 4);
        assert_eq!(drain(&mut buf, len), ["x", "a", "b", "c"]);
    }

    #[test]
    fn shift_erase_closes_gap_for_both_modes() {
        let (mut buf, mut len) = filled(&["a", "b", "c"]);
        // SAFETY: three live values; index 0 < 3.
        unsafe { Relocate::shift_erase(buf.as_mut_ptr(), &mut len, 0) };
        assert_eq!(drain(&mut buf, len), ["b", "c"]);

        let (mut buf, mut len) = filled(&["a", "b", "c"]);
        // SAFETY: three live values; index 1 < 3.
        unsafe { CloneOnGrow::shift_erase(buf.as_mut_ptr(), &mut len, 1) };
        assert_eq!(drain(&mut buf, len), ["a", "c"]);
    }

    #[test]
    fn shift_remove_returns_value_for_both_modes() {
        let (mut buf, mut len) = filled(&["a", "b", "c"]);
        // SAFETY: three live values; index 1 < 3.
        let removed = unsafe { Relocate::shift_remove(buf.as_mut_ptr(), &mut len, 1) };
        assert_eq!(removed, "b");
        assert_eq!(drain(&mut buf, len), ["a", "c"]);

        let (mut buf, mut len) = filled(&["a", "b", "c"]);
        // SAFETY: three live values; index 0 < 3.
        let removed = unsafe { CloneOnGrow::shift_remove(buf.as_mut_ptr(), &mut len, 0) };
        assert_eq!(removed, "a");
        assert_eq!(drain(&mut buf, len), ["b", "c"]);
    }

    #[test]
    fn clone_transfer_leaves_source_live() {
        let (mut src, len) = filled(&["p", "q"]);
        let mut dst = RawBuffer::<String>::allocate(2).unwrap();
        let mut run = PartialInit::new(dst.as_uninit_slice_mut());
        {
            // SAFETY: `src` holds `len` live values and is disjoint from `dst`.
            let live = unsafe { std::slice::from_raw_parts(src.as_ptr(), len) };
            // SAFETY: disjoint buffers; copy mode keeps the source live.
            unsafe { CloneOnGrow::transfer(live, &mut run) };
        }
        assert_eq!(run.commit(), 2);
        assert_eq!(drain(&mut dst, 2), ["p", "q"]);
        assert_eq!(drain(&mut src, len), ["p", "q"]);
    }
}
