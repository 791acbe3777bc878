//! Geometric growth schedule for insert-driven reallocation.

use contig_raw::AllocationError;

/// Factor applied to the live length when an insert finds the array full.
pub const GROWTH_FACTOR: usize = 2;

/// Capacity of the first block allocated for an empty array.
pub const MIN_GROWTH_CAPACITY: usize = 1;

/// Capacity to allocate when an insert finds `len == capacity`.
///
/// Returns `max(MIN_GROWTH_CAPACITY, GROWTH_FACTOR * len)`, which keeps
/// repeated pushes amortised O(1).
///
/// # Errors
///
/// [`AllocationError::CapacityOverflow`] if the doubled length overflows
/// `usize`.
pub fn grown_capacity(len: usize) -> Result<usize, AllocationError> {
    len.checked_mul(GROWTH_FACTOR)
        .map(|doubled| doubled.max(MIN_GROWTH_CAPACITY))
        .ok_or(AllocationError::CapacityOverflow { requested: len })
}
