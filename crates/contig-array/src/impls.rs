//! Standard trait implementations for [`DynamicArray`].

use std::ops::{Deref, DerefMut};

use crate::array::DynamicArray;
use crate::growth;
use crate::policy::TransferPolicy;

impl<T, P: TransferPolicy<T>> Default for DynamicArray<T, P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Clone, P: TransferPolicy<T>> Clone for DynamicArray<T, P> {
    /// Copy construction: a block of exactly `self.len()` holding clones.
    ///
    /// If a clone panics, the clones made so far are dropped, the new block
    /// is freed, and `self` is untouched.
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice())
    }

    /// Copy assignment.
    ///
    /// When the current block can hold `source`, it is reused: the shared
    /// prefix is clone-assigned, then the surplus tail is dropped or the
    /// missing suffix is clone-constructed. Otherwise a full copy is built
    /// and swapped in, leaving `self` untouched if a clone panics.
    ///
    /// The reuse path is not all-or-nothing: a clone panicking part-way
    /// leaves the prefix already overwritten. Every element is still live
    /// and nothing leaks.
    fn clone_from(&mut self, source: &Self) {
        self.assign_from_slice(source.as_slice());
    }
}

impl<T, P: TransferPolicy<T>> Deref for DynamicArray<T, P> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, P: TransferPolicy<T>> DerefMut for DynamicArray<T, P> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, P: TransferPolicy<T>> AsRef<[T]> for DynamicArray<T, P> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, P: TransferPolicy<T>> AsMut<[T]> for DynamicArray<T, P> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, U, P, Q> PartialEq<DynamicArray<U, Q>> for DynamicArray<T, P>
where
    T: PartialEq<U>,
    P: TransferPolicy<T>,
    Q: TransferPolicy<U>,
{
    fn eq(&self, other: &DynamicArray<U, Q>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, P: TransferPolicy<T>> Eq for DynamicArray<T, P> {}

impl<T, U, P, const N: usize> PartialEq<[U; N]> for DynamicArray<T, P>
where
    T: PartialEq<U>,
    P: TransferPolicy<T>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, P> PartialEq<[U]> for DynamicArray<T, P>
where
    T: PartialEq<U>,
    P: TransferPolicy<T>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, P> PartialEq<Vec<U>> for DynamicArray<T, P>
where
    T: PartialEq<U>,
    P: TransferPolicy<T>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, P: TransferPolicy<T>, const N: usize> From<[T; N]> for DynamicArray<T, P> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T: Clone, P: TransferPolicy<T>> From<&[T]> for DynamicArray<T, P> {
    fn from(values: &[T]) -> Self {
        Self::from_slice(values)
    }
}

impl<T, P: TransferPolicy<T>> FromIterator<T> for DynamicArray<T, P> {
    /// Allocates exactly the iterator's reported lower bound up front, so an
    /// exact-size source is built without reallocation.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut array = Self::default();
        array.reserve(iter.size_hint().0);
        array.extend(iter);
        array
    }
}

impl<T, P: TransferPolicy<T>> Extend<T> for DynamicArray<T, P> {
    /// Grows at most once up front when the iterator's lower bound does not
    /// fit, to at least the capacity `push` would grow to, so repeated small
    /// extends stay amortised like `push`.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let needed = self.len().saturating_add(lower);
        if needed > self.capacity() {
            let grown = growth::grown_capacity(self.len()).unwrap_or_else(|err| err.handle());
            self.reserve(needed.max(grown));
        }
        for value in iter {
            self.push(value);
        }
    }
}

impl<'a, T, P: TransferPolicy<T>> IntoIterator for &'a DynamicArray<T, P> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, P: TransferPolicy<T>> IntoIterator for &'a mut DynamicArray<T, P> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use std::iter;

    use crate::DynamicArray;

    fn reallocations(mut step: impl FnMut(&mut DynamicArray<u32>, u32)) -> usize {
        let mut array = DynamicArray::new();
        let mut capacity = array.capacity();
        let mut changes = 0;
        for v in 0..1000 {
            step(&mut array, v);
            if array.capacity() != capacity {
                capacity = array.capacity();
                changes += 1;
            }
        }
        changes
    }

    #[test]
    fn repeated_single_extends_grow_like_push() {
        let pushed = reallocations(|array, v| array.push(v));
        let extended = reallocations(|array, v| array.extend(iter::once(v)));
        assert_eq!(pushed, 11);
        assert_eq!(extended, pushed);
    }

    #[test]
    fn extend_reserves_lower_bound_when_it_exceeds_doubling() {
        let mut array = DynamicArray::<u32>::from([1, 2]);
        array.extend(0..10);
        assert_eq!(array.len(), 12);
        assert_eq!(array.capacity(), 12);
    }

    #[test]
    fn collect_allocates_exactly() {
        let array: DynamicArray<u32> = (0..5).collect();
        assert_eq!(array.capacity(), 5);
        let empty: DynamicArray<u32> = iter::empty().collect();
        assert_eq!(empty.capacity(), 0);
    }
}
