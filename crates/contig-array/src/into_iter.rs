//! By-value iteration over a [`DynamicArray`].

use std::fmt;
use std::iter::FusedIterator;
use std::mem::ManuallyDrop;
use std::ptr;
use std::slice;

use contig_raw::RawBuffer;

use crate::array::DynamicArray;
use crate::policy::TransferPolicy;

/// An iterator that moves elements out of a [`DynamicArray`].
///
/// Owns the array's block. Slots `[start, end)` are still live; elements
/// not yielded by the time the iterator is dropped are dropped with it.
pub struct IntoIter<T> {
    storage: RawBuffer<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[start, end)` are live and `start <= end <= capacity`.
        unsafe { slice::from_raw_parts(self.storage.offset(self.start), self.end - self.start) }
    }
}

impl<T, P: TransferPolicy<T>> IntoIterator for DynamicArray<T, P> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let mut array = ManuallyDrop::new(self);
        let end = array.len();
        IntoIter {
            storage: array.take_storage(),
            start: 0,
            end,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: slot `start` is live and leaves the live range below.
        let value = unsafe { self.storage[self.start].assume_init_read() };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: slot `end` was live and has just left the live range.
        Some(unsafe { self.storage[self.end].assume_init_read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let rest = ptr::slice_from_raw_parts_mut(self.storage.offset(self.start), self.end - self.start);
        // SAFETY: `[start, end)` are the only live slots left.
        unsafe { ptr::drop_in_place(rest) };
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::DynamicArray;

    struct Noisy(Rc<Cell<usize>>);

    impl Drop for Noisy {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn yields_in_order_from_both_ends() {
        let array = DynamicArray::<i32>::from([1, 2, 3, 4]);
        let mut iter = array.into_iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.as_slice(), [2, 3]);
        assert_eq!(iter.collect::<Vec<_>>(), [2, 3]);
    }

    #[test]
    fn drops_unyielded_elements() {
        let drops = Rc::new(Cell::new(0));
        let mut array = DynamicArray::new();
        for _ in 0..5 {
            array.push(Noisy(drops.clone()));
        }
        let mut iter = array.into_iter();
        drop(iter.next());
        assert_eq!(drops.get(), 1);
        drop(iter);
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn empty_array_yields_nothing() {
        let array = DynamicArray::<String>::new();
        assert_eq!(array.into_iter().next(), None);
    }
}
