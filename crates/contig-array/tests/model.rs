//! Property tests: `DynamicArray` against `Vec` as a reference model.
//!
//! Random operation sequences are applied to both containers under each
//! transfer policy. After every step the contents must agree, and the
//! array's capacity must follow its own growth rules.

use contig_array::{growth, CloneOnGrow, DynamicArray, Relocate, TransferPolicy};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Push(u32),
    Insert(usize, u32),
    Erase(usize),
    Pop,
    Resize(usize),
    Reserve(usize),
    Truncate(usize),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u32>().prop_map(Op::Push),
        2 => (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::Insert(i, v)),
        2 => any::<usize>().prop_map(Op::Erase),
        1 => Just(Op::Pop),
        1 => (0usize..40).prop_map(Op::Resize),
        1 => (0usize..40).prop_map(Op::Reserve),
        1 => (0usize..40).prop_map(Op::Truncate),
        1 => Just(Op::Clear),
    ]
}

fn check_against_model<P: TransferPolicy<u32>>(mut array: DynamicArray<u32, P>, ops: &[Op]) -> Result<(), TestCaseError> {
    let mut model: Vec<u32> = Vec::new();
    for op in ops {
        let len = model.len();
        let capacity = array.capacity();
        match *op {
            Op::Push(v) => {
                array.push(v);
                model.push(v);
                if len == capacity {
                    prop_assert_eq!(array.capacity(), growth::grown_capacity(len).unwrap());
                } else {
                    prop_assert_eq!(array.capacity(), capacity);
                }
            }
            Op::Insert(i, v) => {
                let index = i % (len + 1);
                prop_assert_eq!(*array.insert(index, v), v);
                model.insert(index, v);
            }
            Op::Erase(i) => {
                if len == 0 {
                    continue;
                }
                let index = i % len;
                prop_assert_eq!(array.erase(index), index);
                model.remove(index);
            }
            Op::Pop => {
                prop_assert_eq!(array.pop(), model.pop());
            }
            Op::Resize(n) => {
                array.resize(n);
                model.resize(n, 0);
                if n > capacity {
                    prop_assert_eq!(array.capacity(), n);
                } else {
                    prop_assert_eq!(array.capacity(), capacity);
                }
            }
            Op::Reserve(n) => {
                array.reserve(n);
                prop_assert_eq!(array.capacity(), n.max(capacity));
            }
            Op::Truncate(n) => {
                array.truncate(n);
                model.truncate(n);
                prop_assert_eq!(array.capacity(), capacity);
            }
            Op::Clear => {
                array.clear();
                model.clear();
                prop_assert_eq!(array.capacity(), capacity);
            }
        }
        prop_assert_eq!(array.as_slice(), model.as_slice());
        prop_assert!(array.len() <= array.capacity());
        prop_assert!(array.capacity() >= capacity, "capacity never shrinks");
    }
    Ok(())
}

proptest! {
    #[test]
    fn relocate_matches_vec(ops in prop::collection::vec(arb_op(), 0..120)) {
        check_against_model(DynamicArray::new_in(Relocate), &ops)?;
    }

    #[test]
    fn clone_on_grow_matches_vec(ops in prop::collection::vec(arb_op(), 0..120)) {
        check_against_model(DynamicArray::new_in(CloneOnGrow), &ops)?;
    }

    #[test]
    fn insert_then_erase_restores_contents(
        values in prop::collection::vec(any::<u32>(), 0..32),
        index in any::<usize>(),
        inserted in any::<u32>(),
    ) {
        let mut array: DynamicArray<u32> = values.iter().copied().collect();
        let index = index % (values.len() + 1);
        array.insert(index, inserted);
        prop_assert_eq!(array[index], inserted);
        array.erase(index);
        prop_assert_eq!(array.as_slice(), values.as_slice());
    }

    #[test]
    fn clone_is_independent_and_exact(values in prop::collection::vec(any::<u32>(), 0..32)) {
        let mut original: DynamicArray<u32> = values.iter().copied().collect();
        original.reserve(values.len() * 2);
        let copy = original.clone();
        prop_assert_eq!(copy.capacity(), values.len());
        original.push(1);
        original.as_mut_slice().fill(0);
        prop_assert_eq!(copy.as_slice(), values.as_slice());
    }

    #[test]
    fn clone_from_agrees_with_clone(
        target in prop::collection::vec(any::<u32>(), 0..16),
        source in prop::collection::vec(any::<u32>(), 0..16),
        spare in 0usize..16,
    ) {
        let mut array: DynamicArray<u32> = target.iter().copied().collect();
        array.reserve(target.len() + spare);
        let capacity = array.capacity();
        let source: DynamicArray<u32> = source.iter().copied().collect();
        array.clone_from(&source);
        prop_assert_eq!(&array, &source);
        if source.len() <= capacity {
            prop_assert_eq!(array.capacity(), capacity);
        }
    }

    #[test]
    fn into_iter_yields_every_element(values in prop::collection::vec(any::<u32>(), 0..64)) {
        let array: DynamicArray<u32> = values.iter().copied().collect();
        let collected: Vec<u32> = array.into_iter().collect();
        prop_assert_eq!(collected, values);
    }
}
