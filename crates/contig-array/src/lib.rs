//! A growable, contiguous array with explicit element-lifetime control.
//!
//! [`DynamicArray`] sits on top of a [`contig_raw::RawBuffer`] and keeps
//! the first `len` slots live. Every operation that constructs or transfers
//! more than one element is all-or-nothing with respect to panics raised by
//! element constructors and clones: either it completes, or the array is
//! left exactly as it was and nothing leaks.
//!
//! # Transfer policies
//!
//! How live elements are carried across a reallocation is chosen per array
//! type through the `P` parameter:
//!
//! | Policy | Mode | Growth cost | Panic exposure |
//! |--------|------|-------------|----------------|
//! | [`Relocate`] (default) | move | `memcpy` | none |
//! | [`CloneOnGrow`] | copy | one `clone` per element | a panicking clone rolls back |
//!
//! # Growth
//!
//! An insert into a full array allocates `max(1, 2 * len)` slots (see
//! [`growth`]). [`DynamicArray::reserve`] and [`DynamicArray::resize`]
//! allocate exactly what they are asked for.
//!
//! ```
//! use contig_array::DynamicArray;
//!
//! let mut array = DynamicArray::new();
//! array.push(1);
//! array.push(2);
//! array.insert(1, 9);
//! assert_eq!(array, [1, 9, 2]);
//! assert_eq!(array.capacity(), 4);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]

mod array;
pub mod growth;
mod impls;
pub mod into_iter;
pub mod policy;

pub use array::DynamicArray;
pub use contig_raw::AllocationError;
pub use into_iter::IntoIter;
pub use policy::{CloneOnGrow, Relocate, TransferMode, TransferPolicy};
