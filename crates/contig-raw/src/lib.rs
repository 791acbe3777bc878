//! Owning handles to uninitialised storage for contig arrays.
//!
//! This crate holds the lowest layer of `contig`: memory that has been
//! allocated but whose slots carry no live values. It is one of two crates
//! that contain `unsafe` code (along with `contig-array`).
//!
//! # Architecture
//!
//! ```text
//! RawBuffer<T>          owns one block sized for `capacity` values of T
//! ├── allocate()        Layout::array::<T>(capacity) → global allocator
//! ├── Index/offset      slot addressing, bounds asserted
//! └── Drop              releases the block; never drops a T
//!
//! PartialInit<'_, T>    borrows a run of slots while it is being filled
//! └── Drop              drops the values placed so far (rollback)
//! ```
//!
//! Element lifetime is entirely the caller's business: a [`RawBuffer`] is
//! freed without touching whatever was placed inside it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]

pub mod buffer;
pub mod error;
pub mod guard;

pub use buffer::RawBuffer;
pub use error::AllocationError;
pub use guard::PartialInit;
