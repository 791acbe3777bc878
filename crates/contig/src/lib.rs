//! contig: a growable contiguous array built directly on raw memory.
//!
//! This is the facade crate that re-exports the public API of the contig
//! sub-crates. For most users, adding `contig` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use contig::prelude::*;
//!
//! let mut names: DynamicArray<String> = DynamicArray::with_capacity(2);
//! names.push("ada".to_owned());
//! names.push("grace".to_owned());
//! names.insert(1, "edsger".to_owned());
//! assert_eq!(names, ["ada", "edsger", "grace"]);
//!
//! // Growth from a full block of 2 doubles it.
//! assert_eq!(names.capacity(), 4);
//!
//! // Copy-on-grow: a panicking clone during growth leaves the array intact.
//! let mut copies = DynamicArray::new_in(CloneOnGrow);
//! copies.extend(names.iter().cloned());
//! copies.reserve(16);
//! assert_eq!(copies, names);
//!
//! // Fallible allocation.
//! let err = names.try_reserve(usize::MAX).unwrap_err();
//! assert!(matches!(err, AllocationError::CapacityOverflow { .. }));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`raw`] | `contig-raw` | `RawBuffer`, `PartialInit`, `AllocationError` |
//! | [`array`] | `contig-array` | `DynamicArray`, transfer policies, growth schedule |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Uninitialised storage and construction guards (`contig-raw`).
///
/// Most users never touch this layer directly; it is exposed for building
/// other containers on the same primitives.
pub use contig_raw as raw;

/// The growable array and its transfer policies (`contig-array`).
pub use contig_array as array;

/// Common imports for typical contig usage.
///
/// ```rust
/// use contig::prelude::*;
/// ```
pub mod prelude {
    pub use contig_array::{
        AllocationError, CloneOnGrow, DynamicArray, Relocate, TransferMode, TransferPolicy,
    };
}
