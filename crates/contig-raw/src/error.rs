//! Allocation error types.

use std::alloc::{handle_alloc_error, Layout};
use std::error::Error;
use std::fmt;

/// Errors raised when a buffer cannot be obtained for a capacity request.
///
/// Every fallible growth path returns this type and leaves the container it
/// was called on untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocationError {
    /// The requested capacity does not fit in `isize::MAX` bytes.
    CapacityOverflow {
        /// Number of elements requested.
        requested: usize,
    },
    /// The global allocator returned null for a valid layout.
    Exhausted {
        /// Number of elements requested.
        requested: usize,
        /// The layout that could not be satisfied.
        layout: Layout,
    },
}

impl AllocationError {
    /// Number of elements the failed request asked for.
    pub fn requested(&self) -> usize {
        match self {
            Self::CapacityOverflow { requested } | Self::Exhausted { requested, .. } => *requested,
        }
    }

    /// Diverge on this error the way the infallible API does.
    ///
    /// Overflow panics with `"capacity overflow"`; exhaustion is routed to
    /// [`handle_alloc_error`], which aborts by default.
    #[cold]
    #[track_caller]
    pub fn handle(self) -> ! {
        match self {
            Self::CapacityOverflow { .. } => panic!("capacity overflow"),
            Self::Exhausted { layout, .. } => handle_alloc_error(layout),
        }
    }
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} elements exceed isize::MAX bytes")
            }
            Self::Exhausted { requested, layout } => {
                write!(
                    f,
                    "allocator exhausted: {requested} elements ({} bytes, align {})",
                    layout.size(),
                    layout.align()
                )
            }
        }
    }
}

impl Error for AllocationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_display_names_request() {
        let err = AllocationError::CapacityOverflow { requested: 42 };
        assert_eq!(
            err.to_string(),
            "capacity overflow: 42 elements exceed isize::MAX bytes"
        );
        assert_eq!(err.requested(), 42);
    }

    #[test]
    fn exhausted_display_reports_layout() {
        let layout = Layout::from_size_align(64, 8).unwrap();
        let err = AllocationError::Exhausted {
            requested: 8,
            layout,
        };
        assert_eq!(
            err.to_string(),
            "allocator exhausted: 8 elements (64 bytes, align 8)"
        );
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn handle_overflow_panics() {
        AllocationError::CapacityOverflow { requested: usize::MAX }.handle();
    }
}
