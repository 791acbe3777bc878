//! Instrumented element types for contig development.
//!
//! Containers are only as trustworthy as their bookkeeping of element
//! lifetimes, so tests store values that count themselves:
//!
//! - [`Ledger`] / [`Tracked`]: live, drop and clone counts, with an optional
//!   fuse that makes a chosen clone panic.
//! - [`DefaultBomb`]: a `Default` type that panics on a chosen construction.
//! - [`MoveOnly`]: a tracked value that cannot be cloned.
//!
//! [`init_tracing`] routes `tracing` output through the test harness.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{DefaultBomb, Ledger, MoveOnly, Tracked};

use tracing_subscriber::filter::LevelFilter;

/// Install a trace-level subscriber that writes through libtest's capture.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
}
