//! Benchmark workloads for the contig array.
//!
//! Provides deterministic inputs shared by the criterion benches:
//!
//! - [`strings`]: heap-owning elements, where move vs copy matters
//! - [`filled`]: a pre-built array under either transfer policy

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use contig::prelude::*;

/// `count` distinct short strings, each owning a heap block.
pub fn strings(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("element-{i:06}")).collect()
}

/// An array holding clones of `values`, at exactly `values.len()` capacity.
pub fn filled<P: TransferPolicy<String>>(values: &[String], policy: P) -> DynamicArray<String, P> {
    let mut array = DynamicArray::with_capacity_in(values.len(), policy);
    array.extend(values.iter().cloned());
    array
}
