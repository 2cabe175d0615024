//! Block decomposition of address values.
//!
//! This module contains the spanning and merging algorithms:
//! - [`span`] - Minimal prefix or sequential blocks covering a numeric range
//! - [`merge`] - Summarizing many values into a canonical block list

mod merge;
mod span;

// Re-export public functions
pub use merge::{merge_to_prefix_blocks, merge_to_sequential_blocks};
pub use span::{span_with_prefix_blocks, span_with_sequential_blocks};
