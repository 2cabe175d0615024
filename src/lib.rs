//! Address range algebra for IPv4, IPv6 and MAC values.
//!
//! - [`models`] - address values, families and their iterators
//! - [`range`] - sequential `[lower, upper]` ranges and set operations
//! - [`processing`] - spanning ranges with blocks and merging value lists
//! - [`partition`] - one-shot enumeration over a value split into blocks
//!
//! ```
//! use address_span::{merge_to_prefix_blocks, Ipv4Address, SequentialRange};
//!
//! let lower: Ipv4Address = "0.0.0.10".parse().unwrap();
//! let upper: Ipv4Address = "0.0.0.21".parse().unwrap();
//! let range = SequentialRange::new(&lower, &upper);
//! assert_eq!(range.span_with_prefix_blocks().len(), 4);
//!
//! let merged = merge_to_prefix_blocks(&range.span_with_prefix_blocks());
//! assert_eq!(merged.len(), 4);
//! ```

pub mod error;
pub mod models;
pub mod partition;
pub mod processing;
pub mod range;

pub use error::AddressError;
pub use models::{
    Address, AddressFamily, AddressValue, IpAddress, Ipv4Address, Ipv6Address, MacAddress,
};
pub use partition::{apply_for_each, apply_for_each_conditionally, Partition, PartitionIterator};
pub use processing::{merge_to_prefix_blocks, merge_to_sequential_blocks};
pub use range::SequentialRange;
