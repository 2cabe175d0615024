//! Errors raised while building address values.
//!
//! Range and partition algebra never fails; mismatched families come back as
//! `None` or the empty range instead.

use thiserror::Error;

/// Failure to construct or parse an address value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A segment was not a number, a `lo-hi` range, or `*`.
    #[error("invalid segment '{0}'")]
    InvalidSegment(String),
    /// Wrong number of segments for the family.
    #[error("{family} expects {expected} segments, found {found}")]
    SegmentCount {
        family: &'static str,
        expected: usize,
        found: usize,
    },
    /// The text after '/' was not a number.
    #[error("invalid prefix length '{0}'")]
    InvalidPrefix(String),
    /// Prefix length longer than the family bit count.
    #[error("prefix length {len} exceeds {bit_count} bits")]
    PrefixTooLong { len: u8, bit_count: u8 },
    /// A segment or value range with its lower bound above its upper bound.
    #[error("range {lower:#x}-{upper:#x} is inverted")]
    InvertedRange { lower: u128, upper: u128 },
    /// A value with bits set above the family bit count.
    #[error("value {value:#x} does not fit in {bit_count} bits")]
    ValueTooLarge { value: u128, bit_count: u8 },
}
