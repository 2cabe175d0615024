//! The capability set the range and partition algebra consumes.
//!
//! Implementors only supply geometry, bounds and a same-family constructor;
//! counting, prefix reasoning, iteration and spanning are derived here.

use super::{
    broadcast_value, cut_value, max_value, Address, AddressFamily, AddressIterator,
    PrefixBlockIterator, SequentialBlockIterator,
};
use crate::processing;
use crate::range::SequentialRange;
use num_bigint::BigUint;
use num_traits::One;
use std::fmt;
use std::hash::Hash;

/// Lower and upper value of segment `index`, counted from the most significant.
///
/// `index` must be below `value.segment_count()`.
pub(crate) fn segment_bounds<T: AddressValue>(value: &T, index: usize) -> (u128, u128) {
    debug_assert!(index < value.segment_count());
    let bits_per_segment = value.bits_per_segment();
    let shift = (value.segment_count() - 1 - index) as u32 * bits_per_segment as u32;
    let mask = max_value(bits_per_segment);
    (
        (value.lower_value() >> shift) & mask,
        (value.upper_value() >> shift) & mask,
    )
}

/// An address-like value: a single address, a CIDR block, or a segment-wise
/// multi-valued set, ordered by numeric value.
pub trait AddressValue: Clone + Ord + Hash + fmt::Debug + fmt::Display {
    fn bit_count(&self) -> u8;
    fn segment_count(&self) -> usize;
    fn bits_per_segment(&self) -> u8;
    fn prefix_len(&self) -> Option<u8>;
    fn lower_value(&self) -> u128;
    fn upper_value(&self) -> u128;

    /// A value of the same family spanning `lower..=upper`.
    ///
    /// The bounds must be segment-wise ordered, which holds for every prefix
    /// block and every segment-sequential block.
    fn with_bounds(&self, lower: u128, upper: u128, prefix_len: Option<u8>) -> Self;

    fn same_family(&self, other: &Self) -> bool;

    /// Shared empty range for this value type.
    fn zero_range() -> &'static SequentialRange<Self>;

    fn byte_count(&self) -> usize {
        (self.bit_count() as usize).div_ceil(8)
    }

    fn is_prefixed(&self) -> bool {
        self.prefix_len().is_some()
    }

    fn is_multiple(&self) -> bool {
        self.lower_value() != self.upper_value()
    }

    /// Whether the value is one contiguous run of numbers.
    fn is_sequential(&self) -> bool {
        let full = max_value(self.bits_per_segment());
        let mut ranged = false;
        for i in 0..self.segment_count() {
            let (lower, upper) = segment_bounds(self, i);
            if ranged {
                if lower != 0 || upper != full {
                    return false;
                }
            } else if lower != upper {
                ranged = true;
            }
        }
        true
    }

    /// Whether the value is exactly the block of its own prefix length.
    fn is_single_prefix_block(&self) -> bool {
        let bit_count = self.bit_count();
        match self.prefix_len() {
            Some(len) => {
                let lower = self.lower_value();
                lower == cut_value(lower, bit_count, len)
                    && self.upper_value() == broadcast_value(lower, bit_count, len)
            }
            None => false,
        }
    }

    /// Number of individual addresses in the value.
    fn count(&self) -> BigUint {
        if self.is_sequential() {
            return BigUint::from(self.upper_value() - self.lower_value()) + 1u32;
        }
        (0..self.segment_count()).fold(BigUint::one(), |count, i| {
            let (lower, upper) = segment_bounds(self, i);
            count * BigUint::from(upper - lower + 1)
        })
    }

    /// Number of distinct prefixes of length `len` the value covers.
    fn prefix_count_len(&self, len: u8) -> BigUint {
        let len = len.min(self.bit_count()) as u32;
        let bits_per_segment = self.bits_per_segment() as u32;
        let mut count = BigUint::one();
        for i in 0..self.segment_count() {
            let segment_start = i as u32 * bits_per_segment;
            if segment_start >= len {
                break;
            }
            let host_bits = bits_per_segment - (len - segment_start).min(bits_per_segment);
            let (lower, upper) = segment_bounds(self, i);
            count *= BigUint::from((upper >> host_bits) - (lower >> host_bits) + 1);
        }
        count
    }

    /// Shortest prefix length for which the value is a union of whole blocks.
    fn min_prefix_len_for_block(&self) -> u8 {
        let bits_per_segment = self.bits_per_segment() as u32;
        let full = max_value(self.bits_per_segment());
        let mut host_bits = 0u32;
        for i in (0..self.segment_count()).rev() {
            let (lower, upper) = segment_bounds(self, i);
            if lower == 0 && upper == full {
                host_bits += bits_per_segment;
                continue;
            }
            host_bits += lower
                .trailing_zeros()
                .min(upper.trailing_ones())
                .min(bits_per_segment);
            break;
        }
        self.bit_count() - host_bits as u8
    }

    /// Prefix length at which the value is exactly one block, if any.
    fn prefix_len_for_single_block(&self) -> Option<u8> {
        let len = self.min_prefix_len_for_block();
        let bit_count = self.bit_count();
        (cut_value(self.lower_value(), bit_count, len)
            == cut_value(self.upper_value(), bit_count, len))
        .then_some(len)
    }

    fn without_prefix_len(&self) -> Self {
        self.with_bounds(self.lower_value(), self.upper_value(), None)
    }

    fn assign_min_prefix_for_block(&self) -> Self {
        let len = self.min_prefix_len_for_block();
        self.with_bounds(self.lower_value(), self.upper_value(), Some(len))
    }

    /// The smallest block of length `len` holding the whole value.
    fn to_prefix_block_len(&self, len: u8) -> Self {
        let bit_count = self.bit_count();
        let len = len.min(bit_count);
        self.with_bounds(
            cut_value(self.lower_value(), bit_count, len),
            broadcast_value(self.upper_value(), bit_count, len),
            Some(len),
        )
    }

    fn lower(&self) -> Self {
        let lower = self.lower_value();
        self.with_bounds(lower, lower, self.prefix_len())
    }

    fn upper(&self) -> Self {
        let upper = self.upper_value();
        self.with_bounds(upper, upper, self.prefix_len())
    }

    fn lower_bytes(&self) -> Vec<u8> {
        let bytes = self.lower_value().to_be_bytes();
        bytes[bytes.len() - self.byte_count()..].to_vec()
    }

    fn upper_bytes(&self) -> Vec<u8> {
        let bytes = self.upper_value().to_be_bytes();
        bytes[bytes.len() - self.byte_count()..].to_vec()
    }

    fn lower_big(&self) -> BigUint {
        BigUint::from(self.lower_value())
    }

    fn upper_big(&self) -> BigUint {
        BigUint::from(self.upper_value())
    }

    /// Segment-wise containment; values of another family are never contained.
    fn contains(&self, other: &Self) -> bool {
        self.same_family(other)
            && (0..self.segment_count()).all(|i| {
                let (lower, upper) = segment_bounds(self, i);
                let (other_lower, other_upper) = segment_bounds(other, i);
                lower <= other_lower && other_upper <= upper
            })
    }

    /// Index of the first segment of the trailing sequential block.
    ///
    /// Segments before it must be iterated value by value; from it onwards
    /// the value is a single contiguous run.
    fn sequential_block_index(&self) -> usize {
        let full = max_value(self.bits_per_segment());
        let mut index = 0;
        for i in (0..self.segment_count()).rev() {
            index = i;
            let (lower, upper) = segment_bounds(self, i);
            if lower != 0 || upper != full {
                break;
            }
        }
        index
    }

    fn sequential_block_count(&self) -> BigUint {
        (0..self.sequential_block_index()).fold(BigUint::one(), |count, i| {
            let (lower, upper) = segment_bounds(self, i);
            count * BigUint::from(upper - lower + 1)
        })
    }

    /// Every individual address, ascending, without prefix length.
    fn iter(&self) -> AddressIterator<Self> {
        AddressIterator::new(self.clone())
    }

    /// Every distinct block of length `len` the value touches, ascending.
    fn prefix_block_iter(&self, len: u8) -> PrefixBlockIterator<Self> {
        PrefixBlockIterator::new(self.clone(), len)
    }

    /// The value split into the fewest segment-sequential blocks.
    fn sequential_block_iter(&self) -> SequentialBlockIterator<Self> {
        SequentialBlockIterator::new(self.clone())
    }

    /// The range from the value's lowest to highest address.
    fn to_sequential_range(&self) -> SequentialRange<Self> {
        SequentialRange::from_value(self)
    }

    /// Minimal ascending list of CIDR blocks whose union is exactly the value.
    fn span_with_prefix_blocks(&self) -> Vec<Self> {
        if self.is_sequential() {
            return processing::span_with_prefix_blocks(
                self,
                self.lower_value(),
                self.upper_value(),
            );
        }
        self.sequential_block_iter()
            .flat_map(|block| {
                let (lower, upper) = (block.lower_value(), block.upper_value());
                processing::span_with_prefix_blocks(&block, lower, upper)
            })
            .collect()
    }

    /// Minimal ascending list of segment-sequential blocks whose union is the value.
    fn span_with_sequential_blocks(&self) -> Vec<Self> {
        self.sequential_block_iter().collect()
    }
}

impl<F: AddressFamily> AddressValue for Address<F> {
    fn bit_count(&self) -> u8 {
        F::BIT_COUNT
    }

    fn segment_count(&self) -> usize {
        F::SEGMENT_COUNT
    }

    fn bits_per_segment(&self) -> u8 {
        F::BITS_PER_SEGMENT
    }

    fn prefix_len(&self) -> Option<u8> {
        Address::prefix_len(self)
    }

    fn lower_value(&self) -> u128 {
        Address::lower_value(self)
    }

    fn upper_value(&self) -> u128 {
        Address::upper_value(self)
    }

    fn with_bounds(&self, lower: u128, upper: u128, prefix_len: Option<u8>) -> Self {
        Address::from_parts(lower, upper, prefix_len)
    }

    fn same_family(&self, _other: &Self) -> bool {
        true
    }

    fn zero_range() -> &'static SequentialRange<Self> {
        F::zero_range()
    }
}
