//! Inclusive `[lower, upper]` ranges of same-family addresses.

use super::{RangeIterator, RangePrefixBlockIterator, RangePrefixIterator};
use crate::models::{cut_value, hi_mask, host_mask, lo_mask, max_value, AddressValue};
use crate::processing;
use num_bigint::BigUint;
use num_traits::Zero;
use std::cmp::Ordering;
use std::fmt;

/// An immutable, inclusive range between two single addresses.
///
/// The empty range stands in for "no range": it has a count of zero, holds
/// nothing, overlaps nothing and iterates nothing. It is what disjoint
/// intersections and mixed-family constructions return.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SequentialRange<T> {
    bounds: Option<(T, T)>,
}

impl<T> SequentialRange<T> {
    /// The range holding no addresses.
    pub const fn empty() -> Self {
        SequentialRange { bounds: None }
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn lower(&self) -> Option<&T> {
        self.bounds.as_ref().map(|(lower, _)| lower)
    }

    pub fn upper(&self) -> Option<&T> {
        self.bounds.as_ref().map(|(_, upper)| upper)
    }
}

impl<T> Default for SequentialRange<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: AddressValue> SequentialRange<T> {
    /// Range from the lowest to the highest address of two endpoints.
    ///
    /// Endpoint order does not matter and prefix lengths are dropped.
    /// Endpoints of different families give the empty range.
    pub fn new(first: &T, second: &T) -> Self {
        if !first.same_family(second) {
            log::warn!("range endpoints {first} and {second} are from different families");
            return Self::empty();
        }
        let lower = first.lower_value().min(second.lower_value());
        let upper = first.upper_value().max(second.upper_value());
        Self::from_values(first, lower, upper)
    }

    /// Range spanning the lowest and highest address of a single value.
    pub fn from_value(value: &T) -> Self {
        Self::from_values(value, value.lower_value(), value.upper_value())
    }

    pub(crate) fn from_values(template: &T, lower: u128, upper: u128) -> Self {
        debug_assert!(lower <= upper);
        SequentialRange {
            bounds: Some((
                template.with_bounds(lower, lower, None),
                template.with_bounds(upper, upper, None),
            )),
        }
    }

    /// Shared empty range for `T`.
    pub fn zero() -> &'static Self {
        T::zero_range()
    }

    pub(crate) fn values(&self) -> Option<(u128, u128)> {
        self.bounds
            .as_ref()
            .map(|(lower, upper)| (lower.lower_value(), upper.lower_value()))
    }

    pub(crate) fn template(&self) -> Option<&T> {
        self.lower()
    }

    pub fn bit_count(&self) -> Option<u8> {
        self.template().map(|t| t.bit_count())
    }

    /// `upper - lower + 1`, or zero for the empty range.
    pub fn count(&self) -> BigUint {
        match self.values() {
            Some((lower, upper)) => BigUint::from(upper - lower) + 1u32,
            None => BigUint::zero(),
        }
    }

    pub fn is_multiple(&self) -> bool {
        self.values().is_some_and(|(lower, upper)| lower != upper)
    }

    /// Whether every address of `value` lies in the range.
    pub fn contains(&self, value: &T) -> bool {
        match (self.template(), self.values()) {
            (Some(template), Some((lower, upper))) => {
                template.same_family(value)
                    && lower <= value.lower_value()
                    && value.upper_value() <= upper
            }
            _ => false,
        }
    }

    pub fn contains_range(&self, other: &Self) -> bool {
        match (self.values(), other.values()) {
            (Some((lower, upper)), Some((other_lower, other_upper))) => {
                self.same_family(other) && lower <= other_lower && other_upper <= upper
            }
            _ => false,
        }
    }

    pub(crate) fn same_family(&self, other: &Self) -> bool {
        match (self.template(), other.template()) {
            (Some(a), Some(b)) => a.same_family(b),
            _ => false,
        }
    }

    /// Compare how many addresses the two ranges hold.
    ///
    /// `Greater` means `self` holds more. Only the widths are compared, so no
    /// big integer is built.
    pub fn compare_size(&self, other: &Self) -> Ordering {
        let width = |range: &Self| range.values().map(|(lower, upper)| upper - lower);
        match (width(self), width(other)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    }

    /// Whether the range is a union of whole blocks of length `len`.
    pub fn contains_prefix_block(&self, len: u8) -> bool {
        match (self.bit_count(), self.values()) {
            (Some(bit_count), Some((lower, upper))) => {
                let host = host_mask(bit_count, len);
                lower & host == 0 && upper & host == host
            }
            _ => false,
        }
    }

    /// Whether the range is exactly one block of length `len`.
    pub fn contains_single_prefix_block(&self, len: u8) -> bool {
        match (self.bit_count(), self.values()) {
            (Some(bit_count), Some((lower, upper))) => {
                self.contains_prefix_block(len)
                    && cut_value(lower, bit_count, len) == cut_value(upper, bit_count, len)
            }
            _ => false,
        }
    }

    /// Prefix length at which the range is exactly one CIDR block.
    pub fn prefix_len_for_single_block(&self) -> Option<u8> {
        let len = self.min_prefix_len_for_block();
        self.contains_single_prefix_block(len).then_some(len)
    }

    /// Shortest prefix length whose blocks tile the range exactly.
    ///
    /// The range may hold several blocks of that length. Zero for the empty
    /// range.
    pub fn min_prefix_len_for_block(&self) -> u8 {
        match (self.bit_count(), self.values()) {
            (Some(bit_count), Some((lower, upper))) => {
                lo_mask(lower, bit_count).max(hi_mask(upper, bit_count))
            }
            _ => 0,
        }
    }

    /// Whether the range covers every address of its family.
    pub fn is_full_range(&self) -> bool {
        self.includes_zero() && self.includes_max()
    }

    pub fn is_zero(&self) -> bool {
        self.values() == Some((0, 0))
    }

    pub fn includes_zero(&self) -> bool {
        self.values().is_some_and(|(lower, _)| lower == 0)
    }

    /// Whether the range is exactly the all-ones address.
    pub fn is_max(&self) -> bool {
        self.includes_max() && !self.is_multiple()
    }

    pub fn includes_max(&self) -> bool {
        match (self.bit_count(), self.values()) {
            (Some(bit_count), Some((_, upper))) => upper == max_value(bit_count),
            _ => false,
        }
    }

    /// Each address of the range, ascending. Every call starts afresh.
    pub fn iter(&self) -> RangeIterator<T> {
        match (self.template(), self.values()) {
            (Some(template), Some((lower, upper))) => {
                RangeIterator::new(template.clone(), lower, upper)
            }
            _ => RangeIterator::exhausted(),
        }
    }

    /// Every whole block of length `len` that intersects the range, ascending.
    pub fn prefix_block_iter(&self, len: u8) -> RangePrefixBlockIterator<T> {
        match (self.template(), self.values()) {
            (Some(template), Some((lower, upper))) => {
                RangePrefixBlockIterator::new(template.clone(), lower, upper, len)
            }
            _ => RangePrefixBlockIterator::exhausted(),
        }
    }

    /// Like [`prefix_block_iter`](Self::prefix_block_iter), with the first and
    /// last pieces clipped to the range bounds.
    pub fn prefix_iter(&self, len: u8) -> RangePrefixIterator<T> {
        RangePrefixIterator::new(self.prefix_block_iter(len), self.values())
    }

    /// Minimal ascending list of CIDR blocks whose union is the range.
    pub fn span_with_prefix_blocks(&self) -> Vec<T> {
        match (self.template(), self.values()) {
            (Some(template), Some((lower, upper))) => {
                processing::span_with_prefix_blocks(template, lower, upper)
            }
            _ => Vec::new(),
        }
    }

    /// Minimal ascending list of segment-sequential blocks whose union is the range.
    pub fn span_with_sequential_blocks(&self) -> Vec<T> {
        match (self.template(), self.values()) {
            (Some(template), Some((lower, upper))) => {
                processing::span_with_sequential_blocks(template, lower, upper)
            }
            _ => Vec::new(),
        }
    }

    /// Render with caller-supplied endpoint formatters.
    ///
    /// The empty range renders as an empty string.
    pub fn to_string_with<L, U>(&self, lower_fmt: L, separator: &str, upper_fmt: U) -> String
    where
        L: Fn(&T) -> String,
        U: Fn(&T) -> String,
    {
        match &self.bounds {
            Some((lower, upper)) => format!("{}{separator}{}", lower_fmt(lower), upper_fmt(upper)),
            None => String::new(),
        }
    }

    /// `lower-upper` using each endpoint's own rendering.
    pub fn to_canonical_string(&self) -> String {
        self.to_string_with(T::to_string, "-", T::to_string)
    }
}

impl<T: AddressValue> fmt::Display for SequentialRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with(T::to_string, " -> ", T::to_string))
    }
}

impl<T: AddressValue> fmt::Debug for SequentialRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.bounds {
            Some(_) => write!(f, "SequentialRange({self})"),
            None => write!(f, "SequentialRange(empty)"),
        }
    }
}
