//! Segmented address values and the bit helpers behind them.
//!
//! An [`Address`] is a cartesian product of per-segment ranges, so a single
//! address, a CIDR block and a wildcard such as `1.2-3.*.4` share one type.
//! Only the lowest and highest numeric values are stored: the lower value
//! holds every segment's lower bound and the upper value every upper bound.

use super::AddressFamily;
use crate::error::AddressError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Largest bit count of any supported family.
pub const MAX_BIT_COUNT: u8 = 128;

/// All ones in the low `bit_count` bits.
///
/// # Examples
/// ```
/// use address_span::models::max_value;
/// assert_eq!(max_value(8), 0xff);
/// assert_eq!(max_value(128), u128::MAX);
/// ```
pub fn max_value(bit_count: u8) -> u128 {
    if bit_count >= MAX_BIT_COUNT {
        u128::MAX
    } else {
        (1u128 << bit_count) - 1
    }
}

/// Bits left variable by a prefix of `len` within `bit_count` bits.
pub fn host_mask(bit_count: u8, len: u8) -> u128 {
    max_value(bit_count - len.min(bit_count))
}

/// Bits fixed by a prefix of `len` within `bit_count` bits.
pub fn network_mask(bit_count: u8, len: u8) -> u128 {
    max_value(bit_count) & !host_mask(bit_count, len)
}

/// Lowest value of the prefix block of length `len` containing `value`.
pub fn cut_value(value: u128, bit_count: u8, len: u8) -> u128 {
    value & network_mask(bit_count, len)
}

/// Highest value of the prefix block of length `len` containing `value`.
pub fn broadcast_value(value: u128, bit_count: u8, len: u8) -> u128 {
    (value | host_mask(bit_count, len)) & max_value(bit_count)
}

/// Shortest prefix length for which `value` is the start of a block.
pub fn lo_mask(value: u128, bit_count: u8) -> u8 {
    let trailing_zeros = (value.trailing_zeros() as u8).min(bit_count);
    bit_count - trailing_zeros
}

/// Shortest prefix length for which `value` is the end of a block.
pub fn hi_mask(value: u128, bit_count: u8) -> u8 {
    let trailing_ones = (value.trailing_ones() as u8).min(bit_count);
    bit_count - trailing_ones
}

/// Inclusive range of values taken by one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub lower: u32,
    pub upper: u32,
}

impl Segment {
    pub fn is_multiple(&self) -> bool {
        self.lower != self.upper
    }
}

/// Address value of family `F`, possibly multi-valued, possibly prefixed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address<F: AddressFamily> {
    lower: u128,
    upper: u128,
    prefix_len: Option<u8>,
    family: PhantomData<F>,
}

/// IPv4 address or subnet.
pub type Ipv4Address = Address<super::Ipv4>;
/// IPv6 address or subnet.
pub type Ipv6Address = Address<super::Ipv6>;
/// MAC-48 address or block.
pub type MacAddress = Address<super::Mac>;

impl<F: AddressFamily> Address<F> {
    pub(crate) fn from_parts(lower: u128, upper: u128, prefix_len: Option<u8>) -> Self {
        debug_assert!(lower <= upper && upper <= max_value(F::BIT_COUNT));
        Address {
            lower,
            upper,
            prefix_len,
            family: PhantomData,
        }
    }

    fn check_value(value: u128) -> Result<u128, AddressError> {
        if value > max_value(F::BIT_COUNT) {
            Err(AddressError::ValueTooLarge {
                value,
                bit_count: F::BIT_COUNT,
            })
        } else {
            Ok(value)
        }
    }

    fn check_prefix(len: u8) -> Result<u8, AddressError> {
        if len > F::BIT_COUNT {
            Err(AddressError::PrefixTooLong {
                len,
                bit_count: F::BIT_COUNT,
            })
        } else {
            Ok(len)
        }
    }

    /// A single address with no prefix length.
    pub fn single(value: u128) -> Result<Self, AddressError> {
        let value = Self::check_value(value)?;
        Ok(Self::from_parts(value, value, None))
    }

    /// A single address carrying a prefix length, e.g. the host `1.2.3.4/24`.
    pub fn with_prefix_len(value: u128, len: u8) -> Result<Self, AddressError> {
        let value = Self::check_value(value)?;
        let len = Self::check_prefix(len)?;
        Ok(Self::from_parts(value, value, Some(len)))
    }

    /// The whole CIDR block of length `len` containing `value`.
    ///
    /// # Examples
    /// ```
    /// use address_span::models::Ipv4Address;
    /// let block = Ipv4Address::prefix_block(0x0a00_0105, 24).unwrap();
    /// assert_eq!(block.to_string(), "10.0.1.0/24");
    /// ```
    pub fn prefix_block(value: u128, len: u8) -> Result<Self, AddressError> {
        let value = Self::check_value(value)?;
        let len = Self::check_prefix(len)?;
        Ok(Self::from_parts(
            cut_value(value, F::BIT_COUNT, len),
            broadcast_value(value, F::BIT_COUNT, len),
            Some(len),
        ))
    }

    /// Build from one `(lower, upper)` pair per segment, most significant first.
    pub fn from_segments(segments: &[(u32, u32)]) -> Result<Self, AddressError> {
        if segments.len() != F::SEGMENT_COUNT {
            return Err(AddressError::SegmentCount {
                family: F::NAME,
                expected: F::SEGMENT_COUNT,
                found: segments.len(),
            });
        }
        let segment_max = max_value(F::BITS_PER_SEGMENT);
        let mut lower = 0u128;
        let mut upper = 0u128;
        for &(lo, hi) in segments {
            let (lo, hi) = (lo as u128, hi as u128);
            if lo > hi {
                return Err(AddressError::InvertedRange {
                    lower: lo,
                    upper: hi,
                });
            }
            if hi > segment_max {
                return Err(AddressError::ValueTooLarge {
                    value: hi,
                    bit_count: F::BITS_PER_SEGMENT,
                });
            }
            // A shift by the full width would overflow for single-segment families.
            lower = (lower << (F::BITS_PER_SEGMENT - 1) << 1) | lo;
            upper = (upper << (F::BITS_PER_SEGMENT - 1) << 1) | hi;
        }
        Ok(Self::from_parts(lower, upper, None))
    }

    /// Segment `index`, counted from the most significant.
    pub fn segment(&self, index: usize) -> Option<Segment> {
        if index >= F::SEGMENT_COUNT {
            return None;
        }
        let shift = (F::SEGMENT_COUNT - 1 - index) as u32 * F::BITS_PER_SEGMENT as u32;
        let mask = max_value(F::BITS_PER_SEGMENT);
        Some(Segment {
            lower: ((self.lower >> shift) & mask) as u32,
            upper: ((self.upper >> shift) & mask) as u32,
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..F::SEGMENT_COUNT).filter_map(move |i| self.segment(i))
    }

    pub fn lower_value(&self) -> u128 {
        self.lower
    }

    pub fn upper_value(&self) -> u128 {
        self.upper
    }

    pub fn prefix_len(&self) -> Option<u8> {
        self.prefix_len
    }

    fn fmt_segments(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segment_max = max_value(F::BITS_PER_SEGMENT) as u32;
        for (i, segment) in self.segments().enumerate() {
            if i > 0 {
                write!(f, "{}", F::SEPARATOR)?;
            }
            if segment.lower == 0 && segment.upper == segment_max && segment.is_multiple() {
                write!(f, "*")?;
                continue;
            }
            write_segment_value(f, segment.lower, F::RADIX, F::SEGMENT_WIDTH)?;
            if segment.is_multiple() {
                write!(f, "-")?;
                write_segment_value(f, segment.upper, F::RADIX, F::SEGMENT_WIDTH)?;
            }
        }
        Ok(())
    }
}

fn write_segment_value(
    f: &mut fmt::Formatter<'_>,
    value: u32,
    radix: u32,
    width: usize,
) -> fmt::Result {
    if radix == 16 {
        write!(f, "{value:0width$x}")
    } else {
        write!(f, "{value:0width$}")
    }
}

impl<F: AddressFamily> fmt::Display for Address<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Blocks render as their network address plus the prefix length.
        let is_block = self.prefix_len.is_some_and(|len| {
            self.lower == cut_value(self.lower, F::BIT_COUNT, len)
                && self.upper == broadcast_value(self.lower, F::BIT_COUNT, len)
        });
        if self.lower == self.upper || is_block {
            match F::format_value(self.lower) {
                Some(text) => write!(f, "{text}")?,
                None => Self::from_parts(self.lower, self.lower, None).fmt_segments(f)?,
            }
        } else {
            self.fmt_segments(f)?;
        }
        if let Some(len) = self.prefix_len {
            write!(f, "/{len}")?;
        }
        Ok(())
    }
}

impl<F: AddressFamily> fmt::Debug for Address<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", F::NAME, self)
    }
}

impl<F: AddressFamily> FromStr for Address<F> {
    type Err = AddressError;

    /// Parse `addr[/len]`. A prefix length widens the value to its block.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let (addr, prefix) = match text.split_once('/') {
            Some((addr, len)) => {
                let len: u8 = len
                    .trim()
                    .parse()
                    .map_err(|_| AddressError::InvalidPrefix(len.to_string()))?;
                (addr.trim(), Some(Self::check_prefix(len)?))
            }
            None => (text, None),
        };
        let address = match F::parse_value(addr) {
            Some(value) => Self::single(value)?,
            None => Self::from_segments(&super::parse::parse_segments::<F>(addr)?)?,
        };
        Ok(match prefix {
            Some(len) => Self::from_parts(
                cut_value(address.lower, F::BIT_COUNT, len),
                broadcast_value(address.upper, F::BIT_COUNT, len),
                Some(len),
            ),
            None => address,
        })
    }
}

impl<F: AddressFamily> Serialize for Address<F> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de, F: AddressFamily> Deserialize<'de> for Address<F> {
    fn deserialize<D>(deserializer: D) -> Result<Address<F>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e| de::Error::custom(format!("invalid {} address '{s}': {e}", F::NAME)))
    }
}
