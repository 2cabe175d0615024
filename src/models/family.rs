//! Address families and the segment geometry each one uses.

use super::Address;
use crate::range::SequentialRange;
use lazy_static::lazy_static;
use std::fmt::Debug;
use std::hash::Hash;
use std::net::Ipv6Addr;

/// Compile-time description of an address family.
pub trait AddressFamily:
    Copy
    + Clone
    + Debug
    + Default
    + PartialEq
    + Eq
    + Hash
    + PartialOrd
    + Ord
    + Send
    + Sync
    + 'static
{
    const NAME: &'static str;
    const SEGMENT_COUNT: usize;
    const BITS_PER_SEGMENT: u8;
    const BIT_COUNT: u8 = Self::SEGMENT_COUNT as u8 * Self::BITS_PER_SEGMENT;
    const SEPARATOR: char;
    const RADIX: u32;
    /// Zero padding applied when rendering a segment.
    const SEGMENT_WIDTH: usize = 0;

    /// Empty range of this family, shared process-wide and built on first use.
    fn zero_range() -> &'static SequentialRange<Address<Self>>;

    /// Family-specific text for a single value, when the family has one.
    fn format_value(_value: u128) -> Option<String> {
        None
    }

    /// Family-specific parse of a single value, tried before segment parsing.
    fn parse_value(_text: &str) -> Option<u128> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipv4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipv6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mac;

impl AddressFamily for Ipv4 {
    const NAME: &'static str = "IPv4";
    const SEGMENT_COUNT: usize = 4;
    const BITS_PER_SEGMENT: u8 = 8;
    const SEPARATOR: char = '.';
    const RADIX: u32 = 10;

    fn zero_range() -> &'static SequentialRange<Address<Self>> {
        lazy_static! {
            static ref ZERO: SequentialRange<Address<Ipv4>> = SequentialRange::empty();
        }
        &ZERO
    }
}

impl AddressFamily for Ipv6 {
    const NAME: &'static str = "IPv6";
    const SEGMENT_COUNT: usize = 8;
    const BITS_PER_SEGMENT: u8 = 16;
    const SEPARATOR: char = ':';
    const RADIX: u32 = 16;

    fn zero_range() -> &'static SequentialRange<Address<Self>> {
        lazy_static! {
            static ref ZERO: SequentialRange<Address<Ipv6>> = SequentialRange::empty();
        }
        &ZERO
    }

    fn format_value(value: u128) -> Option<String> {
        Some(Ipv6Addr::from(value).to_string())
    }

    fn parse_value(text: &str) -> Option<u128> {
        text.parse::<Ipv6Addr>().ok().map(u128::from)
    }
}

impl AddressFamily for Mac {
    const NAME: &'static str = "MAC";
    const SEGMENT_COUNT: usize = 6;
    const BITS_PER_SEGMENT: u8 = 8;
    const SEPARATOR: char = ':';
    const RADIX: u32 = 16;
    const SEGMENT_WIDTH: usize = 2;

    fn zero_range() -> &'static SequentialRange<Address<Self>> {
        lazy_static! {
            static ref ZERO: SequentialRange<Address<Mac>> = SequentialRange::empty();
        }
        &ZERO
    }
}
