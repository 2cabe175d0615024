//! Either-family IP values.
//!
//! [`IpAddress`] lets one collection hold IPv4 and IPv6 values side by side.
//! Every operation that pairs two values checks the family first; mixed pairs
//! give `None` or the empty range rather than an error.

use super::{AddressValue, Ipv4Address, Ipv6Address};
use crate::error::AddressError;
use crate::range::SequentialRange;
use lazy_static::lazy_static;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// An IPv4 or IPv6 value. IPv4 values order before IPv6 values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IpAddress {
    V4(Ipv4Address),
    V6(Ipv6Address),
}

impl IpAddress {
    pub fn is_ipv4(&self) -> bool {
        matches!(self, IpAddress::V4(_))
    }

    pub fn is_ipv6(&self) -> bool {
        matches!(self, IpAddress::V6(_))
    }

    pub fn to_ipv4(&self) -> Option<Ipv4Address> {
        match self {
            IpAddress::V4(addr) => Some(*addr),
            IpAddress::V6(_) => None,
        }
    }

    pub fn to_ipv6(&self) -> Option<Ipv6Address> {
        match self {
            IpAddress::V4(_) => None,
            IpAddress::V6(addr) => Some(*addr),
        }
    }
}

impl From<Ipv4Address> for IpAddress {
    fn from(addr: Ipv4Address) -> Self {
        IpAddress::V4(addr)
    }
}

impl From<Ipv6Address> for IpAddress {
    fn from(addr: Ipv6Address) -> Self {
        IpAddress::V6(addr)
    }
}

impl AddressValue for IpAddress {
    fn bit_count(&self) -> u8 {
        match self {
            IpAddress::V4(addr) => addr.bit_count(),
            IpAddress::V6(addr) => addr.bit_count(),
        }
    }

    fn segment_count(&self) -> usize {
        match self {
            IpAddress::V4(addr) => addr.segment_count(),
            IpAddress::V6(addr) => addr.segment_count(),
        }
    }

    fn bits_per_segment(&self) -> u8 {
        match self {
            IpAddress::V4(addr) => addr.bits_per_segment(),
            IpAddress::V6(addr) => addr.bits_per_segment(),
        }
    }

    fn prefix_len(&self) -> Option<u8> {
        match self {
            IpAddress::V4(addr) => addr.prefix_len(),
            IpAddress::V6(addr) => addr.prefix_len(),
        }
    }

    fn lower_value(&self) -> u128 {
        match self {
            IpAddress::V4(addr) => addr.lower_value(),
            IpAddress::V6(addr) => addr.lower_value(),
        }
    }

    fn upper_value(&self) -> u128 {
        match self {
            IpAddress::V4(addr) => addr.upper_value(),
            IpAddress::V6(addr) => addr.upper_value(),
        }
    }

    fn with_bounds(&self, lower: u128, upper: u128, prefix_len: Option<u8>) -> Self {
        match self {
            IpAddress::V4(addr) => IpAddress::V4(addr.with_bounds(lower, upper, prefix_len)),
            IpAddress::V6(addr) => IpAddress::V6(addr.with_bounds(lower, upper, prefix_len)),
        }
    }

    fn same_family(&self, other: &Self) -> bool {
        self.is_ipv4() == other.is_ipv4()
    }

    fn zero_range() -> &'static SequentialRange<Self> {
        lazy_static! {
            static ref ZERO: SequentialRange<IpAddress> = SequentialRange::empty();
        }
        &ZERO
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpAddress::V4(addr) => fmt::Display::fmt(addr, f),
            IpAddress::V6(addr) => fmt::Display::fmt(addr, f),
        }
    }
}

impl fmt::Debug for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpAddress::V4(addr) => fmt::Debug::fmt(addr, f),
            IpAddress::V6(addr) => fmt::Debug::fmt(addr, f),
        }
    }
}

impl FromStr for IpAddress {
    type Err = AddressError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.parse::<Ipv4Address>() {
            Ok(addr) => Ok(IpAddress::V4(addr)),
            Err(_) => text.parse::<Ipv6Address>().map(IpAddress::V6),
        }
    }
}

impl Serialize for IpAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IpAddress {
    fn deserialize<D>(deserializer: D) -> Result<IpAddress, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e| de::Error::custom(format!("invalid IP address '{s}': {e}")))
    }
}
