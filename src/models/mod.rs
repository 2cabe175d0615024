//! Address value model consumed by the range and partition algebra.
//!
//! - [`AddressFamily`] - segment geometry of IPv4, IPv6 and MAC
//! - [`Address`] - a segmented single address, block or wildcard value
//! - [`IpAddress`] - IPv4 or IPv6 in one type
//! - [`AddressValue`] - the capability set every algorithm is generic over

mod address;
mod family;
mod ip;
mod iter;
mod parse;
mod value;

// Re-export public types
pub use address::{
    broadcast_value, cut_value, hi_mask, host_mask, lo_mask, max_value, network_mask, Address,
    Ipv4Address, Ipv6Address, MacAddress, Segment, MAX_BIT_COUNT,
};
pub use family::{AddressFamily, Ipv4, Ipv6, Mac};
pub use ip::IpAddress;
pub use iter::{AddressIterator, PrefixBlockIterator, SequentialBlockIterator};
pub use value::AddressValue;
