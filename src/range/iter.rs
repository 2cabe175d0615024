//! Pull iterators over a sequential range.
//!
//! Each holds a cursor and the range bound, nothing more, so a range of
//! 2^128 addresses costs the same to walk as a range of one.

use super::SequentialRange;
use crate::models::{cut_value, host_mask, AddressValue};

/// Ascending single addresses of a range.
#[derive(Debug, Clone)]
pub struct RangeIterator<T> {
    template: Option<T>,
    next: Option<u128>,
    upper: u128,
}

impl<T: AddressValue> RangeIterator<T> {
    pub(crate) fn new(template: T, lower: u128, upper: u128) -> Self {
        RangeIterator {
            template: Some(template),
            next: Some(lower),
            upper,
        }
    }

    pub(crate) fn exhausted() -> Self {
        RangeIterator {
            template: None,
            next: None,
            upper: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

impl<T: AddressValue> Iterator for RangeIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let template = self.template.as_ref()?;
        let value = self.next?;
        self.next = (value < self.upper).then(|| value + 1);
        Some(template.with_bounds(value, value, None))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(value) => {
                let remaining = (self.upper - value).checked_add(1);
                let exact = remaining.and_then(|n| usize::try_from(n).ok());
                (exact.unwrap_or(usize::MAX), exact)
            }
            None => (0, Some(0)),
        }
    }
}

/// Ascending whole prefix blocks that intersect a range.
#[derive(Debug, Clone)]
pub struct RangePrefixBlockIterator<T> {
    template: Option<T>,
    len: u8,
    next: Option<u128>,
    upper: u128,
}

impl<T: AddressValue> RangePrefixBlockIterator<T> {
    pub(crate) fn new(template: T, lower: u128, upper: u128, len: u8) -> Self {
        let len = len.min(template.bit_count());
        let start = cut_value(lower, template.bit_count(), len);
        RangePrefixBlockIterator {
            template: Some(template),
            len,
            next: Some(start),
            upper,
        }
    }

    pub(crate) fn exhausted() -> Self {
        RangePrefixBlockIterator {
            template: None,
            len: 0,
            next: None,
            upper: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Next block as raw `(network, broadcast)` values.
    fn next_bounds(&mut self) -> Option<(u128, u128)> {
        let template = self.template.as_ref()?;
        let network = self.next?;
        let broadcast = network | host_mask(template.bit_count(), self.len);
        self.next = (broadcast < self.upper).then(|| broadcast + 1);
        Some((network, broadcast))
    }
}

impl<T: AddressValue> Iterator for RangePrefixBlockIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let (network, broadcast) = self.next_bounds()?;
        let len = self.len;
        self.template
            .as_ref()
            .map(|template| template.with_bounds(network, broadcast, Some(len)))
    }
}

/// Prefix blocks of a range with the first and last clipped to its bounds.
#[derive(Debug, Clone)]
pub struct RangePrefixIterator<T> {
    blocks: RangePrefixBlockIterator<T>,
    bounds: Option<(u128, u128)>,
}

impl<T: AddressValue> RangePrefixIterator<T> {
    pub(crate) fn new(blocks: RangePrefixBlockIterator<T>, bounds: Option<(u128, u128)>) -> Self {
        RangePrefixIterator { blocks, bounds }
    }

    pub fn has_next(&self) -> bool {
        self.blocks.has_next()
    }
}

impl<T: AddressValue> Iterator for RangePrefixIterator<T> {
    type Item = SequentialRange<T>;

    fn next(&mut self) -> Option<SequentialRange<T>> {
        let (lower, upper) = self.bounds?;
        let (network, broadcast) = self.blocks.next_bounds()?;
        let template = self.blocks.template.as_ref()?;
        Some(SequentialRange::from_values(
            template,
            network.max(lower),
            broadcast.min(upper),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Ipv4Address, Ipv6Address};
    use crate::range::SequentialRange;

    fn range(lower: &str, upper: &str) -> SequentialRange<Ipv4Address> {
        SequentialRange::new(&lower.parse().unwrap(), &upper.parse().unwrap())
    }

    #[test]
    fn test_iter_ascending() {
        let values: Vec<String> = range("10.0.0.254", "10.0.1.1")
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(values, vec!["10.0.0.254", "10.0.0.255", "10.0.1.0", "10.0.1.1"]);
    }

    #[test]
    fn test_iter_restarts_per_call() {
        let r = range("10.0.0.1", "10.0.0.3");
        let mut first = r.iter();
        first.next();
        assert_eq!(r.iter().count(), 3);
        assert_eq!(first.count(), 2);
    }

    #[test]
    fn test_iter_top_of_family() {
        let r = range("255.255.255.254", "255.255.255.255");
        let mut it = r.iter();
        assert_eq!(it.size_hint(), (2, Some(2)));
        assert!(it.next().is_some());
        assert!(it.next().is_some());
        assert!(!it.has_next());
        assert!(it.next().is_none());

        let all: Ipv6Address = "::/0".parse().unwrap();
        let huge = SequentialRange::from_value(&all);
        assert_eq!(huge.iter().size_hint(), (usize::MAX, None));
        assert_eq!(huge.iter().nth(3).map(|v| v.to_string()), Some("::3".to_string()));
    }

    #[test]
    fn test_prefix_block_iter() {
        let blocks: Vec<String> = range("10.0.0.200", "10.0.2.3")
            .prefix_block_iter(24)
            .map(|b| b.to_string())
            .collect();
        assert_eq!(blocks, vec!["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/24"]);

        let blocks: Vec<String> = range("0.0.0.0", "255.255.255.255")
            .prefix_block_iter(0)
            .map(|b| b.to_string())
            .collect();
        assert_eq!(blocks, vec!["0.0.0.0/0"]);
    }

    #[test]
    fn test_prefix_iter_clips_ends() {
        let pieces: Vec<String> = range("10.0.0.200", "10.0.2.3")
            .prefix_iter(24)
            .map(|r| r.to_canonical_string())
            .collect();
        assert_eq!(
            pieces,
            vec![
                "10.0.0.200-10.0.0.255",
                "10.0.1.0-10.0.1.255",
                "10.0.2.0-10.0.2.3"
            ]
        );
    }
}
