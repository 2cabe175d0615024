//! One-shot enumeration over either a single value or many.
//!
//! A [`Partition`] hides whether a value needed splitting. Consumers drain it
//! once, through [`Partition::for_each`], [`Partition::iter`] or one of the
//! predicate helpers; afterwards it is exhausted and yields nothing.
//!
//! A partition is single-owner and consume-once. It is not `Sync`, and
//! sharing one across threads needs external locking.

use crate::models::AddressValue;
use num_bigint::BigUint;
use num_traits::One;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::iter::Peekable;
use std::mem;

type LazyValues<T> = Box<dyn Iterator<Item = T>>;

enum PartitionState<T> {
    Single(T),
    Lazy(LazyValues<T>),
    Exhausted,
}

/// A value together with the pieces it was partitioned into.
pub struct Partition<T> {
    original: T,
    state: PartitionState<T>,
    count: BigUint,
}

impl<T: AddressValue + 'static> Partition<T> {
    /// Partition `value` into the minimal CIDR blocks spanning it.
    ///
    /// A single address, or a value that is already one prefix block, is kept
    /// whole; a prefixed single address loses its prefix length.
    pub fn with_spanning_blocks(value: T) -> Self {
        if let Some(single) = Self::single(&value) {
            return single;
        }
        let blocks = value.span_with_prefix_blocks();
        log::debug!("partition {value} into {} spanning blocks", blocks.len());
        let count = BigUint::from(blocks.len());
        Partition {
            original: value,
            state: PartitionState::Lazy(Box::new(blocks.into_iter())),
            count,
        }
    }

    /// Partition `value` into blocks of one common size.
    ///
    /// The size is the largest block the value is a union of. When that is a
    /// single address, the value is walked address by address.
    pub fn with_single_block_size(value: T) -> Self {
        if let Some(single) = Self::single(&value) {
            return single;
        }
        let block = value.assign_min_prefix_for_block();
        let len = block.min_prefix_len_for_block();
        if len < value.bit_count() {
            let count = block.prefix_count_len(len);
            log::debug!("partition {value} into {count} blocks of /{len}");
            Partition {
                original: value,
                state: PartitionState::Lazy(Box::new(block.prefix_block_iter(len))),
                count,
            }
        } else {
            let count = value.count();
            log::debug!("partition {value} into {count} addresses");
            Partition {
                state: PartitionState::Lazy(Box::new(value.without_prefix_len().iter())),
                original: value,
                count,
            }
        }
    }

    fn single(value: &T) -> Option<Self> {
        let element = if !value.is_multiple() {
            value.without_prefix_len()
        } else if value.is_single_prefix_block() {
            value.clone()
        } else {
            return None;
        };
        Some(Partition {
            original: value.clone(),
            state: PartitionState::Single(element),
            count: BigUint::one(),
        })
    }
}

impl<T> Partition<T> {
    /// The value that was partitioned.
    pub fn original(&self) -> &T {
        &self.original
    }

    /// How many elements the partition yields in total, known up front.
    pub fn count(&self) -> &BigUint {
        &self.count
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, PartitionState::Exhausted)
    }

    fn take_state(&mut self) -> PartitionState<T> {
        mem::replace(&mut self.state, PartitionState::Exhausted)
    }

    /// Apply `action` to every element, once. Later calls do nothing.
    pub fn for_each<F>(&mut self, mut action: F)
    where
        F: FnMut(T),
    {
        match self.take_state() {
            PartitionState::Single(value) => action(value),
            PartitionState::Lazy(values) => values.for_each(action),
            PartitionState::Exhausted => {}
        }
    }

    /// Take the elements as an iterator, exhausting the partition.
    ///
    /// A second call returns an iterator that is already empty.
    pub fn iter(&mut self) -> PartitionIterator<T>
    where
        T: 'static,
    {
        let values: LazyValues<T> = match self.take_state() {
            PartitionState::Single(value) => Box::new(std::iter::once(value)),
            PartitionState::Lazy(values) => values,
            PartitionState::Exhausted => Box::new(std::iter::empty()),
        };
        PartitionIterator {
            values: values.peekable(),
        }
    }

    /// Whether every element satisfies `predicate`. Tests every element.
    pub fn predicate_for_each<P>(&mut self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        let mut result = true;
        self.for_each(|value| result &= predicate(&value));
        result
    }

    /// Whether every element satisfies `predicate`, stopping at the first failure.
    pub fn predicate_for_each_early<P>(&mut self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        match self.take_state() {
            PartitionState::Single(value) => predicate(&value),
            PartitionState::Lazy(mut values) => values.all(|value| predicate(&value)),
            PartitionState::Exhausted => true,
        }
    }

    /// Whether any element satisfies `predicate`. Tests every element.
    pub fn predicate_for_any<P>(&mut self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        let mut result = false;
        self.for_each(|value| result |= predicate(&value));
        result
    }

    /// Whether any element satisfies `predicate`, stopping at the first success.
    pub fn predicate_for_any_early<P>(&mut self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        match self.take_state() {
            PartitionState::Single(value) => predicate(&value),
            PartitionState::Lazy(mut values) => values.any(|value| predicate(&value)),
            PartitionState::Exhausted => false,
        }
    }
}

impl<T: fmt::Display> fmt::Debug for Partition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            PartitionState::Single(_) => "single",
            PartitionState::Lazy(_) => "lazy",
            PartitionState::Exhausted => "exhausted",
        };
        write!(
            f,
            "Partition({}, {} elements, {state})",
            self.original, self.count
        )
    }
}

/// One-shot pull iterator over a partition's elements.
pub struct PartitionIterator<T> {
    values: Peekable<LazyValues<T>>,
}

impl<T> PartitionIterator<T> {
    pub fn has_next(&mut self) -> bool {
        self.values.peek().is_some()
    }
}

impl<T> Iterator for PartitionIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.values.next()
    }
}

/// Map every element through `f`, keyed by the element.
pub fn apply_for_each<T, V, F>(partition: &mut Partition<T>, mut f: F) -> HashMap<T, V>
where
    T: Eq + Hash,
    F: FnMut(&T) -> V,
{
    let mut results = HashMap::new();
    partition.for_each(|value| {
        let mapped = f(&value);
        results.insert(value, mapped);
    });
    results
}

/// Map every element through `f`, keeping only results flagged `true`.
pub fn apply_for_each_conditionally<T, V, F>(
    partition: &mut Partition<T>,
    mut f: F,
) -> HashMap<T, V>
where
    T: Eq + Hash,
    F: FnMut(&T) -> (V, bool),
{
    let mut results = HashMap::new();
    partition.for_each(|value| {
        let (mapped, keep) = f(&value);
        if keep {
            results.insert(value, mapped);
        }
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ipv4Address, Ipv6Address};

    fn ip(text: &str) -> Ipv4Address {
        text.parse().unwrap()
    }

    fn drain(partition: &mut Partition<Ipv4Address>) -> Vec<String> {
        partition.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_single_address() {
        let mut p = Partition::with_spanning_blocks(ip("10.0.0.1"));
        assert_eq!(p.count(), &BigUint::one());
        assert_eq!(drain(&mut p), vec!["10.0.0.1"]);

        let host = Ipv4Address::with_prefix_len(0x0A00_0001, 24).unwrap();
        let mut p = Partition::with_single_block_size(host);
        assert_eq!(p.original().to_string(), "10.0.0.1/24");
        assert_eq!(drain(&mut p), vec!["10.0.0.1"], "prefix length is dropped");
    }

    #[test]
    fn test_single_prefix_block_kept_whole() {
        let mut p = Partition::with_spanning_blocks(ip("10.0.0.0/16"));
        assert_eq!(drain(&mut p), vec!["10.0.0.0/16"]);
        let mut p = Partition::with_single_block_size(ip("10.0.0.0/16"));
        assert_eq!(drain(&mut p), vec!["10.0.0.0/16"]);
    }

    #[test]
    fn test_spanning_blocks() {
        let mut p = Partition::with_spanning_blocks(ip("0.0.0.10-21"));
        assert_eq!(p.count(), &BigUint::from(4u32));
        assert_eq!(
            drain(&mut p),
            vec!["0.0.0.10/31", "0.0.0.12/30", "0.0.0.16/30", "0.0.0.20/31"]
        );
    }

    #[test]
    fn test_single_block_size() {
        let mut p = Partition::with_single_block_size(ip("10.1-2.*.*"));
        assert_eq!(p.count(), &BigUint::from(2u32));
        assert_eq!(drain(&mut p), vec!["10.1.0.0/16", "10.2.0.0/16"]);

        let mut p = Partition::with_single_block_size(ip("10.0.0.1-3"));
        assert_eq!(p.count(), &BigUint::from(3u32));
        assert_eq!(drain(&mut p), vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    }

    #[test]
    fn test_single_block_size_huge() {
        let all: Ipv6Address = "::/0".parse().unwrap();
        let value = all.without_prefix_len();
        let mut p = Partition::with_single_block_size(value);
        assert_eq!(p.count(), &BigUint::one());
        assert_eq!(p.iter().count(), 1);

        let wide: Ipv6Address = "1:*:*:*:*:*:*:1-2".parse().unwrap();
        let mut p = Partition::with_single_block_size(wide);
        assert_eq!(p.count(), &(BigUint::from(1u128 << 96) * 2u32));
        let first: Vec<String> = p.iter().take(2).map(|v| v.to_string()).collect();
        assert_eq!(first, vec!["1::1", "1::2"]);
    }

    #[test]
    fn test_exhausted_after_for_each() {
        let mut p = Partition::with_spanning_blocks(ip("0.0.0.10-21"));
        let mut seen = 0;
        p.for_each(|_| seen += 1);
        assert_eq!(seen, 4);
        assert!(p.is_exhausted());
        p.for_each(|_| seen += 1);
        assert_eq!(seen, 4, "second for_each is a no-op");
        assert!(!p.iter().has_next());
    }

    #[test]
    fn test_iter_exhausts() {
        let mut p = Partition::with_spanning_blocks(ip("10.0.0.1"));
        let mut it = p.iter();
        assert!(it.has_next());
        assert_eq!(it.next(), Some(ip("10.0.0.1")));
        assert!(!it.has_next());
        assert!(p.is_exhausted());
        assert_eq!(p.iter().next(), None);
    }

    #[test]
    fn test_predicates() {
        let is_small = |v: &Ipv4Address| v.prefix_len().is_some_and(|len| len >= 31);

        assert!(!Partition::with_spanning_blocks(ip("0.0.0.10-21")).predicate_for_each(is_small));
        assert!(Partition::with_spanning_blocks(ip("0.0.0.10-21")).predicate_for_any(is_small));

        let mut calls = 0;
        let all = Partition::with_spanning_blocks(ip("0.0.0.10-21")).predicate_for_each_early(|v| {
            calls += 1;
            is_small(v)
        });
        assert!(!all);
        assert_eq!(calls, 2, "stops at the first /30");

        let mut calls = 0;
        let any = Partition::with_spanning_blocks(ip("0.0.0.10-21")).predicate_for_any_early(|v| {
            calls += 1;
            is_small(v)
        });
        assert!(any);
        assert_eq!(calls, 1);

        let mut calls = 0;
        Partition::with_spanning_blocks(ip("0.0.0.10-21")).predicate_for_each(|v| {
            calls += 1;
            is_small(v)
        });
        assert_eq!(calls, 4);

        let mut exhausted = Partition::with_spanning_blocks(ip("10.0.0.1"));
        exhausted.for_each(|_| {});
        assert!(exhausted.predicate_for_each_early(|_| false));
        assert!(!exhausted.predicate_for_any_early(|_| true));
    }

    #[test]
    fn test_apply_for_each() {
        let mut p = Partition::with_spanning_blocks(ip("0.0.0.10-21"));
        let sizes = apply_for_each(&mut p, |block| block.count());
        assert_eq!(sizes.len(), 4);
        assert_eq!(sizes[&ip("0.0.0.12/30")], BigUint::from(4u32));

        let mut p = Partition::with_spanning_blocks(ip("0.0.0.10-21"));
        let pairs = apply_for_each_conditionally(&mut p, |block| {
            (block.to_string(), block.prefix_len() == Some(31))
        });
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[&ip("0.0.0.20/31")], "0.0.0.20/31");
        assert!(apply_for_each(&mut p, |_| 0).is_empty());
    }

    #[test]
    fn test_debug() {
        let mut p = Partition::with_spanning_blocks(ip("0.0.0.10-21"));
        assert_eq!(format!("{p:?}"), "Partition(0.0.0.10-21, 4 elements, lazy)");
        p.for_each(|_| {});
        assert_eq!(format!("{p:?}"), "Partition(0.0.0.10-21, 4 elements, exhausted)");
    }
}
