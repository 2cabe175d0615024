//! Property tests for spanning, merging and range set operations.

use address_span::{
    merge_to_prefix_blocks, merge_to_sequential_blocks, AddressValue, Ipv4Address, Ipv6Address,
    SequentialRange,
};
use num_bigint::BigUint;
use proptest::prelude::*;

fn arb_v4() -> impl Strategy<Value = Ipv4Address> {
    any::<u32>().prop_map(|v| Ipv4Address::single(v as u128).unwrap())
}

fn arb_v4_range() -> impl Strategy<Value = SequentialRange<Ipv4Address>> {
    (arb_v4(), arb_v4()).prop_map(|(a, b)| SequentialRange::new(&a, &b))
}

fn arb_v4_block() -> impl Strategy<Value = Ipv4Address> {
    (any::<u32>(), 8u8..=32)
        .prop_map(|(v, len)| Ipv4Address::prefix_block(v as u128, len).unwrap())
}

fn arb_v6_range() -> impl Strategy<Value = SequentialRange<Ipv6Address>> {
    (any::<u128>(), any::<u128>()).prop_map(|(a, b)| {
        let a = Ipv6Address::single(a).unwrap();
        let b = Ipv6Address::single(b).unwrap();
        SequentialRange::new(&a, &b)
    })
}

fn total<T: AddressValue>(values: &[T]) -> BigUint {
    values.iter().map(|v| v.count()).sum()
}

/// Blocks are ascending, gap free and start at `lower`, ending at `upper`.
fn tiles<T: AddressValue>(blocks: &[T], lower: u128, upper: u128) -> bool {
    let mut next = Some(lower);
    for block in blocks {
        if next != Some(block.lower_value()) {
            return false;
        }
        next = block.upper_value().checked_add(1);
    }
    blocks.last().map(|b| b.upper_value()) == Some(upper)
}

proptest! {
    /// Prefix spanning tiles the range exactly with aligned blocks
    #[test]
    fn prefix_span_tiles_range(range in arb_v4_range()) {
        let lower = range.lower().unwrap().lower_value();
        let upper = range.upper().unwrap().lower_value();
        let blocks = range.span_with_prefix_blocks();
        prop_assert!(tiles(&blocks, lower, upper));
        prop_assert!(blocks.iter().all(|b| b.is_single_prefix_block()));
        prop_assert_eq!(total(&blocks), range.count());
        prop_assert!(blocks.len() <= 62);
    }

    /// A prefix span cannot be merged any further
    #[test]
    fn prefix_span_is_minimal(range in arb_v4_range()) {
        let blocks = range.span_with_prefix_blocks();
        prop_assert_eq!(merge_to_prefix_blocks(&blocks), blocks);
    }

    #[test]
    fn sequential_span_tiles_range(range in arb_v4_range()) {
        let lower = range.lower().unwrap().lower_value();
        let upper = range.upper().unwrap().lower_value();
        let blocks = range.span_with_sequential_blocks();
        prop_assert!(tiles(&blocks, lower, upper));
        prop_assert!(blocks.iter().all(|b| b.is_sequential() && !b.is_prefixed()));
        prop_assert!(blocks.len() <= 7);
    }

    #[test]
    fn ipv6_span_counts_match(range in arb_v6_range()) {
        let blocks = range.span_with_prefix_blocks();
        prop_assert_eq!(total(&blocks), range.count());
        prop_assert!(blocks.len() <= 254);
    }

    /// Merging preserves the union, is minimal and is idempotent
    #[test]
    fn merge_preserves_union(values in prop::collection::vec(arb_v4_block(), 0..12)) {
        let merged = merge_to_prefix_blocks(&values);
        let ranges = SequentialRange::join_all(values.iter().map(|v| v.to_sequential_range()));
        let union: BigUint = ranges.iter().map(|r| r.count()).sum();
        prop_assert_eq!(total(&merged), union);
        prop_assert!(merged.windows(2).all(|w| w[0].upper_value() < w[1].lower_value()));
        prop_assert!(values.iter().all(|v| merged.iter().any(|m| m.contains(v))));
        prop_assert_eq!(merge_to_prefix_blocks(&merged), merged.clone());

        // no fewer blocks exist than the spans of the joined union
        let spanned: Vec<Ipv4Address> =
            ranges.iter().flat_map(|r| r.span_with_prefix_blocks()).collect();
        prop_assert_eq!(merged.clone(), spanned);

        let sequential = merge_to_sequential_blocks(&values);
        prop_assert_eq!(total(&sequential), total(&merged));
    }

    /// Join gives disjoint, non-adjacent ranges covering every input
    #[test]
    fn join_is_disjoint(ranges in prop::collection::vec(arb_v4_range(), 0..8)) {
        let joined = SequentialRange::join_all(ranges.clone());
        for pair in joined.windows(2) {
            let upper = pair[0].upper().unwrap().lower_value();
            let lower = pair[1].lower().unwrap().lower_value();
            prop_assert!(upper + 1 < lower);
        }
        prop_assert!(ranges.iter().all(|r| joined.iter().any(|j| j.contains_range(r))));
    }

    /// Subtracting splits a range into its intersection and remainder
    #[test]
    fn subtract_and_intersect_partition(a in arb_v4_range(), b in arb_v4_range()) {
        let remainder = a.subtract(&b);
        prop_assert!(remainder.len() <= 2);
        prop_assert!(remainder.iter().all(|r| a.contains_range(r) && !r.overlaps(&b)));
        let rest: BigUint = remainder.iter().map(|r| r.count()).sum();
        prop_assert_eq!(rest + a.intersect(&b).count(), a.count());
    }
}
