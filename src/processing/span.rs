//! Spanning a numeric range with blocks.
//!
//! Two decompositions of `[lower, upper]`:
//! - CIDR prefix blocks, the largest aligned block at each step
//! - segment-sequential blocks, contiguous but not power-of-two aligned

use crate::models::{lo_mask, max_value, AddressValue};

/// Longest block length at `start` that stays within `upper`.
///
/// The returned prefix length is constrained by:
/// 1. The alignment of `start` - it must be the network address of the block
/// 2. Coverage - the block must end at or before `upper`
pub(crate) fn find_biggest_block(start: u128, upper: u128, bit_count: u8) -> u8 {
    debug_assert!(start <= upper, "start[{start:#x}] > upper[{upper:#x}]");

    let min_len_for_alignment = lo_mask(start, bit_count);

    // Largest k with 2^k <= upper - start + 1.
    let width = upper - start;
    let host_bits = match width.checked_add(1) {
        Some(size) => (127 - size.leading_zeros()) as u8,
        None => 128,
    };
    let min_len_for_coverage = bit_count - host_bits.min(bit_count);

    min_len_for_alignment.max(min_len_for_coverage)
}

/// Whether `[lower, upper]` is a non-inverted range within `template`'s family.
fn valid_bounds<T: AddressValue>(template: &T, lower: u128, upper: u128) -> bool {
    if lower > upper || upper > max_value(template.bit_count()) {
        log::warn!(
            "ignoring bounds {:#x}-{:#x}: inverted or wider than {} bits",
            lower,
            upper,
            template.bit_count()
        );
        return false;
    }
    true
}

/// Minimal ascending list of CIDR blocks whose union is exactly `[lower, upper]`.
///
/// Blocks are built with `template`'s family and carry their prefix length.
/// Inverted bounds, or bounds beyond the family width, give an empty list.
pub fn span_with_prefix_blocks<T: AddressValue>(
    template: &T,
    lower: u128,
    upper: u128,
) -> Vec<T> {
    if !valid_bounds(template, lower, upper) {
        return Vec::new();
    }
    let bit_count = template.bit_count();
    log::debug!(
        "span_with_prefix_blocks({:#x}, {:#x}) over {} bits",
        lower,
        upper,
        bit_count
    );

    let mut blocks = Vec::new();
    let mut next = Some(lower);
    while let Some(start) = next.filter(|start| *start <= upper) {
        let len = find_biggest_block(start, upper, bit_count);
        let end = start | max_value(bit_count - len);
        let block = template.with_bounds(start, end, Some(len));
        log::trace!("  block {block}");
        blocks.push(block);
        next = end.checked_add(1);
    }
    blocks
}

/// Minimal ascending list of segment-sequential blocks covering `[lower, upper]`.
///
/// Each block fixes every segment above one varying segment and leaves every
/// segment below it full, so it is expressible segment by segment. Partial
/// runs at either end are split recursively, one segment deeper each time.
/// Inverted bounds, or bounds beyond the family width, give an empty list.
pub fn span_with_sequential_blocks<T: AddressValue>(
    template: &T,
    lower: u128,
    upper: u128,
) -> Vec<T> {
    if !valid_bounds(template, lower, upper) {
        return Vec::new();
    }
    log::debug!("span_with_sequential_blocks({:#x}, {:#x})", lower, upper);
    let mut blocks = Vec::new();
    split_sequential(template, lower, upper, &mut blocks);
    blocks
}

fn split_sequential<T: AddressValue>(template: &T, lower: u128, upper: u128, out: &mut Vec<T>) {
    if lower == upper {
        out.push(template.with_bounds(lower, upper, None));
        return;
    }

    // Bits below the most significant segment where the endpoints differ.
    let bits_per_segment = template.bits_per_segment() as u32;
    let differing_bits = 128 - (lower ^ upper).leading_zeros();
    let tail_bits = (differing_bits - 1) / bits_per_segment * bits_per_segment;
    let tail = max_value(tail_bits as u8);

    let lower_tail_zero = lower & tail == 0;
    let upper_tail_full = upper & tail == tail;
    if lower_tail_zero && upper_tail_full {
        log::trace!("  sequential block {:#x}-{:#x}", lower, upper);
        out.push(template.with_bounds(lower, upper, None));
        return;
    }

    // The differing segment of lower is below that of upper, so neither
    // step below carries or borrows out of it.
    let mut start = lower;
    if !lower_tail_zero {
        split_sequential(template, lower, lower | tail, out);
        start = (lower | tail) + 1;
    }
    let upper_head = upper & !tail;
    let end = if upper_tail_full { upper } else { upper_head - 1 };
    if start <= end {
        out.push(template.with_bounds(start, end, None));
    }
    if !upper_tail_full {
        split_sequential(template, upper_head, upper, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ipv4Address, Ipv6Address};

    fn ip(text: &str) -> Ipv4Address {
        text.parse().unwrap()
    }

    fn prefix_span(lower: &str, upper: &str) -> Vec<String> {
        let (lower, upper) = (ip(lower), ip(upper));
        span_with_prefix_blocks(&lower, lower.lower_value(), upper.lower_value())
            .iter()
            .map(|b| b.to_string())
            .collect()
    }

    fn sequential_span(lower: &str, upper: &str) -> Vec<String> {
        let (lower, upper) = (ip(lower), ip(upper));
        span_with_sequential_blocks(&lower, lower.lower_value(), upper.lower_value())
            .iter()
            .map(|b| b.to_string())
            .collect()
    }

    #[test]
    fn test_find_biggest_block() {
        // 10.0.0.0 up to 10.11.16.255 fits a /13
        assert_eq!(13, find_biggest_block(0x0A00_0000, 0x0A0B_10FF, 32));
        // 10.6.2.80 can only start a /28 or smaller
        assert_eq!(28, find_biggest_block(0x0A06_0250, 0x0A06_07FF, 32));
        assert_eq!(32, find_biggest_block(0x0A06_0250, 0x0A06_0250, 32));
        assert_eq!(0, find_biggest_block(0, u32::MAX as u128, 32));
        assert_eq!(0, find_biggest_block(0, u128::MAX, 128));
    }

    #[test]
    fn test_span_to_254() {
        assert_eq!(
            prefix_span("0.0.0.0", "0.0.0.254"),
            vec![
                "0.0.0.0/25",
                "0.0.0.128/26",
                "0.0.0.192/27",
                "0.0.0.224/28",
                "0.0.0.240/29",
                "0.0.0.248/30",
                "0.0.0.252/31",
                "0.0.0.254/32"
            ]
        );
    }

    #[test]
    fn test_span_10_to_21() {
        assert_eq!(
            prefix_span("0.0.0.10", "0.0.0.21"),
            vec!["0.0.0.10/31", "0.0.0.12/30", "0.0.0.16/30", "0.0.0.20/31"]
        );
    }

    #[test]
    fn test_span_whole_families() {
        assert_eq!(prefix_span("0.0.0.0", "255.255.255.255"), vec!["0.0.0.0/0"]);
        assert_eq!(prefix_span("255.255.255.255", "255.255.255.255"), vec!["255.255.255.255/32"]);

        let zero: Ipv6Address = "::".parse().unwrap();
        let blocks = span_with_prefix_blocks(&zero, 0, u128::MAX);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].to_string(), "::/0");

        let blocks = span_with_prefix_blocks(&zero, 1, u128::MAX);
        assert_eq!(blocks.len(), 128);
        assert_eq!(blocks[127].to_string(), "8000::/1");
    }

    #[test]
    fn test_span_rejects_bad_bounds() {
        let zero = ip("0.0.0.0");
        assert!(span_with_prefix_blocks(&zero, 5, 3).is_empty());
        assert!(span_with_sequential_blocks(&zero, 5, 3).is_empty());
        assert!(span_with_prefix_blocks(&zero, 0, 1 << 40).is_empty());
        assert!(span_with_sequential_blocks(&zero, 0, 1 << 40).is_empty());

        let top = u32::MAX as u128;
        assert_eq!(span_with_prefix_blocks(&zero, top, top).len(), 1);
        assert_eq!(span_with_sequential_blocks(&zero, 0, top).len(), 1);
    }

    #[test]
    fn test_sequential_span() {
        assert_eq!(
            sequential_span("1.2.3.4", "1.3.5.6"),
            vec!["1.2.3.4-255", "1.2.4-255.*", "1.3.0-4.*", "1.3.5.0-6"]
        );
        assert_eq!(sequential_span("1.2.3.4", "1.2.3.4"), vec!["1.2.3.4"]);
        assert_eq!(sequential_span("1.2.0.0", "1.3.255.255"), vec!["1.2-3.*.*"]);
        assert_eq!(
            sequential_span("1.2.3.0", "1.2.5.255"),
            vec!["1.2.3-5.*"],
            "aligned ends need no clipping"
        );
        assert_eq!(
            sequential_span("1.2.3.4", "1.2.4.255"),
            vec!["1.2.3.4-255", "1.2.4.*"]
        );
    }
}
