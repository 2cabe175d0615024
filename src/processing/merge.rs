//! Merging collections of addresses into canonical block lists.
//!
//! Inputs may overlap, repeat, arrive unsorted and mix prefixed and
//! unprefixed values. Values of different families are kept apart.

use crate::models::{max_value, AddressValue};
use crate::range::SequentialRange;

/// Summarize `values` into the fewest non-overlapping CIDR blocks covering
/// exactly their union, ascending.
///
/// Every input is first spanned into prefix blocks. Blocks are then sorted and
/// pushed onto a stack; a block inside the top is dropped, a block holding the
/// top replaces it, and whenever the top two are sibling halves of one parent
/// they collapse into that parent. Re-merging the result returns it unchanged.
///
/// # Examples
/// ```
/// use address_span::models::Ipv4Address;
/// use address_span::processing::merge_to_prefix_blocks;
///
/// let values: Vec<Ipv4Address> = ["10.0.0.0/25", "10.0.0.128/25", "10.0.0.7"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// let merged = merge_to_prefix_blocks(&values);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].to_string(), "10.0.0.0/24");
/// ```
pub fn merge_to_prefix_blocks<T: AddressValue>(values: &[T]) -> Vec<T> {
    let mut blocks: Vec<T> = values
        .iter()
        .flat_map(|value| value.span_with_prefix_blocks())
        .collect();
    let spanned_count = blocks.len();

    // Dedup must be sorted first
    blocks.sort();
    blocks.dedup();

    let mut merged: Vec<T> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if merged.last().is_some_and(|top| top.contains(&block)) {
            continue;
        }
        while merged.last().is_some_and(|top| block.contains(top)) {
            merged.pop();
        }
        merged.push(block);
        collapse_siblings(&mut merged);
    }

    log::debug!(
        "merge_to_prefix_blocks: {} values, {} spanned blocks -> {} blocks",
        values.len(),
        spanned_count,
        merged.len()
    );
    merged
}

/// Collapse the top of the stack while its two highest blocks are siblings.
fn collapse_siblings<T: AddressValue>(stack: &mut Vec<T>) {
    while stack.len() >= 2 {
        let parent = match sibling_parent(&stack[stack.len() - 2], &stack[stack.len() - 1]) {
            Some(parent) => parent,
            None => break,
        };
        log::trace!("  collapse into {parent}");
        stack.truncate(stack.len() - 2);
        stack.push(parent);
    }
}

/// The parent block when `low` and `high` are the two halves of one block.
fn sibling_parent<T: AddressValue>(low: &T, high: &T) -> Option<T> {
    if !low.same_family(high) {
        return None;
    }
    let len = low.prefix_len().filter(|len| *len > 0 && Some(*len) == high.prefix_len())?;
    let bit_count = low.bit_count();
    let half = max_value(bit_count - len) + 1;
    let siblings = low.is_single_prefix_block()
        && high.is_single_prefix_block()
        && low.lower_value() ^ high.lower_value() == half
        && low.lower_value() & half == 0;
    siblings.then(|| low.to_prefix_block_len(len - 1))
}

/// Union of `values` as the fewest segment-sequential blocks, ascending.
pub fn merge_to_sequential_blocks<T: AddressValue>(values: &[T]) -> Vec<T> {
    let ranges = values.iter().flat_map(|value| {
        value
            .sequential_block_iter()
            .map(|block| SequentialRange::from_value(&block))
    });
    let blocks: Vec<T> = SequentialRange::join_all(ranges)
        .iter()
        .flat_map(|range| range.span_with_sequential_blocks())
        .collect();
    log::debug!(
        "merge_to_sequential_blocks: {} values -> {} blocks",
        values.len(),
        blocks.len()
    );
    blocks
}
