//! Segment-level text parsing.
//!
//! Each segment is a number, a `lo-hi` range or `*`, in the family radix.

use super::{max_value, AddressFamily};
use crate::error::AddressError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SEGMENT_RE: Regex =
        Regex::new(r"^(?:\*|([0-9A-Fa-f]+)(?:-([0-9A-Fa-f]+))?)$").expect("Invalid Regex?");
}

/// Split `text` on the family separator into `(lower, upper)` segment pairs.
pub(crate) fn parse_segments<F: AddressFamily>(
    text: &str,
) -> Result<Vec<(u32, u32)>, AddressError> {
    let segment_max = max_value(F::BITS_PER_SEGMENT) as u32;
    text.split(F::SEPARATOR)
        .map(|token| parse_segment(token.trim(), F::RADIX, segment_max))
        .collect()
}

fn parse_segment(token: &str, radix: u32, segment_max: u32) -> Result<(u32, u32), AddressError> {
    let caps = SEGMENT_RE
        .captures(token)
        .ok_or_else(|| AddressError::InvalidSegment(token.to_string()))?;
    let Some(lower) = caps.get(1) else {
        return Ok((0, segment_max));
    };
    let lower = parse_number(lower.as_str(), radix, token)?;
    let upper = match caps.get(2) {
        Some(upper) => parse_number(upper.as_str(), radix, token)?,
        None => lower,
    };
    Ok((lower, upper))
}

fn parse_number(digits: &str, radix: u32, token: &str) -> Result<u32, AddressError> {
    u32::from_str_radix(digits, radix).map_err(|_| AddressError::InvalidSegment(token.to_string()))
}
