//! Lazy producers over the members of a value.
//!
//! All three iterators walk an odometer of bit fields, so memory stays
//! constant however many addresses the value holds.

use super::value::segment_bounds;
use super::{host_mask, max_value, AddressValue};

/// One bit field of the odometer, most significant first.
#[derive(Debug, Clone, Copy)]
struct Digit {
    shift: u32,
    width: u8,
    lower: u128,
    upper: u128,
}

#[derive(Debug, Clone)]
struct Odometer {
    digits: Vec<Digit>,
    current: Option<u128>,
}

impl Odometer {
    fn new(digits: Vec<Digit>) -> Self {
        let start = digits
            .iter()
            .fold(0u128, |acc, digit| acc | (digit.lower << digit.shift));
        Odometer {
            digits,
            current: Some(start),
        }
    }

    /// Return the current position and step to the next one.
    fn advance(&mut self) -> Option<u128> {
        let value = self.current.take()?;
        let mut next = value;
        for digit in self.digits.iter().rev() {
            let mask = max_value(digit.width) << digit.shift;
            let field = (next & mask) >> digit.shift;
            if field < digit.upper {
                self.current = Some((next & !mask) | ((field + 1) << digit.shift));
                break;
            }
            // carry
            next = (next & !mask) | (digit.lower << digit.shift);
        }
        Some(value)
    }
}

fn segment_shift<T: AddressValue>(value: &T, index: usize) -> u32 {
    (value.segment_count() - 1 - index) as u32 * value.bits_per_segment() as u32
}

fn segment_digits<T: AddressValue>(value: &T, segments: usize) -> Vec<Digit> {
    (0..segments)
        .map(|i| {
            let (lower, upper) = segment_bounds(value, i);
            Digit {
                shift: segment_shift(value, i),
                width: value.bits_per_segment(),
                lower,
                upper,
            }
        })
        .collect()
}

/// Ascending individual addresses of a value.
#[derive(Debug, Clone)]
pub struct AddressIterator<T> {
    template: T,
    odometer: Odometer,
}

impl<T: AddressValue> AddressIterator<T> {
    pub fn new(value: T) -> Self {
        let odometer = Odometer::new(segment_digits(&value, value.segment_count()));
        AddressIterator {
            template: value,
            odometer,
        }
    }
}

impl<T: AddressValue> Iterator for AddressIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = self.odometer.advance()?;
        Some(self.template.with_bounds(value, value, None))
    }
}

/// Ascending distinct prefix blocks of one length touched by a value.
#[derive(Debug, Clone)]
pub struct PrefixBlockIterator<T> {
    template: T,
    len: u8,
    odometer: Odometer,
}

impl<T: AddressValue> PrefixBlockIterator<T> {
    pub fn new(value: T, len: u8) -> Self {
        let len = len.min(value.bit_count());
        let bits_per_segment = value.bits_per_segment();
        let mut digits = Vec::new();
        for i in 0..value.segment_count() {
            let segment_start = i as u32 * bits_per_segment as u32;
            if segment_start >= len as u32 {
                break;
            }
            let prefix_bits = (len as u32 - segment_start).min(bits_per_segment as u32) as u8;
            let host_bits = bits_per_segment - prefix_bits;
            let (lower, upper) = segment_bounds(&value, i);
            digits.push(Digit {
                shift: segment_shift(&value, i) + host_bits as u32,
                width: prefix_bits,
                lower: lower >> host_bits,
                upper: upper >> host_bits,
            });
        }
        PrefixBlockIterator {
            template: value,
            len,
            odometer: Odometer::new(digits),
        }
    }
}

impl<T: AddressValue> Iterator for PrefixBlockIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let network = self.odometer.advance()?;
        let host = host_mask(self.template.bit_count(), self.len);
        Some(
            self.template
                .with_bounds(network, network | host, Some(self.len)),
        )
    }
}

/// Ascending segment-sequential blocks that together make up a value.
#[derive(Debug, Clone)]
pub struct SequentialBlockIterator<T> {
    template: T,
    tail_mask: u128,
    odometer: Odometer,
}

impl<T: AddressValue> SequentialBlockIterator<T> {
    pub fn new(value: T) -> Self {
        let index = value.sequential_block_index();
        let tail_bits = (value.segment_count() - index) as u32 * value.bits_per_segment() as u32;
        let tail_mask = max_value(tail_bits.min(128) as u8);
        let odometer = Odometer::new(segment_digits(&value, index));
        SequentialBlockIterator {
            template: value,
            tail_mask,
            odometer,
        }
    }
}

impl<T: AddressValue> Iterator for SequentialBlockIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let head = self.odometer.advance()?;
        let lower = head | (self.template.lower_value() & self.tail_mask);
        let upper = head | (self.template.upper_value() & self.tail_mask);
        Some(self.template.with_bounds(lower, upper, None))
    }
}
