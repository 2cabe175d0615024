//! Interval algebra over sequential ranges.
//!
//! Ranges of different families never overlap, join or extend one another.

use super::SequentialRange;
use crate::models::AddressValue;
use itertools::Itertools;

impl<T: AddressValue> SequentialRange<T> {
    pub fn overlaps(&self, other: &Self) -> bool {
        match (self.values(), other.values()) {
            (Some((lower, upper)), Some((other_lower, other_upper))) => {
                self.same_family(other) && lower <= other_upper && upper >= other_lower
            }
            _ => false,
        }
    }

    /// The shared part of both ranges, or the empty range if there is none.
    pub fn intersect(&self, other: &Self) -> Self {
        match (self.template(), self.values(), other.values()) {
            (Some(template), Some((lower, upper)), Some((other_lower, other_upper)))
                if self.overlaps(other) =>
            {
                Self::from_values(template, lower.max(other_lower), upper.min(other_upper))
            }
            _ => Self::empty(),
        }
    }

    /// Whether the two ranges overlap or sit directly next to each other.
    fn touches(&self, other: &Self) -> bool {
        match (self.values(), other.values()) {
            (Some((lower, upper)), Some((other_lower, other_upper))) => {
                self.same_family(other)
                    && (self.overlaps(other)
                        || upper.checked_add(1) == Some(other_lower)
                        || other_upper.checked_add(1) == Some(lower))
            }
            _ => false,
        }
    }

    /// Union of two ranges when it is itself a single range.
    pub fn join_to(&self, other: &Self) -> Option<Self> {
        if self.touches(other) {
            self.extend(other)
        } else {
            None
        }
    }

    /// Join `self` with `others` into the fewest disjoint ranges, ascending.
    ///
    /// Overlapping and adjacent ranges merge.
    pub fn join(&self, others: &[Self]) -> Vec<Self> {
        Self::join_all(std::iter::once(self.clone()).chain(others.iter().cloned()))
    }

    /// Join any collection of ranges into the fewest disjoint ranges, ascending.
    pub fn join_all<I>(ranges: I) -> Vec<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut ranges: Vec<Self> = ranges.into_iter().filter(|r| !r.is_empty()).collect();
        let input_count = ranges.len();
        ranges.sort_by(|a, b| a.lower().cmp(&b.lower()).then_with(|| a.upper().cmp(&b.upper())));
        let joined: Vec<Self> = ranges
            .into_iter()
            .coalesce(|running, next| running.join_to(&next).ok_or((running, next)))
            .collect();
        log::debug!("join_all: {} ranges -> {} ranges", input_count, joined.len());
        joined
    }

    /// Smallest range covering both, gaps included.
    ///
    /// `None` when the families differ; the empty range acts as identity.
    pub fn extend(&self, other: &Self) -> Option<Self> {
        match (self.template(), self.values(), other.values()) {
            (_, None, _) => Some(other.clone()),
            (_, _, None) => Some(self.clone()),
            (Some(template), Some((lower, upper)), Some((other_lower, other_upper))) => {
                if !self.same_family(other) {
                    log::warn!("cannot extend {self} with {other}: different families");
                    return None;
                }
                Some(Self::from_values(
                    template,
                    lower.min(other_lower),
                    upper.max(other_upper),
                ))
            }
            _ => None,
        }
    }

    /// The parts of `self` not in `other`: zero, one or two ranges, ascending.
    pub fn subtract(&self, other: &Self) -> Vec<Self> {
        let (Some(template), Some((lower, upper))) = (self.template(), self.values()) else {
            return Vec::new();
        };
        let Some((other_lower, other_upper)) = other.values().filter(|_| self.overlaps(other))
        else {
            return vec![self.clone()];
        };
        let mut remainder = Vec::with_capacity(2);
        if other_lower > lower {
            remainder.push(Self::from_values(template, lower, other_lower - 1));
        }
        if other_upper < upper {
            remainder.push(Self::from_values(template, other_upper + 1, upper));
        }
        remainder
    }
}
