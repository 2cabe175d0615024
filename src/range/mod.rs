//! Sequential address ranges.
//!
//! - [`SequentialRange`] - inclusive `[lower, upper]` interval
//! - [`iter`] - pull iterators over addresses and prefix blocks of a range
//! - [`set_ops`] - overlap, intersect, join, extend and subtract

mod iter;
mod sequential;
mod set_ops;

pub use iter::{RangeIterator, RangePrefixBlockIterator, RangePrefixIterator};
pub use sequential::SequentialRange;
