//! `rb_interval_set` keeps tagged, non-overlapping intervals on top of an interval tree.
//!
//! An [`IntervalSet`] stores inclusive integer ranges, each carrying a piece of data. Adding a
//! range overwrites the data of whatever it overlaps, splitting the old intervals where needed,
//! and fills the parts that were not covered before. Touching intervals with equal data are
//! always fused, so the set never holds two descriptions of the same coverage.
//!
//! The intervals live in an [`IntervalMap`], a red-black interval tree which ensures each
//! insertion, deletion and point lookup takes at most O(logN) time. The tree uses arrays to
//! simulate pointers for the parent-child references, which keeps it `Send` and `Unpin`.
//! `IntervalSet` only talks to it through the [`RangeIndex`] trait, so another ordered index
//! can be plugged in with [`IntervalSet::with_index`].
//!
//! Every insert into and delete from the tree done by the set, including the ones produced by
//! splits and merges, is reported to the callbacks registered with [`IntervalSet::subscribe`].
//!
//! # Example
//!
//! ```rust
//! use rb_interval_set::{Interval, IntervalSet};
//!
//! let mut set = IntervalSet::new();
//! set.add(0, 1, 'a').unwrap();
//! set.add(2, 5, 'b').unwrap();
//! set.add(6, 8, 'a').unwrap();
//! assert_eq!(set.len(), 3);
//!
//! set.add(2, 5, 'a').unwrap();
//! assert_eq!(set.list(), vec![(&Interval::new(0, 8), &'a')]);
//!
//! set.remove(0, 10).unwrap();
//! assert!(set.is_empty());
//! ```
//!

mod error;
mod event;
mod index;
mod interval;
mod intervalmap;
mod intervalset;
mod iter;
mod node;
mod range_index;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use event::Event;
pub use index::{DefaultIx, IndexType};
pub use interval::{Interval, Step};
pub use intervalmap::IntervalMap;
pub use intervalset::IntervalSet;
pub use iter::{FilterIter, IntoIter, Iter};
pub use range_index::{RangeIndex, RangeIter};
