//! The storage contract `IntervalSet` is written against.
//!
//! `IntervalSet` never looks at tree nodes. Everything it needs from its index (ordered
//! overlap search, the first overlapping entry matching a predicate, point lookup and ordered
//! traversal) is expressed here, so any ordered structure that can answer these queries can
//! stand in for [`IntervalMap`].

use crate::index::IndexType;
use crate::interval::Interval;
use crate::intervalmap::IntervalMap;

/// Boxed ascending iterator over the entries of a [`RangeIndex`].
pub type RangeIter<'a, T, V> = Box<dyn Iterator<Item = (&'a Interval<T>, &'a V)> + 'a>;

/// An ordered, range-queryable store of interval-value pairs.
///
/// Implementations do not check for overlaps; callers keep the stored intervals disjoint,
/// which makes [`find_covering`](RangeIndex::find_covering) well defined.
pub trait RangeIndex<T, V> {
    /// Store `value` under `interval`, returning the previous value stored under the same bounds.
    fn insert(&mut self, interval: Interval<T>, value: V) -> Option<V>;

    /// Remove the entry stored under exactly `interval`.
    fn remove(&mut self, interval: &Interval<T>) -> Option<V>;

    /// All entries intersecting `interval`, ascending.
    fn find_all_overlap(&self, interval: &Interval<T>) -> Vec<(&Interval<T>, &V)>;

    /// The first entry, ascending, intersecting `interval` whose value satisfies `predicate`.
    fn find_first_overlap<P>(&self, interval: &Interval<T>, predicate: P) -> Option<(&Interval<T>, &V)>
    where
        P: FnMut(&V) -> bool;

    /// The entry whose interval contains `point`.
    fn find_covering(&self, point: &T) -> Option<(&Interval<T>, &V)>;

    /// Every entry, ascending.
    fn iter(&self) -> RangeIter<'_, T, V>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Checks if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    fn clear(&mut self);
}

impl<T, V, Ix> RangeIndex<T, V> for IntervalMap<T, V, Ix>
where
    T: Ord,
    Ix: IndexType,
{
    #[inline]
    fn insert(&mut self, interval: Interval<T>, value: V) -> Option<V> {
        IntervalMap::insert(self, interval, value)
    }

    #[inline]
    fn remove(&mut self, interval: &Interval<T>) -> Option<V> {
        IntervalMap::remove(self, interval)
    }

    #[inline]
    fn find_all_overlap(&self, interval: &Interval<T>) -> Vec<(&Interval<T>, &V)> {
        IntervalMap::find_all_overlap(self, interval)
    }

    #[inline]
    fn find_first_overlap<P>(&self, interval: &Interval<T>, predicate: P) -> Option<(&Interval<T>, &V)>
    where
        P: FnMut(&V) -> bool,
    {
        IntervalMap::find_first_overlap(self, interval, predicate)
    }

    #[inline]
    fn find_covering(&self, point: &T) -> Option<(&Interval<T>, &V)> {
        IntervalMap::find_covering(self, point)
    }

    #[inline]
    fn iter(&self) -> RangeIter<'_, T, V> {
        Box::new(IntervalMap::iter(self))
    }

    #[inline]
    fn len(&self) -> usize {
        IntervalMap::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        IntervalMap::clear(self);
    }
}
