use std::fmt;

use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::event::{Event, Subscribers};
use crate::index::IndexType;
use crate::interval::{Interval, Step};
use crate::intervalmap::IntervalMap;
use crate::iter::IntoIter;
use crate::range_index::{RangeIndex, RangeIter};

/// A set of tagged, pairwise disjoint intervals.
///
/// Adding a range overwrites whatever data was stored under it and leaves the data outside of
/// it alone. Touching intervals whose data compare equal are fused, so the stored intervals are
/// always the smallest description of the coverage.
///
/// Data is compared with the function given at construction, `PartialEq` by default. It is
/// expected to behave like an equivalence relation.
///
/// # Example
///
/// ```rust
/// use rb_interval_set::{Interval, IntervalSet};
///
/// let mut set = IntervalSet::new();
/// set.add(0, 4, 'a').unwrap();
/// set.add(10, 16, 'b').unwrap();
/// set.add(5, 8, 'a').unwrap();
/// assert_eq!(
///     set.list(),
///     vec![(&Interval::new(0, 8), &'a'), (&Interval::new(10, 16), &'b')]
/// );
/// ```
pub struct IntervalSet<T, V, E = fn(&V, &V) -> bool, M = IntervalMap<T, V>> {
    /// Ordered storage of the intervals
    index: M,
    /// Data equality
    equals: E,
    /// Observers of index mutations
    subscribers: Subscribers<T, V>,
}

impl<T, V> IntervalSet<T, V>
where
    T: Ord,
    V: PartialEq,
{
    /// Create an empty `IntervalSet` comparing data with `PartialEq`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_equals(<V as PartialEq>::eq)
    }
}

impl<T, V> Default for IntervalSet<T, V>
where
    T: Ord,
    V: PartialEq,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V, E> IntervalSet<T, V, E>
where
    T: Ord,
    E: Fn(&V, &V) -> bool,
{
    /// Create an empty `IntervalSet` comparing data with `equals`
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::IntervalSet;
    ///
    /// let mut set = IntervalSet::with_equals(|a: &String, b: &String| a.eq_ignore_ascii_case(b));
    /// set.add(0, 1, "tag".to_string()).unwrap();
    /// set.add(2, 3, "TAG".to_string()).unwrap();
    /// assert_eq!(set.len(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_equals(equals: E) -> Self {
        Self::with_index(IntervalMap::new(), equals)
    }
}

impl<T, V, E, M> IntervalSet<T, V, E, M>
where
    M: RangeIndex<T, V>,
{
    /// Create an `IntervalSet` on top of another `RangeIndex`.
    ///
    /// # Panics
    ///
    /// This method panics when `index` is not empty
    #[inline]
    pub fn with_index(index: M, equals: E) -> Self {
        assert!(index.is_empty(), "index must start empty");
        Self {
            index,
            equals,
            subscribers: Subscribers::new(),
        }
    }

    /// Register a callback for every insert into and delete from the underlying index
    ///
    /// # Example
    /// ```rust
    /// use std::sync::{Arc, Mutex};
    /// use rb_interval_set::IntervalSet;
    ///
    /// let log = Arc::new(Mutex::new(Vec::new()));
    /// let mut set = IntervalSet::new();
    /// let sink = Arc::clone(&log);
    /// set.subscribe(move |event| sink.lock().unwrap().push(event.is_insert()));
    /// set.add(0, 1, ()).unwrap();
    /// set.remove(0, 1).unwrap();
    /// assert_eq!(*log.lock().unwrap(), vec![true, false]);
    /// ```
    #[inline]
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(Event<'_, T, V>) + Send + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Get an iterator over the stored intervals, sorted by lower bound.
    #[inline]
    pub fn iter(&self) -> RangeIter<'_, T, V> {
        self.index.iter()
    }

    /// Collect the stored intervals, sorted by lower bound.
    #[inline]
    pub fn list(&self) -> Vec<(&Interval<T>, &V)> {
        self.iter().collect()
    }

    /// Return the number of stored intervals.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Return `true` if no interval is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Return the interval containing `point`, with its data.
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Interval, IntervalSet};
    ///
    /// let mut set = IntervalSet::new();
    /// set.add(10, 20, "a").unwrap();
    /// assert_eq!(set.get(&15), Some((&Interval::new(10, 20), &"a")));
    /// assert_eq!(set.get(&21), None);
    /// ```
    #[inline]
    pub fn get(&self, point: &T) -> Option<(&Interval<T>, &V)> {
        self.index.find_covering(point)
    }
}

impl<T, V, E, M> IntervalSet<T, V, E, M>
where
    T: Step,
    V: Clone,
    E: Fn(&V, &V) -> bool,
    M: RangeIndex<T, V>,
{
    /// Tag `[from, to]` with `value`.
    ///
    /// Overlapped intervals carrying other data are split and the overlapped part takes the new
    /// value. Uncovered parts of the range are filled, and the result is fused with touching
    /// neighbours that carry equal data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] without changing the set when `from > to`.
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Interval, IntervalSet};
    ///
    /// let mut set = IntervalSet::new();
    /// set.add(0, 1, 'a').unwrap();
    /// set.add(1, 2, 'b').unwrap();
    /// assert_eq!(
    ///     set.list(),
    ///     vec![(&Interval::new(0, 0), &'a'), (&Interval::new(1, 2), &'b')]
    /// );
    /// assert!(set.add(3, 2, 'c').is_err());
    /// ```
    pub fn add(&mut self, from: T, to: T, value: V) -> Result<()> {
        let interval = Interval::try_new(from, to)?;

        // Overwrite every overlapped interval whose data differs, left to right. Everything up
        // to the end of the last overwritten zone is resolved, so the search resumes after it.
        let mut conflicts = 0_usize;
        let mut cursor = Some(interval.from.clone());
        while let Some(start) = cursor.take().filter(|start| start <= &interval.to) {
            let window = Interval {
                from: start,
                to: interval.to.clone(),
            };
            let Some(conflict) = self.first_conflict(&window, &value) else {
                break;
            };
            cursor = conflict.to.clone().min(interval.to.clone()).successor();
            self.overwrite(conflict, &interval, &value);
            conflicts = conflicts.wrapping_add(1);
        }

        // Everything still overlapping the range carries equal data now; fill what is left.
        let gaps = self.uncovered(&interval);
        let filled = gaps.len();
        for gap in gaps {
            trace!("filling uncovered gap");
            self.insert_entry(gap.clone(), value.clone());
            self.try_merge(gap);
        }

        debug!(
            "add: overwrote {} conflicting intervals, filled {} gaps, {} intervals stored",
            conflicts,
            filled,
            self.len()
        );
        Ok(())
    }

    /// Drop all coverage of `[from, to]`.
    ///
    /// Intervals partially inside the range keep the parts outside of it, with their data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] without changing the set when `from > to`.
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Interval, IntervalSet};
    ///
    /// let mut set = IntervalSet::new();
    /// set.add(0, 9, 'a').unwrap();
    /// set.remove(3, 5).unwrap();
    /// assert_eq!(
    ///     set.list(),
    ///     vec![(&Interval::new(0, 2), &'a'), (&Interval::new(6, 9), &'a')]
    /// );
    /// ```
    pub fn remove(&mut self, from: T, to: T) -> Result<()> {
        let interval = Interval::try_new(from, to)?;
        let overlapping: Vec<_> = self
            .index
            .find_all_overlap(&interval)
            .into_iter()
            .map(|(stored, _)| stored.clone())
            .collect();

        let mut split = 0_usize;
        for stored in &overlapping {
            let Some(zone) = stored.intersection(&interval) else {
                continue;
            };
            let Some(value) = self.delete_entry(stored) else {
                continue;
            };
            // The remainders are separated by the removed zone, so they never fuse.
            match (stored.left_of(&zone), stored.right_of(&zone)) {
                (Some(left), Some(right)) => {
                    self.insert_entry(left, value.clone());
                    self.insert_entry(right, value);
                }
                (Some(rest), None) | (None, Some(rest)) => self.insert_entry(rest, value),
                (None, None) => continue,
            }
            split = split.wrapping_add(1);
        }

        debug!(
            "remove: touched {} intervals, {} of them split, {} intervals stored",
            overlapping.len(),
            split,
            self.len()
        );
        Ok(())
    }

    /// Move the stored interval `interval` to `[from, to]`, keeping its data.
    ///
    /// Overlapped intervals are not overwritten; the move is refused instead. The moved interval
    /// is fused with touching neighbours carrying equal data.
    ///
    /// Returns `Ok(false)` if `interval` is not stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] when `from > to` and [`Error::Overlap`] when `[from, to]`
    /// overlaps another stored interval. The set is unchanged in both cases.
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Interval, IntervalSet};
    ///
    /// let mut set = IntervalSet::new();
    /// set.add(0, 2, 'a').unwrap();
    /// set.add(8, 10, 'b').unwrap();
    /// assert_eq!(set.rekey(&Interval::new(0, 2), 2, 2), Ok(true));
    /// assert_eq!(set.rekey(&Interval::new(8, 10), 1, 9), Err(rb_interval_set::Error::Overlap));
    /// assert_eq!(set.list(), vec![(&Interval::new(2, 2), &'a'), (&Interval::new(8, 10), &'b')]);
    /// ```
    pub fn rekey(&mut self, interval: &Interval<T>, from: T, to: T) -> Result<bool> {
        let target = Interval::try_new(from, to)?;
        if self.stored_value(interval).is_none() {
            return Ok(false);
        }
        if self
            .index
            .find_all_overlap(&target)
            .into_iter()
            .any(|(stored, _)| stored != interval)
        {
            return Err(Error::Overlap);
        }

        let Some(value) = self.delete_entry(interval) else {
            return Ok(false);
        };
        self.insert_entry(target.clone(), value);
        self.try_merge(target);
        debug!("rekey: {} intervals stored", self.len());
        Ok(true)
    }

    /// Check if any stored interval overlaps `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] when `from > to`.
    #[inline]
    pub fn overlaps(&self, from: T, to: T) -> Result<bool> {
        let interval = Interval::try_new(from, to)?;
        Ok(self.index.find_first_overlap(&interval, |_| true).is_some())
    }

    /// Find all stored intervals overlapping `[from, to]`, sorted by lower bound.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] when `from > to`.
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Interval, IntervalSet};
    ///
    /// let mut set = IntervalSet::new();
    /// set.add(0, 1, 'a').unwrap();
    /// set.add(2, 5, 'b').unwrap();
    /// set.add(6, 8, 'a').unwrap();
    /// let found = set.find_all_overlap(5, 7).unwrap();
    /// assert_eq!(found, vec![(&Interval::new(2, 5), &'b'), (&Interval::new(6, 8), &'a')]);
    /// ```
    #[inline]
    pub fn find_all_overlap(&self, from: T, to: T) -> Result<Vec<(&Interval<T>, &V)>> {
        let interval = Interval::try_new(from, to)?;
        Ok(self.index.find_all_overlap(&interval))
    }

    /// Remove every interval, notifying subscribers of each removal.
    pub fn clear(&mut self) {
        let removed: Vec<_> = self
            .index
            .iter()
            .map(|(interval, value)| (interval.clone(), value.clone()))
            .collect();
        self.index.clear();
        for (interval, value) in &removed {
            self.subscribers.emit(Event::Delete { interval, value });
        }
        debug!("clear: dropped {} intervals", removed.len());
    }

    /// Store an entry in the index, then notify subscribers.
    fn insert_entry(&mut self, interval: Interval<T>, value: V) {
        let key = interval.clone();
        let _ignore = self.index.insert(interval, value);
        if let Some((interval, value)) = self
            .index
            .find_covering(&key.from)
            .filter(|&(stored, _)| stored == &key)
        {
            self.subscribers.emit(Event::Insert { interval, value });
        }
    }

    /// Drop an entry from the index, then notify subscribers.
    fn delete_entry(&mut self, interval: &Interval<T>) -> Option<V> {
        let value = self.index.remove(interval)?;
        self.subscribers.emit(Event::Delete {
            interval,
            value: &value,
        });
        Some(value)
    }

    /// The first interval overlapping `interval` whose data differs from `value`.
    fn first_conflict(&self, interval: &Interval<T>, value: &V) -> Option<Interval<T>> {
        let equals = &self.equals;
        self.index
            .find_first_overlap(interval, |stored| !equals(stored, value))
            .map(|(conflict, _)| conflict.clone())
    }

    /// Replace `conflict` by up to three pieces: the part left of `interval` with the old data,
    /// the overlap zone with `value`, and the part right of `interval` with the old data.
    fn overwrite(&mut self, conflict: Interval<T>, interval: &Interval<T>, value: &V) {
        let Some(zone) = conflict.intersection(interval) else {
            return;
        };
        let Some(old) = self.delete_entry(&conflict) else {
            return;
        };

        let left = conflict.left_of(&zone);
        let right = conflict.right_of(&zone);
        let mut pieces = Vec::with_capacity(3);
        if let Some(left) = left {
            pieces.push((left, old.clone()));
        }
        pieces.push((zone, value.clone()));
        if let Some(right) = right {
            pieces.push((right, old));
        }
        trace!("splitting conflicting interval into {} pieces", pieces.len());

        let first = pieces.first().map(|(piece, _)| piece.clone());
        let last = pieces
            .last()
            .filter(|_| pieces.len() > 1)
            .map(|(piece, _)| piece.clone());
        for (piece, data) in pieces {
            self.insert_entry(piece, data);
        }

        // Inner pieces border their siblings only, and those carry different data.
        if let Some(first) = first {
            self.try_merge(first);
        }
        if let Some(last) = last {
            self.try_merge(last);
        }
    }

    /// The parts of `interval` not covered by any stored interval, in ascending order.
    fn uncovered(&self, interval: &Interval<T>) -> Vec<Interval<T>> {
        let mut gaps = Vec::new();
        let mut cursor = Some(interval.from.clone());
        for (covered, _) in self.index.find_all_overlap(interval) {
            let Some(start) = cursor.take() else {
                break;
            };
            if start < covered.from {
                if let Some(end) = covered.from.predecessor() {
                    gaps.push(Interval { from: start, to: end });
                }
            }
            cursor = covered.to.successor();
        }
        if let Some(start) = cursor {
            if start <= interval.to {
                gaps.push(Interval {
                    from: start,
                    to: interval.to.clone(),
                });
            }
        }
        gaps
    }

    /// Fuse `interval` with its left and then its right neighbour when their data are equal.
    ///
    /// Does nothing if `interval` is no longer stored.
    fn try_merge(&mut self, interval: Interval<T>) {
        let interval = match self.mergeable_neighbour(&interval, interval.from.predecessor()) {
            Some(left) => {
                let _ignore = self.delete_entry(&left);
                let Some(value) = self.delete_entry(&interval) else {
                    return;
                };
                self.insert_fused(left.from, interval.to, value)
            }
            None => interval,
        };

        if let Some(right) = self.mergeable_neighbour(&interval, interval.to.successor()) {
            let Some(value) = self.delete_entry(&interval) else {
                return;
            };
            let _ignore = self.delete_entry(&right);
            let _ignore = self.insert_fused(interval.from, right.to, value);
        }
    }

    /// The stored interval covering `point`, if its data equals the data of `interval`.
    fn mergeable_neighbour(&self, interval: &Interval<T>, point: Option<T>) -> Option<Interval<T>> {
        let point = point?;
        let value = self.stored_value(interval)?;
        self.index
            .find_covering(&point)
            .filter(|&(_, neighbour)| (self.equals)(value, neighbour))
            .map(|(neighbour, _)| neighbour.clone())
    }

    fn insert_fused(&mut self, from: T, to: T, value: V) -> Interval<T> {
        trace!("fusing touching intervals with equal data");
        let fused = Interval { from, to };
        self.insert_entry(fused.clone(), value);
        fused
    }

    /// The data stored under exactly `interval`.
    fn stored_value(&self, interval: &Interval<T>) -> Option<&V> {
        self.index
            .find_covering(&interval.from)
            .filter(|&(stored, _)| stored == interval)
            .map(|(_, value)| value)
    }
}

impl<T, V, E, M> fmt::Debug for IntervalSet<T, V, E, M>
where
    T: fmt::Debug,
    V: fmt::Debug,
    M: RangeIndex<T, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalSet")
            .field("intervals", &self.list())
            .field("subscribers", &self.subscribers)
            .finish()
    }
}

impl<'a, T, V, E, M> IntoIterator for &'a IntervalSet<T, V, E, M>
where
    M: RangeIndex<T, V>,
{
    type Item = (&'a Interval<T>, &'a V);
    type IntoIter = RangeIter<'a, T, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, V, E, Ix> IntoIterator for IntervalSet<T, V, E, IntervalMap<T, V, Ix>>
where
    T: Ord,
    Ix: IndexType,
{
    type Item = (Interval<T>, V);
    type IntoIter = IntoIter<T, V, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.index.into_iter()
    }
}

#[cfg(feature = "serde")]
impl<T, V, E, M> Serialize for IntervalSet<T, V, E, M>
where
    T: Serialize,
    V: Serialize,
    M: RangeIndex<T, V>,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T, V> Deserialize<'de> for IntervalSet<T, V>
where
    T: Step + Deserialize<'de>,
    V: Clone + PartialEq + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<(Interval<T>, V)>::deserialize(deserializer)?;
        let mut set = Self::new();
        for (interval, value) in entries {
            set.add(interval.from, interval.to, value)
                .map_err(de::Error::custom)?;
        }
        Ok(set)
    }
}
