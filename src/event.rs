//! Change notifications emitted by `IntervalSet`.
//!
//! Every insert into or delete from the underlying index, including the ones done while
//! splitting or fusing intervals, is reported to the subscribers registered with
//! [`IntervalSet::subscribe`](crate::IntervalSet::subscribe).

use std::fmt;

use crate::interval::Interval;

/// A single low-level change to the stored intervals.
#[derive(Debug, PartialEq, Eq)]
pub enum Event<'a, T, V> {
    /// An interval was stored.
    Insert {
        /// Bounds of the stored interval
        interval: &'a Interval<T>,
        /// Data attached to it
        value: &'a V,
    },
    /// An interval was dropped.
    Delete {
        /// Bounds of the dropped interval
        interval: &'a Interval<T>,
        /// Data that was attached to it
        value: &'a V,
    },
}

impl<T, V> Clone for Event<'_, T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for Event<'_, T, V> {}

impl<'a, T, V> Event<'a, T, V> {
    /// The interval this event is about
    #[inline]
    pub fn interval(&self) -> &'a Interval<T> {
        match *self {
            Event::Insert { interval, .. } | Event::Delete { interval, .. } => interval,
        }
    }

    /// The data this event is about
    #[inline]
    pub fn value(&self) -> &'a V {
        match *self {
            Event::Insert { value, .. } | Event::Delete { value, .. } => value,
        }
    }

    /// Checks if this is an insert
    #[inline]
    pub fn is_insert(&self) -> bool {
        matches!(self, Event::Insert { .. })
    }
}

/// Callback invoked for every event.
pub(crate) type Subscriber<T, V> = Box<dyn FnMut(Event<'_, T, V>) + Send>;

/// The registered subscribers of one set.
pub(crate) struct Subscribers<T, V> {
    callbacks: Vec<Subscriber<T, V>>,
}

impl<T, V> Subscribers<T, V> {
    pub(crate) fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, callback: Subscriber<T, V>) {
        self.callbacks.push(callback);
    }

    pub(crate) fn emit(&mut self, event: Event<'_, T, V>) {
        for callback in &mut self.callbacks {
            callback(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

impl<T, V> fmt::Debug for Subscribers<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.len())
            .finish()
    }
}
