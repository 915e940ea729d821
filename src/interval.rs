//! The `Interval` stored in `IntervalSet`, representing the closed range [from, to]
//!
//! Both bounds are inclusive, so `Interval::new(3, 3)` covers exactly one point. Intervals are
//! ordered by `from` first and `to` second:
//! - [1,4]<[2,5], because 1<2
//! - [1,4]<[1,5], because 4<5
//!
//! Adjacency and merging need to step from one point to the next, so the bound type has to be
//! discrete. The [`Step`] trait provides that and is implemented for every primitive integer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A discrete, ordered point type with a predecessor and a successor.
pub trait Step: Ord + Clone {
    /// The point right before `self`, or `None` at the lower edge of the domain.
    fn predecessor(&self) -> Option<Self>;

    /// The point right after `self`, or `None` at the upper edge of the domain.
    fn successor(&self) -> Option<Self>;

    /// Number of points in `[start, end]`.
    ///
    /// Returns `None` if `start > end` or the count does not fit in `usize`.
    fn count_inclusive(start: &Self, end: &Self) -> Option<usize>;
}

macro_rules! step_integer_impls {
    ($($t:ty),* $(,)?) => {
        $(
            impl Step for $t {
                #[inline]
                fn predecessor(&self) -> Option<Self> {
                    self.checked_sub(1)
                }

                #[inline]
                fn successor(&self) -> Option<Self> {
                    self.checked_add(1)
                }

                #[inline]
                fn count_inclusive(start: &Self, end: &Self) -> Option<usize> {
                    if start > end {
                        return None;
                    }
                    usize::try_from(end.abs_diff(*start)).ok()?.checked_add(1)
                }
            }
        )*
    };
}

step_integer_impls!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// The interval stored in `IntervalSet` represents [from, to]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct Interval<T> {
    /// Inclusive lower bound
    pub from: T,
    /// Inclusive upper bound
    pub to: T,
}

impl<T: Ord> Interval<T> {
    /// Create a new `Interval`
    ///
    /// # Panics
    ///
    /// This method panics when from > to
    #[inline]
    pub fn new(from: T, to: T) -> Self {
        assert!(from <= to, "invalid range");
        Self { from, to }
    }

    /// Create a new `Interval`, failing with [`Error::InvalidRange`] when from > to
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Error, Interval};
    ///
    /// assert!(Interval::try_new(1, 1).is_ok());
    /// assert!(matches!(Interval::try_new(2, 1), Err(Error::InvalidRange)));
    /// ```
    #[inline]
    pub fn try_new(from: T, to: T) -> Result<Self> {
        if from > to {
            return Err(Error::InvalidRange);
        }
        Ok(Self { from, to })
    }

    /// Checks if self overlaps with other interval
    #[inline]
    pub fn overlap(&self, other: &Self) -> bool {
        self.from <= other.to && other.from <= self.to
    }

    /// Checks if `point` lies inside self
    #[inline]
    pub fn contains(&self, point: &T) -> bool {
        &self.from <= point && point <= &self.to
    }

    /// Checks if other lies entirely inside self
    #[inline]
    pub fn covers(&self, other: &Self) -> bool {
        self.from <= other.from && other.to <= self.to
    }
}

impl<T: Ord + Clone> Interval<T> {
    /// A single-point interval
    #[inline]
    pub fn point(x: T) -> Self {
        Self {
            from: x.clone(),
            to: x,
        }
    }

    /// The overlap zone of self and other, if any
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::Interval;
    ///
    /// let zone = Interval::new(0, 10).intersection(&Interval::new(5, 20));
    /// assert_eq!(zone, Some(Interval::new(5, 10)));
    /// assert_eq!(Interval::new(0, 4).intersection(&Interval::new(5, 8)), None);
    /// ```
    #[inline]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        self.overlap(other).then(|| Self {
            from: self.from.clone().max(other.from.clone()),
            to: self.to.clone().min(other.to.clone()),
        })
    }
}

impl<T: Step> Interval<T> {
    /// Number of points covered, `None` if it does not fit in `usize`
    #[inline]
    pub fn size(&self) -> Option<usize> {
        T::count_inclusive(&self.from, &self.to)
    }

    /// Checks if other starts right after self ends
    #[inline]
    pub fn precedes(&self, other: &Self) -> bool {
        self.to.successor().is_some_and(|next| next == other.from)
    }

    /// The part of self strictly left of `zone`, if any
    pub(crate) fn left_of(&self, zone: &Self) -> Option<Self> {
        if self.from >= zone.from {
            return None;
        }
        zone.from.predecessor().map(|to| Self {
            from: self.from.clone(),
            to,
        })
    }

    /// The part of self strictly right of `zone`, if any
    pub(crate) fn right_of(&self, zone: &Self) -> Option<Self> {
        if self.to <= zone.to {
            return None;
        }
        zone.to.successor().map(|from| Self {
            from,
            to: self.to.clone(),
        })
    }
}
