//! Unordered bags of values with arbitrary-precision multiplicities.

use std::{fmt, hash::Hash};

use indexmap::IndexMap;
use malachite::{
    base::num::basic::traits::{One, Zero},
    Natural,
};

use crate::{Element, Error, Result};

/// An immutable multiset: each distinct value is mapped to the (non-zero)
/// number of times it occurs.
///
/// Multisets are usually obtained from [`Sequence::as_multiset`]. Like
/// sequences, they are values: operations return new multisets. Equality
/// ignores the order in which values were added.
///
/// [`Sequence::as_multiset`]: crate::Sequence::as_multiset
#[derive(Clone, Debug)]
pub struct Multiset<T> {
    // Invariant: no value is mapped to zero.
    counts: IndexMap<T, Natural>,
}

impl<T> Default for Multiset<T> {
    fn default() -> Self {
        Multiset {
            counts: IndexMap::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> Multiset<T> {
    /// The empty multiset.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of `self` in which `value` occurs exactly `count` times.
    ///
    /// A `count` of zero removes `value`. Fails with
    /// [`Error::InvalidArgument`] if `value` is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use valseq_sequence::Multiset;
    /// # use malachite::Natural;
    /// let bag = Multiset::new().update('a', Natural::from(3u32))?;
    /// assert_eq!(bag.multiplicity(&'a'), Natural::from(3u32));
    /// assert!(bag.update('a', Natural::from(0u32))?.is_empty());
    /// # Ok::<(), valseq_sequence::Error>(())
    /// ```
    pub fn update(&self, value: T, count: Natural) -> Result<Self>
    where
        T: Element,
    {
        if value.is_absent() {
            return Err(Error::absent("value"));
        }

        let mut counts = self.counts.clone();
        if count == Natural::ZERO {
            counts.shift_remove(&value);
        } else {
            counts.insert(value, count);
        }
        Ok(Multiset { counts })
    }

    /// The number of times `value` occurs (zero if it doesn't).
    pub fn multiplicity(&self, value: &T) -> Natural {
        self.counts.get(value).cloned().unwrap_or(Natural::ZERO)
    }

    /// Does `value` occur at least once?
    pub fn contains(&self, value: &T) -> bool {
        self.counts.contains_key(value)
    }

    /// The total number of occurrences, counting repeats.
    pub fn cardinality(&self) -> Natural {
        let mut total = Natural::ZERO;
        for count in self.counts.values() {
            total += count;
        }
        total
    }

    /// The number of distinct values.
    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over the distinct values and their multiplicities, in the
    /// order the values were first added.
    pub fn iter(&self) -> impl Iterator<Item = (&T, &Natural)> + '_ {
        self.counts.iter()
    }

    /// The multiset in which each value occurs as often as in `self` and
    /// `other` together.
    pub fn union(&self, other: &Self) -> Self {
        let mut counts = self.counts.clone();
        for (value, count) in &other.counts {
            *counts.entry(value.clone()).or_insert(Natural::ZERO) += count;
        }
        Multiset { counts }
    }

    /// The multiset in which each value occurs as often as it does in the
    /// one of `self` and `other` where it occurs least.
    pub fn intersection(&self, other: &Self) -> Self {
        let counts = self
            .counts
            .iter()
            .filter_map(|(value, count)| {
                let other_count = other.counts.get(value)?;
                Some((value.clone(), count.min(other_count).clone()))
            })
            .collect();
        Multiset { counts }
    }

    /// The multiset in which each value occurs as often as it does in `self`,
    /// minus the number of times it occurs in `other` (or not at all, if that
    /// isn't positive).
    pub fn difference(&self, other: &Self) -> Self {
        let counts = self
            .counts
            .iter()
            .filter_map(|(value, count)| match other.counts.get(value) {
                Some(other_count) if other_count >= count => None,
                Some(other_count) => Some((value.clone(), count - other_count)),
                None => Some((value.clone(), count.clone())),
            })
            .collect();
        Multiset { counts }
    }

    /// Does every value occur in `other` at least as often as in `self`?
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.counts.iter().all(|(value, count)| {
            other
                .counts
                .get(value)
                .is_some_and(|other_count| count <= other_count)
        })
    }

    /// Is `self` a subset of `other` without being equal to it?
    pub fn is_proper_subset_of(&self, other: &Self) -> bool {
        self.is_subset_of(other) && self != other
    }

    /// Do `self` and `other` have no value in common?
    pub fn is_disjoint_from(&self, other: &Self) -> bool {
        self.counts
            .keys()
            .all(|value| !other.counts.contains_key(value))
    }
}

impl<T: Eq + Hash> PartialEq for Multiset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.counts == other.counts
    }
}

impl<T: Eq + Hash> Eq for Multiset<T> {}

impl<T: Eq + Hash> FromIterator<T> for Multiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut counts = IndexMap::new();
        for value in iter {
            *counts.entry(value).or_insert(Natural::ZERO) += Natural::ONE;
        }
        Multiset { counts }
    }
}

impl<T: fmt::Display> fmt::Display for Multiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (value, count)) in self.counts.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}: {count}")?;
        }
        f.write_str("}")
    }
}

impl<T> Element for Multiset<T> {}
