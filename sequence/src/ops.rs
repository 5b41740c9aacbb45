//! Operations on sequences that are built out of the core representation
//! operations (`len`, `window`, `concat_node`, iteration).

use std::hash::Hash;

use crate::{Element, Error, Multiset, Result, SeqIndex, Sequence, EAGER_CONCAT_THRESHOLD};

impl<T: Clone> Sequence<T> {
    /// Is `self` a prefix of `other`?
    ///
    /// Every sequence is a prefix of itself.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use valseq_sequence::Sequence;
    /// let seq = Sequence::from([1, 3, 2, 4]);
    /// assert!(Sequence::from([1, 3]).is_prefix_of(&seq));
    /// assert!(seq.is_prefix_of(&seq));
    /// assert!(!Sequence::from([1, 4]).is_prefix_of(&seq));
    /// ```
    pub fn is_prefix_of(&self, other: &Sequence<T>) -> bool
    where
        T: PartialEq,
    {
        self.len() <= other.len() && self.iter().zip(other).all(|(a, b)| a == b)
    }

    /// Is `self` a prefix of `other`, and strictly shorter than it?
    ///
    /// No sequence is a proper prefix of itself.
    pub fn is_proper_prefix_of(&self, other: &Sequence<T>) -> bool
    where
        T: PartialEq,
    {
        self.len() < other.len() && self.is_prefix_of(other)
    }

    /// The elements of `self` followed by the elements of `other`.
    ///
    /// Runs in constant time: unless the result is very short, no elements are
    /// copied and the result shares both operands.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use valseq_sequence::Sequence;
    /// let a = Sequence::create(100, |i| i);
    /// let b = Sequence::create(50, |i| i + 100);
    /// let ab = a.concatenate(&b);
    /// assert_eq!(ab.len(), 150);
    /// assert_eq!(ab.select(120), Ok(&120));
    /// ```
    pub fn concatenate(&self, other: &Sequence<T>) -> Sequence<T> {
        if self.is_empty() {
            other.clone()
        } else if other.is_empty() {
            self.clone()
        } else if self.len() + other.len() <= EAGER_CONCAT_THRESHOLD {
            self.iter().chain(other).cloned().collect()
        } else {
            Sequence::concat_node(self, other)
        }
    }

    /// A copy of `self` with the element at `idx` replaced by `value`.
    ///
    /// Fails with [`Error::InvalidArgument`] if `value` is absent (even if
    /// `self` already holds absent elements), and with
    /// [`Error::IndexOutOfRange`] unless `0 <= idx < self.len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use valseq_sequence::Sequence;
    /// let seq = Sequence::from([1, 3, 2]);
    /// assert_eq!(seq.update(1, 5)?, Sequence::from([1, 5, 2]));
    /// assert_eq!(seq, Sequence::from([1, 3, 2]));
    /// # Ok::<(), valseq_sequence::Error>(())
    /// ```
    pub fn update(&self, idx: impl SeqIndex, value: T) -> Result<Sequence<T>>
    where
        T: Element,
    {
        if value.is_absent() {
            return Err(Error::absent("value"));
        }
        let idx = self.checked_index(&idx)?;

        let mut elts: Vec<T> = self.iter().cloned().collect();
        elts[idx] = value;
        Ok(Sequence::from_vec(elts))
    }

    /// Does some element of `self` equal `value`?
    ///
    /// Fails with [`Error::InvalidArgument`] if `value` is absent.
    pub fn contains(&self, value: &T) -> Result<bool>
    where
        T: PartialEq + Element,
    {
        if value.is_absent() {
            return Err(Error::absent("value"));
        }
        Ok(self.iter().any(|elt| elt == value))
    }

    /// The elements at indices `[start, end)`.
    ///
    /// Fails with [`Error::IndexOutOfRange`] unless
    /// `0 <= start <= end <= self.len()`. A range starting at `self.len()` is
    /// rejected too, unless `self` is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use valseq_sequence::Sequence;
    /// let seq = Sequence::from([1, 3, 2, 4, 2, 4, 6, 5, 4, 1, 7]);
    /// assert_eq!(seq.subsequence(4, 8)?, Sequence::from([2, 4, 6, 5]));
    /// assert!(seq.subsequence(2, 1).is_err());
    /// assert!(seq.subsequence(11, 11).is_err());
    /// # Ok::<(), valseq_sequence::Error>(())
    /// ```
    pub fn subsequence(&self, start: impl SeqIndex, end: impl SeqIndex) -> Result<Sequence<T>> {
        match (start.to_index(), end.to_index()) {
            (Some(s), Some(e)) => self.checked_subsequence(s, e),
            _ => Err(Error::range_out_of_range(
                start.render(),
                end.render(),
                self.len(),
            )),
        }
    }

    /// The first `n` elements; the same as `self.subsequence(0, n)`.
    pub fn take(&self, n: impl SeqIndex) -> Result<Sequence<T>> {
        self.subsequence(0usize, n)
    }

    /// All but the first `n` elements; the same as
    /// `self.subsequence(n, self.len())`.
    pub fn drop(&self, n: impl SeqIndex) -> Result<Sequence<T>> {
        self.subsequence(n, self.len())
    }

    /// Cuts `self` at each of the (ordered) `breakpoints`.
    ///
    /// `k` breakpoints `b0, ..., b(k-1)` produce the `k + 1` parts
    /// `[0, b0), [b0, b1), ..., [b(k-1), len)`, each obtained with
    /// [`subsequence`](Self::subsequence) and subject to its checks. An absent
    /// breakpoint fails with [`Error::InvalidArgument`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use valseq_sequence::Sequence;
    /// let seq = Sequence::from([1, 3, 2, 4, 2]);
    /// let parts = seq.slice([1, 1, 3])?;
    /// assert_eq!(parts.len(), 4);
    /// assert_eq!(parts[0], Sequence::from([1]));
    /// assert!(parts[1].is_empty());
    /// assert_eq!(parts[3], Sequence::from([4, 2]));
    /// assert!(seq.slice([Some(1), None]).is_err());
    /// # Ok::<(), valseq_sequence::Error>(())
    /// ```
    pub fn slice<I>(&self, breakpoints: I) -> Result<Sequence<Sequence<T>>>
    where
        I: IntoIterator,
        I::Item: SeqIndex + Element,
    {
        let mut parts = Vec::new();
        let mut start = 0;
        for bp in breakpoints {
            if bp.is_absent() {
                return Err(Error::absent("breakpoint"));
            }
            let end = bp
                .to_index()
                .ok_or_else(|| Error::out_of_range(bp.render(), self.len()))?;
            parts.push(self.checked_subsequence(start, end)?);
            start = end;
        }
        parts.push(self.checked_subsequence(start, self.len())?);

        Ok(Sequence::from_vec(parts))
    }

    /// Cuts `self` into consecutive parts of the given `lengths`.
    ///
    /// There is one part per length; elements past the last part are not
    /// returned. Each part is obtained with
    /// [`subsequence`](Self::subsequence) and subject to its checks. An
    /// absent length fails with [`Error::InvalidArgument`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use valseq_sequence::Sequence;
    /// let seq = Sequence::from([1, 3, 2, 4, 2, 4, 6, 5, 4, 1, 7]);
    /// let parts = seq.slice_lengths([5, 0, 6])?;
    /// assert_eq!(parts[0], seq.take(5)?);
    /// assert!(parts[1].is_empty());
    /// assert_eq!(parts[2], seq.drop(5)?);
    /// # Ok::<(), valseq_sequence::Error>(())
    /// ```
    pub fn slice_lengths<I>(&self, lengths: I) -> Result<Sequence<Sequence<T>>>
    where
        I: IntoIterator,
        I::Item: SeqIndex + Element,
    {
        let mut parts = Vec::new();
        let mut start: usize = 0;
        for len in lengths {
            if len.is_absent() {
                return Err(Error::absent("length"));
            }
            let end = len
                .to_index()
                .and_then(|len| start.checked_add(len))
                .ok_or_else(|| Error::out_of_range(len.render(), self.len()))?;
            parts.push(self.checked_subsequence(start, end)?);
            start = end;
        }

        Ok(Sequence::from_vec(parts))
    }

    /// The multiset of the elements of `self`, counting equal elements
    /// together.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use valseq_sequence::Sequence;
    /// # use malachite::Natural;
    /// let bag = Sequence::from([1, 3, 1]).as_multiset();
    /// assert_eq!(bag.multiplicity(&1), Natural::from(2u32));
    /// assert_eq!(bag.multiplicity(&2), Natural::from(0u32));
    /// ```
    pub fn as_multiset(&self) -> Multiset<T>
    where
        T: Eq + Hash,
    {
        self.iter().cloned().collect()
    }

    fn checked_index(&self, idx: &impl SeqIndex) -> Result<usize> {
        idx.to_index()
            .filter(|&i| i < self.len())
            .ok_or_else(|| Error::out_of_range(idx.render(), self.len()))
    }

    fn checked_subsequence(&self, start: usize, end: usize) -> Result<Sequence<T>> {
        let len = self.len();
        // Ranges may end at `len`, but only start there in an empty sequence.
        if start <= end && end <= len && (start < len || len == 0) {
            Ok(self.window(start, end))
        } else {
            Err(Error::range_out_of_range(
                start.to_string(),
                end.to_string(),
                len,
            ))
        }
    }
}
