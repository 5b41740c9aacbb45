use std::{
    fmt,
    hash::{Hash, Hasher},
    iter::FusedIterator,
    mem,
    ops::Index,
    sync::Arc,
};

use once_cell::race::OnceBox;

use crate::{Error, Result, SeqIndex, MAX_LOOKUP_DEPTH};

// A sequence is either empty, a window into a shared flat store, or a
// concatenation node. We maintain a few invariants that keep the other
// operations simple:
// - a zero-length sequence is always `Empty`, so `Flat` windows are non-empty
//   and both children of a `Concat` are non-empty;
// - `Concat::len` is the sum of the children's lengths;
// - once `Concat::flat` is set, it holds exactly the elements of
//   `left ++ right`.
enum Repr<T> {
    Empty,
    Flat {
        data: Arc<[T]>,
        start: usize,
        end: usize,
    },
    Concat(Arc<Concat<T>>),
}

struct Concat<T> {
    left: Sequence<T>,
    right: Sequence<T>,
    len: usize,
    // Filled in the first time someone needs this node as one slice, or a
    // lookup finds it too deep to walk down.
    // Concurrent readers may race to build it; the first one to publish wins
    // and the others drop their copy.
    flat: OnceBox<Arc<[T]>>,
}

impl<T: Clone> Concat<T> {
    fn flattened(&self) -> &Arc<[T]> {
        self.flat.get_or_init(|| {
            log::trace!("flattening concatenation of {} elements", self.len);
            let data: Vec<T> = Iter::children_of(self).cloned().collect();
            debug_assert_eq!(data.len(), self.len);
            Box::new(Arc::from(data))
        })
    }
}

// Left-leaning chains of concatenations can be arbitrarily deep, and the
// default drop glue would recurse once per level. Unlink uniquely-owned
// nodes iteratively instead.
impl<T> Drop for Concat<T> {
    fn drop(&mut self) {
        let is_node = |seq: &Sequence<T>| matches!(seq.repr, Repr::Concat(_));
        if !is_node(&self.left) && !is_node(&self.right) {
            return;
        }

        let mut stack = vec![mem::take(&mut self.left), mem::take(&mut self.right)];
        while let Some(seq) = stack.pop() {
            if let Repr::Concat(node) = seq.repr {
                if let Some(mut node) = Arc::into_inner(node) {
                    stack.push(mem::take(&mut node.left));
                    stack.push(mem::take(&mut node.right));
                }
            }
        }
    }
}

/// An immutable, persistent sequence of `T`s.
///
/// Cloning is `O(1)` and shares all storage. Equality and hashing look only at
/// the elements, never at how the sequence is represented.
///
/// # Examples
///
/// ```rust
/// # use valseq_sequence::Sequence;
/// let a = Sequence::from([1, 3, 2]);
/// let b = a.concatenate(&Sequence::from([4]));
/// assert_eq!(b, Sequence::from([1, 3, 2, 4]));
/// assert_eq!(a.len(), 3);
/// ```
pub struct Sequence<T> {
    repr: Repr<T>,
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Empty => Repr::Empty,
            Repr::Flat { data, start, end } => Repr::Flat {
                data: Arc::clone(data),
                start: *start,
                end: *end,
            },
            Repr::Concat(node) => Repr::Concat(Arc::clone(node)),
        };
        Sequence { repr }
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Sequence<T> {
    /// The sequence with no elements.
    pub const fn empty() -> Self {
        Sequence { repr: Repr::Empty }
    }

    /// Creates a flat sequence that takes ownership of `elts`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use valseq_sequence::Sequence;
    /// let seq = Sequence::from_vec(vec![Some(3), None, Some(2)]);
    /// assert_eq!(seq.len(), 3);
    /// assert!(Sequence::<u8>::from_vec(Vec::new()).is_empty());
    /// ```
    pub fn from_vec(elts: Vec<T>) -> Self {
        if elts.is_empty() {
            Self::empty()
        } else {
            let end = elts.len();
            Sequence {
                repr: Repr::Flat {
                    data: Arc::from(elts),
                    start: 0,
                    end,
                },
            }
        }
    }

    /// Creates the sequence `[init(0), init(1), ..., init(len - 1)]`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use valseq_sequence::Sequence;
    /// let squares = Sequence::create(4, |i| i * i);
    /// assert_eq!(squares, Sequence::from([0, 1, 4, 9]));
    /// ```
    pub fn create(len: usize, init: impl FnMut(usize) -> T) -> Self {
        Self::from_vec((0..len).map(init).collect())
    }

    /// Joins two non-empty sequences under a concatenation node, without
    /// copying any elements.
    pub(crate) fn concat_node(left: &Self, right: &Self) -> Self {
        debug_assert!(!left.is_empty() && !right.is_empty());
        Sequence {
            repr: Repr::Concat(Arc::new(Concat {
                left: left.compacted(),
                right: right.compacted(),
                len: left.len() + right.len(),
                flat: OnceBox::new(),
            })),
        }
    }

    /// `self`, or a flat window over its flat store if it is a concatenation
    /// that has already been flattened. No elements are copied.
    ///
    /// New nodes hold their children in this form, so that a flattened node
    /// doesn't keep its own children (and their flat stores) alive through
    /// every later concatenation.
    fn compacted(&self) -> Self {
        if let Repr::Concat(node) = &self.repr {
            if let Some(flat) = node.flat.get() {
                return Sequence {
                    repr: Repr::Flat {
                        data: Arc::clone(flat),
                        start: 0,
                        end: node.len,
                    },
                };
            }
        }
        self.clone()
    }

    /// The number of elements in this sequence. Runs in constant time.
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Empty => 0,
            Repr::Flat { start, end, .. } => end - start,
            Repr::Concat(node) => node.len,
        }
    }

    /// Returns `true` if this sequence has no elements.
    pub fn is_empty(&self) -> bool {
        matches!(self.repr, Repr::Empty)
    }

    /// Returns an iterator over references to the elements, in order.
    ///
    /// Iterating never flattens concatenation nodes, but reuses their flat
    /// store if some earlier operation built it.
    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }

    /// Are these two sequences backed by the very same storage?
    ///
    /// `true` implies equality; `false` implies nothing.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Empty, Repr::Empty) => true,
            (
                Repr::Flat { data, start, end },
                Repr::Flat {
                    data: other_data,
                    start: other_start,
                    end: other_end,
                },
            ) => Arc::ptr_eq(data, other_data) && start == other_start && end == other_end,
            (Repr::Concat(node), Repr::Concat(other_node)) => Arc::ptr_eq(node, other_node),
            _ => false,
        }
    }

    /// Checks the internal invariants of the representation, panicking if one
    /// doesn't hold. This walks the whole structure, so it's meant for tests.
    pub fn check_invariants(&self) {
        let mut stack = vec![self];
        while let Some(seq) = stack.pop() {
            match &seq.repr {
                Repr::Empty => {}
                Repr::Flat { data, start, end } => {
                    assert!(start < end, "empty flat window");
                    assert!(*end <= data.len(), "flat window past its store");
                }
                Repr::Concat(node) => {
                    assert!(!node.left.is_empty() && !node.right.is_empty());
                    assert_eq!(node.len, node.left.len() + node.right.len());
                    if let Some(flat) = node.flat.get() {
                        assert_eq!(flat.len(), node.len);
                    }
                    stack.push(&node.left);
                    stack.push(&node.right);
                }
            }
        }
    }
}

impl<T: Clone> Sequence<T> {
    /// Creates a flat sequence holding a copy of `elts`.
    pub fn from_slice(elts: &[T]) -> Self {
        if elts.is_empty() {
            Self::empty()
        } else {
            Sequence {
                repr: Repr::Flat {
                    data: Arc::from(elts),
                    start: 0,
                    end: elts.len(),
                },
            }
        }
    }

    /// Creates a flat sequence holding a copy of `elts[start..end]`.
    ///
    /// Fails unless `0 <= start <= end <= elts.len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use valseq_sequence::Sequence;
    /// let arr = [0, 1, 2, 3, 4, 5];
    /// assert_eq!(Sequence::from_slice_range(&arr, 1, 4)?, Sequence::from([1, 2, 3]));
    /// assert_eq!(Sequence::from_slice_range(&arr, 6, 6)?, Sequence::empty());
    /// assert!(Sequence::from_slice_range(&arr, 4, 1).is_err());
    /// # Ok::<(), valseq_sequence::Error>(())
    /// ```
    pub fn from_slice_range(
        elts: &[T],
        start: impl SeqIndex,
        end: impl SeqIndex,
    ) -> Result<Self> {
        match (start.to_index(), end.to_index()) {
            (Some(s), Some(e)) if s <= e && e <= elts.len() => Ok(Self::from_slice(&elts[s..e])),
            _ => Err(Error::range_out_of_range(
                start.render(),
                end.render(),
                elts.len(),
            )),
        }
    }

    /// Gets the element at `idx`, or `None` if `idx` is out-of-bounds.
    ///
    /// Lookups walk down to the constituent covering `idx`. A lookup that
    /// would pass through more than [`MAX_LOOKUP_DEPTH`] unflattened
    /// concatenations flattens `self` instead, so that later lookups are
    /// constant time.
    ///
    /// [`MAX_LOOKUP_DEPTH`]: crate::MAX_LOOKUP_DEPTH
    pub fn get(&self, idx: usize) -> Option<&T> {
        if idx >= self.len() {
            return None;
        }

        let (mut seq, mut offset) = (self, idx);
        for _ in 0..=MAX_LOOKUP_DEPTH {
            match &seq.repr {
                Repr::Empty => unreachable!("in-bounds index into an empty sequence"),
                Repr::Flat { data, start, .. } => return data.get(start + offset),
                Repr::Concat(node) => {
                    if let Some(flat) = node.flat.get() {
                        return flat.get(offset);
                    }
                    let left_len = node.left.len();
                    if offset < left_len {
                        seq = &node.left;
                    } else {
                        seq = &node.right;
                        offset -= left_len;
                    }
                }
            }
        }

        self.as_slice().get(idx)
    }

    /// Gets the element at `idx`.
    ///
    /// Fails with [`Error::IndexOutOfRange`] unless `0 <= idx < self.len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use valseq_sequence::Sequence;
    /// let seq = Sequence::from([1, 3, 2]);
    /// assert_eq!(seq.select(1), Ok(&3));
    /// assert!(seq.select(3).is_err());
    /// assert!(seq.select(-1).is_err());
    /// ```
    pub fn select(&self, idx: impl SeqIndex) -> Result<&T> {
        idx.to_index()
            .and_then(|i| self.get(i))
            .ok_or_else(|| Error::out_of_range(idx.render(), self.len()))
    }

    /// Views the whole sequence as a contiguous slice.
    ///
    /// Concatenations are flattened (once) to produce it.
    pub fn as_slice(&self) -> &[T] {
        match &self.repr {
            Repr::Empty => &[],
            Repr::Flat { data, start, end } => &data[*start..*end],
            Repr::Concat(node) => &node.flattened()[..],
        }
    }

    /// The elements at indices `[start, end)`, sharing storage with `self`
    /// where possible. The caller has already checked the bounds.
    pub(crate) fn window(&self, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= self.len());
        if start == end {
            return Self::empty();
        }

        let (mut seq, mut start, mut end) = (self, start, end);
        loop {
            match &seq.repr {
                Repr::Empty => unreachable!("non-empty window into an empty sequence"),
                Repr::Flat {
                    data,
                    start: offset,
                    ..
                } => {
                    return Sequence {
                        repr: Repr::Flat {
                            data: Arc::clone(data),
                            start: offset + start,
                            end: offset + end,
                        },
                    };
                }
                Repr::Concat(node) => {
                    if start == 0 && end == node.len {
                        return seq.compacted();
                    }

                    let left_len = node.left.len();
                    if node.flat.get().is_none() && end <= left_len {
                        seq = &node.left;
                    } else if node.flat.get().is_none() && start >= left_len {
                        seq = &node.right;
                        start -= left_len;
                        end -= left_len;
                    } else {
                        return Sequence {
                            repr: Repr::Flat {
                                data: Arc::clone(node.flattened()),
                                start,
                                end,
                            },
                        };
                    }
                }
            }
        }
    }
}

/// An iterator over the elements of a [`Sequence`].
///
/// Concatenation nodes are walked with an explicit stack, so arbitrarily deep
/// sequences can be iterated.
#[derive(Clone)]
pub struct Iter<'a, T> {
    // Sequences still to be visited, the next one on top.
    stack: Vec<&'a Sequence<T>>,
    leaf: std::slice::Iter<'a, T>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn children_of(node: &'a Concat<T>) -> Self {
        Iter {
            stack: vec![&node.right, &node.left],
            leaf: [].iter(),
            remaining: node.len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(ret) = self.leaf.next() {
                self.remaining -= 1;
                return Some(ret);
            }

            match &self.stack.pop()?.repr {
                Repr::Empty => {}
                Repr::Flat { data, start, end } => {
                    self.leaf = data[*start..*end].iter();
                }
                Repr::Concat(node) => {
                    if let Some(flat) = node.flat.get() {
                        self.leaf = flat.iter();
                    } else {
                        self.stack.push(&node.right);
                        self.stack.push(&node.left);
                    }
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            stack: vec![self],
            leaf: [].iter(),
            remaining: self.len(),
        }
    }
}

impl<T: PartialEq> PartialEq for Sequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && (self.ptr_eq(other) || self.iter().eq(other.iter()))
    }
}

impl<T: Eq> Eq for Sequence<T> {}

impl<T: Hash> Hash for Sequence<T> {
    // The length, then every element, whatever the representation.
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T: fmt::Display> fmt::Display for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, elt) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(elt, f)?;
        }
        f.write_str("]")
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T: Clone> Index<usize> for Sequence<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).expect("index out of range")
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(elts: Vec<T>) -> Self {
        Self::from_vec(elts)
    }
}

impl<T, const N: usize> From<[T; N]> for Sequence<T> {
    fn from(elts: [T; N]) -> Self {
        Self::from_vec(Vec::from(elts))
    }
}

impl<T: Clone> From<&[T]> for Sequence<T> {
    fn from(elts: &[T]) -> Self {
        Self::from_slice(elts)
    }
}

impl From<&str> for Sequence<char> {
    fn from(s: &str) -> Self {
        s.chars().collect()
    }
}

impl<T> crate::Element for Sequence<T> {}

impl<T: serde::Serialize> serde::Serialize for Sequence<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for elt in self {
            seq.serialize_element(elt)?;
        }
        seq.end()
    }
}

impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Sequence<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let vec: Vec<T> = Vec::deserialize(deserializer)?;
        Ok(Self::from_vec(vec))
    }
}
