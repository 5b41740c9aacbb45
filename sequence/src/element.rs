//! Traits describing the values that flow into sequence operations.
//!
//! Compiled programs may use element types with an absent marker (`null`).
//! In Rust that marker is `None`: [`Element`] lets operations that must
//! reject it ask whether a value is absent. [`SeqIndex`] converts the many
//! integer types a compiled program may use as an index into a `usize`.

use std::{rc::Rc, sync::Arc};

use malachite::{Integer, Natural};

/// A value that can be stored in a [`Sequence`](crate::Sequence) and passed to
/// operations that reject absent markers.
///
/// Only types with an absent marker need to override [`is_absent`]; for
/// everything else an empty impl is enough:
///
/// ```rust
/// # use valseq_sequence::Element;
/// #[derive(Clone, PartialEq)]
/// struct Point(i32, i32);
///
/// impl Element for Point {}
/// ```
///
/// [`is_absent`]: Element::is_absent
pub trait Element {
    /// Is this value the absent marker?
    fn is_absent(&self) -> bool {
        false
    }
}

impl<T> Element for Option<T> {
    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

impl<T: Element + ?Sized> Element for &T {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Element + ?Sized> Element for Box<T> {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Element + ?Sized> Element for Rc<T> {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Element + ?Sized> Element for Arc<T> {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

macro_rules! present_elements {
    ($($ty:ty),* $(,)?) => {
        $(impl Element for $ty {})*
    };
}

present_elements!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    str,
    String,
    Natural,
    Integer,
);

impl<T> Element for Vec<T> {}
impl<A, B> Element for (A, B) {}
impl<A, B, C> Element for (A, B, C) {}

/// A value usable as an index or bound into a sequence.
///
/// Negative values, and values too large for a `usize`, are never valid
/// indices: operations report them as [`Error::IndexOutOfRange`].
///
/// [`Error::IndexOutOfRange`]: crate::Error::IndexOutOfRange
pub trait SeqIndex {
    /// This value as a `usize`, or `None` if it can't be one.
    fn to_index(&self) -> Option<usize>;

    /// Renders this value for error reports.
    fn render(&self) -> String;
}

macro_rules! primitive_indices {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SeqIndex for $ty {
                fn to_index(&self) -> Option<usize> {
                    usize::try_from(*self).ok()
                }

                fn render(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

primitive_indices!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl SeqIndex for Natural {
    fn to_index(&self) -> Option<usize> {
        usize::try_from(self).ok()
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl SeqIndex for Integer {
    fn to_index(&self) -> Option<usize> {
        usize::try_from(self).ok()
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl<I: SeqIndex + ?Sized> SeqIndex for &I {
    fn to_index(&self) -> Option<usize> {
        (**self).to_index()
    }

    fn render(&self) -> String {
        (**self).render()
    }
}

// A `None` index is caught by `Element::is_absent` before it is converted,
// wherever absent indices are meaningful.
impl<I: SeqIndex> SeqIndex for Option<I> {
    fn to_index(&self) -> Option<usize> {
        self.as_ref().and_then(I::to_index)
    }

    fn render(&self) -> String {
        match self {
            Some(idx) => idx.render(),
            None => "<absent>".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_markers() {
        assert!(None::<i32>.is_absent());
        assert!(!Some(3).is_absent());
        assert!(!3i32.is_absent());
        assert!(Box::new(None::<u8>).is_absent());
        assert!(!"hello".is_absent());
    }

    #[test]
    fn indices() {
        assert_eq!(5u8.to_index(), Some(5));
        assert_eq!((-3i32).to_index(), None);
        assert_eq!(Natural::from(7u32).to_index(), Some(7));
        assert_eq!(Integer::from(-8).to_index(), None);
        assert_eq!(Integer::from(-8).render(), "-8");
        assert_eq!(Some(4usize).to_index(), Some(4));
        assert_eq!(None::<usize>.to_index(), None);
        assert_eq!(u128::MAX.to_index(), None);
    }
}
