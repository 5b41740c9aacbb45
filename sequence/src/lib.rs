//! This crate provides the immutable sequence values used by compiled programs.
//!
//! [`Sequence`] is a persistent sequence with value semantics: every
//! operation that "changes" a sequence returns a new one, and two sequences
//! are equal whenever they hold equal elements, no matter how they were
//! built. Concatenation is `O(1)`: it creates a node sharing both operands.
//! Lookups walk down to the covering operand, and deep nodes are flattened
//! into a contiguous store the first time they are indexed. Sub-sequences of
//! a flat sequence share its storage.
//!
//! [`Multiset`] is the unordered bag obtained from [`Sequence::as_multiset`],
//! with arbitrary-precision counts.
//!
//! Operations whose preconditions can be violated by client code return a
//! [`Result`] carrying an [`Error`]. Index and bound arguments accept any
//! [`SeqIndex`] (primitive integers, or `malachite` big integers), and values
//! that may hold an absent marker implement [`Element`].

// Not yet implemented (do we need them?)
// - structural update of concatenation nodes without flattening
// - rebalancing of deep concatenation trees
// - releasing the children of a concatenation that is flattened after other
//   nodes started sharing it

pub mod element;
pub mod error;
pub mod multiset;
mod ops;
pub mod sequence;

/// Concatenations whose total length is at most this are copied eagerly into
/// a flat store instead of allocating a concatenation node.
///
/// The copy is bounded by this constant, so chains of concatenations stay
/// `O(1)` per step.
pub const EAGER_CONCAT_THRESHOLD: usize = 32;

/// Element lookups walk down through at most this many concatenation nodes.
/// A lookup into anything deeper flattens the sequence it started from.
pub const MAX_LOOKUP_DEPTH: usize = 32;

pub use element::{Element, SeqIndex};
pub use error::{Error, Result};
pub use multiset::Multiset;
pub use sequence::{Iter, Sequence};
