//! Contract violations reported by sequence and multiset operations.

/// A precondition of a sequence operation was violated by the caller.
///
/// These are programming errors in client code. Inputs are never modified
/// by a failing operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// An argument held an absent marker where a value is required.
    #[error("invalid argument: `{argument}` must not be absent")]
    InvalidArgument { argument: &'static str },

    /// An index or a pair of bounds fell outside of the sequence.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: String, len: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn absent(argument: &'static str) -> Self {
        log::debug!("rejected absent `{argument}`");
        Error::InvalidArgument { argument }
    }

    pub(crate) fn out_of_range(index: String, len: usize) -> Self {
        log::debug!("rejected index {index} (length {len})");
        Error::IndexOutOfRange { index, len }
    }

    pub(crate) fn range_out_of_range(start: String, end: String, len: usize) -> Self {
        Self::out_of_range(format!("{start}..{end}"), len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            Error::absent("value").to_string(),
            "invalid argument: `value` must not be absent"
        );
        assert_eq!(
            Error::range_out_of_range("3".into(), "42".into(), 11).to_string(),
            "index 3..42 out of range for sequence of length 11"
        );
    }
}
