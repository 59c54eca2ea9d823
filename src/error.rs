//! Error types for the text store and history engine.

use thiserror::Error;

/// Result type alias for redraft operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for redraft operations.
///
/// Every variant except [`Error::AllocationFailure`] is recoverable: the
/// operation that produced it left the buffer, the history stacks and the
/// clipboard exactly as they were.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Position or span outside the buffer's logical size.
    #[error("span {position}+{length} out of range for buffer of size {size}")]
    OutOfRange {
        position: usize,
        length: usize,
        size: usize,
    },
    /// The undo stack is empty.
    #[error("nothing to undo")]
    NothingToUndo,
    /// The redo stack is empty.
    #[error("nothing to redo")]
    NothingToRedo,
    /// Paste requested with no clipboard payload.
    #[error("clipboard is empty")]
    EmptyClipboard,
    /// A history import record was malformed.
    #[error("corrupt history{}: {reason}", index.map(|i| format!(" (record {i})")).unwrap_or_default())]
    CorruptHistory {
        index: Option<usize>,
        reason: String,
    },
    /// Growing the store failed.
    #[error("allocation of {requested} bytes failed")]
    AllocationFailure { requested: usize },
    /// A batch operation is already in progress.
    #[error("a batch operation is already active")]
    BatchActive,
    /// `end_batch_operation` without a matching begin.
    #[error("no batch operation is active")]
    NoBatch,
    /// A snapshot cannot be exported as text.
    #[error("history entry {index} holds non-UTF-8 content")]
    BinaryContent { index: usize },
    /// The configured cipher rejected its input.
    #[error("cipher failure: {0}")]
    Cipher(String),
}

impl Error {
    pub(crate) fn out_of_range(position: usize, length: usize, size: usize) -> Self {
        Self::OutOfRange {
            position,
            length,
            size,
        }
    }

    pub(crate) fn corrupt(index: Option<usize>, reason: impl Into<String>) -> Self {
        Self::CorruptHistory {
            index,
            reason: reason.into(),
        }
    }

    /// Whether the caller can keep using the buffer and history after this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::AllocationFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::out_of_range(7, 2, 5);
        assert_eq!(err.to_string(), "span 7+2 out of range for buffer of size 5");

        let err = Error::corrupt(Some(3), "cursor past end of content");
        assert!(err.to_string().contains("(record 3)"));

        let err = Error::corrupt(None, "expected value");
        assert_eq!(err.to_string(), "corrupt history: expected value");

        assert_eq!(Error::NothingToUndo.to_string(), "nothing to undo");
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::EmptyClipboard.is_recoverable());
        assert!(Error::NothingToRedo.is_recoverable());
        assert!(!Error::AllocationFailure { requested: 64 }.is_recoverable());
    }
}
