//! Immutable history snapshots.

use std::borrow::Cow;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Wall-clock instant in milliseconds since the Unix epoch.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Current wall-clock time. Clocks set before the epoch read as zero.
    #[must_use]
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Self(millis)
    }

    /// Milliseconds since the epoch.
    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Deep-copied capture of buffer content plus the label of the operation
/// that produced it.
///
/// A state never shares storage with the live buffer and is never mutated
/// after it has been pushed onto a stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryState {
    content: Box<[u8]>,
    operation: String,
    timestamp: Timestamp,
    cursor_position: usize,
}

impl HistoryState {
    /// Capture `content` now.
    #[must_use]
    pub fn new(content: &[u8], operation: impl Into<String>, cursor_position: usize) -> Self {
        Self::with_timestamp(content, operation, cursor_position, Timestamp::now())
    }

    /// Capture `content` with an explicit timestamp.
    #[must_use]
    pub fn with_timestamp(
        content: &[u8],
        operation: impl Into<String>,
        cursor_position: usize,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            content: content.into(),
            operation: operation.into(),
            timestamp,
            cursor_position,
        }
    }

    /// Captured content.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Captured content as text. Invalid UTF-8 sequences are replaced.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Label of the operation this state belongs to.
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// When the state was captured.
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Cursor recorded with the state.
    #[must_use]
    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Whether the recorded cursor lies inside the content.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.cursor_position <= self.content.len()
    }

    /// Approximate heap plus inline footprint in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.content.len() + self.operation.capacity()
    }
}
