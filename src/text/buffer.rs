//! Growable text store.
//!
//! This module provides [`TextBuffer`], an owned contiguous byte sequence with
//! an explicit logical capacity. Appends grow the capacity geometrically so a
//! long run of small edits stays amortized O(1) per byte. For recording edits
//! and undoing them, pair the buffer with a [`History`](crate::History).

use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};
use crate::text::search::{self, NEWLINE};

/// Capacity reserved by [`TextBuffer::new`].
pub const INITIAL_CAPACITY: usize = 1024;

/// Factor applied to the capacity whenever the buffer has to grow.
pub const GROWTH_FACTOR: usize = 2;

/// Mutable, addressable sequence of byte units.
///
/// All offsets are positions into the logical content (`0..=len()`), never
/// into the spare capacity. Reads are strictly bounds-checked; `remove` clamps
/// its length to the available content.
///
/// Equality compares content only, so two buffers with the same text but
/// different capacities are equal.
#[derive(Clone, Debug)]
pub struct TextBuffer {
    content: Vec<u8>,
    /// Logical capacity; the backing vector always holds at least this much.
    capacity: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// Create an empty buffer with [`INITIAL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create an empty buffer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            content: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a buffer holding `text`.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut buffer = Self::with_capacity(INITIAL_CAPACITY.max(text.len()));
        buffer.content.extend_from_slice(text.as_bytes());
        buffer
    }

    /// Logical size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Current logical capacity. Never shrinks implicitly.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append text to the end.
    pub fn append(&mut self, text: &str) -> Result<()> {
        self.append_bytes(text.as_bytes())
    }

    /// Append raw bytes to the end.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let required = self.required_for(bytes.len())?;
        self.ensure_capacity(required)?;
        self.content.extend_from_slice(bytes);
        Ok(())
    }

    /// Append a line marker.
    pub fn add_new_line(&mut self) -> Result<()> {
        self.append_bytes(&[NEWLINE])
    }

    /// Insert text at `position`, shifting trailing content right.
    pub fn insert(&mut self, position: usize, text: &str) -> Result<()> {
        self.insert_bytes(position, text.as_bytes())
    }

    /// Insert raw bytes at `position`.
    pub fn insert_bytes(&mut self, position: usize, bytes: &[u8]) -> Result<()> {
        if position > self.len() {
            return Err(Error::out_of_range(position, bytes.len(), self.len()));
        }
        let required = self.required_for(bytes.len())?;
        self.ensure_capacity(required)?;
        self.content.extend_from_slice(bytes);
        self.content[position..].rotate_right(bytes.len());
        Ok(())
    }

    /// Remove up to `length` bytes starting at `position`.
    ///
    /// The length is clamped to the content after `position`. Returns the
    /// number of bytes actually removed.
    pub fn remove(&mut self, position: usize, length: usize) -> Result<usize> {
        if position > self.len() {
            return Err(Error::out_of_range(position, length, self.len()));
        }
        let length = length.min(self.len() - position);
        self.content.drain(position..position + length);
        Ok(length)
    }

    /// Clear all content. Capacity is kept.
    pub fn clear(&mut self) {
        self.content.clear();
    }

    /// Grow capacity to at least `capacity` bytes.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.capacity {
            return Ok(());
        }
        self.grow_to(capacity)
    }

    /// Make room for `additional` more bytes under the usual growth policy.
    pub(crate) fn reserve_additional(&mut self, additional: usize) -> Result<()> {
        let required = self.required_for(additional)?;
        self.ensure_capacity(required)
    }

    /// Full content as text. Invalid UTF-8 sequences are replaced.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    /// Full content as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Bounds-checked view of `length` bytes starting at `start`.
    pub fn slice(&self, start: usize, length: usize) -> Result<&[u8]> {
        match start.checked_add(length) {
            Some(end) if end <= self.len() => Ok(&self.content[start..end]),
            _ => Err(Error::out_of_range(start, length, self.len())),
        }
    }

    /// Bounds-checked substring of `length` bytes starting at `start`.
    pub fn substring(&self, start: usize, length: usize) -> Result<String> {
        self.slice(start, length)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Byte unit at `position`.
    pub fn byte_at(&self, position: usize) -> Result<u8> {
        self.content
            .get(position)
            .copied()
            .ok_or_else(|| Error::out_of_range(position, 1, self.len()))
    }

    /// Start positions of all non-overlapping matches of `text`, ascending.
    #[must_use]
    pub fn find_all(&self, text: &str) -> Vec<usize> {
        search::find_all(&self.content, text.as_bytes())
    }

    /// First match of `text` at or after `start`, or `None` when absent.
    #[must_use]
    pub fn find_first(&self, text: &str, start: usize) -> Option<usize> {
        search::find_first(&self.content, text.as_bytes(), start)
    }

    /// Number of lines: line markers plus one.
    #[must_use]
    pub fn line_count(&self) -> usize {
        search::line_count(&self.content)
    }

    /// Text of line `n` (0-indexed) without its marker.
    pub fn line(&self, n: usize) -> Result<String> {
        let (start, length) = self.line_span(n)?;
        self.substring(start, length)
    }

    /// `(start, length)` of line `n`, excluding its marker.
    ///
    /// Fails with `OutOfRange { position: n, size: line_count() }` when the
    /// line does not exist.
    pub fn line_span(&self, n: usize) -> Result<(usize, usize)> {
        search::line_span(&self.content, n)
            .ok_or_else(|| Error::out_of_range(n, 1, self.line_count()))
    }

    /// Copy of the content for opaque byte transfer.
    #[must_use]
    pub fn raw_data(&self) -> Vec<u8> {
        self.content.clone()
    }

    /// Replace the content with `data`. No format is imposed.
    pub fn set_from_raw_data(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_capacity(data.len())?;
        self.content.clear();
        self.content.extend_from_slice(data);
        Ok(())
    }

    /// Replace the content with `text`.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.set_from_raw_data(text.as_bytes())
    }

    fn required_for(&self, additional: usize) -> Result<usize> {
        self.len()
            .checked_add(additional)
            .ok_or(Error::AllocationFailure {
                requested: usize::MAX,
            })
    }

    fn ensure_capacity(&mut self, required: usize) -> Result<()> {
        if required <= self.capacity {
            return Ok(());
        }
        self.grow_to(required.max(self.capacity.saturating_mul(GROWTH_FACTOR)))
    }

    fn grow_to(&mut self, capacity: usize) -> Result<()> {
        self.content
            .try_reserve_exact(capacity - self.content.len())
            .map_err(|_| Error::AllocationFailure {
                requested: capacity,
            })?;
        trace!(old = self.capacity, new = capacity, "text buffer grew");
        self.capacity = capacity;
        Ok(())
    }
}

impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl Eq for TextBuffer {}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.content))
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::with_text(text)
    }
}
