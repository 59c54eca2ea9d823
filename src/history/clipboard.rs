//! Single-slot clipboard.

use std::borrow::Cow;

/// Kind of payload held by the clipboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClipboardKind {
    Text,
    Binary,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

/// Transient holder of copied or cut content.
///
/// At most one payload is live; every copy overwrites the previous one. The
/// clipboard is independent of undo/redo: undoing a cut does not clear it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Clipboard {
    payload: Option<Payload>,
}

impl Clipboard {
    /// Create an empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the payload with text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.payload = Some(Payload::Text(text.into()));
    }

    /// Replace the payload with raw bytes.
    pub fn set_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.payload = Some(Payload::Binary(data.into()));
    }

    /// Store a buffer region: text when it is valid UTF-8, binary otherwise.
    pub fn set_region(&mut self, bytes: &[u8]) {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.set_text(text),
            Err(_) => self.set_binary(bytes),
        }
    }

    /// Check if no payload is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }

    /// Kind of the live payload.
    #[must_use]
    pub fn kind(&self) -> Option<ClipboardKind> {
        self.payload.as_ref().map(|payload| match payload {
            Payload::Text(_) => ClipboardKind::Text,
            Payload::Binary(_) => ClipboardKind::Binary,
        })
    }

    /// Payload as text. Binary payloads are converted lossily.
    #[must_use]
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.payload.as_ref().map(|payload| match payload {
            Payload::Text(text) => Cow::Borrowed(text.as_str()),
            Payload::Binary(data) => String::from_utf8_lossy(data),
        })
    }

    /// Payload bytes, whatever the kind.
    #[must_use]
    pub fn bytes(&self) -> Option<&[u8]> {
        self.payload.as_ref().map(|payload| match payload {
            Payload::Text(text) => text.as_bytes(),
            Payload::Binary(data) => data.as_slice(),
        })
    }

    /// Payload size in bytes; zero when empty.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes().map_or(0, <[u8]>::len)
    }

    /// Drop the payload.
    pub fn clear(&mut self) {
        self.payload = None;
    }
}
