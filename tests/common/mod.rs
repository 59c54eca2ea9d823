//! Shared helpers for integration tests.

#![allow(clippy::nursery)] // Test infra prioritizes clarity over pedantry
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry
#![allow(dead_code)] // Each test binary uses a different subset

use std::sync::Once;

use redraft::{History, TextBuffer};

/// Install a test-writer subscriber once per test binary.
pub fn setup_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// Append each piece and record it, returning the buffer and its history.
pub fn recorded_appends(pieces: &[&str]) -> (TextBuffer, History) {
    let mut buffer = TextBuffer::new();
    let mut history = History::new();
    for piece in pieces {
        buffer.append(piece).unwrap();
        history.save_state(&buffer, "append");
    }
    (buffer, history)
}
