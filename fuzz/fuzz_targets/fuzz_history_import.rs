//! Fuzz target for history import.
//!
//! Tests that History::import_history handles arbitrary text without
//! panicking and leaves the stacks untouched when it rejects the input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use redraft::{History, TextBuffer};

fuzz_target!(|data: &str| {
    let mut buffer = TextBuffer::new();
    let mut history = History::new();
    let _ = buffer.append("seed");
    history.save_state(&buffer, "append");
    let before = history.undo_operations().join("\n");

    if history.import_history(data).is_err() {
        assert_eq!(history.undo_operations().join("\n"), before);
    } else {
        assert!(history.validate_integrity());
        // Whatever was accepted must export again
        let _ = history.export_history();
    }
});
