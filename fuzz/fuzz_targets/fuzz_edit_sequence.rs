//! Fuzz target for interleaved edits, clipboard use and undo/redo.
//!
//! Every undo right after a record must restore the pre-record content, and
//! the history must stay internally consistent whatever the sequence.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use redraft::{History, TextBuffer};

#[derive(Arbitrary, Debug)]
enum Op {
    Append(String),
    Insert(u16, String),
    Remove(u16, u8),
    Record,
    Undo,
    Redo,
    Cut(u16, u8),
    Copy(u16, u8),
    Paste(Option<u16>),
    ReplaceAll(String, String),
    BeginBatch,
    EndBatch,
    Compress,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut buffer = TextBuffer::new();
    let mut history = History::with_max_history_size(16);

    for op in ops.into_iter().take(256) {
        match op {
            Op::Append(text) => {
                let _ = buffer.append(&text);
            }
            Op::Insert(at, text) => {
                let _ = buffer.insert(usize::from(at), &text);
            }
            Op::Remove(at, length) => {
                let _ = buffer.remove(usize::from(at), usize::from(length));
            }
            Op::Record => {
                history.save_state(&buffer, "edit");
                if !history.is_batch_mode() && history.max_history_size() > 0 {
                    let after = buffer.raw_data();
                    history.undo(&mut buffer).expect("record pushed an entry");
                    history.redo(&mut buffer).expect("undo pushed a redo entry");
                    assert_eq!(buffer.raw_data(), after);
                }
            }
            Op::Undo => {
                let _ = history.undo(&mut buffer);
            }
            Op::Redo => {
                let _ = history.redo(&mut buffer);
            }
            Op::Cut(at, length) => {
                let _ = history.cut_from_buffer(&mut buffer, usize::from(at), usize::from(length));
            }
            Op::Copy(at, length) => {
                let _ = history.copy_region(&buffer, usize::from(at), usize::from(length));
            }
            Op::Paste(at) => {
                let _ = match at {
                    Some(at) => history.paste_at(&mut buffer, usize::from(at)),
                    None => history.paste_from_clipboard(&mut buffer),
                };
            }
            Op::ReplaceAll(search, replacement) => {
                let _ = history.replace_all(&mut buffer, &search, &replacement);
            }
            Op::BeginBatch => {
                let _ = history.begin_batch_operation();
            }
            Op::EndBatch => {
                let _ = history.end_batch_operation(&buffer, "batch");
            }
            Op::Compress => {
                history.compress_history();
            }
        }
        assert!(buffer.len() <= buffer.capacity());
        assert!(history.validate_integrity());
    }
});
