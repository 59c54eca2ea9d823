//! Textual export and import of the undo/redo stacks.
//!
//! The document is JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "undo": [
//!     { "operation_label": "insert", "content": "abc", "cursor_position": 0, "timestamp": 1700000000000 }
//!   ],
//!   "redo": []
//! }
//! ```
//!
//! Records are listed oldest first for `undo` and in stack order for `redo`
//! (the next entry to redo is last). Import validates every record before
//! anything is handed back, so a rejected document never leaves a half-applied
//! history behind.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::history::state::{HistoryState, Timestamp};

/// Version written by [`export`] and the only one [`import`] accepts.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct Document<'a> {
    version: u32,
    undo: Vec<Record<'a>>,
    redo: Vec<Record<'a>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    version: u32,
    undo: Vec<serde_json::Value>,
    redo: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct Record<'a> {
    operation_label: &'a str,
    content: &'a str,
    cursor_position: u64,
    timestamp: u64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OwnedRecord {
    operation_label: String,
    content: String,
    cursor_position: u64,
    timestamp: u64,
}

/// Stacks decoded from an export document.
#[derive(Debug, Default)]
pub(crate) struct Stacks {
    pub undo: VecDeque<HistoryState>,
    pub redo: VecDeque<HistoryState>,
}

/// Serialize both stacks.
///
/// Fails with [`Error::BinaryContent`] if a snapshot is not valid UTF-8; the
/// index counts undo records first, then redo records.
pub(crate) fn export(
    undo: &VecDeque<HistoryState>,
    redo: &VecDeque<HistoryState>,
) -> Result<String> {
    let mut index = 0;
    let document = Document {
        version: FORMAT_VERSION,
        undo: records(undo, &mut index)?,
        redo: records(redo, &mut index)?,
    };
    serde_json::to_string_pretty(&document).map_err(|err| Error::corrupt(None, err.to_string()))
}

fn records<'a>(stack: &'a VecDeque<HistoryState>, index: &mut usize) -> Result<Vec<Record<'a>>> {
    let mut out = Vec::with_capacity(stack.len());
    for state in stack {
        let content = std::str::from_utf8(state.content())
            .map_err(|_| Error::BinaryContent { index: *index })?;
        out.push(Record {
            operation_label: state.operation(),
            content,
            cursor_position: state.cursor_position() as u64,
            timestamp: state.timestamp().as_millis(),
        });
        *index += 1;
    }
    Ok(out)
}

/// Parse and validate a document produced by [`export`].
pub(crate) fn import(data: &str) -> Result<Stacks> {
    let raw: RawDocument =
        serde_json::from_str(data).map_err(|err| Error::corrupt(None, err.to_string()))?;
    if raw.version != FORMAT_VERSION {
        return Err(Error::corrupt(
            None,
            format!("unsupported format version {}", raw.version),
        ));
    }

    let undo_len = raw.undo.len();
    let undo = decode_all(raw.undo, 0)?;
    let redo = decode_all(raw.redo, undo_len)?;
    Ok(Stacks { undo, redo })
}

fn decode_all(values: Vec<serde_json::Value>, offset: usize) -> Result<VecDeque<HistoryState>> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| decode(value, offset + i))
        .collect()
}

fn decode(value: serde_json::Value, index: usize) -> Result<HistoryState> {
    let record: OwnedRecord = serde_json::from_value(value)
        .map_err(|err| Error::corrupt(Some(index), err.to_string()))?;
    let cursor = usize::try_from(record.cursor_position)
        .map_err(|_| Error::corrupt(Some(index), "cursor position does not fit in usize"))?;
    let state = HistoryState::with_timestamp(
        record.content.as_bytes(),
        record.operation_label,
        cursor,
        Timestamp(record.timestamp),
    );
    if !state.is_valid() {
        return Err(Error::corrupt(
            Some(index),
            format!(
                "cursor position {cursor} past end of {}-byte content",
                state.content().len()
            ),
        ));
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(content: &str, operation: &str, cursor: usize, millis: u64) -> HistoryState {
        HistoryState::with_timestamp(content.as_bytes(), operation, cursor, Timestamp(millis))
    }

    #[test]
    fn test_export_import_preserves_stacks() {
        let undo: VecDeque<_> = [state("", "insert", 0, 10), state("abc", "remove", 2, 20)]
            .into_iter()
            .collect();
        let redo: VecDeque<_> = [state("def", "remove", 0, 30)].into_iter().collect();

        let text = export(&undo, &redo).unwrap();
        let stacks = import(&text).unwrap();
        assert_eq!(stacks.undo, undo);
        assert_eq!(stacks.redo, redo);
    }

    #[test]
    fn test_export_shape() {
        let undo: VecDeque<_> = [state("a\"b", "paste", 1, 7)].into_iter().collect();
        let text = export(&undo, &VecDeque::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["undo"][0]["operation_label"], "paste");
        assert_eq!(value["undo"][0]["content"], "a\"b");
        assert_eq!(value["undo"][0]["cursor_position"], 1);
        assert_eq!(value["undo"][0]["timestamp"], 7);
        assert_eq!(value["redo"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_binary_content_is_not_exported() {
        let undo: VecDeque<_> = [
            state("ok", "insert", 0, 1),
            HistoryState::with_timestamp(&[0xFF], "load", 0, Timestamp(2)),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            export(&undo, &VecDeque::new()),
            Err(Error::BinaryContent { index: 1 })
        );
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let err = import("not json").unwrap_err();
        assert!(matches!(err, Error::CorruptHistory { index: None, .. }));
    }

    #[test]
    fn test_import_rejects_unknown_version() {
        let err = import(r#"{ "version": 2, "undo": [], "redo": [] }"#).unwrap_err();
        assert!(err.to_string().contains("unsupported format version 2"));
    }

    #[test]
    fn test_import_reports_record_index() {
        let data = r#"{
            "version": 1,
            "undo": [
                { "operation_label": "a", "content": "x", "cursor_position": 0, "timestamp": 1 }
            ],
            "redo": [
                { "operation_label": "b", "content": "x", "timestamp": 1 }
            ]
        }"#;
        let err = import(data).unwrap_err();
        assert!(matches!(err, Error::CorruptHistory { index: Some(1), .. }));
    }

    #[test]
    fn test_import_rejects_cursor_past_content() {
        let data = r#"{
            "version": 1,
            "undo": [
                { "operation_label": "a", "content": "xy", "cursor_position": 3, "timestamp": 1 }
            ],
            "redo": []
        }"#;
        let err = import(data).unwrap_err();
        assert!(matches!(err, Error::CorruptHistory { index: Some(0), .. }));
    }

    #[test]
    fn test_import_rejects_unknown_fields() {
        let data = r#"{
            "version": 1,
            "undo": [
                { "operation_label": "a", "content": "", "cursor_position": 0, "timestamp": 1, "extra": true }
            ],
            "redo": []
        }"#;
        assert!(import(data).is_err());
    }
}
