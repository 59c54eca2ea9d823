//! `redraft` - in-process text-editing core
//!
//! A growable byte-oriented text store, a snapshot-based undo/redo history
//! with FIFO eviction, a single-slot clipboard, batch grouping of edits into
//! one undo step, and a command dispatcher tying them together.
//!
//! The buffer is owned by the caller. [`History`] only borrows it for the
//! duration of a call and keeps deep-copied [`HistoryState`] snapshots.
//!
//! ```
//! use redraft::{History, TextBuffer};
//!
//! let mut buffer = TextBuffer::with_text("Hello");
//! let mut history = History::for_buffer(&buffer);
//!
//! buffer.append(", world").unwrap();
//! history.save_state(&buffer, "append");
//! history.cut_from_buffer(&mut buffer, 0, 7).unwrap();
//! assert_eq!(buffer.text(), "world");
//!
//! history.undo(&mut buffer).unwrap();
//! assert_eq!(buffer.text(), "Hello, world");
//! history.undo(&mut buffer).unwrap();
//! assert_eq!(buffer.text(), "Hello");
//! ```

// Crate-level lint configuration
#![warn(unsafe_code)]
#![allow(clippy::cast_possible_truncation)] // u64 <-> usize for export fields
#![allow(clippy::module_name_repetitions)] // Allow history::HistoryState etc
#![allow(clippy::missing_errors_doc)] // Error variants are documented on the enum
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod cipher;
pub mod error;
pub mod history;
pub mod session;
pub mod text;

// Re-export core types at crate root
pub use cipher::{Cipher, PassThrough};
pub use error::{Error, Result};
pub use history::{Clipboard, ClipboardKind, History, HistoryOptions, HistoryState, Timestamp};
pub use session::{CommandOutcome, EditCommand, EditSession};
pub use text::TextBuffer;
