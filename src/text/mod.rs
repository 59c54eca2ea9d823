//! Growable text storage.
//!
//! The store is a flat sequence of byte units with explicit size/capacity
//! separation. It knows nothing about history: callers edit it directly and
//! then ask a [`History`](crate::History) to record the result.
//!
//! Key types:
//!
//! - [`TextBuffer`]: the mutable store with insert/remove/search/line access
//! - [`search`]: the literal matching and line-marker scanning it is built on
//!
//! # Examples
//!
//! ```
//! use redraft::TextBuffer;
//!
//! let mut buffer = TextBuffer::with_text("abc");
//! buffer.insert(3, "def").unwrap();
//! assert_eq!(buffer.text(), "abcdef");
//!
//! buffer.remove(0, 3).unwrap();
//! assert_eq!(buffer.text(), "def");
//! assert_eq!(buffer.find_all("e"), vec![1]);
//! ```

mod buffer;
pub mod search;

pub use buffer::{GROWTH_FACTOR, INITIAL_CAPACITY, TextBuffer};
