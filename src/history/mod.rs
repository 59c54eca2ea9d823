//! Snapshot-based undo/redo history with a clipboard slot and batch grouping.
//!
//! [`History`] never holds a reference to the live buffer. It borrows the
//! buffer for the duration of a call and keeps only deep-copied
//! [`HistoryState`] snapshots.
//!
//! # Recording model
//!
//! The engine remembers the content present at the last record point (the
//! *baseline*). Callers edit the buffer directly and then call
//! [`History::save_state`]; the engine pushes the baseline under the given
//! label and moves the baseline to the live content. Undo therefore returns the
//! buffer to exactly what it was before the recorded edit:
//!
//! ```
//! use redraft::{Error, History, TextBuffer};
//!
//! let mut buffer = TextBuffer::with_text("abc");
//! let mut history = History::for_buffer(&buffer);
//!
//! buffer.insert(3, "def").unwrap();
//! history.save_state(&buffer, "insert");
//! buffer.remove(0, 3).unwrap();
//! history.save_state(&buffer, "remove");
//!
//! history.undo(&mut buffer).unwrap();
//! assert_eq!(buffer.text(), "abcdef");
//! history.undo(&mut buffer).unwrap();
//! assert_eq!(buffer.text(), "abc");
//! assert_eq!(history.undo(&mut buffer), Err(Error::NothingToUndo));
//! ```
//!
//! # Batches
//!
//! Between [`begin_batch_operation`](History::begin_batch_operation) and
//! [`end_batch_operation`](History::end_batch_operation) records are buffered
//! instead of pushed; ending the batch pushes a single entry holding the
//! pre-batch content, so one undo reverses the whole batch.

mod clipboard;
mod export;
mod options;
mod state;

use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::text::TextBuffer;

pub use clipboard::{Clipboard, ClipboardKind};
pub use export::FORMAT_VERSION;
pub use options::{DEFAULT_AUTO_SAVE_INTERVAL, DEFAULT_MAX_HISTORY_SIZE, HistoryOptions};
pub use state::{HistoryState, Timestamp};

/// Label recorded by [`History::cut_from_buffer`].
pub const CUT_LABEL: &str = "cut";
/// Label recorded by [`History::cut_all`].
pub const CUT_ALL_LABEL: &str = "cut all";
/// Label recorded by [`History::paste_from_clipboard`] and [`History::paste_at`].
pub const PASTE_LABEL: &str = "paste";
/// Label recorded by [`History::replace_all`].
pub const REPLACE_ALL_LABEL: &str = "replace all";
/// Label recorded by [`History::replace_selection`].
pub const REPLACE_SELECTION_LABEL: &str = "replace selection";
/// Label recorded by [`History::insert_with_replacement`].
pub const INSERT_WITH_REPLACEMENT_LABEL: &str = "insert with replacement";

type AutoSaveCallback = Box<dyn FnMut(&TextBuffer) + Send + 'static>;

/// Records buffered while a batch is open.
#[derive(Debug)]
struct Batch {
    pre_batch: Vec<u8>,
    states: Vec<HistoryState>,
}

/// Undo/redo stacks, clipboard slot and batch coordinator.
///
/// - **Record** ([`save_state`](Self::save_state)) pushes onto the undo stack,
///   clears the redo stack and evicts the oldest entry past
///   [`max_history_size`](Self::max_history_size).
/// - **Undo** moves the live content onto the redo stack and restores the
///   most recent undo entry.
/// - **Redo** is the mirror image. Any record after an undo clears the redo
///   stack, so the undone branch is no longer reachable.
///
/// Failed calls leave the buffer, both stacks and the clipboard untouched.
pub struct History {
    undo_stack: VecDeque<HistoryState>,
    redo_stack: VecDeque<HistoryState>,
    baseline: Vec<u8>,
    clipboard: Clipboard,
    batch: Option<Batch>,
    options: HistoryOptions,
    operation_count: u64,
    auto_save: Option<AutoSaveCallback>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a history whose baseline is empty content.
    ///
    /// Only suitable for a buffer that starts out empty: the first undo
    /// restores empty content. Use [`for_buffer`](Self::for_buffer) when the
    /// buffer already holds text.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(HistoryOptions::default())
    }

    /// Create a history with a custom undo bound.
    #[must_use]
    pub fn with_max_history_size(max_history_size: usize) -> Self {
        Self::with_options(HistoryOptions::default().with_max_history_size(max_history_size))
    }

    /// Create a history from options.
    #[must_use]
    pub fn with_options(options: HistoryOptions) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            baseline: Vec::new(),
            clipboard: Clipboard::new(),
            batch: None,
            options,
            operation_count: 0,
            auto_save: None,
        }
    }

    /// Create a history whose baseline is the current content of `buffer`.
    #[must_use]
    pub fn for_buffer(buffer: &TextBuffer) -> Self {
        let mut history = Self::new();
        history.set_baseline(buffer);
        history
    }

    /// Treat the current content of `buffer` as the last recorded state.
    ///
    /// Use after loading new content into the buffer outside the history.
    pub fn set_baseline(&mut self, buffer: &TextBuffer) {
        self.baseline.clear();
        self.baseline.extend_from_slice(buffer.as_bytes());
    }

    /// Live options.
    #[must_use]
    pub fn options(&self) -> &HistoryOptions {
        &self.options
    }

    // ------------------------------------------------------------------
    // Record / undo / redo
    // ------------------------------------------------------------------

    /// Record the edit that produced the current buffer content.
    pub fn save_state(&mut self, buffer: &TextBuffer, operation: &str) {
        self.save_state_at(buffer, operation, 0);
    }

    /// Record with a cursor position, clamped to the recorded content.
    pub fn save_state_at(&mut self, buffer: &TextBuffer, operation: &str, cursor: usize) {
        if let Some(batch) = self.batch.as_mut() {
            batch
                .states
                .push(HistoryState::new(buffer.as_bytes(), operation, cursor.min(buffer.len())));
            debug!(operation, buffered = batch.states.len(), "state buffered in batch");
            return;
        }
        let state = HistoryState::new(&self.baseline, operation, cursor.min(self.baseline.len()));
        self.record(state, buffer);
    }

    /// Restore the content that preceded the most recent record.
    pub fn undo(&mut self, buffer: &mut TextBuffer) -> Result<()> {
        if self.batch.is_some() {
            return Err(Error::BatchActive);
        }
        let Some(state) = self.undo_stack.pop_back() else {
            return Err(Error::NothingToUndo);
        };
        let current = HistoryState::new(
            buffer.as_bytes(),
            state.operation(),
            state.cursor_position().min(buffer.len()),
        );
        if let Err(err) = buffer.set_from_raw_data(state.content()) {
            self.undo_stack.push_back(state);
            return Err(err);
        }
        debug!(
            operation = state.operation(),
            undo = self.undo_stack.len(),
            redo = self.redo_stack.len() + 1,
            "undo"
        );
        self.redo_stack.push_back(current);
        self.set_baseline(buffer);
        Ok(())
    }

    /// Re-apply the most recently undone record.
    pub fn redo(&mut self, buffer: &mut TextBuffer) -> Result<()> {
        if self.batch.is_some() {
            return Err(Error::BatchActive);
        }
        let Some(state) = self.redo_stack.pop_back() else {
            return Err(Error::NothingToRedo);
        };
        let current = HistoryState::new(
            buffer.as_bytes(),
            state.operation(),
            state.cursor_position().min(buffer.len()),
        );
        if let Err(err) = buffer.set_from_raw_data(state.content()) {
            self.redo_stack.push_back(state);
            return Err(err);
        }
        debug!(
            operation = state.operation(),
            undo = self.undo_stack.len() + 1,
            redo = self.redo_stack.len(),
            "redo"
        );
        self.undo_stack.push_back(current);
        self.enforce_history_limit();
        self.set_baseline(buffer);
        Ok(())
    }

    /// Undo until the undo entry at `index` (0 = oldest retained) is restored.
    pub fn go_to_state(&mut self, index: usize, buffer: &mut TextBuffer) -> Result<()> {
        if index >= self.undo_stack.len() {
            return Err(Error::out_of_range(index, 1, self.undo_stack.len()));
        }
        if self.batch.is_some() {
            return Err(Error::BatchActive);
        }
        while self.undo_stack.len() > index {
            self.undo(buffer)?;
        }
        Ok(())
    }

    /// Drop both stacks. The clipboard and baseline are kept.
    pub fn clear_history(&mut self) {
        debug!(
            undo = self.undo_stack.len(),
            redo = self.redo_stack.len(),
            "history cleared"
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Maximum number of undo entries.
    #[must_use]
    pub fn max_history_size(&self) -> usize {
        self.options.max_history_size
    }

    /// Change the undo bound, evicting the oldest entries right away if needed.
    pub fn set_max_history_size(&mut self, max_history_size: usize) {
        self.options.max_history_size = max_history_size;
        self.enforce_history_limit();
    }

    /// Undo labels, oldest first.
    #[must_use]
    pub fn undo_operations(&self) -> Vec<&str> {
        self.undo_stack.iter().map(HistoryState::operation).collect()
    }

    /// Redo labels in stack order; the next entry to redo is last.
    #[must_use]
    pub fn redo_operations(&self) -> Vec<&str> {
        self.redo_stack.iter().map(HistoryState::operation).collect()
    }

    /// Most recent undo entry.
    #[must_use]
    pub fn current_state(&self) -> Option<&HistoryState> {
        self.undo_stack.back()
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    /// The clipboard slot.
    #[must_use]
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Replace the clipboard payload with text.
    pub fn copy_to_clipboard(&mut self, text: &str) {
        debug!(bytes = text.len(), "copied text to clipboard");
        self.clipboard.set_text(text);
    }

    /// Replace the clipboard payload with raw bytes.
    pub fn copy_bytes_to_clipboard(&mut self, data: &[u8]) {
        debug!(bytes = data.len(), "copied binary data to clipboard");
        self.clipboard.set_binary(data);
    }

    /// Copy the whole buffer.
    pub fn copy_from_buffer(&mut self, buffer: &TextBuffer) {
        self.clipboard.set_region(buffer.as_bytes());
    }

    /// Copy `length` bytes starting at `start`. The span must lie inside the buffer.
    pub fn copy_region(&mut self, buffer: &TextBuffer, start: usize, length: usize) -> Result<()> {
        let region = buffer.slice(start, length)?;
        self.clipboard.set_region(region);
        Ok(())
    }

    /// Paste at the end of the buffer.
    pub fn paste_from_clipboard(&mut self, buffer: &mut TextBuffer) -> Result<()> {
        let end = buffer.len();
        self.paste_at(buffer, end)
    }

    /// Paste at `position` and record the result as [`PASTE_LABEL`].
    pub fn paste_at(&mut self, buffer: &mut TextBuffer, position: usize) -> Result<()> {
        let Some(payload) = self.clipboard.bytes() else {
            return Err(Error::EmptyClipboard);
        };
        buffer.insert_bytes(position, payload)?;
        self.save_state_at(buffer, PASTE_LABEL, position);
        Ok(())
    }

    /// Move a region to the clipboard and record [`CUT_LABEL`].
    ///
    /// `length` is clamped to the content after `start`.
    pub fn cut_from_buffer(
        &mut self,
        buffer: &mut TextBuffer,
        start: usize,
        length: usize,
    ) -> Result<()> {
        self.cut(buffer, start, length, CUT_LABEL)
    }

    /// Move the whole buffer to the clipboard and record [`CUT_ALL_LABEL`].
    pub fn cut_all(&mut self, buffer: &mut TextBuffer) -> Result<()> {
        let length = buffer.len();
        self.cut(buffer, 0, length, CUT_ALL_LABEL)
    }

    fn cut(
        &mut self,
        buffer: &mut TextBuffer,
        start: usize,
        length: usize,
        label: &str,
    ) -> Result<()> {
        if start > buffer.len() {
            return Err(Error::out_of_range(start, length, buffer.len()));
        }
        let length = length.min(buffer.len() - start);
        self.clipboard.set_region(&buffer.as_bytes()[start..start + length]);
        buffer.remove(start, length)?;
        debug!(start, length, label, "cut region to clipboard");
        self.save_state_at(buffer, label, start);
        Ok(())
    }

    #[must_use]
    pub fn is_clipboard_empty(&self) -> bool {
        self.clipboard.is_empty()
    }

    #[must_use]
    pub fn clipboard_kind(&self) -> Option<ClipboardKind> {
        self.clipboard.kind()
    }

    #[must_use]
    pub fn clipboard_text(&self) -> Option<Cow<'_, str>> {
        self.clipboard.text()
    }

    #[must_use]
    pub fn clipboard_bytes(&self) -> Option<&[u8]> {
        self.clipboard.bytes()
    }

    #[must_use]
    pub fn clipboard_size(&self) -> usize {
        self.clipboard.size()
    }

    pub fn clear_clipboard(&mut self) {
        self.clipboard.clear();
    }

    // ------------------------------------------------------------------
    // Composite edits
    // ------------------------------------------------------------------

    /// Replace `length` bytes at `position` with `text` as one undo step.
    pub fn insert_with_replacement(
        &mut self,
        buffer: &mut TextBuffer,
        position: usize,
        length: usize,
        text: &str,
    ) -> Result<()> {
        self.replace_span(buffer, position, length, text, INSERT_WITH_REPLACEMENT_LABEL)
    }

    /// Replace the selection `start..start + length` with `text` as one undo step.
    pub fn replace_selection(
        &mut self,
        buffer: &mut TextBuffer,
        start: usize,
        length: usize,
        text: &str,
    ) -> Result<()> {
        self.replace_span(buffer, start, length, text, REPLACE_SELECTION_LABEL)
    }

    /// Replace every non-overlapping match of `search` as one undo step.
    ///
    /// Returns the number of replacements; nothing is recorded when there are none.
    pub fn replace_all(
        &mut self,
        buffer: &mut TextBuffer,
        search: &str,
        replacement: &str,
    ) -> Result<usize> {
        let positions = buffer.find_all(search);
        let Some(&first) = positions.first() else {
            return Ok(0);
        };

        self.batched(buffer, REPLACE_ALL_LABEL, |history, buffer| {
            let growth = replacement.len().saturating_sub(search.len()) * positions.len();
            buffer.reserve_additional(growth)?;
            // Back to front so earlier positions stay valid.
            for &position in positions.iter().rev() {
                buffer.remove(position, search.len())?;
                buffer.insert(position, replacement)?;
            }
            history.save_state_at(buffer, REPLACE_ALL_LABEL, first);
            Ok(positions.len())
        })
    }

    fn replace_span(
        &mut self,
        buffer: &mut TextBuffer,
        position: usize,
        length: usize,
        text: &str,
        label: &str,
    ) -> Result<()> {
        if position > buffer.len() {
            return Err(Error::out_of_range(position, length, buffer.len()));
        }
        self.batched(buffer, label, |history, buffer| {
            buffer.reserve_additional(text.len())?;
            buffer.remove(position, length)?;
            buffer.insert(position, text)?;
            history.save_state_at(buffer, label, position);
            Ok(())
        })
    }

    /// Run `edit` inside a batch, or inside the caller's batch if one is open.
    fn batched<T>(
        &mut self,
        buffer: &mut TextBuffer,
        label: &str,
        edit: impl FnOnce(&mut Self, &mut TextBuffer) -> Result<T>,
    ) -> Result<T> {
        let owns_batch = self.batch.is_none();
        if owns_batch {
            self.begin_batch_operation()?;
        }
        let result = edit(self, buffer);
        if owns_batch {
            if result.is_ok() {
                self.end_batch_operation(buffer, label)?;
            } else {
                self.batch = None;
            }
        }
        result
    }

    // ------------------------------------------------------------------
    // Batches
    // ------------------------------------------------------------------

    /// Start buffering records. Only one batch can be open at a time.
    pub fn begin_batch_operation(&mut self) -> Result<()> {
        if self.batch.is_some() {
            return Err(Error::BatchActive);
        }
        debug!("batch started");
        self.batch = Some(Batch {
            pre_batch: self.baseline.clone(),
            states: Vec::new(),
        });
        Ok(())
    }

    /// Close the batch and push one entry holding the pre-batch content.
    pub fn end_batch_operation(&mut self, buffer: &TextBuffer, label: &str) -> Result<()> {
        let Some(batch) = self.batch.take() else {
            return Err(Error::NoBatch);
        };
        let cursor = batch
            .states
            .last()
            .map_or(0, HistoryState::cursor_position)
            .min(batch.pre_batch.len());
        debug!(label, merged = batch.states.len(), "batch ended");
        let state = HistoryState::new(&batch.pre_batch, label, cursor);
        self.record(state, buffer);
        Ok(())
    }

    #[must_use]
    pub fn is_batch_mode(&self) -> bool {
        self.batch.is_some()
    }

    /// Records buffered in the open batch.
    #[must_use]
    pub fn pending_batch_states(&self) -> usize {
        self.batch.as_ref().map_or(0, |batch| batch.states.len())
    }

    // ------------------------------------------------------------------
    // Auto-save
    // ------------------------------------------------------------------

    /// Enable or disable the auto-save callback and set its interval.
    pub fn set_auto_save(&mut self, enabled: bool, interval: usize) {
        self.options.auto_save_enabled = enabled;
        self.options.auto_save_interval = interval;
    }

    #[must_use]
    pub fn is_auto_save_enabled(&self) -> bool {
        self.options.auto_save_enabled
    }

    #[must_use]
    pub fn auto_save_interval(&self) -> usize {
        self.options.auto_save_interval
    }

    /// Register the callback invoked every `auto_save_interval` recorded operations.
    pub fn on_auto_save<F>(&mut self, callback: F)
    where
        F: FnMut(&TextBuffer) + Send + 'static,
    {
        self.auto_save = Some(Box::new(callback));
    }

    fn check_auto_save(&mut self, buffer: &TextBuffer) {
        let interval = self.options.auto_save_interval as u64;
        if !self.options.auto_save_enabled || interval == 0 || self.operation_count % interval != 0
        {
            return;
        }
        if let Some(callback) = self.auto_save.as_mut() {
            debug!(operations = self.operation_count, "auto-save triggered");
            callback(buffer);
        }
    }

    // ------------------------------------------------------------------
    // Maintenance and inspection
    // ------------------------------------------------------------------

    /// Drop consecutive entries whose content is identical, keeping the older.
    ///
    /// Every content reachable by undo/redo before the call is still reachable.
    /// Returns the number of entries removed.
    pub fn compress_history(&mut self) -> usize {
        let removed = dedup_consecutive(&mut self.undo_stack) + dedup_consecutive(&mut self.redo_stack);
        debug!(removed, "history compressed");
        removed
    }

    /// Approximate bytes retained by snapshots, the baseline and the clipboard.
    #[must_use]
    pub fn history_memory_usage(&self) -> usize {
        let stacks: usize = self
            .undo_stack
            .iter()
            .chain(&self.redo_stack)
            .map(HistoryState::memory_usage)
            .sum();
        let batch = self.batch.as_ref().map_or(0, |batch| {
            batch.pre_batch.len()
                + batch
                    .states
                    .iter()
                    .map(HistoryState::memory_usage)
                    .sum::<usize>()
        });
        stacks + batch + self.baseline.len() + self.clipboard.size()
    }

    /// Two-line summary of both stacks.
    #[must_use]
    pub fn operation_summary(&self) -> String {
        fn line(name: &str, labels: &[&str]) -> String {
            if labels.is_empty() {
                format!("{name} (0): <none>")
            } else {
                format!("{name} ({}): {}", labels.len(), labels.join(", "))
            }
        }
        format!(
            "{}\n{}",
            line("undo", &self.undo_operations()),
            line("redo", &self.redo_operations())
        )
    }

    /// Timestamps of the undo entries, oldest first.
    #[must_use]
    pub fn operation_timestamps(&self) -> Vec<Timestamp> {
        self.undo_stack.iter().map(HistoryState::timestamp).collect()
    }

    /// Records pushed since creation, batches counting once.
    #[must_use]
    pub fn operation_count(&self) -> u64 {
        self.operation_count
    }

    /// Check the undo bound and every snapshot's cursor.
    #[must_use]
    pub fn validate_integrity(&self) -> bool {
        let bounded = self.undo_stack.len() <= self.options.max_history_size;
        let batch_states = self.batch.iter().flat_map(|batch| batch.states.iter());
        bounded
            && self
                .undo_stack
                .iter()
                .chain(&self.redo_stack)
                .chain(batch_states)
                .all(HistoryState::is_valid)
    }

    // ------------------------------------------------------------------
    // Export / import
    // ------------------------------------------------------------------

    /// Serialize both stacks as JSON.
    pub fn export_history(&self) -> Result<String> {
        export::export(&self.undo_stack, &self.redo_stack)
    }

    /// Replace both stacks with the contents of an export document.
    ///
    /// The document is validated in full before anything changes. Entries
    /// beyond the current bound are dropped from both stacks: the oldest undo
    /// entries and the redo entries furthest from the live content.
    pub fn import_history(&mut self, data: &str) -> Result<()> {
        if self.batch.is_some() {
            return Err(Error::BatchActive);
        }
        let stacks = export::import(data).inspect_err(|err| {
            warn!(error = %err, "history import rejected");
        })?;
        debug!(
            undo = stacks.undo.len(),
            redo = stacks.redo.len(),
            "history imported"
        );
        self.undo_stack = stacks.undo;
        self.redo_stack = stacks.redo;
        self.enforce_history_limit();
        while self.redo_stack.len() > self.options.max_history_size {
            self.redo_stack.pop_front();
        }
        Ok(())
    }

    fn record(&mut self, state: HistoryState, buffer: &TextBuffer) {
        debug!(
            operation = state.operation(),
            undo = self.undo_stack.len() + 1,
            "state recorded"
        );
        self.undo_stack.push_back(state);
        self.redo_stack.clear();
        self.enforce_history_limit();
        self.set_baseline(buffer);
        self.operation_count += 1;
        self.check_auto_save(buffer);
    }

    fn enforce_history_limit(&mut self) {
        while self.undo_stack.len() > self.options.max_history_size {
            if let Some(evicted) = self.undo_stack.pop_front() {
                debug!(operation = evicted.operation(), "evicted oldest undo entry");
            }
        }
    }
}

fn dedup_consecutive(stack: &mut VecDeque<HistoryState>) -> usize {
    let before = stack.len();
    let mut kept: VecDeque<HistoryState> = VecDeque::with_capacity(before);
    for state in stack.drain(..) {
        if kept
            .back()
            .is_some_and(|previous| previous.content() == state.content())
        {
            continue;
        }
        kept.push_back(state);
    }
    *stack = kept;
    before - stack.len()
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .field("clipboard", &self.clipboard.kind())
            .field("batch", &self.batch.is_some())
            .field("options", &self.options)
            .field("operation_count", &self.operation_count)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "undo:")?;
        for (index, state) in self.undo_stack.iter().enumerate() {
            writeln!(
                f,
                "  {index}: {} ({} bytes, cursor {})",
                state.operation(),
                state.content().len(),
                state.cursor_position()
            )?;
        }
        write!(f, "redo:")?;
        for (index, state) in self.redo_stack.iter().enumerate() {
            write!(
                f,
                "\n  {index}: {} ({} bytes, cursor {})",
                state.operation(),
                state.content().len(),
                state.cursor_position()
            )?;
        }
        Ok(())
    }
}
