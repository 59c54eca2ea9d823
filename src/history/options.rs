//! History engine configuration.

use serde::{Deserialize, Serialize};

/// Default bound on the undo stack.
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 100;

/// Default number of recorded operations between auto-save callbacks.
pub const DEFAULT_AUTO_SAVE_INTERVAL: usize = 10;

/// Options for a [`History`](crate::History).
///
/// Deserializable from any serde format so an outer shell can load it from
/// its own configuration source; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryOptions {
    /// Maximum number of undo entries. The oldest entry is evicted first.
    pub max_history_size: usize,
    /// Invoke the auto-save callback every `auto_save_interval` recorded operations.
    pub auto_save_enabled: bool,
    /// Operations between auto-save callbacks. Zero disables the callback.
    pub auto_save_interval: usize,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
            auto_save_enabled: false,
            auto_save_interval: DEFAULT_AUTO_SAVE_INTERVAL,
        }
    }
}

impl HistoryOptions {
    #[must_use]
    pub fn with_max_history_size(mut self, max_history_size: usize) -> Self {
        self.max_history_size = max_history_size;
        self
    }

    #[must_use]
    pub fn with_auto_save(mut self, interval: usize) -> Self {
        self.auto_save_enabled = true;
        self.auto_save_interval = interval;
        self
    }
}
