//! Command dispatch over a buffer, its history and a cipher.
//!
//! An outer shell maps its own input (menu entries, key bindings, scripts) to
//! [`EditCommand`] values and hands them to [`EditSession::execute`]. Raw edits
//! issued this way are recorded in the history under fixed labels, so every
//! command except searches, copies and batch markers is one undo step.
//!
//! ```
//! use redraft::{CommandOutcome, EditCommand, EditSession};
//!
//! let mut session = EditSession::new();
//! session.execute(EditCommand::Append { text: "ababab".into() }).unwrap();
//! let found = session.execute(EditCommand::Search { text: "ab".into() }).unwrap();
//! assert_eq!(found, CommandOutcome::Matches(vec![0, 2, 4]));
//!
//! session.execute(EditCommand::Undo).unwrap();
//! assert!(session.buffer().is_empty());
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cipher::{Cipher, PassThrough};
use crate::error::Result;
use crate::history::{History, HistoryOptions};
use crate::text::TextBuffer;

const APPEND_LABEL: &str = "append";
const NEW_LINE_LABEL: &str = "new line";
const INSERT_LABEL: &str = "insert";
const REMOVE_LABEL: &str = "remove";
const CLEAR_LABEL: &str = "clear";
const ENCRYPT_LABEL: &str = "encrypt";
const DECRYPT_LABEL: &str = "decrypt";

/// A single editing command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditCommand {
    Append { text: String },
    AddNewLine,
    Insert { position: usize, text: String },
    Remove { position: usize, length: usize },
    Clear,
    Search { text: String },
    Copy { start: usize, length: usize },
    CopyAll,
    Cut { start: usize, length: usize },
    CutAll,
    /// Paste at `position`, or at the end of the buffer when absent.
    Paste {
        #[serde(default)]
        position: Option<usize>,
    },
    Undo,
    Redo,
    ReplaceAll { search: String, replacement: String },
    ReplaceSelection {
        start: usize,
        length: usize,
        text: String,
    },
    BeginBatch,
    EndBatch { label: String },
    Encrypt,
    Decrypt,
}

impl EditCommand {
    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Append { .. } => "append",
            Self::AddNewLine => "add_new_line",
            Self::Insert { .. } => "insert",
            Self::Remove { .. } => "remove",
            Self::Clear => "clear",
            Self::Search { .. } => "search",
            Self::Copy { .. } => "copy",
            Self::CopyAll => "copy_all",
            Self::Cut { .. } => "cut",
            Self::CutAll => "cut_all",
            Self::Paste { .. } => "paste",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::ReplaceAll { .. } => "replace_all",
            Self::ReplaceSelection { .. } => "replace_selection",
            Self::BeginBatch => "begin_batch",
            Self::EndBatch { .. } => "end_batch",
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

/// What a successful command produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Done,
    /// Match positions from [`EditCommand::Search`].
    Matches(Vec<usize>),
    /// Replacement count from [`EditCommand::ReplaceAll`].
    Replaced(usize),
}

/// One buffer, its history and the cipher used by encrypt/decrypt.
pub struct EditSession {
    buffer: TextBuffer,
    history: History,
    cipher: Box<dyn Cipher>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    /// Empty buffer, default history options, [`PassThrough`] cipher.
    #[must_use]
    pub fn new() -> Self {
        Self::with_buffer(TextBuffer::new(), HistoryOptions::default())
    }

    /// Start from existing content.
    #[must_use]
    pub fn with_buffer(buffer: TextBuffer, options: HistoryOptions) -> Self {
        let mut history = History::with_options(options);
        history.set_baseline(&buffer);
        Self {
            buffer,
            history,
            cipher: Box::new(PassThrough),
        }
    }

    /// Replace the cipher.
    #[must_use]
    pub fn with_cipher(mut self, cipher: impl Cipher + 'static) -> Self {
        self.cipher = Box::new(cipher);
        self
    }

    #[must_use]
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Mutable history access for configuration (auto-save, bounds, import).
    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    #[must_use]
    pub fn cipher(&self) -> &dyn Cipher {
        self.cipher.as_ref()
    }

    /// Replace the content wholesale and start a fresh history.
    ///
    /// The clipboard and history options are kept.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        self.buffer.set_from_raw_data(data)?;
        self.history.clear_history();
        self.history.set_baseline(&self.buffer);
        debug!(bytes = data.len(), "session content loaded");
        Ok(())
    }

    /// Run one command.
    ///
    /// On error nothing has changed.
    pub fn execute(&mut self, command: EditCommand) -> Result<CommandOutcome> {
        debug!(command = command.name(), "executing command");
        match command {
            EditCommand::Append { text } => {
                let at = self.buffer.len();
                self.buffer.append(&text)?;
                self.history.save_state_at(&self.buffer, APPEND_LABEL, at);
            }
            EditCommand::AddNewLine => {
                let at = self.buffer.len();
                self.buffer.add_new_line()?;
                self.history.save_state_at(&self.buffer, NEW_LINE_LABEL, at);
            }
            EditCommand::Insert { position, text } => {
                self.buffer.insert(position, &text)?;
                self.history.save_state_at(&self.buffer, INSERT_LABEL, position);
            }
            EditCommand::Remove { position, length } => {
                self.buffer.remove(position, length)?;
                self.history.save_state_at(&self.buffer, REMOVE_LABEL, position);
            }
            EditCommand::Clear => {
                self.buffer.clear();
                self.history.save_state(&self.buffer, CLEAR_LABEL);
            }
            EditCommand::Search { text } => {
                return Ok(CommandOutcome::Matches(self.buffer.find_all(&text)));
            }
            EditCommand::Copy { start, length } => {
                self.history.copy_region(&self.buffer, start, length)?;
            }
            EditCommand::CopyAll => self.history.copy_from_buffer(&self.buffer),
            EditCommand::Cut { start, length } => {
                self.history
                    .cut_from_buffer(&mut self.buffer, start, length)?;
            }
            EditCommand::CutAll => self.history.cut_all(&mut self.buffer)?,
            EditCommand::Paste { position } => match position {
                Some(position) => self.history.paste_at(&mut self.buffer, position)?,
                None => self.history.paste_from_clipboard(&mut self.buffer)?,
            },
            EditCommand::Undo => self.history.undo(&mut self.buffer)?,
            EditCommand::Redo => self.history.redo(&mut self.buffer)?,
            EditCommand::ReplaceAll {
                search,
                replacement,
            } => {
                let count = self
                    .history
                    .replace_all(&mut self.buffer, &search, &replacement)?;
                return Ok(CommandOutcome::Replaced(count));
            }
            EditCommand::ReplaceSelection {
                start,
                length,
                text,
            } => {
                self.history
                    .replace_selection(&mut self.buffer, start, length, &text)?;
            }
            EditCommand::BeginBatch => self.history.begin_batch_operation()?,
            EditCommand::EndBatch { label } => {
                self.history.end_batch_operation(&self.buffer, &label)?;
            }
            EditCommand::Encrypt => {
                let data = self.cipher.encrypt(self.buffer.as_bytes())?;
                self.buffer.set_from_raw_data(&data)?;
                self.history.save_state(&self.buffer, ENCRYPT_LABEL);
            }
            EditCommand::Decrypt => {
                let data = self.cipher.decrypt(self.buffer.as_bytes())?;
                self.buffer.set_from_raw_data(&data)?;
                self.history.save_state(&self.buffer, DECRYPT_LABEL);
            }
        }
        Ok(CommandOutcome::Done)
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("buffer_len", &self.buffer.len())
            .field("history", &self.history)
            .field("cipher", &self.cipher.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct Xor(u8);

    impl Cipher for Xor {
        fn name(&self) -> &str {
            "xor"
        }

        fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
            Ok(data.iter().map(|byte| byte ^ self.0).collect())
        }

        fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
            self.encrypt(data)
        }
    }

    struct Broken;

    impl Cipher for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn encrypt(&self, _data: &[u8]) -> Result<Vec<u8>> {
            Err(Error::Cipher("no key".into()))
        }

        fn decrypt(&self, _data: &[u8]) -> Result<Vec<u8>> {
            Err(Error::Cipher("no key".into()))
        }
    }

    fn run(session: &mut EditSession, commands: Vec<EditCommand>) {
        for command in commands {
            session.execute(command).unwrap();
        }
    }

    #[test]
    fn test_raw_edits_are_recorded() {
        let mut session = EditSession::new();
        run(
            &mut session,
            vec![
                EditCommand::Append { text: "abc".into() },
                EditCommand::AddNewLine,
                EditCommand::Insert {
                    position: 0,
                    text: ">".into(),
                },
                EditCommand::Remove {
                    position: 1,
                    length: 1,
                },
            ],
        );
        assert_eq!(session.buffer().text(), ">bc\n");
        assert_eq!(
            session.history().undo_operations(),
            vec!["append", "new line", "insert", "remove"]
        );

        session.execute(EditCommand::Undo).unwrap();
        assert_eq!(session.buffer().text(), ">abc\n");
        session.execute(EditCommand::Redo).unwrap();
        assert_eq!(session.buffer().text(), ">bc\n");
    }

    #[test]
    fn test_clipboard_commands() {
        let mut session = EditSession::new();
        run(
            &mut session,
            vec![
                EditCommand::Append {
                    text: "hello world".into(),
                },
                EditCommand::Copy {
                    start: 0,
                    length: 5,
                },
                EditCommand::Paste { position: None },
                EditCommand::Cut {
                    start: 0,
                    length: 6,
                },
                EditCommand::Paste { position: Some(0) },
            ],
        );
        assert_eq!(session.buffer().text(), "hello worldhello");
        assert_eq!(session.history().clipboard_text().as_deref(), Some("hello "));

        session.execute(EditCommand::CutAll).unwrap();
        assert!(session.buffer().is_empty());
        session.execute(EditCommand::CopyAll).unwrap();
        assert_eq!(session.history().clipboard_size(), 0);
    }

    #[test]
    fn test_replace_commands() {
        let mut session = EditSession::with_buffer(
            TextBuffer::with_text("a-b-c"),
            HistoryOptions::default(),
        );
        let outcome = session
            .execute(EditCommand::ReplaceAll {
                search: "-".into(),
                replacement: "+".into(),
            })
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Replaced(2));
        session
            .execute(EditCommand::ReplaceSelection {
                start: 0,
                length: 1,
                text: "A".into(),
            })
            .unwrap();
        assert_eq!(session.buffer().text(), "A+b+c");

        session.execute(EditCommand::Undo).unwrap();
        session.execute(EditCommand::Undo).unwrap();
        assert_eq!(session.buffer().text(), "a-b-c");
    }

    #[test]
    fn test_batch_commands() {
        let mut session = EditSession::new();
        run(
            &mut session,
            vec![
                EditCommand::BeginBatch,
                EditCommand::Append { text: "one".into() },
                EditCommand::Append { text: "two".into() },
                EditCommand::EndBatch {
                    label: "typing".into(),
                },
            ],
        );
        assert_eq!(session.history().undo_operations(), vec!["typing"]);
        session.execute(EditCommand::Undo).unwrap();
        assert!(session.buffer().is_empty());
        assert_eq!(
            session.execute(EditCommand::EndBatch { label: "x".into() }),
            Err(Error::NoBatch)
        );
    }

    #[test]
    fn test_encrypt_round_trip() {
        let mut session = EditSession::new().with_cipher(Xor(0x20));
        assert_eq!(session.cipher().name(), "xor");
        run(
            &mut session,
            vec![
                EditCommand::Append { text: "abc".into() },
                EditCommand::Encrypt,
            ],
        );
        assert_eq!(session.buffer().text(), "ABC");
        session.execute(EditCommand::Decrypt).unwrap();
        assert_eq!(session.buffer().text(), "abc");
        assert_eq!(
            session.history().undo_operations(),
            vec!["append", "encrypt", "decrypt"]
        );
    }

    #[test]
    fn test_cipher_failure_changes_nothing() {
        let mut session = EditSession::new().with_cipher(Broken);
        session
            .execute(EditCommand::Append { text: "abc".into() })
            .unwrap();
        assert_eq!(
            session.execute(EditCommand::Encrypt),
            Err(Error::Cipher("no key".into()))
        );
        assert_eq!(session.buffer().text(), "abc");
        assert_eq!(session.history().undo_count(), 1);
    }

    #[test]
    fn test_failed_command_is_not_recorded() {
        let mut session = EditSession::new();
        assert!(matches!(
            session.execute(EditCommand::Insert {
                position: 3,
                text: "x".into()
            }),
            Err(Error::OutOfRange { .. })
        ));
        assert_eq!(session.execute(EditCommand::Undo), Err(Error::NothingToUndo));
        assert_eq!(
            session.execute(EditCommand::Paste { position: None }),
            Err(Error::EmptyClipboard)
        );
        assert_eq!(session.history().undo_count(), 0);
    }

    #[test]
    fn test_load_resets_history() {
        let mut session = EditSession::new();
        session
            .execute(EditCommand::Append { text: "draft".into() })
            .unwrap();
        session.load(b"from disk").unwrap();
        assert_eq!(session.buffer().text(), "from disk");
        assert!(!session.history().can_undo());

        session.execute(EditCommand::Clear).unwrap();
        session.execute(EditCommand::Undo).unwrap();
        assert_eq!(session.buffer().text(), "from disk");
    }

    #[test]
    fn test_history_configured_through_session() {
        let mut session = EditSession::new();
        session.history_mut().set_max_history_size(1);
        for text in ["a", "b", "c"] {
            session
                .execute(EditCommand::Append { text: text.into() })
                .unwrap();
        }
        assert_eq!(session.history().undo_count(), 1);
        session.execute(EditCommand::Undo).unwrap();
        assert_eq!(session.buffer().text(), "ab");
    }

    #[test]
    fn test_commands_deserialize_from_script() {
        let script = r#"[
            { "command": "append", "text": "hi" },
            { "command": "paste" },
            { "command": "replace_all", "search": "h", "replacement": "H" },
            { "command": "undo" }
        ]"#;
        let commands: Vec<EditCommand> = serde_json::from_str(script).unwrap();
        assert_eq!(commands[0], EditCommand::Append { text: "hi".into() });
        assert_eq!(commands[1], EditCommand::Paste { position: None });
        assert_eq!(commands[3].name(), "undo");

        let json = serde_json::to_string(&EditCommand::CutAll).unwrap();
        assert_eq!(json, r#"{"command":"cut_all"}"#);
    }
}
