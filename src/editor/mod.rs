//! Editor collaborator surface.
//!
//! Commands only interact with the user through [`Editor`]: pick lists, text
//! prompts, inserting text into the current document, opening documents and
//! notices. [`TerminalEditor`] implements it for the command line.

mod terminal;

use anyhow::Result;
use std::path::Path;

pub use terminal::{TerminalEditor, insert_at_line};

/// Prompt validation: an error message to show, or `None` to accept.
pub type Validator = fn(&str) -> Option<String>;

#[cfg_attr(test, mockall::automock)]
pub trait Editor: Send + Sync {
    /// Let the user choose one item. `None` when cancelled.
    fn pick(&self, items: &[String], placeholder: &str) -> Result<Option<String>>;

    /// Ask for one line of text, re-asking until `validate` accepts it.
    /// `None` when cancelled.
    fn input(&self, prompt: &str, default: &str, validate: Validator) -> Result<Option<String>>;

    /// Insert literal text at the caret of the current document.
    fn insert_text(&self, text: &str) -> Result<()>;

    /// Open a document and bring it into view.
    fn open_document(&self, path: &Path) -> Result<()>;

    fn info(&self, message: &str);
    fn error(&self, message: &str);

    /// Status of a long-running operation.
    fn progress(&self, message: &str);
}
