//! Terminal implementation of [`Editor`].

use anyhow::{Context, Result, bail};
use log::debug;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{Editor, Validator};

/// Core, testable pick list that reads from any BufRead and writes to any Write.
///
/// Accepts a 1-based index or the exact item text. Empty input or EOF cancels.
pub(crate) fn pick_with_io<R: BufRead, W: Write>(
    items: &[String],
    placeholder: &str,
    input: &mut R,
    output: &mut W,
) -> Result<Option<String>> {
    if items.is_empty() {
        writeln!(output, "Nothing to choose from.")?;
        return Ok(None);
    }

    writeln!(output, "{}", placeholder)?;
    for (i, item) in items.iter().enumerate() {
        writeln!(output, "{:>4}) {}", i + 1, item)?;
    }

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim();
        if answer.is_empty() {
            return Ok(None);
        }

        if let Ok(n) = answer.parse::<usize>()
            && (1..=items.len()).contains(&n)
        {
            return Ok(Some(items[n - 1].clone()));
        }
        if let Some(item) = items.iter().find(|item| item.as_str() == answer) {
            return Ok(Some(item.clone()));
        }

        writeln!(output, "Please enter a number between 1 and {}", items.len())?;
    }
}

/// Core, testable text prompt. Empty input takes the default; EOF cancels.
pub(crate) fn input_with_io<R: BufRead, W: Write>(
    prompt: &str,
    default: &str,
    validate: Validator,
    input: &mut R,
    output: &mut W,
) -> Result<Option<String>> {
    loop {
        if default.is_empty() {
            write!(output, "{}: ", prompt)?;
        } else {
            write!(output, "{} [{}]: ", prompt, default)?;
        }
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let value = match line.trim() {
            "" => default.to_string(),
            answer => answer.to_string(),
        };

        match validate(&value) {
            Some(message) => writeln!(output, "{}", message)?,
            None => return Ok(Some(value)),
        }
    }
}

/// Insert `text` as its own line before 1-based `line`, or append it as the
/// last line when `line` is `None` or past the end.
pub fn insert_at_line(content: &str, text: &str, line: Option<usize>) -> String {
    let mut result = String::with_capacity(content.len() + text.len() + 2);

    if let Some(n) = line.filter(|n| *n >= 1) {
        let mut offset = 0;
        for (i, existing) in content.split_inclusive('\n').enumerate() {
            if i + 1 == n {
                break;
            }
            offset += existing.len();
        }
        if offset < content.len() {
            result.push_str(&content[..offset]);
            result.push_str(text);
            result.push('\n');
            result.push_str(&content[offset..]);
            return result;
        }
    }

    result.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        result.push('\n');
    }
    result.push_str(text);
    result.push('\n');
    result
}

/// Prompts on stdin/stdout. The "current document" is an optional file.
#[derive(Debug, Default, Clone)]
pub struct TerminalEditor {
    document: Option<PathBuf>,
    line: Option<usize>,
}

impl TerminalEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert text into `document` (before `line`, or at the end).
    pub fn with_document(mut self, document: Option<PathBuf>, line: Option<usize>) -> Self {
        self.document = document;
        self.line = line;
        self
    }

    fn editor_command() -> Option<String> {
        ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.trim().is_empty())
    }
}

impl Editor for TerminalEditor {
    fn pick(&self, items: &[String], placeholder: &str) -> Result<Option<String>> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        pick_with_io(items, placeholder, &mut stdin.lock(), &mut stdout)
    }

    fn input(&self, prompt: &str, default: &str, validate: Validator) -> Result<Option<String>> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        input_with_io(prompt, default, validate, &mut stdin.lock(), &mut stdout)
    }

    fn insert_text(&self, text: &str) -> Result<()> {
        let Some(document) = &self.document else {
            println!("{}", text);
            return Ok(());
        };

        let content = if document.exists() {
            std::fs::read_to_string(document)
                .with_context(|| format!("Failed to read {}", document.display()))?
        } else {
            String::new()
        };
        std::fs::write(document, insert_at_line(&content, text, self.line))
            .with_context(|| format!("Failed to write {}", document.display()))?;
        debug!("Inserted {:?} into {}", text, document.display());
        Ok(())
    }

    fn open_document(&self, path: &Path) -> Result<()> {
        let Some(command) = Self::editor_command() else {
            println!("{}", path.display());
            return Ok(());
        };

        // $EDITOR may carry arguments, e.g. "code --wait".
        let mut parts = command.split_whitespace();
        let program = parts.next().unwrap_or_default();
        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .status()
            .with_context(|| format!("Failed to start editor {:?}", command))?;
        if !status.success() {
            bail!("Editor {:?} exited with {}", command, status);
        }
        Ok(())
    }

    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("error: {}", message);
    }

    fn progress(&self, message: &str) {
        eprintln!("{}", message);
    }
}
