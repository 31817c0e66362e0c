// input.rs

use std::io::{self, BufRead, Write};

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};

use crate::completion::CommandCompleter;

#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The line was abandoned (Ctrl-C); nothing should be recorded.
    Interrupted,
    Eof,
}

pub trait LineSource {
    /// Shows `prompt` and blocks for one line.
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> io::Result<ReadOutcome>;
}

/// Plain reader for non-interactive input such as a piped script.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> io::Result<ReadOutcome> {
        write!(out, "{}", prompt)?;
        out.flush()?;
        let mut raw = Vec::new();
        if self.reader.read_until(b'\n', &mut raw)? == 0 {
            return Ok(ReadOutcome::Eof);
        }
        // invalid UTF-8 is replaced, not fatal
        Ok(ReadOutcome::Line(String::from_utf8_lossy(&raw).into_owned()))
    }
}

/// Line editor for terminals, with command completion and in-memory recall.
pub struct EditorSource {
    editor: Editor<CommandCompleter, DefaultHistory>,
}

impl EditorSource {
    pub fn new() -> Result<Self, ReadlineError> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(CommandCompleter::new()));
        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    // The editor renders the prompt itself.
    fn read_line(&mut self, prompt: &str, _out: &mut dyn Write) -> io::Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(ReadOutcome::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(err) => Err(io::Error::new(io::ErrorKind::Other, err.to_string())),
        }
    }
}
