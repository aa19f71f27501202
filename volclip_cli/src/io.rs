use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use volclip_clipboard::{ClipboardError, PromptAnswer, Transport};

/// The desktop clipboard.
pub struct SystemClipboard {
    clipboard: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn open() -> Result<Self, ClipboardError> {
        let clipboard = arboard::Clipboard::new().map_err(transport_error)?;
        Ok(Self { clipboard })
    }
}

impl Transport for SystemClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        self.clipboard.get_text().map_err(transport_error)
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.clipboard.set_text(text).map_err(transport_error)
    }
}

fn transport_error(err: arboard::Error) -> ClipboardError {
    ClipboardError::Transport(err.to_string())
}

/// A snapshot kept in a file instead of on the clipboard.
pub struct FileTransport {
    pub path: PathBuf,
}

impl Transport for FileTransport {
    fn read(&mut self) -> Result<String, ClipboardError> {
        fs::read_to_string(&self.path)
            .map_err(|err| ClipboardError::Transport(format!("{}: {err}", self.path.display())))
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        fs::write(&self.path, text)
            .map_err(|err| ClipboardError::Transport(format!("{}: {err}", self.path.display())))
    }
}

/// Asks on the terminal. Anything unreadable counts as "no".
pub fn ask_on_stdin(package: &str) -> PromptAnswer {
    eprint!("load sub-level `{package}`? [y]es / [n]o / [a]ll / n[o]ne: ");
    let _ = io::stderr().flush();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return PromptAnswer::No;
    }
    parse_answer(&line)
}

fn parse_answer(line: &str) -> PromptAnswer {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => PromptAnswer::Yes,
        "a" | "all" => PromptAnswer::YesAll,
        "o" | "none" => PromptAnswer::NoAll,
        _ => PromptAnswer::No,
    }
}
