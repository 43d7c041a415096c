// src/ansi/commands.rs

//! Defines the `AnsiCommand` enum representing the decoded character
//! stream and the cursor-control subset of CSI sequences this client
//! models.

use std::fmt;

/// A parsed CSI (`ESC [`) sequence.
///
/// Only the cursor-motion and erase-to-end-of-line forms a
/// microcontroller REPL emits are modeled; every other syntactically
/// valid sequence is carried as `Unsupported` so the scanner stays
/// synchronized without the buffer acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsiCommand {
    CursorUp(u16),
    CursorDown(u16),
    CursorForward(u16),
    CursorBackward(u16),
    EraseToEndOfLine,
    Unsupported(String),
}

/// One decoded event from the inbound character stream.
///
/// Plain characters (including `\b`, `\n` and `\r`) are emitted as
/// `Print` and interpreted by the terminal buffer, not by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnsiCommand {
    Print(char),
    Csi(CsiCommand),
}

impl fmt::Display for CsiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsiCommand::CursorUp(n) => write!(f, "cursor up {}", n),
            CsiCommand::CursorDown(n) => write!(f, "cursor down {}", n),
            CsiCommand::CursorForward(n) => write!(f, "cursor right {}", n),
            CsiCommand::CursorBackward(n) => write!(f, "cursor left {}", n),
            CsiCommand::EraseToEndOfLine => write!(f, "erase to end of line"),
            CsiCommand::Unsupported(raw) => write!(f, "unsupported sequence {}", raw),
        }
    }
}
