// src/term/buffer.rs

//! The authoritative text model the view renders.
//!
//! A flat sequence of characters (newlines included) plus a single
//! logical cursor: the position the remote device believes it is
//! editing at. Every mutation here is driven by a confirmed decoded
//! event, so the cursor is never updated speculatively.

use crate::ansi::{AnsiCommand, CsiCommand};

/// Flat character buffer with VT100 overwrite semantics.
///
/// Invariant: `0 <= cursor <= len` at all times.
#[derive(Debug, Clone, Default)]
pub struct TerminalBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl TerminalBuffer {
    pub fn new() -> Self {
        TerminalBuffer::default()
    }

    /// The device cursor position, as a character offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The buffer contents as a string.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Applies one decoded command.
    pub fn apply(&mut self, command: &AnsiCommand) {
        match command {
            AnsiCommand::Print('\x08') => self.backspace(),
            AnsiCommand::Print('\n') => self.newline(),
            AnsiCommand::Print(c) => self.overwrite(*c),
            AnsiCommand::Csi(CsiCommand::CursorUp(n)) => self.move_up(*n as usize),
            AnsiCommand::Csi(CsiCommand::CursorDown(n)) => self.move_down(*n as usize),
            AnsiCommand::Csi(CsiCommand::CursorForward(n)) => self.move_right(*n as usize),
            AnsiCommand::Csi(CsiCommand::CursorBackward(n)) => self.move_left(*n as usize),
            AnsiCommand::Csi(CsiCommand::EraseToEndOfLine) => self.erase_to_end_of_line(),
            // Already logged by the scanner; no buffer effect.
            AnsiCommand::Csi(CsiCommand::Unsupported(_)) => {}
        }
    }

    /// VT100 overwrite: a printable character replaces the character
    /// under the cursor (a newline under the cursor included, which
    /// joins two lines) and advances by one. It does not insert.
    pub fn overwrite(&mut self, c: char) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// `\b` moves the cursor left by one; nothing is deleted.
    pub fn backspace(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// `\n` moves to the end of the buffer and appends the line break.
    pub fn newline(&mut self) {
        self.chars.push('\n');
        self.cursor = self.chars.len();
    }

    pub fn move_left(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
    }

    pub fn move_right(&mut self, n: usize) {
        self.cursor = (self.cursor + n).min(self.chars.len());
    }

    /// Moves up `n` lines, keeping the column where the target line is
    /// long enough and clamping to its end otherwise. At the top line
    /// the cursor does not move.
    pub fn move_up(&mut self, n: usize) {
        let (line, column) = self.line_and_column();
        let target = line.saturating_sub(n);
        if target != line {
            self.cursor = self.offset_at(target, column);
        }
    }

    /// Moves down `n` lines; the mirror of [`Self::move_up`].
    pub fn move_down(&mut self, n: usize) {
        let (line, column) = self.line_and_column();
        let last = self.line_starts().len() - 1;
        let target = (line + n).min(last);
        if target != line {
            self.cursor = self.offset_at(target, column);
        }
    }

    /// Deletes from the cursor to the end of the current line, leaving
    /// the line break (if any) and the cursor in place.
    pub fn erase_to_end_of_line(&mut self) {
        let end = self.chars[self.cursor..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(self.chars.len(), |i| self.cursor + i);
        self.chars.drain(self.cursor..end);
    }

    /// Forces the cursor to the end of the buffer. Used when the local
    /// user presses return: the device cursor is resynced before the
    /// carriage return goes out.
    pub fn set_cursor_to_end(&mut self) {
        self.cursor = self.chars.len();
    }

    // Offsets of the first character of each line.
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, &c) in self.chars.iter().enumerate() {
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    fn line_and_column(&self) -> (usize, usize) {
        let starts = self.line_starts();
        let line = match starts.binary_search(&self.cursor) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (line, self.cursor - starts[line])
    }

    fn line_len(&self, starts: &[usize], line: usize) -> usize {
        let start = starts[line];
        let end = starts
            .get(line + 1)
            .map_or(self.chars.len(), |&next| next - 1);
        end - start
    }

    fn offset_at(&self, line: usize, column: usize) -> usize {
        let starts = self.line_starts();
        starts[line] + column.min(self.line_len(&starts, line))
    }
}
