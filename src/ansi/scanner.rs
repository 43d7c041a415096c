// src/ansi/scanner.rs

//! VT100/ANSI escape sequence scanner.
//!
//! Operates on the decoded character stream, left to right, and is
//! re-entrant across calls: a sequence split by a chunk boundary is
//! deferred in full and re-scanned once the rest arrives. The scanner
//! never consumes bytes it cannot fully interpret.

use super::commands::{AnsiCommand, CsiCommand};
use log::warn;
use std::mem;

const ESC: char = '\x1B';

// ECMA-48 CSI structure: parameter bytes, then intermediate bytes, then
// one final byte. Accepting the full ranges keeps the scanner
// synchronized on sequences this client does not act on (SGR, private
// modes, ...).
const CSI_PARAM_RANGE: std::ops::RangeInclusive<char> = '\x30'..='\x3F';
const CSI_INTERMEDIATE_RANGE: std::ops::RangeInclusive<char> = '\x20'..='\x2F';
const CSI_FINAL_RANGE: std::ops::RangeInclusive<char> = '\x40'..='\x7E';

/// Scans decoded text for `ESC [ <params> <final>` sequences.
///
/// Characters that are not part of an escape sequence are passed
/// through as `AnsiCommand::Print`. The unconsumed tail of a chunk that
/// ends inside a sequence (or exactly at `ESC`) is kept in `pending`
/// and prefixed onto the next call.
#[derive(Debug, Clone, Default)]
pub struct EscapeScanner {
    pending: String,
}

impl EscapeScanner {
    pub fn new() -> Self {
        EscapeScanner::default()
    }

    /// True when a partial escape sequence is deferred.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drops a deferred partial sequence. Called when the link closes:
    /// the terminator can never arrive, and a bare `ESC` must not leak
    /// into the buffer as a literal character.
    pub fn discard_pending(&mut self) {
        if !self.pending.is_empty() {
            warn!(
                "discarding incomplete escape sequence {}",
                printable(&self.pending)
            );
            self.pending.clear();
        }
    }

    /// Scans `text` (prefixed with any deferred tail) and returns the
    /// completed commands.
    pub fn scan(&mut self, text: &str) -> Vec<AnsiCommand> {
        let data: Vec<char> = if self.pending.is_empty() {
            text.chars().collect()
        } else {
            let mut combined = mem::take(&mut self.pending);
            combined.push_str(text);
            combined.chars().collect()
        };

        let mut commands = Vec::new();
        let mut i = 0;
        while i < data.len() {
            let c = data[i];
            if c == ESC {
                if i + 1 < data.len() && data[i + 1] == '[' {
                    match parse_csi(&data[i..]) {
                        Some((consumed, command)) => {
                            if let CsiCommand::Unsupported(raw) = &command {
                                warn!("received unsupported VT100 command: {}", raw);
                            }
                            commands.push(AnsiCommand::Csi(command));
                            i += consumed;
                            continue;
                        }
                        None => {
                            // No final byte before the chunk ended;
                            // defer everything from ESC onward.
                            self.pending = data[i..].iter().collect();
                            break;
                        }
                    }
                } else if i + 1 == data.len() {
                    // ESC as the very last character: end-of-transmission
                    // ambiguity, wait for the next chunk.
                    self.pending.push(ESC);
                    break;
                } else {
                    // ESC introducing something other than CSI; drop it
                    // and continue with the following character.
                    warn!("ignoring ESC followed by {:?}", data[i + 1]);
                }
            } else {
                commands.push(AnsiCommand::Print(c));
            }
            i += 1;
        }
        commands
    }
}

/// Parses one CSI sequence at the start of `data` (which begins with
/// `ESC [`). Returns the number of characters consumed and the decoded
/// command, or `None` when the final byte has not arrived yet.
fn parse_csi(data: &[char]) -> Option<(usize, CsiCommand)> {
    let mut i = 2; // past ESC [
    while i < data.len() && CSI_PARAM_RANGE.contains(&data[i]) {
        i += 1;
    }
    while i < data.len() && CSI_INTERMEDIATE_RANGE.contains(&data[i]) {
        i += 1;
    }
    if i >= data.len() {
        return None;
    }
    let action = data[i];
    if !CSI_FINAL_RANGE.contains(&action) {
        // Malformed body (e.g. a control byte inside the sequence).
        // Consume up to and including the offending character so the
        // scanner resynchronizes instead of deferring forever.
        let raw: String = data[..=i].iter().collect();
        return Some((i + 1, CsiCommand::Unsupported(printable(&raw))));
    }

    let body: String = data[2..i].iter().collect();
    let digits: String = body.chars().take_while(char::is_ascii_digit).collect();
    let plain_count = digits.len() == body.len(); // no ';', '?', ...
    let count: u16 = if digits.is_empty() {
        1
    } else {
        digits
            .chars()
            .fold(0u16, |n, d| n.saturating_mul(10).saturating_add(d as u16 - '0' as u16))
    };

    let command = match action {
        'A' if plain_count => CsiCommand::CursorUp(count),
        'B' if plain_count => CsiCommand::CursorDown(count),
        'C' if plain_count => CsiCommand::CursorForward(count),
        'D' if plain_count => CsiCommand::CursorBackward(count),
        // Only the parameterless form ("erase to end of line") is
        // modeled; ESC[1K / ESC[2K fall through to Unsupported.
        'K' if body.is_empty() => CsiCommand::EraseToEndOfLine,
        _ => {
            let raw: String = data[..=i].iter().collect();
            CsiCommand::Unsupported(printable(&raw))
        }
    };
    Some((i + 1, command))
}

/// Renders a sequence with `ESC` spelled out, for logs.
fn printable(raw: &str) -> String {
    raw.replace('\x1B', "<Esc>")
}
