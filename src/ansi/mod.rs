// src/ansi/mod.rs

//! Decoding of the inbound serial byte stream: incremental UTF-8
//! re-assembly followed by escape-sequence scanning. Both stages hold
//! their incomplete tails across calls, so the pipeline is invariant
//! under arbitrary chunk splits.

mod commands;
mod lexer;
mod scanner;

pub use commands::{AnsiCommand, CsiCommand};
pub use lexer::Utf8Decoder;
pub use scanner::EscapeScanner;

/// Combines the UTF-8 decoder and the escape scanner.
///
/// Feed raw byte chunks as they arrive from the serial reader; each
/// call returns the commands that completed within (or across) chunks.
#[derive(Debug, Default)]
pub struct AnsiProcessor {
    decoder: Utf8Decoder,
    scanner: EscapeScanner,
}

impl AnsiProcessor {
    pub fn new() -> Self {
        AnsiProcessor::default()
    }

    /// Processes one received chunk and returns the completed commands.
    pub fn process_bytes(&mut self, bytes: &[u8]) -> Vec<AnsiCommand> {
        let text = self.decoder.decode(bytes);
        self.scanner.scan(&text)
    }

    /// True when either stage holds an incomplete tail.
    pub fn has_pending(&self) -> bool {
        self.decoder.has_pending() || self.scanner.has_pending()
    }

    /// Drops any incomplete tail. Called on disconnect, when the
    /// missing continuation can never arrive.
    pub fn discard_pending(&mut self) {
        self.decoder.discard_pending();
        self.scanner.discard_pending();
    }
}

#[cfg(test)]
mod tests;
