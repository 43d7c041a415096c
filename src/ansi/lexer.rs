// src/ansi/lexer.rs

//! Incremental UTF-8 decoding of the inbound byte stream.
//! Serial reads are chunked arbitrarily by the OS, so a multi-byte
//! character routinely straddles two reads; the decoder buffers the
//! incomplete tail across calls instead of dropping it.

use log::warn;
use std::str;

/// Unicode replacement character (U+FFFD), substituted for malformed
/// byte sequences.
const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

// --- UTF-8 byte classification (RFC 3629) ---
const UTF8_ASCII_MAX: u8 = 0x7F;
const UTF8_CONT_MIN: u8 = 0x80;
const UTF8_CONT_MAX: u8 = 0xBF;
const UTF8_2_BYTE_MIN: u8 = 0xC2; // excludes overlong 0xC0, 0xC1
const UTF8_2_BYTE_MAX: u8 = 0xDF;
const UTF8_3_BYTE_MIN: u8 = 0xE0;
const UTF8_3_BYTE_MAX: u8 = 0xEF;
const UTF8_4_BYTE_MIN: u8 = 0xF0;
const UTF8_4_BYTE_MAX: u8 = 0xF4; // bytes above this can never start a sequence

/// Outcome of feeding a single byte to the decoder.
#[derive(Debug, PartialEq, Eq)]
enum Utf8DecodeResult {
    Decoded(char),
    InvalidSequence,
    NeedsMoreBytes,
}

/// Stateful, streaming UTF-8 re-assembler with a "replace invalid"
/// policy. State survives across `decode` calls, so a chunk boundary in
/// the middle of a character is invisible to downstream consumers.
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
    buffer: [u8; 4],
    len: usize,
    expected: usize,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Utf8Decoder::default()
    }

    /// Decodes a chunk into completed characters. A trailing incomplete
    /// sequence is held back and emitted once its continuation bytes
    /// arrive in a later call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut out = String::with_capacity(chunk.len());
        for &byte in chunk {
            self.feed(byte, &mut out);
        }
        out
    }

    /// True when a partial multi-byte sequence is buffered.
    pub fn has_pending(&self) -> bool {
        self.len > 0
    }

    /// Drops a buffered partial sequence. Called when the link closes:
    /// the continuation bytes can never arrive.
    pub fn discard_pending(&mut self) {
        if self.len > 0 {
            warn!(
                "discarding {} buffered byte(s) of an incomplete UTF-8 sequence",
                self.len
            );
            self.reset();
        }
    }

    fn feed(&mut self, byte: u8, out: &mut String) {
        match self.step(byte) {
            Utf8DecodeResult::Decoded(c) => out.push(c),
            Utf8DecodeResult::NeedsMoreBytes => {}
            Utf8DecodeResult::InvalidSequence => {
                warn!("invalid utf-8 byte 0x{:02X}, substituting U+FFFD", byte);
                out.push(REPLACEMENT_CHARACTER);
                // A byte that broke a sequence may itself start a valid
                // one; reprocess it from the ground state.
                if byte <= UTF8_ASCII_MAX || byte >= UTF8_2_BYTE_MIN {
                    match self.step(byte) {
                        Utf8DecodeResult::Decoded(c) => out.push(c),
                        Utf8DecodeResult::NeedsMoreBytes => {}
                        Utf8DecodeResult::InvalidSequence => {}
                    }
                }
            }
        }
    }

    fn step(&mut self, byte: u8) -> Utf8DecodeResult {
        if self.len == 0 {
            self.step_first_byte(byte)
        } else {
            self.step_continuation_byte(byte)
        }
    }

    fn step_first_byte(&mut self, byte: u8) -> Utf8DecodeResult {
        let expected = match byte {
            0..=UTF8_ASCII_MAX => return Utf8DecodeResult::Decoded(byte as char),
            UTF8_2_BYTE_MIN..=UTF8_2_BYTE_MAX => 2,
            UTF8_3_BYTE_MIN..=UTF8_3_BYTE_MAX => 3,
            UTF8_4_BYTE_MIN..=UTF8_4_BYTE_MAX => 4,
            // Continuation bytes, overlong starts (0xC0/0xC1) and
            // 0xF5..=0xFF cannot begin a sequence.
            _ => return Utf8DecodeResult::InvalidSequence,
        };
        self.expected = expected;
        self.buffer[0] = byte;
        self.len = 1;
        Utf8DecodeResult::NeedsMoreBytes
    }

    fn step_continuation_byte(&mut self, byte: u8) -> Utf8DecodeResult {
        if !(UTF8_CONT_MIN..=UTF8_CONT_MAX).contains(&byte) {
            self.reset();
            return Utf8DecodeResult::InvalidSequence;
        }

        self.buffer[self.len] = byte;
        self.len += 1;
        if self.len != self.expected {
            return Utf8DecodeResult::NeedsMoreBytes;
        }

        // str::from_utf8 rejects overlong encodings and surrogates.
        let result = match str::from_utf8(&self.buffer[..self.len]) {
            Ok(s) => match s.chars().next() {
                Some(c) => Utf8DecodeResult::Decoded(c),
                None => Utf8DecodeResult::InvalidSequence,
            },
            Err(_) => Utf8DecodeResult::InvalidSequence,
        };
        self.reset();
        result
    }

    #[inline]
    fn reset(&mut self) {
        self.len = 0;
        self.expected = 0;
    }
}
