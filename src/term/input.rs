// src/term/input.rs

//! VT100 byte encodings for local key input.

pub const VT100_RETURN: &[u8] = b"\r";
pub const VT100_BACKSPACE: &[u8] = b"\x08";
pub const VT100_DELETE: &[u8] = b"\x1B[\x33\x7E";
pub const VT100_UP: &[u8] = b"\x1B[A";
pub const VT100_DOWN: &[u8] = b"\x1B[B";
pub const VT100_RIGHT: &[u8] = b"\x1B[C";
pub const VT100_LEFT: &[u8] = b"\x1B[D";
pub const VT100_HOME: &[u8] = b"\x1B[H";
pub const VT100_END: &[u8] = b"\x1B[F";

/// Maps Ctrl-A..Ctrl-Z to the control bytes 0x01..0x1A.
pub fn control_byte(letter: char) -> Option<u8> {
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some(1 + upper as u8 - b'A')
    } else {
        None
    }
}
