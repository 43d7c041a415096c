// src/term/mod.rs

//! The local text model: an authoritative buffer of everything
//! received, the device cursor position within it, and the planning of
//! outbound motion bytes when the local user moves the cursor.

pub mod buffer;
pub mod emulator;
pub mod input;
pub mod reconciler;

pub use buffer::TerminalBuffer;
pub use emulator::TerminalEmulator;

#[cfg(test)]
mod tests;
