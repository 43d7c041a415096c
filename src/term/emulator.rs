// src/term/emulator.rs

//! Ties the decode pipeline to the text model.
//!
//! `TerminalEmulator` owns the buffer and the stateful decoder; inbound
//! chunks mutate the buffer, local editing intents come back out as
//! byte plans for the write queue.

use crate::ansi::AnsiProcessor;
use crate::term::buffer::TerminalBuffer;
use crate::term::input::VT100_RETURN;
use crate::term::reconciler;

#[derive(Debug, Default)]
pub struct TerminalEmulator {
    buffer: TerminalBuffer,
    processor: AnsiProcessor,
}

impl TerminalEmulator {
    pub fn new() -> Self {
        TerminalEmulator::default()
    }

    pub fn buffer(&self) -> &TerminalBuffer {
        &self.buffer
    }

    /// The device cursor position within the buffer.
    pub fn device_cursor(&self) -> usize {
        self.buffer.cursor()
    }

    /// Processes one received (already line-ending-normalized) chunk.
    /// Incomplete tails are carried inside the processor until the next
    /// chunk arrives.
    pub fn process_tty_data(&mut self, data: &[u8]) {
        for command in self.processor.process_bytes(data) {
            self.buffer.apply(&command);
        }
    }

    /// Plans the motion bytes that ask the device to move its cursor to
    /// `target`. The buffer is not touched; the move lands once the
    /// device echoes it back.
    pub fn move_cursor_to(&self, target: usize) -> Vec<u8> {
        reconciler::plan_move(self.buffer.cursor(), target)
    }

    /// Plans the deletion of the span `start..end`: motion to the span
    /// end, then one backspace per character.
    pub fn delete_selection(&self, start: usize, end: usize) -> Vec<u8> {
        reconciler::plan_selection_delete(self.buffer.cursor(), start, end)
    }

    /// Return key: the device cursor is resynced to the end of the
    /// buffer before the carriage return goes out, since the device
    /// will continue from its prompt there.
    pub fn press_return(&mut self) -> Vec<u8> {
        self.buffer.set_cursor_to_end();
        VT100_RETURN.to_vec()
    }

    /// Called when the link closes: a pending fragment can never be
    /// completed, so it is dropped (with a warning) rather than
    /// rendered.
    pub fn on_disconnected(&mut self) {
        self.processor.discard_pending();
    }
}
