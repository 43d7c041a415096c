// src/session.rs

//! One serial session: the link, its event channel, and the terminal
//! emulator, driven from a single consuming thread.
//!
//! Worker threads never touch the buffer; everything they observe
//! arrives here as a `LinkEvent`, so every buffer and cursor mutation
//! is serialized on the draining thread.

use crate::serial::{LinkEvent, Result, SerialConfig, SerialLink};
use crate::settings::Settings;
use crate::term::TerminalEmulator;
use log::{debug, info, warn};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

pub struct Session {
    pub settings: Settings,
    emulator: TerminalEmulator,
    link: Option<SerialLink>,
    event_rx: Option<Receiver<LinkEvent>>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Session {
            settings,
            emulator: TerminalEmulator::new(),
            link: None,
            event_rx: None,
        }
    }

    pub fn emulator(&self) -> &TerminalEmulator {
        &self.emulator
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Opens `path` with the persisted serial configuration. Each
    /// connect creates a fresh link and event channel pair.
    pub fn connect(&mut self, path: &str) -> Result<()> {
        self.disconnect();
        let (event_tx, event_rx) = mpsc::channel();
        let link = SerialLink::connect(path, self.settings.serial.clone(), event_tx)?;
        info!("connected to {}", path);
        self.link = Some(link);
        self.event_rx = Some(event_rx);
        Ok(())
    }

    /// Tears the link down (joining its workers) and drops any decode
    /// state that can no longer be completed.
    pub fn disconnect(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.disconnect();
        }
        self.event_rx = None;
        self.emulator.on_disconnected();
    }

    /// Enqueues raw bytes for the device.
    pub fn send(&self, bytes: &[u8]) {
        match &self.link {
            Some(link) => link.send(bytes.to_vec()),
            None => warn!("not connected, dropping {} outbound byte(s)", bytes.len()),
        }
    }

    /// Requests the device cursor be moved to `target` (a buffer
    /// offset). The local buffer is untouched until the device echoes
    /// the motion back.
    pub fn move_cursor_to(&self, target: usize) {
        let plan = self.emulator.move_cursor_to(target);
        if !plan.is_empty() {
            self.send(&plan);
        }
    }

    /// Requests deletion of the selected span as device operations:
    /// motion to the span end, then one backspace per character.
    pub fn delete_selection(&self, start: usize, end: usize) {
        let plan = self.emulator.delete_selection(start, end);
        if !plan.is_empty() {
            self.send(&plan);
        }
    }

    /// Return key: resync the device cursor to the buffer end, then
    /// send the carriage return.
    pub fn press_return(&mut self) {
        let bytes = self.emulator.press_return();
        self.send(&bytes);
    }

    /// Mutates the serial configuration of the open link (effective for
    /// the next syscall) and persists it.
    pub fn apply_config(&mut self, mutate: impl FnOnce(&mut SerialConfig)) -> Result<()> {
        if let Some(link) = &mut self.link {
            link.apply_config(mutate)?;
            self.settings.serial = link.config();
        } else {
            mutate(&mut self.settings.serial);
        }
        Ok(())
    }

    /// Waits up to `timeout` for the next link event and applies it.
    /// Returns the event, or `None` on timeout. A closed event channel
    /// is treated as a disconnect.
    pub fn poll_event(&mut self, timeout: Duration) -> Option<LinkEvent> {
        let event = match &self.event_rx {
            Some(rx) => match rx.recv_timeout(timeout) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => LinkEvent::Disconnected,
            },
            None => return None,
        };
        self.handle_event(&event);
        Some(event)
    }

    /// Applies one link event to the session state.
    pub fn handle_event(&mut self, event: &LinkEvent) {
        match event {
            LinkEvent::Received(data) => self.emulator.process_tty_data(data),
            LinkEvent::LocalEcho(data) => {
                // Display-only, and only when the preference is on; the
                // bytes were already normalized by the writer.
                if self.settings.local_echo {
                    self.emulator.process_tty_data(data);
                }
            }
            LinkEvent::Disconnected => {
                debug!("link reported disconnect");
                self.disconnect();
            }
            LinkEvent::ParamsChanged(summary) => {
                info!("{}", summary);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::LineEnding;

    fn session(local_echo: bool) -> Session {
        let mut settings = Settings::default();
        settings.local_echo = local_echo;
        Session::new(settings)
    }

    #[test]
    fn received_data_feeds_the_buffer() {
        let mut session = session(false);
        session.handle_event(&LinkEvent::Received(b"hi\n".to_vec()));
        assert_eq!(session.emulator().buffer().text(), "hi\n");
    }

    #[test]
    fn local_echo_is_gated_by_preference() {
        let mut muted = session(false);
        muted.handle_event(&LinkEvent::LocalEcho(b"x".to_vec()));
        assert_eq!(muted.emulator().buffer().text(), "");

        let mut echoing = session(true);
        echoing.handle_event(&LinkEvent::LocalEcho(b"x".to_vec()));
        assert_eq!(echoing.emulator().buffer().text(), "x");
    }

    #[test]
    fn disconnect_drops_pending_escape() {
        let mut session = session(false);
        session.handle_event(&LinkEvent::Received(b"ok\x1B".to_vec()));
        session.handle_event(&LinkEvent::Disconnected);
        session.handle_event(&LinkEvent::Received(b"!".to_vec()));
        // The dangling ESC never renders; the buffer keeps only text.
        assert_eq!(session.emulator().buffer().text(), "ok!");
    }

    #[test]
    fn new_session_is_not_connected() {
        let session = session(false);
        assert!(!session.is_connected());
    }

    #[test]
    fn press_return_resyncs_even_while_offline() {
        let mut session = session(false);
        session.handle_event(&LinkEvent::Received(b"abc\x1B[2D".to_vec()));
        assert_eq!(session.emulator().device_cursor(), 1);
        session.press_return();
        assert_eq!(session.emulator().device_cursor(), 3);
    }

    #[test]
    fn cursor_and_selection_requests_touch_nothing_locally() {
        let mut session = session(false);
        session.handle_event(&LinkEvent::Received(b"abcdef".to_vec()));
        session.move_cursor_to(2);
        session.delete_selection(1, 3);
        // The buffer only changes once the device echoes the motion.
        assert_eq!(session.emulator().buffer().text(), "abcdef");
        assert_eq!(session.emulator().device_cursor(), 6);
    }

    #[test]
    fn config_changes_apply_offline_too() {
        let mut session = session(false);
        session
            .apply_config(|c| c.line_ending = LineEnding::Cr)
            .unwrap();
        assert_eq!(session.settings.serial.line_ending, LineEnding::Cr);
    }
}
