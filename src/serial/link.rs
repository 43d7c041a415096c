// src/serial/link.rs

//! The duplex serial link and its two worker threads.
//!
//! An open link owns exactly one reader thread and one writer thread.
//! The reader blocks with a bounded timeout so it can observe closure;
//! the writer blocks on the write queue, which `disconnect` closes.
//! Both threads have observably exited before `disconnect` returns.

use super::config::{LineEnding, SerialConfig};
use super::{Result, SerialError};
use log::{debug, error, info, warn};
use serialport::SerialPort;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Reader poll interval; closure is observed within one interval.
const READ_TIMEOUT: Duration = Duration::from_millis(100);
const READ_BUFFER_SIZE: usize = 4096;

/// Events the link emits toward the application. Drained by a single
/// consumer (the thread that owns the terminal buffer), so all buffer
/// mutation stays serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Inbound data, already line-ending normalized.
    Received(Vec<u8>),
    /// What was just written to the device, normalized the same way.
    /// Display-only; gating on the user's echo preference happens at
    /// the consumer.
    LocalEcho(Vec<u8>),
    /// The reader hit a fatal transport fault and exited.
    Disconnected,
    /// The link configuration changed; carries a human summary.
    ParamsChanged(String),
}

/// Narrow seam over the OS port so the worker loops can be exercised
/// against an in-memory fake in tests.
pub(crate) trait TransportPort: Send {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

impl TransportPort for Box<dyn SerialPort> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        io::Write::write_all(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::Write::flush(self)
    }
}

/// One open serial port plus its reader and writer workers.
///
/// Lifecycle: `connect` opens the OS handle and spawns both workers;
/// `disconnect` (or drop) shuts them down cooperatively. A reconnect
/// creates a fresh link and queue pair, never reuses a stale one.
pub struct SerialLink {
    path: String,
    config: Arc<Mutex<SerialConfig>>,
    control_port: Box<dyn SerialPort>,
    write_tx: Option<Sender<Vec<u8>>>,
    event_tx: Sender<LinkEvent>,
    shutdown: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
}

impl SerialLink {
    /// Opens `path` and spawns the worker threads. An open failure is
    /// surfaced synchronously; no threads are started in that case.
    pub fn connect(
        path: &str,
        config: SerialConfig,
        event_tx: Sender<LinkEvent>,
    ) -> Result<SerialLink> {
        let control_port = serialport::new(path, config.baud_rate)
            .data_bits(config.data_bits.into())
            .parity(config.parity.into())
            .stop_bits(config.stop_bits.into())
            .flow_control(config.flow_control.into())
            .timeout(READ_TIMEOUT)
            .open()?;
        let reader_port = control_port.try_clone()?;
        let writer_port = control_port.try_clone()?;
        info!("opened serial port {} ({})", path, config.summary());

        let config = Arc::new(Mutex::new(config));
        let shutdown = Arc::new(AtomicBool::new(false));
        let (write_tx, write_rx) = mpsc::channel();

        let reader = spawn_reader(reader_port, config.clone(), event_tx.clone(), shutdown.clone())?;
        let writer = spawn_writer(writer_port, config.clone(), write_rx, event_tx.clone())?;

        Ok(SerialLink {
            path: path.to_string(),
            config,
            control_port,
            write_tx: Some(write_tx),
            event_tx,
            shutdown,
            reader: Some(reader),
            writer: Some(writer),
        })
    }

    /// A snapshot of the current configuration.
    pub fn config(&self) -> SerialConfig {
        lock_config(&self.config).clone()
    }

    /// Enqueues bytes for the writer thread. Never blocks; ordering is
    /// the enqueue order. Bytes enqueued after disconnect are dropped.
    pub fn send(&self, bytes: Vec<u8>) {
        match &self.write_tx {
            Some(tx) => {
                // The writer only exits early on a write fault; the
                // queue itself never rejects an item before that.
                if tx.send(bytes).is_err() {
                    warn!("write queue closed, dropping outbound bytes");
                }
            }
            None => warn!("link already disconnected, dropping outbound bytes"),
        }
    }

    /// Mutates the configuration and applies it to the open handle,
    /// effective for the next syscall. Emits `ParamsChanged`.
    pub fn apply_config(&mut self, mutate: impl FnOnce(&mut SerialConfig)) -> Result<()> {
        let updated = {
            let mut config = lock_config(&self.config);
            mutate(&mut config);
            config.clone()
        };
        self.control_port.set_baud_rate(updated.baud_rate)?;
        self.control_port.set_data_bits(updated.data_bits.into())?;
        self.control_port.set_parity(updated.parity.into())?;
        self.control_port.set_stop_bits(updated.stop_bits.into())?;
        self.control_port
            .set_flow_control(updated.flow_control.into())?;
        let summary = format!("{} {}", self.path, updated.summary());
        info!("serial parameters changed: {}", summary);
        let _ = self.event_tx.send(LinkEvent::ParamsChanged(summary));
        Ok(())
    }

    /// Cooperative shutdown: flags the reader, closes the write queue,
    /// and joins both workers. Completes within one read-timeout
    /// interval; the OS handle is released when the link is dropped.
    pub fn disconnect(&mut self) {
        if self.reader.is_none() && self.writer.is_none() {
            return;
        }
        debug!("disconnecting from {}", self.path);
        self.shutdown.store(true, Ordering::Release);
        // Dropping the queue sender unblocks the writer's recv.
        self.write_tx.take();
        if let Some(handle) = self.reader.take() {
            if handle.join().is_err() {
                error!("serial reader thread panicked");
            }
        }
        if let Some(handle) = self.writer.take() {
            if handle.join().is_err() {
                error!("serial writer thread panicked");
            }
        }
        info!("disconnected from {}", self.path);
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Lists serial ports present on the system, as (path, label) pairs for
/// UI consumption.
pub fn list_available_ports() -> Vec<(String, String)> {
    let ports = match serialport::available_ports() {
        Ok(ports) => ports,
        Err(e) => {
            warn!("failed to enumerate serial ports: {}", e);
            return Vec::new();
        }
    };
    ports
        .into_iter()
        .map(|port| {
            let label = match &port.port_type {
                serialport::SerialPortType::UsbPort(usb) => match &usb.product {
                    Some(product) => format!("{} ({})", port.port_name, product),
                    None => port.port_name.clone(),
                },
                _ => port.port_name.clone(),
            };
            (port.port_name, label)
        })
        .collect()
}

fn spawn_reader<P: TransportPort + 'static>(
    port: P,
    config: Arc<Mutex<SerialConfig>>,
    event_tx: Sender<LinkEvent>,
    shutdown: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("serial-reader".to_string())
        .spawn(move || reader_loop(port, config, event_tx, shutdown))
}

fn spawn_writer<P: TransportPort + 'static>(
    port: P,
    config: Arc<Mutex<SerialConfig>>,
    write_rx: Receiver<Vec<u8>>,
    event_tx: Sender<LinkEvent>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("serial-writer".to_string())
        .spawn(move || writer_loop(port, config, write_rx, event_tx))
}

/// Reader worker: blocking reads with a bounded timeout, normalization,
/// `Received` events. A fatal fault becomes a single `Disconnected`.
pub(crate) fn reader_loop<P: TransportPort>(
    mut port: P,
    config: Arc<Mutex<SerialConfig>>,
    event_tx: Sender<LinkEvent>,
    shutdown: Arc<AtomicBool>,
) {
    let mut buf = [0u8; READ_BUFFER_SIZE];
    while !shutdown.load(Ordering::Acquire) {
        match port.read(&mut buf) {
            Ok(0) => continue,
            Ok(n) => {
                let data = line_ending(&config).normalize(&buf[..n]);
                if data.is_empty() {
                    continue;
                }
                if event_tx.send(LinkEvent::Received(data)).is_err() {
                    debug!("event consumer gone, serial reader exiting");
                    return;
                }
            }
            Err(e) if is_transient(&e) => continue,
            Err(e) => {
                error!("serial read failed: {}", SerialError::Io(e));
                let _ = event_tx.send(LinkEvent::Disconnected);
                return;
            }
        }
    }
    debug!("serial reader observed shutdown");
}

/// Writer worker: drains the queue in FIFO order, writes verbatim, then
/// emits the normalized bytes as `LocalEcho` (the echo reflects what
/// was sent, not what was received). A write fault is logged and ends
/// the thread; the reader's `Disconnected` is the authoritative signal.
pub(crate) fn writer_loop<P: TransportPort>(
    mut port: P,
    config: Arc<Mutex<SerialConfig>>,
    write_rx: Receiver<Vec<u8>>,
    event_tx: Sender<LinkEvent>,
) {
    while let Ok(bytes) = write_rx.recv() {
        if let Err(e) = port.write_all(&bytes).and_then(|()| port.flush()) {
            error!("serial write failed: {}", SerialError::Io(e));
            return;
        }
        let echo = line_ending(&config).normalize(&bytes);
        if event_tx.send(LinkEvent::LocalEcho(echo)).is_err() {
            debug!("event consumer gone, serial writer exiting");
            return;
        }
    }
    debug!("write queue closed, serial writer exiting");
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

// Configuration reads must survive a poisoned mutex: the workers keep
// draining with whatever value was last written.
fn line_ending(config: &Arc<Mutex<SerialConfig>>) -> LineEnding {
    match config.lock() {
        Ok(config) => config.line_ending,
        Err(poisoned) => poisoned.into_inner().line_ending,
    }
}

fn lock_config(config: &Arc<Mutex<SerialConfig>>) -> std::sync::MutexGuard<'_, SerialConfig> {
    match config.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
