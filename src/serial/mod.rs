// src/serial/mod.rs

//! The serial transport: configuration, the duplex link with its
//! reader/writer worker threads, and port enumeration.

pub mod config;
pub mod link;

pub use config::{
    DataBits, FlowControl, LineEnding, Parity, SerialConfig, StopBits, COMMON_BAUD_RATES,
    DEFAULT_BAUD_RATE, HIGH_SPEED_BAUD_RATES,
};
pub use link::{list_available_ports, LinkEvent, SerialLink};

use thiserror::Error;

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum SerialError {
    /// The OS refused to open the port (permission, already in use,
    /// nonexistent device). Surfaced synchronously from `connect`; no
    /// worker threads are started.
    #[error("port unavailable: {0}")]
    Unavailable(#[from] serialport::Error),

    /// A read or write syscall failed while the link was open.
    #[error("transport fault: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SerialError>;
