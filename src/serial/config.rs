// src/serial/config.rs

//! Serial link configuration: framing parameters, flow control and
//! line-ending normalization. Each parameter is an enum, so mutually
//! exclusive modes are exclusive by construction.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Baud rates most devices support.
pub const COMMON_BAUD_RATES: &[u32] = &[
    50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 9600, 19200, 38400, 57600,
    115200,
];

/// Non-standard high-speed rates (USB adapters, native UARTs).
pub const HIGH_SPEED_BAUD_RATES: &[u32] = &[
    230400, 460800, 500000, 576000, 921600, 1000000, 1152000, 1500000, 2000000, 2500000, 3000000,
    3500000, 4000000,
];

pub const DEFAULT_BAUD_RATE: u32 = 9600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    None,
    Even,
    Odd,
    Mark,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopBits {
    One,
    OnePointFive,
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowControl {
    None,
    XonXoff,
    RtsCts,
    DsrDtr,
}

/// Line-ending convention of the remote device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    Lf,
    Cr,
    CrLf,
}

impl LineEnding {
    /// Normalizes a chunk to `\n` line breaks. Applied identically to
    /// inbound data and to the local echo of outbound data, so sent and
    /// received line breaks render consistently.
    ///
    /// CrLf mode strips every `\r`, not only those paired with a
    /// following `\n`; a lone `\r` is silently dropped. Downstream
    /// device protocols may rely on this, so it is kept as is.
    pub fn normalize(&self, data: &[u8]) -> Vec<u8> {
        match self {
            LineEnding::Lf => data.to_vec(),
            LineEnding::Cr => data
                .iter()
                .map(|&b| if b == b'\r' { b'\n' } else { b })
                .collect(),
            LineEnding::CrLf => data.iter().copied().filter(|&b| b != b'\r').collect(),
        }
    }

    /// The bytes to terminate an outbound line with.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::Cr => b"\r",
            LineEnding::CrLf => b"\r\n",
        }
    }

    fn default_for_platform() -> Self {
        if cfg!(windows) {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }
}

/// Everything needed to open and drive one serial port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    pub line_ending: LineEnding,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            line_ending: LineEnding::default_for_platform(),
        }
    }
}

impl SerialConfig {
    /// One-line human summary, e.g. `9600 8N1, no flow control, LF`.
    pub fn summary(&self) -> String {
        format!(
            "{} {}{}{}, {}, {}",
            self.baud_rate, self.data_bits, self.parity, self.stop_bits, self.flow_control,
            self.line_ending
        )
    }
}

// --- Conversions to the serialport backend ---
//
// The backend does not expose mark/space parity, 1.5 stop bits or a
// DSR/DTR handshake; those settings degrade to the closest supported
// mode with a logged warning.

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Even => serialport::Parity::Even,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Mark | Parity::Space => {
                warn!("{} parity not supported by the backend, using none", parity);
                serialport::Parity::None
            }
        }
    }
}

impl From<StopBits> for serialport::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::OnePointFive => {
                warn!("1.5 stop bits not supported by the backend, using 2");
                serialport::StopBits::Two
            }
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

impl From<FlowControl> for serialport::FlowControl {
    fn from(control: FlowControl) -> Self {
        match control {
            FlowControl::None => serialport::FlowControl::None,
            FlowControl::XonXoff => serialport::FlowControl::Software,
            FlowControl::RtsCts => serialport::FlowControl::Hardware,
            FlowControl::DsrDtr => {
                warn!("DSR/DTR handshake not supported by the backend, using RTS/CTS");
                serialport::FlowControl::Hardware
            }
        }
    }
}

// --- Display, for the params-changed summary ---

impl fmt::Display for DataBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = match self {
            DataBits::Five => '5',
            DataBits::Six => '6',
            DataBits::Seven => '7',
            DataBits::Eight => '8',
        };
        write!(f, "{}", n)
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
            Parity::Mark => 'M',
            Parity::Space => 'S',
        };
        write!(f, "{}", c)
    }
}

impl fmt::Display for StopBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopBits::One => "1",
            StopBits::OnePointFive => "1.5",
            StopBits::Two => "2",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for FlowControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowControl::None => "no flow control",
            FlowControl::XonXoff => "XON/XOFF flow control",
            FlowControl::RtsCts => "RTS/CTS flow control",
            FlowControl::DsrDtr => "DSR/DTR flow control",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LineEnding::Lf => "LF",
            LineEnding::Cr => "CR",
            LineEnding::CrLf => "CRLF",
        };
        write!(f, "{}", s)
    }
}
