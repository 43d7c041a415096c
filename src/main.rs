// src/main.rs

// Declare modules
pub mod ansi;
pub mod serial;
pub mod session;
pub mod settings;
pub mod term;

use crate::serial::{list_available_ports, LinkEvent};
use crate::session::Session;
use crate::settings::Settings;

use anyhow::{Context, Result};
use log::{info, warn};
use std::io::{BufRead, Write};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Console entry point: `sercom <port-path>` attaches the terminal
/// pipeline to a port; without arguments the available ports are
/// listed.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            print_available_ports();
            return Ok(());
        }
    };

    let settings_path = Settings::default_path();
    let settings = Settings::load(&settings_path);
    if let Err(e) = settings.save(&settings_path) {
        warn!("could not persist settings: {:#}", e);
    }

    let mut session = Session::new(settings);
    session
        .connect(&path)
        .with_context(|| format!("failed to connect to port {}", path))?;
    info!(
        "connected to {} ({})",
        path,
        session.settings.serial.summary()
    );

    // Stdin lines go out with the configured line ending; the session
    // thread below stays the sole owner of the terminal buffer.
    let line_ending = session.settings.serial.line_ending;
    let (stdin_tx, stdin_rx) = std::sync::mpsc::channel::<Vec<u8>>();
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        let mut bytes = line.into_bytes();
                        bytes.extend_from_slice(line_ending.as_bytes());
                        if stdin_tx.send(bytes).is_err() {
                            return;
                        }
                    }
                    Err(_) => return,
                }
            }
        })
        .context("failed to spawn stdin reader")?;

    let mut stdout = std::io::stdout();
    loop {
        while let Ok(bytes) = stdin_rx.try_recv() {
            session.send(&bytes);
        }
        match session.poll_event(POLL_INTERVAL) {
            Some(LinkEvent::Received(data)) => {
                stdout.write_all(&data)?;
                stdout.flush()?;
            }
            Some(LinkEvent::LocalEcho(data)) => {
                if session.settings.local_echo {
                    stdout.write_all(&data)?;
                    stdout.flush()?;
                }
            }
            Some(LinkEvent::Disconnected) => {
                info!("device disconnected, exiting");
                break;
            }
            Some(LinkEvent::ParamsChanged(_)) | None => {}
        }
    }

    Ok(())
}

fn print_available_ports() {
    let ports = list_available_ports();
    if ports.is_empty() {
        println!("No serial ports found.");
        return;
    }
    println!("Available serial ports:");
    for (path, label) in ports {
        println!("  {}  {}", path, label);
    }
}
