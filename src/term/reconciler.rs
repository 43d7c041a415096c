// src/term/reconciler.rs

//! Converts "the user wants the cursor at position P" into motion bytes
//! for the device.
//!
//! The local caret may drift from the device cursor (clicks, selection),
//! so a move is always planned relative to the device's last known
//! position. The plan is sent, never applied to the buffer directly:
//! the actual move is confirmed only once the device echoes motion
//! escapes back.

use super::input::{VT100_BACKSPACE, VT100_LEFT, VT100_RIGHT};

/// Bytes that ask the device to move its cursor from `device_pos` to
/// `target`: one right-motion sequence per step forward, one
/// left-motion sequence per step back.
pub fn plan_move(device_pos: usize, target: usize) -> Vec<u8> {
    let mut out = Vec::new();
    if target >= device_pos {
        for _ in device_pos..target {
            out.extend_from_slice(VT100_RIGHT);
        }
    } else {
        for _ in target..device_pos {
            out.extend_from_slice(VT100_LEFT);
        }
    }
    out
}

/// Bytes that delete the span `start..end`: move to the selection end,
/// then one backspace per selected character. Expressed as device
/// operations, not as a direct buffer edit.
pub fn plan_selection_delete(device_pos: usize, start: usize, end: usize) -> Vec<u8> {
    debug_assert!(start <= end);
    let mut out = plan_move(device_pos, end);
    for _ in start..end {
        out.extend_from_slice(VT100_BACKSPACE);
    }
    out
}
