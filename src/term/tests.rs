// src/term/tests.rs

use crate::term::input::{VT100_BACKSPACE, VT100_LEFT, VT100_RIGHT};
use crate::term::reconciler;
use crate::term::{TerminalBuffer, TerminalEmulator};

fn emulate(chunks: &[&[u8]]) -> TerminalEmulator {
    let mut emulator = TerminalEmulator::new();
    for chunk in chunks {
        emulator.process_tty_data(chunk);
    }
    emulator
}

// --- TerminalBuffer ---

#[test]
fn printable_characters_append_at_end() {
    let emulator = emulate(&[b"hello"]);
    assert_eq!(emulator.buffer().text(), "hello");
    assert_eq!(emulator.device_cursor(), 5);
}

#[test]
fn printable_characters_overwrite_not_insert() {
    // Move left two, then print: "C" replaces "A" per VT100 overwrite.
    let emulator = emulate(&[b"AB\x1B[2DC"]);
    assert_eq!(emulator.buffer().text(), "CB");
    assert_eq!(emulator.device_cursor(), 1);
}

#[test]
fn backspace_moves_left_without_deleting() {
    let emulator = emulate(&[b"ab\x08"]);
    assert_eq!(emulator.buffer().text(), "ab");
    assert_eq!(emulator.device_cursor(), 1);
}

#[test]
fn backspace_at_start_stays_put() {
    let emulator = emulate(&[b"\x08\x08x"]);
    assert_eq!(emulator.buffer().text(), "x");
    assert_eq!(emulator.device_cursor(), 1);
}

#[test]
fn newline_goes_to_buffer_end_first() {
    // Cursor is mid-line when the newline arrives; the break is still
    // appended at the end of the buffer.
    let emulator = emulate(&[b"abc\x1B[2D\n"]);
    assert_eq!(emulator.buffer().text(), "abc\n");
    assert_eq!(emulator.device_cursor(), 4);
}

#[test]
fn erase_to_end_of_line_keeps_line_break() {
    let emulator = emulate(&[b"abcd\ndef\x1B[A\x1B[K"]);
    // Cursor went up to column 3 of "abcd", then erased "d".
    assert_eq!(emulator.buffer().text(), "abc\ndef");
}

#[test]
fn cursor_up_preserves_column_and_clamps() {
    let mut buffer = TerminalBuffer::new();
    for c in "long line\nab".chars() {
        match c {
            '\n' => buffer.newline(),
            c => buffer.overwrite(c),
        }
    }
    // From the end of "ab" (column 2) up into "long line".
    buffer.move_up(1);
    assert_eq!(buffer.cursor(), 2);
    // Up past the top line: no move.
    buffer.move_up(5);
    assert_eq!(buffer.cursor(), 2);
}

#[test]
fn cursor_down_clamps_to_short_line() {
    let mut buffer = TerminalBuffer::new();
    for c in "abcdef\nxy".chars() {
        match c {
            '\n' => buffer.newline(),
            c => buffer.overwrite(c),
        }
    }
    buffer.move_up(1);
    buffer.move_right(3); // column 5 of "abcdef"
    buffer.move_down(1);
    // "xy" is two columns long; the cursor clamps to its end.
    assert_eq!(buffer.cursor(), 7 + 2);
}

#[test]
fn overwrite_at_newline_joins_lines() {
    let mut buffer = TerminalBuffer::new();
    for c in "ab".chars() {
        buffer.overwrite(c);
    }
    buffer.newline();
    for c in "cd".chars() {
        buffer.overwrite(c);
    }
    buffer.move_left(3); // onto the '\n'
    buffer.overwrite('X');
    assert_eq!(buffer.text(), "abXcd");
}

#[test]
fn motion_clamps_to_buffer_bounds() {
    let mut buffer = TerminalBuffer::new();
    buffer.overwrite('a');
    buffer.move_right(10);
    assert_eq!(buffer.cursor(), 1);
    buffer.move_left(10);
    assert_eq!(buffer.cursor(), 0);
}

#[test]
fn unsupported_sequence_leaves_buffer_and_cursor_alone() {
    let emulator = emulate(&[b"ab\x1B[7m"]);
    assert_eq!(emulator.buffer().text(), "ab");
    assert_eq!(emulator.device_cursor(), 2);
}

// --- Split delivery through the emulator ---

#[test]
fn split_escape_sequence_applies_once_complete() {
    let emulator = emulate(&[b"AB\x1B[", b"2DC"]);
    assert_eq!(emulator.buffer().text(), "CB");
    assert_eq!(emulator.device_cursor(), 1);
}

#[test]
fn pending_esc_dropped_on_disconnect() {
    let mut emulator = emulate(&[b"ok\x1B"]);
    emulator.on_disconnected();
    assert_eq!(emulator.buffer().text(), "ok");
    // Later input must not resurrect the dangling ESC.
    emulator.process_tty_data(b"[2J");
    assert_eq!(emulator.buffer().text(), "ok[2J");
}

// --- Reconciler ---

#[test]
fn plan_move_right_emits_one_sequence_per_step() {
    let plan = reconciler::plan_move(2, 5);
    assert_eq!(plan, [VT100_RIGHT, VT100_RIGHT, VT100_RIGHT].concat());
}

#[test]
fn plan_move_left_emits_one_sequence_per_step() {
    let plan = reconciler::plan_move(5, 3);
    assert_eq!(plan, [VT100_LEFT, VT100_LEFT].concat());
}

#[test]
fn plan_move_in_place_is_empty() {
    assert!(reconciler::plan_move(4, 4).is_empty());
}

#[test]
fn selection_delete_moves_to_end_then_backspaces() {
    // Device cursor behind the selection end: motion first, then
    // exactly one backspace per selected character, in that order.
    let plan = reconciler::plan_selection_delete(1, 3, 7);
    let mut expected = Vec::new();
    for _ in 0..6 {
        expected.extend_from_slice(VT100_RIGHT);
    }
    for _ in 0..4 {
        expected.extend_from_slice(VT100_BACKSPACE);
    }
    assert_eq!(plan, expected);
}

#[test]
fn control_bytes_map_ctrl_a_through_z() {
    use crate::term::input::control_byte;
    assert_eq!(control_byte('a'), Some(0x01));
    assert_eq!(control_byte('C'), Some(0x03));
    assert_eq!(control_byte('z'), Some(0x1A));
    assert_eq!(control_byte('5'), None);
}

#[test]
fn press_return_resyncs_device_cursor_to_end() {
    let mut emulator = emulate(&[b"abc\x1B[2D"]);
    assert_eq!(emulator.device_cursor(), 1);
    let bytes = emulator.press_return();
    assert_eq!(bytes, b"\r");
    assert_eq!(emulator.device_cursor(), 3);
}
