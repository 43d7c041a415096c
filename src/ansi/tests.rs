// src/ansi/tests.rs

use crate::ansi::{AnsiCommand, AnsiProcessor, CsiCommand};
use test_log::test;

// Helper to process a full byte slice through a fresh processor.
fn process(bytes: &[u8]) -> Vec<AnsiCommand> {
    let mut processor = AnsiProcessor::new();
    processor.process_bytes(bytes)
}

fn prints(s: &str) -> Vec<AnsiCommand> {
    s.chars().map(AnsiCommand::Print).collect()
}

// --- Plain character stream ---

#[test]
fn empty_input_produces_nothing() {
    assert!(process(b"").is_empty());
}

#[test]
fn plain_ascii_passes_through() {
    assert_eq!(process(b"Hello, world!"), prints("Hello, world!"));
}

#[test]
fn backspace_and_newline_are_plain_characters() {
    assert_eq!(process(b"a\x08\n"), prints("a\x08\n"));
}

#[test]
fn multi_byte_utf8_decodes_whole() {
    assert_eq!(process("héllo → λ".as_bytes()), prints("héllo → λ"));
}

// --- UTF-8 edge cases ---

#[test]
fn utf8_split_across_chunks_is_invisible() {
    let bytes = "aé→z".as_bytes();
    let full = process(bytes);
    for split in 0..=bytes.len() {
        let mut processor = AnsiProcessor::new();
        let mut commands = processor.process_bytes(&bytes[..split]);
        commands.extend(processor.process_bytes(&bytes[split..]));
        assert_eq!(commands, full, "split at byte {}", split);
    }
}

#[test]
fn invalid_utf8_becomes_replacement_character() {
    assert_eq!(process(b"a\xFFb"), prints("a\u{FFFD}b"));
}

#[test]
fn aborted_utf8_sequence_replaces_then_continues() {
    // 0xC3 starts a two-byte sequence; 'x' is not a continuation.
    assert_eq!(process(b"\xC3x"), prints("\u{FFFD}x"));
}

#[test]
fn trailing_partial_utf8_is_deferred_not_dropped() {
    let mut processor = AnsiProcessor::new();
    assert_eq!(processor.process_bytes(b"\xC3"), vec![]);
    assert!(processor.has_pending());
    assert_eq!(processor.process_bytes(b"\xA9"), prints("é"));
    assert!(!processor.has_pending());
}

// --- CSI sequences ---

#[test]
fn cursor_motion_sequences_decode() {
    assert_eq!(
        process(b"\x1B[A\x1B[2B\x1B[3C\x1B[D"),
        vec![
            AnsiCommand::Csi(CsiCommand::CursorUp(1)),
            AnsiCommand::Csi(CsiCommand::CursorDown(2)),
            AnsiCommand::Csi(CsiCommand::CursorForward(3)),
            AnsiCommand::Csi(CsiCommand::CursorBackward(1)),
        ]
    );
}

#[test]
fn erase_to_end_of_line_decodes_only_bare_form() {
    assert_eq!(
        process(b"\x1B[K"),
        vec![AnsiCommand::Csi(CsiCommand::EraseToEndOfLine)]
    );
    assert_eq!(
        process(b"\x1B[2K"),
        vec![AnsiCommand::Csi(CsiCommand::Unsupported("<Esc>[2K".into()))]
    );
}

#[test]
fn sequence_embedded_in_text() {
    assert_eq!(
        process(b"AB\x1B[2DC"),
        vec![
            AnsiCommand::Print('A'),
            AnsiCommand::Print('B'),
            AnsiCommand::Csi(CsiCommand::CursorBackward(2)),
            AnsiCommand::Print('C'),
        ]
    );
}

#[test]
fn unsupported_sgr_is_consumed_whole() {
    // No characters of the sequence may leak through as prints.
    assert_eq!(
        process(b"\x1B[7mX"),
        vec![
            AnsiCommand::Csi(CsiCommand::Unsupported("<Esc>[7m".into())),
            AnsiCommand::Print('X'),
        ]
    );
}

#[test]
fn private_mode_sequence_is_consumed_whole() {
    assert_eq!(
        process(b"\x1B[?25h"),
        vec![AnsiCommand::Csi(CsiCommand::Unsupported("<Esc>[?25h".into()))]
    );
}

#[test]
fn multi_parameter_sequence_is_unsupported() {
    assert_eq!(
        process(b"\x1B[1;2H"),
        vec![AnsiCommand::Csi(CsiCommand::Unsupported("<Esc>[1;2H".into()))]
    );
}

#[test]
fn esc_without_bracket_is_dropped() {
    assert_eq!(process(b"a\x1BZb"), prints("aZb"));
}

// --- Deferral across chunk boundaries ---

#[test]
fn split_csi_defers_then_emits_once() {
    let mut processor = AnsiProcessor::new();
    assert_eq!(processor.process_bytes(b"\x1B["), vec![]);
    assert!(processor.has_pending());
    assert_eq!(
        processor.process_bytes(b"3C"),
        vec![AnsiCommand::Csi(CsiCommand::CursorForward(3))]
    );
    assert!(!processor.has_pending());
}

#[test]
fn trailing_esc_is_deferred() {
    let mut processor = AnsiProcessor::new();
    assert_eq!(processor.process_bytes(b"ok\x1B"), prints("ok"));
    assert!(processor.has_pending());
    assert_eq!(
        processor.process_bytes(b"[K"),
        vec![AnsiCommand::Csi(CsiCommand::EraseToEndOfLine)]
    );
}

#[test]
fn csi_split_invariance_at_every_boundary() {
    let bytes = b"AB\x1B[12Dxy\x1B[Kz";
    let full = process(bytes);
    for split in 0..=bytes.len() {
        let mut processor = AnsiProcessor::new();
        let mut commands = processor.process_bytes(&bytes[..split]);
        commands.extend(processor.process_bytes(&bytes[split..]));
        assert_eq!(commands, full, "split at byte {}", split);
    }
}

#[test]
fn discard_pending_drops_trailing_esc() {
    let mut processor = AnsiProcessor::new();
    processor.process_bytes(b"\x1B");
    processor.discard_pending();
    assert!(!processor.has_pending());
    // The deferred ESC must not resurface as a literal character.
    assert_eq!(processor.process_bytes(b"done"), prints("done"));
}

#[test]
fn missing_count_defaults_to_one() {
    assert_eq!(
        process(b"\x1B[C"),
        vec![AnsiCommand::Csi(CsiCommand::CursorForward(1))]
    );
}

#[test]
fn oversized_count_saturates() {
    assert_eq!(
        process(b"\x1B[99999C"),
        vec![AnsiCommand::Csi(CsiCommand::CursorForward(u16::MAX))]
    );
}
