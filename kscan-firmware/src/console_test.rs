use super::*;

use crate::console_test_stub::RecordingConsole;

#[test]
fn info_messages() {
    let mut console = RecordingConsole::new();
    console.info_msg("Blocking Key: ");
    console.print_hex(0x04);
    console.newline();
    console.info_print("Action1");

    assert_eq!(console.lines(), ["INFO - Blocking Key: 0x04", "INFO - Action1"]);
}

#[test]
fn console_by_reference() {
    fn emit(mut c: impl Console) {
        c.print_hex(0xab);
        c.info_msg("x");
    }

    let mut console = RecordingConsole::new();
    emit(&mut console);
    assert_eq!(console.out, "0xABINFO - x");
}

#[test]
fn log_console_buffers_lines() {
    let mut console = LogConsole::new();
    console.print("abc");
    console.print_hex(0x1f);
    assert_eq!(console.line.as_str(), "abc0x1F");

    console.newline();
    assert!(console.line.is_empty());
}

#[test]
fn log_console_flushes_long_lines() {
    let mut console = LogConsole::new();
    for _ in 0..LINE_MAX + 3 {
        console.print("a");
    }
    assert_eq!(console.line.len(), 3);
}
