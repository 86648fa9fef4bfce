//! Debug console output used by capabilities for their diagnostic messages.
//!
//! Output is fire-and-forget: nothing written here is ever read back by the firmware.

use core::fmt::Write;

use heapless::String;

pub const NL: &str = "\r\n";

const INFO_PREFIX: &str = "INFO - ";
const LINE_MAX: usize = 128;

pub trait Console {
    fn print(&mut self, text: &str);

    /// Print `byte` as `0xNN`.
    fn print_hex(&mut self, byte: u8);

    /// Start an info message. The caller finishes the line with [Console::newline].
    fn info_msg(&mut self, text: &str) {
        self.print(INFO_PREFIX);
        self.print(text);
    }

    /// A complete single line info message.
    fn info_print(&mut self, text: &str) {
        self.info_msg(text);
        self.newline();
    }

    fn newline(&mut self) {
        self.print(NL);
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn print(&mut self, text: &str) {
        (**self).print(text)
    }

    fn print_hex(&mut self, byte: u8) {
        (**self).print_hex(byte)
    }
}

/// Sends console lines to the firmware log.
///
/// Text is collected until a newline is printed and then flushed as one `info!` record. A line
/// longer than the buffer is flushed early rather than truncated.
#[derive(Default)]
pub struct LogConsole {
    line: String<LINE_MAX>,
}
impl LogConsole {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush(&mut self) {
        if !self.line.is_empty() {
            crate::info!("{}", self.line.as_str());
            self.line.clear();
        }
    }

    fn push(&mut self, c: char) {
        if self.line.push(c).is_err() {
            self.flush();
            let _ = self.line.push(c);
        }
    }
}
impl Console for LogConsole {
    fn print(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => self.flush(),
                '\r' => {}
                c => self.push(c),
            }
        }
    }

    fn print_hex(&mut self, byte: u8) {
        let mut hex: String<4> = String::new();
        let _ = write!(hex, "0x{:02X}", byte);
        self.print(&hex);
    }
}

/// Discards everything.
impl Console for () {
    fn print(&mut self, _text: &str) {}

    fn print_hex(&mut self, _byte: u8) {}
}

#[cfg(test)]
#[path = "console_test.rs"]
mod test;
