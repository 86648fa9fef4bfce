extern crate std;

use std::string::String;
use std::vec::Vec;

use crate::console::Console;

/// Records everything printed so tests can assert on the exact console output.
#[derive(Default, Debug)]
pub struct RecordingConsole {
    pub out: String,
}
impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed lines, without line endings.
    pub fn lines(&self) -> Vec<&str> {
        self.out
            .split("\r\n")
            .filter(|l| !l.is_empty())
            .collect()
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}
impl Console for RecordingConsole {
    fn print(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn print_hex(&mut self, byte: u8) {
        self.out.push_str(&std::format!("0x{:02X}", byte));
    }
}
