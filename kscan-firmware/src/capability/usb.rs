use embassy_sync::blocking_mutex::raw::RawMutex;
use kscan_common::keycodes;

use super::TriggerEvent;
use crate::{
    add_key_bit, del_key_bit,
    output::{KeyEvent, OutputChannel},
};

/// Sends its key argument to the USB transport.
///
/// Remembers which keys it has reported down so that a key is reported down once per press and
/// up only if it was reported down. A Hold of a key that is not down reports it down; this is how a
/// key that was pressed while blocked appears once the block is lifted.
///
/// When the output queue overflows the host is told to release everything, so every key is
/// forgotten and keys still held are reported again on their next Hold.
pub struct UsbCodeSend<'c, M: RawMutex, const N: usize> {
    output: &'c OutputChannel<M, N>,
    keys_down: [u8; crate::KEY_BITS_SIZE],
}
impl<'c, M: RawMutex, const N: usize> UsbCodeSend<'c, M, N> {
    pub fn new(output: &'c OutputChannel<M, N>) -> Self {
        Self {
            output,
            keys_down: [0; crate::KEY_BITS_SIZE],
        }
    }

    pub fn is_down(&self, key: u8) -> bool {
        self.keys_down[(key >> 3) as usize] & (1 << (key & 7)) != 0
    }

    pub(crate) fn invoke(&mut self, event: &TriggerEvent) {
        if !event.state_type.is_normal() {
            return;
        }
        let key = event.key_code();
        if !keycodes::is_reportable(key) {
            return;
        }

        let is_down = event.state.is_down();
        let changed = if is_down {
            add_key_bit(&mut self.keys_down, key)
        } else {
            del_key_bit(&mut self.keys_down, key)
        };
        if changed && !self.output.report(key_event(key, is_down)) {
            self.keys_down = [0; crate::KEY_BITS_SIZE];
        }
    }
}

fn key_event(key: u8, is_down: bool) -> KeyEvent {
    if keycodes::is_modifier(key) {
        KeyEvent::Modifiers(keycodes::modifier_bit(key), is_down)
    } else {
        KeyEvent::Basic(key, is_down)
    }
}

#[cfg(test)]
#[path = "usb_test.rs"]
mod test;
