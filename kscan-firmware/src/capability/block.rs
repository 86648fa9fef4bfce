use kscan_common::keycodes::key_range;

use super::TriggerEvent;
use crate::console::{Console, NL};

/// The single blocked key slot. Only one key can be blocked at a time; while a key is blocked,
/// presses that would block another key are ignored rather than queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlockSlot {
    #[default]
    Idle,
    Blocking(u8),
}

/// Blocks its key argument while the trigger is held and unblocks it on release of the same key.
#[derive(Debug, Default)]
pub struct BlockHold {
    slot: BlockSlot,
}
impl BlockHold {
    pub const fn new() -> Self {
        Self {
            slot: BlockSlot::Idle,
        }
    }

    pub fn slot(&self) -> BlockSlot {
        self.slot
    }

    pub fn blocked_key(&self) -> Option<u8> {
        match self.slot {
            BlockSlot::Idle => None,
            BlockSlot::Blocking(key) => Some(key),
        }
    }

    /// True unless `key` is the blocked key.
    pub fn passes(&self, key: u8) -> bool {
        self.slot != BlockSlot::Blocking(key)
    }

    pub(crate) fn invoke(&mut self, event: &TriggerEvent, console: &mut impl Console) {
        if !event.state_type.is_normal() {
            return;
        }
        let key = event.key_code();

        match self.slot {
            // zero is the "no key" code and is never blocked
            BlockSlot::Idle if event.state.is_down() && key != key_range::NONE => {
                self.slot = BlockSlot::Blocking(key);
                console.info_msg("Blocking Key: ");
                console.print_hex(key);
                console.print(NL);
            }
            BlockSlot::Blocking(blocked) if event.state.is_up() && key == blocked => {
                console.info_msg("Unblocking Key: ");
                console.print_hex(blocked);
                console.print(NL);
                self.slot = BlockSlot::Idle;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "block_test.rs"]
mod test;
