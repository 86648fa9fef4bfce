#![no_std]
pub mod capability;
pub mod console;
pub mod exec;
pub mod matrix;
pub mod output;
pub mod scan_loop;

#[cfg(any(test, feature = "test-utils"))]
pub mod console_test_stub;
#[cfg(any(test, feature = "test-utils"))]
pub mod switch_test_stub;

#[macro_use]
mod macros;

pub(crate) const KEY_BITS_SIZE: usize = 32;

fn add_bit<const SIZE: usize>(keys_down: &mut [u8], kc: u8) -> bool {
    let i = (kc >> 3) as usize;
    if i >= SIZE {
        crate::error!("invalid key! {}", kc);
        return false;
    }
    let bp = 1 << (kc & 7);
    let old = keys_down[i];
    keys_down[i] |= bp;
    old & bp == 0
}

fn del_bit<const SIZE: usize>(keys_down: &mut [u8], kc: u8) -> bool {
    let i = (kc >> 3) as usize;
    if i >= SIZE {
        crate::error!("invalid key! {}", kc);
        return false;
    }
    let bp = 1 << (kc & 7);
    let old = keys_down[i];
    keys_down[i] &= !bp;
    old & bp != 0
}

/// Mark `kc` as down. Returns false if it was already down.
fn add_key_bit(keys_down: &mut [u8], kc: u8) -> bool {
    add_bit::<KEY_BITS_SIZE>(keys_down, kc)
}

/// Mark `kc` as up. Returns false if it was not down.
fn del_key_bit(keys_down: &mut [u8], kc: u8) -> bool {
    del_bit::<KEY_BITS_SIZE>(keys_down, kc)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod test;
