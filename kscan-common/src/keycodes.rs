pub mod key_range {
    pub const NONE: u8 = 0x00;
    pub const ERROR_MAX: u8 = 0x03;

    pub const BASIC_MIN: u8 = 0x04;
    pub const BASIC_A: u8 = 0x04;
    pub const BASIC_1: u8 = 0x1e;
    pub const BASIC_0: u8 = 0x27;
    pub const BASIC_ESC: u8 = 0x29;
    pub const BASIC_MAX: u8 = 0xdd;
    pub const MODIFIER_MIN: u8 = 0xe0;
    pub const MODIFIER_MAX: u8 = 0xe7;
}

/// True for the eight HID modifier usages (left/right ctrl, shift, alt and gui).
pub fn is_modifier(code: u8) -> bool {
    (key_range::MODIFIER_MIN..=key_range::MODIFIER_MAX).contains(&code)
}

/// The modifier byte bit for a modifier usage; zero for any other code.
///
/// ```
/// use kscan_common::keycodes::modifier_bit;
/// assert_eq!(modifier_bit(0xe1), 0b10);
/// assert_eq!(modifier_bit(0x04), 0);
/// ```
pub fn modifier_bit(code: u8) -> u8 {
    if is_modifier(code) {
        1 << (code - key_range::MODIFIER_MIN)
    } else {
        0
    }
}

/// Codes 0 to 3 are reserved or error roll-over usages and never represent a real key.
pub fn is_reportable(code: u8) -> bool {
    code > key_range::ERROR_MAX
}
