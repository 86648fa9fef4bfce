//! States and payload types carried by every trigger event.
//!
//! The raw byte values are the ones the macro engine stores in its tables, so they are kept
//! stable: lifecycle state in one byte and payload type in another. The pair `0xff, 0xff` is
//! reserved for describe requests and is never a valid trigger.

/// `state` byte of a describe request.
pub const DESCRIBE_STATE: u8 = 0xff;
/// `state_type` byte of a describe request.
pub const DESCRIBE_STATE_TYPE: u8 = 0xff;

pub fn is_describe_request(state: u8, state_type: u8) -> bool {
    state == DESCRIBE_STATE && state_type == DESCRIBE_STATE_TYPE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum KeyState {
    #[default]
    Off = 0x00,
    Press = 0x01,
    Hold = 0x02,
    Release = 0x03,
}
impl KeyState {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x00 => Some(Self::Off),
            0x01 => Some(Self::Press),
            0x02 => Some(Self::Hold),
            0x03 => Some(Self::Release),
            _ => None,
        }
    }

    pub fn as_raw(self) -> u8 {
        self as u8
    }

    /// Press or Hold.
    pub fn is_down(self) -> bool {
        matches!(self, Self::Press | Self::Hold)
    }

    /// Off or Release.
    pub fn is_up(self) -> bool {
        !self.is_down()
    }

    /// The state that follows `self` given the switch position read on this scan.
    ///
    /// ```
    /// use kscan_common::trigger::KeyState;
    /// assert_eq!(KeyState::Off.next(true), KeyState::Press);
    /// assert_eq!(KeyState::Press.next(true), KeyState::Hold);
    /// assert_eq!(KeyState::Hold.next(false), KeyState::Release);
    /// assert_eq!(KeyState::Release.next(false), KeyState::Off);
    /// ```
    pub fn next(self, is_down: bool) -> Self {
        match (self.is_down(), is_down) {
            (false, true) => Self::Press,
            (true, true) => Self::Hold,
            (true, false) => Self::Release,
            (false, false) => Self::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateType {
    /// A key switch; `args[0]` is the USB key code for key oriented capabilities.
    #[default]
    Normal,
    Led,
    Analog,
    Other(u8),
}
impl StateType {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => Self::Normal,
            0x01 => Self::Led,
            0x02 => Self::Analog,
            n => Self::Other(n),
        }
    }

    pub fn as_raw(self) -> u8 {
        match self {
            Self::Normal => 0x00,
            Self::Led => 0x01,
            Self::Analog => 0x02,
            Self::Other(n) => n,
        }
    }

    pub fn is_normal(self) -> bool {
        self == Self::Normal
    }
}

#[cfg(test)]
#[path = "trigger_test.rs"]
mod test;
