use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use kscan_common::trigger::{KeyState, StateType};

use super::*;
use crate::capability::CapabilityId;

macro_rules! setup {
    ($usb:ident, $channel:ident, $send:ident, $x:block) => {
        setup!(16, $usb, $channel, $send, $x)
    };
    ($depth:literal, $usb:ident, $channel:ident, $send:ident, $x:block) => {{
        let $channel = OutputChannel::<NoopRawMutex, $depth>::default();
        let mut $usb = UsbCodeSend::new(&$channel);

        macro_rules! $send {
            ($state:ident, $key:expr) => {
                $send!($state, StateType::Normal, $key)
            };
            ($state:ident, $state_type:expr, $key:expr) => {{
                let args = [$key];
                let event = TriggerEvent {
                    capability: CapabilityId(3),
                    state: KeyState::$state,
                    state_type: $state_type,
                    args: &args,
                };
                $usb.invoke(&event);
            }};
        }

        $x
    }};
}

#[test]
fn press_and_release() {
    setup!(usb, channel, send, {
        send!(Press, 0x04);
        assert!(usb.is_down(0x04));
        send!(Hold, 0x04);
        send!(Hold, 0x04);
        send!(Release, 0x04);
        assert!(!usb.is_down(0x04));
        send!(Off, 0x04);

        assert_eq!(channel.try_receive(), Some(KeyEvent::Basic(0x04, true)));
        assert_eq!(channel.try_receive(), Some(KeyEvent::Basic(0x04, false)));
        assert_eq!(channel.try_receive(), None);
    });
}

#[test]
fn hold_without_press_reports_down() {
    setup!(usb, channel, send, {
        send!(Hold, 0x05);
        send!(Hold, 0x05);
        send!(Release, 0x05);

        assert_eq!(channel.try_receive(), Some(KeyEvent::Basic(0x05, true)));
        assert_eq!(channel.try_receive(), Some(KeyEvent::Basic(0x05, false)));
        assert_eq!(channel.try_receive(), None);
    });
}

#[test]
fn release_without_press() {
    setup!(usb, channel, send, {
        send!(Release, 0x06);
        send!(Off, 0x06);
        assert_eq!(channel.try_receive(), None);
    });
}

#[test]
fn modifiers() {
    setup!(usb, channel, send, {
        send!(Press, 0xe1);
        send!(Press, 0xe4);
        send!(Release, 0xe1);

        assert_eq!(channel.try_receive(), Some(KeyEvent::Modifiers(0b10, true)));
        assert_eq!(channel.try_receive(), Some(KeyEvent::Modifiers(0b1_0000, true)));
        assert_eq!(channel.try_receive(), Some(KeyEvent::Modifiers(0b10, false)));
    });
}

#[test]
fn ignores_reserved_codes_and_other_state_types() {
    setup!(usb, channel, send, {
        send!(Press, 0x00);
        send!(Press, 0x03);
        send!(Press, StateType::Led, 0x04);
        send!(Press, StateType::Analog, 0x04);
        assert_eq!(channel.try_receive(), None);
        assert!(!usb.is_down(0x04));
    });
}

#[test]
fn overflow_forgets_held_keys() {
    setup!(2, usb, channel, send, {
        send!(Press, 0x04);
        send!(Press, 0x05);
        send!(Press, 0x06);
        assert!(!usb.is_down(0x04));
        assert!(!usb.is_down(0x06));
        assert_eq!(channel.try_receive(), Some(KeyEvent::Clear));
        assert_eq!(channel.try_receive(), None);

        send!(Hold, 0x06);
        send!(Hold, 0x06);
        assert_eq!(channel.try_receive(), Some(KeyEvent::Basic(0x06, true)));
        assert_eq!(channel.try_receive(), None);

        send!(Hold, 0x04);
        assert_eq!(channel.try_receive(), Some(KeyEvent::Basic(0x04, true)));
        send!(Release, 0x05);
        assert_eq!(channel.try_receive(), None);
    });
}
