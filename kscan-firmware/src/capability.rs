//! Capabilities are the effects a trigger can run: send a USB code, block a key, print a
//! message. The macro engine resolves each trigger to a [CapabilityId] and hands the event to the
//! [Dispatcher], which owns every stateful capability and routes the call.
//!
//! Each capability has two operations. [Dispatcher::describe] returns its [Signature] and never
//! touches state or output; [Dispatcher::invoke] runs the effect. Neither reports errors: a
//! trigger that does not fit the capability is dropped.

use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::Vec;
use kscan_common::trigger::{self, KeyState, StateType};

use crate::{console::Console, output::OutputChannel};

pub mod action;
pub mod block;
pub mod usb;

use block::BlockHold;
use usb::UsbCodeSend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapabilityId(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArgKind {
    /// 8-bit USB key code.
    UsbCode,
}
impl ArgKind {
    pub fn name(self) -> &'static str {
        match self {
            ArgKind::UsbCode => "usbCode",
        }
    }

    pub fn size(self) -> usize {
        match self {
            ArgKind::UsbCode => 1,
        }
    }
}

/// Name and argument shape of a capability, as listed on the debug console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub name: &'static str,
    pub args: &'static [ArgKind],
}
impl Signature {
    /// Number of argument bytes the capability reads.
    pub fn arg_len(&self) -> usize {
        self.args.iter().map(|a| a.size()).sum()
    }
}
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            f.write_str(arg.name())?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerEvent<'a> {
    pub capability: CapabilityId,
    pub state: KeyState,
    pub state_type: StateType,
    pub args: &'a [u8],
}
impl<'a> TriggerEvent<'a> {
    pub fn key(capability: CapabilityId, state: KeyState, args: &'a [u8]) -> Self {
        Self {
            capability,
            state,
            state_type: StateType::Normal,
            args,
        }
    }

    /// `args[0]`; key oriented capabilities declare at least one argument byte.
    pub fn key_code(&self) -> u8 {
        self.args.first().copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Capability {
    Action1,
    BlockHold,
    /// Pass the event on to `target` unless its key is the one [Capability::BlockHold] is
    /// blocking.
    BlockKey {
        target: CapabilityId,
    },
    UsbCodeSend,
}
impl Capability {
    pub fn signature(&self) -> Signature {
        const USB_CODE: &[ArgKind] = &[ArgKind::UsbCode];
        match self {
            Capability::Action1 => Signature {
                name: "action1",
                args: &[],
            },
            Capability::BlockHold => Signature {
                name: "blockHold",
                args: USB_CODE,
            },
            Capability::BlockKey { .. } => Signature {
                name: "blockKey",
                args: USB_CODE,
            },
            Capability::UsbCodeSend => Signature {
                name: "usbCodeSend",
                args: USB_CODE,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TableFull;

/// Capability lookup table; a capability's id is its index. Built once at startup.
#[derive(Debug, Default)]
pub struct CapabilityTable<const N: usize> {
    entries: Vec<Capability, N>,
}
impl<const N: usize> CapabilityTable<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(capabilities: &[Capability]) -> Result<Self, TableFull> {
        let mut table = Self::new();
        for cap in capabilities {
            table.register(*cap)?;
        }
        Ok(table)
    }

    pub fn register(&mut self, capability: Capability) -> Result<CapabilityId, TableFull> {
        let id = self.entries.len();
        if id > u8::MAX as usize {
            return Err(TableFull);
        }
        self.entries.push(capability).map_err(|_| TableFull)?;
        Ok(CapabilityId(id as u8))
    }

    pub fn get(&self, id: CapabilityId) -> Option<Capability> {
        self.entries.get(id.0 as usize).copied()
    }

    pub fn find(&self, capability: Capability) -> Option<CapabilityId> {
        self.entries
            .iter()
            .position(|c| *c == capability)
            .map(|i| CapabilityId(i as u8))
    }

    pub fn iter(&self) -> impl Iterator<Item = (CapabilityId, Capability)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, c)| (CapabilityId(i as u8), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct Dispatcher<'c, C: Console, M: RawMutex, const N: usize, const OUT: usize> {
    table: CapabilityTable<N>,
    block: BlockHold,
    usb: UsbCodeSend<'c, M, OUT>,
    console: C,
}
impl<'c, C: Console, M: RawMutex, const N: usize, const OUT: usize> Dispatcher<'c, C, M, N, OUT> {
    pub fn new(table: CapabilityTable<N>, output: &'c OutputChannel<M, OUT>, console: C) -> Self {
        Self {
            table,
            block: BlockHold::new(),
            usb: UsbCodeSend::new(output),
            console,
        }
    }

    pub fn table(&self) -> &CapabilityTable<N> {
        &self.table
    }

    pub fn block_hold(&self) -> &BlockHold {
        &self.block
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn describe(&self, id: CapabilityId) -> Option<Signature> {
        self.table.get(id).map(|c| c.signature())
    }

    /// Run the capability named by `event.capability`.
    pub fn invoke(&mut self, event: &TriggerEvent) {
        self.run(event.capability, event, false);
    }

    /// Run capability `id` with `event`. A forwarded event never reaches another forwarding
    /// capability.
    fn run(&mut self, id: CapabilityId, event: &TriggerEvent, forwarded: bool) {
        let Some(capability) = self.table.get(id) else {
            crate::debug!("unknown capability {:?}", id);
            return;
        };
        let Some(event) = fit_args(capability, event) else {
            return;
        };

        match capability {
            Capability::Action1 => action::action1(&mut self.console),
            Capability::BlockHold => self.block.invoke(&event, &mut self.console),
            Capability::UsbCodeSend => self.usb.invoke(&event),
            Capability::BlockKey { .. } if forwarded => {
                crate::debug!("forward to forwarding capability {:?} dropped", id);
            }
            Capability::BlockKey { target } => {
                if self.block.passes(event.key_code()) {
                    self.run(target, &event, true);
                }
            }
        }
    }

    /// Entry point using the byte level calling convention of the macro tables: a `0xff, 0xff`
    /// state pair asks for the signature, anything else is a trigger. Returns the signature only
    /// for describe requests.
    pub fn dispatch_raw(
        &mut self,
        id: CapabilityId,
        state: u8,
        state_type: u8,
        args: &[u8],
    ) -> Option<Signature> {
        if trigger::is_describe_request(state, state_type) {
            return self.describe(id);
        }
        match KeyState::from_raw(state) {
            Some(state) => self.invoke(&TriggerEvent {
                capability: id,
                state,
                state_type: StateType::from_raw(state_type),
                args,
            }),
            None => crate::debug!("invalid state {} for {:?}", state, id),
        }
        None
    }

    /// Print every registered capability and its signature, one per line.
    pub fn list_capabilities(&mut self) {
        let mut line: heapless::String<64> = heapless::String::new();
        self.console.info_print("Capabilities List");
        for (id, capability) in self.table.iter() {
            line.clear();
            let _ = fmt::write(&mut line, format_args!(" {}", capability.signature()));
            self.console.print_hex(id.0);
            self.console.print(&line);
            self.console.newline();
        }
    }
}

/// Trim `args` to the declared length. Returns `None` when too few bytes were supplied.
fn fit_args<'a>(capability: Capability, event: &TriggerEvent<'a>) -> Option<TriggerEvent<'a>> {
    let len = capability.signature().arg_len();
    match event.args.get(..len) {
        Some(args) => Some(TriggerEvent { args, ..*event }),
        None => {
            crate::debug!(
                "{:?} needs {} arg bytes; got {}",
                event.capability,
                len,
                event.args.len()
            );
            None
        }
    }
}

#[cfg(test)]
#[path = "capability_test.rs"]
mod test;
