//! The boundary between capabilities and the USB transport.
//!
//! Capabilities queue [KeyEvent]s; the transport drains them, sends its reports and then signals
//! how many keys it sent so the scan loop can restart its accumulation window.

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel, signal::Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    Basic(u8, bool),
    Modifiers(u8, bool),
    /// Release everything. Sent when queued events had to be discarded.
    Clear,
}

pub struct OutputChannel<M: RawMutex, const N: usize> {
    events: Channel<M, KeyEvent, N>,
    finished: Signal<M, u8>,
}
impl<M: RawMutex, const N: usize> Default for OutputChannel<M, N> {
    fn default() -> Self {
        Self {
            events: Channel::new(),
            finished: Signal::new(),
        }
    }
}
impl<M: RawMutex, const N: usize> OutputChannel<M, N> {
    pub async fn receive(&self) -> KeyEvent {
        self.events.receive().await
    }

    pub fn try_receive(&self) -> Option<KeyEvent> {
        self.events.try_receive().ok()
    }

    /// Queue an event for the transport. If the queue is full the pending events, `event`
    /// included, are dropped and replaced by a single [KeyEvent::Clear]; returns false when that
    /// happens.
    pub(crate) fn report(&self, event: KeyEvent) -> bool {
        if self.events.try_send(event).is_ok() {
            return true;
        }
        crate::warn!("output queue full; clearing");
        self.events.clear();
        let _ = self.events.try_send(KeyEvent::Clear);
        false
    }

    /// Called by the transport once a report has been sent.
    pub fn finished_with_output(&self, sent_keys: u8) {
        self.finished.signal(sent_keys);
    }

    pub(crate) fn take_finished(&self) -> Option<u8> {
        self.finished.try_take()
    }
}

#[cfg(test)]
#[path = "output_test.rs"]
mod test;
