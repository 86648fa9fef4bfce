//! Ties the scan loop, the key bindings and the capability dispatcher into one keyboard that is
//! driven a tick at a time.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Ticker};

use crate::{
    capability::{CapabilityId, Dispatcher, TriggerEvent},
    console::Console,
    matrix::{KeyTriggers, ScanKey},
    output::OutputChannel,
    scan_loop::{Led, Matrix, Pixel, ScanLoop, COLUMNS_PER_STEP},
};

/// Run `capability` with `arg` as its key argument whenever the key at `row`, `col` changes
/// state. A key may have several bindings; they run in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyBinding {
    pub row: u8,
    pub col: u8,
    pub capability: CapabilityId,
    pub arg: u8,
}
impl KeyBinding {
    pub const fn new(row: u8, col: u8, capability: CapabilityId, arg: u8) -> Self {
        Self {
            row,
            col,
            capability,
            arg,
        }
    }

    fn matches(&self, key: &ScanKey) -> bool {
        self.row == key.row && self.col == key.col
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    pub columns_per_step: u8,
    pub tick: Duration,
}
impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            columns_per_step: COLUMNS_PER_STEP,
            tick: Duration::from_millis(1),
        }
    }
}

pub struct Keyboard<
    'c,
    X: Matrix + KeyTriggers,
    L: Led,
    P: Pixel,
    C: Console,
    M: RawMutex,
    const N: usize,
    const OUT: usize,
> {
    scan: ScanLoop<X, L, P>,
    dispatcher: Dispatcher<'c, C, M, N, OUT>,
    bindings: &'c [KeyBinding],
    output: &'c OutputChannel<M, OUT>,
    period: Duration,
}
impl<
        'c,
        X: Matrix + KeyTriggers,
        L: Led,
        P: Pixel,
        C: Console,
        M: RawMutex,
        const N: usize,
        const OUT: usize,
    > Keyboard<'c, X, L, P, C, M, N, OUT>
{
    pub fn new(
        scan: ScanLoop<X, L, P>,
        dispatcher: Dispatcher<'c, C, M, N, OUT>,
        bindings: &'c [KeyBinding],
        output: &'c OutputChannel<M, OUT>,
        config: ScanConfig,
    ) -> Self {
        let mut scan = scan.with_columns_per_step(config.columns_per_step);
        scan.setup();
        Self {
            scan,
            dispatcher,
            bindings,
            output,
            period: config.tick,
        }
    }

    pub fn scan_loop(&self) -> &ScanLoop<X, L, P> {
        &self.scan
    }

    pub fn dispatcher(&self) -> &Dispatcher<'c, C, M, N, OUT> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<'c, C, M, N, OUT> {
        &mut self.dispatcher
    }

    pub fn current_change(&mut self, milli_amps: u32) {
        self.scan.current_change(milli_amps);
    }

    /// One cycle: pick up the transport's completion signal, scan, then dispatch every queued
    /// trigger. Returns the number of capability invocations.
    pub fn tick(&mut self) -> u8 {
        if let Some(sent_keys) = self.output.take_finished() {
            self.scan.finished_with_output(sent_keys);
        }

        self.scan.scan_loop();

        let mut dispatched: u8 = 0;
        while let Some(key) = self.scan.matrix_mut().next_trigger() {
            for binding in self.bindings.iter().filter(|b| b.matches(&key)) {
                let args = [binding.arg];
                self.dispatcher
                    .invoke(&TriggerEvent::key(binding.capability, key.state, &args));
                dispatched = dispatched.saturating_add(1);
            }
        }

        self.scan.finished_with_macro(dispatched);
        dispatched
    }

    pub async fn run(&mut self) -> ! {
        let mut ticker = Ticker::every(self.period);
        loop {
            self.tick();
            ticker.next().await;
        }
    }
}

#[cfg(test)]
#[path = "exec_test.rs"]
mod test;
