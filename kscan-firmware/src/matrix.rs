use embedded_hal::digital::{InputPin, OutputPin};
use heapless::Deque;
use kscan_common::trigger::KeyState;

use crate::scan_loop::Matrix;

/// A key position and its lifecycle state after the latest strobe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanKey {
    pub row: u8,
    pub col: u8,
    pub state: KeyState,
}
impl ScanKey {
    pub fn new(row: u8, col: u8, state: KeyState) -> Self {
        Self { row, col, state }
    }

    pub fn same_key(&self, other: &ScanKey) -> bool {
        self.row == other.row && self.col == other.col
    }
}

/// Source of key triggers for the macro engine.
pub trait KeyTriggers {
    fn next_trigger(&mut self) -> Option<ScanKey>;
}

/// Key matrix read by strobing one output pin (column) low at a time and reading every input
/// pin (row); inputs are pulled up, so a closed switch reads low.
///
/// Every strobed key that is not [KeyState::Off] queues a trigger: Press on the first scan down,
/// Hold while it stays down, Release on the first scan up.
pub struct StrobeMatrix<
    I: InputPin,
    O: OutputPin,
    const INPUT_N: usize,
    const OUTPUT_N: usize,
    const QUEUE_N: usize,
> {
    input_pins: [I; INPUT_N],
    output_pins: [O; OUTPUT_N],

    state: [[KeyState; INPUT_N]; OUTPUT_N],
    triggers: Deque<ScanKey, QUEUE_N>,

    /// Latest current budget in mA.
    current_limit: Option<u32>,
}
impl<I: InputPin, O: OutputPin, const INPUT_N: usize, const OUTPUT_N: usize, const QUEUE_N: usize>
    StrobeMatrix<I, O, INPUT_N, OUTPUT_N, QUEUE_N>
{
    /// Rows and columns are reported as `u8`.
    const FITS_U8: () = assert!(
        INPUT_N <= u8::MAX as usize && OUTPUT_N <= u8::MAX as usize,
        "matrix rows and columns must fit in a u8"
    );

    pub fn new(input_pins: [I; INPUT_N], output_pins: [O; OUTPUT_N]) -> Self {
        let () = Self::FITS_U8;
        Self {
            input_pins,
            output_pins,
            state: [[KeyState::Off; INPUT_N]; OUTPUT_N],
            triggers: Deque::new(),
            current_limit: None,
        }
    }

    pub fn key_state(&self, row: usize, col: usize) -> KeyState {
        self.state
            .get(col)
            .and_then(|c| c.get(row))
            .copied()
            .unwrap_or_default()
    }

    pub fn current_limit(&self) -> Option<u32> {
        self.current_limit
    }

    fn strobe(&mut self, col: usize) {
        let (Some(op), Some(states)) = (self.output_pins.get_mut(col), self.state.get_mut(col))
        else {
            return;
        };
        let _ = op.set_low();

        for (row, (ip, s)) in self.input_pins.iter_mut().zip(states.iter_mut()).enumerate() {
            *s = s.next(ip.is_low().unwrap_or(false));
            if *s == KeyState::Off {
                continue;
            }
            let key = ScanKey::new(row as u8, col as u8, *s);
            if self.triggers.push_back(key).is_err() {
                crate::warn!("trigger queue full; dropped {:?}", key);
            }
        }

        let _ = op.set_high();
    }
}

impl<I: InputPin, O: OutputPin, const INPUT_N: usize, const OUTPUT_N: usize, const QUEUE_N: usize>
    Matrix for StrobeMatrix<I, O, INPUT_N, OUTPUT_N, QUEUE_N>
{
    fn setup(&mut self) {
        for op in self.output_pins.iter_mut() {
            let _ = op.set_high();
        }
        self.state = [[KeyState::Off; INPUT_N]; OUTPUT_N];
        self.triggers.clear();
    }

    fn scan(&mut self, _scan_count: u16, strobe_position: &mut u8, columns_per_step: u8) {
        if OUTPUT_N == 0 {
            return;
        }
        let start = (*strobe_position as usize).min(OUTPUT_N - 1);
        let mut end = (start + columns_per_step.max(1) as usize).min(OUTPUT_N);
        // a sweep ends when the position reaches the last column, so never stop just short of it
        if end + 1 == OUTPUT_N {
            end = OUTPUT_N;
        }

        for col in start..end {
            self.strobe(col);
        }

        *strobe_position = if end == OUTPUT_N {
            (OUTPUT_N - 1) as u8
        } else {
            end as u8
        };
    }

    fn total_columns(&self) -> u8 {
        OUTPUT_N as u8
    }

    fn current_change(&mut self, milli_amps: u32) {
        self.current_limit = Some(milli_amps);
    }
}

impl<I: InputPin, O: OutputPin, const INPUT_N: usize, const OUTPUT_N: usize, const QUEUE_N: usize>
    KeyTriggers for StrobeMatrix<I, O, INPUT_N, OUTPUT_N, QUEUE_N>
{
    fn next_trigger(&mut self) -> Option<ScanKey> {
        self.triggers.pop_front()
    }
}

#[cfg(test)]
#[path = "matrix_test.rs"]
mod test;
