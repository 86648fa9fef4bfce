extern crate alloc;
extern crate std;

use alloc::vec;
use core::{cell::RefCell, convert::Infallible};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use std::rc::Rc;
use std::vec::Vec;

#[derive(Debug)]
struct KeyMatrixInner {
    /// `switches[ipin * output_n + opin]`
    switches: Vec<bool>,
    outputs_low: Vec<bool>,
    output_n: usize,
    strobes: usize,
}

/// Simulated switch matrix. An input pin reads low while any closed switch connects it to an
/// output pin that is driven low.
#[derive(Clone)]
pub struct KeyMatrix {
    inner: Rc<RefCell<KeyMatrixInner>>,
}
impl KeyMatrix {
    pub fn new(input_n: usize, output_n: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(KeyMatrixInner {
                switches: vec![false; input_n * output_n],
                outputs_low: vec![false; output_n],
                output_n,
                strobes: 0,
            })),
        }
    }

    pub fn input_pins<const N: usize>(&self) -> [Pin; N] {
        core::array::from_fn(|idx| Pin {
            matrix: self.clone(),
            kind: PinKind::Input,
            idx,
        })
    }

    pub fn output_pins<const N: usize>(&self) -> [Pin; N] {
        core::array::from_fn(|idx| Pin {
            matrix: self.clone(),
            kind: PinKind::Output,
            idx,
        })
    }

    pub fn down(&self, ipin: usize, opin: usize) {
        self.set_switch(ipin, opin, true);
    }

    pub fn up(&self, ipin: usize, opin: usize) {
        self.set_switch(ipin, opin, false);
    }

    pub fn set_switch(&self, ipin: usize, opin: usize, is_down: bool) {
        let mut inner = self.inner.borrow_mut();
        let idx = ipin * inner.output_n + opin;
        inner.switches[idx] = is_down;
    }

    pub fn is_output_low(&self, opin: usize) -> bool {
        self.inner.borrow().outputs_low[opin]
    }

    /// How many times an output pin has been driven low.
    pub fn strobes(&self) -> usize {
        self.inner.borrow().strobes
    }

    fn input_is_low(&self, ipin: usize) -> bool {
        let inner = self.inner.borrow();
        let base = ipin * inner.output_n;
        inner
            .outputs_low
            .iter()
            .enumerate()
            .any(|(opin, low)| *low && inner.switches[base + opin])
    }

    fn set_output(&self, opin: usize, low: bool) {
        let mut inner = self.inner.borrow_mut();
        if low {
            inner.strobes += 1;
        }
        inner.outputs_low[opin] = low;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PinKind {
    Input,
    Output,
}

pub struct Pin {
    matrix: KeyMatrix,
    kind: PinKind,
    idx: usize,
}
impl ErrorType for Pin {
    type Error = Infallible;
}
impl InputPin for Pin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_low()?)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(match self.kind {
            PinKind::Input => self.matrix.input_is_low(self.idx),
            PinKind::Output => self.matrix.is_output_low(self.idx),
        })
    }
}
impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.matrix.set_output(self.idx, true);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.matrix.set_output(self.idx, false);
        Ok(())
    }
}
