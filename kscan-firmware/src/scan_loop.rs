//! One iteration of the keyboard: sense the matrix, render LEDs, roll the cycle counters.
//!
//! The driver never blocks and never retries; errors inside the matrix, LED or pixel services
//! are theirs to handle.

/// Columns strobed per call to [Matrix::scan] unless configured otherwise.
pub const COLUMNS_PER_STEP: u8 = 4;

pub trait Matrix {
    fn setup(&mut self);

    /// Strobe up to `columns_per_step` columns starting at `strobe_position`, advancing it.
    ///
    /// When the sweep is complete `strobe_position` is left on the last column; the driver then
    /// resets it to zero.
    fn scan(&mut self, scan_count: u16, strobe_position: &mut u8, columns_per_step: u8);

    fn total_columns(&self) -> u8;

    /// The available current budget changed. Must clamp its own draw before returning.
    fn current_change(&mut self, milli_amps: u32);
}

pub trait Led {
    fn setup(&mut self);

    fn scan(&mut self);

    /// The available current budget changed. Must clamp its own draw before returning.
    fn current_change(&mut self, milli_amps: u32);
}

pub trait Pixel {
    fn setup(&mut self);

    fn process(&mut self);
}

/// No LEDs fitted.
impl Led for () {
    fn setup(&mut self) {}

    fn scan(&mut self) {}

    fn current_change(&mut self, _milli_amps: u32) {}
}

/// No pixel map.
impl Pixel for () {
    fn setup(&mut self) {}

    fn process(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanStatus {
    Success,
}

pub struct ScanLoop<X: Matrix, L: Led, P: Pixel> {
    matrix: X,
    led: L,
    pixel: P,

    /// Scan cycles since the last successful USB send.
    scan_count: u16,
    /// Next column to strobe.
    strobe_position: u8,
    columns_per_step: u8,
}
impl<X: Matrix, L: Led, P: Pixel> ScanLoop<X, L, P> {
    pub fn new(matrix: X, led: L, pixel: P) -> Self {
        Self {
            matrix,
            led,
            pixel,
            scan_count: 0,
            strobe_position: 0,
            columns_per_step: COLUMNS_PER_STEP,
        }
    }

    pub fn with_columns_per_step(mut self, columns_per_step: u8) -> Self {
        self.columns_per_step = columns_per_step.max(1);
        self
    }

    pub fn setup(&mut self) {
        self.matrix.setup();
        self.led.setup();
        self.pixel.setup();

        self.scan_count = 0;
        self.strobe_position = 0;
    }

    /// Run one cycle: matrix scan, pixel processing, LED update, then roll over the strobe
    /// position and count the cycle once the last column has been reached.
    pub fn scan_loop(&mut self) -> ScanStatus {
        self.matrix.scan(
            self.scan_count,
            &mut self.strobe_position,
            self.columns_per_step,
        );

        self.pixel.process();
        self.led.scan();

        if self.strobe_position >= self.matrix.total_columns().saturating_sub(1) {
            self.strobe_position = 0;
            self.scan_count = self.scan_count.wrapping_add(1);
        }

        ScanStatus::Success
    }

    /// The macro engine has processed every key it knows about.
    pub fn finished_with_macro(&mut self, _sent_keys: u8) {}

    /// The output module has sent its report; restart the accumulation window.
    pub fn finished_with_output(&mut self, _sent_keys: u8) {
        self.scan_count = 0;
    }

    /// Tell every power sensitive service about the new current budget.
    pub fn current_change(&mut self, milli_amps: u32) {
        crate::debug!("current budget {} mA", milli_amps);
        self.matrix.current_change(milli_amps);
        self.led.current_change(milli_amps);
    }

    pub fn scan_count(&self) -> u16 {
        self.scan_count
    }

    pub fn strobe_position(&self) -> u8 {
        self.strobe_position
    }

    pub fn matrix(&self) -> &X {
        &self.matrix
    }

    pub fn matrix_mut(&mut self) -> &mut X {
        &mut self.matrix
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    pub fn pixel(&self) -> &P {
        &self.pixel
    }
}

#[cfg(test)]
#[path = "scan_loop_test.rs"]
mod test;
