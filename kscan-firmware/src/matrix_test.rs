extern crate std;

use std::vec::Vec;

use super::*;

use crate::switch_test_stub::{KeyMatrix, Pin};

type TestMatrix = StrobeMatrix<Pin, Pin, 2, 6, 16>;

macro_rules! setup {
    ($km:ident, $matrix:ident, $x:block) => {{
        let $km = KeyMatrix::new(2, 6);
        let mut $matrix = TestMatrix::new($km.input_pins(), $km.output_pins());
        $matrix.setup();

        $x
    }};
}

fn sweep(matrix: &mut TestMatrix) -> Vec<ScanKey> {
    let mut pos = 0;
    loop {
        matrix.scan(0, &mut pos, 4);
        if pos as usize == 5 {
            break;
        }
    }
    core::iter::from_fn(|| matrix.next_trigger()).collect()
}

#[test]
fn setup_drives_outputs_high() {
    setup!(km, matrix, {
        assert_eq!(matrix.total_columns(), 6);
        assert!((0..6).all(|o| !km.is_output_low(o)));
        assert_eq!(matrix.next_trigger(), None);
    });
}

#[test]
fn strobe_chunks() {
    setup!(km, matrix, {
        let mut pos = 0;
        matrix.scan(0, &mut pos, 4);
        assert_eq!(pos, 4);
        assert_eq!(km.strobes(), 4);

        matrix.scan(0, &mut pos, 4);
        assert_eq!(pos, 5);
        assert_eq!(km.strobes(), 6);
        assert!((0..6).all(|o| !km.is_output_low(o)));

        // last column only, if the driver has not rolled over
        matrix.scan(0, &mut pos, 4);
        assert_eq!(pos, 5);
        assert_eq!(km.strobes(), 7);
    });
}

#[test]
fn never_stops_short_of_last_column() {
    let km = KeyMatrix::new(1, 5);
    let mut matrix = StrobeMatrix::<Pin, Pin, 1, 5, 8>::new(km.input_pins(), km.output_pins());
    let mut pos = 0;
    matrix.scan(0, &mut pos, 4);
    assert_eq!(pos, 4);
    assert_eq!(km.strobes(), 5);

    let mut pos = 0;
    matrix.scan(0, &mut pos, 2);
    assert_eq!(pos, 2);
    matrix.scan(0, &mut pos, 2);
    assert_eq!(pos, 4);
    assert_eq!(km.strobes(), 10);
}

#[test]
fn key_lifecycle() {
    setup!(km, matrix, {
        km.down(1, 4);
        assert_eq!(sweep(&mut matrix), [ScanKey::new(1, 4, KeyState::Press)]);
        assert_eq!(matrix.key_state(1, 4), KeyState::Press);

        km.down(0, 0);
        assert_eq!(
            sweep(&mut matrix),
            [
                ScanKey::new(0, 0, KeyState::Press),
                ScanKey::new(1, 4, KeyState::Hold)
            ]
        );

        km.up(1, 4);
        assert_eq!(
            sweep(&mut matrix),
            [
                ScanKey::new(0, 0, KeyState::Hold),
                ScanKey::new(1, 4, KeyState::Release)
            ]
        );

        km.up(0, 0);
        assert_eq!(sweep(&mut matrix), [ScanKey::new(0, 0, KeyState::Release)]);
        assert!(sweep(&mut matrix).is_empty());
        assert_eq!(matrix.key_state(0, 0), KeyState::Off);
    });
}

#[test]
fn queue_overflow_drops_newest() {
    let km = KeyMatrix::new(3, 2);
    let mut matrix = StrobeMatrix::<Pin, Pin, 3, 2, 4>::new(km.input_pins(), km.output_pins());
    for i in 0..3 {
        for o in 0..2 {
            km.down(i, o);
        }
    }
    let mut pos = 0;
    matrix.scan(0, &mut pos, 4);

    let keys: Vec<_> = core::iter::from_fn(|| matrix.next_trigger()).collect();
    assert_eq!(keys.len(), 4);
    assert_eq!(keys[0], ScanKey::new(0, 0, KeyState::Press));
    assert_eq!(keys[3], ScanKey::new(0, 1, KeyState::Press));
    // dropped keys still change state
    assert_eq!(matrix.key_state(2, 1), KeyState::Press);
}

#[test]
fn current_change_recorded() {
    setup!(km, matrix, {
        assert_eq!(matrix.current_limit(), None);
        matrix.current_change(100);
        matrix.current_change(500);
        assert_eq!(matrix.current_limit(), Some(500));
        assert!(km.strobes() == 0);
    });
}

#[test]
fn widest_matrix() {
    let km = KeyMatrix::new(1, 255);
    let mut matrix = StrobeMatrix::<Pin, Pin, 1, 255, 4>::new(km.input_pins(), km.output_pins());
    assert_eq!(matrix.total_columns(), 255);

    km.down(0, 254);
    let mut pos = 250;
    matrix.scan(0, &mut pos, 4);
    assert_eq!(pos, 254);
    assert_eq!(matrix.next_trigger(), Some(ScanKey::new(0, 254, KeyState::Press)));
}
