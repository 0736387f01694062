// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Motor soft-start ramp.
//!
//! The shift is the extra motor phase delay, in motor ticks, that is still
//! to be unwound before the motor runs at its target level.
//! It decays by [SHIFT_STEP] on every zero crossing, which gives a linear
//! ramp from "off" to the target level.

use crate::table::{MotorLevel, PhaseTable};

/// Shift decay per zero crossing, in motor ticks.
pub const SHIFT_STEP: u8 = 2;

/// Round up to the next even value.
const fn even_up(v: u8) -> u8 {
    v.saturating_add(v % 2) & !1
}

/// Soft-start state. The shift is always even.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SoftStart {
    shift: u8,
}

impl SoftStart {
    /// No ramp in progress.
    pub const fn done() -> Self {
        Self { shift: 0 }
    }

    /// Start a full ramp from "off" to `level`.
    pub const fn start(table: &PhaseTable, level: MotorLevel) -> Self {
        Self {
            shift: even_up(table.motor_span(level)),
        }
    }

    pub const fn shift(&self) -> u8 {
        self.shift
    }

    pub const fn is_done(&self) -> bool {
        self.shift == 0
    }

    /// Number of zero crossings until the ramp is done.
    pub const fn remaining_halfwaves(&self) -> u8 {
        self.shift.div_ceil(SHIFT_STEP)
    }

    /// One zero crossing has passed.
    pub fn step(&mut self) {
        self.shift = self.shift.saturating_sub(SHIFT_STEP);
    }

    /// The target went one level up to `new_level`.
    ///
    /// The step between the old and the new level is added,
    /// so that the actual phase delay does not jump.
    pub fn level_up(&mut self, table: &PhaseTable, new_level: MotorLevel) {
        let delta = even_up(table.motor_step(new_level));
        self.shift = self.shift.saturating_add(delta);
    }

    /// The target went one level down to `new_level`.
    ///
    /// The step is only taken out while the remaining shift exceeds it.
    /// The shift is even, so exceeding an odd step also covers its
    /// even rounding.
    pub fn level_down(&mut self, table: &PhaseTable, new_level: MotorLevel) {
        let Some(old_level) = new_level.up() else {
            return;
        };
        let step = table.motor_step(old_level);
        if self.shift > step {
            self.shift -= even_up(step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::GridFreq;
    use proptest::prelude::*;

    fn level(l: u8) -> MotorLevel {
        MotorLevel::new(l).unwrap()
    }

    fn grid() -> impl Strategy<Value = GridFreq> {
        prop_oneof![Just(GridFreq::Hz50), Just(GridFreq::Hz60)]
    }

    #[test]
    fn test_even_up() {
        assert_eq!(even_up(0), 0);
        assert_eq!(even_up(1), 2);
        assert_eq!(even_up(60), 60);
        assert_eq!(even_up(33), 34);
        assert_eq!(even_up(255), 254);
    }

    #[test]
    fn test_start() {
        let t = GridFreq::Hz50.table();
        // 213 - 195
        assert_eq!(SoftStart::start(t, level(1)).shift(), 18);
        // 213 - 113
        assert_eq!(SoftStart::start(t, level(5)).shift(), 100);

        let t = GridFreq::Hz60.table();
        // 177 - 162 = 15, rounded up
        assert_eq!(SoftStart::start(t, level(1)).shift(), 16);
        // 177 - 127
        assert_eq!(SoftStart::start(t, level(3)).shift(), 50);

        assert!(SoftStart::done().is_done());
        assert_eq!(SoftStart::default(), SoftStart::done());
    }

    #[test]
    fn test_step_saturates() {
        let mut s = SoftStart { shift: 2 };
        s.step();
        assert!(s.is_done());
        s.step();
        assert_eq!(s.shift(), 0);
    }

    #[test]
    fn test_level_down_after_ramp() {
        let t = GridFreq::Hz50.table();
        let mut s = SoftStart::start(t, level(4));
        while !s.is_done() {
            s.step();
        }
        s.level_down(t, level(3));
        assert_eq!(s.shift(), 0);
    }

    #[test]
    fn test_level_down_below_delta() {
        let t = GridFreq::Hz50.table();
        // Step 3 -> 4 is 20 ticks.
        let mut s = SoftStart { shift: 20 };
        s.level_down(t, level(3));
        assert_eq!(s.shift(), 20);
        let mut s = SoftStart { shift: 22 };
        s.level_down(t, level(3));
        assert_eq!(s.shift(), 2);
    }

    #[test]
    fn test_level_down_odd_step() {
        let t = GridFreq::Hz60.table();
        // Step 3 -> 4 is 17 ticks.
        assert_eq!(t.motor_step(level(4)), 17);
        let mut s = SoftStart { shift: 18 };
        let before = t.motor_delay(level(4)) + s.shift();
        s.level_down(t, level(3));
        assert_eq!(s.shift(), 0);
        let after = t.motor_delay(level(3)) + s.shift();
        assert_eq!(after.abs_diff(before), 1);

        let mut s = SoftStart { shift: 16 };
        s.level_down(t, level(3));
        assert_eq!(s.shift(), 16);
    }

    #[test]
    fn test_level_down_during_60hz_ramp() {
        let t = GridFreq::Hz60.table();
        let mut s = SoftStart::start(t, level(4));
        assert_eq!(s.shift(), 68);
        while s.shift() > 18 {
            s.step();
        }
        s.level_down(t, level(3));
        assert_eq!(s.shift(), 0);
    }

    proptest! {
        #[test]
        fn prop_ramp_reaches_zero(grid in grid(), l in 1u8..=5) {
            let mut s = SoftStart::start(grid.table(), level(l));
            let expected = s.remaining_halfwaves();
            prop_assert_eq!(expected as u32, (s.shift() as u32).div_ceil(2));
            let mut count = 0u8;
            while !s.is_done() {
                prop_assert_eq!(s.shift() % 2, 0);
                s.step();
                count += 1;
            }
            prop_assert_eq!(count, expected);
            s.step();
            prop_assert_eq!(s.shift(), 0);
        }

        #[test]
        fn prop_up_down_restores_shift(grid in grid(), l in 1u8..=4, decay in 0u8..8) {
            let table = grid.table();
            let mut s = SoftStart::start(table, level(l));
            for _ in 0..decay {
                s.step();
            }
            prop_assume!(!s.is_done());
            let before = s.shift();

            s.level_up(table, level(l + 1));
            prop_assert_eq!(s.shift() % 2, 0);
            prop_assert!(s.shift() > before);
            s.level_down(table, level(l));
            prop_assert!(s.shift().abs_diff(before) <= 1);
        }

        #[test]
        fn prop_adjustments_stay_even(
            grid in grid(),
            l in 1u8..=5,
            ops in proptest::collection::vec(0u8..3, 0..64),
        ) {
            let table = grid.table();
            let mut cur = level(l);
            let mut s = SoftStart::start(table, cur);
            for op in ops {
                match op {
                    0 => s.step(),
                    1 => {
                        if let Some(next) = cur.up() {
                            cur = next;
                            s.level_up(table, cur);
                        }
                    }
                    _ => {
                        if let Some(next) = cur.down() {
                            cur = next;
                            s.level_down(table, cur);
                        }
                    }
                }
                prop_assert_eq!(s.shift() % 2, 0);
            }
        }
    }
}

// vim: ts=4 sw=4 expandtab
