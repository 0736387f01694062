// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mains frequency detection.
//!
//! Runs once before the interrupts are enabled.
//! One low half-wave of the zero crossing signal is measured
//! with a free running [crate::table::POWER_TICK_US] timer.

use crate::{hal::FreeRunTimer, table::GridFreq};
use core::convert::Infallible;
use embedded_hal::digital::InputPin;

/// Half-wave length threshold in power ticks.
/// Midway between 156 ticks (50 Hz) and 130 ticks (60 Hz).
pub const DETECT_THRES_TICKS: u8 = 143;

/// Classify a measured half-wave length.
pub const fn classify(ticks: u8) -> GridFreq {
    if ticks > DETECT_THRES_TICKS {
        GridFreq::Hz50
    } else {
        GridFreq::Hz60
    }
}

fn wait_level(sense: &mut impl InputPin<Error = Infallible>, high: bool) {
    loop {
        let Ok(level) = sense.is_high();
        if level == high {
            break;
        }
    }
}

/// Measure the length of one low half-wave, in timer ticks.
///
/// Blocks until a complete low phase has been seen.
/// There is no timeout.
pub fn measure_halfwave(
    sense: &mut impl InputPin<Error = Infallible>,
    timer: &mut impl FreeRunTimer,
) -> u8 {
    // Sync to a falling edge.
    wait_level(sense, true);
    wait_level(sense, false);
    timer.restart();
    // Until the rising edge.
    wait_level(sense, true);
    timer.ticks()
}

/// Measure the mains half-wave and select the grid frequency.
pub fn detect_grid_freq(
    sense: &mut impl InputPin<Error = Infallible>,
    timer: &mut impl FreeRunTimer,
) -> GridFreq {
    classify(measure_halfwave(sense, timer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::POWER_TICK_US;
    use core::cell::Cell;
    use embedded_hal::digital::ErrorType;

    /// Simulated clock in timer ticks.
    /// Every pin read advances it by one tick.
    struct Clock {
        now: Cell<u32>,
    }

    /// Square wave with the given half-wave length in ticks.
    /// Starts in the middle of a low phase.
    struct Mains<'a> {
        clock: &'a Clock,
        halfwave: u32,
    }

    impl ErrorType for Mains<'_> {
        type Error = Infallible;
    }

    impl InputPin for Mains<'_> {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            let now = self.clock.now.get() + 1;
            self.clock.now.set(now);
            let phase = (now + self.halfwave / 2) / self.halfwave;
            Ok(phase % 2 == 1)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            let Ok(high) = self.is_high();
            Ok(!high)
        }
    }

    struct Timer<'a> {
        clock: &'a Clock,
        start: u32,
    }

    impl FreeRunTimer for Timer<'_> {
        fn restart(&mut self) {
            self.start = self.clock.now.get();
        }

        fn ticks(&mut self) -> u8 {
            (self.clock.now.get() - self.start) as u8
        }
    }

    fn detect(halfwave: u32) -> (u8, GridFreq) {
        let clock = Clock { now: Cell::new(0) };
        let mut sense = Mains {
            clock: &clock,
            halfwave,
        };
        let mut timer = Timer {
            clock: &clock,
            start: 0,
        };
        let ticks = measure_halfwave(&mut sense, &mut timer);
        let mut timer = Timer {
            clock: &clock,
            start: 0,
        };
        (ticks, detect_grid_freq(&mut sense, &mut timer))
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(150), GridFreq::Hz50);
        assert_eq!(classify(156), GridFreq::Hz50);
        assert_eq!(classify(144), GridFreq::Hz50);
        assert_eq!(classify(143), GridFreq::Hz60);
        assert_eq!(classify(130), GridFreq::Hz60);
        assert_eq!(classify(0), GridFreq::Hz60);
    }

    #[test]
    fn test_threshold_in_ticks() {
        let t50 = GridFreq::Hz50.halfwave_us() / POWER_TICK_US;
        let t60 = GridFreq::Hz60.halfwave_us() / POWER_TICK_US;
        assert_eq!(t50, 156);
        assert_eq!(t60, 130);
        assert_eq!(DETECT_THRES_TICKS as u32, (t50 + t60) / 2);
    }

    #[test]
    fn test_measure_50hz() {
        let (ticks, grid) = detect(156);
        assert!(ticks.abs_diff(156) <= 1);
        assert_eq!(grid, GridFreq::Hz50);
        assert_eq!(detect(150), (150, GridFreq::Hz50));
    }

    #[test]
    fn test_measure_60hz() {
        let (ticks, grid) = detect(130);
        assert!(ticks.abs_diff(130) <= 1);
        assert_eq!(grid, GridFreq::Hz60);
    }
}

// vim: ts=4 sw=4 expandtab
