// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::convert::Infallible;
use embedded_hal::{
    delay::DelayNs,
    digital::{OutputPin, PinState},
};

/// Gate pulse width, in microseconds.
pub const PULSE_WIDTH_US: u32 = 20;

/// The two pulse outputs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Output {
    /// Power supply pulse.
    Power,
    /// Motor pulse.
    Motor,
}

/// Fixed width, active low pulse on a pair of outputs.
pub struct PulseDriver<P> {
    pair: [P; 2],
}

impl<P: OutputPin<Error = Infallible>> PulseDriver<P> {
    /// Wrap an output pair. The pins are not touched.
    pub const fn new(pair: [P; 2]) -> Self {
        Self { pair }
    }

    /// Drive the pair to the inactive level.
    pub fn release(&mut self) {
        self.set(PinState::High);
    }

    /// Fire one pulse. Busy-waits for the pulse width.
    pub fn fire(&mut self, delay: &mut impl DelayNs) {
        self.set(PinState::Low);
        delay.delay_us(PULSE_WIDTH_US);
        self.set(PinState::High);
    }

    fn set(&mut self, state: PinState) {
        for pin in &mut self.pair {
            let Ok(()) = pin.set_state(state);
        }
    }
}


// vim: ts=4 sw=4 expandtab
