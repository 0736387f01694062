// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::table::MotorLevel;
use core::convert::Infallible;
use embedded_hal::digital::{OutputPin, PinState};

pub const INDICATOR_COUNT: usize = 5;

/// All indicators lit.
pub const ALL_ON: u8 = (1 << INDICATOR_COUNT) - 1;

/// Bar graph pattern: the low `level` bits set.
pub const fn level_bits(level: u8) -> u8 {
    if level as usize >= INDICATOR_COUNT {
        ALL_ON
    } else {
        (1 << level) - 1
    }
}

/// Five active high indicator outputs.
/// Bit 0 of a pattern is indicator 1.
pub struct Indicators<P> {
    leds: [P; INDICATOR_COUNT],
    bits: u8,
}

impl<P: OutputPin<Error = Infallible>> Indicators<P> {
    /// Wrap the outputs and switch them off.
    pub fn new(leds: [P; INDICATOR_COUNT]) -> Self {
        let mut this = Self { leds, bits: 0 };
        this.set_bits(0);
        this
    }

    pub fn set_bits(&mut self, bits: u8) {
        let bits = bits & ALL_ON;
        for (i, led) in self.leds.iter_mut().enumerate() {
            let Ok(()) = led.set_state(PinState::from(bits & (1 << i) != 0));
        }
        self.bits = bits;
    }

    pub fn show_level(&mut self, level: MotorLevel) {
        self.set_bits(level_bits(level.get()));
    }

    pub fn blank(&mut self) {
        self.set_bits(0);
    }

    /// The currently displayed pattern.
    pub fn bits(&self) -> u8 {
        self.bits
    }
}


// vim: ts=4 sw=4 expandtab
