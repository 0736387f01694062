// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    indicator::{ALL_ON, INDICATOR_COUNT, Indicators},
    state::Controller,
    table::PowerMode,
};
use core::convert::Infallible;
use embedded_hal::{delay::DelayNs, digital::OutputPin};

/// Time per self-test sweep step.
pub const SWEEP_STEP_MS: u32 = 100;

/// Power-on self-test.
///
/// Runs with the interrupts enabled. The power pulse runs at full power
/// while one dark indicator walks through the lit bar.
/// Afterwards all indicators stay lit and the power pulse is back in standby.
pub fn self_test<P, S>(
    ctl: &Controller,
    leds: &mut Indicators<P>,
    status: &mut S,
    delay: &mut impl DelayNs,
) where
    P: OutputPin<Error = Infallible>,
    S: OutputPin<Error = Infallible>,
{
    ctl.update(|s| s.set_power_mode(PowerMode::Active));
    let Ok(()) = status.set_low();

    for i in 0..INDICATOR_COUNT {
        leds.set_bits(ALL_ON & !(1 << i));
        delay.delay_ms(SWEEP_STEP_MS);
    }
    leds.set_bits(ALL_ON);

    let Ok(()) = status.set_high();
    delay.delay_ms(SWEEP_STEP_MS);
    ctl.update(|s| s.set_power_mode(PowerMode::Standby));
}


// vim: ts=4 sw=4 expandtab
