// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hardware collaborators of the phase engine.
//!
//! The board implements these for its timers and its
//! edge sense input. Pins and delays are `embedded-hal` traits.

use crate::pulse::{Output, PulseDriver};
use core::convert::Infallible;
use embedded_hal::{delay::DelayNs, digital::OutputPin};

/// Interrupt-on-change input of the mains zero crossing detector.
pub trait EdgeSense {
    /// Acknowledge the pending edge.
    fn acknowledge(&mut self);
}

/// 8 bit count-up timer with overflow event.
pub trait PowerTimer {
    /// Load the counter register.
    fn load(&mut self, count: u8);
    /// Acknowledge the overflow event.
    fn acknowledge(&mut self);
}

/// Count-up timer with compare-match event.
/// Compare values are in motor ticks.
pub trait MotorTimer {
    /// Reset the counter to zero.
    fn restart(&mut self);
    /// Set the compare target.
    fn set_compare(&mut self, ticks: u16);
    /// Set the compare target to its maximum.
    fn disarm(&mut self);
    /// Acknowledge the compare-match event.
    fn acknowledge(&mut self);
}

/// Free running 8 bit count-up timer.
pub trait FreeRunTimer {
    fn restart(&mut self);
    fn ticks(&mut self) -> u8;
}

/// Everything the interrupt handlers touch.
pub trait PhaseIo {
    fn ack_zero_cross(&mut self);
    fn power_timer_load(&mut self, count: u8);
    fn power_timer_ack(&mut self);
    fn motor_timer_restart(&mut self);
    fn motor_timer_compare(&mut self, ticks: u16);
    fn motor_timer_disarm(&mut self);
    fn motor_timer_ack(&mut self);
    /// Fire one pulse on `output`.
    fn fire(&mut self, output: Output);
}

/// [PhaseIo] built from the individual collaborators.
pub struct PhaseBoard<E, PT, MT, P, D> {
    pub edge: E,
    pub power_timer: PT,
    pub motor_timer: MT,
    pub power_out: PulseDriver<P>,
    pub motor_out: PulseDriver<P>,
    pub delay: D,
}

impl<E, PT, MT, P, D> PhaseIo for PhaseBoard<E, PT, MT, P, D>
where
    E: EdgeSense,
    PT: PowerTimer,
    MT: MotorTimer,
    P: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    fn ack_zero_cross(&mut self) {
        self.edge.acknowledge();
    }

    fn power_timer_load(&mut self, count: u8) {
        self.power_timer.load(count);
    }

    fn power_timer_ack(&mut self) {
        self.power_timer.acknowledge();
    }

    fn motor_timer_restart(&mut self) {
        self.motor_timer.restart();
    }

    fn motor_timer_compare(&mut self, ticks: u16) {
        self.motor_timer.set_compare(ticks);
    }

    fn motor_timer_disarm(&mut self) {
        self.motor_timer.disarm();
    }

    fn motor_timer_ack(&mut self) {
        self.motor_timer.acknowledge();
    }

    fn fire(&mut self, output: Output) {
        match output {
            Output::Power => self.power_out.fire(&mut self.delay),
            Output::Motor => self.motor_out.fire(&mut self.delay),
        }
    }
}


// vim: ts=4 sw=4 expandtab
