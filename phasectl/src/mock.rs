// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording collaborators for the unit tests.

use crate::{
    hal::{EdgeSense, MotorTimer, PhaseIo, PowerTimer},
    pulse::Output,
};
use core::{cell::RefCell, convert::Infallible};
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, OutputPin},
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Ev {
    Pin(u8, bool),
    DelayNs(u32),
    EdgeAck,
    PowerLoad(u8),
    PowerAck,
    MotorRestart,
    MotorCompare(u16),
    MotorDisarm,
    MotorAck,
    Fire(Output),
}

pub struct Log(RefCell<Vec<Ev>>);

impl Log {
    pub fn new() -> Self {
        Self(RefCell::new(Vec::new()))
    }

    pub fn push(&self, ev: Ev) {
        self.0.borrow_mut().push(ev);
    }

    pub fn take(&self) -> Vec<Ev> {
        self.0.take()
    }
}

pub struct MockPin<'a> {
    log: &'a Log,
    id: u8,
}

impl<'a> MockPin<'a> {
    pub fn new(log: &'a Log, id: u8) -> Self {
        Self { log, id }
    }
}

impl ErrorType for MockPin<'_> {
    type Error = Infallible;
}

impl OutputPin for MockPin<'_> {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.log.push(Ev::Pin(self.id, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.log.push(Ev::Pin(self.id, true));
        Ok(())
    }
}

pub struct MockDelay<'a> {
    log: &'a Log,
}

impl<'a> MockDelay<'a> {
    pub fn new(log: &'a Log) -> Self {
        Self { log }
    }
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Ev::DelayNs(ns));
    }
}

pub struct MockEdge<'a> {
    log: &'a Log,
}

impl<'a> MockEdge<'a> {
    pub fn new(log: &'a Log) -> Self {
        Self { log }
    }
}

impl EdgeSense for MockEdge<'_> {
    fn acknowledge(&mut self) {
        self.log.push(Ev::EdgeAck);
    }
}

pub struct MockPowerTimer<'a> {
    log: &'a Log,
}

impl<'a> MockPowerTimer<'a> {
    pub fn new(log: &'a Log) -> Self {
        Self { log }
    }
}

impl PowerTimer for MockPowerTimer<'_> {
    fn load(&mut self, count: u8) {
        self.log.push(Ev::PowerLoad(count));
    }

    fn acknowledge(&mut self) {
        self.log.push(Ev::PowerAck);
    }
}

pub struct MockMotorTimer<'a> {
    log: &'a Log,
}

impl<'a> MockMotorTimer<'a> {
    pub fn new(log: &'a Log) -> Self {
        Self { log }
    }
}

impl MotorTimer for MockMotorTimer<'_> {
    fn restart(&mut self) {
        self.log.push(Ev::MotorRestart);
    }

    fn set_compare(&mut self, ticks: u16) {
        self.log.push(Ev::MotorCompare(ticks));
    }

    fn disarm(&mut self) {
        self.log.push(Ev::MotorDisarm);
    }

    fn acknowledge(&mut self) {
        self.log.push(Ev::MotorAck);
    }
}

/// [PhaseIo] that records the requested actions.
/// Pulses are recorded as [Ev::Fire] instead of pin changes.
pub struct MockIo<'a> {
    log: &'a Log,
}

impl<'a> MockIo<'a> {
    pub fn new(log: &'a Log) -> Self {
        Self { log }
    }
}

impl PhaseIo for MockIo<'_> {
    fn ack_zero_cross(&mut self) {
        self.log.push(Ev::EdgeAck);
    }

    fn power_timer_load(&mut self, count: u8) {
        self.log.push(Ev::PowerLoad(count));
    }

    fn power_timer_ack(&mut self) {
        self.log.push(Ev::PowerAck);
    }

    fn motor_timer_restart(&mut self) {
        self.log.push(Ev::MotorRestart);
    }

    fn motor_timer_compare(&mut self, ticks: u16) {
        self.log.push(Ev::MotorCompare(ticks));
    }

    fn motor_timer_disarm(&mut self) {
        self.log.push(Ev::MotorDisarm);
    }

    fn motor_timer_ack(&mut self) {
        self.log.push(Ev::MotorAck);
    }

    fn fire(&mut self, output: Output) {
        self.log.push(Ev::Fire(output));
    }
}

/// Count the fired pulses per output.
pub fn count_fired(events: &[Ev]) -> (usize, usize) {
    let power = events
        .iter()
        .filter(|e| **e == Ev::Fire(Output::Power))
        .count();
    let motor = events
        .iter()
        .filter(|e| **e == Ev::Fire(Output::Motor))
        .count();
    (power, motor)
}

// vim: ts=4 sw=4 expandtab
