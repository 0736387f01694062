// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zero crossing synchronizer and the two pulse schedulers.
//!
//! Every mains edge (rising and falling) restarts both schedulers.
//! The power scheduler fires on the power timer overflow,
//! the motor scheduler on the motor timer compare-match.
//! Each scheduler fires at most once per half-wave.

use crate::{
    hal::PhaseIo,
    pulse::Output,
    state::ControllerState,
    table::PowerMode,
};

/// Two's complement counter value that overflows an 8 bit
/// count-up timer after `ticks` ticks.
pub const fn countdown(ticks: u8) -> u8 {
    0_u8.wrapping_sub(ticks)
}

/// State of one pulse scheduler.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseState {
    /// Switched off. Timer events are ignored.
    Disarmed,
    /// Fired in this half-wave. Waiting for the next zero crossing.
    Idle,
    /// Timer is loaded. The next timer event fires the pulse.
    Pending,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseEngine {
    power: PulseState,
    motor: PulseState,
}

impl PhaseEngine {
    pub const fn new() -> Self {
        Self {
            power: PulseState::Disarmed,
            motor: PulseState::Disarmed,
        }
    }

    pub const fn power_state(&self) -> PulseState {
        self.power
    }

    pub const fn motor_state(&self) -> PulseState {
        self.motor
    }

    pub const fn is_started(&self) -> bool {
        !matches!(self.power, PulseState::Disarmed)
    }

    /// Arm the schedulers.
    /// Must be called once before the interrupts are unmasked.
    pub fn start(&mut self, io: &mut impl PhaseIo) {
        io.ack_zero_cross();
        io.power_timer_load(0);
        io.power_timer_ack();
        io.motor_timer_disarm();
        io.motor_timer_ack();
        self.power = PulseState::Idle;
        self.motor = PulseState::Idle;
    }

    /// Mains zero crossing edge.
    pub fn zero_cross(&mut self, ctl: &mut ControllerState, io: &mut impl PhaseIo) {
        io.ack_zero_cross();
        if !self.is_started() {
            return;
        }

        io.motor_timer_restart();
        io.power_timer_load(countdown(ctl.power_delay()));
        io.motor_timer_compare(ctl.motor_compare());
        ctl.soft_start.step();

        self.power = PulseState::Pending;
        self.motor = if ctl.motor_armed() {
            PulseState::Pending
        } else {
            PulseState::Disarmed
        };

        // Full power fires right at the zero crossing.
        if ctl.power_mode() == PowerMode::Active {
            self.fire_power(io);
        }
    }

    /// Power timer overflow.
    pub fn power_timer_overflow(&mut self, io: &mut impl PhaseIo) {
        io.power_timer_ack();
        if self.power == PulseState::Pending {
            self.fire_power(io);
        }
    }

    fn fire_power(&mut self, io: &mut impl PhaseIo) {
        io.fire(Output::Power);
        self.power = PulseState::Idle;
    }

    /// Motor timer compare-match.
    pub fn motor_timer_match(&mut self, ctl: &ControllerState, io: &mut impl PhaseIo) {
        io.motor_timer_ack();
        match self.motor {
            PulseState::Pending if ctl.motor_armed() => {
                io.fire(Output::Motor);
                self.motor = PulseState::Idle;
            }
            PulseState::Pending => {
                // Disarmed after the zero crossing.
                self.motor = PulseState::Disarmed;
            }
            PulseState::Idle | PulseState::Disarmed => (),
        }
        io.motor_timer_disarm();
    }
}

impl Default for PhaseEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mock::{Ev, Log, MockIo, count_fired},
        table::{GridFreq, MotorLevel},
    };

    fn started(log: &Log) -> PhaseEngine {
        let mut eng = PhaseEngine::new();
        eng.start(&mut MockIo::new(log));
        log.take();
        eng
    }

    #[test]
    fn test_countdown() {
        assert_eq!(countdown(0), 0);
        assert_eq!(countdown(109), 147);
        assert_eq!(countdown(78), 178);
        assert_eq!(countdown(109).wrapping_add(109), 0);
    }

    #[test]
    fn test_start() {
        let log = Log::new();
        let mut eng = PhaseEngine::new();
        assert!(!eng.is_started());
        eng.start(&mut MockIo::new(&log));
        assert!(eng.is_started());
        assert_eq!(
            log.take(),
            [
                Ev::EdgeAck,
                Ev::PowerLoad(0),
                Ev::PowerAck,
                Ev::MotorDisarm,
                Ev::MotorAck
            ]
        );
        assert_eq!(eng.power_state(), PulseState::Idle);
        assert_eq!(eng.motor_state(), PulseState::Idle);
    }

    #[test]
    fn test_zero_cross_before_start() {
        let log = Log::new();
        let mut eng = PhaseEngine::new();
        let mut ctl = ControllerState::new(GridFreq::Hz50);
        eng.zero_cross(&mut ctl, &mut MockIo::new(&log));
        assert_eq!(log.take(), [Ev::EdgeAck]);
        assert_eq!(eng.power_state(), PulseState::Disarmed);
    }

    #[test]
    fn test_zero_cross_standby() {
        let log = Log::new();
        let mut eng = started(&log);
        let mut ctl = ControllerState::new(GridFreq::Hz50);
        let mut io = MockIo::new(&log);

        eng.zero_cross(&mut ctl, &mut io);
        assert_eq!(
            log.take(),
            [
                Ev::EdgeAck,
                Ev::MotorRestart,
                Ev::PowerLoad(countdown(109)),
                Ev::MotorCompare(153),
            ]
        );
        assert_eq!(eng.power_state(), PulseState::Pending);
        assert_eq!(eng.motor_state(), PulseState::Disarmed);

        eng.power_timer_overflow(&mut io);
        assert_eq!(log.take(), [Ev::PowerAck, Ev::Fire(Output::Power)]);
        assert_eq!(eng.power_state(), PulseState::Idle);

        // A second overflow in the same half-wave does not fire.
        eng.power_timer_overflow(&mut io);
        assert_eq!(log.take(), [Ev::PowerAck]);

        // Motor is not armed.
        eng.motor_timer_match(&ctl, &mut io);
        assert_eq!(log.take(), [Ev::MotorAck, Ev::MotorDisarm]);
    }

    #[test]
    fn test_zero_cross_active_fires_immediately() {
        let log = Log::new();
        let mut eng = started(&log);
        let mut ctl = ControllerState::new(GridFreq::Hz60);
        ctl.set_power_mode(PowerMode::Active);
        let mut io = MockIo::new(&log);

        eng.zero_cross(&mut ctl, &mut io);
        let ev = log.take();
        assert!(ev.contains(&Ev::PowerLoad(0)));
        assert_eq!(ev.last(), Some(&Ev::Fire(Output::Power)));
        assert_eq!(eng.power_state(), PulseState::Idle);

        // The late overflow is ignored.
        eng.power_timer_overflow(&mut io);
        assert_eq!(count_fired(&log.take()), (0, 0));
    }

    #[test]
    fn test_motor_ramp() {
        let log = Log::new();
        let mut eng = started(&log);
        let mut ctl = ControllerState::new(GridFreq::Hz50);
        ctl.power_on(MotorLevel::MAX, true);
        let mut io = MockIo::new(&log);

        // Shift 100 unwinds in 50 half-waves.
        let mut compares = Vec::new();
        for _ in 0..60 {
            eng.zero_cross(&mut ctl, &mut io);
            assert_eq!(eng.motor_state(), PulseState::Pending);
            eng.motor_timer_match(&ctl, &mut io);
            assert_eq!(eng.motor_state(), PulseState::Idle);
            // Spurious match after firing.
            eng.motor_timer_match(&ctl, &mut io);

            let ev = log.take();
            assert_eq!(count_fired(&ev), (1, 1));
            compares.extend(ev.iter().filter_map(|e| match e {
                Ev::MotorCompare(c) => Some(*c),
                _ => None,
            }));
        }
        assert_eq!(compares[0], 213);
        assert_eq!(compares[1], 211);
        assert_eq!(compares[49], 115);
        assert!(compares[50..].iter().all(|c| *c == 113));
        assert!(compares.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_motor_disarmed_mid_halfwave() {
        let log = Log::new();
        let mut eng = started(&log);
        let mut ctl = ControllerState::new(GridFreq::Hz50);
        ctl.power_on(MotorLevel::DEFAULT, true);
        let mut io = MockIo::new(&log);

        eng.zero_cross(&mut ctl, &mut io);
        assert_eq!(eng.motor_state(), PulseState::Pending);
        ctl.disarm_motor();
        eng.motor_timer_match(&ctl, &mut io);
        assert_eq!(eng.motor_state(), PulseState::Disarmed);
        assert_eq!(count_fired(&log.take()), (1, 0));
    }

    #[test]
    fn test_both_edges_resync() {
        let log = Log::new();
        let mut eng = started(&log);
        let mut ctl = ControllerState::new(GridFreq::Hz60);
        ctl.power_on(MotorLevel::MIN, true);
        let start_shift = ctl.soft_start().shift();
        let mut io = MockIo::new(&log);

        // Every edge is one half-wave. Power and motor fire once each.
        for _ in 0..4 {
            eng.zero_cross(&mut ctl, &mut io);
            eng.motor_timer_match(&ctl, &mut io);
        }
        assert_eq!(count_fired(&log.take()), (4, 4));
        assert_eq!(ctl.soft_start().shift(), start_shift - 8);
    }
}

// vim: ts=4 sw=4 expandtab
