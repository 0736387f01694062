// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    debug::Debug,
    delay::BusyDelay,
    exint::{ZeroCrossInt0, exint_irq_enable},
    mutex::{IrqCtx, MainCtx},
    ports::{INDICATORS, PULSE_MOTOR, PULSE_POWER, PortPin, STATUS_LED, ZERO_CROSS, read_switches},
    timer::{MotorTc1, PowerTc0, timer_irq_enable},
};
use phasectl::{
    Controller, Indicators, ModeEvent, ModeMachine, PhaseBoard, PulseDriver, detect_grid_freq,
    startup::self_test,
};

static CONTROLLER: Controller = Controller::new();

type Board = PhaseBoard<ZeroCrossInt0, PowerTc0, MotorTc1, PortPin, BusyDelay>;

#[inline(always)]
fn board() -> Board {
    PhaseBoard {
        edge: ZeroCrossInt0,
        power_timer: PowerTc0,
        motor_timer: MotorTc1,
        power_out: PulseDriver::new(PULSE_POWER),
        motor_out: PulseDriver::new(PULSE_MOTOR),
        delay: BusyDelay,
    }
}

pub fn irq_handler_int0(_c: &IrqCtx) {
    CONTROLLER.irq_zero_cross(&mut board());
}

pub fn irq_handler_timer0_ovf(_c: &IrqCtx) {
    CONTROLLER.irq_power_timer(&mut board());
}

pub fn irq_handler_timer1_compa(_c: &IrqCtx) {
    CONTROLLER.irq_motor_timer(&mut board());
}

pub struct System {
    mode: ModeMachine,
    leds: Indicators<PortPin>,
    status: PortPin,
    delay: BusyDelay,
}

impl System {
    pub fn new(_m: &MainCtx<'_>) -> Self {
        Self {
            mode: ModeMachine::new(),
            leds: Indicators::new(INDICATORS),
            status: STATUS_LED,
            delay: BusyDelay,
        }
    }

    /// Detect the grid frequency and arm the phase engine.
    /// Interrupts must still be disabled.
    pub fn init(&mut self, m: &MainCtx<'_>) {
        let mut b = board();
        b.power_out.release();
        b.motor_out.release();

        let mut sense = ZERO_CROSS;
        let grid = detect_grid_freq(&mut sense, &mut PowerTc0);
        CONTROLLER.select_grid(grid);
        Debug::GridFreq.log_u8(grid.hz());

        CONTROLLER.start(&mut b);
        exint_irq_enable(m);
        timer_irq_enable(m);
    }

    /// Runs with interrupts enabled.
    pub fn self_test(&mut self, _m: &MainCtx<'_>) {
        self_test(&CONTROLLER, &mut self.leds, &mut self.status, &mut self.delay);
    }

    pub fn run(&mut self, _m: &MainCtx<'_>) {
        let sw = read_switches();
        let event = self
            .mode
            .poll(&CONTROLLER, sw, &mut self.leds, &mut self.delay);

        let state = CONTROLLER.state();
        Debug::PowerMode.log_u8(state.power_mode() as u8);
        Debug::MotorLevel.log_u8(state.motor_level().get());
        Debug::MotorShift.log_u8(state.soft_start().shift());
        Debug::MotorArmed.log_u8(state.motor_armed().into());
        if event != ModeEvent::None {
            Debug::ModeEvent.log_u16(event.code());
        }
    }
}

// vim: ts=4 sw=4 expandtab
