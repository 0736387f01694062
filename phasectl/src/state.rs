// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller state shared between the main loop and the interrupts.

use crate::{
    engine::PhaseEngine,
    hal::PhaseIo,
    ramp::SoftStart,
    table::{GridFreq, MotorLevel, PhaseTable, PowerMode},
};
use core::cell::Cell;
use critical_section::Mutex;

/// Mode parameters that the phase engine reads on every zero crossing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerState {
    pub(crate) grid: GridFreq,
    pub(crate) power_mode: PowerMode,
    pub(crate) motor_level: MotorLevel,
    pub(crate) soft_start: SoftStart,
    pub(crate) motor_armed: bool,
}

impl ControllerState {
    /// Powered off state.
    pub const fn new(grid: GridFreq) -> Self {
        Self {
            grid,
            power_mode: PowerMode::Standby,
            motor_level: MotorLevel::DEFAULT,
            soft_start: SoftStart::done(),
            motor_armed: false,
        }
    }

    pub const fn table(&self) -> &'static PhaseTable {
        self.grid.table()
    }

    pub const fn grid(&self) -> GridFreq {
        self.grid
    }

    pub const fn power_mode(&self) -> PowerMode {
        self.power_mode
    }

    pub const fn motor_level(&self) -> MotorLevel {
        self.motor_level
    }

    pub const fn soft_start(&self) -> SoftStart {
        self.soft_start
    }

    pub const fn motor_armed(&self) -> bool {
        self.motor_armed
    }

    pub fn set_power_mode(&mut self, mode: PowerMode) {
        self.power_mode = mode;
    }

    /// Switch on at `level`.
    /// The motor is only armed, if the filter is open.
    pub fn power_on(&mut self, level: MotorLevel, filter_open: bool) {
        self.power_mode = PowerMode::Active;
        self.motor_level = level;
        self.soft_start = SoftStart::start(self.table(), level);
        self.motor_armed = filter_open;
    }

    pub fn power_off(&mut self) {
        self.motor_armed = false;
        self.power_mode = PowerMode::Standby;
    }

    /// One level faster. Returns the new level or `None` at the ceiling.
    pub fn level_up(&mut self) -> Option<MotorLevel> {
        let level = self.motor_level.up()?;
        self.motor_level = level;
        self.soft_start.level_up(self.grid.table(), level);
        Some(level)
    }

    /// One level slower. Returns the new level or `None` at the floor.
    pub fn level_down(&mut self) -> Option<MotorLevel> {
        let level = self.motor_level.down()?;
        self.motor_level = level;
        self.soft_start.level_down(self.grid.table(), level);
        Some(level)
    }

    pub fn disarm_motor(&mut self) {
        self.motor_armed = false;
    }

    /// Arm the motor with a full soft-start at the current level.
    pub fn restart_motor(&mut self) {
        self.soft_start = SoftStart::start(self.table(), self.motor_level);
        self.motor_armed = true;
    }

    /// Power pulse delay in power ticks.
    pub const fn power_delay(&self) -> u8 {
        self.table().power_delay(self.power_mode)
    }

    /// Motor compare target in motor ticks, including the soft-start shift.
    pub const fn motor_compare(&self) -> u16 {
        self.table().motor_delay(self.motor_level) as u16 + self.soft_start.shift() as u16
    }
}

/// The controller instance.
///
/// Lives in a `static` and is shared by the main loop and the interrupts.
/// All accesses happen in a critical section.
pub struct Controller {
    state: Mutex<Cell<ControllerState>>,
    engine: Mutex<Cell<PhaseEngine>>,
}

impl Controller {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(ControllerState::new(GridFreq::Hz50))),
            engine: Mutex::new(Cell::new(PhaseEngine::new())),
        }
    }

    /// Select the phase table.
    /// Ignored after [Controller::start].
    pub fn select_grid(&self, grid: GridFreq) {
        critical_section::with(|cs| {
            if !self.engine.borrow(cs).get().is_started() {
                let state = self.state.borrow(cs);
                state.set(ControllerState::new(grid));
            }
        });
    }

    /// Snapshot of the mode parameters.
    pub fn state(&self) -> ControllerState {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }

    /// Snapshot of the scheduler states.
    pub fn engine(&self) -> PhaseEngine {
        critical_section::with(|cs| self.engine.borrow(cs).get())
    }

    /// Modify the mode parameters atomically.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ControllerState) -> R,
    {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            let ret = f(&mut state);
            cell.set(state);
            ret
        })
    }

    /// Arm the schedulers. Call before the interrupts are unmasked.
    pub fn start(&self, io: &mut impl PhaseIo) {
        critical_section::with(|cs| {
            let cell = self.engine.borrow(cs);
            let mut engine = cell.get();
            engine.start(io);
            cell.set(engine);
        });
    }

    /// Zero crossing interrupt.
    pub fn irq_zero_cross(&self, io: &mut impl PhaseIo) {
        critical_section::with(|cs| {
            let engine_cell = self.engine.borrow(cs);
            let state_cell = self.state.borrow(cs);
            let mut engine = engine_cell.get();
            let mut state = state_cell.get();
            engine.zero_cross(&mut state, io);
            state_cell.set(state);
            engine_cell.set(engine);
        });
    }

    /// Power timer overflow interrupt.
    pub fn irq_power_timer(&self, io: &mut impl PhaseIo) {
        critical_section::with(|cs| {
            let cell = self.engine.borrow(cs);
            let mut engine = cell.get();
            engine.power_timer_overflow(io);
            cell.set(engine);
        });
    }

    /// Motor timer compare-match interrupt.
    pub fn irq_motor_timer(&self, io: &mut impl PhaseIo) {
        critical_section::with(|cs| {
            let cell = self.engine.borrow(cs);
            let state = self.state.borrow(cs).get();
            let mut engine = cell.get();
            engine.motor_timer_match(&state, io);
            cell.set(engine);
        });
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}


// vim: ts=4 sw=4 expandtab
