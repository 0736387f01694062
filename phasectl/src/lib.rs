// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mains synchronized phase control of two pulse outputs.
//!
//! A power supply pulse and a motor pulse pair are fired once per mains
//! half-wave with a configurable phase delay after the zero crossing.
//! The motor delay runs through a soft-start ramp whenever the motor is armed.
//!
//! The crate is hardware independent.
//! The board provides the collaborators from [hal] and routes its
//! interrupts into [Controller].

#![cfg_attr(not(test), no_std)]

pub mod engine;
pub mod freq;
pub mod hal;
pub mod indicator;
pub mod mode;
pub mod pulse;
pub mod ramp;
pub mod startup;
pub mod state;
pub mod table;

#[cfg(test)]
mod mock;

pub use crate::{
    engine::{PhaseEngine, PulseState},
    freq::detect_grid_freq,
    hal::{EdgeSense, FreeRunTimer, MotorTimer, PhaseBoard, PhaseIo, PowerTimer},
    indicator::Indicators,
    mode::{ModeEvent, ModeMachine, Switches},
    pulse::{Output, PulseDriver},
    ramp::SoftStart,
    state::{Controller, ControllerState},
    table::{GridFreq, MotorLevel, PhaseTable, PowerMode},
};

// vim: ts=4 sw=4 expandtab
