// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TC0 is the power pulse timer and TC1 is the motor pulse timer.

use crate::{
    hw::mcu,
    mutex::{LazyMainInit, MainCtx, MainInitCtx},
};
use phasectl::{
    FreeRunTimer, MotorTimer, PowerTimer,
    table::{MOTOR_TICK_US, POWER_TICK_US},
};

#[allow(non_snake_case)]
pub struct Dp {
    pub TC0: mcu::TC0,
    pub TC1: mcu::TC1,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: LazyMainInit<Dp> = unsafe { LazyMainInit::uninit() };

/// TC1 runs at 4 us per tick.
const TC1_TICK_US: u32 = 4;
const TC1_PER_MOTOR_TICK: u16 = (MOTOR_TICK_US / TC1_TICK_US) as u16;

// TIMSK and TIFR bits.
const TOIE0: u8 = 1 << 0;
const TOV0: u8 = 1 << 0;
const OCIE1A: u8 = 1 << 4;
const OCF1A: u8 = 1 << 4;

const _: () = assert!(POWER_TICK_US == 64); // prescaler 1024 at 16 MHz
const _: () = assert!(MOTOR_TICK_US % TC1_TICK_US == 0);

impl Dp {
    #[rustfmt::skip]
    pub fn setup(&self, _: &MainInitCtx) {
        // Timer 0 configuration:
        // CS: 1024 -> 64 us per timer tick.
        self.TC0.tcnt0().write(|w| w.set(0));
        self.TC0.tccr0().write(|w| w.cs0().prescale_1024());

        // Timer 1 configuration:
        // Normal mode.
        // CS: 64 -> 4 us per timer tick.
        self.TC1.tccr1a().write(|w| w);
        self.TC1.tcnt1().write(|w| w.set(0));
        self.TC1.ocr1a().write(|w| w.set(0xFFFF));
        self.TC1.tccr1b().write(|w| w.cs1().prescale_64());
    }
}

/// Unmask the power timer overflow and the motor timer compare interrupts.
pub fn timer_irq_enable(_m: &MainCtx) {
    DP.TC0.tifr().write(|w| w.set(TOV0 | OCF1A));
    DP.TC0
        .timsk()
        .modify(|r, w| w.set(r.bits() | TOIE0 | OCIE1A));
}

/// TC0 as power pulse timer and free running detection timer.
pub struct PowerTc0;

impl PowerTimer for PowerTc0 {
    #[inline(always)]
    fn load(&mut self, count: u8) {
        DP.TC0.tcnt0().write(|w| w.set(count));
    }

    #[inline(always)]
    fn acknowledge(&mut self) {
        DP.TC0.tifr().write(|w| w.set(TOV0));
    }
}

impl FreeRunTimer for PowerTc0 {
    fn restart(&mut self) {
        DP.TC0.tcnt0().write(|w| w.set(0));
    }

    fn ticks(&mut self) -> u8 {
        DP.TC0.tcnt0().read().bits()
    }
}

/// TC1 as motor pulse timer.
pub struct MotorTc1;

impl MotorTimer for MotorTc1 {
    #[inline(always)]
    fn restart(&mut self) {
        DP.TC1.tcnt1().write(|w| w.set(0));
    }

    #[inline(always)]
    fn set_compare(&mut self, ticks: u16) {
        let ocr = ticks.saturating_mul(TC1_PER_MOTOR_TICK);
        DP.TC1.ocr1a().write(|w| w.set(ocr));
    }

    #[inline(always)]
    fn disarm(&mut self) {
        DP.TC1.ocr1a().write(|w| w.set(0xFFFF));
    }

    #[inline(always)]
    fn acknowledge(&mut self) {
        DP.TC1.tifr().write(|w| w.set(OCF1A));
    }
}

// vim: ts=4 sw=4 expandtab
