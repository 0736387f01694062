// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    hw::mcu,
    mutex::{LazyMainInit, MainCtx, MainInitCtx},
};
use phasectl::EdgeSense;

#[allow(non_snake_case)]
pub struct Dp {
    pub EXINT: mcu::EXINT,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: LazyMainInit<Dp> = unsafe { LazyMainInit::uninit() };

// MCUCR: INT0 sense control.
const ISC0_MASK: u8 = 0x03;
const ISC0_ANY_CHANGE: u8 = 0x01;
// GICR and GIFR.
const INT0: u8 = 1 << 6;
const INTF0: u8 = 1 << 6;

impl Dp {
    pub fn setup(&self, _: &MainInitCtx) {
        // PD2: Mains zero crossing. Both edges.
        self.EXINT
            .mcucr()
            .modify(|r, w| w.set((r.bits() & !ISC0_MASK) | ISC0_ANY_CHANGE));
        self.EXINT.gifr().write(|w| w.set(INTF0));
    }
}

/// Unmask the zero crossing interrupt.
pub fn exint_irq_enable(_m: &MainCtx) {
    DP.EXINT.gicr().modify(|r, w| w.set(r.bits() | INT0));
}

/// INT0 as zero crossing edge sense.
pub struct ZeroCrossInt0;

impl EdgeSense for ZeroCrossInt0 {
    #[inline(always)]
    fn acknowledge(&mut self) {
        DP.EXINT.gifr().write(|w| w.set(INTF0));
    }
}

// vim: ts=4 sw=4 expandtab
