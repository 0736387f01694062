// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use embedded_hal::delay::DelayNs;

const FCPU_MHZ: u32 = 16;

/// CPU cycles per spin loop iteration (sbiw + brne).
const LOOP_CYCLES: u32 = 4;

const LOOPS_PER_US: u32 = FCPU_MHZ / LOOP_CYCLES;
const MAX_CHUNK_US: u32 = u16::MAX as u32 / LOOPS_PER_US;

#[inline(always)]
fn spin(loops: u16) {
    if loops == 0 {
        return;
    }
    // SAFETY: The asm code only decrements a register pair.
    unsafe {
        core::arch::asm!(
            "1: sbiw {n}, 1",
            "brne 1b",
            n = inout(reg_iw) loops => _,
            options(nomem, nostack)
        );
    }
}

/// Cycle counting busy-wait.
/// Interrupts that hit during the wait extend it.
pub struct BusyDelay;

impl DelayNs for BusyDelay {
    fn delay_ns(&mut self, ns: u32) {
        let mut us = ns.div_ceil(1000);
        while us > 0 {
            let chunk = us.min(MAX_CHUNK_US);
            spin((chunk * LOOPS_PER_US) as u16);
            us -= chunk;
        }
    }
}

// vim: ts=4 sw=4 expandtab
