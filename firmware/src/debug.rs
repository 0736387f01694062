// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debug value stream.
//!
//! The values are sent round-robin as `[id, lo, hi]` frames.
//! Each round ends with a `[0xFF, 0xFF, 0xFF]` sync frame.

#[cfg(feature = "debug")]
use crate::{
    hw::interrupt,
    mutex::{IrqCtx, Mutex},
};
#[cfg(feature = "debug")]
use core::cell::Cell;

#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Debug {
    GridFreq,
    PowerMode,
    MotorLevel,
    MotorShift,
    MotorArmed,
    ModeEvent,
}
#[cfg(feature = "debug")]
const NRVALUES: usize = 6;

#[cfg(feature = "debug")]
const INDEXSHIFT: usize = 2;
#[cfg(feature = "debug")]
const INDEXMASK: u8 = (1 << INDEXSHIFT) - 1;

#[cfg(feature = "debug")]
static VALUES: Mutex<[Cell<u16>; NRVALUES]> = Mutex::new([
    Cell::new(0),
    Cell::new(0),
    Cell::new(0),
    Cell::new(0),
    Cell::new(0),
    Cell::new(0),
]);
#[cfg(feature = "debug")]
static INDEX: Mutex<Cell<u8>> = Mutex::new(Cell::new(0));

/// Get the next byte to transmit.
#[cfg(feature = "debug")]
pub fn tx_next(c: &IrqCtx) -> u8 {
    let cs = c.cs();
    let index = INDEX.borrow(cs).get();
    let id = index >> INDEXSHIFT;
    let txindex = index & INDEXMASK;

    let value = if id < NRVALUES as u8 {
        VALUES.borrow(cs)[id as usize].get()
    } else {
        0xFFFF
    };

    match txindex {
        0 => {
            INDEX.borrow(cs).set(index + 1);
            if id < NRVALUES as u8 { id } else { 0xFF }
        }
        1 => {
            INDEX.borrow(cs).set(index + 1);
            value as u8
        }
        _ => {
            if id >= NRVALUES as u8 {
                INDEX.borrow(cs).set(0);
            } else {
                INDEX.borrow(cs).set((id + 1) << INDEXSHIFT);
            }
            (value >> 8) as u8
        }
    }
}

impl Debug {
    #[cfg(feature = "debug")]
    pub fn log_u16(&self, value: u16) {
        interrupt::free(|cs| {
            let id = *self as usize;
            let values = VALUES.borrow(cs);
            if id < values.len() {
                values[id].set(value);
            }
        });
    }

    #[cfg(not(feature = "debug"))]
    #[inline(always)]
    pub fn log_u16(&self, _value: u16) {}

    pub fn log_u8(&self, value: u8) {
        self.log_u16(value.into())
    }
}

// vim: ts=4 sw=4 expandtab
