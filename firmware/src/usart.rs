// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    debug,
    hw::mcu,
    mutex::{IrqCtx, LazyMainInit, MainInitCtx},
};

const FCPU: u32 = 16_000_000;
const BAUD: u32 = 19_200;
const UBRR: u16 = (FCPU / (16 * BAUD) - 1) as u16;

// UCSRB bits.
const TXEN: u8 = 1 << 3;
const UDRIE: u8 = 1 << 5;
// UCSRC: URSEL=1, asynchronous, 8N1.
const UCSRC_8N1: u8 = 0x86;

#[allow(non_snake_case)]
pub struct Dp {
    pub USART: mcu::USART,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: LazyMainInit<Dp> = unsafe { LazyMainInit::uninit() };

impl Dp {
    /// Start transmitting.
    /// The data register empty interrupt fires as soon as interrupts are enabled.
    pub fn setup(&self, _: &MainInitCtx) {
        self.USART.ubrrh().write(|w| w.set((UBRR >> 8) as u8));
        self.USART.ubrrl().write(|w| w.set(UBRR as u8));
        self.USART.ucsrc().write(|w| w.set(UCSRC_8N1));
        self.USART.ucsrb().write(|w| w.set(TXEN | UDRIE));
    }
}

pub fn irq_handler_udre(c: &IrqCtx) {
    let data = debug::tx_next(c);
    DP.USART.udr().write(|w| w.set(data));
}

// vim: ts=4 sw=4 expandtab
