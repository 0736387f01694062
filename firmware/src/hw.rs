// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

pub use avr_device::atmega8 as mcu;
pub use avr_device::interrupt;
pub use mcu::Peripherals;

use crate::mutex::IrqCtx;

macro_rules! define_isr {
    ($name:ident, $handler:path) => {
        #[avr_device::interrupt(atmega8)]
        fn $name() {
            // SAFETY: We are inside of an interrupt handler.
            // Therefore, it is safe to construct an `IrqCtx`.
            let c = unsafe { IrqCtx::new() };
            $handler(&c);
        }
    };
}

define_isr!(INT0, crate::system::irq_handler_int0);
define_isr!(TIMER0_OVF, crate::system::irq_handler_timer0_ovf);
define_isr!(TIMER1_COMPA, crate::system::irq_handler_timer1_compa);
#[cfg(feature = "debug")]
define_isr!(USART_UDRE, crate::usart::irq_handler_udre);

/// Watchdog control register I/O address.
const WDTCR: u8 = 0x21;

/// Enable the watchdog with a timeout of 2.1 s.
pub fn wdt_init() {
    // SAFETY: The asm code only accesses the WDT registers
    //         which are not accessed from anywhere else in the program.
    unsafe {
        core::arch::asm!(
            "ldi {tmp}, 0x18", // WDCE=1, WDE=1
            "out {WDTCR}, {tmp}",
            "ldi {tmp}, 0x0F", // WDE=1, WDP2=1, WDP1=1, WDP0=1
            "out {WDTCR}, {tmp}",
            tmp = out(reg_upper) _,
            WDTCR = const WDTCR,
            options(nostack, preserves_flags)
        );
    }
}

pub fn wdt_poke(_wp: &mcu::WDT) {
    avr_device::asm::wdr();
}

// vim: ts=4 sw=4 expandtab
