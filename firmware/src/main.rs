// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]
#![feature(asm_experimental_arch)]

mod debug;
mod delay;
mod exint;
mod hw;
mod mutex;
mod ports;
mod system;
mod timer;
#[cfg(feature = "debug")]
mod usart;

use crate::{
    hw::{Peripherals, interrupt, wdt_init, wdt_poke},
    mutex::{MainCtx, MainInitCtx, unwrap_option},
    ports::{PORTB, PORTC, PORTD, PortB, PortC, PortD},
    system::System,
};

#[avr_device::entry]
fn main() -> ! {
    wdt_init();

    let dp = unwrap_option(Peripherals::take());

    let init_static_vars = |ctx: &MainInitCtx| {
        PORTB.init(ctx, PortB { PORTB: dp.PORTB });
        PORTC.init(ctx, PortC { PORTC: dp.PORTC });
        PORTD.init(ctx, PortD { PORTD: dp.PORTD });
        PORTB.setup(ctx);
        PORTC.setup(ctx);
        PORTD.setup(ctx);

        timer::DP.init(
            ctx,
            timer::Dp {
                TC0: dp.TC0,
                TC1: dp.TC1,
            },
        );
        timer::DP.setup(ctx);

        exint::DP.init(ctx, exint::Dp { EXINT: dp.EXINT });
        exint::DP.setup(ctx);

        #[cfg(feature = "debug")]
        {
            usart::DP.init(ctx, usart::Dp { USART: dp.USART });
            usart::DP.setup(ctx);
        }
    };

    // SAFETY:
    // This is the context handle for the main() function.
    // Holding a reference to this object proves that the holder
    // is running in main() context.
    // Interrupts are still disabled after reset.
    let m = unsafe { MainCtx::new_with_init(init_static_vars) };

    let mut sys = System::new(&m);
    sys.init(&m);

    // SAFETY: This must be after construction of MainCtx
    //         and after initialization of static MainInit variables.
    unsafe { interrupt::enable() };

    sys.self_test(&m);

    loop {
        sys.run(&m);
        wdt_poke(&dp.WDT);
    }
}

// vim: ts=4 sw=4 expandtab
