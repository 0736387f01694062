// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    hw::{interrupt, mcu},
    mutex::{LazyMainInit, MainInitCtx},
};
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use phasectl::Switches;

macro_rules! impl_port {
    (
        $struct:ident,
        $name:ident,
        $port:ident,
        $pin:ident,
        $ddr:ident
    ) => {
        #[allow(non_snake_case)]
        pub struct $struct {
            pub $name: mcu::$name,
        }

        // SAFETY: Is initialized when constructing the MainCtx.
        pub static $name: LazyMainInit<$struct> = unsafe { LazyMainInit::uninit() };

        impl $struct {
            #[inline(always)]
            pub fn get(&self, bit: u8) -> bool {
                self.$name.$pin().read().bits() & (1 << bit) != 0
            }

            /// Read-modify-write of the output register.
            /// Atomic w.r.t. the interrupt handlers.
            #[inline(always)]
            pub fn set(&self, bit: u8, value: bool) {
                interrupt::free(|_| {
                    self.$name.$port().modify(|r, w| {
                        if value {
                            w.set(r.bits() | (1 << bit))
                        } else {
                            w.set(r.bits() & !(1 << bit))
                        }
                    });
                });
            }

            fn setup_bits(&self, port: u8, ddr: u8) {
                self.$name.$port().write(|w| w.set(port));
                self.$name.$ddr().write(|w| w.set(ddr));
            }
        }
    };
}

impl_port!(PortB, PORTB, portb, pinb, ddrb);
impl_port!(PortC, PORTC, portc, pinc, ddrc);
impl_port!(PortD, PORTD, portd, pind, ddrd);

const fn pin_input(_bit: u8) -> u8 {
    0
}
const fn pin_output(bit: u8) -> u8 {
    1 << bit
}
const fn pin_low(_bit: u8) -> u8 {
    0
}
const fn pin_high(bit: u8) -> u8 {
    1 << bit
}
const fn pin_floating(_bit: u8) -> u8 {
    0
}
const fn pin_pullup(bit: u8) -> u8 {
    1 << bit
}

impl PortB {
    #[rustfmt::skip]
    pub fn setup(&self, _: &MainInitCtx) {
        self.setup_bits(
            pin_high(0) | // power pulse A, active low
            pin_high(1) | // power pulse B, active low
            pin_low(2) | // indicator 5
            pin_pullup(3) | // ISP MOSI
            pin_pullup(4) | // ISP MISO
            pin_pullup(5) | // ISP SCK
            pin_floating(6) | // XTAL1
            pin_floating(7), // XTAL2
            pin_output(0) | // power pulse A, active low
            pin_output(1) | // power pulse B, active low
            pin_output(2) | // indicator 5
            pin_input(3) | // ISP MOSI
            pin_input(4) | // ISP MISO
            pin_input(5) | // ISP SCK
            pin_input(6) | // XTAL1
            pin_input(7), // XTAL2
        );
    }
}

impl PortC {
    #[rustfmt::skip]
    pub fn setup(&self, _: &MainInitCtx) {
        self.setup_bits(
            pin_high(0) | // motor pulse A, active low
            pin_high(1) | // motor pulse B, active low
            pin_low(2) | // indicator 1
            pin_low(3) | // indicator 2
            pin_low(4) | // indicator 3
            pin_low(5) | // indicator 4
            pin_floating(6), // RESET
            pin_output(0) | // motor pulse A, active low
            pin_output(1) | // motor pulse B, active low
            pin_output(2) | // indicator 1
            pin_output(3) | // indicator 2
            pin_output(4) | // indicator 3
            pin_output(5) | // indicator 4
            pin_input(6), // RESET
        );
    }
}

impl PortD {
    #[rustfmt::skip]
    pub fn setup(&self, _: &MainInitCtx) {
        self.setup_bits(
            pin_pullup(0) | // RXD
            pin_high(1) | // TXD, debug stream
            pin_floating(2) | // zero crossing sense, INT0
            pin_pullup(3) | // power switch, active low
            pin_pullup(4) | // minus switch, active low
            pin_pullup(5) | // plus switch, active low
            pin_pullup(6) | // filter switch, high = open
            pin_low(7), // status LED
            pin_input(0) | // RXD
            pin_output(1) | // TXD, debug stream
            pin_input(2) | // zero crossing sense, INT0
            pin_input(3) | // power switch, active low
            pin_input(4) | // minus switch, active low
            pin_input(5) | // plus switch, active low
            pin_input(6) | // filter switch, high = open
            pin_output(7), // status LED
        );
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Port {
    B,
    C,
    D,
}

/// One port pin as `embedded-hal` input and output.
#[derive(Clone, Copy)]
pub struct PortPin {
    port: Port,
    bit: u8,
}

impl PortPin {
    pub const fn new(port: Port, bit: u8) -> Self {
        Self { port, bit }
    }

    #[inline(always)]
    pub fn get(&self) -> bool {
        match self.port {
            Port::B => PORTB.get(self.bit),
            Port::C => PORTC.get(self.bit),
            Port::D => PORTD.get(self.bit),
        }
    }

    #[inline(always)]
    pub fn set(&self, value: bool) {
        match self.port {
            Port::B => PORTB.set(self.bit, value),
            Port::C => PORTC.set(self.bit, value),
            Port::D => PORTD.set(self.bit, value),
        }
    }
}

impl ErrorType for PortPin {
    type Error = Infallible;
}

impl OutputPin for PortPin {
    #[inline(always)]
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set(false);
        Ok(())
    }

    #[inline(always)]
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set(true);
        Ok(())
    }
}

impl InputPin for PortPin {
    #[inline(always)]
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.get())
    }

    #[inline(always)]
    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.get())
    }
}

pub const PULSE_POWER: [PortPin; 2] = [PortPin::new(Port::B, 0), PortPin::new(Port::B, 1)];
pub const PULSE_MOTOR: [PortPin; 2] = [PortPin::new(Port::C, 0), PortPin::new(Port::C, 1)];

pub const INDICATORS: [PortPin; 5] = [
    PortPin::new(Port::C, 2),
    PortPin::new(Port::C, 3),
    PortPin::new(Port::C, 4),
    PortPin::new(Port::C, 5),
    PortPin::new(Port::B, 2),
];
pub const STATUS_LED: PortPin = PortPin::new(Port::D, 7);

pub const ZERO_CROSS: PortPin = PortPin::new(Port::D, 2);

const SW_POWER: PortPin = PortPin::new(Port::D, 3);
const SW_MINUS: PortPin = PortPin::new(Port::D, 4);
const SW_PLUS: PortPin = PortPin::new(Port::D, 5);
const SW_FILTER: PortPin = PortPin::new(Port::D, 6);

/// Sample the front panel switches.
pub fn read_switches() -> Switches {
    Switches {
        power: !SW_POWER.get(),
        minus: !SW_MINUS.get(),
        plus: !SW_PLUS.get(),
        filter_open: SW_FILTER.get(),
    }
}

// vim: ts=4 sw=4 expandtab
