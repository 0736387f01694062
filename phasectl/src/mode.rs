// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operating mode selection by the front panel switches.
//!
//! Runs in the main loop. Switch levels are compared against the
//! previous poll. There is no debouncing.

use crate::{indicator::Indicators, state::Controller, table::MotorLevel};
use core::convert::Infallible;
use embedded_hal::{delay::DelayNs, digital::OutputPin};

/// Indicator blink half period while the filter is closed.
pub const BLINK_HALF_PERIOD_MS: u32 = 200;

/// Sampled switch levels.
/// `true` means pressed, except for `filter_open`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Switches {
    pub power: bool,
    pub minus: bool,
    pub plus: bool,
    pub filter_open: bool,
}

/// Result of one poll.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeEvent {
    None,
    PowerOn(MotorLevel),
    PowerOff,
    Level(MotorLevel),
    FilterClosed,
    FilterOpened,
    Blink,
}

impl ModeEvent {
    /// Numeric code for the debug stream.
    /// Event kind in the high byte, level in the low byte.
    pub const fn code(self) -> u16 {
        match self {
            Self::None => 0,
            Self::PowerOn(l) => 0x100 | l.get() as u16,
            Self::PowerOff => 0x200,
            Self::Level(l) => 0x300 | l.get() as u16,
            Self::FilterClosed => 0x400,
            Self::FilterOpened => 0x500,
            Self::Blink => 0x600,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ModeMachine {
    power: bool,
    minus: bool,
    plus: bool,
    filter_closed: bool,
}

impl ModeMachine {
    /// All switches start as released.
    pub const fn new() -> Self {
        Self {
            power: false,
            minus: false,
            plus: false,
            filter_closed: false,
        }
    }

    pub const fn is_filter_closed(&self) -> bool {
        self.filter_closed
    }

    /// Process one set of switch samples.
    ///
    /// While the filter is closed, each call blinks the indicators
    /// for one period and blocks for that time.
    /// The other switches are not processed until it opens again.
    pub fn poll<P>(
        &mut self,
        ctl: &Controller,
        sw: Switches,
        leds: &mut Indicators<P>,
        delay: &mut impl DelayNs,
    ) -> ModeEvent
    where
        P: OutputPin<Error = Infallible>,
    {
        if self.filter_closed {
            if sw.filter_open {
                return self.filter_opened(ctl, leds);
            }
            self.blink(ctl, leds, delay);
            return ModeEvent::Blink;
        }

        let mut event = ModeEvent::None;

        if sw.power != self.power {
            if sw.power {
                let level = if sw.minus {
                    MotorLevel::MIN
                } else if sw.plus {
                    MotorLevel::MAX
                } else {
                    MotorLevel::DEFAULT
                };
                ctl.update(|s| s.power_on(level, sw.filter_open));
                leds.show_level(level);
                event = ModeEvent::PowerOn(level);
            } else {
                ctl.update(|s| s.power_off());
                leds.blank();
                event = ModeEvent::PowerOff;
            }
            self.power = sw.power;
        }

        if !self.power {
            return event;
        }

        if sw.minus != self.minus {
            // Act on release.
            if !sw.minus {
                if let Some(level) = ctl.update(|s| s.level_down()) {
                    leds.show_level(level);
                    event = ModeEvent::Level(level);
                }
            }
            self.minus = sw.minus;
        }

        if sw.plus != self.plus {
            if !sw.plus {
                if let Some(level) = ctl.update(|s| s.level_up()) {
                    leds.show_level(level);
                    event = ModeEvent::Level(level);
                }
            }
            self.plus = sw.plus;
        }

        if !sw.filter_open {
            ctl.update(|s| s.disarm_motor());
            self.filter_closed = true;
            self.blink(ctl, leds, delay);
            event = ModeEvent::FilterClosed;
        }

        event
    }

    fn blink<P>(&mut self, ctl: &Controller, leds: &mut Indicators<P>, delay: &mut impl DelayNs)
    where
        P: OutputPin<Error = Infallible>,
    {
        leds.blank();
        delay.delay_ms(BLINK_HALF_PERIOD_MS);
        leds.show_level(ctl.state().motor_level());
        delay.delay_ms(BLINK_HALF_PERIOD_MS);
    }

    fn filter_opened<P>(&mut self, ctl: &Controller, leds: &mut Indicators<P>) -> ModeEvent
    where
        P: OutputPin<Error = Infallible>,
    {
        let level = ctl.update(|s| {
            s.restart_motor();
            s.motor_level()
        });
        leds.show_level(level);
        self.filter_closed = false;
        ModeEvent::FilterOpened
    }
}


// vim: ts=4 sw=4 expandtab
