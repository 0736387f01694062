// -*- coding: utf-8 -*-
// Copyright (C) 2025 Michael Büsch <m@bues.ch>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Phase delay tables for 50 Hz and 60 Hz mains.

/// Power pulse timer tick, in microseconds.
pub const POWER_TICK_US: u32 = 64;

/// Motor pulse timer tick, in microseconds.
pub const MOTOR_TICK_US: u32 = 40;

/// Number of motor delay table entries, including the "off" reference.
pub const MOTOR_DELAY_COUNT: usize = 6;

/// Mains grid frequency.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GridFreq {
    Hz50,
    Hz60,
}

impl GridFreq {
    /// The phase table belonging to this grid frequency.
    pub const fn table(self) -> &'static PhaseTable {
        match self {
            Self::Hz50 => &TABLE_50HZ,
            Self::Hz60 => &TABLE_60HZ,
        }
    }

    pub const fn hz(self) -> u8 {
        match self {
            Self::Hz50 => 50,
            Self::Hz60 => 60,
        }
    }

    /// Mains half-wave duration, in microseconds.
    pub const fn halfwave_us(self) -> u32 {
        1_000_000 / (self.hz() as u32 * 2)
    }
}

/// Operating mode of the power supply pulse.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerMode {
    /// Large phase delay. Low output power.
    #[default]
    Standby = 0,
    /// Minimum phase delay. Full output power.
    Active = 1,
}

/// Motor speed level, 1 (slowest) to 5 (fastest).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorLevel(u8);

impl MotorLevel {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(5);
    pub const DEFAULT: Self = Self(3);

    pub const fn new(level: u8) -> Option<Self> {
        if level >= Self::MIN.0 && level <= Self::MAX.0 {
            Some(Self(level))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Next faster level. `None` at the ceiling.
    pub const fn up(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// Next slower level. `None` at the floor.
    pub const fn down(self) -> Option<Self> {
        Self::new(self.0 - 1)
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for MotorLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Phase delays from zero crossing to pulse.
///
/// The power delays are in [POWER_TICK_US] ticks and indexed by [PowerMode].
/// The motor delays are in [MOTOR_TICK_US] ticks and indexed by [MotorLevel].
/// Motor index 0 is the "off" reference. It is only used to compute the
/// soft-start span and never driven.
#[derive(Debug, PartialEq, Eq)]
pub struct PhaseTable {
    power_delay: [u8; 2],
    motor_delay: [u8; MOTOR_DELAY_COUNT],
}

impl PhaseTable {
    pub const fn power_delay(&self, mode: PowerMode) -> u8 {
        self.power_delay[mode as usize]
    }

    pub const fn motor_delay(&self, level: MotorLevel) -> u8 {
        self.motor_delay[level.index()]
    }

    /// The "off" reference delay at motor index 0.
    pub const fn motor_off_delay(&self) -> u8 {
        self.motor_delay[0]
    }

    /// Delay difference between `level` and the next slower level.
    pub const fn motor_step(&self, level: MotorLevel) -> u8 {
        self.motor_delay[level.index() - 1] - self.motor_delay[level.index()]
    }

    /// Delay difference between "off" and `level`.
    pub const fn motor_span(&self, level: MotorLevel) -> u8 {
        self.motor_delay[0] - self.motor_delay[level.index()]
    }

    /// Motor delays must strictly decrease with the index.
    /// The soft-start direction depends on it.
    pub const fn is_monotonic(&self) -> bool {
        let mut i = 1;
        while i < MOTOR_DELAY_COUNT {
            if self.motor_delay[i - 1] <= self.motor_delay[i] {
                return false;
            }
            i += 1;
        }
        self.power_delay[0] >= self.power_delay[1]
    }
}

/// 50 Hz: 156.25 power ticks and 250 motor ticks per half-wave.
pub const TABLE_50HZ: PhaseTable = PhaseTable {
    // 70%, 0%
    power_delay: [109, 0],
    // 85%, 78%, 69%, 61%, 53%, 45%
    motor_delay: [213, 195, 173, 153, 133, 113],
};

/// 60 Hz: 130.21 power ticks and 208.3 motor ticks per half-wave.
pub const TABLE_60HZ: PhaseTable = PhaseTable {
    // 60%, 0%
    power_delay: [78, 0],
    // 85%, 78%, 69%, 61%, 53%, 45%
    motor_delay: [177, 162, 144, 127, 110, 94],
};

const _: () = assert!(TABLE_50HZ.is_monotonic());
const _: () = assert!(TABLE_60HZ.is_monotonic());


// vim: ts=4 sw=4 expandtab
