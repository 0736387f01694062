// -*- coding: utf-8 -*-

//! Decoder for the firmware debug value stream.
//!
//! The firmware sends `[id, lo, hi]` frames for each value,
//! followed by a `[0xFF, 0xFF, 0xFF]` sync frame.

use std::fmt;

pub const SYNC: u8 = 0xFF;

/// Value names, indexed by id.
pub const NAMES: [&str; 6] = [
    "grid_hz",
    "power_mode",
    "motor_level",
    "motor_shift",
    "motor_armed",
    "mode_event",
];

const NRVALUES: usize = NAMES.len();

/// Value display format.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Format {
    Dec,
    Hex,
}

/// Value formats, indexed by id.
pub const FORMATS: [Format; NRVALUES] = [
    Format::Dec,
    Format::Dec,
    Format::Dec,
    Format::Dec,
    Format::Dec,
    Format::Hex,
];

/// One complete round of values.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Round {
    pub values: [Option<u16>; NRVALUES],
}

impl Round {
    pub fn get(&self, name: &str) -> Option<u16> {
        let id = NAMES.iter().position(|n| *n == name)?;
        self.values[id]
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for ((name, format), value) in NAMES.iter().zip(FORMATS).zip(self.values) {
            let Some(value) = value else {
                continue;
            };
            if !first {
                write!(f, " ")?;
            }
            first = false;
            match format {
                Format::Dec => write!(f, "{name}={value}")?,
                Format::Hex => write!(f, "{name}={value:#06X}")?,
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct Decoder {
    synced: bool,
    sync_run: u8,
    frame: Vec<u8>,
    round: Round,
}

impl Decoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    fn lose_sync(&mut self) {
        self.synced = false;
        self.sync_run = 0;
        self.frame.clear();
        self.round = Round::default();
    }

    /// Feed one received byte.
    /// Returns the round that was completed by this byte, if any.
    pub fn feed(&mut self, byte: u8) -> Option<Round> {
        if !self.synced {
            if byte == SYNC {
                self.sync_run += 1;
                if self.sync_run >= 3 {
                    self.synced = true;
                    self.frame.clear();
                }
            } else {
                self.sync_run = 0;
            }
            return None;
        }

        self.frame.push(byte);
        if self.frame.len() < 3 {
            return None;
        }
        let frame = [self.frame[0], self.frame[1], self.frame[2]];
        self.frame.clear();

        let id = frame[0] as usize;
        if frame == [SYNC; 3] {
            Some(std::mem::take(&mut self.round))
        } else if id < NRVALUES {
            self.round.values[id] = Some(u16::from_le_bytes([frame[1], frame[2]]));
            None
        } else {
            self.lose_sync();
            None
        }
    }

    /// Feed a chunk of received bytes.
    pub fn feed_all(&mut self, data: &[u8]) -> Vec<Round> {
        data.iter().filter_map(|b| self.feed(*b)).collect()
    }
}


// vim: ts=4 sw=4 expandtab
