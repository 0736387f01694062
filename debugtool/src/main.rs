// -*- coding: utf-8 -*-

#![forbid(unsafe_code)]

mod decode;
mod serial;

use crate::serial::run_serial;
use anyhow as ah;
use clap::Parser;
use std::{thread, time::Duration};

/// Print the phase controller debug value stream.
#[derive(Parser, Debug)]
struct Opts {
    /// Serial port device.
    #[arg(default_value = "/dev/ttyUSB0")]
    port: String,
}

fn main() -> ah::Result<()> {
    let opts = Opts::parse();

    loop {
        if let Err(e) = run_serial(&opts.port) {
            eprintln!("Serial error: {e:?}");
        }
        thread::sleep(Duration::from_millis(5000));
    }
}

// vim: ts=4 sw=4 expandtab
