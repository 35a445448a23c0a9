/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The `chip8vm` binary program: a headless runner for CHIP-8 programs.
//!
//! There is no window and no audio.  The program runs for a fixed number of
//! frames with a fixed set of keys held down, which is enough to check that a
//! ROM boots and to look at what it drew.

extern crate chip8vm;
extern crate clap;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;

use std::cell::Cell;
use std::fs::File;
use std::io::Write;
use std::process;
use std::rc::Rc;

use clap::{App, Arg, ArgMatches};
use failure::{Error, ResultExt};
use log::LevelFilter;

use chip8vm::Interpreter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Settings for a headless run.
struct Options {
    /// The number of cycles to run per frame (default 10).
    cycles: usize,
    /// The number of frames to run (default 60).
    frames: usize,
    /// The keys to hold down for the whole run.
    keys: Vec<usize>,
    /// Whether to print the display when done (default `false`).
    dump: bool,
}

impl Options {
    /// Returns the default set of options.
    fn new() -> Self {
        Options {
            cycles: 10,
            frames: 60,
            keys: Vec::new(),
            dump: false,
        }
    }
}

fn main() {
    let matches = App::new("chip8vm")
        .version(VERSION)
        .about("Runs a CHIP-8 program without a display")
        .help_message("show this help message and exit")
        .version_message("show version information and exit")
        .arg(
            Arg::with_name("cycles")
                .short("c")
                .long("cycles")
                .value_name("N")
                .help("set the number of cycles per frame")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("frames")
                .short("f")
                .long("frames")
                .value_name("N")
                .help("set the number of frames to run")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("key")
                .short("k")
                .long("key")
                .value_name("KEY")
                .help("hold down the given hex key (0-F)")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("dump")
                .short("d")
                .long("dump")
                .help("print the display when done"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("increase verbosity"),
        )
        .arg(
            Arg::with_name("FILE")
                .help("set the program file to run")
                .required(true)
                .index(1),
        )
        .get_matches();

    let verbosity = matches.occurrences_of("verbose");
    let filter = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter(None, filter)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(&matches) {
        error!("{}", e);
        for cause in e.iter_chain().skip(1) {
            info!("caused by: {}", cause);
        }
        trace!("backtrace: {}", e.backtrace());
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let mut opts = Options::new();
    process_opts(&mut opts, matches)?;

    let filename = matches.value_of("FILE").unwrap();
    let mut input =
        File::open(filename).with_context(|_| format!("could not open file '{}'", filename))?;
    let mut interpreter = Interpreter::new();
    interpreter
        .load_program_from(&mut input)
        .with_context(|_| format!("could not load program from file '{}'", filename))?;

    let draws = Rc::new(Cell::new(0usize));
    let beeps = Rc::new(Cell::new(0usize));
    {
        let draws = draws.clone();
        interpreter.set_draw_callback(move |_, _, _| draws.set(draws.get() + 1));
        let beeps = beeps.clone();
        interpreter.set_sound_callback(move || {
            debug!("buzzer stopped");
            beeps.set(beeps.get() + 1);
        });
    }
    for &key in &opts.keys {
        interpreter.set_key(key, true);
    }

    for frame in 0..opts.frames {
        // The necessary context for any error in 'run_frame' should be
        // provided from the method itself.
        interpreter.run_frame(opts.cycles)?;
        if interpreter.draw_flag() {
            debug!("frame {}: display changed", frame);
            interpreter.clear_draw_flag();
        }
    }

    info!(
        "ran {} frames of {} cycles: {} draws, {} buzzer stops, pc = {:#05X}",
        opts.frames,
        opts.cycles,
        draws.get(),
        beeps.get(),
        interpreter.pc()
    );

    if opts.dump {
        print!("{}", interpreter.display());
    }

    Ok(())
}

/// Processes the command-line arguments and changes the necessary fields of
/// the given options.
fn process_opts(opts: &mut Options, matches: &ArgMatches) -> Result<(), Error> {
    if let Some(cycles) = matches.value_of("cycles") {
        opts.cycles = cycles.parse::<usize>().context("invalid cycles argument")?;
    }
    if let Some(frames) = matches.value_of("frames") {
        opts.frames = frames.parse::<usize>().context("invalid frames argument")?;
    }
    if let Some(keys) = matches.values_of("key") {
        for key in keys {
            let index = usize::from_str_radix(key, 16)
                .with_context(|_| format!("invalid key '{}'", key))?;
            if index > 0xF {
                return Err(failure::err_msg(format!("key '{}' is out of range", key)));
            }
            opts.keys.push(index);
        }
    }
    opts.dump = matches.is_present("dump");

    Ok(())
}
