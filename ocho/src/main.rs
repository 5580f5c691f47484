use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::error;

mod config;
mod keymap;
mod run;

/// A CHIP-8 interpreter.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Program image to run
    pub program: PathBuf,

    /// Pixel scale factor for the window
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub scale: Option<u32>,

    /// Instruction frequency in Hz
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub freq: Option<u32>,
}

fn main() {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // clap renders its own usage/help text; --help and --version
            // are clean exits
            let _ = e.print();
            process::exit(if e.use_stderr() { -1 } else { 0 });
        }
    };

    if let Err(e) = run::run(&args) {
        error!("{:#}", e);
        process::exit(-1);
    }
}
