use std::env;
use std::process;

use eyre::{Context, Result};

use gait::{dispatch, logging, registry};

fn main() -> Result<()> {
    logging::init("gait");

    let args: Vec<String> = env::args().skip(1).collect();

    let code = match args.split_first() {
        None => {
            print!("{}", registry::render_help());
            0
        }
        Some((name, _)) if name == "help" => {
            print!("{}", registry::render_help());
            0
        }
        Some((name, rest)) => dispatch::run(name, rest).context("Failed to dispatch tool")?,
    };

    process::exit(code)
}
