//! Batch Parser CLI
//!
//! Reads a batch transaction file and prints the net balance of every
//! account it touches.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- batch.txt > accounts.json
//! cargo run -- --format csv < batch.txt
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use batch_parser::{BatchParser, Config, Input, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    let config = Config::parse();

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    let result = match config.source() {
        Input::File(path) => BatchParser::parse_reader(BufReader::new(File::open(path)?))?,
        Input::Stdin => BatchParser::parse_reader(io::stdin().lock())?,
    };

    let stdout = io::stdout();
    let handle = stdout.lock();
    result.write(config.format, handle)?;

    Ok(())
}
