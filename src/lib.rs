//! # Batch Parser
//!
//! A streaming parser for batch transaction files: a fixed three-line header
//! followed by repeating transaction groups. Each group moves an amount
//! between two accounts, and the parser reports the net balance of every
//! account it touched.
//!
//! ## Design Principles
//!
//! - **Single pass**: Lines are consumed in order with no lookahead
//! - **All or nothing**: The first malformed line aborts the whole parse
//! - **Explicit states**: A named state machine decides what each line must be
//! - **Deterministic output**: Accounts listed in first-seen order
//!
//! ## Example
//!
//! ```no_run
//! use batch_parser::BatchParser;
//! use std::io::{self, BufReader};
//! use std::fs::File;
//!
//! let file = File::open("batch.txt").unwrap();
//! let result = BatchParser::parse_reader(BufReader::new(file)).unwrap();
//! result.write_json(io::stdout()).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod parser;
pub mod report;
pub mod transaction;

pub use config::{Config, Input};
pub use error::{BatchError, DigitField, Expectation, Result, ValidationReason};
pub use ledger::Ledger;
pub use parser::{BatchParser, ParserState};
pub use report::{AccountSummary, OutputFormat, ParseResult};
pub use transaction::{PartyReference, TransactionKind, TransactionRecord};
