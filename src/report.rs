//! Parse results and the writers that serialize them.

use crate::error::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

/// Net movement for one account over the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub routing_number: u64,
    pub account_number: u64,

    /// Signed sum of every amount received minus every amount paid.
    pub net_transactions: i128,
}

/// The outcome of a successful parse.
///
/// `accounts` lists every touched account once, in the order it first
/// appeared as an originator or recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub batch: u64,
    pub description: String,
    pub accounts: Vec<AccountSummary>,
}

impl ParseResult {
    /// Writes the result as pretty-printed JSON followed by a newline.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the account table as CSV.
    ///
    /// Rows follow the order of `accounts`. Batch and description are not
    /// part of the table.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["routing_number", "account_number", "net_transactions"])?;

        for account in &self.accounts {
            csv_writer.write_record([
                account.routing_number.to_string(),
                account.account_number.to_string(),
                account.net_transactions.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes the result in the requested format.
    pub fn write<W: Write>(&self, format: OutputFormat, writer: W) -> Result<()> {
        match format {
            OutputFormat::Json => self.write_json(writer),
            OutputFormat::Csv => self.write_csv(writer),
        }
    }
}

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}
