//! Line-driven state machine that validates a batch file and applies its
//! transactions to a [`Ledger`].
//!
//! Lines are consumed strictly in order with no lookahead. The first error
//! aborts the parse and no partial result is produced.

use crate::error::{BatchError, DigitField, Expectation, Result, ValidationReason};
use crate::ledger::Ledger;
use crate::report::ParseResult;
use crate::transaction::{PartyReference, TransactionKind, TransactionRecord};
use log::{debug, info, trace, warn};
use std::io::BufRead;

const FILES_MARKER: &str = "/* Files */";
const BATCH_PREFIX: &str = "Batch: ";
const DESCRIPTION_PREFIX: &str = "Description: ";
const SEPARATOR_PREFIX: &str = "==";
const COMMENT_PREFIX: &str = "Comment: ";
const TRANSACTION_PREFIX: &str = "Transaction: ";
const ORIGINATOR_PREFIX: &str = "Originator: ";
const RECIPIENT_PREFIX: &str = "Recipient: ";
const TYPE_PREFIX: &str = "Type: ";
const AMOUNT_PREFIX: &str = "Amount: ";
const PARTY_SEPARATOR: &str = " / ";

/// What the parser expects the next line to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    AwaitHeader0,
    AwaitHeader1,
    AwaitHeader2,
    AwaitSeparator,
    AwaitTransactionOrComment,
    AwaitOriginator,
    AwaitRecipient,
    AwaitType,
    AwaitAmount,
}

impl ParserState {
    /// Transition taken after a line is accepted in this state.
    ///
    /// Comment lines are the one exception: they leave the parser in
    /// `AwaitTransactionOrComment`.
    pub fn next(self) -> Self {
        match self {
            ParserState::AwaitHeader0 => ParserState::AwaitHeader1,
            ParserState::AwaitHeader1 => ParserState::AwaitHeader2,
            ParserState::AwaitHeader2 => ParserState::AwaitSeparator,
            ParserState::AwaitSeparator => ParserState::AwaitTransactionOrComment,
            ParserState::AwaitTransactionOrComment => ParserState::AwaitOriginator,
            ParserState::AwaitOriginator => ParserState::AwaitRecipient,
            ParserState::AwaitRecipient => ParserState::AwaitType,
            ParserState::AwaitType => ParserState::AwaitAmount,
            ParserState::AwaitAmount => ParserState::AwaitSeparator,
        }
    }

    /// The structural expectation a line must meet in this state.
    pub fn expectation(self) -> Expectation {
        match self {
            ParserState::AwaitHeader0 => Expectation::FilesMarker,
            ParserState::AwaitHeader1 => Expectation::BatchLine,
            ParserState::AwaitHeader2 => Expectation::DescriptionLine,
            ParserState::AwaitSeparator => Expectation::Separator,
            ParserState::AwaitTransactionOrComment => Expectation::TransactionLine,
            ParserState::AwaitOriginator => Expectation::OriginatorLine,
            ParserState::AwaitRecipient => Expectation::RecipientLine,
            ParserState::AwaitType => Expectation::TypeLine,
            ParserState::AwaitAmount => Expectation::AmountLine,
        }
    }

    fn in_header(self) -> bool {
        matches!(
            self,
            ParserState::AwaitHeader0 | ParserState::AwaitHeader1 | ParserState::AwaitHeader2
        )
    }

    fn mid_transaction(self) -> bool {
        matches!(
            self,
            ParserState::AwaitOriginator
                | ParserState::AwaitRecipient
                | ParserState::AwaitType
                | ParserState::AwaitAmount
        )
    }
}

/// Parses one batch file.
///
/// Feed lines with [`BatchParser::feed_line`] and call
/// [`BatchParser::finish`] once the input is exhausted, or use one of the
/// pull drivers ([`BatchParser::parse_lines`], [`BatchParser::parse_reader`]).
///
/// # Example
///
/// ```
/// use batch_parser::BatchParser;
///
/// let input = "/* Files */\nBatch: 7\nDescription: Rent\n==\nTransaction: 1\n\
///              Originator: 10 / 1\nRecipient: 20 / 2\nType: Credit\nAmount: 500\n";
/// let result = BatchParser::parse_reader(input.as_bytes()).unwrap();
/// assert_eq!(result.batch, 7);
/// assert_eq!(result.accounts[0].net_transactions, -500);
/// assert_eq!(result.accounts[1].net_transactions, 500);
/// ```
#[derive(Debug)]
pub struct BatchParser {
    state: ParserState,

    /// 0-based index of the next line.
    line: usize,

    batch: u64,
    description: String,

    /// Transaction currently being read. Reset at every separator.
    pending: TransactionRecord,

    ledger: Ledger,

    /// Number of transactions applied so far.
    applied: usize,

    /// First error raised; once set the parser only repeats it.
    failure: Option<BatchError>,
}

impl BatchParser {
    /// Creates a parser waiting for the Files marker.
    pub fn new() -> Self {
        BatchParser {
            state: ParserState::AwaitHeader0,
            line: 0,
            batch: 0,
            description: String::new(),
            pending: TransactionRecord::default(),
            ledger: Ledger::new(),
            applied: 0,
            failure: None,
        }
    }

    /// Parses every line from `lines` and returns the result.
    pub fn parse_lines<I, S>(lines: I) -> Result<ParseResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parser = BatchParser::new();
        for line in lines {
            parser.feed_line(line.as_ref())?;
        }
        parser.finish()
    }

    /// Reads `reader` line by line and returns the result.
    ///
    /// Both `\n` and `\r\n` line endings are accepted.
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<ParseResult> {
        let mut parser = BatchParser::new();
        for line in reader.lines() {
            parser.feed_line(&line?)?;
        }
        parser.finish()
    }

    /// The state the parser is currently in.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    /// Consumes the next input line.
    ///
    /// After an error every further call, and [`BatchParser::finish`],
    /// returns that same error.
    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        if let Some(err) = self.failure.as_ref().and_then(BatchError::replay) {
            return Err(err);
        }

        let index = self.line;
        self.line += 1;
        match self.step(self.state, index, line) {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err(err) => {
                self.failure = err.replay();
                Err(err)
            }
        }
    }

    /// Returns `true` once a line has been rejected.
    pub fn has_failed(&self) -> bool {
        self.failure.is_some()
    }

    fn step(&mut self, state: ParserState, index: usize, line: &str) -> Result<ParserState> {
        trace!("Line {} in state {:?}: {:?}", index, state, line);

        match state {
            ParserState::AwaitHeader0 => {
                if line != FILES_MARKER {
                    return Err(format_error(index, state));
                }
            }
            ParserState::AwaitHeader1 => {
                let value = strip_field(line, BATCH_PREFIX, index, state)?;
                self.batch = parse_digits(value, DigitField::Batch, index)?;
            }
            ParserState::AwaitHeader2 => {
                let value = strip_field(line, DESCRIPTION_PREFIX, index, state)?;
                self.description = value.to_string();
                debug!("Batch {}: {}", self.batch, self.description);
            }
            ParserState::AwaitSeparator => {
                if !line.starts_with(SEPARATOR_PREFIX) {
                    return Err(format_error(index, state));
                }
                self.pending = TransactionRecord::default();
            }
            ParserState::AwaitTransactionOrComment => {
                if line.starts_with(COMMENT_PREFIX) {
                    return Ok(state);
                }
                let value = strip_field(line, TRANSACTION_PREFIX, index, state)?;
                self.pending.number = parse_digits(value, DigitField::TransactionNumber, index)?;
            }
            ParserState::AwaitOriginator => {
                let value = strip_field(line, ORIGINATOR_PREFIX, index, state)?;
                let party = parse_party(value, index)?;
                self.ledger.touch(party);
                self.pending.originator = party;
            }
            ParserState::AwaitRecipient => {
                let value = strip_field(line, RECIPIENT_PREFIX, index, state)?;
                let party = parse_party(value, index)?;
                self.ledger.touch(party);
                self.pending.recipient = party;
            }
            ParserState::AwaitType => {
                let value = strip_field(line, TYPE_PREFIX, index, state)?;
                self.pending.kind = TransactionKind::from_label(value);
            }
            ParserState::AwaitAmount => {
                let value = strip_field(line, AMOUNT_PREFIX, index, state)?;
                self.pending.amount = parse_digits(value, DigitField::Amount, index)?;
                self.ledger.apply(&self.pending);
                self.applied += 1;
            }
        }

        Ok(state.next())
    }

    /// Signals end of input and projects the ledger into a [`ParseResult`].
    ///
    /// Fails if an earlier line was rejected or the header was never
    /// completed. Input that stops part-way
    /// through a transaction group is accepted; the unfinished transaction
    /// is not applied.
    pub fn finish(self) -> Result<ParseResult> {
        if let Some(err) = self.failure {
            return Err(err);
        }

        if self.state.in_header() {
            return Err(format_error(self.line, self.state));
        }

        if self.state.mid_transaction() {
            warn!(
                "Input ended at line {} while waiting for {:?}; last transaction was not applied",
                self.line, self.state
            );
        }

        info!(
            "Parsed batch {}: {} lines, {} transactions, {} accounts",
            self.batch,
            self.line,
            self.applied,
            self.ledger.len()
        );

        Ok(ParseResult {
            batch: self.batch,
            description: self.description,
            accounts: self.ledger.into_accounts(),
        })
    }

    /// Returns a reference to the ledger (for testing).
    #[cfg(test)]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

impl Default for BatchParser {
    fn default() -> Self {
        Self::new()
    }
}

fn format_error(line: usize, state: ParserState) -> BatchError {
    BatchError::Format {
        line,
        expected: state.expectation(),
    }
}

/// Strips `prefix` from `line`, or fails with the state's format error.
fn strip_field<'a>(
    line: &'a str,
    prefix: &str,
    index: usize,
    state: ParserState,
) -> Result<&'a str> {
    line.strip_prefix(prefix)
        .ok_or_else(|| format_error(index, state))
}

/// Parses a non-empty run of ASCII digits.
///
/// Signs, whitespace, decimal points and separators are rejected.
pub fn parse_digits(value: &str, field: DigitField, line: usize) -> Result<u64> {
    let validation_error = |reason| BatchError::Validation {
        line,
        field,
        reason,
    };

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(validation_error(ValidationReason::NotDigits));
    }

    value
        .parse::<u64>()
        .map_err(|_| validation_error(ValidationReason::OutOfRange))
}

/// Parses `<routing> / <account>`.
///
/// A value with no separator is read as a routing number followed by an
/// empty account number, which fails digit validation.
fn parse_party(value: &str, line: usize) -> Result<PartyReference> {
    let (routing, account) = value.split_once(PARTY_SEPARATOR).unwrap_or((value, ""));
    let routing_number = parse_digits(routing, DigitField::RoutingNumber, line)?;
    let account_number = parse_digits(account, DigitField::AccountNumber, line)?;
    Ok(PartyReference::new(routing_number, account_number))
}
