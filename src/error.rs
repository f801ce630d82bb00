//! Error types for the batch parser.

use std::fmt;
use thiserror::Error;

/// Result type alias for parser operations
pub type Result<T> = std::result::Result<T, BatchError>;

/// Errors that can occur while parsing a batch or running the CLI.
#[derive(Error, Debug)]
pub enum BatchError {
    /// A line does not have the structure expected at its position.
    #[error("Line {line}: {expected}")]
    Format { line: usize, expected: Expectation },

    /// A line has the right prefix but its value fails validation.
    #[error("Line {line}: {reason} ({field})")]
    Validation {
        line: usize,
        field: DigitField,
        reason: ValidationReason,
    },

    /// Failed to open or read the input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl BatchError {
    /// Returns the 0-based input line an error is attributed to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            BatchError::Format { line, .. } | BatchError::Validation { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Copies a line-level parse error. Collaborator errors are not copied.
    pub(crate) fn replay(&self) -> Option<BatchError> {
        match *self {
            BatchError::Format { line, expected } => Some(BatchError::Format { line, expected }),
            BatchError::Validation {
                line,
                field,
                reason,
            } => Some(BatchError::Validation {
                line,
                field,
                reason,
            }),
            _ => None,
        }
    }
}

/// The structural expectation a line failed to meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    FilesMarker,
    BatchLine,
    DescriptionLine,
    Separator,
    TransactionLine,
    OriginatorLine,
    RecipientLine,
    TypeLine,
    AmountLine,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Expectation::FilesMarker => "Expected input to be marked as Files, but it was not.",
            Expectation::BatchLine => {
                "Expected second line to specify a valid batch, but it did not."
            }
            Expectation::DescriptionLine => {
                "Expected input to be marked as valid description, but it was not."
            }
            Expectation::Separator => "Expected input to be marked as line break, but it was not.",
            Expectation::TransactionLine => {
                "Expected input to be marked as valid transaction, but it was not."
            }
            Expectation::OriginatorLine => {
                "Expected originator to be marked with something valid, but it was not."
            }
            Expectation::RecipientLine => {
                "Expected recipient to be marked with something valid, but it was not."
            }
            Expectation::TypeLine => {
                "Expected type to be marked with something valid, but it was not."
            }
            Expectation::AmountLine => "Expected amount to be something valid, but it was not.",
        };
        f.write_str(message)
    }
}

/// Fields whose value must be a run of ASCII digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitField {
    Batch,
    TransactionNumber,
    RoutingNumber,
    AccountNumber,
    Amount,
}

impl fmt::Display for DigitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DigitField::Batch => "batch",
            DigitField::TransactionNumber => "transaction number",
            DigitField::RoutingNumber => "routing number",
            DigitField::AccountNumber => "account number",
            DigitField::Amount => "amount",
        };
        f.write_str(name)
    }
}

/// Why a digit field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    NotDigits,
    OutOfRange,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::NotDigits => {
                f.write_str("Expected input to be a sequence of digits, but it was not.")
            }
            ValidationReason::OutOfRange => {
                f.write_str("Expected input to fit in an unsigned 64-bit integer, but it did not.")
            }
        }
    }
}
