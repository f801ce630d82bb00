//! Transaction models built from a batch file's transaction groups.

use log::warn;
use std::fmt;

/// Identifies a ledger account by routing and account number.
///
/// Two references are equal iff both numbers match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PartyReference {
    pub routing_number: u64,
    pub account_number: u64,
}

impl PartyReference {
    pub fn new(routing_number: u64, account_number: u64) -> Self {
        PartyReference {
            routing_number,
            account_number,
        }
    }
}

impl fmt::Display for PartyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.routing_number, self.account_number)
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionKind {
    /// Originator pays recipient.
    #[default]
    Credit,

    /// Recipient pays originator.
    Debit,
}

impl TransactionKind {
    /// Maps a `Type:` label to a kind.
    ///
    /// Only the exact label `Debit` selects [`TransactionKind::Debit`]. Every
    /// other label, including unrecognised ones, is treated as a credit.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Debit" => TransactionKind::Debit,
            "Credit" => TransactionKind::Credit,
            other => {
                warn!("Unrecognised transaction type '{}', treating as Credit", other);
                TransactionKind::Credit
            }
        }
    }
}

/// A fully read transaction, ready to be applied to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionRecord {
    /// Transaction number from the `Transaction:` line
    pub number: u64,

    pub originator: PartyReference,

    pub recipient: PartyReference,

    pub kind: TransactionKind,

    pub amount: u64,
}

impl TransactionRecord {
    /// Returns `(payer, payee)` for this transaction.
    ///
    /// A debit swaps the roles: the recipient pays and the originator
    /// receives.
    pub fn parties(&self) -> (PartyReference, PartyReference) {
        match self.kind {
            TransactionKind::Credit => (self.originator, self.recipient),
            TransactionKind::Debit => (self.recipient, self.originator),
        }
    }
}
