//! Running balances for every account touched by a batch.
//!
//! Accounts are keyed by [`PartyReference`] and seeded with a zero balance
//! the first time they appear. Every appearance is also logged in order so
//! the final report can list accounts in first-seen order.

use crate::report::AccountSummary;
use crate::transaction::{PartyReference, TransactionRecord};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Per-account balances plus the ordered log of touched references.
///
/// # Invariants
///
/// - Every reference in `touched` has an entry in `balances` and vice versa
/// - The sum of all balances is zero
#[derive(Debug, Default)]
pub struct Ledger {
    balances: HashMap<PartyReference, i128>,
    touched: Vec<PartyReference>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an appearance of `party`, seeding a zero balance if it is new.
    pub fn touch(&mut self, party: PartyReference) {
        self.touched.push(party);
        self.balances.entry(party).or_insert_with(|| {
            debug!("Seeded account {}", party);
            0
        });
    }

    /// Moves `record.amount` from the payer to the payee.
    ///
    /// Either party not touched yet is touched first, so it is listed in the
    /// projection. Balances are unbounded and may go negative.
    pub fn apply(&mut self, record: &TransactionRecord) {
        let (payer, payee) = record.parties();
        let amount = i128::from(record.amount);

        for party in [payer, payee] {
            if !self.balances.contains_key(&party) {
                self.touch(party);
            }
        }

        // Safety: both parties were touched above
        *self.balances.get_mut(&payer).expect("payer touched") -= amount;
        *self.balances.get_mut(&payee).expect("payee touched") += amount;

        debug!(
            "Applied transaction {}: {} moved from {} to {}",
            record.number, record.amount, payer, payee
        );
    }

    /// Returns the balance of `party`, if it has been touched.
    pub fn balance(&self, party: &PartyReference) -> Option<i128> {
        self.balances.get(party).copied()
    }

    /// Number of distinct accounts in the ledger.
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Returns `true` if no account has been touched.
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Projects the ledger into account summaries in first-seen order.
    ///
    /// Later appearances of a reference are dropped; the order of the
    /// remaining entries is unaffected.
    pub fn into_accounts(self) -> Vec<AccountSummary> {
        let mut seen = HashSet::with_capacity(self.balances.len());
        let mut accounts = Vec::with_capacity(self.balances.len());

        for party in self.touched {
            if !seen.insert(party) {
                continue;
            }
            // Safety: `touch` is the only way an account enters `balances`
            let net_transactions = self.balances[&party];
            accounts.push(AccountSummary {
                routing_number: party.routing_number,
                account_number: party.account_number,
                net_transactions,
            });
        }

        accounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionKind;

    fn transfer(
        originator: PartyReference,
        recipient: PartyReference,
        kind: TransactionKind,
        amount: u64,
    ) -> TransactionRecord {
        TransactionRecord {
            number: 1,
            originator,
            recipient,
            kind,
            amount,
        }
    }

    #[test]
    fn test_touch_seeds_zero_balance_once() {
        let mut ledger = Ledger::new();
        let a = PartyReference::new(1, 10);

        assert!(ledger.is_empty());
        ledger.touch(a);
        ledger.touch(a);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.balance(&a), Some(0));
    }

    #[test]
    fn test_credit_moves_from_originator_to_recipient() {
        let mut ledger = Ledger::new();
        let a = PartyReference::new(1, 10);
        let b = PartyReference::new(2, 20);
        ledger.touch(a);
        ledger.touch(b);

        ledger.apply(&transfer(a, b, TransactionKind::Credit, 500));

        assert_eq!(ledger.balance(&a), Some(-500));
        assert_eq!(ledger.balance(&b), Some(500));
    }

    #[test]
    fn test_debit_moves_from_recipient_to_originator() {
        let mut ledger = Ledger::new();
        let a = PartyReference::new(1, 10);
        let b = PartyReference::new(2, 20);
        ledger.touch(a);
        ledger.touch(b);

        ledger.apply(&transfer(a, b, TransactionKind::Debit, 999));

        assert_eq!(ledger.balance(&a), Some(999));
        assert_eq!(ledger.balance(&b), Some(-999));
    }

    #[test]
    fn test_self_transfer_nets_to_zero() {
        let mut ledger = Ledger::new();
        let a = PartyReference::new(1, 10);
        ledger.touch(a);
        ledger.touch(a);

        ledger.apply(&transfer(a, a, TransactionKind::Credit, 42));

        assert_eq!(ledger.balance(&a), Some(0));
    }

    #[test]
    fn test_apply_registers_untouched_parties() {
        let mut ledger = Ledger::new();
        let a = PartyReference::new(1, 1);
        let b = PartyReference::new(2, 2);
        ledger.touch(a);

        ledger.apply(&transfer(a, b, TransactionKind::Credit, 50));

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.balance(&b), Some(50));

        let accounts = ledger.into_accounts();
        let listed: Vec<_> = accounts
            .iter()
            .map(|acc| (acc.routing_number, acc.account_number, acc.net_transactions))
            .collect();
        assert_eq!(listed, vec![(1, 1, -50), (2, 2, 50)]);

        let total: i128 = accounts.iter().map(|acc| acc.net_transactions).sum();
        assert_eq!(total, 0);
    }

    #[test]
    fn test_apply_on_empty_ledger_lists_payer_first() {
        let mut ledger = Ledger::new();
        let a = PartyReference::new(1, 1);
        let b = PartyReference::new(2, 2);

        ledger.apply(&transfer(a, b, TransactionKind::Debit, 10));

        let accounts = ledger.into_accounts();
        assert_eq!(accounts.len(), 2);
        assert_eq!((accounts[0].routing_number, accounts[0].net_transactions), (2, -10));
        assert_eq!((accounts[1].routing_number, accounts[1].net_transactions), (1, 10));
    }

    #[test]
    fn test_into_accounts_keeps_first_seen_order() {
        let mut ledger = Ledger::new();
        let a = PartyReference::new(9, 1);
        let b = PartyReference::new(1, 9);
        let c = PartyReference::new(5, 5);

        ledger.touch(a);
        ledger.touch(b);
        ledger.apply(&transfer(a, b, TransactionKind::Credit, 100));
        ledger.touch(a);
        ledger.touch(c);
        ledger.apply(&transfer(a, c, TransactionKind::Credit, 50));

        let accounts = ledger.into_accounts();
        let order: Vec<_> = accounts
            .iter()
            .map(|acc| (acc.routing_number, acc.account_number, acc.net_transactions))
            .collect();

        assert_eq!(order, vec![(9, 1, -150), (1, 9, 100), (5, 5, 50)]);
    }

    #[test]
    fn test_accounts_sum_to_zero() {
        let mut ledger = Ledger::new();
        let refs = [
            PartyReference::new(1, 1),
            PartyReference::new(2, 2),
            PartyReference::new(3, 3),
        ];
        for r in refs {
            ledger.touch(r);
        }
        ledger.apply(&transfer(refs[0], refs[1], TransactionKind::Credit, 70));
        ledger.apply(&transfer(refs[1], refs[2], TransactionKind::Debit, 30));
        ledger.apply(&transfer(refs[2], refs[0], TransactionKind::Credit, 5));

        let total: i128 = ledger
            .into_accounts()
            .iter()
            .map(|acc| acc.net_transactions)
            .sum();
        assert_eq!(total, 0);
    }
}
