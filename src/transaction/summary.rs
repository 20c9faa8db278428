//! Totals of an employee's deposits and withdrawals.

use crate::transaction::Transaction;

const DEPOSIT_LABELS: [&str; 2] = ["إيداع", "deposit"];
const WITHDRAWAL_LABELS: [&str; 2] = ["سحب", "withdrawal"];

/// The deposit and withdrawal totals of a set of transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TransactionSummary {
    pub total_deposits: f64,
    pub total_withdrawals: f64,
}

impl TransactionSummary {
    /// Sum the amounts of `transactions` by their type.
    ///
    /// Types other than deposits and withdrawals count towards neither total.
    pub fn new<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(Self::default(), |mut summary, transaction| {
                let label = transaction.transaction_type.trim().to_lowercase();

                if DEPOSIT_LABELS.contains(&label.as_str()) {
                    summary.total_deposits += transaction.amount;
                } else if WITHDRAWAL_LABELS.contains(&label.as_str()) {
                    summary.total_withdrawals += transaction.amount;
                }

                summary
            })
    }

    /// Deposits minus withdrawals.
    pub fn balance(&self) -> f64 {
        self.total_deposits - self.total_withdrawals
    }
}
