//! Transactions of employees.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, its table and the shared queries
//! - The endpoints for creating, updating, listing and getting transactions
//! - The deposit and withdrawal totals shown on the employee page

mod core;
mod create_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod list_endpoint;
mod summary;

pub use core::{
    TRANSACTION_COLUMNS, Transaction, TransactionId, TransactionRequest, TransactionSaved,
    TransactionState, TransactionView, create_transaction_table, find_transaction,
    map_row_to_transaction,
};
pub use create_endpoint::{create_transaction, create_transaction_endpoint};
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::{list_transactions, list_transactions_endpoint};
pub use summary::TransactionSummary;
