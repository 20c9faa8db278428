//! Defines the endpoint for listing an employee's transactions.

use std::cmp::Reverse;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use rusqlite::{Connection, params};

use crate::{
    Error,
    db::{collect_decoded, lock_connection},
    employee::{EmployeeId, ListParams},
    timezone::local_offset_or_error,
    transaction::{
        TRANSACTION_COLUMNS, Transaction, TransactionState, TransactionView,
        map_row_to_transaction,
    },
};

/// A route handler for listing the transactions of the employee in the path, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Path(employee_id): Path<EmployeeId>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<TransactionView>>, Error> {
    let Query(params) = params?;
    let offset = local_offset_or_error(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let transactions = list_transactions(&employee_id, params.limit_or_default(), &connection)?;

    Ok(Json(
        transactions
            .into_iter()
            .map(|transaction| TransactionView::new(transaction, offset))
            .collect(),
    ))
}

/// Get up to `limit` transactions of `employee_id`, newest first.
///
/// Transactions are ordered by their transaction time, falling back to their
/// creation time. Transactions with neither come last. Rows that cannot be
/// decoded into a [Transaction] are logged and skipped.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn list_transactions(
    employee_id: &str,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut statement = connection.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM employee_transaction
        WHERE employee_id = ?1
        ORDER BY COALESCE(transaction_time, created_at) DESC
        LIMIT ?2"
    ))?;
    let rows = statement.query_map(params![employee_id, limit], map_row_to_transaction)?;

    let mut transactions = collect_decoded(rows, "transaction")?;
    // Stored times may use different offsets, so sort on the parsed values.
    transactions.sort_by_key(|transaction| Reverse(transaction.effective_time()));

    Ok(transactions)
}
