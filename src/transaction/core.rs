//! Defines the core data models and database queries for transactions.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    AppState, Error,
    db::get_timestamp,
    employee::EmployeeId,
    timezone::format_date_time,
    validation::{RawNumber, parse_amount},
};

/// The opaque identifier the database assigns to a transaction.
pub type TransactionId = String;

/// A deposit, withdrawal or other movement of money for an employee.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction, generated when the transaction is inserted.
    pub document_id: TransactionId,
    /// The employee the transaction belongs to.
    pub employee_id: EmployeeId,
    pub amount: f64,
    /// A free-form label such as "إيداع" (deposit) or "سحب" (withdrawal).
    pub transaction_type: String,
    /// When the money moved, as opposed to when the transaction was recorded.
    pub transaction_time: Option<OffsetDateTime>,
    /// The cash box the money was put in or taken from.
    pub box_number: Option<String>,
    pub description: Option<String>,
    /// When the transaction was recorded.
    pub created_at: Option<OffsetDateTime>,
}

impl Transaction {
    /// The time used to order transactions.
    ///
    /// Falls back to the creation time, then to the Unix epoch so that
    /// transactions without any time sort last.
    pub fn effective_time(&self) -> OffsetDateTime {
        self.transaction_time
            .or(self.created_at)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

/// The JSON body for creating or updating a transaction.
///
/// Any employee ID in the body is ignored, the path decides the owner.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Kept in its raw form so that it can be validated before conversion.
    pub amount: Option<RawNumber>,
    pub transaction_type: Option<String>,
    /// Defaults to the current time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub transaction_time: Option<OffsetDateTime>,
    pub box_number: Option<String>,
    pub description: Option<String>,
}

/// Convert a raw amount, which must be a non-negative decimal number.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the amount does not match the decimal pattern.
pub fn validate_amount(amount: &RawNumber) -> Result<f64, Error> {
    parse_amount(amount).ok_or(Error::InvalidAmount)
}

/// The response body after a transaction is created or updated.
#[derive(Debug, PartialEq, Serialize)]
pub struct TransactionSaved {
    pub ok: bool,
    pub message: String,
}

/// A transaction as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub document_id: TransactionId,
    pub employee_id: EmployeeId,
    pub amount: f64,
    pub transaction_type: String,
    /// The transaction time, or the creation time if there is none, formatted
    /// as `yyyy/MM/dd HH:mm`.
    pub transaction_time: Option<String>,
    pub box_number: Option<String>,
    pub description: Option<String>,
}

impl TransactionView {
    pub fn new(transaction: Transaction, offset: UtcOffset) -> Self {
        Self {
            transaction_time: transaction
                .transaction_time
                .or(transaction.created_at)
                .map(|time| format_date_time(time, offset)),
            document_id: transaction.document_id,
            employee_id: transaction.employee_id,
            amount: transaction.amount,
            transaction_type: transaction.transaction_type,
            box_number: transaction.box_number,
            description: transaction.description,
        }
    }
}

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The canonical timezone name used to render dates.
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The columns selected for a [Transaction], in the order [map_row_to_transaction] expects.
pub const TRANSACTION_COLUMNS: &str = "id, employee_id, amount, transaction_type, \
    transaction_time, box_number, description, created_at";

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS employee_transaction (
            id TEXT PRIMARY KEY NOT NULL DEFAULT (lower(hex(randomblob(10)))),
            employee_id TEXT NOT NULL,
            amount REAL NOT NULL,
            transaction_type TEXT NOT NULL DEFAULT '',
            transaction_time TEXT,
            box_number TEXT,
            description TEXT,
            created_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_employee_id
            ON employee_transaction(employee_id);",
    )?;

    Ok(())
}

pub fn map_row_to_transaction(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        document_id: row.get(0)?,
        employee_id: row.get(1)?,
        amount: row.get(2)?,
        transaction_type: row.get(3)?,
        transaction_time: get_timestamp(row, 4)?,
        box_number: row.get(5)?,
        description: row.get(6)?,
        created_at: get_timestamp(row, 7)?,
    })
}

/// Get the transaction with `document_id`, regardless of which employee owns it.
///
/// # Errors
/// Returns [Error::TransactionNotFound] if there is no such transaction, or
/// [Error::SqlError] if the query fails or the stored row is malformed.
pub fn find_transaction(document_id: &str, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM employee_transaction WHERE id = ?1"
        ))?
        .query_row([document_id], map_row_to_transaction)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
            error => error.into(),
        })
}
