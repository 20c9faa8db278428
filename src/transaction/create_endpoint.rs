//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use rusqlite::{Connection, params};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{lock_connection, to_stored_timestamp},
    employee::{EmployeeId, employee_exists},
    transaction::{
        Transaction, TransactionRequest, TransactionSaved, TransactionState,
        core::validate_amount,
    },
    validation::{is_blank, is_valid_box_number},
};

/// A route handler for creating a transaction for the employee in the path.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(employee_id): Path<EmployeeId>,
    request: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Json<TransactionSaved>, Error> {
    let Json(request) = request?;
    let connection = lock_connection(&state.db_connection)?;

    let transaction =
        create_transaction(&employee_id, request, OffsetDateTime::now_utc(), &connection)?;
    tracing::info!(
        "created transaction {} for employee {employee_id}",
        transaction.document_id
    );

    Ok(Json(TransactionSaved {
        ok: true,
        message: "تم إضافة المعاملة بنجاح".to_owned(),
    }))
}

/// Validate `request` and insert it as a transaction of `employee_id`.
///
/// The transaction time defaults to `now`, the creation time is always `now`.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingEmployeeId] if `employee_id` is blank,
/// - [Error::MissingTransactionFields] if the amount is missing or zero, or the type is blank,
/// - [Error::InvalidAmount] if the amount is not a non-negative decimal number,
/// - [Error::InvalidBoxNumber] if a non-blank box number is not digits only,
/// - [Error::EmployeeNotFound] if there is no employee with `employee_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    employee_id: &str,
    request: TransactionRequest,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if is_blank(employee_id) {
        return Err(Error::MissingEmployeeId);
    }

    let transaction_type = request.transaction_type.unwrap_or_default();
    let Some(amount) = request.amount.filter(|amount| !amount.is_empty()) else {
        return Err(Error::MissingTransactionFields);
    };

    if is_blank(&transaction_type) {
        return Err(Error::MissingTransactionFields);
    }

    let amount = validate_amount(&amount)?;

    if amount == 0.0 {
        return Err(Error::MissingTransactionFields);
    }

    if !is_valid_box_number(request.box_number.as_deref()) {
        return Err(Error::InvalidBoxNumber);
    }

    if !employee_exists(employee_id, connection)? {
        return Err(Error::EmployeeNotFound);
    }

    let transaction_time = to_stored_timestamp(request.transaction_time.unwrap_or(now));

    let mut transaction = Transaction {
        document_id: String::new(),
        employee_id: employee_id.to_owned(),
        amount,
        transaction_type,
        transaction_time: Some(transaction_time),
        box_number: request.box_number,
        description: request.description,
        created_at: Some(to_stored_timestamp(now)),
    };

    transaction.document_id = connection
        .prepare(
            "INSERT INTO employee_transaction (employee_id, amount, transaction_type, \
                transaction_time, box_number, description, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id",
        )?
        .query_row(
            params![
                transaction.employee_id,
                transaction.amount,
                transaction.transaction_type,
                transaction.transaction_time,
                transaction.box_number,
                transaction.description,
                transaction.created_at,
            ],
            |row| row.get(0),
        )?;

    Ok(transaction)
}
