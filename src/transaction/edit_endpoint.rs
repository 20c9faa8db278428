//! Defines the endpoint for updating a transaction.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use rusqlite::{Connection, params};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{lock_connection, to_stored_timestamp},
    employee::EmployeeId,
    transaction::{
        TransactionId, TransactionRequest, TransactionSaved, TransactionState,
        core::validate_amount,
    },
    validation::is_valid_box_number,
};

/// A route handler for updating the transaction with the document ID in the path.
///
/// The employee ID in the path is only used for logging, the transaction keeps its owner.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Path((employee_id, document_id)): Path<(EmployeeId, TransactionId)>,
    request: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Json<TransactionSaved>, Error> {
    let Json(request) = request?;
    let connection = lock_connection(&state.db_connection)?;

    update_transaction(&document_id, request, OffsetDateTime::now_utc(), &connection)?;
    tracing::info!("updated transaction {document_id} via employee {employee_id}");

    Ok(Json(TransactionSaved {
        ok: true,
        message: "تم تحديث المعاملة بنجاح".to_owned(),
    }))
}

/// Overwrite the amount, type, box number, description and transaction time
/// of the transaction with `document_id`.
///
/// The transaction time defaults to `now`. The owner and creation time never change.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingTransactionFields] if the amount is missing,
/// - [Error::InvalidAmount] if the amount is not a non-negative decimal number,
/// - [Error::InvalidBoxNumber] if a non-blank box number is not digits only,
/// - [Error::TransactionNotFound] if there is no transaction with `document_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    document_id: &str,
    request: TransactionRequest,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(amount) = request.amount.filter(|amount| !amount.is_empty()) else {
        return Err(Error::MissingTransactionFields);
    };
    let amount = validate_amount(&amount)?;

    if !is_valid_box_number(request.box_number.as_deref()) {
        return Err(Error::InvalidBoxNumber);
    }

    let rows_affected = connection.execute(
        "UPDATE employee_transaction
        SET \
            amount = ?1, \
            transaction_type = ?2, \
            box_number = ?3, \
            description = ?4, \
            transaction_time = ?5 \
        WHERE id = ?6",
        params![
            amount,
            request.transaction_type.unwrap_or_default(),
            request.box_number,
            request.description,
            to_stored_timestamp(request.transaction_time.unwrap_or(now)),
            document_id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound);
    }

    Ok(())
}
