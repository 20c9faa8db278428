//! Defines the endpoint for getting a single transaction.

use axum::{
    Json,
    extract::{Path, State},
};
use rusqlite::Connection;

use crate::{
    Error,
    db::lock_connection,
    employee::EmployeeId,
    timezone::local_offset_or_error,
    transaction::{Transaction, TransactionId, TransactionState, TransactionView, find_transaction},
};

/// A route handler for getting one of the employee's transactions.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Path((employee_id, document_id)): Path<(EmployeeId, TransactionId)>,
) -> Result<Json<TransactionView>, Error> {
    let offset = local_offset_or_error(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let transaction = get_transaction(&employee_id, &document_id, &connection)?;

    Ok(Json(TransactionView::new(transaction, offset)))
}

/// Get the transaction with `document_id` if it belongs to `employee_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if there is no transaction with `document_id`,
/// - [Error::TransactionOwnerMismatch] if the transaction belongs to another employee,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    employee_id: &str,
    document_id: &str,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = find_transaction(document_id, connection)?;

    if transaction.employee_id != employee_id {
        tracing::warn!(
            "transaction {document_id} was requested for employee {employee_id} \
            but belongs to employee {}",
            transaction.employee_id
        );
        return Err(Error::TransactionOwnerMismatch);
    }

    Ok(transaction)
}

#[cfg(test)]
mod get_transaction_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        employee::{EmployeeRequest, create_employee},
        test_utils::must_create_test_connection,
        transaction::{
            Transaction, TransactionRequest, create_transaction, get_endpoint::get_transaction,
        },
        validation::RawNumber,
    };

    fn must_create_transaction(connection: &Connection) -> Transaction {
        for employee_id in ["100", "200"] {
            create_employee(
                EmployeeRequest {
                    employee_id: Some(employee_id.to_owned()),
                    name: Some("سارة".to_owned()),
                    ..Default::default()
                },
                connection,
            )
            .expect("could not create test employee");
        }

        create_transaction(
            "100",
            TransactionRequest {
                amount: Some(RawNumber::from(10)),
                transaction_type: Some("إيداع".to_owned()),
                ..Default::default()
            },
            datetime!(2025-01-01 12:00 UTC),
            connection,
        )
        .expect("could not create test transaction")
    }

    #[test]
    fn gets_owned_transaction() {
        let connection = must_create_test_connection();
        let transaction = must_create_transaction(&connection);

        let got = get_transaction("100", &transaction.document_id, &connection);

        assert_eq!(Ok(transaction), got);
    }

    #[test]
    fn rejects_other_owner() {
        let connection = must_create_test_connection();
        let transaction = must_create_transaction(&connection);

        let got = get_transaction("200", &transaction.document_id, &connection);

        assert_eq!(Err(Error::TransactionOwnerMismatch), got);
    }

    #[test]
    fn unknown_transaction_is_not_found() {
        let connection = must_create_test_connection();
        must_create_transaction(&connection);

        let got = get_transaction("100", "does-not-exist", &connection);

        assert_eq!(Err(Error::TransactionNotFound), got);
    }
}
