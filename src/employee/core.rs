//! Defines the employee model, its table and the queries shared by the employee endpoints.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{AppState, Error, db::get_timestamp, validation::RawNumber};

/// The business key of an employee, a string of digits.
pub type EmployeeId = String;

/// A customer of the business.
///
/// The records are called employees for historical reasons.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    /// The employee's ID, unique and immutable after creation.
    pub employee_id: EmployeeId,
    /// The employee's full name in Arabic.
    pub name: String,
    /// The employee's age in years.
    pub age: i64,
    pub address: Option<String>,
    /// The name on the employee's identity document.
    pub identity_name: Option<String>,
    /// The kind of identity document, e.g. a national ID card or passport.
    pub identity_type: Option<String>,
    /// A link to a photo of the employee.
    pub image_url: Option<String>,
    /// When the employee was created.
    pub created_at: Option<OffsetDateTime>,
    /// When the employee was last updated, if ever.
    pub updated_at: Option<OffsetDateTime>,
}

/// The JSON body for creating or updating an employee.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    /// Only read when creating an employee, the path decides which employee is updated.
    pub employee_id: Option<String>,
    pub name: Option<String>,
    /// Kept in its raw form so that it can be validated before conversion.
    pub age: Option<RawNumber>,
    pub address: Option<String>,
    pub identity_name: Option<String>,
    pub identity_type: Option<String>,
    pub image_url: Option<String>,
    /// Only read when creating an employee, defaults to the current time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// The state needed by the employee endpoints and pages.
#[derive(Debug, Clone)]
pub struct EmployeeState {
    /// The database connection for managing employees.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The canonical timezone name used to render dates.
    pub local_timezone: String,
}

impl FromRef<AppState> for EmployeeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The columns selected for an [Employee], in the order [map_row_to_employee] expects.
pub const EMPLOYEE_COLUMNS: &str = "employee_id, name, age, address, identity_name, \
    identity_type, image_url, created_at, updated_at";

pub fn create_employee_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS employee (
            employee_id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            age INTEGER NOT NULL DEFAULT 0,
            address TEXT,
            identity_name TEXT,
            identity_type TEXT,
            image_url TEXT,
            created_at TEXT,
            updated_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_employee_name ON employee(name);",
    )?;

    Ok(())
}

pub fn map_row_to_employee(row: &Row) -> Result<Employee, rusqlite::Error> {
    Ok(Employee {
        employee_id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        address: row.get(3)?,
        identity_name: row.get(4)?,
        identity_type: row.get(5)?,
        image_url: row.get(6)?,
        created_at: get_timestamp(row, 7)?,
        updated_at: get_timestamp(row, 8)?,
    })
}

/// Get the employee with `employee_id`.
///
/// # Errors
/// Returns [Error::EmployeeNotFound] if there is no such employee, or
/// [Error::SqlError] if the query fails or the stored row is malformed.
pub fn get_employee(employee_id: &str, connection: &Connection) -> Result<Employee, Error> {
    connection
        .prepare(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee WHERE employee_id = ?1"
        ))?
        .query_row([employee_id], map_row_to_employee)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::EmployeeNotFound,
            error => error.into(),
        })
}

/// Whether an employee with `employee_id` exists.
pub fn employee_exists(employee_id: &str, connection: &Connection) -> Result<bool, Error> {
    let exists = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM employee WHERE employee_id = ?1)",
        [employee_id],
        |row| row.get(0),
    )?;

    Ok(exists)
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_employee_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_employee_table(&connection));
    }
}
