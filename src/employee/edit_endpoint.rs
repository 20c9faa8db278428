//! Defines the endpoint for updating an employee.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use rusqlite::{Connection, params};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{lock_connection, to_stored_timestamp},
    employee::{EmployeeId, EmployeeRequest, EmployeeSaved, EmployeeState},
    validation::{is_arabic_name, is_blank, parse_age},
};

/// A route handler for updating the employee with the ID in the path.
pub async fn edit_employee_endpoint(
    State(state): State<EmployeeState>,
    Path(employee_id): Path<EmployeeId>,
    request: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<Json<EmployeeSaved>, Error> {
    let Json(request) = request?;
    let connection = lock_connection(&state.db_connection)?;

    update_employee(&employee_id, request, OffsetDateTime::now_utc(), &connection)?;
    tracing::info!("updated employee {employee_id}");

    Ok(Json(EmployeeSaved {
        id: employee_id,
        message: "تم تحديث العميل بنجاح".to_owned(),
    }))
}

/// Overwrite the mutable fields of the employee with `employee_id`.
///
/// Every mutable field is written, so fields missing from `request` are
/// cleared. `updated_at` is set to `now`. The employee ID and creation time
/// never change.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidName] if a non-blank name is not Arabic letters and whitespace,
/// - [Error::InvalidAge] if the age is not a non-negative whole number,
/// - [Error::EmployeeNotFound] if there is no employee with `employee_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_employee(
    employee_id: &str,
    request: EmployeeRequest,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let name = request.name.unwrap_or_default();

    if !is_blank(&name) && !is_arabic_name(&name) {
        return Err(Error::InvalidName);
    }

    let age = parse_age(request.age.as_ref()).ok_or(Error::InvalidAge)?;

    let rows_affected = connection.execute(
        "UPDATE employee
        SET \
            name = ?1, \
            age = ?2, \
            address = ?3, \
            identity_name = ?4, \
            identity_type = ?5, \
            image_url = ?6, \
            updated_at = ?7 \
        WHERE employee_id = ?8",
        params![
            name,
            age,
            request.address,
            request.identity_name,
            request.identity_type,
            request.image_url,
            to_stored_timestamp(now),
            employee_id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::EmployeeNotFound);
    }

    Ok(())
}
