//! Defines the endpoint for getting a single employee.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use time::UtcOffset;

use crate::{
    Error,
    db::lock_connection,
    employee::{Employee, EmployeeId, EmployeeListItem, EmployeeState, get_employee},
    timezone::{format_date_time, local_offset_or_error},
};

/// The full details of an employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetails {
    #[serde(flatten)]
    pub item: EmployeeListItem,
    /// The time of the last update formatted as `yyyy/MM/dd HH:mm`.
    pub updated_at: Option<String>,
}

impl EmployeeDetails {
    pub fn new(employee: Employee, offset: UtcOffset) -> Self {
        let updated_at = employee
            .updated_at
            .map(|updated_at| format_date_time(updated_at, offset));

        Self {
            item: EmployeeListItem::new(employee, offset),
            updated_at,
        }
    }
}

/// A route handler for getting the employee with the ID in the path.
pub async fn get_employee_endpoint(
    State(state): State<EmployeeState>,
    Path(employee_id): Path<EmployeeId>,
) -> Result<Json<EmployeeDetails>, Error> {
    let offset = local_offset_or_error(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let employee = get_employee(&employee_id, &connection)?;

    Ok(Json(EmployeeDetails::new(employee, offset)))
}
