//! Defines the endpoint for listing employees.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::{
    Error,
    db::{collect_decoded, lock_connection},
    employee::{EMPLOYEE_COLUMNS, Employee, EmployeeId, EmployeeState, map_row_to_employee},
    timezone::{format_date, local_offset_or_error},
};

/// The number of employees returned when the client does not ask for a limit.
pub const DEFAULT_LIST_LIMIT: u32 = 200;

/// The query parameters for listing records.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// The maximum number of records to return.
    pub limit: Option<u32>,
}

impl ListParams {
    pub fn limit_or_default(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

/// An employee as shown in the employee listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListItem {
    pub id: EmployeeId,
    pub name: String,
    pub age: i64,
    /// The creation date formatted as `yyyy/MM/dd`.
    pub created_at: Option<String>,
    pub address: Option<String>,
    pub identity_type: Option<String>,
    pub identity_name: Option<String>,
    pub image_url: Option<String>,
}

impl EmployeeListItem {
    /// Project `employee` with its dates rendered in the timezone `offset`.
    pub fn new(employee: Employee, offset: UtcOffset) -> Self {
        Self {
            id: employee.employee_id,
            name: employee.name,
            age: employee.age,
            created_at: employee
                .created_at
                .map(|created_at| format_date(created_at, offset)),
            address: employee.address,
            identity_type: employee.identity_type,
            identity_name: employee.identity_name,
            image_url: employee.image_url,
        }
    }
}

/// A route handler for listing employees ordered by name.
pub async fn list_employees_endpoint(
    State(state): State<EmployeeState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<EmployeeListItem>>, Error> {
    let Query(params) = params?;
    let offset = local_offset_or_error(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let employees = list_employees(&connection, params.limit_or_default())?;

    Ok(Json(
        employees
            .into_iter()
            .map(|employee| EmployeeListItem::new(employee, offset))
            .collect(),
    ))
}

/// Get up to `limit` employees ordered by name.
///
/// Rows that cannot be decoded into an [Employee] are logged and skipped.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn list_employees(connection: &Connection, limit: u32) -> Result<Vec<Employee>, Error> {
    let mut statement = connection.prepare(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employee ORDER BY name ASC LIMIT ?1"
    ))?;
    let rows = statement.query_map([limit], map_row_to_employee)?;

    collect_decoded(rows, "employee")
}

#[cfg(test)]
mod list_employees_tests {
    use rusqlite::Connection;

    use crate::{
        employee::{EmployeeRequest, create_employee, list_employees},
        test_utils::must_create_test_connection,
    };

    fn must_create_employee(employee_id: &str, name: &str, connection: &Connection) {
        create_employee(
            EmployeeRequest {
                employee_id: Some(employee_id.to_owned()),
                name: Some(name.to_owned()),
                ..Default::default()
            },
            connection,
        )
        .expect("could not create test employee");
    }

    #[test]
    fn orders_by_name() {
        let connection = must_create_test_connection();
        must_create_employee("1", "محمد", &connection);
        must_create_employee("2", "أحمد", &connection);
        must_create_employee("3", "سارة", &connection);

        let got = list_employees(&connection, 200).unwrap();

        let names: Vec<_> = got.iter().map(|employee| employee.name.as_str()).collect();
        assert_eq!(names, vec!["أحمد", "سارة", "محمد"]);
    }

    #[test]
    fn respects_limit() {
        let connection = must_create_test_connection();
        for (id, name) in [("1", "أحمد"), ("2", "سارة"), ("3", "محمد")] {
            must_create_employee(id, name, &connection);
        }

        let got = list_employees(&connection, 2).unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].name, "أحمد");
    }

    #[test]
    fn skips_malformed_rows() {
        let connection = must_create_test_connection();
        must_create_employee("1", "أحمد", &connection);
        connection
            .execute(
                "INSERT INTO employee (employee_id, name, age) VALUES ('2', 'بدر', 'كبير')",
                (),
            )
            .unwrap();
        connection
            .execute(
                "INSERT INTO employee (employee_id, name, created_at) VALUES ('3', 'جمال', 'أمس')",
                (),
            )
            .unwrap();
        must_create_employee("4", "سارة", &connection);

        let got = list_employees(&connection, 200).unwrap();

        let ids: Vec<_> = got.iter().map(|employee| employee.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }
}
