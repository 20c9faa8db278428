//! Defines the endpoint for searching employees by name or employee ID prefix.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

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
    validation::is_blank,
};

/// The most results returned by each of the two prefix queries.
const SEARCH_LIMIT: u32 = 10;

/// Appended to the query to get the upper bound of a prefix range.
const PREFIX_RANGE_END: char = '\u{f8ff}';

/// The query parameters for searching employees.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// The prefix of an employee's name or employee ID.
    #[serde(default)]
    pub query: String,
}

/// An employee as shown in search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSearchResult {
    pub id: EmployeeId,
    pub name: String,
    pub age: i64,
    /// The creation date formatted as `yyyy/MM/dd`, or empty if unknown.
    pub join_date: String,
}

impl EmployeeSearchResult {
    pub fn new(employee: Employee, offset: UtcOffset) -> Self {
        Self {
            id: employee.employee_id,
            name: employee.name,
            age: employee.age,
            join_date: employee
                .created_at
                .map(|created_at| format_date(created_at, offset))
                .unwrap_or_default(),
        }
    }
}

/// A route handler for searching employees.
pub async fn search_employees_endpoint(
    State(state): State<EmployeeState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<EmployeeSearchResult>>, Error> {
    let Query(params) = params?;
    let offset = local_offset_or_error(&state.local_timezone)?;

    let employees = search_employees(state.db_connection, &params.query).await?;

    Ok(Json(
        employees
            .into_iter()
            .map(|employee| EmployeeSearchResult::new(employee, offset))
            .collect(),
    ))
}

#[derive(Debug, Clone, Copy)]
enum SearchField {
    Name,
    EmployeeId,
}

impl SearchField {
    fn column(self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::EmployeeId => "employee_id",
        }
    }
}

/// Find employees whose name or employee ID starts with `query`.
///
/// The name and employee ID queries run concurrently and return at most 10
/// employees each. Name matches come first and an employee matched by both
/// queries is only returned once. A blank `query` returns no employees without
/// touching the database.
///
/// # Errors
/// Returns [Error::TaskFailed] if a query task panics, [Error::DatabaseLockError]
/// if the lock is poisoned, or [Error::SqlError] if a query fails.
pub async fn search_employees(
    db_connection: Arc<Mutex<Connection>>,
    query: &str,
) -> Result<Vec<Employee>, Error> {
    if is_blank(query) {
        return Ok(Vec::new());
    }

    let (by_name, by_employee_id) = tokio::join!(
        spawn_prefix_query(db_connection.clone(), SearchField::Name, query.to_owned()),
        spawn_prefix_query(db_connection, SearchField::EmployeeId, query.to_owned()),
    );

    let mut seen = HashSet::new();
    let employees = by_name?
        .into_iter()
        .chain(by_employee_id?)
        .filter(|employee| seen.insert(employee.employee_id.clone()))
        .collect();

    Ok(employees)
}

async fn spawn_prefix_query(
    db_connection: Arc<Mutex<Connection>>,
    field: SearchField,
    query: String,
) -> Result<Vec<Employee>, Error> {
    tokio::task::spawn_blocking(move || {
        let connection = lock_connection(&db_connection)?;
        prefix_query(&connection, field, &query)
    })
    .await
    .map_err(|error| {
        tracing::error!("employee search task failed: {error}");
        Error::TaskFailed(error.to_string())
    })?
}

fn prefix_query(
    connection: &Connection,
    field: SearchField,
    query: &str,
) -> Result<Vec<Employee>, Error> {
    let column = field.column();
    let mut statement = connection.prepare(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employee
        WHERE {column} >= ?1 AND {column} <= ?2
        ORDER BY {column} ASC
        LIMIT ?3"
    ))?;
    let upper_bound = format!("{query}{PREFIX_RANGE_END}");
    let rows = statement.query_map(
        rusqlite::params![query, upper_bound, SEARCH_LIMIT],
        map_row_to_employee,
    )?;

    collect_decoded(rows, "employee")
}
