//! Defines the endpoint for creating a new employee.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use rusqlite::{Connection, params};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error,
    db::{lock_connection, to_stored_timestamp},
    employee::{Employee, EmployeeId, EmployeeRequest, EmployeeState},
    validation::{is_arabic_name, is_blank, is_digits, parse_age},
};

/// The response body after an employee is created or updated.
#[derive(Debug, PartialEq, Serialize)]
pub struct EmployeeSaved {
    /// The employee ID.
    pub id: EmployeeId,
    pub message: String,
}

/// A route handler for creating a new employee.
pub async fn create_employee_endpoint(
    State(state): State<EmployeeState>,
    request: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<Json<EmployeeSaved>, Error> {
    let Json(request) = request?;
    let connection = lock_connection(&state.db_connection)?;

    let employee = create_employee(request, &connection)?;
    tracing::info!("created employee {}", employee.employee_id);

    Ok(Json(EmployeeSaved {
        id: employee.employee_id,
        message: "تم إضافة العميل بنجاح".to_owned(),
    }))
}

/// Validate `request` and insert it as a new employee.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingEmployeeFields] if the employee ID or name is blank,
/// - [Error::InvalidEmployeeId] if the employee ID is not digits only,
/// - [Error::InvalidName] if the name is not Arabic letters and whitespace,
/// - [Error::InvalidAge] if the age is not a non-negative whole number,
/// - [Error::DuplicateEmployeeId] if the employee ID is taken,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_employee(
    request: EmployeeRequest,
    connection: &Connection,
) -> Result<Employee, Error> {
    let employee_id = request.employee_id.unwrap_or_default();
    let name = request.name.unwrap_or_default();

    if is_blank(&employee_id) || is_blank(&name) {
        return Err(Error::MissingEmployeeFields);
    }

    if !is_digits(&employee_id) {
        return Err(Error::InvalidEmployeeId);
    }

    if !is_arabic_name(&name) {
        return Err(Error::InvalidName);
    }

    let age = parse_age(request.age.as_ref()).ok_or(Error::InvalidAge)?;

    let employee = Employee {
        employee_id,
        name,
        age,
        address: request.address,
        identity_name: request.identity_name,
        identity_type: request.identity_type,
        image_url: request.image_url,
        created_at: Some(to_stored_timestamp(
            request.created_at.unwrap_or_else(OffsetDateTime::now_utc),
        )),
        updated_at: None,
    };

    insert_employee(&employee, connection)?;

    Ok(employee)
}

/// Insert `employee`, relying on the primary key to reject duplicate employee IDs.
fn insert_employee(employee: &Employee, connection: &Connection) -> Result<(), Error> {
    connection
        .execute(
            "INSERT INTO employee (employee_id, name, age, address, identity_name, \
                identity_type, image_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                employee.employee_id,
                employee.name,
                employee.age,
                employee.address,
                employee.identity_name,
                employee.identity_type,
                employee.image_url,
                employee.created_at,
                employee.updated_at,
            ],
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code:
                        rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateEmployeeId,
            error => error.into(),
        })?;

    Ok(())
}

#[cfg(test)]
mod create_employee_tests {
    use time::macros::datetime;

    use crate::{
        Error,
        employee::{EmployeeRequest, create_employee, get_employee},
        test_utils::must_create_test_connection,
        validation::RawNumber,
    };

    fn request(employee_id: &str, name: &str) -> EmployeeRequest {
        EmployeeRequest {
            employee_id: Some(employee_id.to_owned()),
            name: Some(name.to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn creates_employee() {
        let connection = must_create_test_connection();
        let request = EmployeeRequest {
            age: Some(RawNumber::from(30)),
            address: Some("جدة".to_owned()),
            identity_name: Some("سارة أحمد".to_owned()),
            identity_type: Some("هوية وطنية".to_owned()),
            image_url: Some("https://example.com/sara.png".to_owned()),
            created_at: Some(datetime!(2025-01-02 03:04:05 UTC)),
            ..request("100", "سارة")
        };

        let created = create_employee(request, &connection).unwrap();

        let got = get_employee("100", &connection).unwrap();
        assert_eq!(created, got);
        assert_eq!(got.name, "سارة");
        assert_eq!(got.age, 30);
        assert_eq!(got.identity_type.as_deref(), Some("هوية وطنية"));
        assert_eq!(got.created_at, Some(datetime!(2025-01-02 03:04:05 UTC)));
        assert_eq!(got.updated_at, None);
    }

    #[test]
    fn sets_created_at_when_missing() {
        let connection = must_create_test_connection();

        let created = create_employee(request("100", "سارة"), &connection).unwrap();

        assert!(created.created_at.is_some());
        assert_eq!(created.age, 0);
    }

    #[test]
    fn rejects_duplicate_employee_id() {
        let connection = must_create_test_connection();
        create_employee(request("100", "سارة"), &connection).unwrap();

        let result = create_employee(request("100", "محمد"), &connection);

        assert_eq!(Err(Error::DuplicateEmployeeId), result);
        assert_eq!(get_employee("100", &connection).unwrap().name, "سارة");
    }

    #[test]
    fn rejects_blank_fields() {
        let connection = must_create_test_connection();

        assert_eq!(
            Err(Error::MissingEmployeeFields),
            create_employee(request("", "سارة"), &connection)
        );
        assert_eq!(
            Err(Error::MissingEmployeeFields),
            create_employee(request("100", "   "), &connection)
        );
        assert_eq!(
            Err(Error::MissingEmployeeFields),
            create_employee(EmployeeRequest::default(), &connection)
        );
    }

    #[test]
    fn rejects_non_digit_employee_ids() {
        let connection = must_create_test_connection();

        for employee_id in ["12a", "-5", "1.5", " 7"] {
            assert_eq!(
                Err(Error::InvalidEmployeeId),
                create_employee(request(employee_id, "سارة"), &connection),
                "employee ID {employee_id:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_non_arabic_names() {
        let connection = must_create_test_connection();

        assert_eq!(
            Err(Error::InvalidName),
            create_employee(request("100", "Sara"), &connection)
        );
        assert_eq!(
            Err(Error::InvalidName),
            create_employee(request("100", "سارة Sara"), &connection)
        );
    }

    #[test]
    fn rejects_invalid_ages() {
        let connection = must_create_test_connection();

        for age in [RawNumber::from(-5), RawNumber::from(2.5), RawNumber::from("ثلاثون")] {
            let request = EmployeeRequest {
                age: Some(age.clone()),
                ..request("100", "سارة")
            };

            assert_eq!(
                Err(Error::InvalidAge),
                create_employee(request, &connection),
                "age {age:?} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_age_as_text() {
        let connection = must_create_test_connection();
        let request = EmployeeRequest {
            age: Some(RawNumber::from("41")),
            ..request("100", "سارة")
        };

        let created = create_employee(request, &connection).unwrap();

        assert_eq!(created.age, 41);
    }
}
