//! The API endpoints URIs.
//!
//! For endpoints that take parameters, e.g., '/api/employees/{employee_id}', use [format_endpoint].

/// The root route which redirects to the employees page.
pub const ROOT: &str = "/";
/// The page listing and searching employees.
pub const EMPLOYEES_VIEW: &str = "/employees";
/// The page showing one employee and their transactions.
pub const EMPLOYEE_VIEW: &str = "/employees/{employee_id}";

/// The route to create and list employees.
pub const EMPLOYEES_API: &str = "/api/employees";
/// The route to search employees by name or employee ID prefix.
pub const SEARCH_EMPLOYEES_API: &str = "/api/employees/search";
/// The route to get or update a single employee.
pub const EMPLOYEE_API: &str = "/api/employees/{employee_id}";
/// The route to create and list an employee's transactions.
pub const TRANSACTIONS_API: &str = "/api/employees/{employee_id}/transactions";
/// The route to get or update a single transaction.
pub const TRANSACTION_API: &str = "/api/employees/{employee_id}/transactions/{transaction_id}";

/// Replace the parameters in `endpoint_path` with `values`, in order.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/employees/{employee_id}', '{employee_id}' is the parameter.
///
/// Parameters without a matching value are left as is, and extra values are ignored.
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, values: &[&str]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut values = values.iter();
    let mut rest = endpoint_path;

    while let Some(param_start) = rest.find('{') {
        let Some(param_length) = rest[param_start..].find('}') else {
            break;
        };
        let Some(value) = values.next() else {
            break;
        };

        formatted.push_str(&rest[..param_start]);
        formatted.push_str(value);
        rest = &rest[param_start + param_length + 1..];
    }

    formatted.push_str(rest);
    formatted
}
