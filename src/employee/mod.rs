//! Employee records, the endpoints that manage them and the pages that display them.

mod core;
mod create_endpoint;
mod edit_endpoint;
mod employee_page;
mod employees_page;
mod get_endpoint;
mod list_endpoint;
mod search_endpoint;

pub use core::{
    EMPLOYEE_COLUMNS, Employee, EmployeeId, EmployeeRequest, EmployeeState,
    create_employee_table, employee_exists, get_employee, map_row_to_employee,
};
pub use create_endpoint::{EmployeeSaved, create_employee, create_employee_endpoint};
pub use edit_endpoint::edit_employee_endpoint;
pub use employee_page::get_employee_page;
pub use employees_page::get_employees_page;
pub use get_endpoint::{EmployeeDetails, get_employee_endpoint};
pub use list_endpoint::{
    DEFAULT_LIST_LIMIT, EmployeeListItem, ListParams, list_employees, list_employees_endpoint,
};
pub use search_endpoint::{SearchParams, search_employees, search_employees_endpoint};
