//! Defines the app level error type and its conversion to JSON responses and HTML pages.
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
///
/// The display text of the client facing variants is the message sent back to
/// the client, which is why they are written in Arabic.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The employee ID or name was missing or blank when creating an employee.
    #[error("EmployeeId و Name مطلوبان")]
    MissingEmployeeFields,

    /// The employee ID contains something other than the digits 0-9.
    #[error("رقم العميل يجب أن يحتوي على أرقام فقط")]
    InvalidEmployeeId,

    /// The name contains something other than Arabic letters and whitespace.
    #[error("الاسم يجب أن يحتوي على أحرف عربية فقط")]
    InvalidName,

    /// The age was not a non-negative whole number.
    #[error("العمر يجب أن يحتوي على أرقام فقط")]
    InvalidAge,

    /// The employee ID in the path was blank.
    #[error("EmployeeId مطلوب")]
    MissingEmployeeId,

    /// The amount was missing or zero, or the transaction type was blank.
    #[error("النوع والمبلغ مطلوبان")]
    MissingTransactionFields,

    /// The amount was not a non-negative decimal number.
    #[error("المبلغ يجب أن يحتوي على أرقام فقط")]
    InvalidAmount,

    /// The box number contains something other than the digits 0-9.
    #[error("رقم الصندوق يجب أن يحتوي على أرقام فقط")]
    InvalidBoxNumber,

    /// The request body or query string could not be parsed.
    ///
    /// Callers should pass in the parser's error text.
    #[error("الطلب غير صالح: {0}")]
    InvalidRequestBody(String),

    /// An employee with the same employee ID already exists.
    #[error("يوجد عميل بنفس الرقم")]
    DuplicateEmployeeId,

    /// No employee has the requested employee ID.
    #[error("العميل غير موجود")]
    EmployeeNotFound,

    /// No transaction has the requested document ID.
    #[error("المعاملة غير موجودة")]
    TransactionNotFound,

    /// The transaction exists but belongs to a different employee.
    #[error("المعاملة لا تنتمي لهذا العميل")]
    TransactionOwnerMismatch,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A blocking store task panicked or was cancelled.
    #[error("a background store task failed: {0}")]
    TaskFailed(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

/// The JSON body sent to the client for every error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// A human readable message.
    pub message: String,
    /// The underlying error text, only set for internal server errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The generic message for internal server errors.
const SERVER_ERROR_MESSAGE: &str = "خطأ في الخادم";

impl Error {
    /// The HTTP status code that the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingEmployeeFields
            | Error::InvalidEmployeeId
            | Error::InvalidName
            | Error::InvalidAge
            | Error::MissingEmployeeId
            | Error::MissingTransactionFields
            | Error::InvalidAmount
            | Error::InvalidBoxNumber
            | Error::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Error::EmployeeNotFound | Error::TransactionNotFound => StatusCode::NOT_FOUND,
            Error::DuplicateEmployeeId => StatusCode::CONFLICT,
            Error::TransactionOwnerMismatch => StatusCode::UNAUTHORIZED,
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::TaskFailed(_)
            | Error::InvalidTimezoneError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_body(self) -> ErrorBody {
        if self.status_code().is_server_error() {
            ErrorBody {
                message: SERVER_ERROR_MESSAGE.to_owned(),
                error: Some(self.to_string()),
            }
        } else {
            ErrorBody {
                message: self.to_string(),
                error: None,
            }
        }
    }

    /// Convert the error into an HTML error page for the server rendered views.
    pub fn into_page_response(self) -> Response {
        match self {
            Error::EmployeeNotFound | Error::TransactionNotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "إعدادات المنطقة الزمنية غير صالحة",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            error => {
                tracing::error!("An unexpected error occurred while rendering a page: {error}");
                InternalServerError::default().into_response()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (status, Json(self.into_body())).into_response()
    }
}
