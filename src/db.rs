//! Database set-up and helpers shared by the employee and transaction tables.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{
    Connection, Row, Transaction as SqlTransaction, TransactionBehavior,
    types::{FromSqlError, ValueRef},
};
use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{Error, employee::create_employee_table, transaction::create_transaction_table};

/// Create the application's tables and indexes if they do not exist yet.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_employee_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub fn lock_connection(
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

/// How rusqlite stores an [OffsetDateTime], with the fraction and offset optional.
const STORED_TIMESTAMP_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]\
    [offset_hour sign:mandatory]:[offset_minute]"
);

/// A timestamp without an offset, e.g. from SQLite's `CURRENT_TIMESTAMP`. Read as UTC.
const STORED_UTC_TIMESTAMP_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
);

/// Read the nullable timestamp in column `index`.
///
/// Text that is not a timestamp is a [rusqlite::Error::FromSqlConversionFailure],
/// so the row counts as malformed.
pub fn get_timestamp(
    row: &Row,
    index: usize,
) -> Result<Option<OffsetDateTime>, rusqlite::Error> {
    let text = match row.get_ref(index)? {
        ValueRef::Null => return Ok(None),
        ValueRef::Text(text) => String::from_utf8_lossy(text),
        value => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                index,
                value.data_type(),
                Box::new(FromSqlError::InvalidType),
            ));
        }
    };

    parse_timestamp(&text).map(Some).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(error))
    })
}

fn parse_timestamp(text: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(text, STORED_TIMESTAMP_FORMAT)
        .or_else(|_| OffsetDateTime::parse(text, &Rfc3339))
        .or_else(|_| {
            PrimitiveDateTime::parse(text, STORED_UTC_TIMESTAMP_FORMAT)
                .map(PrimitiveDateTime::assume_utc)
        })
}

/// Convert `timestamp` to UTC before it is stored.
///
/// Timestamps are stored as text, so a shared offset keeps SQL ordering in
/// step with time ordering.
pub fn to_stored_timestamp(timestamp: OffsetDateTime) -> OffsetDateTime {
    timestamp.to_offset(UtcOffset::UTC)
}

/// Whether `error` means a stored row could not be converted into a record,
/// as opposed to the query itself failing.
fn is_decode_error(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
    )
}

/// Collect the rows of a query, skipping rows that fail to decode.
///
/// Each skipped row is logged at `warn` level together with `label` so the
/// malformed record can be tracked down. Errors other than decode errors abort
/// the collection.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails for a reason other than a
/// malformed row.
pub fn collect_decoded<T>(
    rows: impl Iterator<Item = Result<T, rusqlite::Error>>,
    label: &str,
) -> Result<Vec<T>, Error> {
    let mut records = Vec::new();
    let mut skipped = 0;

    for row in rows {
        match row {
            Ok(record) => records.push(record),
            Err(error) if is_decode_error(&error) => {
                tracing::warn!("skipping malformed {label} record: {error}");
                skipped += 1;
            }
            Err(error) => return Err(error.into()),
        }
    }

    if skipped > 0 {
        tracing::warn!(
            "skipped {skipped} malformed {label} record(s), returning {}",
            records.len()
        );
    }

    Ok(records)
}
