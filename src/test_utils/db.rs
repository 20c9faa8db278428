use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, initialize_db};

#[track_caller]
pub(crate) fn must_create_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("could not create in-memory SQLite database");
    initialize_db(&connection).expect("could not initialize test DB");

    connection
}

#[track_caller]
pub(crate) fn must_create_test_state() -> AppState {
    AppState {
        db_connection: Arc::new(Mutex::new(must_create_test_connection())),
        local_timezone: "Etc/UTC".to_owned(),
    }
}
