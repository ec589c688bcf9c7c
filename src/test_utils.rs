//! Helpers shared by endpoint tests.

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, build_router};

/// Create an [AppState] backed by a fresh in-memory SQLite database.
pub fn new_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection).expect("Could not initialize database")
}

/// Create a test server serving the full router over `state`.
///
/// Keep a clone of the state to inspect the database after requests.
pub fn new_test_server_with_state(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server")
}

/// Create a test server with a fresh in-memory database.
pub fn new_test_server() -> TestServer {
    new_test_server_with_state(new_test_state())
}
