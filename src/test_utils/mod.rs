#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, build_router, config::CategoryMode, db::Database};

pub(crate) fn get_test_database() -> Database {
    Database::sqlite(Connection::open_in_memory().unwrap()).expect("Could not initialize database")
}

pub(crate) fn get_test_server(category_mode: CategoryMode) -> TestServer {
    let state = AppState::new(get_test_database(), category_mode);

    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}
