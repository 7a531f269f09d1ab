//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;

use crate::{config::CategoryMode, db::Database};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database that expenses and categories are stored in.
    pub database: Database,

    /// Whether expenses must use a category that has been created.
    pub category_mode: CategoryMode,
}

impl AppState {
    /// Create a new [AppState] from an initialized database.
    pub fn new(database: Database, category_mode: CategoryMode) -> Self {
        Self {
            database,
            category_mode,
        }
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.database.clone()
    }
}

impl FromRef<AppState> for CategoryMode {
    fn from_ref(state: &AppState) -> Self {
        state.category_mode
    }
}
