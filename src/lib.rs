//! Despesas is a small REST API for recording personal expenses.
//!
//! Expenses have an amount, a description, a category and the time they were
//! registered. They are stored in SQLite, or in MySQL when given a
//! `mysql://` connection URL, and exchanged as JSON.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod category;
mod config;
mod db;
pub mod endpoints;
mod error;
mod expense;
mod health;
mod logging;
mod routing;
mod timestamp;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::{CategoryName, DEFAULT_CATEGORIES, seed_default_categories};
pub use config::{CategoryMode, DEFAULT_DATABASE_PATH, DatabaseTarget};
pub use db::{Database, DbConnection, initialize as initialize_db};
pub use error::Error;
pub use expense::{Expense, ExpenseId, NewExpense, create_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
