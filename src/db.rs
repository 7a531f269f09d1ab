//! The storage adapter: the database handle, per-request connections and schema set up.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use rusqlite::Connection;
use sqlx::{
    MySql, MySqlConnection, MySqlPool, pool::PoolConnection, mysql::MySqlPoolOptions,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    Error,
    category::{MAX_CATEGORY_NAME_LENGTH, create_category_table},
    config::DatabaseTarget,
    expense::{MAX_DESCRICAO_LENGTH, create_expense_table},
};

/// A handle to the relational store backing the API.
///
/// Cloning is cheap, clones share the same underlying connection or pool.
#[derive(Debug, Clone)]
pub enum Database {
    /// A single SQLite connection shared between requests.
    Sqlite(Arc<Mutex<Connection>>),
    /// A pool of MySQL connections.
    MySql(MySqlPool),
}

impl Database {
    /// Open the database named by `target` and create any missing tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub async fn connect(target: &DatabaseTarget) -> Result<Self, Error> {
        match target {
            DatabaseTarget::SqliteFile(path) => Self::sqlite(Connection::open(path)?),
            DatabaseTarget::SqliteInMemory => Self::sqlite(Connection::open_in_memory()?),
            DatabaseTarget::MySql(url) => {
                let pool = MySqlPoolOptions::new().connect(url).await?;
                let database = Self::MySql(pool);
                database.acquire().await?.initialize().await?;

                Ok(database)
            }
        }
    }

    /// Wrap an open SQLite connection, creating any missing tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables cannot be created.
    pub fn sqlite(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self::Sqlite(Arc::new(Mutex::new(connection))))
    }

    /// Get a connection for the duration of one request.
    ///
    /// The connection goes back to the database when the returned value is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if no MySQL connection could be checked out of the pool.
    pub async fn acquire(&self) -> Result<DbConnection, Error> {
        match self {
            Database::Sqlite(connection) => Ok(DbConnection::Sqlite(
                connection.clone().lock_owned().await,
            )),
            Database::MySql(pool) => Ok(DbConnection::MySql(pool.acquire().await?)),
        }
    }

    /// Check that the store answers a trivial query.
    ///
    /// # Errors
    ///
    /// Returns the error from acquiring a connection or running the query.
    pub async fn ping(&self) -> Result<(), Error> {
        let mut connection = self.acquire().await?;

        match &mut connection {
            DbConnection::Sqlite(connection) => {
                connection.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            }
            DbConnection::MySql(connection) => {
                sqlx::query("SELECT 1").execute(&mut **connection).await?;
            }
        }

        Ok(())
    }
}

/// A database connection owned by a single request.
///
/// Use it as a handler argument to have one acquired before the handler runs.
/// It is released when the handler returns, whether or not the handler succeeded.
pub enum DbConnection {
    /// Exclusive use of the shared SQLite connection.
    Sqlite(OwnedMutexGuard<Connection>),
    /// A connection checked out of the MySQL pool.
    MySql(PoolConnection<MySql>),
}

impl DbConnection {
    /// Create any missing tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a table could not be created.
    pub async fn initialize(&mut self) -> Result<(), Error> {
        match self {
            DbConnection::Sqlite(connection) => initialize(connection),
            DbConnection::MySql(connection) => initialize_mysql(connection).await,
        }
    }
}

impl<S> FromRequestParts<S> for DbConnection
where
    Database: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Database::from_ref(state).acquire().await
    }
}

/// Create the tables for the domain models in a SQLite database.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

async fn initialize_mysql(connection: &mut MySqlConnection) -> Result<(), Error> {
    let statements = [
        format!(
            "CREATE TABLE IF NOT EXISTS categories (
                name VARCHAR({MAX_CATEGORY_NAME_LENGTH}) NOT NULL PRIMARY KEY
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS expenses (
                id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                valor DECIMAL(10, 2) NOT NULL,
                descricao VARCHAR({MAX_DESCRICAO_LENGTH}) NOT NULL,
                categoria VARCHAR({MAX_CATEGORY_NAME_LENGTH}) NOT NULL,
                data_registro DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
                INDEX idx_expenses_categoria (categoria),
                INDEX idx_expenses_data_registro (data_registro)
            )"
        ),
    ];

    for statement in statements {
        sqlx::query(&statement).execute(&mut *connection).await?;
    }

    Ok(())
}
