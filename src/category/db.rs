//! Database operations for categories.

use rusqlite::Connection;
use sqlx::MySqlConnection;

use crate::{Error, category::CategoryName, db::DbConnection};

/// The categories that can be seeded into a new database.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Alimentação",
    "Educação",
    "Moradia",
    "Outros",
    "Saúde",
    "Transporte",
];

/// Add a category.
///
/// # Errors
///
/// Returns an [Error::DuplicateCategory] if a category with the same name
/// already exists, or an SQL error.
pub async fn create_category(
    name: &CategoryName,
    connection: &mut DbConnection,
) -> Result<(), Error> {
    match connection {
        DbConnection::Sqlite(connection) => insert_sqlite(name, connection),
        DbConnection::MySql(connection) => insert_mysql(name, connection).await,
    }
}

/// Retrieve all category names in lexicographic order.
pub async fn get_all_categories(
    connection: &mut DbConnection,
) -> Result<Vec<CategoryName>, Error> {
    match connection {
        DbConnection::Sqlite(connection) => select_all_sqlite(connection),
        DbConnection::MySql(connection) => select_all_mysql(connection).await,
    }
}

/// Check whether a category called `name` exists.
pub async fn category_exists(
    name: &CategoryName,
    connection: &mut DbConnection,
) -> Result<bool, Error> {
    match connection {
        DbConnection::Sqlite(connection) => exists_sqlite(name, connection),
        DbConnection::MySql(connection) => exists_mysql(name, connection).await,
    }
}

/// Insert each of [DEFAULT_CATEGORIES] that is not already in the database.
pub async fn seed_default_categories(connection: &mut DbConnection) -> Result<(), Error> {
    match connection {
        DbConnection::Sqlite(connection) => seed_sqlite(connection),
        DbConnection::MySql(connection) => seed_mysql(connection).await,
    }
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS categories (
            name TEXT NOT NULL PRIMARY KEY
        );",
    )?;

    Ok(())
}

fn insert_sqlite(name: &CategoryName, connection: &Connection) -> Result<(), Error> {
    connection
        .execute("INSERT INTO categories (name) VALUES (?1);", (name.as_ref(),))
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code:
                        rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategory(name.to_string()),
            error => error.into(),
        })?;

    Ok(())
}

fn select_all_sqlite(connection: &Connection) -> Result<Vec<CategoryName>, Error> {
    connection
        .prepare("SELECT name FROM categories ORDER BY name ASC;")?
        .query_map([], |row| {
            let name: String = row.get(0)?;
            Ok(CategoryName::new_unchecked(&name))
        })?
        .map(|maybe_name| maybe_name.map_err(|error| error.into()))
        .collect()
}

fn exists_sqlite(name: &CategoryName, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS (SELECT 1 FROM categories WHERE name = ?1);",
            (name.as_ref(),),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn seed_sqlite(connection: &Connection) -> Result<(), Error> {
    let mut statement = connection.prepare("INSERT OR IGNORE INTO categories (name) VALUES (?1);")?;

    for name in DEFAULT_CATEGORIES {
        statement.execute((name,))?;
    }

    Ok(())
}

async fn insert_mysql(name: &CategoryName, connection: &mut MySqlConnection) -> Result<(), Error> {
    sqlx::query("INSERT INTO categories (name) VALUES (?)")
        .bind(name.as_ref())
        .execute(&mut *connection)
        .await
        .map_err(|error| match error {
            sqlx::Error::Database(ref database_error) if database_error.is_unique_violation() => {
                Error::DuplicateCategory(name.to_string())
            }
            error => error.into(),
        })?;

    Ok(())
}

async fn select_all_mysql(connection: &mut MySqlConnection) -> Result<Vec<CategoryName>, Error> {
    let names: Vec<String> = sqlx::query_scalar("SELECT name FROM categories ORDER BY name ASC")
        .fetch_all(&mut *connection)
        .await?;

    Ok(names
        .iter()
        .map(|name| CategoryName::new_unchecked(name))
        .collect())
}

async fn exists_mysql(name: &CategoryName, connection: &mut MySqlConnection) -> Result<bool, Error> {
    let found: Option<String> = sqlx::query_scalar("SELECT name FROM categories WHERE name = ?")
        .bind(name.as_ref())
        .fetch_optional(&mut *connection)
        .await?;

    Ok(found.is_some())
}

async fn seed_mysql(connection: &mut MySqlConnection) -> Result<(), Error> {
    for name in DEFAULT_CATEGORIES {
        sqlx::query("INSERT IGNORE INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(&mut *connection)
            .await?;
    }

    Ok(())
}
