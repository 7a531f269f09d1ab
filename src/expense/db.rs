//! Database operations for expenses.

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use sqlx::{MySql, MySqlConnection, QueryBuilder, Row as _, mysql::MySqlRow};
use time::PrimitiveDateTime;

use crate::{
    Error,
    category::CategoryName,
    db::DbConnection,
    expense::{CategoryFilter, Expense, ExpenseId, NewExpense},
    timestamp::{self, StoredTimestamp},
};

type RowsAffected = u64;

/// Insert an expense and return its generated ID.
///
/// An expense without a registration time is registered now.
pub async fn create_expense(
    expense: &NewExpense,
    connection: &mut DbConnection,
) -> Result<ExpenseId, Error> {
    match connection {
        DbConnection::Sqlite(connection) => insert_sqlite(expense, connection),
        DbConnection::MySql(connection) => insert_mysql(expense, connection).await,
    }
}

/// Retrieve a single expense by ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no expense with `id`.
pub async fn get_expense(id: ExpenseId, connection: &mut DbConnection) -> Result<Expense, Error> {
    match connection {
        DbConnection::Sqlite(connection) => select_sqlite(id, connection),
        DbConnection::MySql(connection) => select_mysql(id, connection).await,
    }
}

/// Retrieve the expenses matching `filter`, most recently registered first.
///
/// Expenses registered at the same time are ordered by descending ID.
pub async fn get_expenses(
    filter: &CategoryFilter,
    connection: &mut DbConnection,
) -> Result<Vec<Expense>, Error> {
    match connection {
        DbConnection::Sqlite(connection) => select_many_sqlite(filter, connection),
        DbConnection::MySql(connection) => select_many_mysql(filter, connection).await,
    }
}

/// Replace the amount, description and category of an expense.
///
/// The registration time is only replaced when `expense` has one.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no expense with `id`.
pub async fn update_expense(
    id: ExpenseId,
    expense: &NewExpense,
    connection: &mut DbConnection,
) -> Result<(), Error> {
    match connection {
        DbConnection::Sqlite(connection) => update_sqlite(id, expense, connection),
        DbConnection::MySql(connection) => update_mysql(id, expense, connection).await,
    }
}

/// Delete an expense, returning the number of rows deleted.
///
/// Deleting an ID that does not exist is not an error and deletes nothing.
pub async fn delete_expense(
    id: ExpenseId,
    connection: &mut DbConnection,
) -> Result<RowsAffected, Error> {
    match connection {
        DbConnection::Sqlite(connection) => delete_sqlite(id, connection),
        DbConnection::MySql(connection) => delete_mysql(id, connection).await,
    }
}

/// Initialize the expense table and indexes.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            valor REAL NOT NULL,
            descricao TEXT NOT NULL,
            categoria TEXT NOT NULL,
            data_registro TEXT NOT NULL
                DEFAULT (strftime('%Y-%m-%dT%H:%M:%S', 'now') || '.000000Z')
        );

        CREATE INDEX IF NOT EXISTS idx_expenses_categoria ON expenses(categoria);
        CREATE INDEX IF NOT EXISTS idx_expenses_data_registro ON expenses(data_registro);",
    )?;

    Ok(())
}

const SELECT_SQLITE: &str = "SELECT id, valor, descricao, categoria, data_registro FROM expenses";

// DECIMAL is cast so that it decodes as f64.
const SELECT_MYSQL: &str =
    "SELECT id, CAST(valor AS DOUBLE) AS valor, descricao, categoria, data_registro FROM expenses";

const ORDER_BY: &str = " ORDER BY data_registro DESC, id DESC";

fn insert_sqlite(expense: &NewExpense, connection: &Connection) -> Result<ExpenseId, Error> {
    let data_registro = expense.data_registro.unwrap_or_else(timestamp::now);

    connection
        .prepare(
            "INSERT INTO expenses (valor, descricao, categoria, data_registro)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id",
        )?
        .query_row(
            (
                expense.valor,
                &expense.descricao,
                expense.categoria.as_ref(),
                StoredTimestamp(data_registro),
            ),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn select_sqlite(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(&format!("{SELECT_SQLITE} WHERE id = :id;"))?
        .query_row(&[(":id", &id)], map_sqlite_row)
        .map_err(|error| error.into())
}

fn select_many_sqlite(
    filter: &CategoryFilter,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let query = format!(
        "{SELECT_SQLITE}{}{ORDER_BY};",
        filter.sqlite_where_clause()
    );
    let params = params_from_iter(
        filter
            .names()
            .iter()
            .map(|name| Value::Text(name.to_string())),
    );

    connection
        .prepare(&query)?
        .query_map(params, map_sqlite_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

fn update_sqlite(id: ExpenseId, expense: &NewExpense, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expenses
         SET valor = ?1, descricao = ?2, categoria = ?3,
             data_registro = COALESCE(?4, data_registro)
         WHERE id = ?5",
        (
            expense.valor,
            &expense.descricao,
            expense.categoria.as_ref(),
            expense.data_registro.map(StoredTimestamp),
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn delete_sqlite(id: ExpenseId, connection: &Connection) -> Result<RowsAffected, Error> {
    let rows_affected = connection.execute("DELETE FROM expenses WHERE id = :id", &[(":id", &id)])?;

    Ok(rows_affected as RowsAffected)
}

fn map_sqlite_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let raw_categoria: String = row.get(3)?;
    let StoredTimestamp(data_registro) = row.get(4)?;

    Ok(Expense {
        id: row.get(0)?,
        valor: row.get(1)?,
        descricao: row.get(2)?,
        categoria: CategoryName::new_unchecked(&raw_categoria),
        data_registro,
    })
}

async fn insert_mysql(
    expense: &NewExpense,
    connection: &mut MySqlConnection,
) -> Result<ExpenseId, Error> {
    let data_registro = expense.data_registro.unwrap_or_else(timestamp::now);

    let result = sqlx::query(
        "INSERT INTO expenses (valor, descricao, categoria, data_registro) VALUES (?, ?, ?, ?)",
    )
    .bind(expense.valor)
    .bind(&expense.descricao)
    .bind(expense.categoria.as_ref())
    .bind(timestamp::to_utc_primitive(data_registro))
    .execute(&mut *connection)
    .await?;

    Ok(result.last_insert_id() as ExpenseId)
}

async fn select_mysql(id: ExpenseId, connection: &mut MySqlConnection) -> Result<Expense, Error> {
    let row = sqlx::query(&format!("{SELECT_MYSQL} WHERE id = ?"))
        .bind(id)
        .fetch_one(&mut *connection)
        .await?;

    map_mysql_row(&row).map_err(|error| error.into())
}

async fn select_many_mysql(
    filter: &CategoryFilter,
    connection: &mut MySqlConnection,
) -> Result<Vec<Expense>, Error> {
    let mut builder = QueryBuilder::<MySql>::new(SELECT_MYSQL);
    filter.push_mysql_where_clause(&mut builder);
    builder.push(ORDER_BY);

    let rows = builder.build().fetch_all(&mut *connection).await?;

    rows.iter()
        .map(|row| map_mysql_row(row).map_err(|error| error.into()))
        .collect()
}

async fn update_mysql(
    id: ExpenseId,
    expense: &NewExpense,
    connection: &mut MySqlConnection,
) -> Result<(), Error> {
    // MySQL reports rows changed rather than rows matched, so an update that
    // writes identical values says zero rows. Check for the row instead.
    let found: Option<ExpenseId> = sqlx::query_scalar("SELECT id FROM expenses WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *connection)
        .await?;

    if found.is_none() {
        return Err(Error::NotFound);
    }

    sqlx::query(
        "UPDATE expenses
         SET valor = ?, descricao = ?, categoria = ?,
             data_registro = COALESCE(?, data_registro)
         WHERE id = ?",
    )
    .bind(expense.valor)
    .bind(&expense.descricao)
    .bind(expense.categoria.as_ref())
    .bind(expense.data_registro.map(timestamp::to_utc_primitive))
    .bind(id)
    .execute(&mut *connection)
    .await?;

    Ok(())
}

async fn delete_mysql(id: ExpenseId, connection: &mut MySqlConnection) -> Result<RowsAffected, Error> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(id)
        .execute(&mut *connection)
        .await?;

    Ok(result.rows_affected())
}

fn map_mysql_row(row: &MySqlRow) -> Result<Expense, sqlx::Error> {
    let raw_categoria: String = row.try_get("categoria")?;
    let data_registro: PrimitiveDateTime = row.try_get("data_registro")?;

    Ok(Expense {
        id: row.try_get("id")?,
        valor: row.try_get("valor")?,
        descricao: row.try_get("descricao")?,
        categoria: CategoryName::new_unchecked(&raw_categoria),
        data_registro: data_registro.assume_utc(),
    })
}
