//! Endpoint for registering expenses.

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use crate::{
    Error,
    category::{CategoryName, category_exists},
    config::CategoryMode,
    db::DbConnection,
    expense::{ExpenseForm, create_expense},
};

/// A route handler for registering an expense, responds with the new ID.
///
/// Responds with 400 if a required field is missing, the timestamp cannot be
/// parsed, or, when categories are validated, the category does not exist.
pub async fn create_expense_endpoint(
    State(category_mode): State<CategoryMode>,
    mut connection: DbConnection,
    WithRejection(Json(form), _): WithRejection<Json<ExpenseForm>, Error>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let expense = form.validate()?;
    check_category(&expense.categoria, category_mode, &mut connection).await?;

    let id = create_expense(&expense, &mut connection)
        .await
        .inspect_err(|error| {
            tracing::error!("An unexpected error occurred while creating an expense: {error}")
        })?;

    tracing::info!("Created expense {id} in {}", expense.categoria);

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Reject `categoria` if categories are validated and it has not been created.
pub(super) async fn check_category(
    categoria: &CategoryName,
    category_mode: CategoryMode,
    connection: &mut DbConnection,
) -> Result<(), Error> {
    match category_mode {
        CategoryMode::FreeText => Ok(()),
        CategoryMode::Validated => {
            if category_exists(categoria, connection).await? {
                Ok(())
            } else {
                Err(Error::InvalidCategory(categoria.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;

    use axum::{Json, extract::State, http::StatusCode};
    use axum_extra::extract::WithRejection;
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{CategoryName, create_category},
        config::CategoryMode,
        db::Database,
        expense::{ExpenseForm, get_expense},
    };

    use super::create_expense_endpoint;

    async fn get_test_database() -> Database {
        let database = Database::sqlite(Connection::open_in_memory().unwrap())
            .expect("Could not initialize database");
        create_category(
            &CategoryName::new_unchecked("Lazer"),
            &mut database.acquire().await.unwrap(),
        )
        .await
        .expect("Could not create category");

        database
    }

    fn form(categoria: &str) -> ExpenseForm {
        ExpenseForm {
            valor: Some(25.5),
            descricao: Some("Cinema".to_owned()),
            categoria: Some(categoria.to_owned()),
            data_registro: None,
        }
    }

    #[tokio::test]
    async fn can_create_expense() {
        let database = get_test_database().await;

        let (status, Json(body)) = create_expense_endpoint(
            State(CategoryMode::Validated),
            database.acquire().await.unwrap(),
            WithRejection(Json(form("Lazer")), PhantomData),
        )
        .await
        .expect("Could not create expense");

        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_i64().expect("Response should contain an ID");
        let got = get_expense(id, &mut database.acquire().await.unwrap())
            .await
            .unwrap();
        assert_eq!(got.descricao, "Cinema");
    }

    #[tokio::test]
    async fn validated_mode_rejects_unknown_category() {
        let database = get_test_database().await;

        let result = create_expense_endpoint(
            State(CategoryMode::Validated),
            database.acquire().await.unwrap(),
            WithRejection(Json(form("Mercado")), PhantomData),
        )
        .await;

        assert!(matches!(result, Err(Error::InvalidCategory(name)) if name == "Mercado"));
    }

    #[tokio::test]
    async fn free_text_mode_accepts_unknown_category() {
        let database = get_test_database().await;

        let result = create_expense_endpoint(
            State(CategoryMode::FreeText),
            database.acquire().await.unwrap(),
            WithRejection(Json(form("Mercado")), PhantomData),
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn missing_fields_are_checked_before_category() {
        let database = get_test_database().await;
        let form = ExpenseForm {
            categoria: Some("Mercado".to_owned()),
            ..Default::default()
        };

        let result = create_expense_endpoint(
            State(CategoryMode::Validated),
            database.acquire().await.unwrap(),
            WithRejection(Json(form), PhantomData),
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::MissingFields(fields)) if fields == vec!["valor", "descricao"]
        ));
    }
}
