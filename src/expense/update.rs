//! Endpoint for replacing an expense.

use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use crate::{
    Error,
    config::CategoryMode,
    db::DbConnection,
    expense::{ExpenseForm, ExpenseId, create::check_category, get_expense, update_expense},
};

/// A route handler for replacing the fields of an expense.
///
/// Responds with 404 if the expense does not exist, before the body is
/// validated. Omitting `data_registro` keeps the stored registration time.
pub async fn update_expense_endpoint(
    State(category_mode): State<CategoryMode>,
    mut connection: DbConnection,
    WithRejection(Path(id), _): WithRejection<Path<ExpenseId>, Error>,
    WithRejection(Json(form), _): WithRejection<Json<ExpenseForm>, Error>,
) -> Result<Json<Value>, Error> {
    get_expense(id, &mut connection).await?;

    let expense = form.validate()?;
    check_category(&expense.categoria, category_mode, &mut connection).await?;

    update_expense(id, &expense, &mut connection)
        .await
        .inspect_err(|error| {
            if *error != Error::NotFound {
                tracing::error!("Could not update expense {id}: {error}");
            }
        })?;

    tracing::info!("Updated expense {id}");

    Ok(Json(json!({ "updated": id })))
}

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;

    use axum::{
        Json,
        extract::{Path, State},
    };
    use axum_extra::extract::WithRejection;
    use rusqlite::Connection;
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Error,
        category::{CategoryName, create_category},
        config::CategoryMode,
        db::Database,
        expense::{ExpenseForm, ExpenseId, NewExpense, create_expense, get_expense},
    };

    use super::update_expense_endpoint;

    async fn get_test_database() -> (Database, ExpenseId) {
        let database = Database::sqlite(Connection::open_in_memory().unwrap())
            .expect("Could not initialize database");
        let mut connection = database.acquire().await.unwrap();
        create_category(&CategoryName::new_unchecked("Lazer"), &mut connection)
            .await
            .unwrap();
        let id = create_expense(
            &NewExpense {
                valor: 10.0,
                descricao: "Cinema".to_owned(),
                categoria: CategoryName::new_unchecked("Lazer"),
                data_registro: Some(datetime!(2025-01-15 12:00 UTC)),
            },
            &mut connection,
        )
        .await
        .unwrap();

        drop(connection);
        (database, id)
    }

    fn form(categoria: &str) -> ExpenseForm {
        ExpenseForm {
            valor: Some(42.0),
            descricao: Some("Teatro".to_owned()),
            categoria: Some(categoria.to_owned()),
            data_registro: None,
        }
    }

    #[tokio::test]
    async fn can_update_expense() {
        let (database, id) = get_test_database().await;

        let Json(body) = update_expense_endpoint(
            State(CategoryMode::Validated),
            database.acquire().await.unwrap(),
            WithRejection(Path(id), PhantomData),
            WithRejection(Json(form("Lazer")), PhantomData),
        )
        .await
        .expect("Could not update expense");

        assert_eq!(body, json!({ "updated": id }));
        let got = get_expense(id, &mut database.acquire().await.unwrap())
            .await
            .unwrap();
        assert_eq!(got.valor, 42.0);
        assert_eq!(got.descricao, "Teatro");
        assert_eq!(got.data_registro, datetime!(2025-01-15 12:00 UTC));
    }

    #[tokio::test]
    async fn missing_expense_is_reported_before_invalid_body() {
        let (database, id) = get_test_database().await;

        let result = update_expense_endpoint(
            State(CategoryMode::Validated),
            database.acquire().await.unwrap(),
            WithRejection(Path(id + 1), PhantomData),
            WithRejection(Json(ExpenseForm::default()), PhantomData),
        )
        .await;

        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn validated_mode_rejects_unknown_category() {
        let (database, id) = get_test_database().await;

        let result = update_expense_endpoint(
            State(CategoryMode::Validated),
            database.acquire().await.unwrap(),
            WithRejection(Path(id), PhantomData),
            WithRejection(Json(form("Mercado")), PhantomData),
        )
        .await;

        assert!(matches!(result, Err(Error::InvalidCategory(_))));
        let got = get_expense(id, &mut database.acquire().await.unwrap())
            .await
            .unwrap();
        assert_eq!(got.descricao, "Cinema");
    }
}
