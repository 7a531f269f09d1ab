//! Endpoint for creating categories.

use axum::{Json, http::StatusCode};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use crate::{
    Error,
    category::{CategoryForm, CategoryName, create_category},
    db::DbConnection,
};

/// A route handler for creating a category, responds with the stored name.
///
/// Responds with 400 if the name is blank and 409 if it already exists.
pub async fn create_category_endpoint(
    mut connection: DbConnection,
    WithRejection(Json(form), _): WithRejection<Json<CategoryForm>, Error>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let name = CategoryName::new(form.name.as_deref().unwrap_or_default())?;

    create_category(&name, &mut connection).await.map_err(|error| {
        if !matches!(error, Error::DuplicateCategory(_)) {
            tracing::error!("An unexpected error occurred while creating a category: {error}");
        }
        error
    })?;

    tracing::info!("Created category {name}");

    Ok((StatusCode::CREATED, Json(json!({ "created": name }))))
}

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;

    use axum::{Json, http::StatusCode};
    use axum_extra::extract::WithRejection;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        Error,
        category::{CategoryForm, CategoryName, create_category_endpoint, get_all_categories},
        db::Database,
    };

    fn get_test_database() -> Database {
        Database::sqlite(Connection::open_in_memory().unwrap())
            .expect("Could not initialize database")
    }

    #[tokio::test]
    async fn can_create_category() {
        let database = get_test_database();
        let form = CategoryForm {
            name: Some(" Lazer ".to_owned()),
        };

        let (status, Json(body)) = create_category_endpoint(
            database.acquire().await.unwrap(),
            WithRejection(Json(form), PhantomData),
        )
        .await
        .expect("Could not create category");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "created": "Lazer" }));
        assert_eq!(
            get_all_categories(&mut database.acquire().await.unwrap()).await,
            Ok(vec![CategoryName::new_unchecked("Lazer")])
        );
    }

    #[tokio::test]
    async fn create_category_fails_on_missing_name() {
        let database = get_test_database();

        let result = create_category_endpoint(
            database.acquire().await.unwrap(),
            WithRejection(Json(CategoryForm::default()), PhantomData),
        )
        .await;

        assert!(matches!(result, Err(Error::EmptyCategoryName)));
    }
}
