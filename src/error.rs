//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A category with the same name is already in the database.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategory(String),

    /// One or more required fields were absent, null or blank.
    ///
    /// Holds the names of the missing fields in the order they are declared
    /// in the request schema.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The category on an expense does not refer to a known category.
    #[error("the category \"{0}\" does not exist")]
    InvalidCategory(String),

    /// The registration timestamp could not be parsed.
    #[error("could not parse \"{0}\" as a date-time, expected a format like 2025-01-31T18:30:00Z")]
    InvalidTimestamp(String),

    /// A text field is longer than the database column that holds it.
    #[error("{field} must be at most {max} characters long")]
    FieldTooLong {
        /// The name of the field in the request schema.
        field: &'static str,
        /// The maximum length in characters.
        max: usize,
    },

    /// The query string could not be parsed.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// The request body was not valid JSON or did not match the request schema.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The path exists but does not accept the request method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The connection target names a database the server cannot talk to.
    #[error("unsupported database \"{0}\", expected a SQLite path or a mysql:// URL")]
    UnsupportedDatabase(String),

    /// An unhandled/unexpected SQLite error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An unhandled/unexpected MySQL error.
    ///
    /// `sqlx` errors are not comparable, so only the message is kept.
    #[error("an unexpected MySQL error occurred: {0}")]
    MySqlError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => Error::NotFound,
            error => Error::MySqlError(error.to_string()),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidQuery(rejection.to_string())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("rejected request path: {}", rejection.body_text());
        Error::NotFound
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyCategoryName
            | Error::MissingFields(_)
            | Error::InvalidCategory(_)
            | Error::InvalidTimestamp(_)
            | Error::FieldTooLong { .. }
            | Error::InvalidQuery(_)
            | Error::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateCategory(_) => StatusCode::CONFLICT,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::UnsupportedDatabase(_) | Error::SqlError(_) | Error::MySqlError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Database internals are only meant for the server logs.
            tracing::error!("An unexpected error occurred: {}", self);
            "an unexpected error occurred, check the server logs for more details".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::{Value, json};

    use super::Error;

    async fn body_json(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not read response body");

        (status, serde_json::from_slice(&bytes).expect("Body is not JSON"))
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let (status, body) = body_json(Error::MissingFields(vec!["valor", "categoria"])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "missing required fields: valor, categoria" })
        );
    }

    #[tokio::test]
    async fn duplicate_category_is_conflict() {
        let (status, body) = body_json(Error::DuplicateCategory("Lazer".to_owned())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "the category \"Lazer\" already exists" }));
    }

    #[tokio::test]
    async fn database_errors_hide_details() {
        let (status, body) = body_json(Error::MySqlError("secret connection string".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"].as_str().unwrap().contains("secret"));
    }

    #[tokio::test]
    async fn field_too_long_is_bad_request() {
        let (status, body) = body_json(Error::FieldTooLong {
            field: "categoria",
            max: 50,
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "categoria must be at most 50 characters long" })
        );
    }

    #[tokio::test]
    async fn method_not_allowed_is_405() {
        let (status, body) = body_json(Error::MethodNotAllowed).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "method not allowed" }));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
        assert_eq!(Error::from(sqlx::Error::RowNotFound), Error::NotFound);
    }
}
