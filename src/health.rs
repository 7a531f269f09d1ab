//! The health check endpoint.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::Database;

/// A route handler that reports whether the database answers a trivial query.
///
/// Responds with 200 if it does, and 500 with the database error otherwise.
pub async fn get_health(State(database): State<Database>) -> Response {
    match database.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "db": "connected" })),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Health check failed: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "db": error.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use serde_json::Value;
    use sqlx::mysql::MySqlPoolOptions;

    use crate::db::Database;

    use super::get_health;

    #[tokio::test]
    async fn healthy_database_responds_ok() {
        let database = Database::sqlite(Connection::open_in_memory().unwrap()).unwrap();

        let response = get_health(State(database)).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unreachable_database_responds_with_500() {
        let pool = MySqlPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy("mysql://despesas@127.0.0.1:1/despesas")
            .expect("Could not create lazy pool");

        let response = get_health(State(Database::MySql(pool))).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not read response body");
        let body: Value = serde_json::from_slice(&bytes).expect("Body is not JSON");
        assert_eq!(body["status"], "error");
        assert!(body["db"].as_str().is_some_and(|message| !message.is_empty()));
    }
}
