//! Endpoint for deleting expenses.

use axum::{Json, extract::Path};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use crate::{
    Error,
    db::DbConnection,
    expense::{ExpenseId, delete_expense},
};

/// A route handler for deleting an expense.
///
/// Deleting an expense that does not exist still responds with 200, so the
/// request can be safely retried.
pub async fn delete_expense_endpoint(
    mut connection: DbConnection,
    WithRejection(Path(id), _): WithRejection<Path<ExpenseId>, Error>,
) -> Result<Json<Value>, Error> {
    match delete_expense(id, &mut connection).await {
        Ok(0) => tracing::debug!("Expense {id} was already deleted"),
        Ok(_) => tracing::info!("Deleted expense {id}"),
        Err(error) => {
            tracing::error!("Could not delete expense {id}: {error}");
            return Err(error);
        }
    }

    Ok(Json(json!({ "deleted": id })))
}
