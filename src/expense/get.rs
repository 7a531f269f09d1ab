//! Endpoint for getting a single expense.

use axum::{Json, extract::Path};
use axum_extra::extract::WithRejection;

use crate::{
    Error,
    db::DbConnection,
    expense::{Expense, ExpenseId, get_expense},
};

/// A route handler for getting a single expense, responds with 404 if it does not exist.
pub async fn get_expense_endpoint(
    mut connection: DbConnection,
    WithRejection(Path(id), _): WithRejection<Path<ExpenseId>, Error>,
) -> Result<Json<Expense>, Error> {
    get_expense(id, &mut connection).await.map(Json)
}
