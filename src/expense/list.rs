//! Endpoint for listing expenses.

use axum::Json;
use axum_extra::extract::{Query, WithRejection};

use crate::{
    Error,
    db::DbConnection,
    expense::{CategoryFilter, Expense, ExpenseListQuery, get_expenses},
};

/// A route handler for listing expenses, most recently registered first.
///
/// `?category=` and `?categories=` restrict the listing to the named
/// categories. Names that match no expense simply contribute nothing.
pub async fn list_expenses_endpoint(
    mut connection: DbConnection,
    WithRejection(Query(query), _): WithRejection<Query<ExpenseListQuery>, Error>,
) -> Result<Json<Vec<Expense>>, Error> {
    let filter = CategoryFilter::from(&query);

    get_expenses(&filter, &mut connection).await.map(Json)
}
