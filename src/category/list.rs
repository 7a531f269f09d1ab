//! Endpoint for listing categories.

use axum::Json;

use crate::{
    Error,
    category::{CategoryName, get_all_categories},
    db::DbConnection,
};

/// A route handler that responds with every category name, sorted by name.
pub async fn list_categories_endpoint(
    mut connection: DbConnection,
) -> Result<Json<Vec<CategoryName>>, Error> {
    get_all_categories(&mut connection).await.map(Json)
}
