//! Application router configuration.

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    AppState, Error,
    category::{create_category_endpoint, list_categories_endpoint},
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expense_endpoint,
        list_expenses_endpoint, update_expense_endpoint,
    },
    health::get_health,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .put(update_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .fallback(get_404_not_found)
        .method_not_allowed_fallback(get_405_method_not_allowed)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}

async fn get_405_method_not_allowed() -> Response {
    Error::MethodNotAllowed.into_response()
}
