//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/expenses/{id}', use [format_endpoint].

/// The route for checking that the server can reach its database.
pub const HEALTH: &str = "/health";
/// The route for listing and creating categories.
pub const CATEGORIES: &str = "/categories";
/// The route for listing and creating expenses.
pub const EXPENSES: &str = "/expenses";
/// The route for getting, replacing and deleting a single expense.
pub const EXPENSE: &str = "/expenses/{id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Only the first `{...}` parameter is replaced. If there is no parameter the
/// path is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => format!(
            "{}{id}{}",
            &endpoint_path[..start],
            &endpoint_path[end + 1..]
        ),
        _ => endpoint_path.to_owned(),
    }
}
