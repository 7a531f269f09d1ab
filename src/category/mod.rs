//! Categories that expenses are filed under.

mod create;
mod db;
mod domain;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    DEFAULT_CATEGORIES, category_exists, create_category, create_category_table,
    get_all_categories, seed_default_categories,
};
pub use domain::{CategoryForm, CategoryName, MAX_CATEGORY_NAME_LENGTH};
pub use list::list_categories_endpoint;
