//! Expenses: money spent, filed under a category.

mod create;
mod db;
mod delete;
mod domain;
mod filter;
mod get;
mod list;
mod update;

pub use create::create_expense_endpoint;
pub use db::{
    create_expense, create_expense_table, delete_expense, get_expense, get_expenses,
    update_expense,
};
pub use delete::delete_expense_endpoint;
pub use domain::{Expense, ExpenseForm, ExpenseId, MAX_DESCRICAO_LENGTH, NewExpense};
pub use filter::{CategoryFilter, ExpenseListQuery};
pub use get::get_expense_endpoint;
pub use list::list_expenses_endpoint;
pub use update::update_expense_endpoint;
