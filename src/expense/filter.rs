//! Category filters for listing expenses.
//!
//! The filter only ever writes placeholders into the SQL text, the category
//! names themselves are always bound as parameters.

use serde::Deserialize;
use sqlx::{MySql, QueryBuilder};

use crate::category::CategoryName;

/// Query string parameters accepted when listing expenses.
///
/// Both parameters hold comma-separated category names, e.g.
/// `?category=Lazer,Moradia`, and may be repeated. The union of every value
/// is used.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseListQuery {
    /// Comma-separated category names.
    #[serde(default)]
    pub category: Vec<String>,
    /// Comma-separated category names, an alias for `category`.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A set of categories to restrict a listing to.
///
/// An empty filter matches every expense.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    names: Vec<CategoryName>,
}

impl CategoryFilter {
    /// Build a filter from comma-separated lists of names.
    ///
    /// Names are trimmed, blank entries dropped and repeats removed, keeping
    /// the first occurrence.
    pub fn parse<'a>(lists: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names: Vec<CategoryName> = Vec::new();

        for name in lists
            .into_iter()
            .flat_map(|list| list.split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(CategoryName::new_unchecked)
        {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        Self { names }
    }

    /// Whether the filter matches every expense.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The category names, in the order they were first given.
    pub fn names(&self) -> &[CategoryName] {
        &self.names
    }

    /// The `WHERE` clause for SQLite, using numbered placeholders starting at `?1`.
    ///
    /// Returns an empty string for an empty filter. Bind [CategoryFilter::names]
    /// in order.
    pub fn sqlite_where_clause(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let placeholders = (1..=self.names.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!(" WHERE categoria IN ({placeholders})")
    }

    /// Append the `WHERE` clause to a MySQL query, binding each name.
    ///
    /// Does nothing for an empty filter.
    pub fn push_mysql_where_clause<'args>(&'args self, builder: &mut QueryBuilder<'args, MySql>) {
        if self.is_empty() {
            return;
        }

        builder.push(" WHERE categoria IN (");
        let mut separated = builder.separated(", ");
        for name in &self.names {
            separated.push_bind(name.as_ref());
        }
        separated.push_unseparated(")");
    }
}

impl From<&ExpenseListQuery> for CategoryFilter {
    fn from(query: &ExpenseListQuery) -> Self {
        CategoryFilter::parse(
            query
                .category
                .iter()
                .chain(&query.categories)
                .map(String::as_str),
        )
    }
}

#[cfg(test)]
mod tests {
    use sqlx::{Execute, MySql, QueryBuilder};

    use crate::category::CategoryName;

    use super::{CategoryFilter, ExpenseListQuery};

    #[test]
    fn parse_trims_and_drops_blank_names() {
        let filter = CategoryFilter::parse([" Lazer , ,Moradia,"]);

        assert_eq!(
            filter.names(),
            &[
                CategoryName::new_unchecked("Lazer"),
                CategoryName::new_unchecked("Moradia")
            ]
        );
    }

    #[test]
    fn parse_removes_repeats() {
        let filter = CategoryFilter::parse(["Lazer,Moradia", "Lazer"]);

        assert_eq!(filter.names().len(), 2);
    }

    #[test]
    fn blank_parameter_is_empty_filter() {
        let filter = CategoryFilter::parse([" , "]);

        assert!(filter.is_empty());
        assert_eq!(filter.sqlite_where_clause(), "");
    }

    #[test]
    fn both_query_parameters_are_combined() {
        let query = ExpenseListQuery {
            category: vec!["Lazer".to_owned()],
            categories: vec!["Moradia,Lazer".to_owned()],
        };

        let filter = CategoryFilter::from(&query);

        assert_eq!(
            filter.names(),
            &[
                CategoryName::new_unchecked("Lazer"),
                CategoryName::new_unchecked("Moradia")
            ]
        );
    }

    #[test]
    fn long_names_are_kept() {
        let name = "x".repeat(80);

        let filter = CategoryFilter::parse([name.as_str()]);

        assert_eq!(filter.names(), &[CategoryName::new_unchecked(&name)]);
    }

    #[test]
    fn sqlite_clause_only_contains_placeholders() {
        let filter = CategoryFilter::parse(["Lazer,'); DROP TABLE expenses; --"]);

        let clause = filter.sqlite_where_clause();

        assert_eq!(clause, " WHERE categoria IN (?1, ?2)");
    }

    #[test]
    fn mysql_clause_only_contains_placeholders() {
        let filter = CategoryFilter::parse(["Lazer,Moradia,Saúde"]);
        let mut builder = QueryBuilder::<MySql>::new("SELECT id FROM expenses");

        filter.push_mysql_where_clause(&mut builder);

        assert_eq!(
            builder.build().sql(),
            "SELECT id FROM expenses WHERE categoria IN (?, ?, ?)"
        );
    }
}
