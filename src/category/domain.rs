//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The longest category name, in characters, that fits the MySQL column.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 50;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty or only whitespace, or an [Error::FieldTooLong] if it has more
    /// than [MAX_CATEGORY_NAME_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
            Err(Error::FieldTooLong {
                field: "name",
                max: MAX_CATEGORY_NAME_LENGTH,
            })
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty and is trimmed.
    /// Used for names read back from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request body for creating a category.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryForm {
    /// Absent and `null` are treated like an empty name.
    #[serde(default)]
    pub name: Option<String>,
}
