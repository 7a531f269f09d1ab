//! Core expense domain types and request validation.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{CategoryName, MAX_CATEGORY_NAME_LENGTH},
    timestamp,
};

/// The longest description, in characters, that fits the MySQL column.
pub const MAX_DESCRICAO_LENGTH: usize = 255;

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// A record of money spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the database.
    pub id: ExpenseId,
    /// The amount of money spent.
    pub valor: f64,
    /// What the money was spent on.
    pub descricao: String,
    /// The category the expense is filed under.
    pub categoria: CategoryName,
    /// When the expense was registered.
    #[serde(with = "time::serde::rfc3339")]
    pub data_registro: OffsetDateTime,
}

/// Request body for creating or replacing an expense.
///
/// Every field is optional here so that missing fields can be reported
/// together by [ExpenseForm::validate] rather than one at a time by the JSON
/// parser.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// The amount spent, required.
    pub valor: Option<f64>,
    /// The description, required.
    pub descricao: Option<String>,
    /// The category name, required.
    pub categoria: Option<String>,
    /// Any format accepted by [timestamp::parse]. Blank counts as absent.
    pub data_registro: Option<String>,
}

/// A validated expense ready to be written to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The amount spent.
    pub valor: f64,
    /// The trimmed description.
    pub descricao: String,
    /// The trimmed category name.
    pub categoria: CategoryName,
    /// `None` means "now" on create and "keep the stored value" on update.
    pub data_registro: Option<OffsetDateTime>,
}

impl ExpenseForm {
    /// Check the required fields and parse the optional timestamp.
    ///
    /// Text fields are trimmed, a field that is blank after trimming is
    /// treated as missing.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingFields] naming every missing required field,
    /// [Error::FieldTooLong] if `descricao` or `categoria` does not fit its
    /// column, or [Error::InvalidTimestamp] if `data_registro` cannot be parsed.
    pub fn validate(self) -> Result<NewExpense, Error> {
        let descricao = non_blank(self.descricao);
        let categoria = non_blank(self.categoria);

        let (valor, descricao, categoria) = match (self.valor, descricao, categoria) {
            (Some(valor), Some(descricao), Some(categoria)) => (valor, descricao, categoria),
            (valor, descricao, categoria) => {
                let missing = [
                    ("valor", valor.is_none()),
                    ("descricao", descricao.is_none()),
                    ("categoria", categoria.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, is_missing)| is_missing.then_some(field))
                .collect();

                return Err(Error::MissingFields(missing));
            }
        };

        check_length("descricao", &descricao, MAX_DESCRICAO_LENGTH)?;
        check_length("categoria", &categoria, MAX_CATEGORY_NAME_LENGTH)?;

        let data_registro = non_blank(self.data_registro)
            .map(|text| timestamp::parse(&text))
            .transpose()?;

        Ok(NewExpense {
            valor,
            descricao,
            categoria: CategoryName::new_unchecked(&categoria),
            data_registro,
        })
    }
}

fn check_length(field: &'static str, text: &str, max: usize) -> Result<(), Error> {
    if text.chars().count() > max {
        return Err(Error::FieldTooLong { field, max });
    }

    Ok(())
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
