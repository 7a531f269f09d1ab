//! Parsing and storage formats for expense registration timestamps.

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef},
};
use time::{
    Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::Error;

/// Fixed-width UTC text used for the SQLite column so that ordering the text
/// orders the timestamps.
const STORAGE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
);

/// Date-times without an offset, tried in order after RFC 3339.
const NAIVE_FORMATS: &[&[BorrowedFormatItem<'_>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
];

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parse a client supplied timestamp.
///
/// Accepts RFC 3339, a naive date-time (as produced by HTML `datetime-local`
/// inputs) or a bare date. Naive values are taken to be UTC. The result is
/// normalized with [normalize].
///
/// # Errors
///
/// Returns [Error::InvalidTimestamp] if `text` matches none of the formats.
pub fn parse(text: &str) -> Result<OffsetDateTime, Error> {
    let text = text.trim();

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(normalize(date_time));
    }

    for format in NAIVE_FORMATS {
        if let Ok(date_time) = PrimitiveDateTime::parse(text, *format) {
            return Ok(normalize(date_time.assume_utc()));
        }
    }

    if let Ok(date) = time::Date::parse(text, DATE_FORMAT) {
        return Ok(date.midnight().assume_utc());
    }

    Err(Error::InvalidTimestamp(text.to_owned()))
}

/// Convert to UTC and drop anything finer than a microsecond, the finest
/// precision both stores keep.
pub fn normalize(date_time: OffsetDateTime) -> OffsetDateTime {
    let date_time = date_time.to_offset(UtcOffset::UTC);
    let sub_microsecond = date_time.nanosecond() % 1_000;

    date_time - Duration::nanoseconds(sub_microsecond as i64)
}

/// The current time, normalized.
pub fn now() -> OffsetDateTime {
    normalize(OffsetDateTime::now_utc())
}

/// Format a timestamp for the SQLite `data_registro` column.
fn to_storage(date_time: OffsetDateTime) -> Result<String, time::error::Format> {
    normalize(date_time).format(STORAGE_FORMAT)
}

/// Parse a value read back from the SQLite `data_registro` column.
fn from_storage(text: &str) -> Result<OffsetDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(text, STORAGE_FORMAT).map(PrimitiveDateTime::assume_utc)
}

/// Strip the offset for the MySQL `DATETIME` column, which holds UTC.
pub(crate) fn to_utc_primitive(date_time: OffsetDateTime) -> PrimitiveDateTime {
    let date_time = normalize(date_time);

    PrimitiveDateTime::new(date_time.date(), date_time.time())
}

/// A timestamp in the SQLite text form written by [to_storage].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StoredTimestamp(pub OffsetDateTime);

impl ToSql for StoredTimestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        to_storage(self.0)
            .map(|text| ToSqlOutput::Owned(Value::Text(text)))
            .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error)))
    }
}

impl FromSql for StoredTimestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        from_storage(value.as_str()?)
            .map(StoredTimestamp)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
