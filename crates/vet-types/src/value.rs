//! Parameter values bound into INSERT statements.

use chrono::{Datelike, NaiveDate};
use mysql_async::Value;

/// A single column value of a seeded row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedValue {
    Text(String),
    Int(i64),
    Date(NaiveDate),
}

impl SeedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SeedValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for SeedValue {
    fn from(s: String) -> Self {
        SeedValue::Text(s)
    }
}

impl From<&str> for SeedValue {
    fn from(s: &str) -> Self {
        SeedValue::Text(s.to_string())
    }
}

impl From<i64> for SeedValue {
    fn from(i: i64) -> Self {
        SeedValue::Int(i)
    }
}

impl From<NaiveDate> for SeedValue {
    fn from(d: NaiveDate) -> Self {
        SeedValue::Date(d)
    }
}

impl From<SeedValue> for Value {
    fn from(value: SeedValue) -> Self {
        match value {
            SeedValue::Text(s) => Value::Bytes(s.into_bytes()),
            SeedValue::Int(i) => Value::Int(i),
            // MySQL DATE is sent as a DATETIME value with a zero time part
            SeedValue::Date(d) => {
                Value::Date(d.year() as u16, d.month() as u8, d.day() as u8, 0, 0, 0, 0)
            }
        }
    }
}
