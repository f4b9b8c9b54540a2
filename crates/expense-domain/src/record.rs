//! The expense record and the validated values it is built from.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{category::CategoryLabel, error::DomainError, Category};

/// Textual form used for record dates in storage and input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Opaque, never reused identifier of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecordId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidId("identifier must not be empty".into()));
        }
        Ok(Self(value))
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl TryFrom<&str> for RecordId {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A strictly positive, finite expense amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::InvalidAmount(format!(
                "{value} is not a finite number"
            )));
        }
        if value <= 0.0 {
            return Err(DomainError::InvalidAmount(format!(
                "{value} must be greater than zero"
            )));
        }
        Ok(Self(value))
    }

    /// Parses user-entered text such as `"12.50"`.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidAmount("amount is required".into()));
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| DomainError::InvalidAmount(format!("`{trimmed}` is not a number")))?;
        Self::new(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, DomainError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|err| DomainError::InvalidDate(format!("`{trimmed}`: {err}")))
}

/// One user-entered expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub amount: Amount,
    pub category: CategoryLabel,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
}

impl Record {
    /// Builds a record with a freshly generated identifier.
    pub fn new(amount: Amount, category: Category, date: NaiveDate, note: impl Into<String>) -> Self {
        Self {
            id: RecordId::generate(),
            amount,
            category: CategoryLabel::Known(category),
            date,
            note: note.into(),
        }
    }

    pub fn display_label(&self) -> String {
        let note = if self.note.is_empty() { "-" } else { &self.note };
        format!(
            "{} - {} ({} \u{2022} {})",
            self.amount,
            self.category,
            self.date.format(DATE_FORMAT),
            note
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn amount_rejects_zero_negative_and_non_finite() {
        assert!(Amount::new(0.0).is_err());
        assert!(Amount::new(-3.5).is_err());
        assert!(Amount::new(f64::NAN).is_err());
        assert!(Amount::new(f64::INFINITY).is_err());
        assert_eq!(Amount::new(0.01).unwrap().value(), 0.01);
    }

    #[test]
    fn amount_parse_rejects_non_numeric_text() {
        assert!(matches!(
            Amount::parse("twelve"),
            Err(DomainError::InvalidAmount(_))
        ));
        assert!(matches!(Amount::parse("   "), Err(DomainError::InvalidAmount(_))));
        assert!(matches!(Amount::parse("NaN"), Err(DomainError::InvalidAmount(_))));
        assert_eq!(Amount::parse(" 12.5 ").unwrap().value(), 12.5);
    }

    #[test]
    fn parse_date_requires_calendar_dates() {
        assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("01/02/2024").is_err());
    }

    #[test]
    fn generated_ids_are_distinct_and_non_empty() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
        assert!(RecordId::try_from("").is_err());
    }

    #[test]
    fn record_serializes_to_flat_object() {
        let record = Record {
            id: RecordId::try_from("lx3k2abc").unwrap(),
            amount: Amount::new(50.0).unwrap(),
            category: Category::Food.into(),
            date: date(2024, 1, 1),
            note: "lunch".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "lx3k2abc",
                "amount": 50.0,
                "category": "Food",
                "date": "2024-01-01",
                "note": "lunch"
            })
        );
    }

    #[test]
    fn record_note_defaults_to_empty() {
        let record: Record = serde_json::from_str(
            r#"{"id":"a1","amount":3,"category":"Bills","date":"2024-03-01"}"#,
        )
        .unwrap();
        assert_eq!(record.note, "");
        assert_eq!(record.amount.value(), 3.0);
    }

    #[test]
    fn stored_non_positive_amount_is_rejected() {
        let result: Result<Record, _> = serde_json::from_str(
            r#"{"id":"a1","amount":-1,"category":"Bills","date":"2024-03-01","note":""}"#,
        );
        assert!(result.is_err());
    }
}
