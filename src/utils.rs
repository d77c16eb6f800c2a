use crate::error::{ExpenseSplitError, Result};
use chrono::Month;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (month, year) bucket. Field order makes the derived `Ord` chronological.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Period {
    pub year: i32,
    /// Calendar month, 1 = January.
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        validate_month_number(month)?;
        Ok(Self { year, month })
    }

    /// Builds the period from a canonical month name, e.g. `("March", 2025)`.
    pub fn from_month_name(name: &str, year: i32) -> Option<Self> {
        parse_month_name(name).map(|month| Self { year, month })
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month).unwrap_or("Unknown")
    }

    /// Display and grouping key: `"<MonthName> <Year>"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }

    /// Inverse of [`Period::label`].
    pub fn parse_label(label: &str) -> Result<Self> {
        let mut parts = label.split_whitespace();
        let (Some(month), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ExpenseSplitError::InvalidPeriodLabel(label.to_string()));
        };

        let year: i32 = year
            .parse()
            .map_err(|_| ExpenseSplitError::InvalidPeriodLabel(label.to_string()))?;

        Self::from_month_name(month, year)
            .ok_or_else(|| ExpenseSplitError::InvalidPeriodLabel(label.to_string()))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

pub fn validate_month_number(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(ExpenseSplitError::InvalidPeriodLabel(format!(
            "month number {}",
            month
        )));
    }
    Ok(())
}

/// Canonical English month name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    let number = u8::try_from(month).ok()?;
    Month::try_from(number).ok().map(|m| m.name())
}

/// Canonical month names in calendar order.
pub fn month_order() -> Vec<&'static str> {
    (1..=12).filter_map(month_name).collect()
}

/// Exact (case-sensitive) lookup against the canonical names. Abbreviations
/// and other spellings are rejected so that ordering never depends on input
/// spelling.
pub fn parse_month_name(name: &str) -> Option<u32> {
    let trimmed = name.trim();
    (1..=12).find(|&m| month_name(m) == Some(trimmed))
}

/// `numerator / denominator * 100`, or 0 unless the denominator is positive.
pub fn percentage_of(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}
