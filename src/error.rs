use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A required numeric cell that could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoercionIssue {
    /// Zero-based data row index (header excluded).
    pub row: usize,
    pub column: String,
    pub value: String,
}

impl fmt::Display for CoercionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} column '{}' = '{}'", self.row, self.column, self.value)
    }
}

fn join_issues(issues: &[CoercionIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum ExpenseSplitError {
    #[error("Missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Non-numeric values in required fields: {}", join_issues(issues))]
    NumericCoercion { issues: Vec<CoercionIssue> },

    #[error("Invalid month '{value}' on row {row}: expected a full English month name")]
    InvalidMonth { row: usize, value: String },

    #[error("Invalid year '{value}' on row {row}")]
    InvalidYear { row: usize, value: String },

    #[error("Invalid period label '{0}': expected '<MonthName> <Year>'")]
    InvalidPeriodLabel(String),

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExpenseSplitError>;
