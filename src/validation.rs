use crate::config::EngineConfig;
use crate::error::{ExpenseSplitError, Result};
use crate::ingestion::RawTable;
use crate::schema::SplitPolicy;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    /// Every absent required column, in required-column order.
    pub missing_columns: Vec<String>,
    /// Distinct unrecognized `split_type` values, in first-seen order.
    pub invalid_policy_values: Vec<String>,
}

impl ValidationReport {
    pub fn has_policy_warnings(&self) -> bool {
        !self.invalid_policy_values.is_empty()
    }

    /// Converts a failed report into the fatal schema error.
    pub fn into_result(self) -> Result<Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(ExpenseSplitError::MissingColumns {
                columns: self.missing_columns,
            })
        }
    }
}

pub fn validate(table: &RawTable, config: &EngineConfig) -> ValidationReport {
    let missing_columns: Vec<String> = config
        .required_columns()
        .into_iter()
        .filter(|c| !table.has_column(c))
        .collect();

    let mut invalid_policy_values: Vec<String> = Vec::new();
    if let Some(values) = table.column("split_type") {
        for value in values {
            if !SplitPolicy::parse(value).is_known()
                && !invalid_policy_values.iter().any(|v| v == value)
            {
                invalid_policy_values.push(value.to_string());
            }
        }
    }

    if !missing_columns.is_empty() {
        warn!("Missing required columns: {}", missing_columns.join(", "));
    }
    if !invalid_policy_values.is_empty() {
        warn!(
            "Invalid split_type values found: {}; affected rows get zero shares",
            invalid_policy_values.join(", ")
        );
    }

    ValidationReport {
        ok: missing_columns.is_empty(),
        missing_columns,
        invalid_policy_values,
    }
}

/// Runs [`validate`] and fails with [`ExpenseSplitError::MissingColumns`] when
/// any required column is absent. Policy warnings are returned, not raised.
pub fn ensure_valid(table: &RawTable, config: &EngineConfig) -> Result<ValidationReport> {
    validate(table, config).into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: [&str; 9] = [
        "for_month",
        "for_year",
        "type",
        "name",
        "amount",
        "units",
        "split_type",
        "guillem_salary",
        "vero_salary",
    ];

    #[test]
    fn test_valid_schema() {
        let table = RawTable::from_rows(
            &HEADERS,
            &[&[
                "January",
                "2025",
                "rent",
                "Monthly rent",
                "2000",
                "1",
                "salary_weighted",
                "6000",
                "4000",
            ]],
        );

        let report = validate(&table, &EngineConfig::default());
        assert!(report.ok);
        assert!(report.missing_columns.is_empty());
        assert!(!report.has_policy_warnings());
    }

    #[test]
    fn test_reports_every_missing_column() {
        let table = RawTable::from_rows(&["for_month", "amount"], &[&["January", "2000"]]);

        let report = validate(&table, &EngineConfig::default());
        assert!(!report.ok);
        assert_eq!(
            report.missing_columns,
            vec![
                "for_year",
                "type",
                "name",
                "units",
                "split_type",
                "guillem_salary",
                "vero_salary"
            ]
        );

        match ensure_valid(&table, &EngineConfig::default()) {
            Err(ExpenseSplitError::MissingColumns { columns }) => assert_eq!(columns.len(), 7),
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_policies_are_warnings() {
        let row = |policy: &'static str| -> [&'static str; 9] {
            [
                "January", "2025", "rent", "Rent", "10", "1", policy, "1", "1",
            ]
        };
        let a = row("salary_weighted");
        let b = row("fifty_fifty");
        let c = row("fifty_fifty");
        let d = row("");
        let table = RawTable::from_rows(&HEADERS, &[&a, &b, &c, &d]);

        let report = ensure_valid(&table, &EngineConfig::default()).unwrap();
        assert!(report.ok);
        assert_eq!(report.invalid_policy_values, vec!["fifty_fifty", ""]);
    }
}
