use crate::config::{CoercionPolicy, EngineConfig};
use crate::error::{CoercionIssue, ExpenseSplitError, Result};
use crate::ingestion::RawTable;
use crate::schema::{ExpenseRecord, PartyTerms, SplitPolicy};
use crate::utils::{parse_month_name, Period};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Typed rows ready for the split engine, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub records: Vec<ExpenseRecord>,
}

impl NormalizedTable {
    pub fn new(records: Vec<ExpenseRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose period label equals `label`, in input order.
    pub fn records_for<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a ExpenseRecord> {
        self.records
            .iter()
            .filter(move |r| r.period.label() == label)
    }

    pub fn periods(&self) -> Vec<Period> {
        self.records
            .iter()
            .map(|r| r.period)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Distinct period labels, oldest first, each listed once.
pub fn available_periods(table: &NormalizedTable) -> Vec<String> {
    table.periods().iter().map(Period::label).collect()
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    // Spreadsheet exports sometimes write integer columns as "2025.0".
    let value = parse_number(trimmed)?;
    if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

struct RowReader<'a> {
    table: &'a RawTable,
    policy: CoercionPolicy,
    issues: Vec<CoercionIssue>,
}

impl<'a> RowReader<'a> {
    fn required(&mut self, row: usize, column: &str) -> f64 {
        let raw = self.table.cell(row, column).unwrap_or("");
        match parse_number(raw) {
            Some(value) => value,
            None => {
                if self.policy == CoercionPolicy::ZeroFill {
                    debug!(
                        "Row {}: '{}' value '{}' is not numeric, using 0",
                        row, column, raw
                    );
                } else {
                    self.issues.push(CoercionIssue {
                        row,
                        column: column.to_string(),
                        value: raw.to_string(),
                    });
                }
                0.0
            }
        }
    }

    fn optional(&self, row: usize, column: &str) -> f64 {
        self.table
            .cell(row, column)
            .and_then(parse_number)
            .unwrap_or(0.0)
    }
}

/// Coerces a validated table into typed records.
///
/// Month names must match the canonical English names exactly and years must
/// be integers; either failure is fatal. Unparseable `amount`, `units` and
/// salary cells are collected across the whole table and reported together
/// under [`CoercionPolicy::Reject`], or read as 0 under
/// [`CoercionPolicy::ZeroFill`]. Optional per-party columns default to 0.
pub fn preprocess(table: &RawTable, config: &EngineConfig) -> Result<NormalizedTable> {
    let mut reader = RowReader {
        table,
        policy: config.coercion,
        issues: Vec::new(),
    };
    let mut records = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        let month_raw = table.cell(row, "for_month").unwrap_or("");
        let month = parse_month_name(month_raw).ok_or_else(|| ExpenseSplitError::InvalidMonth {
            row,
            value: month_raw.to_string(),
        })?;

        let year_raw = table.cell(row, "for_year").unwrap_or("");
        let year = parse_year(year_raw).ok_or_else(|| ExpenseSplitError::InvalidYear {
            row,
            value: year_raw.to_string(),
        })?;

        let amount = reader.required(row, "amount");
        let units = reader.required(row, "units");

        let parties = config
            .parties
            .iter()
            .map(|party| PartyTerms {
                salary: reader.required(row, &party.salary_column()),
                bonus: reader.optional(row, &party.bonus_column()),
                custom_amount: reader.optional(row, &party.amount_column()),
                custom_ratio: reader.optional(row, &party.ratio_column()),
            })
            .collect();

        records.push(ExpenseRecord {
            period: Period { year, month },
            category: table.cell(row, "type").unwrap_or("").to_string(),
            name: table.cell(row, "name").unwrap_or("").to_string(),
            amount,
            units,
            split_policy: SplitPolicy::parse(table.cell(row, "split_type").unwrap_or("")),
            parties,
        });
    }

    if !reader.issues.is_empty() {
        return Err(ExpenseSplitError::NumericCoercion {
            issues: reader.issues,
        });
    }

    debug!("Preprocessed {} expense rows", records.len());
    Ok(NormalizedTable::new(records))
}
