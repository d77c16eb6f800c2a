use crate::preprocess::NormalizedTable;
use crate::schema::{ExpenseRecord, SplitPolicy, SplitResult};
use log::debug;

/// Divides one record's total between its parties according to its policy.
///
/// Never fails: degenerate inputs (zero salaries, missing custom terms,
/// unknown policies) yield zero shares, and custom terms are used as given
/// even when they don't exhaust the total.
pub fn split(record: &ExpenseRecord) -> SplitResult {
    let total = record.effective_amount();
    let party_count = record.parties.len();

    match &record.split_policy {
        SplitPolicy::SalaryWeighted => {
            let total_salary: f64 = record.parties.iter().map(|p| p.salary).sum();
            if total_salary > 0.0 {
                SplitResult {
                    total,
                    shares: record
                        .parties
                        .iter()
                        .map(|p| p.salary / total_salary * total)
                        .collect(),
                }
            } else {
                debug!(
                    "'{}' ({}): combined salary is {}, no shares assigned",
                    record.name,
                    record.period_label(),
                    total_salary
                );
                SplitResult::zero(total, party_count)
            }
        }
        SplitPolicy::CustomAbsolute => SplitResult {
            total,
            shares: record
                .parties
                .iter()
                .map(|p| p.custom_amount * record.units)
                .collect(),
        },
        SplitPolicy::CustomRelative => SplitResult {
            total,
            shares: record
                .parties
                .iter()
                .map(|p| p.custom_ratio * total)
                .collect(),
        },
        SplitPolicy::Unknown(tag) => {
            debug!(
                "'{}' ({}): unrecognized split_type '{}', no shares assigned",
                record.name,
                record.period_label(),
                tag
            );
            SplitResult::zero(total, party_count)
        }
    }
}

/// Splits every record, preserving record order.
pub fn split_all(table: &NormalizedTable) -> Vec<SplitResult> {
    table.records.iter().map(split).collect()
}
