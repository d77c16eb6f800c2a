use crate::config::EngineConfig;
use crate::engine::split;
use crate::preprocess::NormalizedTable;
use crate::schema::{ExpenseRecord, IncomeConflict, PeriodFinancials, PersonFinancials};
use crate::utils::percentage_of;
use log::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
struct PartyAccumulator {
    shared: f64,
    personal: f64,
}

/// Salary and bonus come from the first record; later records that disagree
/// are reported but never used.
fn find_income_conflicts(records: &[&ExpenseRecord], config: &EngineConfig) -> Vec<IncomeConflict> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    let mut conflicts = Vec::new();
    for (row, record) in records.iter().enumerate().skip(1) {
        for (idx, party) in config.parties.iter().enumerate() {
            let expected = first.terms(idx);
            let found = record.terms(idx);
            if found.salary != expected.salary {
                conflicts.push(IncomeConflict {
                    row,
                    party: party.id.clone(),
                    field: "salary".to_string(),
                    expected: expected.salary,
                    found: found.salary,
                });
            }
            if found.bonus != expected.bonus {
                conflicts.push(IncomeConflict {
                    row,
                    party: party.id.clone(),
                    field: "bonus".to_string(),
                    expected: expected.bonus,
                    found: found.bonus,
                });
            }
        }
    }
    conflicts
}

/// Aggregates the records of one period into [`PeriodFinancials`].
///
/// Records are assumed to belong to `period`; no filtering happens here. An
/// empty slice yields zeroed figures for every party.
pub fn compute_period_records(
    records: &[&ExpenseRecord],
    period: &str,
    config: &EngineConfig,
) -> PeriodFinancials {
    let party_count = config.parties.len();
    let mut acc = vec![PartyAccumulator::default(); party_count];
    let mut total_shared = 0.0;

    for record in records {
        let result = split(record);
        if config.is_personal(&record.category) {
            for (idx, slot) in acc.iter_mut().enumerate() {
                slot.personal += result.share(idx);
            }
        } else {
            total_shared += result.total;
            for (idx, slot) in acc.iter_mut().enumerate() {
                slot.shared += result.share(idx);
            }
        }
    }

    if total_shared <= 0.0 {
        debug!(
            "{}: shared expense pool is {}, split rates set to 0",
            period, total_shared
        );
    }

    let parties: Vec<PersonFinancials> = config
        .parties
        .iter()
        .zip(&acc)
        .enumerate()
        .map(|(idx, (party, sums))| {
            let terms = records.first().map(|r| r.terms(idx)).unwrap_or_default();
            let total_income = terms.salary + terms.bonus;
            let total_expenses = sums.shared + sums.personal;
            let net_savings = total_income - total_expenses;

            PersonFinancials {
                party: party.id.clone(),
                salary: terms.salary,
                bonus: terms.bonus,
                total_income,
                shared_expenses: sums.shared,
                personal_expenses: sums.personal,
                total_expenses,
                net_savings,
                savings_rate: percentage_of(net_savings, total_income),
                split_rate: percentage_of(sums.shared, total_shared),
            }
        })
        .collect();

    let combined_income: f64 = parties.iter().map(|p| p.total_income).sum();
    let combined_savings: f64 = parties.iter().map(|p| p.net_savings).sum();

    let income_conflicts = find_income_conflicts(records, config);
    for conflict in &income_conflicts {
        warn!(
            "{}: row {} has {} {} = {} but the period uses {}",
            period, conflict.row, conflict.party, conflict.field, conflict.found, conflict.expected
        );
    }

    debug!(
        "{}: {} records, shared pool {:.2}, combined savings {:.2}",
        period,
        records.len(),
        total_shared,
        combined_savings
    );

    PeriodFinancials {
        period: period.to_string(),
        parties,
        total_shared_expenses: total_shared,
        combined_income,
        combined_savings,
        combined_savings_rate: percentage_of(combined_savings, combined_income),
        income_conflicts,
    }
}

/// Aggregates every record of `table` labelled `period`.
pub fn compute_period(table: &NormalizedTable, period: &str, config: &EngineConfig) -> PeriodFinancials {
    let records: Vec<&ExpenseRecord> = table.records_for(period).collect();
    compute_period_records(&records, period, config)
}

/// One [`PeriodFinancials`] per selected label, in selection order.
pub fn compute_periods<S: AsRef<str>>(
    table: &NormalizedTable,
    selection: &[S],
    config: &EngineConfig,
) -> Vec<PeriodFinancials> {
    selection
        .iter()
        .map(|label| compute_period(table, label.as_ref(), config))
        .collect()
}
