use crate::config::EngineConfig;
use crate::error::Result;
use crate::schema::{PeriodFinancials, PersonFinancials};
use crate::utils::Period;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartMetric {
    NetSalary,
    SharedExpenses,
    PersonalExpenses,
    NetSavings,
    SavingsRate,
}

impl ChartMetric {
    pub const ALL: [ChartMetric; 5] = [
        ChartMetric::NetSalary,
        ChartMetric::SharedExpenses,
        ChartMetric::PersonalExpenses,
        ChartMetric::NetSavings,
        ChartMetric::SavingsRate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartMetric::NetSalary => "Net Salary",
            ChartMetric::SharedExpenses => "Shared Expenses",
            ChartMetric::PersonalExpenses => "Personal Expenses",
            ChartMetric::NetSavings => "Net Savings",
            ChartMetric::SavingsRate => "Savings Rate",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == label)
    }

    pub fn value(&self, person: &PersonFinancials) -> f64 {
        match self {
            ChartMetric::NetSalary => person.total_income,
            ChartMetric::SharedExpenses => person.shared_expenses,
            ChartMetric::PersonalExpenses => person.personal_expenses,
            ChartMetric::NetSavings => person.net_savings,
            ChartMetric::SavingsRate => person.savings_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartRow {
    pub period: String,
    pub sort_key: Period,
    /// Aligned with [`ChartSeries::columns`].
    pub values: Vec<f64>,
}

/// Flat per-period table: one row per period, one column per party and metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartSeries {
    /// `"<display name> <metric label>"`, party-major.
    pub columns: Vec<String>,
    pub rows: Vec<ChartRow>,
    /// Party display names, in column order.
    #[serde(default)]
    pub parties: Vec<String>,
}

impl ChartSeries {
    pub fn periods(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.period.as_str()).collect()
    }

    /// Values of one column, oldest first. Rows too short to hold the
    /// column read as 0.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.values.get(idx).copied().unwrap_or(0.0))
                .collect(),
        )
    }

    /// One `(display name, values)` line per party for the chosen metric.
    pub fn metric_columns(&self, metric: ChartMetric) -> Vec<(String, Vec<f64>)> {
        self.parties
            .iter()
            .filter_map(|name| {
                let values = self.column(&format!("{} {}", name, metric.label()))?;
                Some((name.clone(), values))
            })
            .collect()
    }
}

/// Builds the chart table, ordered by the (year, month) encoded in each
/// period label. Labels that don't parse back into a period are an error.
pub fn chart_series(periods: &[PeriodFinancials], config: &EngineConfig) -> Result<ChartSeries> {
    let display_names: Vec<String> = config
        .parties
        .iter()
        .map(|p| p.display_name.clone())
        .collect();

    let columns: Vec<String> = display_names
        .iter()
        .flat_map(|name| {
            ChartMetric::ALL
                .into_iter()
                .map(move |metric| format!("{} {}", name, metric.label()))
        })
        .collect();

    let mut rows = Vec::with_capacity(periods.len());
    for financials in periods {
        let sort_key = Period::parse_label(&financials.period)?;
        let values = config
            .parties
            .iter()
            .flat_map(|party| {
                let person = financials.party(&party.id);
                ChartMetric::ALL
                    .into_iter()
                    .map(move |metric| person.map(|p| metric.value(p)).unwrap_or(0.0))
            })
            .collect();

        rows.push(ChartRow {
            period: financials.period.clone(),
            sort_key,
            values,
        });
    }

    // Stable, so duplicate periods keep their input order.
    rows.sort_by_key(|r| r.sort_key);

    Ok(ChartSeries {
        columns,
        rows,
        parties: display_names,
    })
}
