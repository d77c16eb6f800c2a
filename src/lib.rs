//! # Household Split
//!
//! A library for splitting household expenses between partners and rolling
//! the per-person shares up into monthly income, spending and savings figures.
//!
//! ## Core Concepts
//!
//! - **Period**: a (month, year) bucket labelled `"<MonthName> <Year>"`, e.g. `"January 2025"`
//! - **Split Policy**: how one expense is divided (`salary_weighted`, `custom_absolute`, `custom_relative`)
//! - **Shared vs Personal**: rows whose `type` is the personal sentinel count as personal spending
//! - **Savings Rate**: net savings as a percentage of salary plus bonus
//! - **Split Rate**: a party's percentage of the period's shared-expense pool
//!
//! The pipeline is `RawTable -> validate -> preprocess -> split -> compute_period
//! -> aggregate -> chart_series`. Every stage is a pure function over in-memory
//! data and the whole pipeline is rerun whenever the period selection changes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use household_split::*;
//!
//! let csv = "for_month,for_year,type,name,amount,units,split_type,guillem_salary,vero_salary\n\
//!            January,2025,rent,Rent,2000,1,salary_weighted,6000,4000\n";
//! let table = RawTable::from_csv_reader(csv.as_bytes()).unwrap();
//!
//! let report = ExpensePipeline::new(EngineConfig::default())
//!     .run(&table, None)
//!     .unwrap();
//!
//! assert_eq!(report.periods[0].parties[0].shared_expenses, 1200.0);
//! ```

pub mod aggregation;
pub mod chart;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingestion;
pub mod preprocess;
pub mod schema;
pub mod totals;
pub mod utils;
pub mod validation;

pub use aggregation::{compute_period, compute_period_records, compute_periods};
pub use chart::{chart_series, ChartMetric, ChartRow, ChartSeries};
pub use config::{CoercionPolicy, EngineConfig, PartyConfig};
pub use engine::{split, split_all};
pub use error::{CoercionIssue, ExpenseSplitError, Result};
pub use ingestion::RawTable;
pub use preprocess::{available_periods, preprocess, NormalizedTable};
pub use schema::*;
pub use totals::{aggregate, aggregate_pair, cross_period_totals, CrossPeriodTotals, PartyTotals};
pub use utils::Period;
pub use validation::{ensure_valid, validate, ValidationReport};

use log::{debug, info};
use serde::Serialize;

/// Everything a dashboard needs for one period selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub validation: ValidationReport,
    /// All periods present in the table, oldest first.
    pub available_periods: Vec<String>,
    /// One entry per selected period, in selection order.
    pub periods: Vec<PeriodFinancials>,
    pub totals: CrossPeriodTotals,
    pub chart: ChartSeries,
}

impl DashboardReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct ExpensePipeline {
    config: EngineConfig,
}

impl ExpensePipeline {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates and normalizes a raw table. Missing columns and required
    /// numeric cells that can't be parsed stop here; unknown policies don't.
    pub fn prepare(&self, table: &RawTable) -> Result<(ValidationReport, NormalizedTable)> {
        self.config.validate()?;
        let validation = ensure_valid(table, &self.config)?;
        let normalized = preprocess(table, &self.config)?;
        Ok((validation, normalized))
    }

    /// Runs the full pipeline. `selection = None` selects every available period.
    pub fn run(&self, table: &RawTable, selection: Option<&[String]>) -> Result<DashboardReport> {
        info!(
            "Processing expense table with {} rows for {} parties",
            table.len(),
            self.config.parties.len()
        );

        let (validation, normalized) = self.prepare(table)?;
        let available = available_periods(&normalized);

        let selected: Vec<String> = match selection {
            Some(labels) => labels.to_vec(),
            None => available.clone(),
        };
        debug!(
            "{} periods available, {} selected",
            available.len(),
            selected.len()
        );

        let periods = compute_periods(&normalized, &selected, &self.config);
        let totals = cross_period_totals(&periods);
        let chart = chart_series(&periods, &self.config)?;

        info!(
            "Combined savings {:.2} over {} periods ({:.1}%)",
            totals.combined.net_savings,
            periods.len(),
            totals.combined_savings_rate
        );

        Ok(DashboardReport {
            validation,
            available_periods: available,
            periods,
            totals,
            chart,
        })
    }
}
