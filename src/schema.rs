use crate::utils::Period;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule used to divide one expense between the parties.
///
/// Unrecognized tags are kept as [`SplitPolicy::Unknown`] so validation can
/// report them; the split engine assigns zero shares for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SplitPolicy {
    /// Proportional to each party's base salary (bonuses excluded).
    SalaryWeighted,
    /// Fixed per-party amount, multiplied by the row's units.
    CustomAbsolute,
    /// Fixed per-party ratio of the row total.
    CustomRelative,
    Unknown(String),
}

impl SplitPolicy {
    pub const KNOWN_TAGS: [&'static str; 3] =
        ["salary_weighted", "custom_absolute", "custom_relative"];

    /// Exact match; surrounding whitespace makes a tag unknown.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "salary_weighted" => Self::SalaryWeighted,
            "custom_absolute" => Self::CustomAbsolute,
            "custom_relative" => Self::CustomRelative,
            _ => Self::Unknown(tag.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Self::SalaryWeighted => Self::KNOWN_TAGS[0],
            Self::CustomAbsolute => Self::KNOWN_TAGS[1],
            Self::CustomRelative => Self::KNOWN_TAGS[2],
            Self::Unknown(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<String> for SplitPolicy {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<SplitPolicy> for String {
    fn from(policy: SplitPolicy) -> Self {
        policy.as_tag().to_string()
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Per-party inputs carried by a row. Optional columns default to 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyTerms {
    pub salary: f64,
    #[serde(default)]
    pub bonus: f64,
    #[serde(default)]
    pub custom_amount: f64,
    #[serde(default)]
    pub custom_ratio: f64,
}

/// One normalized input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub period: Period,
    /// Free-form expense class; the configured personal sentinel marks personal spending.
    pub category: String,
    pub name: String,
    /// Negative amounts are refunds or credits and pass through unchanged.
    pub amount: f64,
    pub units: f64,
    pub split_policy: SplitPolicy,
    /// One entry per configured party, in configuration order.
    pub parties: Vec<PartyTerms>,
}

impl ExpenseRecord {
    pub fn effective_amount(&self) -> f64 {
        self.amount * self.units
    }

    pub fn period_label(&self) -> String {
        self.period.label()
    }

    pub fn terms(&self, party_index: usize) -> PartyTerms {
        self.parties.get(party_index).cloned().unwrap_or_default()
    }
}

/// Shares of one record. `shares` is aligned with the configured party order.
///
/// The shares sum to `total` only when the policy parameters are well formed;
/// nothing here normalizes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SplitResult {
    pub total: f64,
    pub shares: Vec<f64>,
}

impl SplitResult {
    pub fn zero(total: f64, party_count: usize) -> Self {
        Self {
            total,
            shares: vec![0.0; party_count],
        }
    }

    pub fn share(&self, party_index: usize) -> f64 {
        self.shares.get(party_index).copied().unwrap_or(0.0)
    }

    pub fn allocated(&self) -> f64 {
        self.shares.iter().sum()
    }

    /// Part of `total` not assigned to any party.
    pub fn unallocated(&self) -> f64 {
        self.total - self.allocated()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersonFinancials {
    pub party: String,
    pub salary: f64,
    pub bonus: f64,
    pub total_income: f64,
    pub shared_expenses: f64,
    pub personal_expenses: f64,
    pub total_expenses: f64,
    pub net_savings: f64,
    /// Percent of total income; 0 when income is not positive.
    pub savings_rate: f64,
    /// Percent of the period's shared-expense pool; 0 when the pool is not positive.
    pub split_rate: f64,
}

/// A row whose salary or bonus disagrees with the first row of its period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IncomeConflict {
    /// Index of the row within the period's record set.
    pub row: usize,
    pub party: String,
    pub field: String,
    pub expected: f64,
    pub found: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PeriodFinancials {
    pub period: String,
    pub parties: Vec<PersonFinancials>,
    pub total_shared_expenses: f64,
    pub combined_income: f64,
    pub combined_savings: f64,
    pub combined_savings_rate: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub income_conflicts: Vec<IncomeConflict>,
}

impl PeriodFinancials {
    pub fn party(&self, id: &str) -> Option<&PersonFinancials> {
        self.parties.iter().find(|p| p.party == id)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PeriodFinancials)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
