use crate::schema::{PeriodFinancials, PersonFinancials};
use crate::utils::percentage_of;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Running totals for one party (or for all parties combined).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PartyTotals {
    pub party: String,
    /// Salary plus bonus.
    pub net_salary: f64,
    pub shared_expenses: f64,
    pub personal_expenses: f64,
    pub net_savings: f64,
}

impl PartyTotals {
    pub fn new(party: &str) -> Self {
        Self {
            party: party.to_string(),
            ..Self::default()
        }
    }

    pub fn add_period(&mut self, financials: &PersonFinancials) {
        self.net_salary += financials.total_income;
        self.shared_expenses += financials.shared_expenses;
        self.personal_expenses += financials.personal_expenses;
        self.net_savings += financials.net_savings;
    }

    pub fn merge(&mut self, other: &PartyTotals) {
        self.net_salary += other.net_salary;
        self.shared_expenses += other.shared_expenses;
        self.personal_expenses += other.personal_expenses;
        self.net_savings += other.net_savings;
    }

    /// Derived from the summed figures, not averaged over periods.
    pub fn savings_rate(&self) -> f64 {
        percentage_of(self.net_savings, self.net_salary)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CrossPeriodTotals {
    pub parties: Vec<PartyTotals>,
    pub combined: PartyTotals,
    pub combined_savings_rate: f64,
}

impl CrossPeriodTotals {
    pub fn party(&self, id: &str) -> Option<&PartyTotals> {
        self.parties.iter().find(|t| t.party == id)
    }
}

pub const COMBINED_PARTY: &str = "combined";

/// Folds periods into one running total per party, in period order.
///
/// Party order follows the first period; parties are matched by id so that
/// later periods may list them in any order.
pub fn aggregate(periods: &[PeriodFinancials]) -> Vec<PartyTotals> {
    let mut totals: Vec<PartyTotals> = Vec::new();

    for period in periods {
        for person in &period.parties {
            match totals.iter_mut().find(|t| t.party == person.party) {
                Some(existing) => existing.add_period(person),
                None => {
                    let mut fresh = PartyTotals::new(&person.party);
                    fresh.add_period(person);
                    totals.push(fresh);
                }
            }
        }
    }

    totals
}

/// Two-party form of [`aggregate`]: `(first party, second party)` totals.
/// A party with no data comes back zeroed.
pub fn aggregate_pair(periods: &[PeriodFinancials]) -> (PartyTotals, PartyTotals) {
    let mut totals = aggregate(periods).into_iter();
    let first = totals.next().unwrap_or_default();
    let second = totals.next().unwrap_or_default();
    (first, second)
}

/// Per-party totals plus the combined figures and combined savings rate.
pub fn cross_period_totals(periods: &[PeriodFinancials]) -> CrossPeriodTotals {
    let parties = aggregate(periods);

    let mut combined = PartyTotals::new(COMBINED_PARTY);
    for party in &parties {
        combined.merge(party);
    }

    CrossPeriodTotals {
        combined_savings_rate: combined.savings_rate(),
        parties,
        combined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(party: &str, income: f64, shared: f64, personal: f64) -> PersonFinancials {
        let total_expenses = shared + personal;
        PersonFinancials {
            party: party.to_string(),
            salary: income,
            bonus: 0.0,
            total_income: income,
            shared_expenses: shared,
            personal_expenses: personal,
            total_expenses,
            net_savings: income - total_expenses,
            savings_rate: percentage_of(income - total_expenses, income),
            split_rate: 0.0,
        }
    }

    fn period(label: &str, a: PersonFinancials, b: PersonFinancials) -> PeriodFinancials {
        PeriodFinancials {
            period: label.to_string(),
            total_shared_expenses: a.shared_expenses + b.shared_expenses,
            combined_income: a.total_income + b.total_income,
            combined_savings: a.net_savings + b.net_savings,
            combined_savings_rate: 0.0,
            parties: vec![a, b],
            income_conflicts: vec![],
        }
    }

    fn sample() -> Vec<PeriodFinancials> {
        vec![
            period(
                "January 2025",
                person("guillem", 6000.0, 1500.0, 100.0),
                person("vero", 4000.0, 1000.0, 50.0),
            ),
            period(
                "February 2025",
                person("guillem", 7000.0, 1600.0, 200.0),
                person("vero", 4500.0, 1100.0, 100.0),
            ),
        ]
    }

    #[test]
    fn test_aggregate_totals() {
        let (guillem, vero) = aggregate_pair(&sample());

        assert_eq!(guillem.party, "guillem");
        assert_eq!(guillem.net_salary, 13000.0);
        assert_eq!(guillem.shared_expenses, 3100.0);
        assert_eq!(guillem.personal_expenses, 300.0);
        assert_eq!(guillem.net_savings, 9600.0);

        assert_eq!(vero.net_salary, 8500.0);
        assert_eq!(vero.shared_expenses, 2100.0);
        assert_eq!(vero.personal_expenses, 150.0);
        assert_eq!(vero.net_savings, 6250.0);
    }

    #[test]
    fn test_fold_is_associative() {
        let mut periods = sample();
        periods.push(period(
            "March 2025",
            person("guillem", 6000.0, 1400.0, 0.0),
            person("vero", 4000.0, 900.0, 300.0),
        ));

        let all_at_once = aggregate(&periods);

        let mut stepwise = aggregate(&periods[..2]);
        for (acc, tail) in stepwise.iter_mut().zip(aggregate(&periods[2..])) {
            acc.merge(&tail);
        }

        assert_eq!(stepwise, all_at_once);
    }

    #[test]
    fn test_combined_rate_from_summed_totals() {
        let periods = vec![
            period(
                "January 2025",
                person("guillem", 100.0, 0.0, 0.0),
                person("vero", 0.0, 0.0, 0.0),
            ),
            period(
                "February 2025",
                person("guillem", 9900.0, 4950.0, 0.0),
                person("vero", 0.0, 0.0, 0.0),
            ),
        ];
        let totals = cross_period_totals(&periods);

        // Averaging the per-period rates would give 75%.
        assert!((totals.combined_savings_rate - 50.5).abs() < 1e-9);
        assert_eq!(totals.combined.net_salary, 10000.0);
        assert_eq!(totals.party("vero").unwrap().savings_rate(), 0.0);
    }

    #[test]
    fn test_empty_input() {
        let (a, b) = aggregate_pair(&[]);
        assert_eq!(a, PartyTotals::default());
        assert_eq!(b, PartyTotals::default());

        let totals = cross_period_totals(&[]);
        assert!(totals.parties.is_empty());
        assert_eq!(totals.combined_savings_rate, 0.0);
    }
}
