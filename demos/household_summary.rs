use household_split::*;
use std::env;

const SAMPLE: &str = "\
input_date,for_month,for_year,type,name,amount,units,split_type,guillem_amount,vero_amount,guillem_ratio,vero_ratio,guillem_salary,vero_salary,guillem_bonus,vero_bonus
2025-01-01,January,2025,rent,Rent,2000,1,salary_weighted,,,,,6000,4000,0,0
2025-01-04,January,2025,groceries,Groceries,125,4,custom_relative,,,0.5,0.5,6000,4000,0,0
2025-01-12,January,2025,personal,Gym,80,1,custom_absolute,80,0,,,6000,4000,0,0
2025-02-01,February,2025,rent,Rent,2000,1,salary_weighted,,,,,6000,4000,1500,0
2025-02-07,February,2025,utilities,Internet,60,1,custom_absolute,30,30,,,6000,4000,1500,0
2025-02-18,February,2025,personal,Concert,90,1,custom_absolute,0,90,,,6000,4000,1500,0
";

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let table = match env::args().nth(1) {
        Some(path) => RawTable::from_csv_path(path)?,
        None => RawTable::from_csv_reader(SAMPLE.as_bytes())?,
    };

    let report = ExpensePipeline::new(EngineConfig::default()).run(&table, None)?;

    if report.validation.has_policy_warnings() {
        println!(
            "Warning: unknown split_type values: {}",
            report.validation.invalid_policy_values.join(", ")
        );
    }

    println!("=== Monthly Summary ===");
    for period in &report.periods {
        println!("\n{}", period.period);
        for person in &period.parties {
            println!(
                "  {:<8} income {:>9.0}  shared {:>8.0} ({:>3.0}%)  personal {:>7.0}  savings {:>9.0} ({:.0}%)",
                person.party,
                person.total_income,
                person.shared_expenses,
                person.split_rate,
                person.personal_expenses,
                person.net_savings,
                person.savings_rate
            );
        }
        for conflict in &period.income_conflicts {
            println!(
                "  note: row {} {} {} differs ({} vs {})",
                conflict.row, conflict.party, conflict.field, conflict.found, conflict.expected
            );
        }
    }

    println!("\n=== Totals Across Selected Periods ===");
    for totals in report.totals.parties.iter().chain([&report.totals.combined]) {
        println!(
            "  {:<8} salary {:>9.0}  shared {:>8.0}  personal {:>7.0}  savings {:>9.0}  rate {:.1}%",
            totals.party,
            totals.net_salary,
            totals.shared_expenses,
            totals.personal_expenses,
            totals.net_savings,
            totals.savings_rate()
        );
    }

    println!("\n=== {} Over Time ===", ChartMetric::NetSavings.label());
    let periods = report.chart.periods();
    for (name, values) in report.chart.metric_columns(ChartMetric::NetSavings) {
        let points: Vec<String> = periods
            .iter()
            .zip(values)
            .map(|(p, v)| format!("{}: {:.0}", p, v))
            .collect();
        println!("  {}: {}", name, points.join(" | "));
    }

    Ok(())
}
