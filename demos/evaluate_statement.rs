use anyhow::Context;
use credit_risk_flags::*;
use std::env;

fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/statement.json".to_string());

    let config = match env::args().nth(2) {
        Some(rules) => RuleConfig::from_path(&rules)
            .with_context(|| format!("failed to load rule config from {}", rules))?,
        None => RuleConfig::default(),
    };

    let document =
        load_document(&path).with_context(|| format!("failed to read statement {}", path))?;
    let report = evaluate_with_config(&document, &config)
        .with_context(|| format!("failed to evaluate {}", path))?;

    println!("Evaluated entry #{} of {}", report.entry_index, path);
    if let Some(period_end) = report.period_end {
        println!("Period end: {}", period_end);
    }

    println!("\nMetrics:");
    println!("  Total revenue:        {:>16.2}", report.metrics.total_revenue);
    println!("  Total borrowing:      {:>16.2}", report.metrics.total_borrowing);
    match report.metrics.iscr {
        Some(iscr) => println!("  ISCR:                 {:>16.4}", iscr),
        None => println!("  ISCR:                 {:>16}", "n/a"),
    }
    match report.metrics.borrowing_to_revenue {
        Some(ratio) => println!("  Borrowing / revenue:  {:>16.4}", ratio),
        None => println!("  Borrowing / revenue:  {:>16}", "n/a"),
    }

    println!("\nFlags:");
    println!(
        "  Rule 1 total revenue 5cr:      {}",
        report.flags.total_revenue_5cr_flag
    );
    println!(
        "  Rule 2 borrowing to revenue:   {}",
        report.flags.borrowing_to_revenue_flag
    );
    println!("  Rule 3 ISCR:                   {}", report.flags.iscr_flag);

    for warning in &report.warnings {
        println!("\n⚠️  {}", warning);
    }

    println!("\n{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
