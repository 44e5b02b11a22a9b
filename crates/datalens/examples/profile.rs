//! Example: Profile a JSON dataset with Datalens.
//!
//! Usage:
//!   cargo run --example profile -- [dataset.json]
//!
//! The file holds `{ "headers": [...], "rows": [{...}] }`. Without a path a
//! small built-in sales table is profiled.

use std::env;
use std::fs;

use datalens::cleaning::SelectedFix;
use datalens::{Datalens, Dataset, Severity};

fn sample_dataset() -> Dataset {
    Dataset::from_records(
        &["order_id", "region", "order_date", "units", "price", "email"],
        &[
            vec!["A-1", "north", "2024-01-03", "12", "19.99", "ana@example.com"],
            vec!["A-2", "south", "2024-01-04", "", "24.50", "ben@example.com"],
            vec!["A-3", "north", "01/05/2024", "7", "19.99", "carla@example"],
            vec!["A-4", "east", "2024-01-06", "15", "-3.00", "dev@example.com"],
            vec!["A-5", "south", "2024-01-07", "9", "22.00", "eli@example.com"],
            vec!["A-5", "south", "2024-01-07", "9", "22.00", "eli@example.com"],
            vec!["A-6", "west", "2024-01-08", "N/A", "31.25", "fay@example.com"],
            vec!["A-7", "east", "2024-01-09", "11", "27.80", "gus@example.com"],
        ],
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let (label, dataset) = match args.get(1) {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            (path.clone(), Dataset::from_json(&json)?)
        }
        None => ("built-in sample".to_string(), sample_dataset()),
    };

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Datalens Profile: {}", label);
    println!("{}", separator);
    println!();

    let lens = Datalens::new();
    let profile = lens.profile(&dataset)?;

    // Summary
    let summary = &profile.summary;
    println!("## Summary");
    println!("  Rows: {}", summary.row_count);
    println!("  Columns: {}", summary.column_count);
    println!("  Missing cells: {}", summary.total_missing);
    println!("  Completeness: {:.1}%", summary.completeness * 100.0);
    println!("  Fingerprint: {}", profile.dataset_hash);
    println!();

    // Columns
    println!("## Columns ({})", profile.columns.len());
    println!();
    for col in &profile.columns {
        println!(
            "  {:15} {:12} nulls={:<4} unique={:<4} consistency={:.2}",
            col.name,
            col.inferred_type.as_str(),
            col.statistics.null_count,
            col.statistics.unique_count,
            col.quality.consistency,
        );
        if let Some(stats) = &col.statistics.numeric {
            println!(
                "                  min={} max={} mean={:.2} median={}",
                stats.min, stats.max, stats.mean, stats.median
            );
        }
    }
    println!();

    // Quality
    let quality = &profile.quality;
    println!(
        "## Quality (score {:.2}, {} issues)",
        quality.overall_score,
        quality.issues.len()
    );
    println!();
    for issue in &quality.issues {
        let marker = match issue.severity {
            Severity::Critical => "!!",
            Severity::High => "! ",
            _ => "  ",
        };
        println!(
            "  {} [{:8}] {} ({} rows)",
            marker,
            issue.severity.label(),
            issue.description,
            issue.affected_rows
        );
        println!(
            "              fix: {} (confidence {:.2}{})",
            issue.suggested_fix.method.as_str(),
            issue.suggested_fix.confidence,
            if issue.auto_fixable { ", auto" } else { "" }
        );
    }
    println!();

    for rec in &quality.recommendations {
        println!("  * {}: {} issue(s)", rec.title, rec.issue_ids.len());
    }
    println!();

    // Relationships
    if !profile.relationships.is_empty() {
        println!("## Relationships");
        for rel in &profile.relationships {
            println!("  {}", rel.description);
        }
        println!();
    }

    // Charts
    println!("## Chart Recommendations");
    println!();
    for chart in &profile.recommendations {
        println!("  {:22} {:.2}  {}", chart.id, chart.confidence, chart.title);
    }
    println!();

    // Apply the automatic fixes and report the gain
    let fixes: Vec<SelectedFix> = quality.auto_fixable().map(SelectedFix::from_issue).collect();
    let result = lens.apply_cleaning_fixes(&dataset, &fixes);
    println!("## Cleaning");
    println!(
        "  Applied {} fix(es), skipped {}, {} row(s) affected",
        result.applied.len(),
        result.skipped.len(),
        result.total_rows_affected
    );
    println!(
        "  Completeness {:.1}% -> {:.1}%",
        result.quality_before * 100.0,
        result.quality_after * 100.0
    );

    Ok(())
}
