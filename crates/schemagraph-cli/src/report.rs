//! Terminal rendering of validation and link reports.

use colored::Colorize;
use schemagraph_core::{LinkReport, ValidationReport};

/// Full listing: every finding, grouped by document.
pub fn print_reports(reports: &[(String, ValidationReport)]) {
    for (key, report) in reports {
        if report.is_clean() {
            println!("{} {}", "ok".green().bold(), key);
            continue;
        }
        let status = if report.is_valid() {
            "warn".yellow().bold()
        } else {
            "error".red().bold()
        };
        println!("{} {}", status, key.bold());
        for line in report.rendered_errors() {
            println!("  {} {}", "✗".red(), line);
        }
        for line in report.rendered_warnings() {
            println!("  {} {}", "!".yellow(), line);
        }
    }
}

/// One line of counts after generation.
pub fn print_summary(reports: &[(String, ValidationReport)]) {
    let errors: usize = reports.iter().map(|(_, r)| r.errors.len()).sum();
    let warnings: usize = reports.iter().map(|(_, r)| r.warnings.len()).sum();
    if errors == 0 && warnings == 0 {
        println!("  {} all documents complete", "→".yellow());
        return;
    }
    println!(
        "  {} {} missing required, {} missing recommended (run `schemagraph validate` for details)",
        "→".yellow(),
        errors.to_string().red(),
        warnings.to_string().yellow()
    );
}

pub fn print_links(report: &LinkReport) {
    if report.is_clean() {
        return;
    }
    for unresolved in &report.unresolved {
        eprintln!(
            "{} {} references {} which no document defines",
            "warning:".yellow().bold(),
            unresolved.document,
            unresolved.id
        );
    }
    for duplicate in &report.duplicates {
        eprintln!(
            "{} {} is embedded in full by {}",
            "warning:".yellow().bold(),
            duplicate.id,
            duplicate.documents.join(", ")
        );
    }
    for id in &report.orphan_stubs {
        eprintln!("{} {} is only ever stubbed", "warning:".yellow().bold(), id);
    }
}
