// src/validate/mod.rs
//! Post-hoc checks over the output tables. Issues are reported as
//! human-readable strings for a reviewer; nothing here fails a run.

use crate::process::is_valid_email;
use crate::table::Table;
use crate::transform::first_unique_by;

const REQUIRED_CONSTITUENT_COLUMNS: [&str; 6] = [
    "CB Constituent ID",
    "CB Constituent Type",
    "CB Created At",
    "CB Email 1 (Standardized)",
    "CB Email 2 (Standardized)",
    "CB Title",
];

const ALLOWED_TYPES: [&str; 2] = ["Person", "Company"];
const ALLOWED_TITLES: [&str; 5] = ["Mr.", "Mrs.", "Ms.", "Dr.", ""];
const MAX_EXAMPLES: usize = 5;

/// Distinct values in first-seen order, at most `limit`.
fn distinct<'a>(values: impl Iterator<Item = &'a str>, limit: Option<usize>) -> Vec<&'a str> {
    first_unique_by(values, |v| *v, limit)
}

fn column<'a>(table: &'a Table, name: &str) -> Option<Vec<&'a str>> {
    table.column_values(name).map(Iterator::collect)
}

pub fn validate_constituents(table: &Table) -> Vec<String> {
    let mut issues = Vec::new();

    for col in REQUIRED_CONSTITUENT_COLUMNS {
        if !table.has_column(col) {
            issues.push(format!("Missing required column: {col}"));
        }
    }

    let kinds = column(table, "CB Constituent Type");
    if let Some(kinds) = &kinds {
        let bad = distinct(
            kinds.iter().copied().filter(|k| !ALLOWED_TYPES.contains(k)),
            None,
        );
        if !bad.is_empty() {
            issues.push(format!("Invalid CB Constituent Type values found: {bad:?}"));
        }
    }

    if let (Some(kinds), Some(first), Some(last), Some(company)) = (
        &kinds,
        column(table, "CB First Name"),
        column(table, "CB Last Name"),
        column(table, "CB Company Name"),
    ) {
        let bad_people = (0..kinds.len())
            .filter(|&i| kinds[i] == "Person")
            .filter(|&i| first[i].trim().is_empty() || last[i].trim().is_empty())
            .count();
        if bad_people > 0 {
            issues.push(format!("{bad_people} Person rows missing first/last name"));
        }

        let bad_companies = (0..kinds.len())
            .filter(|&i| kinds[i] == "Company" && company[i].trim().is_empty())
            .count();
        if bad_companies > 0 {
            issues.push(format!("{bad_companies} Company rows missing company name"));
        }
    }

    if let (Some(e1), Some(e2)) = (
        column(table, "CB Email 1 (Standardized)"),
        column(table, "CB Email 2 (Standardized)"),
    ) {
        let pairs = || e1.iter().zip(&e2).map(|(a, b)| (*a, *b));

        let orphaned = pairs()
            .filter(|(a, b)| a.trim().is_empty() && !b.trim().is_empty())
            .count();
        if orphaned > 0 {
            issues.push(format!("{orphaned} rows have Email2 present but Email1 missing"));
        }

        let same = pairs()
            .filter(|(a, b)| !a.trim().is_empty() && a == b)
            .count();
        if same > 0 {
            issues.push(format!("{same} rows have Email1 equal to Email2"));
        }

        for (label, values) in [("Email1", &e1), ("Email2", &e2)] {
            let invalid = distinct(
                values
                    .iter()
                    .copied()
                    .filter(|v| !v.trim().is_empty() && !is_valid_email(v)),
                Some(MAX_EXAMPLES),
            );
            if !invalid.is_empty() {
                issues.push(format!(
                    "Invalid {label} values present (examples): {invalid:?}"
                ));
            }
        }
    }

    if let Some(titles) = column(table, "CB Title") {
        let bad = distinct(
            titles.into_iter().filter(|t| !ALLOWED_TITLES.contains(t)),
            None,
        );
        if !bad.is_empty() {
            issues.push(format!("Invalid CB Title values found: {bad:?}"));
        }
    }

    issues
}

pub fn validate_tags(table: &Table) -> Vec<String> {
    let mut issues = Vec::new();
    if table.is_empty() {
        return issues;
    }

    for col in ["CB Tag Name", "CB Tag Count"] {
        if !table.has_column(col) {
            issues.push(format!("Missing required column: {col}"));
        }
    }

    if let Some(mut counts) = table.column_values("CB Tag Count") {
        if counts.any(|c| c.trim().parse::<f64>().is_err()) {
            issues.push("Non-numeric CB Tag Count values found".to_string());
        }
    }

    issues
}
