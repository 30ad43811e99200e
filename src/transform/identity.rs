// src/transform/identity.rs
use std::cmp::Reverse;
use tracing::debug;

use crate::process::parse_date;
use crate::transform::model::RawConstituent;
use crate::transform::priority::best_by_rank;

/// Collapse duplicate snapshots to one row per identity.
///
/// The latest `Date Entered` wins; rows with a missing or unparseable date rank
/// after every dated row. Among equal dates the earliest input row wins.
/// Output is ordered by identity key.
#[tracing::instrument(level = "info", skip(rows), fields(input_rows = rows.len()))]
pub fn canonicalize_constituents(rows: Vec<RawConstituent>) -> Vec<RawConstituent> {
    let input = rows.len();
    let mut winners = best_by_rank(
        rows,
        |r| r.patron_id.clone(),
        |r| Reverse(parse_date(&r.date_entered)),
    );
    winners.sort_by(|a, b| a.patron_id.cmp(&b.patron_id));
    debug!(input, distinct = winners.len(), "canonicalized constituents");
    winners
}
