// src/transform/donation.rs
use chrono::NaiveDateTime;
use std::collections::{btree_map::Entry, BTreeMap};
use tracing::debug;

use crate::process::{format_cents, parse_amount_cents, parse_datetime};
use crate::transform::model::RawDonation;

const SETTLED_STATUS: &str = "paid";

/// Per-identity totals over settled transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonationSummary {
    pub lifetime_cents: i64,
    pub recent_at: NaiveDateTime,
    pub recent_cents: i64,
}

impl DonationSummary {
    pub fn lifetime_amount(&self) -> String {
        format_cents(self.lifetime_cents)
    }

    pub fn recent_date(&self) -> String {
        self.recent_at.format("%Y-%m-%d").to_string()
    }

    pub fn recent_amount(&self) -> String {
        format_cents(self.recent_cents)
    }

    /// Fold one more transaction in. Returns `false`, leaving the summary
    /// untouched, when the lifetime total would overflow.
    fn record(&mut self, at: NaiveDateTime, cents: i64) -> bool {
        let Some(lifetime) = self.lifetime_cents.checked_add(cents) else {
            return false;
        };
        self.lifetime_cents = lifetime;
        if (at, cents) > (self.recent_at, self.recent_cents) {
            self.recent_at = at;
            self.recent_cents = cents;
        }
        true
    }
}

/// True when the row counts as settled. A missing `Status` column means every
/// row counts.
pub fn is_settled(donation: &RawDonation) -> bool {
    donation
        .status
        .as_deref()
        .map_or(true, |s| s.trim().eq_ignore_ascii_case(SETTLED_STATUS))
}

/// Sum settled, parseable transactions per identity and pick the most recent
/// one (latest date, then largest amount, then earliest row).
///
/// Rows with an unparseable amount or date are silently excluded, as are rows
/// that would push an identity's lifetime total out of range. Identities
/// with no qualifying rows are absent from the result.
#[tracing::instrument(level = "info", skip_all, fields(input_rows = donations.len()))]
pub fn aggregate_donations(donations: &[RawDonation]) -> BTreeMap<String, DonationSummary> {
    let mut out: BTreeMap<String, DonationSummary> = BTreeMap::new();
    let mut unsettled = 0usize;
    let mut unparseable = 0usize;
    let mut overflowed = 0usize;

    for d in donations {
        if !is_settled(d) {
            unsettled += 1;
            continue;
        }
        let (Some(cents), Some(at)) = (parse_amount_cents(&d.amount), parse_datetime(&d.date))
        else {
            unparseable += 1;
            continue;
        };

        match out.entry(d.patron_id.clone()) {
            Entry::Occupied(mut e) => {
                if !e.get_mut().record(at, cents) {
                    overflowed += 1;
                }
            }
            Entry::Vacant(e) => {
                e.insert(DonationSummary {
                    lifetime_cents: cents,
                    recent_at: at,
                    recent_cents: cents,
                });
            }
        }
    }

    debug!(
        donors = out.len(),
        unsettled,
        unparseable,
        overflowed,
        "aggregated donations"
    );
    out
}
