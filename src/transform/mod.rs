// src/transform/mod.rs
//! Reconciliation pipeline: canonicalize → resolve contacts → aggregate
//! donations → normalize tags → assemble records → count tags.
//!
//! Every stage is a pure function over in-memory rows; the taxonomy mapping
//! arrives fully resolved.

pub mod assemble;
pub mod contact;
pub mod donation;
pub mod identity;
pub mod model;
pub mod priority;
pub mod tag_count;
pub mod tags;

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::error::ImportError;
use crate::table::Table;

pub use assemble::{constituents_table, CONSTITUENT_COLUMNS, PLACEHOLDER_NAME};
pub use model::{CanonicalConstituent, ConstituentKind, TagCount};
pub use priority::{best_by_rank, first_unique_by};
pub use tag_count::{tags_table, TAG_COLUMNS};
pub use tags::{TagMapping, TagMappingEntry};

use assemble::{assemble, identity_universe, Enrichments};
use contact::resolve_contacts;
use donation::aggregate_donations;
use identity::canonicalize_constituents;
use model::{RawConstituent, RawDonation, RawEmail};
use tag_count::count_tags;
use tags::normalize_tags;

/// Run-level counts for a human reviewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub tag_mapping_loaded: bool,
    pub num_constituents: usize,
    pub num_companies: usize,
    pub num_people: usize,
    pub num_people_with_placeholder_names: usize,
    /// Counted over every input row, blank identity keys included.
    /// `None` when the donations input has no `Status` column.
    pub donations_paid_rows: Option<usize>,
    pub donations_refunded_rows: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub constituents: Vec<CanonicalConstituent>,
    pub tags: Vec<TagCount>,
    pub summary: RunSummary,
}

impl PipelineOutput {
    pub fn constituents_table(&self) -> Table {
        constituents_table(&self.constituents)
    }

    pub fn tags_table(&self) -> Table {
        tags_table(&self.tags)
    }
}

/// Rows of the raw donations table with the given status, including rows
/// that were skipped for a blank identity key. `None` without a `Status` column.
fn count_status(donations: &Table, status: &str) -> Option<usize> {
    let statuses = donations.column_values("Status")?;
    Some(
        statuses
            .filter(|s| s.trim().eq_ignore_ascii_case(status))
            .count(),
    )
}

fn summarize(records: &[CanonicalConstituent], donations: &Table, mapping: &TagMapping) -> RunSummary {
    let people = records
        .iter()
        .filter(|r| r.kind == ConstituentKind::Person);
    let (num_people, num_people_with_placeholder_names) =
        people.fold((0, 0), |(all, placeholder), r| {
            (all + 1, placeholder + (r.first_name == PLACEHOLDER_NAME) as usize)
        });

    RunSummary {
        tag_mapping_loaded: !mapping.is_empty(),
        num_constituents: records.len(),
        num_companies: records.len() - num_people,
        num_people,
        num_people_with_placeholder_names,
        donations_paid_rows: count_status(donations, "paid"),
        donations_refunded_rows: count_status(donations, "refunded"),
    }
}

/// Reconcile the three input tables into the constituents and tag-count outputs.
///
/// Fails only when a required column is missing; every per-row data problem
/// degrades to blank output instead.
#[tracing::instrument(
    level = "info",
    skip_all,
    fields(
        constituents = constituents.len(),
        emails = emails.len(),
        donations = donations.len(),
        mapping = mapping.len()
    )
)]
pub fn run(
    constituents: &Table,
    emails: &Table,
    donations: &Table,
    mapping: &TagMapping,
) -> Result<PipelineOutput, ImportError> {
    let raw_constituents = RawConstituent::from_table(constituents)?;
    let raw_emails = RawEmail::from_table(emails)?;
    let raw_donations = RawDonation::from_table(donations)?;

    let universe = identity_universe(&raw_constituents, &raw_emails, &raw_donations);
    let canonical = canonicalize_constituents(raw_constituents);

    let contacts = resolve_contacts(&canonical, &raw_emails);
    let donation_metrics = aggregate_donations(&raw_donations);
    let tags: BTreeMap<String, Vec<String>> = canonical
        .iter()
        .map(|c| (c.patron_id.clone(), normalize_tags(&c.tags, mapping)))
        .collect();

    let records = assemble(
        &universe,
        &canonical,
        &Enrichments {
            contacts: &contacts,
            donations: &donation_metrics,
            tags: &tags,
        },
    );
    let tag_counts = count_tags(tags.iter().map(|(id, t)| (id.as_str(), t)));

    let summary = summarize(&records, donations, mapping);
    info!(
        constituents = summary.num_constituents,
        companies = summary.num_companies,
        people = summary.num_people,
        tags = tag_counts.len(),
        "pipeline complete"
    );

    Ok(PipelineOutput {
        constituents: records,
        tags: tag_counts,
        summary,
    })
}
