// src/transform/contact.rs
use std::collections::BTreeMap;
use tracing::debug;

use crate::process::{is_valid_email, standardize_email};
use crate::transform::model::{RawConstituent, RawEmail};
use crate::transform::priority::first_unique_by;

/// At most two standardized, validated, distinct addresses. `email_2` is never
/// set without `email_1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPair {
    pub email_1: String,
    pub email_2: String,
}

impl ContactPair {
    fn from_candidates(candidates: Vec<String>) -> Self {
        let mut picked = first_unique_by(candidates, |e| e.clone(), Some(2)).into_iter();
        let email_1 = picked.next().unwrap_or_default();
        let email_2 = match picked.next() {
            Some(e) if !email_1.is_empty() && e != email_1 => e,
            _ => String::new(),
        };
        ContactPair { email_1, email_2 }
    }
}

fn valid_standardized(raw: &str) -> Option<String> {
    let email = standardize_email(raw);
    (!email.is_empty() && is_valid_email(&email)).then_some(email)
}

/// Build each identity's ranked candidate list (primary email first, then the
/// email table in file order) and keep the first two distinct addresses.
///
/// Identities that only appear in the email table still get an entry.
#[tracing::instrument(level = "info", skip_all, fields(constituents = constituents.len(), emails = emails.len()))]
pub fn resolve_contacts(
    constituents: &[RawConstituent],
    emails: &[RawEmail],
) -> BTreeMap<String, ContactPair> {
    let mut candidates: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for c in constituents {
        let list = candidates.entry(c.patron_id.clone()).or_default();
        list.extend(valid_standardized(&c.primary_email));
    }

    let mut rejected = 0usize;
    for e in emails {
        let list = candidates.entry(e.patron_id.clone()).or_default();
        match valid_standardized(&e.email) {
            Some(email) => list.push(email),
            None => rejected += 1,
        }
    }
    if rejected > 0 {
        debug!(rejected, "ignored invalid email table entries");
    }

    candidates
        .into_iter()
        .map(|(id, list)| (id, ContactPair::from_candidates(list)))
        .collect()
}
