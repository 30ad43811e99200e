// src/transform/assemble.rs
use std::collections::{BTreeMap, BTreeSet};

use crate::process::{clean_str, normalize_date, normalize_salutation};
use crate::table::Table;
use crate::transform::contact::ContactPair;
use crate::transform::donation::DonationSummary;
use crate::transform::model::{
    CanonicalConstituent, ConstituentKind, RawConstituent, RawDonation, RawEmail,
};

pub const CONSTITUENT_COLUMNS: [&str; 14] = [
    "CB Constituent ID",
    "CB Constituent Type",
    "CB First Name",
    "CB Last Name",
    "CB Company Name",
    "CB Created At",
    "CB Email 1 (Standardized)",
    "CB Email 2 (Standardized)",
    "CB Title",
    "CB Tags",
    "CB Background Information",
    "CB Lifetime Donation Amount",
    "CB Most Recent Donation Date",
    "CB Most Recent Donation Amount",
];

/// Non-personal stand-in used when a person's name is incomplete.
pub const PLACEHOLDER_NAME: &str = "Unknown";

/// `("Unknown", "Unknown-<id>")`: non-empty and distinct per identity.
pub fn placeholder_names(patron_id: &str) -> (String, String) {
    (
        PLACEHOLDER_NAME.to_string(),
        format!("{PLACEHOLDER_NAME}-{patron_id}"),
    )
}

/// Keep the given names only when both are present.
pub fn person_names(patron_id: &str, first: &str, last: &str) -> (String, String) {
    let (first, last) = (clean_str(first), clean_str(last));
    if first.is_empty() || last.is_empty() {
        placeholder_names(patron_id)
    } else {
        (first.to_string(), last.to_string())
    }
}

/// A non-empty company name wins over any person name fields.
pub fn classify(company: &str) -> ConstituentKind {
    if clean_str(company).is_empty() {
        ConstituentKind::Person
    } else {
        ConstituentKind::Company
    }
}

pub fn background_information(job_title: &str) -> String {
    match clean_str(job_title) {
        "" => String::new(),
        title => format!("Job Title: {title}"),
    }
}

/// Every identity key seen in any of the three sources, ascending.
pub fn identity_universe(
    constituents: &[RawConstituent],
    emails: &[RawEmail],
    donations: &[RawDonation],
) -> BTreeSet<String> {
    constituents
        .iter()
        .map(|c| &c.patron_id)
        .chain(emails.iter().map(|e| &e.patron_id))
        .chain(donations.iter().map(|d| &d.patron_id))
        .cloned()
        .collect()
}

/// Stage outputs keyed by identity, joined onto the universe.
pub struct Enrichments<'a> {
    pub contacts: &'a BTreeMap<String, ContactPair>,
    pub donations: &'a BTreeMap<String, DonationSummary>,
    pub tags: &'a BTreeMap<String, Vec<String>>,
}

/// Build one output record per identity in `universe`.
///
/// `constituents` must already be canonical (one row per key).
#[tracing::instrument(level = "info", skip_all, fields(universe = universe.len()))]
pub fn assemble(
    universe: &BTreeSet<String>,
    constituents: &[RawConstituent],
    enrich: &Enrichments<'_>,
) -> Vec<CanonicalConstituent> {
    let by_id: BTreeMap<&str, &RawConstituent> = constituents
        .iter()
        .map(|c| (c.patron_id.as_str(), c))
        .collect();
    let blank = RawConstituent::default();

    universe
        .iter()
        .map(|id| {
            let raw = by_id.get(id.as_str()).copied().unwrap_or(&blank);
            let kind = classify(&raw.company);

            let (first_name, last_name, company_name) = match kind {
                ConstituentKind::Company => {
                    (String::new(), String::new(), clean_str(&raw.company).to_string())
                }
                ConstituentKind::Person => {
                    let (first, last) = person_names(id, &raw.first_name, &raw.last_name);
                    (first, last, String::new())
                }
            };

            let contact = enrich.contacts.get(id).cloned().unwrap_or_default();
            let email_2 = if contact.email_1.is_empty() {
                String::new()
            } else {
                contact.email_2
            };

            let donation = enrich.donations.get(id);

            CanonicalConstituent {
                id: id.clone(),
                kind,
                first_name,
                last_name,
                company_name,
                created_at: normalize_date(&raw.date_entered),
                email_1: contact.email_1,
                email_2,
                title: normalize_salutation(&raw.salutation).to_string(),
                tags: enrich.tags.get(id).cloned().unwrap_or_default(),
                background: background_information(&raw.title),
                lifetime_donation: donation.map(|d| d.lifetime_amount()).unwrap_or_default(),
                recent_donation_date: donation.map(|d| d.recent_date()).unwrap_or_default(),
                recent_donation_amount: donation.map(|d| d.recent_amount()).unwrap_or_default(),
            }
        })
        .collect()
}

pub fn constituents_table(records: &[CanonicalConstituent]) -> Table {
    let mut table = Table::new("constituents", CONSTITUENT_COLUMNS);
    for r in records {
        table.push_row([
            r.id.clone(),
            r.kind.to_string(),
            r.first_name.clone(),
            r.last_name.clone(),
            r.company_name.clone(),
            r.created_at.clone(),
            r.email_1.clone(),
            r.email_2.clone(),
            r.title.clone(),
            r.tags.join(", "),
            r.background.clone(),
            r.lifetime_donation.clone(),
            r.recent_donation_date.clone(),
            r.recent_donation_amount.clone(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(id: &str) -> RawConstituent {
        RawConstituent {
            patron_id: id.into(),
            ..Default::default()
        }
    }

    struct Fixture {
        contacts: BTreeMap<String, ContactPair>,
        donations: BTreeMap<String, DonationSummary>,
        tags: BTreeMap<String, Vec<String>>,
    }

    impl Fixture {
        fn empty() -> Self {
            Fixture {
                contacts: BTreeMap::new(),
                donations: BTreeMap::new(),
                tags: BTreeMap::new(),
            }
        }

        fn run(&self, constituents: &[RawConstituent], extra_ids: &[&str]) -> Vec<CanonicalConstituent> {
            let mut universe: BTreeSet<String> =
                constituents.iter().map(|c| c.patron_id.clone()).collect();
            universe.extend(extra_ids.iter().map(|s| s.to_string()));
            assemble(
                &universe,
                constituents,
                &Enrichments {
                    contacts: &self.contacts,
                    donations: &self.donations,
                    tags: &self.tags,
                },
            )
        }
    }

    #[test]
    fn placeholder_format_is_pinned() {
        assert_eq!(
            placeholder_names("1288"),
            ("Unknown".to_string(), "Unknown-1288".to_string())
        );
    }

    #[test]
    fn incomplete_person_name_uses_placeholder() {
        assert_eq!(person_names("5", "Jane", ""), placeholder_names("5"));
        assert_eq!(person_names("5", "", "Doe"), placeholder_names("5"));
        assert_eq!(
            person_names("5", " Jane ", "Doe"),
            ("Jane".to_string(), "Doe".to_string())
        );
    }

    #[test]
    fn company_field_takes_precedence() {
        let mut c = raw("1");
        c.company = "Acme Foundation".into();
        c.first_name = "Jane".into();
        c.last_name = "Doe".into();

        let out = Fixture::empty().run(&[c], &[]);
        assert_eq!(out[0].kind, ConstituentKind::Company);
        assert_eq!(out[0].company_name, "Acme Foundation");
        assert_eq!(out[0].first_name, "");
        assert_eq!(out[0].last_name, "");
    }

    #[test]
    fn identities_outside_constituents_default_to_placeholder_person() {
        let out = Fixture::empty().run(&[], &["99"]);
        let r = &out[0];
        assert_eq!(r.kind, ConstituentKind::Person);
        assert_eq!((r.first_name.as_str(), r.last_name.as_str()), ("Unknown", "Unknown-99"));
        assert_eq!(r.created_at, "");
        assert_eq!(r.title, "");
        assert_eq!(r.background, "");
        assert!(r.tags.is_empty());
    }

    #[test]
    fn constituent_fields_are_normalized() {
        let mut c = raw("1");
        c.first_name = "Jane".into();
        c.last_name = "Doe".into();
        c.salutation = "dr.".into();
        c.title = "Chief Curator".into();
        c.date_entered = "3/15/2021".into();

        let out = Fixture::empty().run(&[c], &[]);
        assert_eq!(out[0].title, "Dr.");
        assert_eq!(out[0].background, "Job Title: Chief Curator");
        assert_eq!(out[0].created_at, "2021-03-15");
    }

    #[test]
    fn email_two_is_cleared_without_email_one() {
        let mut fx = Fixture::empty();
        fx.contacts.insert(
            "1".into(),
            ContactPair {
                email_1: String::new(),
                email_2: "orphan@x.org".into(),
            },
        );
        let out = fx.run(&[raw("1")], &[]);
        assert_eq!(out[0].email_1, "");
        assert_eq!(out[0].email_2, "");
    }

    #[test]
    fn donation_and_tag_enrichment_merge_by_id() {
        let mut fx = Fixture::empty();
        fx.donations.insert(
            "2".into(),
            DonationSummary {
                lifetime_cents: 123456,
                recent_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                recent_cents: 5000,
            },
        );
        fx.tags
            .insert("2".into(), vec!["Board".into(), "Major Donor".into()]);

        let out = fx.run(&[raw("1"), raw("2")], &[]);
        assert_eq!(out[0].lifetime_donation, "");
        assert_eq!(out[0].recent_donation_date, "");
        assert_eq!(out[1].lifetime_donation, "$1,234.56");
        assert_eq!(out[1].recent_donation_date, "2024-03-01");
        assert_eq!(out[1].recent_donation_amount, "$50.00");

        let table = constituents_table(&out);
        assert_eq!(table.headers, CONSTITUENT_COLUMNS);
        assert_eq!(table.cell(1, table.column("CB Tags")), "Board, Major Donor");
    }

    #[test]
    fn universe_is_union_of_sources() {
        let emails = [RawEmail {
            patron_id: "3".into(),
            email: "x@y.org".into(),
        }];
        let donations = [RawDonation {
            patron_id: "2".into(),
            amount: "$1".into(),
            date: "2024-01-01".into(),
            status: None,
        }];
        let universe = identity_universe(&[raw("1"), raw("3")], &emails, &donations);
        let ids: Vec<&str> = universe.iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
