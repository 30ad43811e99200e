// src/transform/model.rs
use std::fmt;
use tracing::debug;

use crate::error::ImportError;
use crate::process::clean_str;
use crate::table::Table;

pub const PATRON_ID: &str = "Patron ID";

/// One constituent snapshot. Several rows may share a `patron_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConstituent {
    pub patron_id: String,
    pub company: String,
    pub first_name: String,
    pub last_name: String,
    pub salutation: String,
    /// Job title, not an honorific.
    pub title: String,
    pub date_entered: String,
    pub primary_email: String,
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEmail {
    pub patron_id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDonation {
    pub patron_id: String,
    pub amount: String,
    pub date: String,
    /// `None` when the input has no `Status` column at all.
    pub status: Option<String>,
}

/// Rows with a blank identity key cannot be joined to anything and are dropped.
fn non_blank_rows(table: &Table, id_col: usize) -> impl Iterator<Item = usize> + '_ {
    let mut skipped = 0usize;
    let kept: Vec<usize> = (0..table.len())
        .filter(|&i| {
            let blank = clean_str(table.cell(i, Some(id_col))).is_empty();
            skipped += blank as usize;
            !blank
        })
        .collect();
    if skipped > 0 {
        debug!(table = %table.name, skipped, "skipped rows with blank {}", PATRON_ID);
    }
    kept.into_iter()
}

impl RawConstituent {
    pub fn from_table(table: &Table) -> Result<Vec<Self>, ImportError> {
        let id = table.require_column(PATRON_ID)?;
        let date_entered = table.require_column("Date Entered")?;
        let primary_email = table.require_column("Primary Email")?;
        let tags = table.require_column("Tags")?;
        let salutation = table.require_column("Salutation")?;
        let title = table.require_column("Title")?;
        let company = table.column("Company");
        let first_name = table.column("First Name");
        let last_name = table.column("Last Name");

        Ok(non_blank_rows(table, id)
            .map(|i| {
                let get = |col: Option<usize>| clean_str(table.cell(i, col)).to_string();
                RawConstituent {
                    patron_id: get(Some(id)),
                    company: get(company),
                    first_name: get(first_name),
                    last_name: get(last_name),
                    salutation: get(Some(salutation)),
                    title: get(Some(title)),
                    date_entered: get(Some(date_entered)),
                    primary_email: get(Some(primary_email)),
                    tags: get(Some(tags)),
                }
            })
            .collect())
    }
}

impl RawEmail {
    pub fn from_table(table: &Table) -> Result<Vec<Self>, ImportError> {
        let id = table.require_column(PATRON_ID)?;
        let email = table.require_column("Email")?;

        Ok(non_blank_rows(table, id)
            .map(|i| RawEmail {
                patron_id: clean_str(table.cell(i, Some(id))).to_string(),
                email: table.cell(i, Some(email)).to_string(),
            })
            .collect())
    }
}

impl RawDonation {
    pub fn from_table(table: &Table) -> Result<Vec<Self>, ImportError> {
        let id = table.require_column(PATRON_ID)?;
        let amount = table.require_column("Donation Amount")?;
        let date = table.require_column("Donation Date")?;
        let status = table.column("Status");

        Ok(non_blank_rows(table, id)
            .map(|i| RawDonation {
                patron_id: clean_str(table.cell(i, Some(id))).to_string(),
                amount: table.cell(i, Some(amount)).to_string(),
                date: table.cell(i, Some(date)).to_string(),
                status: status.map(|_| clean_str(table.cell(i, status)).to_string()),
            })
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstituentKind {
    Person,
    Company,
}

impl ConstituentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstituentKind::Person => "Person",
            ConstituentKind::Company => "Company",
        }
    }
}

impl fmt::Display for ConstituentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reconciled output record. All "absent" values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalConstituent {
    pub id: String,
    pub kind: ConstituentKind,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub created_at: String,
    pub email_1: String,
    pub email_2: String,
    pub title: String,
    pub tags: Vec<String>,
    pub background: String,
    pub lifetime_donation: String,
    pub recent_donation_date: String,
    pub recent_donation_amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}
