// src/transform/tag_count.rs
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use crate::table::Table;
use crate::transform::model::TagCount;

pub const TAG_COLUMNS: [&str; 2] = ["CB Tag Name", "CB Tag Count"];

/// Count distinct identities per final tag name, sorted by count descending
/// then name ascending.
pub fn count_tags<'a, I, T>(tagged: I) -> Vec<TagCount>
where
    I: IntoIterator<Item = (&'a str, T)>,
    T: IntoIterator<Item = &'a String>,
{
    let mut pairs: HashSet<(&str, &str)> = HashSet::new();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for (id, tags) in tagged {
        for tag in tags {
            if pairs.insert((id, tag.as_str())) {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }
    }

    let mut out: Vec<TagCount> = counts
        .into_iter()
        .map(|(name, count)| TagCount {
            name: name.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| (Reverse(a.count), &a.name).cmp(&(Reverse(b.count), &b.name)));
    out
}

pub fn tags_table(counts: &[TagCount]) -> Table {
    let mut table = Table::new("tags", TAG_COLUMNS);
    for tc in counts {
        table.push_row([tc.name.clone(), tc.count.to_string()]);
    }
    table
}
