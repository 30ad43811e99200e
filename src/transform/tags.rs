// src/transform/tags.rs
use serde::Deserialize;
use std::collections::HashMap;

use crate::process::clean_str;
use crate::transform::priority::first_unique_by;

/// One `{name, mapped_name}` pair as published by the taxonomy service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagMappingEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mapped_name: Option<String>,
}

/// Lower-cased original tag name → replacement display name.
/// Tags without an entry keep their original name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMapping {
    names: HashMap<String, String>,
}

impl TagMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from service entries, ignoring any with a blank name or target.
    pub fn from_entries(entries: impl IntoIterator<Item = TagMappingEntry>) -> Self {
        let mut mapping = Self::new();
        for entry in entries {
            let name = clean_str(entry.name.as_deref().unwrap_or(""));
            let mapped = clean_str(entry.mapped_name.as_deref().unwrap_or(""));
            if !name.is_empty() && !mapped.is_empty() {
                mapping.insert(name, mapped);
            }
        }
        mapping
    }

    /// Register a rename. Mapping a tag to "" removes it from every tag list.
    pub fn insert(&mut self, name: &str, mapped_name: &str) {
        self.names
            .insert(name.trim().to_lowercase(), mapped_name.trim().to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.names.get(&name.trim().to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for TagMapping {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (name, mapped) in iter {
            mapping.insert(name, mapped);
        }
        mapping
    }
}

/// Split a comma-delimited tag string, trim, drop empties, and de-duplicate
/// case-insensitively keeping the first-seen casing.
pub fn split_tags(raw: &str) -> Vec<String> {
    let pieces = clean_str(raw)
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);
    first_unique_by(pieces, |t| t.to_lowercase(), None)
}

/// Rename each tag through `mapping`, drop tags renamed to "", and de-duplicate
/// again since several originals may land on one name.
pub fn apply_tag_mapping(tags: &[String], mapping: &TagMapping) -> Vec<String> {
    let mapped = tags
        .iter()
        .map(|t| clean_str(mapping.get(t).unwrap_or(t.as_str())).to_string())
        .filter(|t| !t.is_empty());
    first_unique_by(mapped, |t| t.to_lowercase(), None)
}

/// Final tag list for one identity.
pub fn normalize_tags(raw: &str, mapping: &TagMapping) -> Vec<String> {
    apply_tag_mapping(&split_tags(raw), mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_split_dedupes_case_insensitively() {
        assert_eq!(split_tags("Board, board, Donor"), vec!["Board", "Donor"]);
        assert_eq!(split_tags(" , ,Volunteer,, "), vec!["Volunteer"]);
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn mapping_renames_and_redupes() {
        let mapping: TagMapping = [("donor", "Major Donor")].into_iter().collect();
        assert_eq!(
            normalize_tags("Board, board, Donor", &mapping),
            vec!["Board", "Major Donor"]
        );
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mapping: TagMapping = [("DONOR ", "Major Donor")].into_iter().collect();
        assert_eq!(mapping.get("donor"), Some("Major Donor"));
        assert_eq!(normalize_tags("dOnOr", &mapping), vec!["Major Donor"]);
    }

    #[test]
    fn collapsing_originals_keep_first_position() {
        let mapping: TagMapping = [("gala 2023", "Event Attendee"), ("gala 2024", "Event Attendee")]
            .into_iter()
            .collect();
        assert_eq!(
            normalize_tags("Gala 2023, Board, Gala 2024", &mapping),
            vec!["Event Attendee", "Board"]
        );
    }

    #[test]
    fn mapped_name_colliding_with_local_tag_dedupes() {
        let mapping: TagMapping = [("trustee", "board")].into_iter().collect();
        assert_eq!(normalize_tags("Board, Trustee", &mapping), vec!["Board"]);
    }

    #[test]
    fn tags_mapped_to_empty_are_dropped() {
        let mapping: TagMapping = [("legacy", "")].into_iter().collect();
        assert_eq!(normalize_tags("Legacy, Board", &mapping), vec!["Board"]);
    }

    #[test]
    fn entries_with_blank_fields_are_ignored() {
        let mapping = TagMapping::from_entries([
            TagMappingEntry {
                name: Some(" Donor ".into()),
                mapped_name: Some(" Major Donor ".into()),
            },
            TagMappingEntry {
                name: Some("Board".into()),
                mapped_name: Some("   ".into()),
            },
            TagMappingEntry {
                name: None,
                mapped_name: Some("Orphan".into()),
            },
        ]);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("DONOR"), Some("Major Donor"));
        assert_eq!(mapping.get("board"), None);
    }
}
