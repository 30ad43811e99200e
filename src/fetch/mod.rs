// src/fetch/mod.rs
//! Taxonomy fetch collaborator. Resolves the tag mapping once, before the
//! pipeline runs; network failures never reach the caller.

pub mod tag_mapping;

pub use tag_mapping::{
    fetch_tag_mapping, load_tag_mapping_file, MappingSource, DEFAULT_TIMEOUT,
    TAG_MAPPING_URL,
};
