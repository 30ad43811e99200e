// src/config.rs
use clap::Parser;
use std::{path::PathBuf, time::Duration};

use crate::fetch::{MappingSource, DEFAULT_TIMEOUT, TAG_MAPPING_URL};

/// Command-line configuration for an import run.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Reconcile constituent, email and donation exports into import-ready CSVs"
)]
pub struct Config {
    #[arg(long, default_value = "data/input/constituents.csv")]
    pub constituents: PathBuf,
    #[arg(long, default_value = "data/input/emails.csv")]
    pub emails: PathBuf,
    #[arg(long, default_value = "data/input/donations.csv")]
    pub donations: PathBuf,
    #[arg(long, default_value = "data/output/output_constituents.csv")]
    pub out_constituents: PathBuf,
    #[arg(long, default_value = "data/output/output_tags.csv")]
    pub out_tags: PathBuf,

    /// Do not call the tag mapping API; keep tags as-is.
    #[arg(long)]
    pub no_network: bool,
    #[arg(long, env = "TAG_MAPPING_URL", default_value = TAG_MAPPING_URL)]
    pub tag_mapping_url: String,
    #[arg(long, env = "TAG_MAPPING_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub tag_mapping_timeout_secs: u64,
    /// Read the `[{name, mapped_name}]` list from a local JSON file instead.
    #[arg(long, conflicts_with = "no_network")]
    pub tag_mapping_file: Option<PathBuf>,

    /// Also write the run summary as JSON.
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

impl Config {
    pub fn mapping_source(&self) -> MappingSource {
        if self.no_network {
            MappingSource::Disabled
        } else if let Some(path) = &self.tag_mapping_file {
            MappingSource::File(path.clone())
        } else {
            MappingSource::Remote {
                url: self.tag_mapping_url.clone(),
                timeout: Duration::from_secs(self.tag_mapping_timeout_secs),
            }
        }
    }
}
