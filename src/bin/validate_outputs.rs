use anyhow::Result;
use clap::Parser;
use patron_import::{
    validate::{validate_constituents, validate_tags},
    Table,
};
use std::{path::PathBuf, process::ExitCode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Re-run output checks over already-written CSVs")]
struct Args {
    #[arg(long, default_value = "data/output/output_constituents.csv")]
    constituents: PathBuf,
    #[arg(long, default_value = "data/output/output_tags.csv")]
    tags: PathBuf,
}

fn main() -> Result<ExitCode> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env).init();
    let args = Args::parse();

    let constituents = Table::read_csv("constituents", &args.constituents)?;
    let tags = Table::read_csv("tags", &args.tags)?;
    info!(
        constituents = constituents.len(),
        tags = tags.len(),
        "loaded outputs"
    );

    let mut issues = validate_constituents(&constituents);
    issues.extend(validate_tags(&tags));

    if issues.is_empty() {
        println!("Validation passed.");
        return Ok(ExitCode::SUCCESS);
    }
    println!("VALIDATION ISSUES:");
    for issue in &issues {
        println!(" - {}", issue);
    }
    Ok(ExitCode::from(2))
}
