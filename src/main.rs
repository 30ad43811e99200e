use anyhow::{Context, Result};
use clap::Parser;
use patron_import::{
    config::Config,
    run,
    validate::{validate_constituents, validate_tags},
    Table,
};
use std::{fs, process::ExitCode};
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Exit status when outputs were written but validation found issues.
const EXIT_VALIDATION_ISSUES: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    let config = Config::parse();
    let start = Instant::now();
    info!("startup");

    // ─── 2) load inputs ──────────────────────────────────────────────
    let constituents = Table::read_csv("constituents", &config.constituents)?;
    let emails = Table::read_csv("emails", &config.emails)?;
    let donations = Table::read_csv("donations", &config.donations)?;

    // ─── 3) resolve tag mapping (once, before the pipeline) ──────────
    let mapping = config.mapping_source().resolve().await?;

    // ─── 4) reconcile on the blocking pool ───────────────────────────
    let output = tokio::task::spawn_blocking(move || {
        run(&constituents, &emails, &donations, &mapping)
    })
    .await??;
    let out_constituents = output.constituents_table();
    let out_tags = output.tags_table();

    // ─── 5) validate, then write regardless ──────────────────────────
    let mut issues = validate_constituents(&out_constituents);
    issues.extend(validate_tags(&out_tags));

    out_constituents.write_csv(&config.out_constituents)?;
    out_tags.write_csv(&config.out_tags)?;

    println!("Wrote:");
    println!(" - {} ({} rows)", config.out_constituents.display(), out_constituents.len());
    println!(" - {} ({} rows)", config.out_tags.display(), out_tags.len());
    println!("Notes: {}", serde_json::to_string(&output.summary)?);

    if let Some(path) = &config.summary {
        let json = serde_json::to_string_pretty(&output.summary)?;
        fs::write(path, json).with_context(|| format!("writing summary {}", path.display()))?;
        info!("wrote summary to {}", path.display());
    }
    info!(elapsed = ?start.elapsed(), "all done");

    if !issues.is_empty() {
        warn!(issues = issues.len(), "validation found issues");
        println!("\nVALIDATION ISSUES:");
        for issue in &issues {
            println!(" - {}", issue);
        }
        return Ok(ExitCode::from(EXIT_VALIDATION_ISSUES));
    }

    println!("\nValidation passed.");
    Ok(ExitCode::SUCCESS)
}
