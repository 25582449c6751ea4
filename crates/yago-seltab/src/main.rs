// crates/yago-seltab/src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::Table;
use tracing::info;
use tracing_subscriber::EnvFilter;
use yago_seltab_core::config::{ExtractionConfig, OutputFormat};
use yago_seltab_core::pipeline;

/// Materialize the YAGO selected-tables slice: one table per popular
/// semantic type, built from the raw fact and type dumps.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Optional TOML config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Glob matching the raw fact triple files.
    #[arg(long)]
    facts: Option<String>,

    /// Glob matching the raw type assertion files.
    #[arg(long)]
    types: Option<String>,

    /// Output directory for the per-type tables.
    #[arg(long)]
    dest: Option<PathBuf>,

    /// Output format: parquet or csv.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// How many top-connectivity subjects seed the type selection.
    #[arg(long)]
    n_subjects: Option<usize>,

    /// Minimum fact count for a subject to count as popular.
    #[arg(long)]
    min_count: Option<usize>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let summary = pipeline::run(&config)?;

    let mut table = Table::new();
    table.set_header(vec!["type", "file", "rows", "columns"]);
    for report in &summary.tables {
        table.add_row(vec![
            report.type_label.clone(),
            report.file_name.clone(),
            report.rows.to_string(),
            report.columns.to_string(),
        ]);
    }
    println!("{table}");
    println!(
        "Wrote {} tables to {} (manifest: {})",
        summary.tables.len(),
        config.dest_path.display(),
        summary.manifest_path.display()
    );

    info!(
        fact_rows = summary.fact_rows,
        type_rows = summary.type_rows,
        ranked_subjects = summary.ranked_subjects,
        selected_types = summary.selected_types,
        thresholded_subjects = summary.thresholded_subjects,
        "run complete"
    );
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut config = match &cli.config {
        Some(path) => ExtractionConfig::from_file(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => ExtractionConfig::default(),
    };

    if let Some(facts) = &cli.facts {
        config.facts_pattern = facts.clone();
    }
    if let Some(types) = &cli.types {
        config.types_pattern = types.clone();
    }
    if let Some(dest) = &cli.dest {
        config.dest_path = dest.clone();
    }
    if let Some(format) = cli.format {
        config.output_format = format;
    }
    if let Some(n_subjects) = cli.n_subjects {
        config.n_subjects = n_subjects;
    }
    if let Some(min_count) = cli.min_count {
        config.min_count = min_count;
    }
    Ok(config)
}
