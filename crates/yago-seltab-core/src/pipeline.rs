// crates/yago-seltab-core/src/pipeline.rs

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::export::{self, TableReport};
use crate::{adjacency, ingestion, ranking, selection};

/// Row counts observed at each stage plus the written tables.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionSummary {
    pub fact_rows: usize,
    pub type_rows: usize,
    pub ranked_subjects: usize,
    pub selected_types: usize,
    pub thresholded_subjects: usize,
    pub tables: Vec<TableReport>,
    pub manifest_path: PathBuf,
}

/// Run the whole extraction in its fixed order. Each step consumes the
/// previous step's output; the first error aborts the run.
pub fn run(config: &ExtractionConfig) -> Result<ExtractionSummary> {
    info!(
        facts_pattern = config.facts_pattern.as_str(),
        types_pattern = config.types_pattern.as_str(),
        dest = %config.dest_path.display(),
        format = %config.output_format,
        n_subjects = config.n_subjects,
        min_count = config.min_count,
        "starting yago seltab extraction"
    );

    let inputs = ingestion::read_yago_files(config)?;

    let subject_counts = ranking::subject_count_sorted(&inputs.facts)?;

    let selected = ranking::selected_types(&subject_counts, &inputs.types, config.n_subjects)?;

    let (subjects, types_subset) = selection::subjects_in_selected_types(
        &inputs.facts,
        &selected,
        &inputs.types,
        config.min_count,
    )?;

    let types_predicates = adjacency::join_types_predicates(&types_subset, &inputs.facts)?;

    let adj_dict = adjacency::build_adj_dict(&types_predicates)?;

    let tabs = export::tabs_by_type(&inputs.types, &selected)?;

    let tables = export::save_tabs_on_file(
        &tabs,
        &adj_dict,
        &inputs.facts,
        &config.dest_path,
        config.output_format,
    )?;

    let manifest_path = export::write_manifest(&config.dest_path, config, &tables)?;

    let summary = ExtractionSummary {
        fact_rows: inputs.facts.height(),
        type_rows: inputs.types.height(),
        ranked_subjects: subject_counts.height(),
        selected_types: selected.height(),
        thresholded_subjects: subjects.height(),
        tables,
        manifest_path,
    };

    info!(
        tables = summary.tables.len(),
        manifest = %summary.manifest_path.display(),
        "extraction finished"
    );
    Ok(summary)
}
