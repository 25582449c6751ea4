// crates/yago-seltab-core/src/export.rs

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::Utc;
use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::*;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::adjacency::AdjacencyMap;
use crate::config::{ExtractionConfig, OutputFormat};
use crate::error::Result;
use crate::model::{ensure_columns, sanitize_label, CAT_OBJECT, PREDICATE, SUBJECT, TYPE};

const FILE_PREFIX: &str = "yago_seltab";
const MANIFEST_FILE: &str = "manifest.json";

/// The subjects asserted to carry one selected type.
pub struct TypeTab {
    pub type_label: String,
    pub subjects: DataFrame,
}

/// What got written for one selected type.
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub type_label: String,
    pub file_name: String,
    pub rows: usize,
    pub columns: usize,
}

/// Collect the subject list of every selected type, in rank order. The full
/// types frame is used on purpose: subjects below the popularity threshold
/// still belong in their type's table.
pub fn tabs_by_type(types: &DataFrame, selected_types: &DataFrame) -> Result<Vec<TypeTab>> {
    ensure_columns(types, &[SUBJECT, TYPE], "types")?;
    ensure_columns(selected_types, &[TYPE], "selected types")?;

    let type_col = selected_types.column(TYPE)?.str()?;
    let mut tabs = Vec::with_capacity(selected_types.height());

    for idx in 0..selected_types.height() {
        let Some(type_label) = type_col.get(idx) else {
            continue;
        };
        let subjects = types
            .clone()
            .lazy()
            .filter(col(TYPE).eq(lit(type_label)))
            .select([col(SUBJECT)])
            .collect()?;
        if subjects.height() == 0 {
            warn!(type_label, "selected type has no subjects, skipping");
            continue;
        }
        tabs.push(TypeTab {
            type_label: type_label.to_string(),
            subjects,
        });
    }

    info!(tabs = tabs.len(), "collected per-type subject tabs");
    Ok(tabs)
}

/// Materialize one wide table per selected type under `dest_path` and
/// return a report per written file.
pub fn save_tabs_on_file(
    tabs: &[TypeTab],
    adj_dict: &AdjacencyMap,
    facts: &DataFrame,
    dest_path: &Path,
    output_format: OutputFormat,
) -> Result<Vec<TableReport>> {
    ensure_columns(facts, &[SUBJECT, PREDICATE, CAT_OBJECT], "facts")?;
    std::fs::create_dir_all(dest_path)?;

    let mut used_names: HashSet<String> = HashSet::new();
    let mut reports = Vec::with_capacity(tabs.len());

    for tab in tabs {
        let Some(predicates) = adj_dict.get(&tab.type_label) else {
            warn!(
                type_label = tab.type_label.as_str(),
                "selected type has no adjacent predicates, skipping"
            );
            continue;
        };

        let mut wide = widen_type_table(&tab.subjects, predicates, facts)?;
        let file_name = unique_file_name(&tab.type_label, output_format, &mut used_names);
        write_table(&mut wide, &dest_path.join(&file_name), output_format)?;

        info!(
            type_label = tab.type_label.as_str(),
            file = file_name.as_str(),
            rows = wide.height(),
            "wrote per-type table"
        );
        reports.push(TableReport {
            type_label: tab.type_label.clone(),
            file_name,
            rows: wide.height(),
            columns: wide.width(),
        });
    }

    Ok(reports)
}

/// One row per subject, one column per adjacent predicate, first observed
/// object as the value. Subjects without a single adjacent fact drop out.
fn widen_type_table(
    subjects: &DataFrame,
    predicates: &[String],
    facts: &DataFrame,
) -> Result<DataFrame> {
    let predicate_frame = DataFrame::new(vec![Series::new(
        PREDICATE.into(),
        predicates.to_vec(),
    )
    .into()])?;

    let long = subjects
        .clone()
        .lazy()
        .select([col(SUBJECT)])
        .join(
            facts
                .clone()
                .lazy()
                .select([col(SUBJECT), col(PREDICATE), col(CAT_OBJECT)]),
            [col(SUBJECT)],
            [col(SUBJECT)],
            JoinArgs::new(JoinType::Inner),
        )
        .join(
            predicate_frame.lazy(),
            [col(PREDICATE)],
            [col(PREDICATE)],
            JoinArgs::new(JoinType::Semi),
        );

    let mut column_names: HashSet<String> = HashSet::new();
    column_names.insert(SUBJECT.to_string());
    let mut aggs = Vec::with_capacity(predicates.len());
    for predicate in predicates {
        let name = dedupe_name(sanitize_label(predicate), &mut column_names);
        aggs.push(
            col(CAT_OBJECT)
                .filter(col(PREDICATE).eq(lit(predicate.as_str())))
                .first()
                .alias(name),
        );
    }

    let wide = long
        .group_by([col(SUBJECT)])
        .agg(aggs)
        .sort([SUBJECT], SortMultipleOptions::default())
        .collect()?;
    Ok(wide)
}

fn unique_file_name(
    type_label: &str,
    output_format: OutputFormat,
    used_names: &mut HashSet<String>,
) -> String {
    let base = format!("{FILE_PREFIX}_{}", sanitize_label(type_label));
    let stem = dedupe_name(base, used_names);
    format!("{stem}.{}", output_format.extension())
}

/// Distinct labels can sanitize to the same identifier; suffix the later
/// ones instead of clobbering.
fn dedupe_name(base: String, used: &mut HashSet<String>) -> String {
    if used.insert(base.clone()) {
        return base;
    }
    let mut attempt = 2usize;
    loop {
        let candidate = format!("{base}_{attempt}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        attempt += 1;
    }
}

fn write_table(df: &mut DataFrame, path: &Path, output_format: OutputFormat) -> Result<()> {
    let mut file = File::create(path)?;
    match output_format {
        OutputFormat::Parquet => {
            ParquetWriter::new(&mut file)
                .with_compression(ParquetCompression::Zstd(None))
                .with_statistics(StatisticsOptions::default())
                .finish(df)?;
        }
        OutputFormat::Csv => {
            CsvWriter::new(&mut file).finish(df)?;
        }
    }
    Ok(())
}

/// Record what the run produced next to the tables themselves.
pub fn write_manifest(
    dest_path: &Path,
    config: &ExtractionConfig,
    reports: &[TableReport],
) -> Result<PathBuf> {
    let manifest = json!({
        "generated_at": Utc::now().to_rfc3339(),
        "config": config,
        "tables": reports,
    });

    let path = dest_path.join(MANIFEST_FILE);
    std::fs::write(&path, serde_json::to_vec_pretty(&manifest)?)?;
    Ok(path)
}
