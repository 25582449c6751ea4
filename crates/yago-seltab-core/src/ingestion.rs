// crates/yago-seltab-core/src/ingestion.rs

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::info;

use crate::config::ExtractionConfig;
use crate::error::{PipelineError, Result};
use crate::model::{CAT_OBJECT, FACT_ID, NUM_OBJECT, PREDICATE, SUBJECT, TYPE};

/// The two raw frames every downstream stage consumes.
#[derive(Debug)]
pub struct YagoInputs {
    pub facts: DataFrame,
    pub types: DataFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TripleKind {
    Facts,
    Types,
}

impl TripleKind {
    fn label(&self) -> &'static str {
        match self {
            TripleKind::Facts => "facts",
            TripleKind::Types => "types",
        }
    }

    /// Raw column layout for a headerless TSV part of the given width.
    fn layout(&self, width: usize) -> Option<&'static [&'static str]> {
        match (self, width) {
            (TripleKind::Facts, 5) => Some(&[FACT_ID, SUBJECT, PREDICATE, CAT_OBJECT, NUM_OBJECT]),
            (TripleKind::Facts, 4) => Some(&[SUBJECT, PREDICATE, CAT_OBJECT, NUM_OBJECT]),
            (TripleKind::Facts, 3) => Some(&[SUBJECT, PREDICATE, CAT_OBJECT]),
            (TripleKind::Types, 4) => Some(&[FACT_ID, SUBJECT, PREDICATE, TYPE]),
            (TripleKind::Types, 3) => Some(&[SUBJECT, PREDICATE, TYPE]),
            (TripleKind::Types, 2) => Some(&[SUBJECT, TYPE]),
            _ => None,
        }
    }
}

/// Read the raw YAGO fact and type dumps named by the config globs.
pub fn read_yago_files(config: &ExtractionConfig) -> Result<YagoInputs> {
    let facts = read_triple_files(&config.facts_pattern, TripleKind::Facts)?;
    let types = read_triple_files(&config.types_pattern, TripleKind::Types)?;
    info!(
        facts = facts.height(),
        types = types.height(),
        "loaded yago inputs"
    );
    Ok(YagoInputs { facts, types })
}

fn read_triple_files(pattern: &str, kind: TripleKind) -> Result<DataFrame> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(PipelineError::Validation(format!(
            "no {} files matched pattern '{pattern}'",
            kind.label()
        )));
    }

    let mut frames: Vec<LazyFrame> = Vec::with_capacity(paths.len());
    for path in &paths {
        let df = read_one_file(path, kind)?;
        info!(path = %path.display(), rows = df.height(), "read {} part", kind.label());
        frames.push(df.lazy());
    }

    let combined = concat(&frames, UnionArgs::default())?.collect()?;
    if combined.height() == 0 {
        return Err(PipelineError::Processing(format!(
            "{} input matched by '{pattern}' contained no rows",
            kind.label()
        )));
    }
    Ok(combined)
}

fn read_one_file(path: &Path, kind: TripleKind) -> Result<DataFrame> {
    let is_parquet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        let df = ParquetReader::new(File::open(path)?).finish()?;
        normalize_named(df, kind, path)
    } else {
        read_tsv(path, kind)
    }
}

/// YAGO dumps sometimes lead with a `#@ ...` provenance line. Sniff it with
/// the csv crate so polars can skip it.
fn sniff_comment_rows(path: &Path) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)?;

    let mut skip = 0usize;
    for record in reader.records() {
        let record = record?;
        let leading = record.get(0).unwrap_or_default();
        if leading.starts_with('#') || leading.starts_with("@prefix") {
            skip += 1;
        } else {
            break;
        }
    }
    Ok(skip)
}

fn read_tsv(path: &Path, kind: TripleKind) -> Result<DataFrame> {
    let skip_rows = sniff_comment_rows(path)?;

    let mut df = CsvReadOptions::default()
        .with_has_header(false)
        .with_skip_rows(skip_rows)
        .with_ignore_errors(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(b'\t')
                .with_quote_char(None),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let layout = kind.layout(df.width()).ok_or_else(|| {
        PipelineError::Validation(format!(
            "{} file {} has {} columns, expected a known YAGO layout",
            kind.label(),
            path.display(),
            df.width()
        ))
    })?;
    df.set_column_names(layout.iter().copied())?;

    normalize_named(df, kind, path)
}

/// Project a raw frame down to the canonical columns, casting everything to
/// strings and null-filling the optional numeric object column.
fn normalize_named(df: DataFrame, kind: TripleKind, path: &Path) -> Result<DataFrame> {
    let has = |name: &str| df.column(name).is_ok();

    let missing = |name: &str| {
        PipelineError::Validation(format!(
            "{} file {} is missing column '{name}'",
            kind.label(),
            path.display()
        ))
    };

    match kind {
        TripleKind::Facts => {
            for name in [SUBJECT, PREDICATE, CAT_OBJECT] {
                if !has(name) {
                    return Err(missing(name));
                }
            }
            let num_object = if has(NUM_OBJECT) {
                col(NUM_OBJECT).cast(DataType::String)
            } else {
                lit(NULL).cast(DataType::String).alias(NUM_OBJECT)
            };
            let out = df
                .lazy()
                .select([
                    col(SUBJECT).cast(DataType::String),
                    col(PREDICATE).cast(DataType::String),
                    col(CAT_OBJECT).cast(DataType::String),
                    num_object,
                ])
                .drop_nulls(Some(vec![col(SUBJECT), col(PREDICATE)]))
                .collect()?;
            Ok(out)
        }
        TripleKind::Types => {
            if !has(SUBJECT) {
                return Err(missing(SUBJECT));
            }
            // Parquet parts from older runs carry the type under cat_object.
            let type_col = if has(TYPE) {
                col(TYPE)
            } else if has(CAT_OBJECT) {
                col(CAT_OBJECT).alias(TYPE)
            } else {
                return Err(missing(TYPE));
            };
            let out = df
                .lazy()
                .select([
                    col(SUBJECT).cast(DataType::String),
                    type_col.cast(DataType::String),
                ])
                .drop_nulls(Some(vec![col(SUBJECT), col(TYPE)]))
                .collect()?;
            Ok(out)
        }
    }
}
