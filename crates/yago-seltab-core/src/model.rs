// crates/yago-seltab-core/src/model.rs

use polars::prelude::DataFrame;

use crate::error::{PipelineError, Result};

/// Canonical column names shared by every pipeline stage.
pub const FACT_ID: &str = "id";
pub const SUBJECT: &str = "subject";
pub const PREDICATE: &str = "predicate";
pub const CAT_OBJECT: &str = "cat_object";
pub const NUM_OBJECT: &str = "num_object";
pub const TYPE: &str = "type";
pub const COUNT: &str = "count";
pub const SUBJECT_COUNT: &str = "subject_count";

/// Columns every facts frame must carry after ingestion.
pub const FACTS_COLUMNS: [&str; 4] = [SUBJECT, PREDICATE, CAT_OBJECT, NUM_OBJECT];

/// Columns every types frame must carry after ingestion.
pub const TYPES_COLUMNS: [&str; 2] = [SUBJECT, TYPE];

/// Check that `df` exposes every column in `required`, naming the offending
/// frame in the error.
pub fn ensure_columns(df: &DataFrame, required: &[&str], context: &str) -> Result<()> {
    for name in required {
        if df.column(name).is_err() {
            return Err(PipelineError::Validation(format!(
                "{context} frame is missing required column '{name}'"
            )));
        }
    }
    Ok(())
}

/// Reduce a YAGO entity or predicate label to a filesystem- and
/// column-friendly identifier. Wrapping angle brackets are dropped, runs of
/// anything outside `[A-Za-z0-9_]` collapse to a single underscore.
pub fn sanitize_label(label: &str) -> String {
    let trimmed = label
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>');

    let mut out = String::with_capacity(trimmed.len());
    let mut last_was_underscore = false;
    for ch in trimmed.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
            last_was_underscore = ch == '_';
        } else if !last_was_underscore {
            out.push('_');
            last_was_underscore = true;
        }
    }

    let cleaned = out.trim_matches('_').to_string();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
