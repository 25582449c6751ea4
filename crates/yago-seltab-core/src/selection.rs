// crates/yago-seltab-core/src/selection.rs

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::model::{ensure_columns, COUNT, SUBJECT, TYPE};

/// Restrict the graph to popular subjects inside the selected types.
///
/// Returns `(subjects, types_subset)`: the subjects with at least
/// `min_count` facts that carry a selected type (with their counts, most
/// connected first), and the `(subject, type)` pairs for exactly those
/// subjects.
pub fn subjects_in_selected_types(
    facts: &DataFrame,
    selected_types: &DataFrame,
    types: &DataFrame,
    min_count: usize,
) -> Result<(DataFrame, DataFrame)> {
    ensure_columns(facts, &[SUBJECT], "facts")?;
    ensure_columns(selected_types, &[TYPE], "selected types")?;
    ensure_columns(types, &[SUBJECT, TYPE], "types")?;

    let thresholded = facts
        .clone()
        .lazy()
        .group_by([col(SUBJECT)])
        .agg([len().alias(COUNT)])
        .filter(col(COUNT).gt_eq(lit(min_count as u32)));

    let types_subset = types
        .clone()
        .lazy()
        .join(
            selected_types.clone().lazy().select([col(TYPE)]),
            [col(TYPE)],
            [col(TYPE)],
            JoinArgs::new(JoinType::Semi),
        )
        .join(
            thresholded.clone(),
            [col(SUBJECT)],
            [col(SUBJECT)],
            JoinArgs::new(JoinType::Semi),
        )
        .sort([SUBJECT, TYPE], SortMultipleOptions::default())
        .collect()?;

    let subjects = thresholded
        .join(
            types_subset.clone().lazy().select([col(SUBJECT)]),
            [col(SUBJECT)],
            [col(SUBJECT)],
            JoinArgs::new(JoinType::Semi),
        )
        .sort(
            [COUNT, SUBJECT],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()?;

    info!(
        subjects = subjects.height(),
        type_assertions = types_subset.height(),
        min_count,
        "restricted subjects to selected types"
    );
    Ok((subjects, types_subset))
}
