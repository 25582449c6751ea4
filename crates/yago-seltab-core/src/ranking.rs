// crates/yago-seltab-core/src/ranking.rs

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::model::{ensure_columns, COUNT, SUBJECT, SUBJECT_COUNT, TYPE};

/// Rank subjects by how many facts they appear in, most-connected first.
/// Equal counts order by subject label so the top-N cut is reproducible.
pub fn subject_count_sorted(facts: &DataFrame) -> Result<DataFrame> {
    ensure_columns(facts, &[SUBJECT], "facts")?;

    let ranked = facts
        .clone()
        .lazy()
        .group_by([col(SUBJECT)])
        .agg([len().alias(COUNT)])
        .sort(
            [COUNT, SUBJECT],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()?;

    info!(subjects = ranked.height(), "ranked subjects by connectivity");
    Ok(ranked)
}

/// Rank the semantic types carried by the top `n_subjects` subjects. The
/// result keeps every such type together with the number of distinct top
/// subjects asserting it, most-popular first; ties break on the type label.
pub fn selected_types(
    subject_count_sorted: &DataFrame,
    types: &DataFrame,
    n_subjects: usize,
) -> Result<DataFrame> {
    ensure_columns(subject_count_sorted, &[SUBJECT, COUNT], "subject counts")?;
    ensure_columns(types, &[SUBJECT, TYPE], "types")?;

    let top_subjects = subject_count_sorted
        .clone()
        .lazy()
        .limit(n_subjects as IdxSize)
        .select([col(SUBJECT)]);

    let ranking = top_subjects
        .join(
            types.clone().lazy(),
            [col(SUBJECT)],
            [col(SUBJECT)],
            JoinArgs::new(JoinType::Inner),
        )
        .group_by([col(TYPE)])
        .agg([col(SUBJECT).n_unique().alias(SUBJECT_COUNT)])
        .sort(
            [SUBJECT_COUNT, TYPE],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()?;

    info!(
        selected_types = ranking.height(),
        n_subjects, "selected semantic types from top subjects"
    );
    Ok(ranking)
}
