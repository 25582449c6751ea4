// crates/yago-seltab-core/src/adjacency.rs

use std::collections::BTreeMap;

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::model::{ensure_columns, COUNT, PREDICATE, SUBJECT, TYPE};

/// Ordered `type -> predicates` map. Predicates are kept in descending
/// occurrence order, ties broken lexicographically.
pub type AdjacencyMap = BTreeMap<String, Vec<String>>;

/// Join the restricted type assertions with the facts and count how often
/// each predicate occurs per type. Output columns: `type`, `predicate`,
/// `count`, fully deterministically ordered.
pub fn join_types_predicates(types_subset: &DataFrame, facts: &DataFrame) -> Result<DataFrame> {
    ensure_columns(types_subset, &[SUBJECT, TYPE], "types subset")?;
    ensure_columns(facts, &[SUBJECT, PREDICATE], "facts")?;

    let joined = types_subset
        .clone()
        .lazy()
        .select([col(SUBJECT), col(TYPE)])
        .join(
            facts.clone().lazy().select([col(SUBJECT), col(PREDICATE)]),
            [col(SUBJECT)],
            [col(SUBJECT)],
            JoinArgs::new(JoinType::Inner),
        )
        .group_by([col(TYPE), col(PREDICATE)])
        .agg([len().alias(COUNT)])
        .sort(
            [TYPE, COUNT, PREDICATE],
            SortMultipleOptions::default().with_order_descending_multi([false, true, false]),
        )
        .collect()?;

    info!(pairs = joined.height(), "joined types with predicates");
    Ok(joined)
}

/// Fold the `(type, predicate, count)` table into the adjacency map.
pub fn build_adj_dict(types_predicates: &DataFrame) -> Result<AdjacencyMap> {
    ensure_columns(types_predicates, &[TYPE, PREDICATE], "types/predicates")?;

    let type_col = types_predicates.column(TYPE)?.str()?;
    let pred_col = types_predicates.column(PREDICATE)?.str()?;

    let mut adj_dict = AdjacencyMap::new();
    for idx in 0..types_predicates.height() {
        let (Some(type_label), Some(predicate)) = (type_col.get(idx), pred_col.get(idx)) else {
            continue;
        };
        adj_dict
            .entry(type_label.to_string())
            .or_default()
            .push(predicate.to_string());
    }

    info!(types = adj_dict.len(), "built adjacency dictionary");
    Ok(adj_dict)
}
