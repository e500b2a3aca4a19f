//! Bulk transfer of triples between two graphs.

use crate::error::StoreResult;
use crate::store::{GraphStore, TriplePattern, TxOp};

/// Copy every triple from `src` into `dst`, optionally removing them from
/// `src`. Returns the number of triples copied.
pub fn transfer(
    src: &dyn GraphStore,
    dst: &dyn GraphStore,
    remove_from_source: bool,
) -> StoreResult<usize> {
    let triples = src.matching(&TriplePattern::any())?;
    let count = triples.len();
    tracing::info!(count, remove_from_source, "transferring triples");

    dst.apply(triples.iter().cloned().map(TxOp::Insert).collect())?;
    if remove_from_source {
        src.apply(triples.into_iter().map(TxOp::Delete).collect())?;
    }
    Ok(count)
}
