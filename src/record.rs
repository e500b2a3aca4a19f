//! Record intake: load pre-parsed record triples into the working graph.
//!
//! A record source yields opaque payloads already parsed into triples (RDF
//! serialization parsing happens outside this crate). The JSON layout is one
//! object per record with its identifier and triple set.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::store::GraphStore;
use crate::term::Triple;

/// One record: an externally parsed set of triples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Source identifier of the record.
    pub id: String,
    /// The record's triples.
    pub triples: Vec<Triple>,
}

/// Read a JSON record file: an array of [`Record`]s.
pub fn read_records(path: &Path) -> StoreResult<Vec<Record>> {
    let data = std::fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|e| StoreError::Serialization {
        message: format!("failed to parse record file {}: {e}", path.display()),
    })
}

/// Read a JSON graph file: a flat array of triples.
pub fn read_graph(path: &Path) -> StoreResult<Vec<Triple>> {
    let data = std::fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|e| StoreError::Serialization {
        message: format!("failed to parse graph file {}: {e}", path.display()),
    })
}

/// Load records into the working graph before a run.
///
/// A non-empty working graph is emptied first (with a warning) unless the
/// caller explicitly allows it. Returns the number of triples loaded.
pub fn load_into(
    working: &dyn GraphStore,
    records: &[Record],
    allow_non_empty: bool,
) -> StoreResult<usize> {
    if !working.is_empty()? && !allow_non_empty {
        tracing::warn!("working graph was not empty, emptying before load");
        working.clear()?;
    }

    let mut loaded = 0;
    for record in records {
        tracing::debug!(record = record.id, triples = record.triples.len(), "loading record");
        for triple in &record.triples {
            working.insert(triple)?;
            loaded += 1;
        }
    }
    Ok(loaded)
}
