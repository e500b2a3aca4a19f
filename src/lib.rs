//! # authorlink
//!
//! Author/record disambiguation engine for RDF knowledge graphs: matches
//! working-graph records against a reference graph by exact attribute
//! equality, then rewrites the reference graph's authorship structure to
//! reflect the matches, displacing stale same-surname links.
//!
//! ## Architecture
//!
//! - **Terms & vocabulary** (`term`, `vocab`): RDF triple model and the fixed
//!   predicate set (scoring namespace, authorship predicates, anchors)
//! - **Graph stores** (`store`): typed pattern queries and scoped batches;
//!   in-memory (petgraph) and persistent (oxigraph) layers
//! - **Similarity** (`algorithm`): pluggable pure string-distance functions
//! - **Matching** (`extract`, `link`, `score`): cycle-safe subgraph
//!   extraction, rank-preserving link rewrites, per-attribute passes
//!
//! ## Library usage
//!
//! ```no_run
//! use authorlink::algorithm::NormalizedSoundexDifference;
//! use authorlink::score::{MatchEngine, ScoreConfig, ScoreContext};
//! use authorlink::store::mem::MemoryGraph;
//! use authorlink::vocab::Vocabulary;
//!
//! let vocab = Vocabulary::default();
//! let reference = MemoryGraph::new();
//! let working = MemoryGraph::new();
//! let algorithm = NormalizedSoundexDifference;
//!
//! let ctx = ScoreContext {
//!     reference: &reference,
//!     working: &working,
//!     destination: &reference, // destination commonly coincides with reference
//!     vocab: &vocab,
//!     algorithm: &algorithm,
//! };
//! let engine = MatchEngine::new(ctx, &ScoreConfig::default()).unwrap();
//! let report = engine.run();
//! assert!(report.succeeded());
//! ```

pub mod algorithm;
pub mod error;
pub mod extract;
pub mod link;
pub mod record;
pub mod score;
pub mod store;
pub mod term;
pub mod transfer;
pub mod vocab;
