//! Rich diagnostic error types for the authorlink engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text. The handling policy per
//! variant family:
//!
//! - [`ConfigError`]: fatal, abort before any matching pass starts.
//! - [`AlgorithmError`]: skip the offending pair, continue the pass.
//! - [`LinkError`]: skip the offending match, continue the pass.
//! - [`StoreError`]: abort the current pass, continue with the next
//!   configured attribute. No automatic retries anywhere.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the authorlink engine.
#[derive(Debug, Error, Diagnostic)]
pub enum ScoreError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Algorithm(#[from] AlgorithmError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("missing graph handle: {role}")]
    #[diagnostic(
        code(authorlink::config::missing_graph),
        help(
            "The {role} graph handle was not supplied. Every run needs a \
             reference, working, and destination graph (destination may \
             coincide with reference)."
        )
    )]
    MissingGraph { role: String },

    #[error("no match attributes configured")]
    #[diagnostic(
        code(authorlink::config::no_attributes),
        help("Configure at least one attribute to exact-match, e.g. `workEmail`.")
    )]
    NoAttributes,

    #[error("unknown similarity algorithm: {name}")]
    #[diagnostic(
        code(authorlink::config::unknown_algorithm),
        help("Known algorithms are `soundex` and `levenshtein`.")
    )]
    UnknownAlgorithm { name: String },
}

// ---------------------------------------------------------------------------
// Similarity algorithm errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum AlgorithmError {
    #[error("input cannot be phonetically encoded: {value:?}")]
    #[diagnostic(
        code(authorlink::algorithm::unencodable),
        help(
            "The value contains no encodable characters, so no comparison is \
             possible. Callers should treat this as \"no comparison\" and \
             skip the pair."
        )
    )]
    Unencodable { value: String },
}

// ---------------------------------------------------------------------------
// Link resolution errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LinkError {
    #[error("person {person} is missing required attribute {predicate}")]
    #[diagnostic(
        code(authorlink::link::missing_attribute),
        help(
            "Link resolution needs this predicate (the surname) on the matched \
             person resource. The match is skipped; the run continues."
        )
    )]
    MissingAttribute { person: String, predicate: String },
}

// ---------------------------------------------------------------------------
// Graph store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("graph query failed: {message}")]
    #[diagnostic(
        code(authorlink::store::query),
        help("The pattern query could not be executed against the graph store.")
    )]
    Query { message: String },

    #[error("graph update failed: {message}")]
    #[diagnostic(
        code(authorlink::store::update),
        help(
            "An insert, delete, or batch commit failed. Batches are \
             all-or-nothing: no partial writes persist."
        )
    )]
    Update { message: String },

    #[error("invalid term: {message}")]
    #[diagnostic(
        code(authorlink::store::invalid_term),
        help("The term could not be represented in the backing store. Check the IRI syntax.")
    )]
    InvalidTerm { message: String },

    #[error("backend store error: {message}")]
    #[diagnostic(
        code(authorlink::store::backend),
        help(
            "The persistent triple store reported an error. Check that the \
             data directory exists and has read/write permissions."
        )
    )]
    Backend { message: String },

    #[error("I/O error: {source}")]
    #[diagnostic(
        code(authorlink::store::io),
        help("A filesystem operation failed. Check paths and permissions.")
    )]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("serialization error: {message}")]
    #[diagnostic(
        code(authorlink::store::serde),
        help("A record or graph file could not be parsed. Check the JSON structure.")
    )]
    Serialization { message: String },
}

impl From<oxigraph::store::StorageError> for StoreError {
    fn from(e: oxigraph::store::StorageError) -> Self {
        StoreError::Backend {
            message: e.to_string(),
        }
    }
}

/// Convenience alias for functions returning authorlink results.
pub type ScoreResult<T> = std::result::Result<T, ScoreError>;

/// Result type for graph store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
