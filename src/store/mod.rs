//! Graph store boundary: pattern queries, updates, and scoped batches.
//!
//! The matching pipeline only ever talks to a graph through [`GraphStore`]:
//! triple patterns with typed literal filters (never string-built queries),
//! single inserts/deletes, and all-or-nothing batch commits.
//!
//! - **In-memory layer** ([`mem::MemoryGraph`]): petgraph-backed, used for
//!   every run; its write lock serializes all destination writers.
//! - **Persistent layer** ([`durable::DurableStore`]): oxigraph-backed,
//!   persists graphs between runs and answers SPARQL for inspection.

pub mod durable;
pub mod mem;

use crate::error::StoreResult;
use crate::term::{Iri, Node, Term, Triple};

/// A triple pattern: `None` positions are wildcards, `Some` positions are
/// bound as typed values (literal objects filter by exact, case-sensitive
/// equality).
#[derive(Debug, Clone, Default)]
pub struct TriplePattern {
    /// Subject to match, if bound.
    pub subject: Option<Node>,
    /// Predicate to match, if bound.
    pub predicate: Option<Iri>,
    /// Object to match, if bound.
    pub object: Option<Term>,
}

impl TriplePattern {
    /// The fully unbound pattern (matches every triple).
    pub fn any() -> Self {
        Self::default()
    }

    /// Bind the subject position.
    pub fn with_subject(mut self, subject: Node) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Bind the predicate position.
    pub fn with_predicate(mut self, predicate: Iri) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Bind the object position.
    pub fn with_object(mut self, object: impl Into<Term>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Whether a concrete triple matches this pattern.
    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.as_ref().is_none_or(|s| *s == triple.subject)
            && self.predicate.as_ref().is_none_or(|p| *p == triple.predicate)
            && self.object.as_ref().is_none_or(|o| *o == triple.object)
    }
}

/// One operation in a scoped transaction batch.
#[derive(Debug, Clone)]
pub enum TxOp {
    /// Insert a triple (no-op if already present).
    Insert(Triple),
    /// Delete a triple (no-op if absent).
    Delete(Triple),
}

/// Capability surface of a triple-store collaborator.
///
/// All methods take `&self`: a single store may safely back more than one
/// graph role (destination commonly coincides with reference).
pub trait GraphStore {
    /// Insert one triple. Graphs are sets: re-inserting is a no-op.
    fn insert(&self, triple: &Triple) -> StoreResult<()>;

    /// Delete one triple. Returns whether it was present.
    fn delete(&self, triple: &Triple) -> StoreResult<bool>;

    /// All triples matching a pattern, in store order.
    fn matching(&self, pattern: &TriplePattern) -> StoreResult<Vec<Triple>>;

    /// Apply a batch of operations as one scoped transaction: either every
    /// operation persists or none do.
    fn apply(&self, batch: Vec<TxOp>) -> StoreResult<()>;

    /// Number of triples in the graph.
    fn len(&self) -> StoreResult<usize>;

    /// Whether the graph holds no triples.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Remove every triple.
    fn clear(&self) -> StoreResult<()>;

    /// Release any resources held by the store.
    fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// All triples with the given resource as subject.
pub fn triples_from(store: &dyn GraphStore, node: &Node) -> StoreResult<Vec<Triple>> {
    store.matching(&TriplePattern::any().with_subject(node.clone()))
}

/// All triples with the given resource as object.
pub fn triples_to(store: &dyn GraphStore, node: &Node) -> StoreResult<Vec<Triple>> {
    store.matching(&TriplePattern::any().with_object(node.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Triple {
        Triple::new(
            Node::iri("http://x.org/s"),
            Iri::new("http://x.org/p"),
            Term::string("v"),
        )
    }

    #[test]
    fn unbound_pattern_matches_everything() {
        assert!(TriplePattern::any().matches(&sample()));
    }

    #[test]
    fn bound_positions_filter() {
        let t = sample();
        assert!(
            TriplePattern::any()
                .with_subject(Node::iri("http://x.org/s"))
                .with_object(Term::string("v"))
                .matches(&t)
        );
        assert!(
            !TriplePattern::any()
                .with_object(Term::string("V"))
                .matches(&t),
            "literal filters are case-sensitive"
        );
        assert!(
            !TriplePattern::any()
                .with_predicate(Iri::new("http://x.org/other"))
                .matches(&t)
        );
    }
}
