//! In-memory triple graph backed by petgraph with a `DashMap` node index.
//!
//! Nodes are [`Term`]s (resources and literals alike), edges carry the
//! predicate IRI. A `StableDiGraph` keeps node indices valid across edge
//! removals. All mutation funnels through one `RwLock` writer section, which
//! is also what serializes concurrent link writers on a destination graph.

use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::error::StoreResult;
use crate::term::{Iri, Term, Triple};

use super::{GraphStore, TriplePattern, TxOp};

/// Mutable in-memory set of triples.
pub struct MemoryGraph {
    /// The directed graph: nodes are terms, edges carry predicate IRIs.
    graph: RwLock<StableDiGraph<Term, Iri>>,
    /// Term → NodeIndex mapping for O(1) node lookups.
    node_index: DashMap<Term, NodeIndex>,
    /// Triple count.
    triple_count: AtomicUsize,
}

impl MemoryGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: RwLock::new(StableDiGraph::new()),
            node_index: DashMap::new(),
            triple_count: AtomicUsize::new(0),
        }
    }

    /// Create a graph pre-loaded with the given triples.
    pub fn from_triples(triples: &[Triple]) -> StoreResult<Self> {
        let graph = Self::new();
        for triple in triples {
            graph.insert(triple)?;
        }
        Ok(graph)
    }

    /// All triples in the graph.
    pub fn all_triples(&self) -> Vec<Triple> {
        let graph = self.graph.read().expect("graph lock poisoned");
        graph
            .edge_references()
            .filter_map(|e| {
                let subject = graph.node_weight(e.source())?.as_node()?.clone();
                let object = graph.node_weight(e.target())?.clone();
                Some(Triple::new(subject, e.weight().clone(), object))
            })
            .collect()
    }

    fn ensure_node(
        graph: &mut StableDiGraph<Term, Iri>,
        node_index: &DashMap<Term, NodeIndex>,
        term: &Term,
    ) -> NodeIndex {
        if let Some(idx) = node_index.get(term) {
            return *idx.value();
        }
        let idx = graph.add_node(term.clone());
        node_index.insert(term.clone(), idx);
        idx
    }

    /// Insert under an already-held write lock. Returns whether the triple
    /// was newly added (graphs are sets).
    fn insert_locked(&self, graph: &mut StableDiGraph<Term, Iri>, triple: &Triple) -> bool {
        let subject: Term = triple.subject.clone().into();
        let subj_idx = Self::ensure_node(graph, &self.node_index, &subject);
        let obj_idx = Self::ensure_node(graph, &self.node_index, &triple.object);

        let duplicate = graph
            .edges_connecting(subj_idx, obj_idx)
            .any(|e| *e.weight() == triple.predicate);
        if duplicate {
            return false;
        }

        graph.add_edge(subj_idx, obj_idx, triple.predicate.clone());
        self.triple_count.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Delete under an already-held write lock. Returns whether present.
    fn delete_locked(&self, graph: &mut StableDiGraph<Term, Iri>, triple: &Triple) -> bool {
        let subject: Term = triple.subject.clone().into();
        let (subj_idx, obj_idx) = match (
            self.node_index.get(&subject),
            self.node_index.get(&triple.object),
        ) {
            (Some(s), Some(o)) => (*s.value(), *o.value()),
            _ => return false,
        };

        let edge = graph
            .edges_connecting(subj_idx, obj_idx)
            .find(|e| *e.weight() == triple.predicate)
            .map(|e| e.id());

        match edge {
            Some(id) => {
                graph.remove_edge(id);
                self.triple_count.fetch_sub(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    fn triple_of_edge(
        graph: &StableDiGraph<Term, Iri>,
        edge: petgraph::stable_graph::EdgeReference<'_, Iri>,
    ) -> Option<Triple> {
        let subject = graph.node_weight(edge.source())?.as_node()?.clone();
        let object = graph.node_weight(edge.target())?.clone();
        Some(Triple::new(subject, edge.weight().clone(), object))
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore for MemoryGraph {
    fn insert(&self, triple: &Triple) -> StoreResult<()> {
        let mut graph = self.graph.write().expect("graph lock poisoned");
        self.insert_locked(&mut graph, triple);
        Ok(())
    }

    fn delete(&self, triple: &Triple) -> StoreResult<bool> {
        let mut graph = self.graph.write().expect("graph lock poisoned");
        Ok(self.delete_locked(&mut graph, triple))
    }

    fn matching(&self, pattern: &TriplePattern) -> StoreResult<Vec<Triple>> {
        let graph = self.graph.read().expect("graph lock poisoned");

        // Pick the narrowest entry point the pattern allows: subject edges,
        // object edges, or a full edge scan.
        let candidates: Vec<Triple> = if let Some(subject) = &pattern.subject {
            let subject_term: Term = subject.clone().into();
            match self.node_index.get(&subject_term) {
                Some(idx) => graph
                    .edges_directed(*idx.value(), Direction::Outgoing)
                    .filter_map(|e| Self::triple_of_edge(&graph, e))
                    .collect(),
                None => vec![],
            }
        } else if let Some(object) = &pattern.object {
            match self.node_index.get(object) {
                Some(idx) => graph
                    .edges_directed(*idx.value(), Direction::Incoming)
                    .filter_map(|e| Self::triple_of_edge(&graph, e))
                    .collect(),
                None => vec![],
            }
        } else {
            graph
                .edge_references()
                .filter_map(|e| Self::triple_of_edge(&graph, e))
                .collect()
        };

        Ok(candidates
            .into_iter()
            .filter(|t| pattern.matches(t))
            .collect())
    }

    fn apply(&self, batch: Vec<TxOp>) -> StoreResult<()> {
        // One writer section for the whole batch: readers never observe a
        // partially applied transaction.
        let mut graph = self.graph.write().expect("graph lock poisoned");
        for op in batch {
            match op {
                TxOp::Insert(t) => {
                    self.insert_locked(&mut graph, &t);
                }
                TxOp::Delete(t) => {
                    self.delete_locked(&mut graph, &t);
                }
            }
        }
        Ok(())
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.triple_count.load(Ordering::Relaxed))
    }

    fn clear(&self) -> StoreResult<()> {
        let mut graph = self.graph.write().expect("graph lock poisoned");
        graph.clear();
        self.node_index.clear();
        self.triple_count.store(0, Ordering::Relaxed);
        Ok(())
    }
}

impl std::fmt::Debug for MemoryGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGraph")
            .field("nodes", &self.node_index.len())
            .field("triples", &self.triple_count.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Node;

    fn iri(s: &str) -> Iri {
        Iri::new(s)
    }

    fn node(s: &str) -> Node {
        Node::iri(s)
    }

    #[test]
    fn insert_and_match_by_subject() {
        let g = MemoryGraph::new();
        g.insert(&Triple::new(node("s"), iri("p"), node("o"))).unwrap();
        g.insert(&Triple::new(node("s"), iri("q"), Term::string("v")))
            .unwrap();

        let all = g
            .matching(&TriplePattern::any().with_subject(node("s")))
            .unwrap();
        assert_eq!(all.len(), 2);

        let by_pred = g
            .matching(
                &TriplePattern::any()
                    .with_subject(node("s"))
                    .with_predicate(iri("q")),
            )
            .unwrap();
        assert_eq!(by_pred.len(), 1);
        assert_eq!(by_pred[0].object, Term::string("v"));
    }

    #[test]
    fn match_by_literal_object_is_exact() {
        let g = MemoryGraph::new();
        g.insert(&Triple::new(node("a"), iri("email"), Term::string("a@x.edu")))
            .unwrap();
        g.insert(&Triple::new(node("b"), iri("email"), Term::string("A@X.EDU")))
            .unwrap();

        let hits = g
            .matching(
                &TriplePattern::any()
                    .with_predicate(iri("email"))
                    .with_object(Term::string("a@x.edu")),
            )
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].subject, node("a"));
    }

    #[test]
    fn duplicate_insert_is_noop() {
        let g = MemoryGraph::new();
        let t = Triple::new(node("s"), iri("p"), node("o"));
        g.insert(&t).unwrap();
        g.insert(&t).unwrap();
        assert_eq!(g.len().unwrap(), 1);
    }

    #[test]
    fn delete_removes_only_the_named_triple() {
        let g = MemoryGraph::new();
        let keep = Triple::new(node("s"), iri("p"), node("o"));
        let gone = Triple::new(node("s"), iri("q"), node("o"));
        g.insert(&keep).unwrap();
        g.insert(&gone).unwrap();

        assert!(g.delete(&gone).unwrap());
        assert!(!g.delete(&gone).unwrap());
        assert_eq!(g.all_triples(), vec![keep]);
    }

    #[test]
    fn apply_batch() {
        let g = MemoryGraph::new();
        let stale = Triple::new(node("anchor"), iri("p"), node("old"));
        g.insert(&stale).unwrap();

        g.apply(vec![
            TxOp::Delete(stale.clone()),
            TxOp::Insert(Triple::new(node("anchor"), iri("p"), node("new"))),
        ])
        .unwrap();

        assert_eq!(g.len().unwrap(), 1);
        assert!(
            g.matching(&TriplePattern::any().with_object(node("old")))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn clear_empties_the_graph() {
        let g = MemoryGraph::new();
        g.insert(&Triple::new(node("s"), iri("p"), node("o"))).unwrap();
        assert!(!g.is_empty().unwrap());
        g.clear().unwrap();
        assert!(g.is_empty().unwrap());
        assert!(g.matching(&TriplePattern::any()).unwrap().is_empty());
    }

    #[test]
    fn matching_unknown_subject_is_empty() {
        let g = MemoryGraph::new();
        assert!(
            g.matching(&TriplePattern::any().with_subject(node("nope")))
                .unwrap()
                .is_empty()
        );
    }
}
