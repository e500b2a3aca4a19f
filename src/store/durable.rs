//! Persistent RDF store backed by oxigraph.
//!
//! Persists graphs between runs and answers SPARQL for inspection. The
//! matching pipeline itself runs against [`MemoryGraph`]; a run loads the
//! reference graph from here and syncs the destination graph back.

use oxigraph::model::{GraphNameRef, Literal as OxLiteral, NamedNode, Quad};
use oxigraph::model::Term as OxTerm;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::{StoreError, StoreResult};
use crate::term::{Literal, Node, Term, Triple};

use super::mem::MemoryGraph;

/// Persistent SPARQL-capable triple store.
pub struct DurableStore {
    store: Store,
}

impl DurableStore {
    /// Create a new in-memory store (no persistence).
    pub fn in_memory() -> StoreResult<Self> {
        let store = Store::new().map_err(|e| StoreError::Backend {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self { store })
    }

    /// Open or create a persistent store at the given path.
    pub fn open(path: &std::path::Path) -> StoreResult<Self> {
        std::fs::create_dir_all(path)?;
        let store = Store::open(path).map_err(|e| StoreError::Backend {
            message: format!("failed to open oxigraph store at {}: {e}", path.display()),
        })?;
        Ok(Self { store })
    }

    fn to_named(iri: &str) -> StoreResult<NamedNode> {
        NamedNode::new(iri).map_err(|e| StoreError::InvalidTerm {
            message: format!("invalid IRI {iri:?}: {e}"),
        })
    }

    fn to_object(term: &Term) -> StoreResult<OxTerm> {
        Ok(match term {
            Term::Node(Node::Iri(iri)) => Self::to_named(iri.as_str())?.into(),
            Term::Node(Node::Blank(label)) => oxigraph::model::BlankNode::new(label.clone())
                .map_err(|e| StoreError::InvalidTerm {
                    message: format!("invalid blank node label {label:?}: {e}"),
                })?
                .into(),
            Term::Literal(Literal::String(s)) => OxLiteral::new_simple_literal(s.clone()).into(),
            Term::Literal(Literal::Integer(n)) => OxLiteral::from(*n).into(),
        })
    }

    fn to_quad(triple: &Triple) -> StoreResult<Quad> {
        let predicate = Self::to_named(triple.predicate.as_str())?;
        let object = Self::to_object(&triple.object)?;
        Ok(match &triple.subject {
            Node::Iri(iri) => Quad::new(
                Self::to_named(iri.as_str())?,
                predicate,
                object,
                GraphNameRef::DefaultGraph,
            ),
            Node::Blank(label) => Quad::new(
                oxigraph::model::BlankNode::new(label.clone()).map_err(|e| {
                    StoreError::InvalidTerm {
                        message: format!("invalid blank node label {label:?}: {e}"),
                    }
                })?,
                predicate,
                object,
                GraphNameRef::DefaultGraph,
            ),
        })
    }

    /// Insert a triple.
    pub fn insert_triple(&self, triple: &Triple) -> StoreResult<()> {
        let quad = Self::to_quad(triple)?;
        self.store.insert(&quad)?;
        Ok(())
    }

    /// Remove a triple. Returns whether it was present.
    pub fn remove_triple(&self, triple: &Triple) -> StoreResult<bool> {
        let quad = Self::to_quad(triple)?;
        Ok(self.store.remove(&quad)?)
    }

    /// Sync every triple of an in-memory graph into this store.
    pub fn sync_from(&self, graph: &MemoryGraph) -> StoreResult<usize> {
        let triples = graph.all_triples();
        let count = triples.len();
        for triple in &triples {
            self.insert_triple(triple)?;
        }
        Ok(count)
    }

    /// Load every triple of this store into a fresh in-memory graph.
    pub fn load(&self) -> StoreResult<MemoryGraph> {
        MemoryGraph::from_triples(&self.all_triples()?)
    }

    /// Retrieve all triples as in-memory `Triple` values.
    pub fn all_triples(&self) -> StoreResult<Vec<Triple>> {
        let rows = self.query_select("SELECT ?s ?p ?o WHERE { ?s ?p ?o }")?;

        let mut triples = Vec::with_capacity(rows.len());
        for row in rows {
            let mut subject = None;
            let mut predicate = None;
            let mut object = None;
            for (var, value) in &row {
                match var.trim_start_matches('?') {
                    "s" => subject = parse_term(value),
                    "p" => predicate = parse_term(value),
                    "o" => object = parse_term(value),
                    _ => {}
                }
            }
            if let (
                Some(Term::Node(s)),
                Some(Term::Node(Node::Iri(p))),
                Some(o),
            ) = (subject, predicate, object)
            {
                triples.push(Triple::new(s, p, o));
            }
        }
        Ok(triples)
    }

    /// Execute a SPARQL SELECT query, returning rows of (variable, value).
    pub fn query_select(&self, sparql: &str) -> StoreResult<Vec<Vec<(String, String)>>> {
        let results = self.store.query(sparql).map_err(|e| StoreError::Query {
            message: format!("SPARQL query failed: {e}"),
        })?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| StoreError::Query {
                        message: format!("solution error: {e}"),
                    })?;
                    let mut row = Vec::new();
                    for (var, term) in solution.iter() {
                        row.push((var.to_string(), term.to_string()));
                    }
                    rows.push(row);
                }
                Ok(rows)
            }
            QueryResults::Boolean(b) => Ok(vec![vec![("result".to_string(), b.to_string())]]),
            QueryResults::Graph(_) => Err(StoreError::Query {
                message: "CONSTRUCT/DESCRIBE queries not supported via query_select".into(),
            }),
        }
    }

    /// Execute a SPARQL ASK query.
    pub fn query_ask(&self, sparql: &str) -> StoreResult<bool> {
        let results = self.store.query(sparql).map_err(|e| StoreError::Query {
            message: format!("SPARQL query failed: {e}"),
        })?;
        match results {
            QueryResults::Boolean(b) => Ok(b),
            _ => Err(StoreError::Query {
                message: "expected boolean result from ASK query".into(),
            }),
        }
    }

    /// Number of triples in the store.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.store.len()?)
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|n| n == 0)
    }

    /// Remove every triple.
    pub fn clear(&self) -> StoreResult<()> {
        self.store.clear()?;
        Ok(())
    }

    /// Replace the store contents with the triples of an in-memory graph.
    pub fn replace_with(&self, graph: &MemoryGraph) -> StoreResult<usize> {
        self.clear()?;
        self.sync_from(graph)
    }
}

impl std::fmt::Debug for DurableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableStore").finish()
    }
}

/// Parse an N-Triples-style term rendering back into a [`Term`].
fn parse_term(s: &str) -> Option<Term> {
    if let Some(rest) = s.strip_prefix('<') {
        return Some(Term::Node(Node::iri(rest.strip_suffix('>')?)));
    }
    if let Some(label) = s.strip_prefix("_:") {
        return Some(Term::Node(Node::blank(label)));
    }
    if let Some(rest) = s.strip_prefix('"') {
        let (value, suffix) = rest.rsplit_once('"')?;
        let value = value.replace("\\\"", "\"").replace("\\\\", "\\");
        if suffix.starts_with("^^") && suffix.contains("integer") {
            return value.parse().ok().map(Term::integer);
        }
        return Some(Term::string(value));
    }
    None
}
