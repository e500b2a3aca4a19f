//! Subgraph extraction: copy a resource's relationship neighborhood into a
//! standalone fragment.
//!
//! Extraction walks every triple touching the root as subject or object and
//! follows resource endpoints outward. Scoring-namespace triples are never
//! copied. A visited set of resource identifiers guards the walk, so cycles
//! anywhere in the neighborhood terminate, not just cycles through the root.

use std::collections::{HashSet, VecDeque};

use crate::error::StoreResult;
use crate::store::{GraphStore, TxOp, triples_from, triples_to};
use crate::term::{Node, Term, Triple};
use crate::vocab::Vocabulary;

/// An anonymous, self-contained set of extracted triples.
///
/// Never contains a scoring-namespace predicate.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    triples: Vec<Triple>,
}

impl Fragment {
    /// The extracted triples, in discovery order.
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Number of triples in the fragment.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Merge this fragment into a destination graph as one batch.
    pub fn merge_into(&self, destination: &dyn GraphStore) -> StoreResult<()> {
        destination.apply(self.triples.iter().cloned().map(TxOp::Insert).collect())
    }
}

/// Copies resource neighborhoods out of a graph.
pub struct SubgraphExtractor<'a> {
    vocab: &'a Vocabulary,
}

impl<'a> SubgraphExtractor<'a> {
    /// Create an extractor using the given vocabulary's scoring namespace.
    pub fn new(vocab: &'a Vocabulary) -> Self {
        Self { vocab }
    }

    /// Extract the neighborhood of `root`, never expanding `exclude`.
    ///
    /// Triples naming `exclude` are still copied; the walk just does not
    /// continue through it.
    pub fn extract(
        &self,
        graph: &dyn GraphStore,
        root: &Node,
        exclude: Option<&Node>,
    ) -> StoreResult<Fragment> {
        let mut visited: HashSet<Node> = HashSet::new();
        let mut seen: HashSet<Triple> = HashSet::new();
        let mut fragment = Fragment::default();

        let mut queue: VecDeque<Node> = VecDeque::new();
        visited.insert(root.clone());
        if let Some(exclude) = exclude {
            visited.insert(exclude.clone());
        }
        queue.push_back(root.clone());

        while let Some(node) = queue.pop_front() {
            let mut local = triples_from(graph, &node)?;
            local.extend(triples_to(graph, &node)?);

            for triple in local {
                if self.vocab.is_scoring(&triple.predicate) {
                    continue;
                }
                if !seen.insert(triple.clone()) {
                    continue;
                }

                if visited.insert(triple.subject.clone()) {
                    queue.push_back(triple.subject.clone());
                }
                if let Term::Node(object) = &triple.object
                    && visited.insert(object.clone())
                {
                    queue.push_back(object.clone());
                }

                fragment.triples.push(triple);
            }
        }

        Ok(fragment)
    }
}
