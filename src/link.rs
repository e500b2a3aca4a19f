//! Authorship link resolution: delete-then-insert rewrite of the
//! destination graph for one matched (person, paper) pair.
//!
//! Linking computes a deterministic anchor resource from the paper, removes
//! every competing anchor held by another person with the same surname, and
//! inserts the fresh anchor preserving the displaced rank. The whole rewrite
//! is committed as one scoped batch; a failed commit leaves the destination
//! untouched. Concurrent callers targeting the same (surname, paper) must be
//! serialized by the caller — the in-memory store's writer lock does this
//! for a single process.

use crate::error::{LinkError, ScoreError, ScoreResult, StoreResult};
use crate::store::{GraphStore, TriplePattern, TxOp, triples_from, triples_to};
use crate::term::{Literal, Node, Term, Triple};
use crate::vocab::Vocabulary;

/// Default ordinal position for an authorship with no recoverable rank.
const DEFAULT_RANK: i64 = 1;

/// What a successful `link` call did.
#[derive(Debug, Clone)]
pub struct LinkOutcome {
    /// The anchor resource that now represents the authorship.
    pub anchor: Node,
    /// How many stale same-surname authorships were displaced.
    pub displaced: usize,
    /// The rank written on the new anchor.
    pub rank: i64,
}

/// Rewrites authorship structure in the destination graph.
pub struct LinkResolver<'a> {
    vocab: &'a Vocabulary,
    /// Graph the matched person's attributes are read from.
    reference: &'a dyn GraphStore,
    /// Graph the link structure is written to (may be the same store).
    destination: &'a dyn GraphStore,
}

impl<'a> LinkResolver<'a> {
    /// Create a resolver over the given graphs.
    pub fn new(
        vocab: &'a Vocabulary,
        reference: &'a dyn GraphStore,
        destination: &'a dyn GraphStore,
    ) -> Self {
        Self {
            vocab,
            reference,
            destination,
        }
    }

    /// Link `person` as an author of `paper`, displacing stale same-surname
    /// authorships for that paper.
    pub fn link(
        &self,
        person: &Node,
        paper: &Node,
        matched_value: &str,
    ) -> ScoreResult<LinkOutcome> {
        let anchor = self.vocab.anchor_for(paper);

        let surname = self.surname_of(person)?.ok_or_else(|| {
            LinkError::MissingAttribute {
                person: person.identifier().to_string(),
                predicate: self.vocab.last_name.as_str().to_string(),
            }
        })?;

        tracing::info!(
            person = %person,
            paper = %paper,
            value = matched_value,
            "linking paper to person"
        );

        let stale = self.stale_matches(&surname, person, paper)?;
        let displaced = stale.len();

        let mut rank = DEFAULT_RANK;
        let mut batch: Vec<TxOp> = Vec::new();
        for (stale_person, stale_anchor) in &stale {
            if let Some(found) = self.rank_of(stale_anchor)? {
                rank = rank.max(found);
            }
            self.delete_authorship(stale_person, stale_anchor, &mut batch)?;
        }

        for triple in self.anchor_triples(&anchor, person, paper, rank) {
            tracing::trace!(statement = %triple, "link statement");
            batch.push(TxOp::Insert(triple));
        }

        self.destination.apply(batch)?;

        Ok(LinkOutcome {
            anchor,
            displaced,
            rank,
        })
    }

    /// The person's surname from the reference graph, if present.
    fn surname_of(&self, person: &Node) -> StoreResult<Option<String>> {
        let hits = self.reference.matching(
            &TriplePattern::any()
                .with_subject(person.clone())
                .with_predicate(self.vocab.last_name.clone()),
        )?;
        Ok(hits.into_iter().find_map(|t| match t.object {
            Term::Literal(Literal::String(s)) => Some(s),
            _ => None,
        }))
    }

    /// Other persons with the same surname already linked to `paper` in the
    /// destination graph, paired with their anchors.
    fn stale_matches(
        &self,
        surname: &str,
        person: &Node,
        paper: &Node,
    ) -> StoreResult<Vec<(Node, Node)>> {
        let same_surname = self.destination.matching(
            &TriplePattern::any()
                .with_predicate(self.vocab.last_name.clone())
                .with_object(Term::string(surname)),
        )?;

        let mut stale = Vec::new();
        for candidate in same_surname {
            let other = candidate.subject;
            if other == *person {
                continue;
            }
            let anchors = self.destination.matching(
                &TriplePattern::any()
                    .with_subject(other.clone())
                    .with_predicate(self.vocab.author_in_authorship.clone()),
            )?;
            for anchor_triple in anchors {
                let Some(anchor) = anchor_triple.object.as_node() else {
                    continue;
                };
                let links_paper = !self
                    .destination
                    .matching(
                        &TriplePattern::any()
                            .with_subject(anchor.clone())
                            .with_predicate(self.vocab.linked_information_resource.clone())
                            .with_object(paper.clone()),
                    )?
                    .is_empty();
                if links_paper {
                    tracing::debug!(person = %other, anchor = %anchor, "stale authorship match");
                    stale.push((other.clone(), anchor.clone()));
                }
            }
        }
        Ok(stale)
    }

    /// Rank recorded on an anchor, if readable.
    fn rank_of(&self, anchor: &Node) -> StoreResult<Option<i64>> {
        let hits = self.destination.matching(
            &TriplePattern::any()
                .with_subject(anchor.clone())
                .with_predicate(self.vocab.author_rank.clone()),
        )?;
        Ok(hits
            .into_iter()
            .find_map(|t| t.object.as_literal().and_then(Literal::as_integer)))
    }

    /// Queue deletion of a stale authorship: every triple with the anchor as
    /// subject, every triple referencing it as object, and every property of
    /// the stale person.
    fn delete_authorship(
        &self,
        stale_person: &Node,
        anchor: &Node,
        batch: &mut Vec<TxOp>,
    ) -> StoreResult<()> {
        let mut doomed = triples_from(self.destination, anchor)?;
        doomed.extend(triples_to(self.destination, anchor)?);
        doomed.extend(triples_from(self.destination, stale_person)?);
        for triple in doomed {
            tracing::debug!(statement = %triple, "delete statement");
            batch.push(TxOp::Delete(triple));
        }
        Ok(())
    }

    /// The fixed triple set establishing a new anchor.
    fn anchor_triples(&self, anchor: &Node, person: &Node, paper: &Node, rank: i64) -> Vec<Triple> {
        let v = self.vocab;
        vec![
            Triple::new(anchor.clone(), v.linked_author.clone(), person.clone()),
            Triple::new(person.clone(), v.author_in_authorship.clone(), anchor.clone()),
            Triple::new(
                anchor.clone(),
                v.linked_information_resource.clone(),
                paper.clone(),
            ),
            Triple::new(
                paper.clone(),
                v.information_resource_in_authorship.clone(),
                anchor.clone(),
            ),
            Triple::new(
                anchor.clone(),
                v.rdf_type.clone(),
                Node::Iri(v.entity_flag.clone()),
            ),
            Triple::new(
                anchor.clone(),
                v.rdf_type.clone(),
                Node::Iri(v.authorship_class.clone()),
            ),
            Triple::new(
                anchor.clone(),
                v.rdfs_label.clone(),
                Term::string(v.anchor_label.clone()),
            ),
            Triple::new(anchor.clone(), v.author_rank.clone(), Term::integer(rank)),
        ]
    }
}
