//! Match engine: per-attribute exact-match passes over the working graph.
//!
//! Each pass queries the working graph for records carrying a
//! scoring-namespace attribute, finds reference resources holding the same
//! literal under the reference predicate, copies each record's neighborhood
//! into the destination graph, and rewrites the authorship link. Passes are
//! independent; a store failure aborts only its own pass.
//!
//! A record matching several reference resources produces one independent
//! link per match. That fan-out is intentional-but-questionable inherited
//! behavior: no best-match selection is applied.

use crate::algorithm::Similarity;
use crate::error::{ConfigError, ScoreError, ScoreResult, StoreResult};
use crate::extract::SubgraphExtractor;
use crate::link::LinkResolver;
use crate::store::{GraphStore, TriplePattern};
use crate::term::{Literal, Node, Term};
use crate::vocab::Vocabulary;

/// Run-wide configuration for the match engine.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Attributes to exact-match, in pass order.
    pub attributes: Vec<String>,
    /// Empty a non-empty working graph before loading records.
    pub clear_working_before: bool,
    /// Keep the working graph after the run instead of clearing it.
    pub retain_working_after: bool,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            attributes: vec!["workEmail".to_string()],
            clear_working_before: true,
            retain_working_after: false,
        }
    }
}

impl ScoreConfig {
    /// Validate the configuration before any pass starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attributes.is_empty() {
            return Err(ConfigError::NoAttributes);
        }
        Ok(())
    }
}

/// Graph handles and the configured algorithm, threaded through every
/// component call.
pub struct ScoreContext<'a> {
    /// Authoritative knowledge base (read).
    pub reference: &'a dyn GraphStore,
    /// Records pending matching (read).
    pub working: &'a dyn GraphStore,
    /// Where link structure and extracted subgraphs are committed (write);
    /// commonly the same store as `reference`.
    pub destination: &'a dyn GraphStore,
    /// Predicates and namespaces in play.
    pub vocab: &'a Vocabulary,
    /// Configured similarity algorithm.
    pub algorithm: &'a dyn Similarity,
}

/// Outcome of one attribute pass.
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    /// The attribute this pass matched on.
    pub attribute: String,
    /// (record, value) pairs found in the working graph.
    pub records: usize,
    /// Anchors written to the destination graph.
    pub linked: usize,
    /// Pairs or matches skipped (no candidate, unencodable value, missing
    /// surname).
    pub skipped: usize,
    /// Store failure that aborted this pass, if any.
    pub aborted: Option<String>,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// One report per configured attribute, in pass order.
    pub passes: Vec<PassReport>,
}

impl RunReport {
    /// Whether every pass completed without aborting.
    pub fn succeeded(&self) -> bool {
        self.passes.iter().all(|p| p.aborted.is_none())
    }

    /// Total anchors written across passes.
    pub fn linked(&self) -> usize {
        self.passes.iter().map(|p| p.linked).sum()
    }
}

/// Drives exact-match passes and materializes results into the destination
/// graph.
pub struct MatchEngine<'a> {
    ctx: ScoreContext<'a>,
    attributes: Vec<String>,
}

impl<'a> MatchEngine<'a> {
    /// Create an engine for the given context and validated configuration.
    pub fn new(ctx: ScoreContext<'a>, config: &ScoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            ctx,
            attributes: config.attributes.clone(),
        })
    }

    /// Run one exact-match pass per configured attribute.
    ///
    /// A store failure aborts its own pass and is recorded in the report;
    /// the run continues with the next attribute.
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        for attribute in &self.attributes {
            let pass = match self.exact_match(attribute) {
                Ok(pass) => pass,
                Err(e) => {
                    tracing::error!(attribute, error = %e, "pass aborted");
                    PassReport {
                        attribute: attribute.clone(),
                        aborted: Some(e.to_string()),
                        ..Default::default()
                    }
                }
            };
            report.passes.push(pass);
        }
        report
    }

    /// Execute one exact-match pass for `attribute`.
    pub fn exact_match(&self, attribute: &str) -> ScoreResult<PassReport> {
        let mut pass = PassReport {
            attribute: attribute.to_string(),
            ..Default::default()
        };

        tracing::info!(attribute, "executing exact match");
        let pairs = self.scoring_pairs(attribute)?;
        pass.records = pairs.len();

        if pairs.is_empty() {
            tracing::info!(attribute, "no matches found in working graph");
            return Ok(pass);
        }

        let extractor = SubgraphExtractor::new(self.ctx.vocab);
        let resolver = LinkResolver::new(self.ctx.vocab, self.ctx.reference, self.ctx.destination);

        for (record, value) in pairs {
            tracing::info!(record = %record, value, "checking reference graph");
            let candidates = self.reference_matches(attribute, &value)?;

            if candidates.is_empty() {
                tracing::info!(record = %record, value, "no reference match, skipping");
                pass.skipped += 1;
                continue;
            }

            for person in candidates {
                // The configured algorithm guards every pair; an input it
                // cannot encode means no comparison is possible.
                match self.ctx.algorithm.calculate(&value, &value) {
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(record = %record, value, error = %e, "skipping pair");
                        pass.skipped += 1;
                        continue;
                    }
                }

                // The record resource is the paper carrying the scoring hint.
                let fragment = extractor.extract(self.ctx.working, &record, None)?;
                fragment.merge_into(self.ctx.destination)?;

                match resolver.link(&person, &record, &value) {
                    Ok(outcome) => {
                        tracing::info!(
                            anchor = %outcome.anchor,
                            displaced = outcome.displaced,
                            "linked"
                        );
                        pass.linked += 1;
                    }
                    Err(ScoreError::Link(e)) => {
                        tracing::warn!(person = %person, error = %e, "skipping match");
                        pass.skipped += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(pass)
    }

    /// All (record, value) pairs carrying the scoring-namespace predicate
    /// for `attribute` in the working graph.
    fn scoring_pairs(&self, attribute: &str) -> StoreResult<Vec<(Node, String)>> {
        let predicate = self.ctx.vocab.scoring_attribute(attribute);
        let hits = self
            .ctx
            .working
            .matching(&TriplePattern::any().with_predicate(predicate))?;
        Ok(hits
            .into_iter()
            .filter_map(|t| match t.object {
                Term::Literal(Literal::String(value)) => Some((t.subject, value)),
                _ => None,
            })
            .collect())
    }

    /// Reference resources whose reference-namespace predicate for
    /// `attribute` equals `value` exactly (typed literal binding).
    fn reference_matches(&self, attribute: &str, value: &str) -> StoreResult<Vec<Node>> {
        let predicate = self.ctx.vocab.reference_attribute(attribute);
        let hits = self.ctx.reference.matching(
            &TriplePattern::any()
                .with_predicate(predicate)
                .with_object(Term::string(value)),
        )?;
        Ok(hits.into_iter().map(|t| t.subject).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::NormalizedSoundexDifference;
    use crate::store::mem::MemoryGraph;
    use crate::term::{Iri, Triple};

    fn node(s: &str) -> Node {
        Node::iri(format!("http://example.org/{s}"))
    }

    struct Fixture {
        vocab: Vocabulary,
        reference: MemoryGraph,
        working: MemoryGraph,
        destination: MemoryGraph,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                vocab: Vocabulary::default(),
                reference: MemoryGraph::new(),
                working: MemoryGraph::new(),
                destination: MemoryGraph::new(),
            }
        }

        /// A working-graph record (paper) with a scoring hint.
        fn record(&self, name: &str, attribute: &str, value: &str) -> Node {
            let paper = node(name);
            self.working
                .insert(&Triple::new(
                    paper.clone(),
                    self.vocab.scoring_attribute(attribute),
                    Term::string(value),
                ))
                .unwrap();
            paper
        }

        /// A reference person with an attribute and surname.
        fn person(&self, name: &str, attribute: &str, value: &str, surname: &str) -> Node {
            let person = node(name);
            self.reference
                .insert(&Triple::new(
                    person.clone(),
                    self.vocab.reference_attribute(attribute),
                    Term::string(value),
                ))
                .unwrap();
            self.reference
                .insert(&Triple::new(
                    person.clone(),
                    self.vocab.last_name.clone(),
                    Term::string(surname),
                ))
                .unwrap();
            person
        }

        fn run(&self, attributes: &[&str]) -> RunReport {
            let algorithm = NormalizedSoundexDifference;
            let ctx = ScoreContext {
                reference: &self.reference,
                working: &self.working,
                destination: &self.destination,
                vocab: &self.vocab,
                algorithm: &algorithm,
            };
            let config = ScoreConfig {
                attributes: attributes.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            };
            MatchEngine::new(ctx, &config).unwrap().run()
        }
    }

    #[test]
    fn config_requires_attributes() {
        let config = ScoreConfig {
            attributes: vec![],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoAttributes)));
    }

    #[test]
    fn single_exact_match_yields_one_anchor() {
        let fx = Fixture::new();
        let paper = fx.record("paper1", "workEmail", "a@x.edu");
        let person = fx.person("person1", "workEmail", "a@x.edu", "Haines");

        let report = fx.run(&["workEmail"]);
        assert!(report.succeeded());
        assert_eq!(report.linked(), 1);

        let anchor = fx.vocab.anchor_for(&paper);
        let authors = fx
            .destination
            .matching(
                &TriplePattern::any()
                    .with_subject(anchor)
                    .with_predicate(fx.vocab.linked_author.clone()),
            )
            .unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].object, person.into());
    }

    #[test]
    fn no_pairs_leaves_destination_untouched() {
        let fx = Fixture::new();
        fx.person("person1", "workEmail", "a@x.edu", "Haines");

        let report = fx.run(&["workEmail"]);
        assert!(report.succeeded());
        assert_eq!(report.linked(), 0);
        assert!(fx.destination.is_empty().unwrap());
    }

    #[test]
    fn record_without_candidate_is_skipped() {
        let fx = Fixture::new();
        fx.record("paper1", "workEmail", "nobody@x.edu");
        fx.person("person1", "workEmail", "a@x.edu", "Haines");

        let report = fx.run(&["workEmail"]);
        assert!(report.succeeded());
        assert_eq!(report.passes[0].skipped, 1);
        assert!(fx.destination.is_empty().unwrap());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let fx = Fixture::new();
        fx.record("paper1", "workEmail", "A@X.EDU");
        fx.person("person1", "workEmail", "a@x.edu", "Haines");

        let report = fx.run(&["workEmail"]);
        assert_eq!(report.linked(), 0);
    }

    #[test]
    fn scoring_hints_never_reach_the_destination() {
        let fx = Fixture::new();
        let paper = fx.record("paper1", "workEmail", "a@x.edu");
        fx.working
            .insert(&Triple::new(
                paper.clone(),
                Iri::new("http://example.org/ns#title"),
                Term::string("On Graphs"),
            ))
            .unwrap();
        fx.person("person1", "workEmail", "a@x.edu", "Haines");

        fx.run(&["workEmail"]);
        let all = fx.destination.all_triples();
        assert!(all.iter().all(|t| !fx.vocab.is_scoring(&t.predicate)));
        // The paper's real property was carried over.
        assert!(all.iter().any(|t| t.object == Term::string("On Graphs")));
    }

    #[test]
    fn fan_out_to_multiple_candidates_is_preserved() {
        let fx = Fixture::new();
        fx.record("paper1", "workEmail", "shared@x.edu");
        let a = fx.person("personA", "workEmail", "shared@x.edu", "Alpha");
        let b = fx.person("personB", "workEmail", "shared@x.edu", "Beta");

        let report = fx.run(&["workEmail"]);
        assert_eq!(report.linked(), 2, "one independent link per candidate");

        let linked: Vec<_> = fx
            .destination
            .matching(&TriplePattern::any().with_predicate(fx.vocab.linked_author.clone()))
            .unwrap()
            .into_iter()
            .map(|t| t.object)
            .collect();
        assert!(linked.contains(&a.into()));
        assert!(linked.contains(&b.into()));
    }

    #[test]
    fn two_records_same_value_each_get_their_own_anchor() {
        let fx = Fixture::new();
        let p1 = fx.record("paper1", "workEmail", "a@x.edu");
        let p2 = fx.record("paper2", "workEmail", "a@x.edu");
        fx.person("person1", "workEmail", "a@x.edu", "Haines");

        let report = fx.run(&["workEmail"]);
        assert_eq!(report.linked(), 2);
        for paper in [&p1, &p2] {
            let anchor = fx.vocab.anchor_for(paper);
            assert!(
                !fx.destination
                    .matching(&TriplePattern::any().with_subject(anchor))
                    .unwrap()
                    .is_empty()
            );
        }
    }

    #[test]
    fn missing_surname_skips_match_and_run_continues() {
        let fx = Fixture::new();
        fx.record("paper1", "workEmail", "a@x.edu");
        // Person matches but carries no surname.
        let person = node("person1");
        fx.reference
            .insert(&Triple::new(
                person,
                fx.vocab.reference_attribute("workEmail"),
                Term::string("a@x.edu"),
            ))
            .unwrap();

        let report = fx.run(&["workEmail"]);
        assert!(report.succeeded());
        assert_eq!(report.linked(), 0);
        assert_eq!(report.passes[0].skipped, 1);
    }

    #[test]
    fn passes_run_in_configured_order() {
        let fx = Fixture::new();
        fx.record("paper1", "workEmail", "a@x.edu");
        fx.person("person1", "workEmail", "a@x.edu", "Haines");

        let report = fx.run(&["foreName", "workEmail"]);
        assert_eq!(report.passes.len(), 2);
        assert_eq!(report.passes[0].attribute, "foreName");
        assert_eq!(report.passes[0].records, 0);
        assert_eq!(report.passes[1].attribute, "workEmail");
        assert_eq!(report.passes[1].linked, 1);
    }
}
