//! Namespaces and fixed predicates used by the matching pipeline.
//!
//! Defaults follow the VIVO ontology this engine was built to serve. The
//! scoring namespace marks attribute hints on working-graph records and is
//! never allowed to leak into extracted or persisted output.

use crate::term::{Iri, Node};

/// Namespace for scoring hints carried by working-graph records.
pub const SCORE_NS: &str = "http://vivoweb.org/ontology/score#";

/// Namespace for the reference graph's own attribute predicates.
pub const CORE_NS: &str = "http://vivoweb.org/ontology/core#";

/// Suffix appended to a paper identifier to derive its authorship anchor.
const ANCHOR_SUFFIX: &str = "/vivoAuthorship/l1";

/// The fixed predicate and class IRIs the engine reads and writes.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Namespace prefix for scoring hints (excluded from all output).
    pub scoring_ns: String,
    /// Namespace prefix for reference attribute predicates.
    pub reference_ns: String,
    /// Surname predicate required for link resolution.
    pub last_name: Iri,
    /// rdf:type.
    pub rdf_type: Iri,
    /// rdfs:label.
    pub rdfs_label: Iri,
    /// anchor → person.
    pub linked_author: Iri,
    /// person → anchor.
    pub author_in_authorship: Iri,
    /// anchor → paper.
    pub linked_information_resource: Iri,
    /// paper → anchor.
    pub information_resource_in_authorship: Iri,
    /// anchor → ordinal rank.
    pub author_rank: Iri,
    /// Authorship class marker.
    pub authorship_class: Iri,
    /// Portal visibility marker class.
    pub entity_flag: Iri,
    /// Label literal written on every anchor.
    pub anchor_label: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            scoring_ns: SCORE_NS.to_string(),
            reference_ns: CORE_NS.to_string(),
            last_name: Iri::new("http://xmlns.com/foaf/0.1/lastName"),
            rdf_type: Iri::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
            rdfs_label: Iri::new("http://www.w3.org/2000/01/rdf-schema#label"),
            linked_author: Iri::new(format!("{CORE_NS}linkedAuthor")),
            author_in_authorship: Iri::new(format!("{CORE_NS}authorInAuthorship")),
            linked_information_resource: Iri::new(format!("{CORE_NS}linkedInformationResource")),
            information_resource_in_authorship: Iri::new(format!(
                "{CORE_NS}informationResourceInAuthorship"
            )),
            author_rank: Iri::new(format!("{CORE_NS}authorRank")),
            authorship_class: Iri::new(format!("{CORE_NS}Authorship")),
            entity_flag: Iri::new("http://vitro.mannlib.cornell.edu/ns/vitro/0.7#Flag1Value1Thing"),
            anchor_label: "Authorship for Paper".to_string(),
        }
    }
}

impl Vocabulary {
    /// The scoring-namespace predicate for a named attribute.
    pub fn scoring_attribute(&self, attribute: &str) -> Iri {
        Iri::new(format!("{}{attribute}", self.scoring_ns))
    }

    /// The reference-namespace predicate for a named attribute.
    pub fn reference_attribute(&self, attribute: &str) -> Iri {
        Iri::new(format!("{}{attribute}", self.reference_ns))
    }

    /// Whether a predicate lies in the scoring namespace.
    pub fn is_scoring(&self, predicate: &Iri) -> bool {
        predicate.in_namespace(&self.scoring_ns)
    }

    /// The deterministic authorship anchor for a paper resource.
    pub fn anchor_for(&self, paper: &Node) -> Node {
        match paper {
            Node::Iri(iri) => Node::Iri(iri.join(ANCHOR_SUFFIX)),
            // Blank papers have no stable IRI; derive from the label instead.
            Node::Blank(label) => Node::iri(format!("_:{label}{ANCHOR_SUFFIX}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_and_reference_attributes() {
        let vocab = Vocabulary::default();
        assert_eq!(
            vocab.scoring_attribute("workEmail").as_str(),
            "http://vivoweb.org/ontology/score#workEmail"
        );
        assert_eq!(
            vocab.reference_attribute("workEmail").as_str(),
            "http://vivoweb.org/ontology/core#workEmail"
        );
    }

    #[test]
    fn scoring_namespace_detection() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_scoring(&vocab.scoring_attribute("workEmail")));
        assert!(!vocab.is_scoring(&vocab.reference_attribute("workEmail")));
        assert!(!vocab.is_scoring(&vocab.last_name));
    }

    #[test]
    fn anchor_is_deterministic() {
        let vocab = Vocabulary::default();
        let paper = Node::iri("http://example.org/paper7");
        let a = vocab.anchor_for(&paper);
        let b = vocab.anchor_for(&paper);
        assert_eq!(a, b);
        assert_eq!(
            a.identifier(),
            "http://example.org/paper7/vivoAuthorship/l1"
        );
    }
}
