//! Core RDF term types for the authorlink engine.
//!
//! Every graph in the system is a set of [`Triple`]s over these terms:
//! a subject is a [`Node`] (IRI or blank node), a predicate is an [`Iri`],
//! and an object is a [`Term`] (node or literal).

use serde::{Deserialize, Serialize};

/// An IRI naming a resource or predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    /// Create an IRI from any string-like value.
    pub fn new(iri: impl Into<String>) -> Self {
        Iri(iri.into())
    }

    /// Get the IRI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this IRI starts with the given namespace prefix.
    pub fn in_namespace(&self, ns: &str) -> bool {
        self.0.starts_with(ns)
    }

    /// Append a suffix, producing a new IRI.
    ///
    /// Used for deterministic derived identifiers such as authorship anchors.
    pub fn join(&self, suffix: &str) -> Iri {
        Iri(format!("{}{}", self.0, suffix))
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// A resource identifier: a full IRI or a blank node label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Node {
    /// A named resource.
    Iri(Iri),
    /// A blank node with a graph-local label.
    Blank(String),
}

impl Node {
    /// Create a named node from an IRI string.
    pub fn iri(iri: impl Into<String>) -> Self {
        Node::Iri(Iri::new(iri))
    }

    /// Create a blank node with the given label.
    pub fn blank(label: impl Into<String>) -> Self {
        Node::Blank(label.into())
    }

    /// The identifying string of this node (IRI text or blank label).
    pub fn identifier(&self) -> &str {
        match self {
            Node::Iri(iri) => iri.as_str(),
            Node::Blank(label) => label,
        }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "{iri}"),
            Node::Blank(label) => write!(f, "_:{label}"),
        }
    }
}

/// A literal object value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// A plain string literal.
    String(String),
    /// An integer literal (authorship ranks).
    Integer(i64),
}

impl Literal {
    /// The integer value, if this literal is (or parses as) an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Literal::Integer(n) => Some(*n),
            Literal::String(s) => s.parse().ok(),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{s}\""),
            Literal::Integer(n) => write!(f, "{n}"),
        }
    }
}

/// An object position term: a resource reference or a literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Term {
    /// A resource reference.
    Node(Node),
    /// A literal value.
    Literal(Literal),
}

impl Term {
    /// Shorthand for a plain string literal term.
    pub fn string(s: impl Into<String>) -> Self {
        Term::Literal(Literal::String(s.into()))
    }

    /// Shorthand for an integer literal term.
    pub fn integer(n: i64) -> Self {
        Term::Literal(Literal::Integer(n))
    }

    /// The node, if this term is a resource reference.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Term::Node(node) => Some(node),
            Term::Literal(_) => None,
        }
    }

    /// The literal, if this term is one.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            Term::Node(_) => None,
        }
    }
}

impl From<Node> for Term {
    fn from(node: Node) -> Self {
        Term::Node(node)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Node(node) => write!(f, "{node}"),
            Term::Literal(lit) => write!(f, "{lit}"),
        }
    }
}

/// A (subject, predicate, object) edge in a graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// The subject resource.
    pub subject: Node,
    /// The predicate IRI.
    pub predicate: Iri,
    /// The object term.
    pub object: Term,
}

impl Triple {
    /// Create a new triple.
    pub fn new(subject: Node, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iri_namespace_check() {
        let iri = Iri::new("http://vivoweb.org/ontology/score#workEmail");
        assert!(iri.in_namespace("http://vivoweb.org/ontology/score#"));
        assert!(!iri.in_namespace("http://vivoweb.org/ontology/core#"));
    }

    #[test]
    fn iri_join() {
        let paper = Iri::new("http://example.org/paper1");
        let anchor = paper.join("/vivoAuthorship/l1");
        assert_eq!(anchor.as_str(), "http://example.org/paper1/vivoAuthorship/l1");
    }

    #[test]
    fn node_identifier() {
        assert_eq!(Node::iri("http://x.org/a").identifier(), "http://x.org/a");
        assert_eq!(Node::blank("b0").identifier(), "b0");
    }

    #[test]
    fn literal_as_integer() {
        assert_eq!(Literal::Integer(2).as_integer(), Some(2));
        assert_eq!(Literal::String("3".into()).as_integer(), Some(3));
        assert_eq!(Literal::String("three".into()).as_integer(), None);
    }

    #[test]
    fn term_accessors() {
        let node_term: Term = Node::iri("http://x.org/a").into();
        assert!(node_term.as_node().is_some());
        assert!(node_term.as_literal().is_none());

        let lit_term = Term::string("hello");
        assert!(lit_term.as_node().is_none());
        assert_eq!(lit_term.as_literal(), Some(&Literal::String("hello".into())));
    }

    #[test]
    fn triple_display() {
        let t = Triple::new(
            Node::iri("http://x.org/a"),
            Iri::new("http://x.org/p"),
            Term::string("v"),
        );
        assert_eq!(t.to_string(), "<http://x.org/a> <http://x.org/p> \"v\"");
    }

    #[test]
    fn triple_serde_roundtrip() {
        let t = Triple::new(
            Node::iri("http://x.org/a"),
            Iri::new("http://x.org/rank"),
            Term::integer(2),
        );
        let json = serde_json::to_string(&t).unwrap();
        let back: Triple = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
