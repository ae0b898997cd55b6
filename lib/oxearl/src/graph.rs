//! [In-memory statement set](GraphStore) the report is built from.
//!
//! Usage example:
//! ```
//! use oxearl::GraphStore;
//! use oxigraph::model::{NamedNodeRef, TermRef, TripleRef};
//!
//! let ex = NamedNodeRef::new("http://example.com/s")?;
//! let p = NamedNodeRef::new("http://example.com/ns#p")?;
//! let mut graph = GraphStore::new();
//! assert!(graph.add(TripleRef::new(ex, p, ex)));
//! assert!(!graph.add(TripleRef::new(ex, p, ex)));
//!
//! let found = graph.query(Some(TermRef::from(ex)), Some("http://example.com/ns#"));
//! assert_eq!(found.len(), 1);
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

use crate::error::QueryError;
use oxigraph::model::dataset::CanonicalizationAlgorithm;
use oxigraph::model::{Graph, GraphName, NamedNodeRef, Term, TermRef, Triple, TripleRef};
use oxigraph::store::Store;

/// A set of RDF statements.
///
/// Statements can only be added, never removed: the store grows during the load phase and is
/// read-only afterwards.
#[derive(Debug, Default)]
pub struct GraphStore {
    graph: Graph,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a statement if it is not already present.
    ///
    /// Returns `true` if the statement was not already in the store.
    pub fn add<'a>(&mut self, triple: impl Into<TripleRef<'a>>) -> bool {
        self.graph.insert(triple)
    }

    /// Adds the statements of a source document.
    ///
    /// The blank nodes of the source are relabeled canonically first: adding a source isomorphic
    /// to an already added one adds nothing. Returns the number of new statements.
    pub fn add_source(&mut self, triples: impl IntoIterator<Item = Triple>) -> usize {
        let mut source = triples.into_iter().collect::<Graph>();
        source.canonicalize(CanonicalizationAlgorithm::Unstable);
        let before = self.graph.len();
        self.graph.extend(source.iter());
        self.graph.len() - before
    }

    /// Adds all statements of `other` to this store.
    pub fn merge(&mut self, other: &Self) {
        for triple in other.graph.iter() {
            self.graph.insert(triple);
        }
    }

    /// Returns the statements matching both the given subject and predicate prefix.
    ///
    /// A missing filter matches everything. A literal subject matches nothing.
    pub fn query(&self, subject: Option<TermRef<'_>>, predicate_prefix: Option<&str>) -> Vec<Triple> {
        match subject {
            None => self
                .graph
                .iter()
                .filter(|t| has_predicate_prefix(t, predicate_prefix))
                .map(TripleRef::into_owned)
                .collect(),
            Some(TermRef::NamedNode(subject)) => self
                .graph
                .triples_for_subject(subject)
                .filter(|t| has_predicate_prefix(t, predicate_prefix))
                .map(TripleRef::into_owned)
                .collect(),
            Some(TermRef::BlankNode(subject)) => self
                .graph
                .triples_for_subject(subject)
                .filter(|t| has_predicate_prefix(t, predicate_prefix))
                .map(TripleRef::into_owned)
                .collect(),
            Some(_) => Vec::new(),
        }
    }

    /// Returns an object of the given subject and predicate, if any.
    pub fn object_for(&self, subject: TermRef<'_>, predicate: NamedNodeRef<'_>) -> Option<Term> {
        match subject {
            TermRef::NamedNode(subject) => self
                .graph
                .object_for_subject_predicate(subject, predicate)
                .map(TermRef::into_owned),
            TermRef::BlankNode(subject) => self
                .graph
                .object_for_subject_predicate(subject, predicate)
                .map(TermRef::into_owned),
            _ => None,
        }
    }

    /// Returns `true` if the given term is the subject of at least one statement.
    pub fn has_subject(&self, subject: TermRef<'_>) -> bool {
        match subject {
            TermRef::NamedNode(subject) => self.graph.triples_for_subject(subject).next().is_some(),
            TermRef::BlankNode(subject) => self.graph.triples_for_subject(subject).next().is_some(),
            _ => false,
        }
    }

    pub fn contains<'a>(&self, triple: impl Into<TripleRef<'a>>) -> bool {
        self.graph.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TripleRef<'_>> {
        self.graph.iter()
    }

    /// Copies the statements into the default graph of a new in-memory [`Store`] to evaluate SPARQL on.
    pub fn to_store(&self) -> Result<Store, QueryError> {
        let store = Store::new()?;
        store.extend(
            self.graph
                .iter()
                .map(|t| t.into_owned().in_graph(GraphName::DefaultGraph)),
        )?;
        Ok(store)
    }
}

fn has_predicate_prefix(triple: &TripleRef<'_>, prefix: Option<&str>) -> bool {
    prefix.is_none_or(|prefix| triple.predicate.as_str().starts_with(prefix))
}

impl From<Graph> for GraphStore {
    fn from(graph: Graph) -> Self {
        Self { graph }
    }
}

impl From<GraphStore> for Graph {
    fn from(store: GraphStore) -> Self {
        store.graph
    }
}

impl<'a> Extend<TripleRef<'a>> for GraphStore {
    fn extend<I: IntoIterator<Item = TripleRef<'a>>>(&mut self, iter: I) {
        self.graph.extend(iter);
    }
}

impl Extend<Triple> for GraphStore {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.graph.extend(iter);
    }
}

impl FromIterator<Triple> for GraphStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            graph: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{BlankNode, Literal, NamedNode};

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(
            NamedNode::new_unchecked(s),
            NamedNode::new_unchecked(p),
            NamedNode::new_unchecked(o),
        )
    }

    #[test]
    fn add_is_idempotent() {
        let t = triple("http://example.com/s", "http://example.com/p", "http://example.com/o");
        let mut graph = GraphStore::new();
        assert!(graph.add(&t));
        assert!(!graph.add(&t));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn merge_is_set_union() {
        let a = triple("http://example.com/a", "http://example.com/p", "http://example.com/o");
        let b = triple("http://example.com/b", "http://example.com/p", "http://example.com/o");
        let c = triple("http://example.com/c", "http://example.com/p", "http://example.com/o");
        let mut left = GraphStore::from_iter([a.clone(), b.clone()]);
        let right = GraphStore::from_iter([b.clone(), c.clone()]);
        left.merge(&right);
        assert_eq!(left.len(), 3);
        for t in [&a, &b, &c] {
            assert!(left.contains(t));
        }
    }

    #[test]
    fn isomorphic_sources_are_merged() {
        let source = || {
            let result = BlankNode::default();
            [
                Triple::new(
                    NamedNode::new_unchecked("http://example.com/assertion"),
                    NamedNode::new_unchecked("http://www.w3.org/ns/earl#result"),
                    result.clone(),
                ),
                Triple::new(
                    result,
                    NamedNode::new_unchecked("http://www.w3.org/ns/earl#outcome"),
                    NamedNode::new_unchecked("http://www.w3.org/ns/earl#pass"),
                ),
            ]
        };
        let mut graph = GraphStore::new();
        assert_eq!(graph.add_source(source()), 2);
        assert_eq!(graph.add_source(source()), 0);
        assert_eq!(graph.len(), 2);

        let mut other = GraphStore::new();
        other.add_source(source());
        graph.merge(&other);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn query_combines_filters() {
        let s = NamedNode::new_unchecked("http://example.com/s");
        let graph = GraphStore::from_iter([
            triple(s.as_str(), "http://example.com/v/1", "http://example.com/o"),
            triple(s.as_str(), "http://example.com/v/2", "http://example.com/o"),
            triple(s.as_str(), "http://example.com/other", "http://example.com/o"),
            triple("http://example.com/t", "http://example.com/v/1", "http://example.com/o"),
        ]);
        assert_eq!(graph.query(None, None).len(), 4);
        assert_eq!(graph.query(Some(s.as_ref().into()), None).len(), 3);
        assert_eq!(graph.query(None, Some("http://example.com/v/")).len(), 3);
        assert_eq!(
            graph
                .query(Some(s.as_ref().into()), Some("http://example.com/v/"))
                .len(),
            2
        );
        assert!(
            graph
                .query(Some(s.as_ref().into()), Some("http://example.com/nothing/"))
                .is_empty()
        );
    }

    #[test]
    fn query_with_literal_subject_is_empty() {
        let graph = GraphStore::from_iter([triple(
            "http://example.com/s",
            "http://example.com/p",
            "http://example.com/o",
        )]);
        let literal = Literal::from("s");
        assert!(graph.query(Some(literal.as_ref().into()), None).is_empty());
    }

    #[test]
    fn store_contains_all_statements() -> Result<(), QueryError> {
        let graph = GraphStore::from_iter([
            triple("http://example.com/a", "http://example.com/p", "http://example.com/o"),
            triple("http://example.com/b", "http://example.com/p", "http://example.com/o"),
        ]);
        assert_eq!(graph.to_store()?.len()?, 2);
        Ok(())
    }
}
