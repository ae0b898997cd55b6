//! Resolution of [RDF collections](https://www.w3.org/TR/rdf11-mt/#rdf-collections) into ordered sequences.

use crate::error::ListError;
use crate::graph::GraphStore;
use oxigraph::model::vocab::rdf;
use oxigraph::model::{Term, TermRef};
use std::collections::HashSet;

/// An RDF list stored in a [`GraphStore`].
///
/// Resolution is lazy and can be restarted at will: each call to [`RdfList::iter`] walks the list
/// again from its head.
///
/// ```
/// use oxearl::{GraphStore, RdfList};
/// use oxigraph::model::vocab::rdf;
/// use oxigraph::model::{BlankNode, NamedNode, Term, Triple};
///
/// let head = BlankNode::default();
/// let a = NamedNode::new("http://example.com/a")?;
/// let graph = GraphStore::from_iter([
///     Triple::new(head.clone(), rdf::FIRST, a.clone()),
///     Triple::new(head.clone(), rdf::REST, rdf::NIL),
/// ]);
/// let list = RdfList::new(&graph, head.into());
/// assert_eq!(list.resolve()?, vec![Term::from(a)]);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct RdfList<'a> {
    graph: &'a GraphStore,
    head: Term,
}

impl<'a> RdfList<'a> {
    pub fn new(graph: &'a GraphStore, head: Term) -> Self {
        Self { graph, head }
    }

    pub fn head(&self) -> &Term {
        &self.head
    }

    pub fn iter(&self) -> RdfListIterator<'a> {
        RdfListIterator {
            graph: self.graph,
            head: self.head.clone(),
            current_node: Some(self.head.clone()),
            visited: HashSet::new(),
        }
    }

    /// Collects the list elements, failing on the first integrity error.
    pub fn resolve(&self) -> Result<Vec<Term>, ListError> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &RdfList<'a> {
    type Item = Result<Term, ListError>;
    type IntoIter = RdfListIterator<'a>;

    fn into_iter(self) -> RdfListIterator<'a> {
        self.iter()
    }
}

/// Iterator on the elements of an [`RdfList`].
///
/// It is fused: after an error or the end of the list, it only returns `None`.
pub struct RdfListIterator<'a> {
    graph: &'a GraphStore,
    head: Term,
    current_node: Option<Term>,
    visited: HashSet<Term>,
}

impl RdfListIterator<'_> {
    fn malformed(&mut self, node: Term, reason: &'static str) -> Option<Result<Term, ListError>> {
        self.current_node = None;
        Some(Err(ListError::Malformed {
            head: self.head.clone(),
            node,
            reason,
        }))
    }
}

impl Iterator for RdfListIterator<'_> {
    type Item = Result<Term, ListError>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current_node.take()?;
        if current.as_ref() == TermRef::from(rdf::NIL) {
            return None;
        }
        if current.is_literal() {
            return self.malformed(current, "a literal can not be a list node");
        }
        if !self.visited.insert(current.clone()) {
            return Some(Err(ListError::Cycle {
                head: self.head.clone(),
                node: current,
            }));
        }
        let rest = self.graph.object_for(current.as_ref(), rdf::REST);
        let Some(first) = self.graph.object_for(current.as_ref(), rdf::FIRST) else {
            if current == self.head && rest.is_none() {
                // A head without any statement is the empty list
                return None;
            }
            return self.malformed(current, "the node has no rdf:first value");
        };
        let Some(rest) = rest else {
            return self.malformed(current, "the node has no rdf:rest value");
        };
        self.current_node = Some(rest);
        Some(Ok(first))
    }
}
