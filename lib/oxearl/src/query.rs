//! SPARQL queries extracting the processor descriptions and the assertion outcomes.

use crate::error::QueryError;
use crate::graph::GraphStore;
use crate::vocab::earl;
use oxigraph::model::Term;
use oxigraph::sparql::{QueryResults, QuerySolution, SparqlEvaluator};
use oxigraph::store::Store;
use std::collections::BTreeMap;

const PROCESSOR_QUERY: &str = r"
PREFIX dc: <http://purl.org/dc/terms/>
PREFIX doap: <http://usefulinc.com/ns/doap#>
PREFIX rdfatest: <http://rdfa.info/vocabs/rdfa-test#>
SELECT ?uri ?name ?creator ?homepage ?doap_desc ?language WHERE {
  [] rdfatest:processor ?uri .
  ?uri doap:name ?name .
  OPTIONAL { ?uri dc:creator ?creator }
  OPTIONAL { ?uri doap:homepage ?homepage }
  OPTIONAL { ?uri doap:description ?doap_desc }
  OPTIONAL { ?uri doap:programming-language ?language }
}
ORDER BY ?uri ?name ?creator ?homepage ?doap_desc ?language";

const RESULT_QUERY: &str = r"
PREFIX earl: <http://www.w3.org/ns/earl#>
SELECT ?uri ?outcome WHERE {
  ?uri a earl:Assertion ;
    earl:result [ earl:outcome ?outcome ] .
}";

/// Description of a processor under test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessorInfo {
    pub name: String,
    pub creator: Option<String>,
    pub homepage: Option<String>,
    pub doap_desc: Option<String>,
    pub language: Option<String>,
}

/// Evaluates the report queries on a snapshot of a [`GraphStore`].
pub struct QueryEngine {
    store: Store,
}

impl QueryEngine {
    pub fn new(graph: &GraphStore) -> Result<Self, QueryError> {
        Ok(Self {
            store: graph.to_store()?,
        })
    }

    /// Returns the description of every processor linked with `rdfatest:processor` and having a `doap:name`.
    ///
    /// If an attribute has several values, the smallest one is kept.
    pub fn processor_metadata(&self) -> Result<BTreeMap<String, ProcessorInfo>, QueryError> {
        let mut processors = BTreeMap::<String, ProcessorInfo>::new();
        for solution in self.select(PROCESSOR_QUERY)? {
            let (Some(uri), Some(name)) = (solution.get("uri"), solution.get("name")) else {
                continue;
            };
            let info = processors
                .entry(term_value(uri))
                .or_insert_with(|| ProcessorInfo {
                    name: term_value(name),
                    ..ProcessorInfo::default()
                });
            for (variable, field) in [
                ("creator", &mut info.creator),
                ("homepage", &mut info.homepage),
                ("doap_desc", &mut info.doap_desc),
                ("language", &mut info.language),
            ] {
                if field.is_none() {
                    *field = solution.get(variable).map(term_value);
                }
            }
        }
        Ok(processors)
    }

    /// Returns for every assertion with an outcome if it passed.
    ///
    /// An assertion with several outcomes only passes if all of them are `earl:pass`.
    pub fn assertion_outcomes(&self) -> Result<BTreeMap<String, bool>, QueryError> {
        let mut outcomes = BTreeMap::new();
        for solution in self.select(RESULT_QUERY)? {
            let (Some(uri), Some(outcome)) = (solution.get("uri"), solution.get("outcome")) else {
                continue;
            };
            let passed = matches!(outcome, Term::NamedNode(o) if o.as_ref() == earl::PASS);
            *outcomes.entry(term_value(uri)).or_insert(true) &= passed;
        }
        Ok(outcomes)
    }

    fn select(&self, query: &str) -> Result<Vec<QuerySolution>, QueryError> {
        let results = SparqlEvaluator::new()
            .parse_query(query)?
            .on_store(&self.store)
            .execute()?;
        let QueryResults::Solutions(solutions) = results else {
            return Ok(Vec::new());
        };
        Ok(solutions.collect::<Result<_, _>>()?)
    }
}

/// The IRI of a named node, the lexical form of a literal, or the serialization of other terms.
pub(crate) fn term_value(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().into(),
        Term::Literal(literal) => literal.value().into(),
        _ => term.to_string(),
    }
}
