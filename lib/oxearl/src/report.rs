//! Synthesis of the [JSON-LD](https://www.w3.org/TR/json-ld11/) shaped EARL report.
//!
//! The report nests, below the test suite description, the suite versions, then for each version
//! its host languages, then for each host language the ordered list of its test cases, each of them
//! with the assertions of the processors under test.

use crate::config::SuiteConfig;
use crate::error::ListError;
use crate::graph::GraphStore;
use crate::list::RdfList;
use crate::query::{ProcessorInfo, term_value};
use crate::vocab::{dc, earl, rdfatest};
use indexmap::IndexMap;
use oxigraph::model::vocab::rdf;
use oxigraph::model::{NamedNodeRef, Term, Triple};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, error, warn};

const SUITE_TYPES: &[&str] = &["earl:Software", "doap:Project"];
const PROCESSOR_TYPES: &[&str] = &["earl:TestSubject", "doap:Project"];
const VERSION_TYPE: &str = "rdfatest:Version";
const TEST_CASE_TYPE: &str = "earl:TestCase";
const ASSERTION_TYPE: &str = "earl:Assertion";
const TEST_RESULT_TYPE: &str = "earl:TestResult";
const AUTOMATIC_MODE: &str = "earl:automatic";
/// Keys of the report root that a version name can not take.
const SUITE_KEYS: [&str; 6] = ["@context", "@id", "@type", "homepage", "name", "processor"];
/// Keys of a version that a host language name can not take.
const VERSION_KEYS: [&str; 1] = ["@type"];

/// The report root: the test suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub types: &'static [&'static str],
    pub homepage: String,
    pub name: String,
    pub processor: Vec<ProcessorDescriptor>,
    /// The suite versions by name.
    #[serde(flatten)]
    pub versions: IndexMap<String, VersionReport>,
}

impl Report {
    /// Serializes the report as JSON indented with two spaces.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_json(&self, writer: impl Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessorDescriptor {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub types: &'static [&'static str],
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doap_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ProcessorDescriptor {
    pub fn new(id: impl Into<String>, info: &ProcessorInfo) -> Self {
        Self {
            id: id.into(),
            types: PROCESSOR_TYPES,
            name: info.name.clone(),
            creator: info.creator.clone(),
            doap_desc: info.doap_desc.clone(),
            homepage: info.homepage.clone(),
            language: info.language.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionReport {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    /// The test cases of each host language, in list order.
    #[serde(flatten)]
    pub host_languages: IndexMap<String, Vec<TestCaseReport>>,
}

impl Default for VersionReport {
    fn default() -> Self {
        Self {
            kind: VERSION_TYPE,
            host_languages: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCaseReport {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub num: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mode: &'static str,
    /// The assertions by processor IRI.
    #[serde(flatten)]
    pub assertions: BTreeMap<String, AssertionReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionReport {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "assertedBy")]
    pub asserted_by: String,
    pub test: String,
    pub subject: String,
    pub result: TestResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestResult {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub outcome: Outcome,
}

impl From<Outcome> for TestResult {
    fn from(outcome: Outcome) -> Self {
        Self {
            kind: TEST_RESULT_TYPE,
            outcome,
        }
    }
}

/// The outcome of an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Pass,
    Fail,
    /// No outcome has been recorded for the assertion.
    NotTested,
}

impl Outcome {
    /// Reads the outcome of an assertion from the result of [`QueryEngine::assertion_outcomes`](crate::QueryEngine::assertion_outcomes).
    pub fn from_recorded(recorded: Option<bool>) -> Self {
        match recorded {
            Some(true) => Self::Pass,
            Some(false) => Self::Fail,
            None => Self::NotTested,
        }
    }
}

/// A test case list that could not be resolved.
///
/// The host language is reported with no test case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("The test case list of version {version} and host language {host_language} is invalid")]
pub struct IntegrityIssue {
    pub version: String,
    pub host_language: String,
    #[source]
    pub error: ListError,
}

/// The result of [`ReportSynthesizer::synthesize`].
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub report: Report,
    pub issues: Vec<IntegrityIssue>,
}

/// Builds a [`Report`] from a merged graph.
///
/// ```
/// use oxearl::{GraphStore, QueryEngine, ReportSynthesizer, SuiteConfig};
///
/// let graph = GraphStore::new();
/// let engine = QueryEngine::new(&graph)?;
/// let synthesis = ReportSynthesizer::new(SuiteConfig::default()).synthesize(
///     &graph,
///     &engine.processor_metadata()?,
///     &engine.assertion_outcomes()?,
/// );
/// assert_eq!(synthesis.report.name, "RDFa Test Suite");
/// assert!(synthesis.report.versions.is_empty());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReportSynthesizer {
    suite: SuiteConfig,
}

impl ReportSynthesizer {
    pub fn new(suite: SuiteConfig) -> Self {
        Self { suite }
    }

    pub fn synthesize(
        &self,
        graph: &GraphStore,
        processors: &BTreeMap<String, ProcessorInfo>,
        outcomes: &BTreeMap<String, bool>,
    ) -> Synthesis {
        let mut report = Report {
            context: self.suite.context.clone(),
            id: self.suite.iri.clone(),
            types: SUITE_TYPES,
            homepage: self.suite.homepage.clone(),
            name: self.suite.name.clone(),
            processor: processors
                .iter()
                .map(|(id, info)| ProcessorDescriptor::new(id, info))
                .collect(),
            versions: IndexMap::new(),
        };
        let mut issues = Vec::new();
        let suite = match NamedNodeRef::new(&self.suite.iri) {
            Ok(suite) => suite,
            Err(e) => {
                warn!(iri = %self.suite.iri, error = %e, "the test suite IRI is invalid");
                return Synthesis { report, issues };
            }
        };
        for version_statement in sorted(graph.query(Some(suite.into()), Some(rdfatest::VERSION_PREFIX))) {
            let name = suffix(&version_statement, rdfatest::VERSION_PREFIX);
            if SUITE_KEYS.contains(&name) {
                warn!(version = name, "skipping version named like a test suite field");
                continue;
            }
            debug!(version = name, "visiting version");
            let version = report.versions.entry(name.into()).or_default();
            for language_statement in sorted(graph.query(
                Some(version_statement.object.as_ref()),
                Some(rdfatest::HOST_LANGUAGE_PREFIX),
            )) {
                let host_language = suffix(&language_statement, rdfatest::HOST_LANGUAGE_PREFIX);
                if VERSION_KEYS.contains(&host_language) {
                    warn!(
                        version = name,
                        host_language,
                        "skipping host language named like a version field"
                    );
                    continue;
                }
                let list = RdfList::new(graph, language_statement.object.clone());
                let test_cases = match list.resolve() {
                    Ok(test_cases) => test_cases,
                    Err(e) => {
                        error!(
                            version = name,
                            host_language,
                            error = %e,
                            "invalid test case list"
                        );
                        issues.push(IntegrityIssue {
                            version: name.into(),
                            host_language: host_language.into(),
                            error: e,
                        });
                        Vec::new()
                    }
                };
                debug!(
                    version = name,
                    host_language,
                    test_cases = test_cases.len(),
                    "visiting host language"
                );
                version.host_languages.insert(
                    host_language.into(),
                    test_cases
                        .iter()
                        .map(|test_case| self.test_case(graph, test_case, outcomes))
                        .collect(),
                );
            }
        }
        Synthesis { report, issues }
    }

    fn test_case(
        &self,
        graph: &GraphStore,
        test_case: &Term,
        outcomes: &BTreeMap<String, bool>,
    ) -> TestCaseReport {
        let id = term_value(test_case);
        let mut title = None;
        let mut description = None;
        let mut links = BTreeMap::new();
        for statement in sorted(graph.query(Some(test_case.as_ref()), None)) {
            let predicate = statement.predicate.as_ref();
            if predicate == dc::TITLE {
                title = Some(term_value(&statement.object));
            } else if predicate == dc::DESCRIPTION {
                description = Some(term_value(&statement.object));
            } else if predicate == earl::MODE || predicate == rdf::TYPE {
                continue;
            } else if let Term::NamedNode(assertion) = &statement.object {
                // The predicate is the processor and the object its assertion
                if let Some(previous) =
                    links.insert(predicate.as_str().to_owned(), assertion.as_str().to_owned())
                {
                    warn!(
                        test_case = id.as_str(),
                        processor = predicate.as_str(),
                        ignored = previous.as_str(),
                        "several assertions for the same processor"
                    );
                }
            }
        }
        TestCaseReport {
            num: test_case_number(&id).into(),
            title: title.unwrap_or_default(),
            description: description.filter(|d| !d.is_empty()),
            kind: TEST_CASE_TYPE,
            mode: AUTOMATIC_MODE,
            assertions: links
                .into_iter()
                .map(|(processor, assertion)| {
                    let outcome = Outcome::from_recorded(outcomes.get(&assertion).copied());
                    let report = AssertionReport {
                        id: assertion,
                        kind: ASSERTION_TYPE,
                        asserted_by: self.suite.iri.clone(),
                        test: id.clone(),
                        subject: processor.clone(),
                        result: outcome.into(),
                    };
                    (processor, report)
                })
                .collect(),
            id,
        }
    }
}

/// Sorts statements by predicate then object to get a deterministic iteration order.
fn sorted(mut statements: Vec<Triple>) -> Vec<Triple> {
    statements.sort_by_cached_key(|t| (t.predicate.as_str().to_owned(), t.object.to_string()));
    statements
}

fn suffix<'a>(statement: &'a Triple, prefix: &str) -> &'a str {
    statement
        .predicate
        .as_str()
        .strip_prefix(prefix)
        .unwrap_or_default()
}

/// The last path segment of the test case IRI without extension.
fn test_case_number(id: &str) -> &str {
    let segment = id.rsplit('/').next().unwrap_or(id);
    segment.split('.').next().unwrap_or(segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{BlankNode, Literal, NamedNode};
    use serde_json::json;

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.com/{name}"))
    }

    #[test]
    fn test_case_numbers() {
        assert_eq!(test_case_number("http://rdfa.info/test-suite/test-cases/0001.html"), "0001");
        assert_eq!(test_case_number("http://rdfa.info/test-suite/test-cases/0002"), "0002");
        assert_eq!(test_case_number("_:b0"), "_:b0");
    }

    #[test]
    fn outcome_serialization() -> serde_json::Result<()> {
        assert_eq!(serde_json::to_value(Outcome::Pass)?, json!("pass"));
        assert_eq!(serde_json::to_value(Outcome::Fail)?, json!("fail"));
        assert_eq!(serde_json::to_value(Outcome::NotTested)?, json!("not-tested"));
        assert_eq!(Outcome::from_recorded(None), Outcome::NotTested);
        Ok(())
    }

    #[test]
    fn processor_with_only_a_name() -> serde_json::Result<()> {
        let info = ProcessorInfo {
            name: "A".into(),
            ..ProcessorInfo::default()
        };
        assert_eq!(
            serde_json::to_value(ProcessorDescriptor::new("http://example.com/a", &info))?,
            json!({
                "@id": "http://example.com/a",
                "@type": ["earl:TestSubject", "doap:Project"],
                "name": "A"
            })
        );
        Ok(())
    }

    fn suite_with_host_language(graph: &mut GraphStore, list_head: impl Into<Term>) {
        let version = BlankNode::default();
        graph.add(&Triple::new(
            NamedNode::new_unchecked("http://rdfa.info/test-suite/"),
            NamedNode::new_unchecked(format!("{}rdfa1.1", rdfatest::VERSION_PREFIX)),
            version.clone(),
        ));
        graph.add(&Triple::new(
            version,
            NamedNode::new_unchecked(format!("{}xhtml1", rdfatest::HOST_LANGUAGE_PREFIX)),
            list_head,
        ));
    }

    #[test]
    fn cyclic_list_is_an_issue() {
        let (x, y) = (BlankNode::default(), BlankNode::default());
        let mut graph = GraphStore::new();
        suite_with_host_language(&mut graph, x.clone());
        graph.add(&Triple::new(x.clone(), rdf::FIRST, ex("0001")));
        graph.add(&Triple::new(x.clone(), rdf::REST, y.clone()));
        graph.add(&Triple::new(y.clone(), rdf::FIRST, ex("0002")));
        graph.add(&Triple::new(y, rdf::REST, x));
        let synthesis = ReportSynthesizer::default().synthesize(&graph, &BTreeMap::new(), &BTreeMap::new());
        assert_eq!(synthesis.issues.len(), 1);
        assert_eq!(synthesis.issues[0].version, "rdfa1.1");
        assert_eq!(synthesis.issues[0].host_language, "xhtml1");
        assert!(matches!(synthesis.issues[0].error, ListError::Cycle { .. }));
        assert_eq!(
            synthesis.report.versions["rdfa1.1"].host_languages.get("xhtml1"),
            Some(&Vec::new())
        );
    }

    #[test]
    fn names_of_report_fields_are_skipped() -> serde_json::Result<()> {
        let suite = NamedNode::new_unchecked("http://rdfa.info/test-suite/");
        let (name_version, version) = (BlankNode::default(), BlankNode::default());
        let mut graph = GraphStore::new();
        graph.add(&Triple::new(
            suite.clone(),
            NamedNode::new_unchecked(format!("{}name", rdfatest::VERSION_PREFIX)),
            name_version.clone(),
        ));
        graph.add(&Triple::new(
            name_version,
            NamedNode::new_unchecked(format!("{}html5", rdfatest::HOST_LANGUAGE_PREFIX)),
            rdf::NIL,
        ));
        graph.add(&Triple::new(
            suite,
            NamedNode::new_unchecked(format!("{}rdfa1.1", rdfatest::VERSION_PREFIX)),
            version.clone(),
        ));
        for host_language in ["@type", "html5"] {
            graph.add(&Triple::new(
                version.clone(),
                NamedNode::new_unchecked(format!("{}{host_language}", rdfatest::HOST_LANGUAGE_PREFIX)),
                rdf::NIL,
            ));
        }
        let synthesis = ReportSynthesizer::default().synthesize(&graph, &BTreeMap::new(), &BTreeMap::new());
        assert!(synthesis.issues.is_empty());
        let report = serde_json::to_value(&synthesis.report)?;
        assert_eq!(report["name"], "RDFa Test Suite");
        assert_eq!(
            report["rdfa1.1"],
            json!({"@type": "rdfatest:Version", "html5": []})
        );
        assert_eq!(
            synthesis.report.versions.keys().collect::<Vec<_>>(),
            ["rdfa1.1"]
        );
        Ok(())
    }

    #[test]
    fn not_tested_and_duplicated_processor() -> serde_json::Result<()> {
        let head = BlankNode::default();
        let test_case = ex("test-cases/0003.html");
        let mut graph = GraphStore::new();
        suite_with_host_language(&mut graph, head.clone());
        graph.add(&Triple::new(head.clone(), rdf::FIRST, test_case.clone()));
        graph.add(&Triple::new(head, rdf::REST, rdf::NIL));
        graph.add(&Triple::new(test_case.clone(), dc::TITLE, Literal::from("Test 0003")));
        graph.add(&Triple::new(test_case.clone(), dc::DESCRIPTION, Literal::from("")));
        graph.add(&Triple::new(test_case.clone(), rdf::TYPE, ex("TestCase")));
        graph.add(&Triple::new(test_case.clone(), ex("p"), ex("assertion/1")));
        graph.add(&Triple::new(test_case.clone(), ex("p"), ex("assertion/2")));
        graph.add(&Triple::new(test_case, ex("q"), Literal::from("not a link")));
        let outcomes = BTreeMap::from([("http://example.com/assertion/1".to_owned(), true)]);
        let synthesis = ReportSynthesizer::default().synthesize(&graph, &BTreeMap::new(), &outcomes);
        assert!(synthesis.issues.is_empty());
        let test_cases = &synthesis.report.versions["rdfa1.1"].host_languages["xhtml1"];
        assert_eq!(
            serde_json::to_value(test_cases)?,
            json!([{
                "@id": "http://example.com/test-cases/0003.html",
                "@type": "earl:TestCase",
                "num": "0003",
                "title": "Test 0003",
                "mode": "earl:automatic",
                "http://example.com/p": {
                    "@id": "http://example.com/assertion/2",
                    "@type": "earl:Assertion",
                    "assertedBy": "http://rdfa.info/test-suite/",
                    "test": "http://example.com/test-cases/0003.html",
                    "subject": "http://example.com/p",
                    "result": {"@type": "earl:TestResult", "outcome": "not-tested"}
                }
            }])
        );
        Ok(())
    }
}
