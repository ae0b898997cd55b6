//! Reader for the [RDFa Core](https://www.w3.org/TR/rdfa-core/) attributes of markup documents.
//!
//! The `about`, `resource`, `href`, `src`, `typeof`, `property`, `rel`, `rev`, `content`,
//! `datatype`, `vocab`, `prefix`, `xmlns:*` and `lang` attributes are read. Lists (`inlist`),
//! property copying and XML literals are not supported. Prefixes of the RDFa initial context like
//! `dc`, `foaf` or `schema` are predefined.

use oxigraph::model::vocab::rdf;
use oxigraph::model::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Term, Triple};
use oxiri::Iri;
use quick_xml::Reader;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::warn;

const INITIAL_PREFIXES: [(&str, &str); 15] = [
    ("cc", "http://creativecommons.org/ns#"),
    ("dc", "http://purl.org/dc/terms/"),
    ("dc11", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfa", "http://www.w3.org/ns/rdfa#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("schema", "http://schema.org/"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("vcard", "http://www.w3.org/2006/vcard/ns#"),
    ("void", "http://rdfs.org/ns/void#"),
    ("xhv", "http://www.w3.org/1999/xhtml/vocab#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];
/// Mapping of the CURIEs with an empty prefix like `:next`.
const DEFAULT_PREFIX: &str = "http://www.w3.org/1999/xhtml/vocab#";
/// HTML elements without end tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Reads the statements encoded with RDFa attributes in a markup document.
///
/// The markup does not need to be well-formed XML: unclosed void elements and unmatched end tags
/// are tolerated. The reading stops at the first markup error, keeping the statements read before.
/// `<script>` elements must have been removed from the document.
///
/// ```
/// use oxearl::parse_rdfa;
/// use oxigraph::model::{Literal, NamedNode, Triple};
///
/// let triples = parse_rdfa(
///     r##"<div prefix="doap: http://usefulinc.com/ns/doap#" about="#me" typeof="doap:Project">
///         <span property="doap:name">Example</span>
///     </div>"##,
///     Some("http://example.com/"),
/// );
/// assert!(triples.contains(&Triple::new(
///     NamedNode::new("http://example.com/#me")?,
///     NamedNode::new("http://usefulinc.com/ns/doap#name")?,
///     Literal::from("Example"),
/// )));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn parse_rdfa(document: &str, base_iri: Option<&str>) -> Vec<Triple> {
    let mut processor = RdfaProcessor::new(base_iri);
    let mut reader = Reader::from_str(document);
    let config = reader.config_mut();
    config.allow_unmatched_ends = true;
    config.check_end_names = false;
    config.check_comments = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => processor.start(&element, false),
            Ok(Event::Empty(element)) => processor.start(&element, true),
            Ok(Event::End(element)) => {
                processor.end(&String::from_utf8_lossy(element.local_name().as_ref()));
            }
            Ok(Event::Text(text)) => processor.text(&unescape(&String::from_utf8_lossy(&text))),
            Ok(Event::CData(text)) => processor.text(&String::from_utf8_lossy(&text)),
            Ok(Event::Eof) => break,
            Ok(_) => (),
            Err(error) => {
                warn!(error = %error, "invalid markup, the RDFa attributes after it are ignored");
                break;
            }
        }
    }
    processor.finish()
}

/// The evaluation context passed from an element to its children.
#[derive(Clone)]
struct Context {
    base: Option<Iri<String>>,
    parent_subject: NamedOrBlankNode,
    parent_object: NamedOrBlankNode,
    /// Predicates waiting for an object, the subject being `parent_subject`.
    incomplete: Vec<Incomplete>,
    prefixes: HashMap<String, String>,
    vocab: Option<String>,
    language: Option<String>,
}

#[derive(Clone)]
struct Incomplete {
    predicate: NamedNode,
    reverse: bool,
}

/// Properties whose value is the text content of the element.
struct PendingLiteral {
    subject: NamedOrBlankNode,
    predicates: Vec<NamedNode>,
    datatype: Option<NamedNode>,
    language: Option<String>,
}

struct OpenElement {
    name: String,
    context: Context,
    pending: Option<(PendingLiteral, String)>,
}

struct RdfaProcessor {
    root: Context,
    stack: Vec<OpenElement>,
    blank_nodes: HashMap<String, BlankNode>,
    triples: Vec<Triple>,
}

impl RdfaProcessor {
    fn new(base_iri: Option<&str>) -> Self {
        let base = base_iri.and_then(|iri| Iri::parse(iri.to_owned()).ok());
        let document: NamedOrBlankNode = base
            .as_ref()
            .and_then(|base| NamedNode::new(base.as_str()).ok())
            .map_or_else(|| BlankNode::default().into(), Into::into);
        Self {
            root: Context {
                base,
                parent_subject: document.clone(),
                parent_object: document,
                incomplete: Vec::new(),
                prefixes: INITIAL_PREFIXES
                    .iter()
                    .map(|(prefix, iri)| ((*prefix).to_owned(), (*iri).to_owned()))
                    .collect(),
                vocab: None,
                language: None,
            },
            stack: Vec::new(),
            blank_nodes: HashMap::new(),
            triples: Vec::new(),
        }
    }

    fn start(&mut self, element: &BytesStart<'_>, empty: bool) {
        let name = String::from_utf8_lossy(element.local_name().as_ref()).to_ascii_lowercase();
        let attributes = attributes(element);
        let parent = self
            .stack
            .last()
            .map_or_else(|| self.root.clone(), |e| e.context.clone());
        let mut context = parent.clone();
        context.incomplete = Vec::new();
        if let Some(vocab) = attributes.get("vocab") {
            context.vocab = (!vocab.is_empty())
                .then(|| resolve_iri(parent.base.as_ref(), vocab))
                .flatten()
                .map(NamedNode::into_string);
        }
        for (key, value) in &attributes {
            if let Some(prefix) = key.strip_prefix("xmlns:") {
                context.prefixes.insert(prefix.into(), value.clone());
            }
        }
        if let Some(prefixes) = attributes.get("prefix") {
            add_prefixes(prefixes, &mut context.prefixes);
        }
        if let Some(language) = attributes.get("xml:lang").or_else(|| attributes.get("lang")) {
            context.language = (!language.is_empty()).then(|| language.clone());
        }

        let rel = self.predicates(&context, attributes.get("rel"));
        let rev = self.predicates(&context, attributes.get("rev"));
        let properties = self.predicates(&context, attributes.get("property"));
        let types = self.predicates(&context, attributes.get("typeof"));
        let has_rel = !rel.is_empty() || !rev.is_empty();
        let has_typeof = attributes.contains_key("typeof");
        let has_property = attributes.contains_key("property");
        let is_head_or_body = name == "head" || name == "body";
        let about = attributes
            .get("about")
            .and_then(|value| self.resource(&context, value));
        let object = attributes
            .get("resource")
            .and_then(|value| self.resource(&context, value))
            .or_else(|| {
                ["href", "src"].iter().find_map(|key| {
                    resolve_iri(context.base.as_ref(), attributes.get(*key)?).map(Into::into)
                })
            });

        let mut skip = false;
        let mut typed_resource = None;
        let mut current_object = None;
        let new_subject = if has_rel {
            let new_subject = about.clone().unwrap_or_else(|| parent.parent_object.clone());
            if about.is_some() {
                typed_resource = has_typeof.then(|| new_subject.clone());
                current_object.clone_from(&object);
            } else {
                current_object = object
                    .clone()
                    .or_else(|| has_typeof.then(|| BlankNode::default().into()));
                typed_resource = has_typeof.then(|| current_object.clone()).flatten();
            }
            new_subject
        } else if has_property
            && !attributes.contains_key("content")
            && !attributes.contains_key("datatype")
        {
            let new_subject = about.clone().unwrap_or_else(|| parent.parent_object.clone());
            if has_typeof {
                typed_resource = Some(
                    about
                        .or_else(|| object.clone())
                        .unwrap_or_else(|| BlankNode::default().into()),
                );
                current_object.clone_from(&typed_resource);
            }
            new_subject
        } else {
            let new_subject = about.or_else(|| object.clone()).or_else(|| {
                (has_typeof && !is_head_or_body).then(|| BlankNode::default().into())
            });
            skip = new_subject.is_none() && !has_property && !has_typeof;
            let new_subject = new_subject.unwrap_or_else(|| parent.parent_object.clone());
            typed_resource = has_typeof.then(|| new_subject.clone());
            new_subject
        };

        if let Some(typed_resource) = &typed_resource {
            for class in types {
                self.triples
                    .push(Triple::new(typed_resource.clone(), rdf::TYPE, class));
            }
        }
        if let Some(current_object) = &current_object {
            for predicate in &rel {
                self.triples.push(Triple::new(
                    new_subject.clone(),
                    predicate.clone(),
                    current_object.clone(),
                ));
            }
            for predicate in &rev {
                self.triples.push(Triple::new(
                    current_object.clone(),
                    predicate.clone(),
                    new_subject.clone(),
                ));
            }
        } else if has_rel {
            context.incomplete = rel
                .into_iter()
                .map(|predicate| Incomplete {
                    predicate,
                    reverse: false,
                })
                .chain(rev.into_iter().map(|predicate| Incomplete {
                    predicate,
                    reverse: true,
                }))
                .collect();
            current_object = Some(BlankNode::default().into());
        }

        let mut pending = None;
        if !properties.is_empty() {
            let datatype = attributes
                .get("datatype")
                .filter(|datatype| !datatype.is_empty())
                .and_then(|datatype| self.predicate(&context, datatype));
            let value = if let Some(content) = attributes.get("content") {
                Some(literal(content.clone(), datatype.clone(), context.language.as_deref()))
            } else if attributes.contains_key("datatype") {
                None
            } else if let (false, Some(object)) = (has_rel, &object) {
                Some(object.clone().into())
            } else if let (true, None) = (has_typeof, attributes.get("about")) {
                typed_resource.clone().map(Term::from)
            } else {
                None
            };
            if let Some(value) = value {
                for predicate in &properties {
                    self.triples.push(Triple::new(
                        new_subject.clone(),
                        predicate.clone(),
                        value.clone(),
                    ));
                }
            } else {
                pending = Some((
                    PendingLiteral {
                        subject: new_subject.clone(),
                        predicates: properties,
                        datatype,
                        language: context.language.clone(),
                    },
                    String::new(),
                ));
            }
        }

        if !skip {
            for incomplete in &parent.incomplete {
                let triple = if incomplete.reverse {
                    Triple::new(
                        new_subject.clone(),
                        incomplete.predicate.clone(),
                        parent.parent_subject.clone(),
                    )
                } else {
                    Triple::new(
                        parent.parent_subject.clone(),
                        incomplete.predicate.clone(),
                        new_subject.clone(),
                    )
                };
                self.triples.push(triple);
            }
        }

        if skip {
            context.parent_subject = parent.parent_subject.clone();
            context.parent_object = parent.parent_object.clone();
            context.incomplete.clone_from(&parent.incomplete);
        } else {
            context.parent_object = current_object.unwrap_or_else(|| new_subject.clone());
            context.parent_subject = new_subject;
        }
        self.stack.push(OpenElement {
            name,
            context,
            pending,
        });
        if empty || VOID_ELEMENTS.contains(&self.stack_top_name()) {
            self.close_top();
        }
    }

    fn end(&mut self, name: &str) {
        if let Some(position) = self
            .stack
            .iter()
            .rposition(|e| e.name.eq_ignore_ascii_case(name))
        {
            while self.stack.len() > position {
                self.close_top();
            }
        }
    }

    fn text(&mut self, text: &str) {
        for element in &mut self.stack {
            if let Some((_, content)) = &mut element.pending {
                content.push_str(text);
            }
        }
    }

    fn finish(mut self) -> Vec<Triple> {
        while !self.stack.is_empty() {
            self.close_top();
        }
        self.triples
    }

    fn stack_top_name(&self) -> &str {
        self.stack.last().map_or("", |e| e.name.as_str())
    }

    fn close_top(&mut self) {
        let Some(element) = self.stack.pop() else {
            return;
        };
        if let Some((pending, content)) = element.pending {
            let value = literal(content, pending.datatype, pending.language.as_deref());
            for predicate in pending.predicates {
                self.triples.push(Triple::new(
                    pending.subject.clone(),
                    predicate,
                    value.clone(),
                ));
            }
        }
    }

    /// Resolves a whitespace separated list of terms, CURIEs or absolute IRIs.
    fn predicates(&self, context: &Context, value: Option<&String>) -> Vec<NamedNode> {
        value
            .map(|value| {
                value
                    .split_ascii_whitespace()
                    .filter_map(|token| self.predicate(context, token))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn predicate(&self, context: &Context, token: &str) -> Option<NamedNode> {
        if !token.contains(':') {
            return NamedNode::new(format!("{}{token}", context.vocab.as_deref()?)).ok();
        }
        if let Some(NamedOrBlankNode::NamedNode(iri)) = self.curie(context, token) {
            return Some(iri);
        }
        NamedNode::new(Iri::parse(token).ok()?.as_str()).ok()
    }

    /// Resolves a safe CURIE, a CURIE or a relative IRI.
    fn resource(&mut self, context: &Context, value: &str) -> Option<NamedOrBlankNode> {
        if let Some(curie) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            return self.curie_or_blank_node(context, curie);
        }
        self.curie_or_blank_node(context, value)
            .or_else(|| resolve_iri(context.base.as_ref(), value).map(Into::into))
    }

    fn curie_or_blank_node(&mut self, context: &Context, value: &str) -> Option<NamedOrBlankNode> {
        if let Some(label) = value.strip_prefix("_:") {
            return Some(
                self.blank_nodes
                    .entry(label.into())
                    .or_default()
                    .clone()
                    .into(),
            );
        }
        self.curie(context, value)
    }

    fn curie(&self, context: &Context, value: &str) -> Option<NamedOrBlankNode> {
        let (prefix, reference) = value.split_once(':')?;
        if reference.starts_with("//") || prefix == "_" {
            return None;
        }
        let namespace = if prefix.is_empty() {
            DEFAULT_PREFIX
        } else {
            context.prefixes.get(&prefix.to_ascii_lowercase())?
        };
        Some(NamedNode::new(format!("{namespace}{reference}")).ok()?.into())
    }
}

fn attributes(element: &BytesStart<'_>) -> HashMap<String, String> {
    let mut attributes = element.html_attributes();
    attributes.with_checks(false);
    attributes
        .filter_map(Result::ok)
        .map(|attribute| {
            (
                String::from_utf8_lossy(attribute.key.as_ref()).to_ascii_lowercase(),
                unescape(&String::from_utf8_lossy(&attribute.value)).trim().to_owned(),
            )
        })
        .collect()
}

fn add_prefixes(value: &str, prefixes: &mut HashMap<String, String>) {
    let mut tokens = value.split_ascii_whitespace();
    while let Some(token) = tokens.next() {
        let Some(prefix) = token.strip_suffix(':') else {
            continue;
        };
        let Some(namespace) = tokens.next() else {
            break;
        };
        prefixes.insert(prefix.to_ascii_lowercase(), namespace.into());
    }
}

fn resolve_iri(base: Option<&Iri<String>>, value: &str) -> Option<NamedNode> {
    let iri = match base {
        Some(base) => base.resolve(value).ok()?.into_inner(),
        None => Iri::parse(value.to_owned()).ok()?.into_inner(),
    };
    NamedNode::new(iri).ok()
}

fn literal(value: String, datatype: Option<NamedNode>, language: Option<&str>) -> Term {
    if let Some(datatype) = datatype {
        return Literal::new_typed_literal(value, datatype).into();
    }
    if let Some(language) = language {
        if let Ok(literal) = Literal::new_language_tagged_literal(value.clone(), language) {
            return literal.into();
        }
    }
    Literal::new_simple_literal(value).into()
}

fn unescape(raw: &str) -> Cow<'_, str> {
    unescape_with(raw, resolve_html5_entity).unwrap_or(Cow::Borrowed(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOAP: &str = "http://usefulinc.com/ns/doap#";

    fn iri(value: &str) -> NamedNode {
        NamedNode::new_unchecked(value)
    }

    fn doap(name: &str) -> NamedNode {
        iri(&format!("{DOAP}{name}"))
    }

    #[test]
    fn processor_description() {
        let triples = parse_rdfa(
            r#"<!DOCTYPE html>
<html prefix="doap: http://usefulinc.com/ns/doap#">
  <head><meta charset=utf-8><title>P1</title></head>
  <body>
    <div about="http://example.com/p1" typeof="doap:Project">
      <h1 property="doap:name">P1 &amp; co</h1>
      <a rel="doap:homepage" href="home">Home</a>
      <span property="dc:creator" content="Alice"></span>
      <p property="doap:description" lang="en">A <em>fast</em> processor</p>
    </div>
  </body>
</html>"#,
            Some("http://example.com/p1/"),
        );
        let p1 = iri("http://example.com/p1");
        for expected in [
            Triple::new(p1.clone(), rdf::TYPE, doap("Project")),
            Triple::new(p1.clone(), doap("name"), Literal::from("P1 & co")),
            Triple::new(p1.clone(), doap("homepage"), iri("http://example.com/p1/home")),
            Triple::new(
                p1.clone(),
                iri("http://purl.org/dc/terms/creator"),
                Literal::from("Alice"),
            ),
            Triple::new(
                p1,
                doap("description"),
                Literal::new_language_tagged_literal_unchecked("A fast processor", "en"),
            ),
        ] {
            assert!(triples.contains(&expected), "{expected}");
        }
        assert_eq!(triples.len(), 5);
    }

    #[test]
    fn typeof_without_about_creates_a_blank_node() {
        let triples = parse_rdfa(
            r#"<div vocab="http://usefulinc.com/ns/doap#" typeof="Project"><span property="name">P2</span></div>"#,
            None,
        );
        assert_eq!(triples.len(), 2);
        assert!(triples[0].subject.is_blank_node());
        assert_eq!(triples[0].subject, triples[1].subject);
        assert_eq!(triples[1].object, Term::from(Literal::from("P2")));
    }

    #[test]
    fn hanging_rel_is_completed_by_children() {
        let triples = parse_rdfa(
            r#"<div xmlns:doap="http://usefulinc.com/ns/doap#" about="http://example.com/p1" rel="doap:maintainer">
              <span about="_:me" property="doap:name">Me</span>
            </div>"#,
            None,
        );
        assert_eq!(triples.len(), 2);
        assert_eq!(
            triples[0].subject,
            NamedOrBlankNode::from(iri("http://example.com/p1"))
        );
        assert_eq!(triples[0].predicate, doap("maintainer"));
        assert_eq!(Term::from(triples[1].subject.clone()), triples[0].object);
        assert_eq!(triples[1].object, Term::from(Literal::from("Me")));
    }

    #[test]
    fn terms_without_vocabulary_are_ignored() {
        let triples = parse_rdfa(
            r#"<p about="http://example.com/a" property="title name">A</p>"#,
            None,
        );
        assert!(triples.is_empty());
    }

    #[test]
    fn markup_without_rdfa() {
        assert!(parse_rdfa("<html><body><p>Nothing<br>here</p></body></html>", None).is_empty());
    }
}
