//! Reader for RDF embedded in markup documents.
//!
//! Statements are read from the [RDFa](https://www.w3.org/TR/rdfa-core/) attributes of the
//! document and from its [data blocks](https://html.spec.whatwg.org/multipage/scripting.html#data-block):
//! `<script>` elements whose `type` is the media type of an RDF syntax like `text/turtle` or
//! `application/ld+json`. Other scripts are ignored.

use crate::rdfa::parse_rdfa;
use oxigraph::io::{RdfFormat, RdfParseError, RdfParser};
use oxigraph::model::Triple;
use regex::Regex;
use std::io;
use std::sync::LazyLock;

#[expect(clippy::expect_used)]
static SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").expect("valid script regex")
});
#[expect(clippy::expect_used)]
static TYPE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\btype\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid type attribute regex")
});
#[expect(clippy::expect_used)]
static BASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<base\b[^>]*\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid base regex")
});

/// A data block found in a markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    pub format: RdfFormat,
    pub content: String,
}

/// Returns the RDF data blocks of the document, in document order.
pub fn data_blocks(document: &str) -> Vec<DataBlock> {
    SCRIPT
        .captures_iter(document)
        .filter_map(|script| {
            let attributes = script.get(1)?.as_str();
            let media_type = TYPE_ATTRIBUTE
                .captures(attributes)
                .and_then(|c| c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3)))?
                .as_str();
            let format = rdf_format_from_media_type(media_type)?;
            Some(DataBlock {
                format,
                content: unwrap_block_content(script.get(2)?.as_str()).to_owned(),
            })
        })
        .collect()
}

/// Returns the value of the `<base href="...">` element of the document, if any.
pub fn base_href(document: &str) -> Option<&str> {
    let captures = BASE.captures(document)?;
    Some(captures.get(1).or_else(|| captures.get(2))?.as_str())
}

/// Parses the RDFa attributes then the RDF data blocks of the document.
///
/// The document `<base>` element takes precedence over the given base IRI.
pub fn parse_embedded(document: &str, base_iri: Option<&str>) -> Result<Vec<Triple>, RdfParseError> {
    let base_iri = base_href(document).or(base_iri);
    let mut triples = parse_rdfa(&SCRIPT.replace_all(document, ""), base_iri);
    for block in data_blocks(document) {
        let mut parser = RdfParser::from_format(block.format);
        if let Some(base_iri) = base_iri {
            parser = parser
                .with_base_iri(base_iri)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        }
        for quad in parser.for_slice(block.content.as_bytes()) {
            triples.push(quad?.into());
        }
    }
    Ok(triples)
}

fn rdf_format_from_media_type(media_type: &str) -> Option<RdfFormat> {
    let essence = media_type.split(';').next()?.trim();
    if essence.eq_ignore_ascii_case("application/json") {
        // Plain JSON blocks are application data, not JSON-LD
        return None;
    }
    RdfFormat::from_media_type(essence)
}

fn unwrap_block_content(content: &str) -> &str {
    let mut content = content.trim();
    for (start, end) in [("<!--", "-->"), ("<![CDATA[", "]]>")] {
        if let Some(inner) = content
            .strip_prefix(start)
            .and_then(|c| c.strip_suffix(end))
        {
            content = inner.trim();
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{NamedNode, Triple};

    const DOCUMENT: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <base href="http://example.com/doc/">
    <title>Processor</title>
    <script type="text/javascript">var x = "<script type='text/turtle'>";</script>
    <script type="text/turtle">
      <#me> <http://usefulinc.com/ns/doap#name> "Example" .
    </script>
  </head>
  <body>
    <script type='application/n-triples'><!--
<http://example.com/a> <http://example.com/p> <http://example.com/b> .
    --></script>
    <script type="application/json">{"not": "rdf"}</script>
  </body>
</html>"#;

    #[test]
    fn finds_rdf_data_blocks() {
        let blocks = data_blocks(DOCUMENT);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].format, RdfFormat::Turtle);
        assert_eq!(blocks[1].format, RdfFormat::NTriples);
        assert!(blocks[1].content.starts_with("<http://example.com/a>"));
    }

    #[test]
    fn base_element_is_used() -> Result<(), RdfParseError> {
        assert_eq!(base_href(DOCUMENT), Some("http://example.com/doc/"));
        let triples = parse_embedded(DOCUMENT, Some("http://example.org/ignored"))?;
        assert_eq!(triples.len(), 2);
        assert!(triples.contains(&Triple::new(
            NamedNode::new_unchecked("http://example.com/doc/#me"),
            NamedNode::new_unchecked("http://usefulinc.com/ns/doap#name"),
            oxigraph::model::Literal::from("Example"),
        )));
        Ok(())
    }

    #[test]
    fn rdfa_and_data_blocks_are_combined() -> Result<(), RdfParseError> {
        let triples = parse_embedded(
            r#"<html prefix="doap: http://usefulinc.com/ns/doap#">
  <head>
    <script type="text/turtle"><http://example.com/p> <http://example.com/q> "block" .</script>
    <script>if (a < b) { document.write("<p property='doap:name'>Script</p>"); }</script>
  </head>
  <body about="http://example.com/p"><p property="doap:name">Attributes</p></body>
</html>"#,
            None,
        )?;
        assert_eq!(triples.len(), 2);
        assert!(triples.contains(&Triple::new(
            NamedNode::new_unchecked("http://example.com/p"),
            NamedNode::new_unchecked("http://usefulinc.com/ns/doap#name"),
            oxigraph::model::Literal::from("Attributes"),
        )));
        Ok(())
    }

    #[test]
    fn document_without_blocks_is_empty() -> Result<(), RdfParseError> {
        assert!(parse_embedded("<html><body>Nothing</body></html>", None)?.is_empty());
        Ok(())
    }

    #[test]
    fn syntax_error_is_reported() {
        parse_embedded(
            r#"<script type="text/turtle">this is not turtle</script>"#,
            Some("http://example.com/"),
        )
        .unwrap_err();
    }
}
