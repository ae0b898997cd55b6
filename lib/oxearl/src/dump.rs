//! Serialization of the merged graph.

use crate::error::DumpError;
use crate::graph::GraphStore;
use crate::vocab::{dc, doap, earl, rdfatest};
use oxigraph::io::{RdfFormat, RdfSerializer};
use std::fmt;
use std::io::Write;

const PREFIXES: [(&str, &str); 4] = [
    ("dc", dc::NAMESPACE),
    ("doap", doap::NAMESPACE),
    ("earl", earl::NAMESPACE),
    ("rdfatest", rdfatest::NAMESPACE),
];

/// A syntax to dump the merged graph to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpFormat {
    format: RdfFormat,
}

impl DumpFormat {
    /// Looks for a format from a file extension like `ttl` or a media type like `text/turtle`.
    ///
    /// ```
    /// use oxearl::DumpFormat;
    /// use oxigraph::io::RdfFormat;
    ///
    /// assert_eq!(DumpFormat::from_name("nt")?.rdf_format(), RdfFormat::NTriples);
    /// assert_eq!(DumpFormat::from_name("text/turtle")?.rdf_format(), RdfFormat::Turtle);
    /// assert!(DumpFormat::from_name("foo").is_err());
    /// # Result::<_, oxearl::DumpError>::Ok(())
    /// ```
    pub fn from_name(name: &str) -> Result<Self, DumpError> {
        RdfFormat::from_extension(name)
            .or_else(|| RdfFormat::from_media_type(name))
            .map(Self::from)
            .ok_or_else(|| DumpError::UnknownFormat(name.into()))
    }

    pub fn rdf_format(self) -> RdfFormat {
        self.format
    }
}

impl From<RdfFormat> for DumpFormat {
    fn from(format: RdfFormat) -> Self {
        Self { format }
    }
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format.name())
    }
}

/// Writes all the statements of `graph` to `writer`.
///
/// The `dc`, `doap`, `earl` and `rdfatest` prefixes are declared if the syntax supports them.
/// With a `base_iri`, the syntaxes supporting it also write IRIs, prefix declarations included,
/// relative to it.
pub fn write_graph<W: Write>(
    graph: &GraphStore,
    format: DumpFormat,
    base_iri: Option<&str>,
    writer: W,
) -> Result<W, DumpError> {
    let mut serializer = RdfSerializer::from_format(format.rdf_format());
    for (name, iri) in PREFIXES {
        serializer = serializer
            .with_prefix(name, iri)
            .map_err(|source| DumpError::InvalidIri {
                iri: iri.into(),
                source,
            })?;
    }
    if let Some(base_iri) = base_iri {
        serializer = serializer
            .with_base_iri(base_iri)
            .map_err(|source| DumpError::InvalidIri {
                iri: base_iri.into(),
                source,
            })?;
    }
    let mut serializer = serializer.for_writer(writer);
    for triple in graph.iter() {
        serializer.serialize_triple(triple)?;
    }
    Ok(serializer.finish()?)
}

/// Serializes all the statements of `graph` to a string.
///
/// ```
/// use oxearl::{DumpFormat, GraphStore, dump_graph};
/// use oxigraph::model::{Literal, NamedNode, Triple};
///
/// let graph = GraphStore::from_iter([Triple::new(
///     NamedNode::new("http://example.com/a")?,
///     NamedNode::new("http://usefulinc.com/ns/doap#name")?,
///     Literal::from("A"),
/// )]);
/// assert_eq!(
///     dump_graph(&graph, DumpFormat::from_name("nt")?, None)?,
///     "<http://example.com/a> <http://usefulinc.com/ns/doap#name> \"A\" .\n"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn dump_graph(
    graph: &GraphStore,
    format: DumpFormat,
    base_iri: Option<&str>,
) -> Result<String, DumpError> {
    Ok(String::from_utf8(write_graph(
        graph,
        format,
        base_iri,
        Vec::new(),
    )?)?)
}
