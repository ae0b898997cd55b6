use oxigraph::io::RdfParseError;
use oxigraph::model::{IriParseError, Term};
use oxigraph::sparql::{QueryEvaluationError, SparqlSyntaxError};
use oxigraph::store::StorageError;
use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

/// A problem with the run configuration.
///
/// It is reported to the caller but does not stop the loading of the other sources.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The source file extension does not map to any reader.
    #[error("No reader is known for the extension '{extension}' of {}", path.display())]
    UnknownExtension { path: PathBuf, extension: String },
    /// The source file has no extension to select a reader from.
    #[error("The path {} has no extension to guess a reader from", path.display())]
    MissingExtension { path: PathBuf },
    /// The processor registry can not be read.
    #[error("The processor registry {} can not be read", path.display())]
    UnreadableRegistry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The processor registry is not a valid JSON object of processor descriptors.
    #[error("The processor registry {} is invalid", path.display())]
    InvalidRegistry {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A fatal error while reading an input source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: RdfParseError,
    },
    #[error("Invalid base IRI {iri}")]
    InvalidBaseIri {
        iri: String,
        #[source]
        source: IriParseError,
    },
}

/// An error while fetching a supplementary processor description.
///
/// These errors are logged and never abort a run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to retrieve {location}")]
    Io {
        location: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {location}")]
    Parse {
        location: String,
        #[source]
        source: RdfParseError,
    },
    #[error("Not able to fetch {location}: HTTP support is disabled")]
    HttpDisabled { location: String },
}

/// A data integrity error in an RDF list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// The list goes back to a node that has already been visited.
    #[error("The RDF list starting at {head} contains a cycle going back to {node}")]
    Cycle { head: Term, node: Term },
    /// A list node does not have the shape of an RDF list cell.
    #[error("The RDF list starting at {head} is malformed at {node}: {reason}")]
    Malformed {
        head: Term,
        node: Term,
        reason: &'static str,
    },
}

/// A failure of the query layer.
///
/// No report can be trusted if the merged graph can not be queried, so it aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Syntax(#[from] SparqlSyntaxError),
    #[error(transparent)]
    Evaluation(#[from] QueryEvaluationError),
}

/// An error while dumping the merged graph.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("The format '{0}' is unknown")]
    UnknownFormat(String),
    #[error("Invalid IRI for prefix or base {iri}")]
    InvalidIri {
        iri: String,
        #[source]
        source: IriParseError,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("The serialization is not valid UTF-8")]
    Utf8(#[from] FromUtf8Error),
}
