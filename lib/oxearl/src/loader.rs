use crate::config::LoaderOptions;
use crate::embedded::parse_embedded;
use crate::error::{ConfigError, LoadError};
use crate::graph::GraphStore;
use crate::registry::{DocumentFetcher, ProcessorRegistry};
use oxigraph::io::{RdfFormat, RdfParseError, RdfParser};
use oxigraph::model::{NamedNode, Triple};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const EMBEDDED_EXTENSIONS: [&str; 4] = ["html", "htm", "xhtml", "svg"];
const EMBEDDED_MEDIA_TYPES: [&str; 3] = ["text/html", "application/xhtml+xml", "image/svg+xml"];

/// The reader to use for a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A markup document with RDFa attributes or RDF data blocks.
    Embedded,
    /// A document in an RDF syntax.
    Rdf(RdfFormat),
}

impl SourceKind {
    /// Looks for a reader from a file extension like `ttl` or `html`.
    ///
    /// ```
    /// use oxearl::SourceKind;
    /// use oxigraph::io::RdfFormat;
    ///
    /// assert_eq!(SourceKind::from_extension("TTL"), Some(SourceKind::Rdf(RdfFormat::Turtle)));
    /// assert_eq!(SourceKind::from_extension("xhtml"), Some(SourceKind::Embedded));
    /// assert_eq!(SourceKind::from_extension("docx"), None);
    /// ```
    pub fn from_extension(extension: &str) -> Option<Self> {
        if EMBEDDED_EXTENSIONS
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
        {
            return Some(Self::Embedded);
        }
        RdfFormat::from_extension(extension).map(Self::Rdf)
    }

    /// Looks for a reader from a media type, ignoring its parameters.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type.split(';').next()?.trim();
        if EMBEDDED_MEDIA_TYPES
            .iter()
            .any(|t| t.eq_ignore_ascii_case(essence))
        {
            return Some(Self::Embedded);
        }
        RdfFormat::from_media_type(essence).map(Self::Rdf)
    }

    /// Looks for a reader from the extension of the given path.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let Some(extension) = path.extension().and_then(OsStr::to_str) else {
            return Err(ConfigError::MissingExtension {
                path: path.to_owned(),
            });
        };
        Self::from_extension(extension).ok_or_else(|| ConfigError::UnknownExtension {
            path: path.to_owned(),
            extension: extension.into(),
        })
    }

    /// Reads all the statements of a document.
    ///
    /// Named graphs are flattened: their statements are returned like the ones of the default graph.
    pub fn parse(
        self,
        mut reader: impl Read,
        base_iri: Option<&str>,
    ) -> Result<Vec<Triple>, RdfParseError> {
        match self {
            Self::Embedded => {
                let mut document = String::new();
                reader.read_to_string(&mut document)?;
                parse_embedded(&document, base_iri)
            }
            Self::Rdf(format) => {
                let mut parser = RdfParser::from_format(format);
                if let Some(base_iri) = base_iri {
                    parser = parser
                        .with_base_iri(base_iri)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
                }
                parser
                    .for_reader(reader)
                    .map(|quad| quad.map(Triple::from))
                    .collect()
            }
        }
    }
}

/// Statements loaded from the input sources.
#[derive(Debug, Default)]
pub struct LoadedSources {
    pub graph: GraphStore,
    /// The configuration problems met while loading. The affected sources have been skipped.
    pub errors: Vec<ConfigError>,
}

/// Reads the input sources and the processor descriptions into a single [`GraphStore`].
///
/// ```no_run
/// use oxearl::{LoaderOptions, SourceLoader};
///
/// let loaded = SourceLoader::new(LoaderOptions::default().with_registry("processors.json"))
///     .load(["manifest.ttl", "earl/pyrdfa.ttl"])?;
/// for error in &loaded.errors {
///     eprintln!("{error}");
/// }
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceLoader {
    options: LoaderOptions,
}

impl SourceLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads the given files then the descriptions of the registry processors.
    ///
    /// A file given several times is only read once. The blank nodes of each file are labeled
    /// canonically so that loading the same statements again adds nothing.
    pub fn load(
        &self,
        paths: impl IntoIterator<Item = impl AsRef<Path>>,
    ) -> Result<LoadedSources, LoadError> {
        if let Some(base_iri) = &self.options.base_iri {
            NamedNode::new(base_iri).map_err(|source| LoadError::InvalidBaseIri {
                iri: base_iri.clone(),
                source,
            })?;
        }
        let mut loaded = LoadedSources::default();
        let mut seen = HashSet::new();
        for path in paths {
            let path = path.as_ref();
            let kind = match SourceKind::from_path(path) {
                Ok(kind) => kind,
                Err(error) => {
                    warn!(error = %error, "skipping source");
                    loaded.errors.push(error);
                    continue;
                }
            };
            let canonical = fs::canonicalize(path).map_err(|source| LoadError::Io {
                path: path.to_owned(),
                source,
            })?;
            if !seen.insert(canonical) {
                info!(path = %path.display(), "source already loaded");
                continue;
            }
            let triples = self.read_source(path, kind)?;
            if triples.is_empty() && kind == SourceKind::Embedded {
                warn!(path = %path.display(), "no RDF statement found in the markup document");
            }
            let added = loaded.graph.add_source(triples);
            info!(path = %path.display(), statements = added, "loaded source");
        }
        if let Some(registry) = &self.options.registry {
            self.load_registry(registry, &mut loaded);
        }
        Ok(loaded)
    }

    /// Reads the statements of a single file.
    pub fn read_source(&self, path: &Path, kind: SourceKind) -> Result<Vec<Triple>, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        kind.parse(BufReader::new(file), self.options.base_iri.as_deref())
            .map_err(|source| LoadError::Parse {
                path: path.to_owned(),
                source,
            })
    }

    fn load_registry(&self, path: &Path, loaded: &mut LoadedSources) {
        let registry = match ProcessorRegistry::from_path(path) {
            Ok(registry) => registry,
            Err(error) => {
                warn!(error = %error, "ignoring processor registry");
                loaded.errors.push(error);
                return;
            }
        };
        let base_dir = path.parent().map_or_else(PathBuf::new, Path::to_path_buf);
        match DocumentFetcher::new(&self.options, base_dir) {
            Ok(fetcher) => {
                registry.merge_into(&mut loaded.graph, &fetcher);
            }
            Err(error) => {
                warn!(error = %error, "not able to build the processor description fetcher");
            }
        }
    }
}
