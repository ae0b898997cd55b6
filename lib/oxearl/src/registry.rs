//! Registry of the processors under test and retrieval of their [DOAP](http://usefulinc.com/ns/doap#) descriptions.
//!
//! The registry is a JSON object mapping processor identifiers to descriptors:
//! ```json
//! {
//!   "pyrdfa": {"doap": "http://www.w3.org/2012/pyRdfa/", "doap_url": "pyrdfa-doap.ttl"},
//!   "green-turtle": {"doap": "https://github.com/alexmilowski/green-turtle"}
//! }
//! ```
//! The description is read from `doap_url` if set, else from `doap`. Only the statements about the
//! processor itself, `doap` if set else `doap_url`, are kept.

use crate::config::LoaderOptions;
use crate::error::{ConfigError, FetchError};
use crate::graph::GraphStore;
#[cfg(feature = "http-client")]
use crate::http::Client;
use crate::loader::SourceKind;
use oxigraph::io::RdfFormat;
use oxigraph::model::{TermRef, Triple};
use rayon_core::ThreadPoolBuilder;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::num::NonZero;
use std::path::{Path, PathBuf};
use std::thread::available_parallelism;
use tracing::{debug, info, warn};

/// Descriptor of a processor in the registry. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProcessorEntry {
    /// Location of the processor description.
    #[serde(default)]
    pub doap_url: Option<String>,
    /// IRI of the processor.
    #[serde(default)]
    pub doap: Option<String>,
}

impl ProcessorEntry {
    /// The location to read the description from.
    pub fn location(&self) -> Option<&str> {
        self.doap_url.as_deref().or(self.doap.as_deref())
    }

    /// The processor IRI, subject of the statements to keep.
    pub fn subject(&self) -> Option<&str> {
        self.doap.as_deref().or(self.doap_url.as_deref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessorRegistry {
    processors: BTreeMap<String, ProcessorEntry>,
}

impl ProcessorRegistry {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read(path).map_err(|source| ConfigError::UnreadableRegistry {
            path: path.to_owned(),
            source,
        })?;
        Self::from_slice(&data).map_err(|source| ConfigError::InvalidRegistry {
            path: path.to_owned(),
            source,
        })
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(Self {
            processors: serde_json::from_slice(data)?,
        })
    }

    pub fn get(&self, id: &str) -> Option<&ProcessorEntry> {
        self.processors.get(id)
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Fetches the processor descriptions in parallel.
    ///
    /// The results are in processor identifier order. Processors without location are skipped.
    pub fn fetch_all(
        &self,
        fetcher: &DocumentFetcher,
    ) -> Vec<(&str, Result<Vec<Triple>, FetchError>)> {
        let sources = self
            .processors
            .iter()
            .filter_map(|(id, entry)| {
                let Some((location, subject)) = entry.location().zip(entry.subject()) else {
                    debug!(processor = id.as_str(), "no description location");
                    return None;
                };
                Some(DescriptionSource {
                    id,
                    location,
                    subject,
                })
            })
            .collect::<Vec<_>>();
        let mut results = sources.iter().map(|_| None).collect::<Vec<_>>();
        let threads = available_parallelism()
            .map_or(1, NonZero::get)
            .min(sources.len())
            .max(1);
        match ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("OxEARL description fetch thread {i}"))
            .build()
        {
            Ok(pool) => pool.scope(|s| {
                for (source, result) in sources.iter().zip(&mut results) {
                    s.spawn(move |_| *result = Some(source.fetch(fetcher)));
                }
            }),
            Err(error) => {
                warn!(error = %error, "no fetch thread pool, fetching sequentially");
                for (source, result) in sources.iter().zip(&mut results) {
                    *result = Some(source.fetch(fetcher));
                }
            }
        }
        sources
            .iter()
            .zip(results)
            .filter_map(|(source, result)| Some((source.id, result?)))
            .collect()
    }

    /// Fetches the processor descriptions and adds them to `graph`.
    ///
    /// Failures are logged and skipped. Returns the number of descriptions added.
    pub fn merge_into(&self, graph: &mut GraphStore, fetcher: &DocumentFetcher) -> usize {
        let mut merged = 0;
        for (id, result) in self.fetch_all(fetcher) {
            match result {
                Ok(triples) => {
                    let added = graph.add_source(triples);
                    info!(processor = id, statements = added, "read processor description");
                    merged += 1;
                }
                Err(error) => {
                    warn!(processor = id, error = %error, "failed to read processor description");
                }
            }
        }
        merged
    }
}

struct DescriptionSource<'a> {
    id: &'a str,
    location: &'a str,
    subject: &'a str,
}

impl DescriptionSource<'_> {
    fn fetch(&self, fetcher: &DocumentFetcher) -> Result<Vec<Triple>, FetchError> {
        debug!(
            processor = self.id,
            location = self.location,
            "fetching processor description"
        );
        let mut triples = fetcher.fetch(self.location)?;
        triples.retain(|t| {
            matches!(
                TermRef::from(t.subject.as_ref()),
                TermRef::NamedNode(s) if s.as_str() == self.subject
            )
        });
        Ok(triples)
    }
}

/// Reads documents from the file system or, with the `http-client` feature, from the web.
pub struct DocumentFetcher {
    #[cfg(feature = "http-client")]
    client: Client,
    base_dir: PathBuf,
}

impl DocumentFetcher {
    /// Builds a fetcher resolving relative paths against `base_dir`.
    pub fn new(options: &LoaderOptions, base_dir: impl Into<PathBuf>) -> io::Result<Self> {
        #[cfg(not(feature = "http-client"))]
        let _ = options;
        Ok(Self {
            #[cfg(feature = "http-client")]
            client: Client::new(options.fetch_timeout, options.redirection_limit)?,
            base_dir: base_dir.into(),
        })
    }

    /// Reads all the statements of the document at the given location.
    ///
    /// The syntax is guessed from the `Content-Type` of the response, then from the location
    /// extension, and defaults to Turtle.
    pub fn fetch(&self, location: &str) -> Result<Vec<Triple>, FetchError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            return self.fetch_remote(location);
        }
        let (path, base_iri) = if let Some(path) = location.strip_prefix("file://") {
            (PathBuf::from(path), Some(location))
        } else {
            (self.base_dir.join(location), None)
        };
        let file = File::open(&path).map_err(|source| FetchError::Io {
            location: location.into(),
            source,
        })?;
        guess_kind(location, None)
            .parse(BufReader::new(file), base_iri)
            .map_err(|source| FetchError::Parse {
                location: location.into(),
                source,
            })
    }

    #[cfg(feature = "http-client")]
    fn fetch_remote(&self, location: &str) -> Result<Vec<Triple>, FetchError> {
        let (content_type, body) =
            self.client
                .get_description(location)
                .map_err(|source| FetchError::Io {
                    location: location.into(),
                    source,
                })?;
        guess_kind(location, content_type.as_deref())
            .parse(body, Some(location))
            .map_err(|source| FetchError::Parse {
                location: location.into(),
                source,
            })
    }

    #[cfg(not(feature = "http-client"))]
    #[expect(clippy::unused_self)]
    fn fetch_remote(&self, location: &str) -> Result<Vec<Triple>, FetchError> {
        Err(FetchError::HttpDisabled {
            location: location.into(),
        })
    }
}

fn guess_kind(location: &str, content_type: Option<&str>) -> SourceKind {
    if let Some(kind) = content_type.and_then(SourceKind::from_media_type) {
        return kind;
    }
    let path = location.split(['?', '#']).next().unwrap_or(location);
    Path::new(path)
        .extension()
        .and_then(OsStr::to_str)
        .and_then(SourceKind::from_extension)
        .unwrap_or(SourceKind::Rdf(RdfFormat::Turtle))
}
