use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_REDIRECTION_LIMIT: usize = 5;

/// Description of the test suite the report is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    /// IRI of the test suite. It is the subject of the version statements.
    pub iri: String,
    pub name: String,
    pub homepage: String,
    /// IRI of the JSON-LD context of the report.
    pub context: String,
}

impl SuiteConfig {
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = homepage.into();
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

impl Default for SuiteConfig {
    /// The RDFa test suite.
    fn default() -> Self {
        Self {
            iri: "http://rdfa.info/test-suite/".into(),
            name: "RDFa Test Suite".into(),
            homepage: "http://rdfa.info/".into(),
            context: "http://rdfa.info/contexts/rdfa-earl.jsonld".into(),
        }
    }
}

/// Options of the [`SourceLoader`](crate::SourceLoader).
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Base IRI used to resolve relative IRIs of the input sources.
    pub base_iri: Option<String>,
    /// Path of the processor registry listing the processor descriptions to fetch.
    pub registry: Option<PathBuf>,
    /// Maximal duration of a single processor description fetch.
    pub fetch_timeout: Duration,
    pub redirection_limit: usize,
}

impl LoaderOptions {
    #[must_use]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: impl Into<PathBuf>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_redirection_limit(mut self, limit: usize) -> Self {
        self.redirection_limit = limit;
        self
    }
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            base_iri: None,
            registry: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            redirection_limit: DEFAULT_REDIRECTION_LIMIT,
        }
    }
}
