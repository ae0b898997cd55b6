#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod config;
mod dump;
pub mod embedded;
mod error;
mod graph;
#[cfg(feature = "http-client")]
mod http;
mod list;
mod loader;
mod query;
mod rdfa;
mod registry;
mod report;
pub mod vocab;

pub use config::{LoaderOptions, SuiteConfig};
pub use dump::{DumpFormat, dump_graph, write_graph};
pub use error::{ConfigError, DumpError, FetchError, ListError, LoadError, QueryError};
pub use graph::GraphStore;
pub use list::{RdfList, RdfListIterator};
pub use loader::{LoadedSources, SourceKind, SourceLoader};
pub use query::{ProcessorInfo, QueryEngine};
pub use rdfa::parse_rdfa;
pub use registry::{DocumentFetcher, ProcessorEntry, ProcessorRegistry};
pub use report::{
    AssertionReport, IntegrityIssue, Outcome, ProcessorDescriptor, Report, ReportSynthesizer,
    Synthesis, TestCaseReport, TestResult, VersionReport,
};
