use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "oxearl")]
/// OxEARL command line tool aggregating EARL conformance results into test suite reports
pub struct Args {
    /// Also logs the visited versions and host languages
    ///
    /// The RUST_LOG environment variable takes precedence over this option.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the JSON-LD report of the test suite results
    ///
    /// The test suite structure is read from the statements about the suite IRI:
    /// its versions, then the test case list of each host language of each version.
    Report {
        #[command(flatten)]
        sources: SourceArgs,
        #[command(flatten)]
        suite: SuiteArgs,
        /// File in which the report should be written
        ///
        /// If no file is given, it will be written to stdout.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
    /// Dump the merged graph of the sources into a file
    Dump {
        #[command(flatten)]
        sources: SourceArgs,
        /// File in which the graph should be written
        ///
        /// If no file is given, it will be written to stdout.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// The format of the file(s) to dump
        ///
        /// It can be an extension like "nt" or a MIME type like "application/n-triples".
        ///
        /// By default the format is guessed from the output file extension.
        #[arg(long, required_unless_present = "output")]
        format: Option<String>,
        /// Base IRI to write IRIs relative to, for the syntaxes supporting it
        ///
        /// By default all IRIs are written absolute.
        #[arg(long, value_hint = ValueHint::Url)]
        dump_base: Option<String>,
    },
}

#[derive(ClapArgs)]
pub struct SourceArgs {
    /// File(s) to load: test manifests, assertion graphs and processor descriptions
    ///
    /// The syntax is guessed from the file extension.
    /// Markup documents (.html, .xhtml, .svg) are read for their RDF data blocks.
    #[arg(num_args = 0.., value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
    /// JSON registry of the processors whose DOAP descriptions should be fetched
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub registry: Option<PathBuf>,
    /// Base IRI used to resolve the relative IRIs of the files
    #[arg(long, value_hint = ValueHint::Url)]
    pub base: Option<String>,
    /// Maximal duration in seconds of a single processor description fetch
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,
}

#[derive(ClapArgs)]
pub struct SuiteArgs {
    /// IRI of the test suite
    #[arg(long, default_value = "http://rdfa.info/test-suite/", value_hint = ValueHint::Url)]
    pub suite: String,
    /// Name of the test suite
    #[arg(long, default_value = "RDFa Test Suite")]
    pub suite_name: String,
    /// Homepage of the test suite
    #[arg(long, default_value = "http://rdfa.info/", value_hint = ValueHint::Url)]
    pub suite_homepage: String,
    /// IRI of the JSON-LD context of the report
    #[arg(long, default_value = "http://rdfa.info/contexts/rdfa-earl.jsonld", value_hint = ValueHint::Url)]
    pub context: String,
}
