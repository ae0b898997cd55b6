use anyhow::{Context, bail};
use clap::Parser;
use cli::{Args, Command, SourceArgs, SuiteArgs};
use oxearl::{
    DumpFormat, LoadedSources, LoaderOptions, QueryEngine, ReportSynthesizer, SourceLoader,
    SuiteConfig, write_graph,
};
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufWriter, Write, stdout};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    match args.command {
        Command::Report {
            sources,
            suite,
            output,
        } => {
            let start = Instant::now();
            let loaded = load(&sources)?;
            let engine =
                QueryEngine::new(&loaded.graph).context("Not able to query the loaded graph")?;
            let processors = engine
                .processor_metadata()
                .context("Not able to read the processor descriptions")?;
            let outcomes = engine
                .assertion_outcomes()
                .context("Not able to read the assertion outcomes")?;
            let synthesis = ReportSynthesizer::new(suite_config(suite)).synthesize(
                &loaded.graph,
                &processors,
                &outcomes,
            );
            if !synthesis.issues.is_empty() {
                warn!(
                    issues = synthesis.issues.len(),
                    "some test case lists could not be resolved, their host languages are empty"
                );
            }
            if let Some(output) = output {
                let mut writer = BufWriter::new(File::create(&output).with_context(|| {
                    format!("Not able to create the report file {}", output.display())
                })?);
                synthesis.report.write_json(&mut writer)?;
                writer.write_all(b"\n")?;
                close_file_writer(writer)?;
            } else {
                let mut writer = stdout().lock();
                synthesis.report.write_json(&mut writer)?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
            info!(
                processors = processors.len(),
                assertions = outcomes.len(),
                duration = ?start.elapsed(),
                "report written"
            );
            Ok(())
        }
        Command::Dump {
            sources,
            output,
            format,
            dump_base,
        } => {
            let format = if let Some(format) = format {
                DumpFormat::from_name(&format)?
            } else if let Some(output) = &output {
                dump_format_from_path(output)?
            } else {
                bail!("The --format option must be set when writing to stdout")
            };
            let loaded = load(&sources)?;
            if let Some(output) = output {
                let file = File::create(&output).with_context(|| {
                    format!("Not able to create the dump file {}", output.display())
                })?;
                close_file_writer(write_graph(
                    &loaded.graph,
                    format,
                    dump_base.as_deref(),
                    BufWriter::new(file),
                )?)?;
            } else {
                write_graph(
                    &loaded.graph,
                    format,
                    dump_base.as_deref(),
                    stdout().lock(),
                )?
                .flush()?;
            }
            info!(statements = loaded.graph.len(), format = %format, "graph dumped");
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load(sources: &SourceArgs) -> anyhow::Result<LoadedSources> {
    let mut options =
        LoaderOptions::default().with_fetch_timeout(Duration::from_secs(sources.timeout));
    if let Some(base) = &sources.base {
        options = options.with_base_iri(base);
    }
    if let Some(registry) = &sources.registry {
        options = options.with_registry(registry);
    }
    let loaded = SourceLoader::new(options)
        .load(&sources.files)
        .context("Not able to load the sources")?;
    if !loaded.errors.is_empty() {
        warn!(skipped = loaded.errors.len(), "some sources have been skipped");
    }
    Ok(loaded)
}

fn suite_config(suite: SuiteArgs) -> SuiteConfig {
    SuiteConfig::new(suite.suite)
        .with_name(suite.suite_name)
        .with_homepage(suite.suite_homepage)
        .with_context(suite.context)
}

fn dump_format_from_path(path: &Path) -> anyhow::Result<DumpFormat> {
    if let Some(ext) = path.extension().and_then(OsStr::to_str) {
        DumpFormat::from_name(ext).with_context(|| {
            format!("Not able to guess the file format from file name extension '{ext}'")
        })
    } else {
        bail!(
            "The path {} has no extension to guess a file format from",
            path.display()
        )
    }
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}
