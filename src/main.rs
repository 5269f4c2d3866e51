//! doxmark — turn a Doxygen XML output directory into Markdown documents.
//!
//! - single file (default): `doxmark doxygen/xml`
//! - one file per group: `doxmark -g -o docs/api_%s.md doxygen/xml`
//! - one file per top-level namespace: `doxmark -c doxygen/xml`

use anyhow::{Context, Result};
use clap::Parser;
use doxmark::capture::StructureCapture;
use doxmark::config::{Filters, Options};
use doxmark::orchestrator::Orchestrator;
use doxmark::parser;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "doxmark",
    version,
    about = "Generate Markdown documentation from Doxygen XML output"
)]
struct Cli {
    /// Doxygen XML output directory
    directory: PathBuf,

    /// Output file; must contain %s when --groups or --classes is used
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Write one file per group
    #[arg(short = 'g', long)]
    groups: bool,

    /// Write one file per top-level namespace
    #[arg(short = 'c', long)]
    classes: bool,

    /// Write one file per page
    #[arg(short = 'p', long)]
    pages: bool,

    /// Leave the index out of single-file output
    #[arg(short = 'n', long)]
    noindex: bool,

    /// Add {#id} anchors to headings
    #[arg(short = 'a', long)]
    anchors: bool,

    /// Add <a id="..."></a> anchors to headings
    #[arg(short = 'H', long)]
    html_anchors: bool,

    /// Language tag for code fences
    #[arg(short = 'l', long, default_value = "cpp")]
    language: String,

    /// Output format: markdown (default), md, json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Member sections to render, in order (comma separated)
    #[arg(long, value_delimiter = ',')]
    members: Option<Vec<String>>,

    /// Compound kinds to render, in order (comma separated)
    #[arg(long, value_delimiter = ',')]
    compounds: Option<Vec<String>>,

    /// Print the kinds and attributes seen at each traversal depth
    #[arg(long)]
    capture: bool,

    /// Also write log lines to FILE
    #[arg(short = 'L', long, num_args = 0..=1, default_missing_value = "doxmark.log")]
    logfile: Option<PathBuf>,

    /// Only log errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

impl Cli {
    fn options(&self) -> Options {
        let defaults = Filters::default();
        Options {
            directory: self.directory.clone(),
            output: self.output.clone(),
            groups: self.groups,
            classes: self.classes,
            pages: self.pages,
            noindex: self.noindex,
            anchors: self.anchors,
            html_anchors: self.html_anchors,
            language: self.language.clone(),
            format: self.format.clone(),
            filters: Filters {
                members: self.members.clone().unwrap_or(defaults.members),
                compounds: self.compounds.clone().unwrap_or(defaults.compounds),
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.logfile.as_deref())?;

    let options = cli.options();
    let mut tree = parser::load(&options.directory).with_context(|| {
        format!(
            "failed to load doxygen XML from {}",
            options.directory.display()
        )
    })?;
    tracing::debug!("tree holds {} compounds", tree.len());

    let mut capture = StructureCapture::new();
    let mut orchestrator = Orchestrator::new(&options)?;
    if cli.capture {
        orchestrator = orchestrator.with_observer(&mut capture);
    }
    orchestrator.run(&mut tree)?;
    drop(orchestrator);

    if cli.capture {
        print!("{}", capture.report());
    }
    Ok(())
}

fn init_logging(quiet: bool, logfile: Option<&std::path::Path>) -> Result<()> {
    let default = if quiet { "doxmark=error" } else { "doxmark=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());

    let file_layer = match logfile {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file: {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}
