//! apiref: turn generated HTML API documentation into AsciiDoc reference pages.
//!
//! Reads rustdoc, Sphinx or Javadoc output for one build configuration, or two
//! configurations side by side (`sync` and `async` builds of the same crate),
//! and writes one `.adoc` page per documented class, trait or enum.
//!
//! ```text
//! apiref -e rust -o docs/api -m target/doc=sync target/doc
//! apiref -e rust -o docs/api -m sync/doc=sync -m async/doc=async sync/doc async/doc
//! ```

mod anchor;
mod error;
mod model;
mod parser;
mod pipeline;
mod render;
mod signature;
mod text;

use anyhow::{bail, Context, Result};
use clap::Parser;
use parser::Ecosystem;
use pipeline::{Input, PipelineConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "apiref",
    about = "Generate AsciiDoc API reference pages from rustdoc, Sphinx or Javadoc HTML"
)]
struct Cli {
    /// Input directories, primary first (one or two)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Mode label of an input directory, as DIR=LABEL. One per input.
    #[arg(short = 'm', long = "mode", value_parser = parse_mode)]
    modes: Vec<(PathBuf, String)>,

    /// Documentation generator that produced the inputs
    #[arg(short = 'e', long, value_enum)]
    ecosystem: Ecosystem,

    /// Path fragment marking Sphinx API module pages. Can be repeated.
    #[arg(long = "marker", default_values_t = [".api.".to_string(), ".common.".to_string()])]
    markers: Vec<String>,

    /// Parse every page and report all failures before exiting
    #[arg(long)]
    keep_going: bool,
}

/// Parse `DIR=LABEL`. The label follows the last `=`.
fn parse_mode(value: &str) -> std::result::Result<(PathBuf, String), String> {
    match value.rsplit_once('=') {
        Some((dir, label)) if !dir.is_empty() && !label.is_empty() => {
            Ok((PathBuf::from(dir), label.to_string()))
        }
        _ => Err(format!("expected DIR=LABEL, got `{}`", value)),
    }
}

/// Pair every input directory with exactly one mode label.
fn resolve_inputs(dirs: &[PathBuf], modes: &[(PathBuf, String)]) -> Result<Vec<Input>> {
    if let Some((dir, _)) = modes.iter().find(|(dir, _)| !dirs.contains(dir)) {
        bail!("--mode given for {}, which is not an input", dir.display());
    }

    dirs.iter()
        .map(|dir| {
            let labels: Vec<&String> = modes
                .iter()
                .filter(|(d, _)| d == dir)
                .map(|(_, label)| label)
                .collect();
            match labels.as_slice() {
                [label] => Ok(Input {
                    dir: dir.clone(),
                    mode: label.to_string(),
                }),
                [] => bail!("missing --mode for input {}", dir.display()),
                _ => bail!("more than one --mode for input {}", dir.display()),
            }
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = PipelineConfig {
        inputs: resolve_inputs(&cli.inputs, &cli.modes)?,
        output_dir: cli.output,
        ecosystem: cli.ecosystem,
        markers: cli.markers,
        fail_fast: !cli.keep_going,
    };

    let written = pipeline::run(&config).context("documentation generation failed")?;
    tracing::info!(files = written.len(), "done");
    Ok(())
}
