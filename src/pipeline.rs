//! Directory walk → parallel page parsing → merge → render → write.
//!
//! Every input is parsed completely before anything is merged, and nothing is
//! written unless every input parsed without error.

use crate::error::{DocError, Result};
use crate::model::{Class, RenderableClass};
use crate::parser::merge::{merge, ParsedMode};
use crate::parser::{parse_page, Ecosystem, Page, SourceAdapter};
use crate::render::{create_renderer, output_name, Renderer};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// One input directory and the build configuration it documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub dir: PathBuf,
    pub mode: String,
}

/// Run configuration, built from command-line flags.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Primary first
    pub inputs: Vec<Input>,
    pub output_dir: PathBuf,
    pub ecosystem: Ecosystem,
    /// Sphinx page markers; empty selects the defaults
    pub markers: Vec<String>,
    /// Abort on the first failing page instead of reporting all of them
    pub fail_fast: bool,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=2).contains(&self.inputs.len()) {
            return Err(DocError::Config(format!(
                "expected one or two input directories, got {}",
                self.inputs.len()
            )));
        }
        if let Some(input) = self.inputs.iter().find(|i| i.mode.trim().is_empty()) {
            return Err(DocError::Config(format!(
                "empty mode label for {}",
                input.dir.display()
            )));
        }
        if let [a, b] = self.inputs.as_slice() {
            if a.mode == b.mode {
                return Err(DocError::Config(format!(
                    "both inputs use mode `{}`",
                    a.mode
                )));
            }
        }
        Ok(())
    }
}

/// Run the whole pipeline and return the written files.
pub fn run(config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    config.validate()?;
    let adapter = config.ecosystem.adapter(&config.markers);

    let mut parsed = Vec::new();
    let mut failed = 0;
    for input in &config.inputs {
        match parse_input(adapter.as_ref(), input, config.fail_fast) {
            Ok(mode) => parsed.push(mode),
            Err(DocError::PagesFailed { count }) => failed += count,
            Err(e) => return Err(e),
        }
    }
    if failed > 0 {
        return Err(DocError::PagesFailed { count: failed });
    }

    let mut parsed = parsed.into_iter();
    let (records, output_dir) = match (parsed.next(), parsed.next()) {
        (Some(primary), Some(secondary)) => {
            let merged = merge(&primary, &secondary);
            let dropped = secondary
                .classes
                .keys()
                .filter(|name| !primary.classes.contains_key(*name))
                .count();
            if dropped > 0 {
                warn!(
                    mode = %secondary.mode,
                    count = dropped,
                    "symbols missing from the primary mode are not rendered"
                );
            }
            (merged, config.output_dir.clone())
        }
        (Some(single), None) => {
            let dir = config.output_dir.join(&single.mode);
            (single.into_renderable(), dir)
        }
        _ => return Err(DocError::Config("no input directories".to_string())),
    };

    let renderer = create_renderer(config.ecosystem);
    write_all(&records, &output_dir, renderer.as_ref())
}

/// HTML pages under `dir` the adapter accepts, sorted.
pub fn discover(adapter: &dyn SourceAdapter, dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(DocError::Config(format!(
            "input directory not found: {}",
            dir.display()
        )));
    }

    let pattern = format!("{}/**/*.html", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| DocError::Config(format!("invalid input path {}: {}", dir.display(), e)))?
        .filter_map(|entry| match entry {
            Ok(path) => path.is_file().then_some(Ok(path)),
            // Unreadable directory below the input root
            Err(e) => {
                let path = e.path().to_path_buf();
                Some(Err(DocError::io(path, e.into_error())))
            }
        })
        .collect::<Result<_>>()?;
    // Sort for deterministic duplicate resolution
    files.sort();
    files.dedup();

    let (accepted, skipped): (Vec<_>, Vec<_>) = files.into_iter().partition(|p| adapter.accepts(p));
    for path in &skipped {
        debug!(page = %path.display(), "not an API page");
    }
    Ok(accepted)
}

fn parse_input(adapter: &dyn SourceAdapter, input: &Input, fail_fast: bool) -> Result<ParsedMode> {
    let pages = discover(adapter, &input.dir)?;
    info!(
        dir = %input.dir.display(),
        mode = %input.mode,
        pages = pages.len(),
        "parsing"
    );

    let parse = |path: &PathBuf| parse_file(adapter, path, &input.mode);
    let results = if fail_fast {
        pages.par_iter().map(parse).collect::<Result<Vec<_>>>()?
    } else {
        let outcomes: Vec<_> = pages.par_iter().map(parse).collect();
        let mut results = Vec::with_capacity(outcomes.len());
        let mut failed = 0;
        for outcome in outcomes {
            match outcome {
                Ok(parsed) => results.push(parsed),
                Err(e) => {
                    error!("{}", e);
                    failed += 1;
                }
            }
        }
        if failed > 0 {
            return Err(DocError::PagesFailed { count: failed });
        }
        results
    };

    let classes = collect_classes(results);
    info!(mode = %input.mode, symbols = classes.len(), "parsed");
    Ok(ParsedMode::new(input.mode.clone(), classes))
}

fn parse_file(adapter: &dyn SourceAdapter, path: &Path, mode: &str) -> Result<(PathBuf, Vec<Class>)> {
    let html = fs::read_to_string(path).map_err(|e| DocError::io(path, e))?;
    let page = Page::new(path, &html, mode);
    let classes = parse_page(adapter, &page)?;
    Ok((path.to_path_buf(), classes))
}

/// Fold per-page results into one map keyed by symbol name. Pages arrive in
/// path order; a later page declaring the same symbol replaces the earlier one.
fn collect_classes(pages: Vec<(PathBuf, Vec<Class>)>) -> BTreeMap<String, Class> {
    let mut classes = BTreeMap::new();
    for (path, parsed) in pages {
        if parsed.is_empty() {
            debug!(page = %path.display(), "page declares no symbols");
        }
        for class in parsed {
            if class.is_empty() {
                warn!(symbol = %class.name, page = %path.display(), "skipping empty symbol");
                continue;
            }
            if classes.insert(class.name.clone(), class).is_some() {
                warn!(page = %path.display(), "duplicate symbol, keeping the later page");
            }
        }
    }
    classes
}

fn write_all(
    records: &BTreeMap<String, RenderableClass>,
    dir: &Path,
    renderer: &dyn Renderer,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| DocError::io(dir, e))?;
    records
        .values()
        .map(|record| {
            let path = dir.join(output_name(record, renderer));
            fs::write(&path, renderer.render(record)).map_err(|e| DocError::io(&path, e))?;
            info!(file = %path.display(), "wrote");
            Ok(path)
        })
        .collect()
}
