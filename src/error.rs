//! Failure taxonomy for the extraction pipeline.
//!
//! Every variant is fatal for the page or run it occurs in: the pipeline never
//! downgrades these to warnings.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocError {
    /// An element the adapter relies on is absent; the generator's HTML shape changed.
    #[error("{page}: expected element not found: `{selector}`")]
    StructuralMismatch { page: String, selector: String },

    /// Prose documents a parameter the rendered signature does not declare.
    #[error("{page}: method `{method}` documents parameter `{param}` missing from its signature")]
    SignatureConsistency {
        page: String,
        method: String,
        param: String,
    },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Summary raised after a keep-going run recorded per-page failures.
    #[error("{count} page(s) failed to parse")]
    PagesFailed { count: usize },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DocError {
    pub fn structural(page: &str, selector: &str) -> Self {
        DocError::StructuralMismatch {
            page: page.to_string(),
            selector: selector.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DocError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = DocError> = std::result::Result<T, E>;
