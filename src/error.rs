use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, planning or writing documentation.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading an input file or writing an output file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A Doxygen XML file is not well-formed.
    #[error("malformed XML in {}: {source}", .path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },
    /// `--groups` or `--classes` needs a `%s` in the output template.
    #[error(
        "the output parameter must contain \"%s\" for group or class name substitution \
         when groups or classes are enabled (got \"{output}\")"
    )]
    MissingPlaceholder { output: String },
    /// A category-scoped output mode found no matching compounds.
    #[error("`{what}` output is enabled, but no {what} were located in the doxygen XML files")]
    NothingFound { what: &'static str },
    #[error("unknown format: {0}. Use markdown or json")]
    UnknownFormat(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type returned by the doxmark library.
pub type Result<T> = std::result::Result<T, Error>;
