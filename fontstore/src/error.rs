use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No font with id '{0}'")]
    UnknownFont(String),
    #[error("No declared subset of '{font_id}' matches {requested:?}")]
    NoMatchingSubsets {
        font_id: String,
        requested: Vec<String>,
    },
    #[error("Font '{0}' has no resolvable variants")]
    NoVariants(String),
    #[error("No files of '{0}' match the requested filters")]
    NoMatchingFiles(String),
    #[error("Unable to read catalog '{path}': '{source}'")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to parse catalog '{path}': '{source}'")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Whether this error is part of the user-facing not-found taxonomy.
    ///
    /// Everything else is an internal failure and must not be presented as a
    /// missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::UnknownFont(..)
                | Error::NoMatchingSubsets { .. }
                | Error::NoVariants(..)
                | Error::NoMatchingFiles(..)
        )
    }
}
