use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] fontstore::Error),
    #[error("io failed for '{path}': '{source}'")]
    ArchiveRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write to the archive sink: '{0}'")]
    ArchiveWrite(#[source] io::Error),
    #[error("'{0}' is too large for a 32-bit zip entry")]
    EntryTooLarge(PathBuf),
    #[error("member name of {0} bytes exceeds the 16-bit zip name length")]
    MemberNameTooLong(usize),
    #[error("archive exceeds the 32-bit zip offset limit")]
    ArchiveTooLarge,
    #[error(transparent)]
    JsonSerError(#[from] serde_json::Error),
    #[error("Unable to bind {addr}: '{source}'")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Whether this surfaces to the client as a plain 404 rather than a 500.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store(e) if e.is_not_found())
    }
}
