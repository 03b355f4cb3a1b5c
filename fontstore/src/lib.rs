//! Font metadata records and the resolution pipeline behind the fonts API.
//!
//! The [`catalog::Catalog`] is built once at startup and read-only thereafter.
//! Everything else is derived per request: a [`bundle::FontBundle`] pins a
//! font to a resolved subset selection, variants and file paths are resolved
//! from the bundle, and nothing is cached across requests.

pub mod bundle;
pub mod catalog;
pub mod error;
pub mod paths;
pub mod records;

pub use bundle::{filter_files, resolve_subsets, FontBundle};
pub use catalog::Catalog;
pub use error::Error;
pub use paths::Paths;
pub use records::{FileEntry, FontRecord, VariantDecl, VariantRecord};
