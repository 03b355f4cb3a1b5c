//! The HTTP face of the font catalog: JSON listings, per-font detail, and
//! streamed zip downloads of the backing files.

pub mod api;
pub mod archive;
#[cfg(feature = "cli")]
mod args;
mod error;
pub mod query;
pub mod server;

#[cfg(test)]
pub(crate) mod testutil;

#[cfg(feature = "cli")]
pub use args::Args;
pub use error::Error;
pub use server::{HttpRequest, Server};
