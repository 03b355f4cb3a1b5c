//! Where do the font files for a bundle live on disk?

use std::path::{Path, PathBuf};

use log::debug;

use crate::{
    bundle::FontBundle,
    records::{FileEntry, VariantRecord},
};

/// The on-disk file name for one (bundle, variant, format) combination,
/// e.g. `roboto-v30-latin-regular.woff2`.
pub fn file_name(bundle: &FontBundle, variant: &str, format: &str) -> String {
    format!(
        "{}-{}-{}-{}.{}",
        bundle.font.id, bundle.font.version, bundle.store_id, variant, format
    )
}

#[derive(Debug, Clone)]
pub struct Paths {
    font_dir: PathBuf,
}

impl Paths {
    pub fn new(font_dir: &Path) -> Paths {
        Paths {
            font_dir: font_dir.to_path_buf(),
        }
    }

    pub fn font_dir(&self) -> &Path {
        &self.font_dir
    }

    pub fn font_file(&self, bundle: &FontBundle, variant: &str, format: &str) -> PathBuf {
        self.font_dir
            .join(&bundle.font.id)
            .join(file_name(bundle, variant, format))
    }

    /// Resolve the concrete file for every (variant, format) pair.
    ///
    /// No variant/format filtering happens here; that is the caller's
    /// filter step. Entries whose file does not exist at resolution time
    /// are never returned.
    pub fn file_entries(&self, bundle: &FontBundle, variants: &[VariantRecord]) -> Vec<FileEntry> {
        let mut entries = Vec::new();
        for variant in variants {
            for format in variant.urls.keys() {
                let path = self.font_file(bundle, &variant.id, format);
                if !path.is_file() {
                    debug!("No file backing '{}' '{}': {:?}", variant.id, format, path);
                    continue;
                }
                entries.push(FileEntry {
                    variant: variant.id.clone(),
                    format: format.clone(),
                    path,
                });
            }
        }
        entries
    }
}
