//! The read-only store of font records.

use std::{collections::HashMap, fs, path::Path};

use log::warn;

use crate::{error::Error, records::FontRecord};

/// All font records, ordered by (popularity, id), keyed by id.
///
/// Built once during startup and handed to request handlers; there is no
/// mutation API.
#[derive(Debug, Clone)]
pub struct Catalog {
    fonts: Vec<FontRecord>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(mut fonts: Vec<FontRecord>) -> Catalog {
        fonts.sort_by(|a, b| (a.popularity, &a.id).cmp(&(b.popularity, &b.id)));
        let mut by_id = HashMap::with_capacity(fonts.len());
        let mut keep = Vec::with_capacity(fonts.len());
        for font in fonts {
            if by_id.contains_key(&font.id) {
                warn!("Duplicate font id '{}', keeping the first record", font.id);
                continue;
            }
            by_id.insert(font.id.clone(), keep.len());
            keep.push(font);
        }
        Catalog {
            fonts: keep,
            by_id,
        }
    }

    /// Load a catalog from a JSON array of font records.
    pub fn from_file(path: &Path) -> Result<Catalog, Error> {
        let raw = fs::read_to_string(path).map_err(|source| Error::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let fonts = serde_json::from_str(&raw).map_err(|source| Error::CatalogParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Catalog::new(fonts))
    }

    /// All records in stable listing order.
    pub fn iter(&self) -> impl Iterator<Item = &FontRecord> {
        self.fonts.iter()
    }

    pub fn get(&self, id: &str) -> Option<&FontRecord> {
        self.by_id.get(id).map(|ix| &self.fonts[*ix])
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
