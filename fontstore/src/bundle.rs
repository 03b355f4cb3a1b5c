//! Request-scoped resolution: subsets, bundles, variants, and file filters.
//!
//! A [`FontBundle`] is the single point establishing consistency between a
//! font and the subset view used by every downstream step of one request.
//! Nothing here is cached; two concurrent requests for the same selection
//! get independent bundles.

use indexmap::IndexMap;
use log::debug;

use crate::{
    catalog::Catalog,
    error::Error,
    paths,
    records::{FileEntry, FontRecord, VariantRecord},
};

/// Resolve the subset selection for one request.
///
/// `None` means "all subsets of the font". A non-empty request is intersected
/// with the font's declared subsets; blank tokens are ignored, everything
/// else is matched verbatim (so a padded token like `" latin "` matches
/// nothing). The result is sorted and deduplicated so identical selections
/// always compare (and join) identically.
pub fn resolve_subsets(font: &FontRecord, requested: Option<&[String]>) -> Result<Vec<String>, Error> {
    let mut subsets: Vec<String> = match requested {
        None => font.subsets.clone(),
        Some(requested) => requested
            .iter()
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty() && font.has_subset(s))
            .map(str::to_string)
            .collect(),
    };
    subsets.sort();
    subsets.dedup();
    if subsets.is_empty() {
        return Err(Error::NoMatchingSubsets {
            font_id: font.id.clone(),
            requested: requested.unwrap_or_default().to_vec(),
        });
    }
    Ok(subsets)
}

/// A font pinned to a resolved subset selection for the length of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct FontBundle<'c> {
    pub font: &'c FontRecord,
    /// Sorted, deduplicated, non-empty subset of the font's declared subsets.
    pub subsets: Vec<String>,
    /// Sorted join of the selection; stable across request orderings, so it
    /// is safe in filenames and cache keys.
    pub store_id: String,
}

impl Catalog {
    /// Assemble the bundle for a font id and an optional subset request.
    pub fn bundle<'c>(
        &'c self,
        id: &str,
        requested: Option<&[String]>,
    ) -> Result<FontBundle<'c>, Error> {
        let font = self
            .get(id)
            .ok_or_else(|| Error::UnknownFont(id.to_string()))?;
        let subsets = resolve_subsets(font, requested)?;
        let store_id = subsets.join("_");
        Ok(FontBundle {
            font,
            subsets,
            store_id,
        })
    }
}

impl FontBundle<'_> {
    pub fn is_selected(&self, subset: &str) -> bool {
        self.subsets.iter().any(|s| s == subset)
    }

    /// Every declared subset, in declaration order, flagged selected or not.
    pub fn subset_map(&self) -> IndexMap<String, bool> {
        self.font
            .subsets
            .iter()
            .map(|s| (s.clone(), self.is_selected(s)))
            .collect()
    }

    /// Resolve the variant records for this bundle.
    ///
    /// Locators embed the store id, so they point at files backing exactly
    /// this subset selection. Variants declaring no formats are dropped;
    /// zero resolvable variants is inconsistent backing data and surfaces
    /// as not-found.
    pub fn variants(&self, base_url: &str) -> Result<Vec<VariantRecord>, Error> {
        let mut records = Vec::with_capacity(self.font.variants.len());
        for decl in &self.font.variants {
            if decl.formats.is_empty() {
                debug!("'{}' variant '{}' declares no formats", self.font.id, decl.id);
                continue;
            }
            let mut urls = IndexMap::with_capacity(decl.formats.len());
            for format in &decl.formats {
                let file = paths::file_name(self, &decl.id, format);
                urls.insert(
                    format.clone(),
                    format!("{}/files/{}/{}", base_url, self.font.id, file),
                );
            }
            records.push(VariantRecord {
                id: decl.id.clone(),
                font_family: decl.font_family.clone(),
                font_style: decl.font_style.clone(),
                font_weight: decl.font_weight.clone(),
                urls,
            });
        }
        if records.is_empty() {
            return Err(Error::NoVariants(self.font.id.clone()));
        }
        Ok(records)
    }
}

/// The caller-side filter over resolved file entries.
///
/// An absent filter means "no filter"; a present-but-empty one matches
/// nothing. The two predicates are independent, so application order does
/// not matter.
pub fn filter_files(
    entries: Vec<FileEntry>,
    variants: Option<&[String]>,
    formats: Option<&[String]>,
) -> Vec<FileEntry> {
    entries
        .into_iter()
        .filter(|entry| {
            variants.map_or(true, |filter| filter.iter().any(|v| *v == entry.variant))
                && formats.map_or(true, |filter| filter.iter().any(|f| *f == entry.format))
        })
        .collect()
}
