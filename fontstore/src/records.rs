//! The record types the catalog is made of.

use std::path::PathBuf;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Everything the catalog knows about one font family.
///
/// Loaded once at startup and immutable thereafter; owned by
/// [`crate::Catalog`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FontRecord {
    pub id: String,
    pub family: String,
    pub category: String,
    pub version: String,
    /// e.g. 2022-09-22
    pub last_modified: NaiveDate,
    /// Rank; 1 is the most popular font in the catalog.
    pub popularity: u32,
    pub subsets: Vec<String>,
    pub def_subset: String,
    pub def_variant: String,
    /// Declaration order is the variant identifier order.
    pub variants: Vec<VariantDecl>,
}

impl FontRecord {
    pub fn variant_ids(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.id.as_str())
    }

    pub fn has_subset(&self, subset: &str) -> bool {
        self.subsets.iter().any(|s| s == subset)
    }
}

/// A declared style/weight rendering of a font family, e.g. "700italic".
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariantDecl {
    pub id: String,
    pub font_family: Option<String>,
    pub font_style: Option<String>,
    pub font_weight: Option<String>,
    /// File encodings backing this variant, e.g. ["woff2", "ttf"].
    pub formats: Vec<String>,
}

/// A variant resolved against one request's subset selection.
///
/// Unlike [`VariantDecl`] this carries concrete locators; the URLs embed the
/// bundle's store id, so two selections yield distinct records.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub id: String,
    pub font_family: Option<String>,
    pub font_style: Option<String>,
    pub font_weight: Option<String>,
    /// format -> locator, in declared format order.
    pub urls: IndexMap<String, String>,
}

/// One concrete file backing a (variant, format) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub variant: String,
    pub format: String,
    pub path: PathBuf,
}

#[cfg(test)]
pub(crate) mod testdata {
    use super::*;
    use crate::catalog::Catalog;

    fn variant(id: &str, weight: &str, style: &str, formats: &[&str]) -> VariantDecl {
        VariantDecl {
            id: id.to_string(),
            font_family: Some("'Roboto'".to_string()),
            font_style: Some(style.to_string()),
            font_weight: Some(weight.to_string()),
            formats: formats.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub(crate) fn roboto() -> FontRecord {
        FontRecord {
            id: "roboto".to_string(),
            family: "Roboto".to_string(),
            category: "sans-serif".to_string(),
            version: "v30".to_string(),
            last_modified: NaiveDate::from_ymd_opt(2022, 9, 22).unwrap(),
            popularity: 1,
            subsets: ["latin", "latin-ext", "cyrillic"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            def_subset: "latin".to_string(),
            def_variant: "regular".to_string(),
            variants: vec![
                variant("regular", "400", "normal", &["woff2", "woff", "ttf"]),
                variant("italic", "400", "italic", &["woff2", "ttf"]),
                variant("700", "700", "normal", &["woff2", "ttf"]),
            ],
        }
    }

    pub(crate) fn open_sans() -> FontRecord {
        let mut font = roboto();
        font.id = "open-sans".to_string();
        font.family = "Open Sans".to_string();
        font.popularity = 2;
        font
    }

    /// A font with declared subsets but no variants at all; inconsistent
    /// backing data that must surface as not-found, not a crash.
    pub(crate) fn lonely() -> FontRecord {
        let mut font = roboto();
        font.id = "lonely".to_string();
        font.family = "Lonely".to_string();
        font.popularity = 3;
        font.subsets = vec!["latin".to_string()];
        font.variants = Vec::new();
        font
    }

    pub(crate) fn catalog() -> Catalog {
        Catalog::new(vec![lonely(), open_sans(), roboto()])
    }
}
