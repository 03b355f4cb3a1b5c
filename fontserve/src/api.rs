//! The JSON shapes the API hands out.
//!
//! Per-format URLs are flattened into the variant object (`"woff2": "..."`)
//! by constructing an explicit format→URL map and letting serde flatten it,
//! rather than building fields dynamically.

use chrono::NaiveDate;
use fontstore::{Catalog, FontBundle, FontRecord, VariantRecord};
use indexmap::IndexMap;
use serde::Serialize;

/// One element of `GET /api/fonts`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiListFont {
    pub id: String,
    pub family: String,
    pub variants: Vec<String>,
    pub subsets: Vec<String>,
    pub category: String,
    pub version: String,
    pub last_modified: NaiveDate,
    pub popularity: u32,
    pub def_subset: String,
    pub def_variant: String,
}

impl From<&FontRecord> for ApiListFont {
    fn from(font: &FontRecord) -> ApiListFont {
        ApiListFont {
            id: font.id.clone(),
            family: font.family.clone(),
            variants: font.variant_ids().map(str::to_string).collect(),
            subsets: font.subsets.clone(),
            category: font.category.clone(),
            version: font.version.clone(),
            last_modified: font.last_modified,
            popularity: font.popularity,
            def_subset: font.def_subset.clone(),
            def_variant: font.def_variant.clone(),
        }
    }
}

pub fn list_fonts(catalog: &Catalog) -> Vec<ApiListFont> {
    catalog.iter().map(ApiListFont::from).collect()
}

/// The body of `GET /api/fonts/:id` (the JSON path).
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiFont {
    pub id: String,
    pub family: String,
    pub subsets: Vec<String>,
    pub category: String,
    pub version: String,
    pub last_modified: NaiveDate,
    pub popularity: u32,
    pub def_subset: String,
    pub def_variant: String,
    pub subset_map: IndexMap<String, bool>,
    #[serde(rename = "storeID")]
    pub store_id: String,
    pub variants: Vec<ApiVariant>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiVariant {
    pub id: String,
    pub font_family: Option<String>,
    pub font_style: Option<String>,
    pub font_weight: Option<String>,
    /// format -> URL, flattened into the variant object.
    #[serde(flatten)]
    pub urls: IndexMap<String, String>,
}

impl From<VariantRecord> for ApiVariant {
    fn from(variant: VariantRecord) -> ApiVariant {
        ApiVariant {
            id: variant.id,
            font_family: variant.font_family,
            font_style: variant.font_style,
            font_weight: variant.font_weight,
            urls: variant.urls,
        }
    }
}

pub fn font_detail(bundle: &FontBundle, variants: Vec<VariantRecord>) -> ApiFont {
    let font = bundle.font;
    ApiFont {
        id: font.id.clone(),
        family: font.family.clone(),
        subsets: font.subsets.clone(),
        category: font.category.clone(),
        version: font.version.clone(),
        last_modified: font.last_modified,
        popularity: font.popularity,
        def_subset: font.def_subset.clone(),
        def_variant: font.def_variant.clone(),
        subset_map: bundle.subset_map(),
        store_id: bundle.store_id.clone(),
        variants: variants.into_iter().map(ApiVariant::from).collect(),
    }
}
