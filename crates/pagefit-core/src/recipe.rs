//! Recipe export.
//!
//! A recipe is the versioned, renderer-facing description of every page's
//! transforms plus the print order options. Building one is a read-only,
//! deterministic projection of the page store: two exports with the same
//! timestamp and no edit in between serialize to identical bytes.
//!
//! Writing the recipe somewhere and invoking the renderer are left to the
//! caller; nothing in this module does I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::constants::{GEOMETRY_EPSILON, MAX_SCALE, MIN_SCALE, RECIPE_VERSION};
use crate::model::{PageDimensions, PageMetadata, PageTransforms};
use crate::settings::{PrintSettings, SourceInfo};
use crate::store::PageStore;

/// Error types for recipe parsing and validation.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// The recipe is not valid JSON or does not match the schema.
    #[error("Invalid recipe JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The recipe was written by an incompatible version.
    #[error("Unsupported recipe version: {0}")]
    UnsupportedVersion(String),

    /// A page entry violates a transform invariant.
    #[error("Invalid page {page}: {reason}")]
    InvalidPage { page: u32, reason: String },

    /// More page entries than the source document has pages.
    #[error("Recipe lists {pages} pages but the source has {total}")]
    PageCountMismatch { pages: usize, total: u32 },
}

pub type Result<T> = std::result::Result<T, RecipeError>;

/// One page entry of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePage {
    pub page_number: u32,
    pub original_dimensions: PageDimensions,
    pub transforms: PageTransforms,
    pub has_edits: bool,
    pub is_cropped: bool,
    pub fit_crop_to_page: bool,
}

impl From<PageMetadata> for RecipePage {
    fn from(meta: PageMetadata) -> Self {
        Self {
            page_number: meta.page_number,
            original_dimensions: meta.original_dimensions,
            transforms: meta.transforms,
            has_edits: meta.edited,
            is_cropped: meta.is_cropped,
            fit_crop_to_page: meta.fit_crop_to_page,
        }
    }
}

impl RecipePage {
    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| RecipeError::InvalidPage {
            page: self.page_number,
            reason: reason.to_string(),
        };

        if !self.original_dimensions.is_valid() {
            return Err(invalid("dimensions must be finite and positive"));
        }
        let t = &self.transforms;
        if !(MIN_SCALE..=MAX_SCALE).contains(&t.scale) {
            return Err(invalid("scale out of range"));
        }
        if !t.offset_x.is_finite() || !t.offset_y.is_finite() {
            return Err(invalid("offset is not finite"));
        }
        if let Some(crop) = t.crop {
            if !crop.is_within_unit_square(GEOMETRY_EPSILON) {
                return Err(invalid("crop outside the unit square"));
            }
        }
        if self.is_cropped != t.crop.is_some() {
            return Err(invalid("isCropped does not match crop"));
        }
        if self.has_edits == t.is_identity() {
            return Err(invalid("hasEdits does not match transforms"));
        }
        Ok(())
    }
}

/// Versioned document handed to the external renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub source: SourceInfo,
    pub print: PrintSettings,
    /// Ascending by page number
    pub pages: Vec<RecipePage>,
}

impl Recipe {
    /// Project the store into a recipe. The source page count is raised to
    /// cover every registered page.
    pub fn export(
        store: &PageStore,
        source: &SourceInfo,
        print: &PrintSettings,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let pages: Vec<RecipePage> = store.snapshot().into_iter().map(RecipePage::from).collect();
        let edited = pages.iter().filter(|page| page.has_edits).count();
        info!(pages = pages.len(), edited, "exported recipe");

        let mut source = source.clone();
        source.total_pages = source.total_pages.max(pages.len() as u32);

        Self {
            version: RECIPE_VERSION.to_string(),
            generated_at,
            source,
            print: print.normalized(),
            pages,
        }
    }

    /// Check the structural invariants the renderer relies on.
    pub fn validate(&self) -> Result<()> {
        if self.version != RECIPE_VERSION {
            return Err(RecipeError::UnsupportedVersion(self.version.clone()));
        }
        if self.source.total_pages > 0 && self.pages.len() > self.source.total_pages as usize {
            return Err(RecipeError::PageCountMismatch {
                pages: self.pages.len(),
                total: self.source.total_pages,
            });
        }

        let mut previous = None;
        for page in &self.pages {
            if previous.is_some_and(|prev| page.page_number <= prev) {
                return Err(RecipeError::InvalidPage {
                    page: page.page_number,
                    reason: "pages must be unique and ascending".to_string(),
                });
            }
            page.validate()?;
            previous = Some(page.page_number);
        }
        Ok(())
    }

    /// Number of pages with edits.
    pub fn edited_page_count(&self) -> usize {
        self.pages.iter().filter(|page| page.has_edits).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a recipe.
    pub fn from_json(json: &str) -> Result<Self> {
        let recipe: Recipe = serde_json::from_str(json)?;
        recipe.validate()?;
        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CropBox, Rotation};
    use crate::settings::PagesPerSheet;

    fn timestamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample_store() -> PageStore {
        let mut store = PageStore::new();
        store.init_page(2, PageDimensions::new(612.0, 792.0));
        store.init_page(1, PageDimensions::new(612.0, 792.0));
        store.set_crop(2, CropBox::new(0.1, 0.1, 0.8, 0.8));
        store.set_rotation(2, Rotation::Deg90);
        store
    }

    fn sample_recipe() -> Recipe {
        Recipe::export(
            &sample_store(),
            &SourceInfo::new("menu.pdf", 4096, 2),
            &PrintSettings::default(),
            timestamp(),
        )
    }

    #[test]
    fn test_export_projects_store() {
        let recipe = sample_recipe();

        assert_eq!(recipe.version, RECIPE_VERSION);
        assert_eq!(recipe.pages.len(), 2);
        assert_eq!(recipe.pages[0].page_number, 1);
        assert!(!recipe.pages[0].has_edits);
        assert!(recipe.pages[1].has_edits);
        assert!(recipe.pages[1].is_cropped);
        assert_eq!(recipe.pages[1].transforms.rotation, Rotation::Deg90);
        assert_eq!(recipe.edited_page_count(), 1);
    }

    #[test]
    fn test_export_is_deterministic() {
        let store = sample_store();
        let source = SourceInfo::new("menu.pdf", 4096, 2);
        let print = PrintSettings::default();

        let first = Recipe::export(&store, &source, &print, timestamp()).to_json().unwrap();
        let second = Recipe::export(&store, &source, &print, timestamp()).to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_export_normalizes_copies() {
        let print = PrintSettings {
            copies: 0,
            pages_per_sheet: PagesPerSheet::Two,
            ..Default::default()
        };
        let recipe = Recipe::export(&sample_store(), &SourceInfo::default(), &print, timestamp());
        assert_eq!(recipe.print.copies, 1);
        assert_eq!(recipe.print.pages_per_sheet, PagesPerSheet::Two);
    }

    #[test]
    fn test_json_field_names() {
        let json = sample_recipe().to_json().unwrap();

        assert!(json.contains(r#""version":"1.0""#));
        assert!(json.contains(r#""generatedAt":"2024-05-01T12:00:00Z""#));
        assert!(json.contains(r#""fileName":"menu.pdf""#));
        assert!(json.contains(r#""pagesPerSheet":1"#));
        assert!(json.contains(r#""paperSize":"A4""#));
        assert!(json.contains(r#""colorMode":"color""#));
        assert!(json.contains(r#""originalDimensions":{"width":612.0,"height":792.0}"#));
        assert!(json.contains(r#""hasEdits":true"#));
        assert!(json.contains(r#""fitCropToPage":false"#));
        assert!(json.contains(r#""rotation":90"#));
    }

    #[test]
    fn test_from_json_accepts_exported_recipe() {
        let recipe = sample_recipe();
        let parsed = Recipe::from_json(&recipe.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, recipe);
    }

    #[test]
    fn test_validate_rejects_unknown_version() {
        let mut recipe = sample_recipe();
        recipe.version = "0.9".to_string();
        assert!(matches!(
            recipe.validate(),
            Err(RecipeError::UnsupportedVersion(v)) if v == "0.9"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_scale() {
        let mut recipe = sample_recipe();
        recipe.pages[1].transforms.scale = 900.0;
        let err = recipe.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid page 2: scale out of range");
    }

    #[test]
    fn test_validate_rejects_inconsistent_flags() {
        let mut recipe = sample_recipe();
        recipe.pages[0].has_edits = true;
        assert!(matches!(
            recipe.validate(),
            Err(RecipeError::InvalidPage { page: 1, .. })
        ));

        let mut recipe = sample_recipe();
        recipe.pages[1].is_cropped = false;
        assert!(recipe.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unordered_pages() {
        let mut recipe = sample_recipe();
        recipe.pages.swap(0, 1);
        assert!(recipe.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_too_many_pages() {
        let mut recipe = sample_recipe();
        recipe.source.total_pages = 1;
        assert!(matches!(
            recipe.validate(),
            Err(RecipeError::PageCountMismatch { pages: 2, total: 1 })
        ));
    }

    #[test]
    fn test_export_covers_pages_beyond_declared_total() {
        let mut store = sample_store();
        store.init_page(3, PageDimensions::new(612.0, 792.0));

        let recipe = Recipe::export(
            &store,
            &SourceInfo::new("menu.pdf", 4096, 1),
            &PrintSettings::default(),
            timestamp(),
        );
        assert_eq!(recipe.source.total_pages, 3);

        let parsed = Recipe::from_json(&recipe.to_json().unwrap()).unwrap();
        assert_eq!(parsed.pages.len(), 3);
    }

    #[test]
    fn test_export_with_extreme_offsets_parses_back() {
        let mut store = sample_store();
        store.add_offset(1, f64::MAX, 0.0);
        store.add_offset(1, f64::MAX, 0.0);

        let recipe = Recipe::export(
            &store,
            &SourceInfo::default(),
            &PrintSettings::default(),
            timestamp(),
        );
        assert!(Recipe::from_json(&recipe.to_json().unwrap()).is_ok());
    }

    #[test]
    fn test_validate_rejects_invalid_dimensions() {
        let mut recipe = sample_recipe();
        recipe.pages[0].original_dimensions = PageDimensions::new(0.0, 792.0);
        let err = recipe.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid page 1: dimensions must be finite and positive"
        );
    }

    #[test]
    fn test_from_json_rejects_bad_rotation() {
        let json = sample_recipe()
            .to_json()
            .unwrap()
            .replace(r#""rotation":90"#, r#""rotation":45"#);
        assert!(matches!(Recipe::from_json(&json), Err(RecipeError::Json(_))));
    }
}
