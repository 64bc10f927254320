//! Page metadata store.
//!
//! The store is the single owner of every page's edit state for one open
//! document. Callers never hold a reference into it: getters hand out owned
//! copies and every mutation goes through a setter.
//!
//! # Failure Semantics
//!
//! UI events can race page registration, so every operation on an unknown
//! page number is a silent no-op. Out-of-range values are clamped rather than
//! rejected.

use std::collections::BTreeMap;

use tracing::debug;

use crate::constants::{MAX_SCALE, MIN_CROP_FRACTION, MIN_SCALE};
use crate::geometry::clamp_box;
use crate::model::{CropBox, PageDimensions, PageMetadata, PageTransforms, Rotation};

/// Source of page sizes and bitmaps for a loaded document.
///
/// The engine only reads page counts and dimensions; rendering is left to
/// the caller.
pub trait PageRasterizer {
    type Bitmap;
    type Error;

    /// Number of pages in the document. Pages are numbered from 1.
    fn page_count(&self) -> u32;

    /// Page size in page-content units, or `None` if the page does not exist.
    fn page_dimensions(&self, page_number: u32) -> Option<PageDimensions>;

    /// Render a page at `scale` (1.0 = natural size).
    fn render_page(&self, page_number: u32, scale: f64) -> Result<Self::Bitmap, Self::Error>;
}

/// Per-document page edit state.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: BTreeMap<u32, PageMetadata>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page. Unknown pages get identity transforms; known pages only
    /// have their dimensions updated. Non-finite or non-positive dimensions are
    /// ignored.
    pub fn init_page(&mut self, page_number: u32, dimensions: PageDimensions) {
        if !dimensions.is_valid() {
            debug!(page = page_number, ?dimensions, "ignoring invalid page dimensions");
            return;
        }
        self.pages
            .entry(page_number)
            .and_modify(|meta| meta.original_dimensions = dimensions)
            .or_insert_with(|| PageMetadata::new(page_number, dimensions));
    }

    /// Register every page the rasterizer reports. Returns the number of pages
    /// registered.
    pub fn register_pages<R: PageRasterizer>(&mut self, rasterizer: &R) -> u32 {
        let mut registered = 0;
        for page_number in 1..=rasterizer.page_count() {
            if let Some(dimensions) = rasterizer.page_dimensions(page_number) {
                self.init_page(page_number, dimensions);
                registered += 1;
            }
        }
        registered
    }

    /// Copy of the page's metadata.
    pub fn get(&self, page_number: u32) -> Option<PageMetadata> {
        self.pages.get(&page_number).cloned()
    }

    /// Copy of the page's transforms, or identity for an unknown page.
    pub fn transforms(&self, page_number: u32) -> PageTransforms {
        self.pages
            .get(&page_number)
            .map(|meta| meta.transforms.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, page_number: u32) -> bool {
        self.pages.contains_key(&page_number)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Known page numbers in ascending order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    /// Whether any transform axis of the page differs from identity.
    pub fn is_edited(&self, page_number: u32) -> bool {
        self.pages
            .get(&page_number)
            .is_some_and(|meta| meta.edited)
    }

    /// Page numbers with edits, ascending.
    pub fn edited_pages(&self) -> Vec<u32> {
        self.pages
            .values()
            .filter(|meta| meta.edited)
            .map(|meta| meta.page_number)
            .collect()
    }

    /// Copies of every record, ascending by page number.
    pub fn snapshot(&self) -> Vec<PageMetadata> {
        self.pages.values().cloned().collect()
    }

    /// Apply `mutate` to a known page and refresh its derived flags.
    fn update(
        &mut self,
        page_number: u32,
        op: &'static str,
        mutate: impl FnOnce(&mut PageMetadata),
    ) {
        match self.pages.get_mut(&page_number) {
            Some(meta) => {
                mutate(meta);
                meta.refresh_flags();
            }
            None => debug!(page = page_number, op, "ignoring edit for unknown page"),
        }
    }

    // =========================================================================
    // Crop
    // =========================================================================

    /// Commit an absolute crop. The box is clamped into the unit square with a
    /// minimum edge of [`MIN_CROP_FRACTION`].
    pub fn set_crop(&mut self, page_number: u32, crop: CropBox) {
        let clamped = clamp_box(crop, MIN_CROP_FRACTION);
        if clamped != crop {
            debug!(page = page_number, ?crop, ?clamped, "crop clamped");
        }
        self.update(page_number, "set_crop", |meta| {
            meta.transforms.crop = Some(clamped);
        });
    }

    pub fn clear_crop(&mut self, page_number: u32) {
        self.update(page_number, "clear_crop", |meta| {
            meta.transforms.crop = None;
        });
    }

    pub fn set_fit_crop_to_page(&mut self, page_number: u32, fit: bool) {
        self.update(page_number, "set_fit_crop_to_page", |meta| {
            meta.fit_crop_to_page = fit;
        });
    }

    // =========================================================================
    // Rotation
    // =========================================================================

    pub fn set_rotation(&mut self, page_number: u32, rotation: Rotation) {
        self.update(page_number, "set_rotation", |meta| {
            meta.transforms.rotation = rotation;
        });
    }

    /// Rotate relative to the current rotation.
    pub fn add_rotation(&mut self, page_number: u32, delta_degrees: i32) {
        self.update(page_number, "add_rotation", |meta| {
            meta.transforms.rotation = meta.transforms.rotation.rotated_by(delta_degrees);
        });
    }

    // =========================================================================
    // Scale & Offset
    // =========================================================================

    /// Set the user scale, clamped to `[MIN_SCALE, MAX_SCALE]`. A non-finite
    /// value leaves the scale unchanged.
    pub fn set_scale(&mut self, page_number: u32, percent: f64) {
        if !percent.is_finite() {
            debug!(page = page_number, percent, "ignoring non-finite scale");
            return;
        }
        self.update(page_number, "set_scale", |meta| {
            meta.transforms.scale = percent.clamp(MIN_SCALE, MAX_SCALE);
        });
    }

    /// Set the translation. Non-finite components are ignored.
    pub fn set_offset(&mut self, page_number: u32, x: f64, y: f64) {
        self.update(page_number, "set_offset", |meta| {
            if x.is_finite() {
                meta.transforms.offset_x = x;
            }
            if y.is_finite() {
                meta.transforms.offset_y = y;
            }
        });
    }

    /// Translate relative to the current offset. A component whose delta or
    /// resulting offset is not finite is ignored.
    pub fn add_offset(&mut self, page_number: u32, dx: f64, dy: f64) {
        self.update(page_number, "add_offset", |meta| {
            let x = meta.transforms.offset_x + dx;
            if x.is_finite() {
                meta.transforms.offset_x = x;
            }
            let y = meta.transforms.offset_y + dy;
            if y.is_finite() {
                meta.transforms.offset_y = y;
            }
        });
    }

    // =========================================================================
    // Reset & Batch
    // =========================================================================

    /// Restore identity transforms, keeping the page's dimensions.
    pub fn reset_page(&mut self, page_number: u32) {
        self.update(page_number, "reset_page", |meta| {
            meta.transforms = PageTransforms::default();
            meta.fit_crop_to_page = false;
        });
    }

    pub fn reset_all(&mut self) {
        for meta in self.pages.values_mut() {
            meta.transforms = PageTransforms::default();
            meta.fit_crop_to_page = false;
            meta.refresh_flags();
        }
    }

    /// Copy one page's transform state onto another page.
    pub fn clone_transforms(&mut self, from: u32, to: u32) {
        let Some(source) = self.pages.get(&from) else {
            debug!(page = from, "ignoring clone from unknown page");
            return;
        };
        let transforms = source.transforms.clone();
        let fit = source.fit_crop_to_page;

        self.update(to, "clone_transforms", |meta| {
            meta.transforms = transforms;
            meta.fit_crop_to_page = fit;
        });
    }

    /// Copy the source page's transform state onto every other known page.
    pub fn apply_to_all(&mut self, source_page: u32) {
        let Some(source) = self.pages.get(&source_page) else {
            debug!(page = source_page, "ignoring apply-to-all from unknown page");
            return;
        };
        let transforms = source.transforms.clone();
        let fit = source.fit_crop_to_page;

        for meta in self.pages.values_mut() {
            if meta.page_number != source_page {
                meta.transforms = transforms.clone();
                meta.fit_crop_to_page = fit;
                meta.refresh_flags();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_SCALE;

    fn letter() -> PageDimensions {
        PageDimensions::new(612.0, 792.0)
    }

    fn store_with_pages(count: u32) -> PageStore {
        let mut store = PageStore::new();
        for page in 1..=count {
            store.init_page(page, letter());
        }
        store
    }

    #[test]
    fn test_init_page_creates_identity_record() {
        let store = store_with_pages(1);
        let meta = store.get(1).unwrap();

        assert_eq!(meta.page_number, 1);
        assert_eq!(meta.original_dimensions, letter());
        assert!(meta.transforms.is_identity());
        assert!(!meta.edited);
        assert!(!meta.is_cropped);
        assert!(!meta.fit_crop_to_page);
    }

    #[test]
    fn test_init_page_is_idempotent_and_keeps_edits() {
        let mut store = store_with_pages(1);
        store.set_scale(1, 150.0);
        store.init_page(1, PageDimensions::new(100.0, 100.0));

        let meta = store.get(1).unwrap();
        assert_eq!(meta.original_dimensions, PageDimensions::new(100.0, 100.0));
        assert_eq!(meta.transforms.scale, 150.0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_init_page_ignores_invalid_dimensions() {
        let mut store = PageStore::new();
        store.init_page(1, PageDimensions::new(f64::NAN, 100.0));
        store.init_page(2, PageDimensions::new(-10.0, 100.0));
        assert!(store.is_empty());

        store.init_page(3, letter());
        store.init_page(3, PageDimensions::new(0.0, 0.0));
        assert_eq!(store.get(3).unwrap().original_dimensions, letter());
    }

    #[test]
    fn test_getters_return_copies() {
        let mut store = store_with_pages(1);
        let mut transforms = store.transforms(1);
        transforms.scale = 300.0;
        let mut meta = store.get(1).unwrap();
        meta.transforms.rotation = Rotation::Deg90;

        assert_eq!(store.transforms(1).scale, 100.0);
        assert_eq!(store.transforms(1).rotation, Rotation::Deg0);
    }

    #[test]
    fn test_unknown_page_is_noop() {
        let mut store = store_with_pages(1);
        store.set_crop(9, CropBox::new(0.1, 0.1, 0.5, 0.5));
        store.set_scale(9, 200.0);
        store.add_rotation(9, 90);
        store.add_offset(9, 1.0, 1.0);
        store.reset_page(9);
        store.clone_transforms(9, 1);
        store.clone_transforms(1, 9);
        store.apply_to_all(9);

        assert!(store.get(9).is_none());
        assert!(store.transforms(9).is_identity());
        assert!(!store.is_edited(1));
    }

    #[test]
    fn test_set_crop_clamps_and_marks_cropped() {
        let mut store = store_with_pages(1);
        store.set_crop(1, CropBox::new(-0.2, 0.5, 0.01, 0.9));

        let meta = store.get(1).unwrap();
        let crop = meta.transforms.crop.unwrap();
        assert_eq!(crop.x, 0.0);
        assert_eq!(crop.width, MIN_CROP_FRACTION);
        assert!((crop.height - 0.5).abs() < 1e-12);
        assert!(meta.is_cropped);
        assert!(meta.edited);
    }

    #[test]
    fn test_clear_crop_recomputes_edited() {
        let mut store = store_with_pages(1);
        store.set_crop(1, CropBox::new(0.1, 0.1, 0.5, 0.5));
        store.clear_crop(1);
        assert!(!store.is_edited(1));
        assert!(!store.get(1).unwrap().is_cropped);

        store.set_rotation(1, Rotation::Deg180);
        store.set_crop(1, CropBox::new(0.1, 0.1, 0.5, 0.5));
        store.clear_crop(1);
        assert!(store.is_edited(1));
    }

    #[test]
    fn test_add_rotation_wraps() {
        let mut store = store_with_pages(1);
        store.set_rotation(1, Rotation::Deg270);
        store.add_rotation(1, 90);
        assert_eq!(store.transforms(1).rotation, Rotation::Deg0);

        store.add_rotation(1, -90);
        assert_eq!(store.transforms(1).rotation, Rotation::Deg270);
    }

    #[test]
    fn test_set_scale_clamps() {
        let mut store = store_with_pages(1);
        store.set_scale(1, 5.0);
        assert_eq!(store.transforms(1).scale, MIN_SCALE);
        store.set_scale(1, 9000.0);
        assert_eq!(store.transforms(1).scale, MAX_SCALE);
        store.set_scale(1, f64::NAN);
        assert_eq!(store.transforms(1).scale, MAX_SCALE);
    }

    #[test]
    fn test_scale_back_to_identity_clears_edited() {
        let mut store = store_with_pages(1);
        store.set_scale(1, 150.0);
        assert!(store.is_edited(1));
        store.set_scale(1, DEFAULT_SCALE);
        assert!(!store.is_edited(1));
    }

    #[test]
    fn test_offsets() {
        let mut store = store_with_pages(1);
        store.add_offset(1, 0.1, -0.2);
        store.add_offset(1, 0.1, f64::NAN);

        let t = store.transforms(1);
        assert!((t.offset_x - 0.2).abs() < 1e-12);
        assert!((t.offset_y + 0.2).abs() < 1e-12);

        store.set_offset(1, 0.0, 0.0);
        assert!(!store.is_edited(1));
    }

    #[test]
    fn test_add_offset_rejects_overflowing_sum() {
        let mut store = store_with_pages(1);
        store.add_offset(1, f64::MAX, 0.5);
        store.add_offset(1, f64::MAX, 0.5);

        let t = store.transforms(1);
        assert_eq!(t.offset_x, f64::MAX);
        assert_eq!(t.offset_y, 1.0);
    }

    #[test]
    fn test_reset_page_keeps_dimensions() {
        let mut store = store_with_pages(2);
        store.set_crop(1, CropBox::new(0.1, 0.1, 0.5, 0.5));
        store.set_fit_crop_to_page(1, true);
        store.set_scale(2, 50.0);
        store.reset_page(1);

        let meta = store.get(1).unwrap();
        assert!(meta.transforms.is_identity());
        assert!(!meta.fit_crop_to_page);
        assert_eq!(meta.original_dimensions, letter());
        assert!(store.is_edited(2));

        store.reset_all();
        assert!(store.edited_pages().is_empty());
    }

    #[test]
    fn test_clone_transforms() {
        let mut store = store_with_pages(2);
        store.set_crop(1, CropBox::new(0.2, 0.2, 0.6, 0.6));
        store.set_rotation(1, Rotation::Deg90);
        store.set_fit_crop_to_page(1, true);
        store.clone_transforms(1, 2);

        let copy = store.get(2).unwrap();
        assert_eq!(copy.transforms, store.transforms(1));
        assert!(copy.fit_crop_to_page);
        assert!(copy.is_cropped);
        assert!(copy.edited);

        // Later edits to the source do not leak into the copy
        store.set_scale(1, 300.0);
        assert_eq!(store.transforms(2).scale, 100.0);
    }

    #[test]
    fn test_apply_to_all() {
        let mut store = store_with_pages(4);
        store.set_scale(3, 80.0);
        store.add_offset(3, 0.1, 0.0);
        store.apply_to_all(3);

        assert_eq!(store.edited_pages(), vec![1, 2, 3, 4]);
        for page in store.page_numbers() {
            assert_eq!(store.transforms(page), store.transforms(3));
        }
    }

    struct FakeRasterizer {
        sizes: Vec<Option<PageDimensions>>,
    }

    impl PageRasterizer for FakeRasterizer {
        type Bitmap = Vec<u8>;
        type Error = String;

        fn page_count(&self) -> u32 {
            self.sizes.len() as u32
        }

        fn page_dimensions(&self, page_number: u32) -> Option<PageDimensions> {
            self.sizes.get(page_number as usize - 1).copied().flatten()
        }

        fn render_page(&self, _page_number: u32, _scale: f64) -> Result<Vec<u8>, String> {
            Err("not rendered in tests".to_string())
        }
    }

    #[test]
    fn test_register_pages_from_rasterizer() {
        let rasterizer = FakeRasterizer {
            sizes: vec![Some(letter()), None, Some(PageDimensions::new(792.0, 612.0))],
        };
        let mut store = PageStore::new();

        assert_eq!(store.register_pages(&rasterizer), 2);
        assert_eq!(store.page_numbers(), vec![1, 3]);
        assert_eq!(
            store.get(3).unwrap().original_dimensions,
            PageDimensions::new(792.0, 612.0)
        );
    }
}
