// SPDX-License-Identifier: MPL-2.0
//! Full-screen photo preview.
//!
//! ```text
//! PhotoPreview (component)  - page host, transition provider
//!     ├── Pager             - horizontal swipe between pages
//!     ├── PageContent × n   - one image, zoom, load progress
//!     ├── DismissInteractor - drag-to-dismiss
//!     └── scene             - canvas drawing and pointer input
//! ```

pub mod component;
pub mod content;
pub mod gesture;
pub mod pager;
mod scene;

pub use component::{DismissBy, Effect, Lifecycle, Message, PhotoPreview, PointerEvent};
pub use content::PageContent;

use crate::config::{
    Config, DEFAULT_ANIMATION_DURATION_MS, DEFAULT_DISMISS_ON_TAP, DEFAULT_DOUBLE_TAP_TIMEOUT_MS,
    DEFAULT_HIDE_NAVIGATION_BAR, DEFAULT_MAX_ZOOM_SCALE, DEFAULT_PAGE_CACHE_CAPACITY,
    DEFAULT_PAGE_SPACING, DEFAULT_PAN_SLOP, MIN_PAGE_CACHE_CAPACITY,
};
use crate::media::ImageRef;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Before,
    After,
}

/// What a page controller is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    pub index: usize,
    pub image_ref: ImageRef,
}

/// Bounds-checked access to the pages of a gallery.
pub trait PageSource {
    fn page_count(&self) -> usize;

    fn page(&self, index: usize) -> Option<PageDescriptor>;

    /// The page next to `index`, or `None` past either end.
    fn neighbor(&self, index: usize, direction: PageDirection) -> Option<PageDescriptor> {
        let neighbor = match direction {
            PageDirection::Before => index.checked_sub(1)?,
            PageDirection::After => index.checked_add(1)?,
        };
        self.page(neighbor)
    }
}

/// The image list and the indices the preview cares about.
#[derive(Debug, Clone)]
pub struct GalleryState {
    image_refs: Vec<ImageRef>,
    opened_at_index: usize,
    current_index: Option<usize>,
}

impl GalleryState {
    /// `opened_at` is clamped into the list; an empty list has no current page.
    #[must_use]
    pub fn new(image_refs: Vec<ImageRef>, opened_at: usize) -> Self {
        let opened_at_index = opened_at.min(image_refs.len().saturating_sub(1));
        let current_index = (!image_refs.is_empty()).then_some(opened_at_index);
        Self {
            image_refs,
            opened_at_index,
            current_index,
        }
    }

    #[must_use]
    pub fn opened_at_index(&self) -> usize {
        self.opened_at_index
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.image_refs.is_empty()
    }

    /// Whether the page on screen is the one the preview opened on, so that
    /// dismissal can fly back onto the host thumbnail.
    #[must_use]
    pub fn target_is_source(&self) -> bool {
        self.current_index == Some(self.opened_at_index)
    }

    /// Applies a completed page turn. Returns the new current index.
    pub fn complete_page_transition(&mut self, direction: PageDirection) -> Option<usize> {
        let current = self.current_index?;
        let next = self.neighbor(current, direction)?;
        self.current_index = Some(next.index);
        Some(next.index)
    }
}

impl PageSource for GalleryState {
    fn page_count(&self) -> usize {
        self.image_refs.len()
    }

    fn page(&self, index: usize) -> Option<PageDescriptor> {
        self.image_refs.get(index).map(|image_ref| PageDescriptor {
            index,
            image_ref: image_ref.clone(),
        })
    }
}

/// Construction-time configuration of a [`PhotoPreview`].
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub image_refs: Vec<ImageRef>,
    pub start_index: usize,
    pub spacing: f32,
    pub animation_duration: Duration,
    pub dismiss_on_tap: bool,
    pub hide_navigation_bar_while_presenting: bool,
    pub max_zoom_scale: f32,
    pub double_tap_timeout: Duration,
    pub pan_slop: f32,
    /// Never below [`MIN_PAGE_CACHE_CAPACITY`]; set through
    /// [`Options::page_cache_capacity`].
    page_cache_capacity: usize,
}

impl Options {
    #[must_use]
    pub fn new(image_refs: Vec<ImageRef>) -> Self {
        Self {
            image_refs,
            start_index: 0,
            spacing: DEFAULT_PAGE_SPACING,
            animation_duration: Duration::from_millis(DEFAULT_ANIMATION_DURATION_MS),
            dismiss_on_tap: DEFAULT_DISMISS_ON_TAP,
            hide_navigation_bar_while_presenting: DEFAULT_HIDE_NAVIGATION_BAR,
            max_zoom_scale: DEFAULT_MAX_ZOOM_SCALE,
            double_tap_timeout: Duration::from_millis(DEFAULT_DOUBLE_TAP_TIMEOUT_MS),
            pan_slop: DEFAULT_PAN_SLOP,
            page_cache_capacity: DEFAULT_PAGE_CACHE_CAPACITY,
        }
    }

    /// Options seeded from a loaded configuration.
    #[must_use]
    pub fn from_config(image_refs: Vec<ImageRef>, config: &Config) -> Self {
        Self {
            image_refs,
            start_index: 0,
            spacing: config.page_spacing(),
            animation_duration: config.animation_duration(),
            dismiss_on_tap: config.dismiss_on_tap(),
            hide_navigation_bar_while_presenting: config.hide_navigation_bar(),
            max_zoom_scale: config.max_zoom_scale(),
            double_tap_timeout: config.double_tap_timeout(),
            pan_slop: config.pan_slop(),
            page_cache_capacity: config.page_cache_capacity(),
        }
    }

    /// Page controllers kept alive, at least the current page and its
    /// neighbours.
    #[must_use]
    pub fn page_cache_capacity(mut self, capacity: usize) -> Self {
        self.page_cache_capacity = capacity.max(MIN_PAGE_CACHE_CAPACITY);
        self
    }

    #[must_use]
    pub fn start_index(mut self, index: usize) -> Self {
        self.start_index = index;
        self
    }

    #[must_use]
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    #[must_use]
    pub fn animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration = duration;
        self
    }

    #[must_use]
    pub fn dismiss_on_tap(mut self, enabled: bool) -> Self {
        self.dismiss_on_tap = enabled;
        self
    }

    #[must_use]
    pub fn hide_navigation_bar_while_presenting(mut self, enabled: bool) -> Self {
        self.hide_navigation_bar_while_presenting = enabled;
        self
    }

    #[must_use]
    pub fn max_zoom_scale(mut self, scale: f32) -> Self {
        self.max_zoom_scale = scale;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(count: usize) -> Vec<ImageRef> {
        (0..count)
            .map(|i| ImageRef::Path(format!("{i}.png").into()))
            .collect()
    }

    #[test]
    fn neighbours_are_bounds_checked() {
        let gallery = GalleryState::new(refs(4), 0);
        assert!(gallery.neighbor(0, PageDirection::Before).is_none());
        assert!(gallery.neighbor(3, PageDirection::After).is_none());
        assert!(gallery.page(4).is_none());

        for index in 0..4 {
            let page = gallery.page(index).expect("in range");
            assert_eq!(page.image_ref, ImageRef::Path(format!("{index}.png").into()));
        }
        assert_eq!(
            gallery.neighbor(1, PageDirection::After).map(|p| p.index),
            Some(2)
        );
        assert_eq!(
            gallery.neighbor(1, PageDirection::Before).map(|p| p.index),
            Some(0)
        );
    }

    #[test]
    fn current_index_moves_only_on_completed_turns() {
        let mut gallery = GalleryState::new(refs(3), 2);
        assert_eq!(gallery.current_index(), Some(2));
        assert!(gallery.complete_page_transition(PageDirection::After).is_none());
        assert_eq!(gallery.current_index(), Some(2));

        assert_eq!(
            gallery.complete_page_transition(PageDirection::Before),
            Some(1)
        );
        assert!(!gallery.target_is_source());
        assert_eq!(gallery.opened_at_index(), 2);
    }

    #[test]
    fn start_index_is_clamped_and_empty_gallery_has_no_current_page() {
        let gallery = GalleryState::new(refs(2), 10);
        assert_eq!(gallery.current_index(), Some(1));

        let empty = GalleryState::new(Vec::new(), 0);
        assert!(empty.current_index().is_none());
        assert!(!empty.target_is_source());
    }

    #[test]
    fn page_cache_keeps_room_for_current_page_and_neighbours() {
        let options = Options::new(refs(3)).page_cache_capacity(1);
        assert_eq!(options.page_cache_capacity, MIN_PAGE_CACHE_CAPACITY);
        let options = options.page_cache_capacity(8);
        assert_eq!(options.page_cache_capacity, 8);
    }

    #[test]
    fn options_from_config_uses_configured_values() {
        let mut config = Config::default();
        config.preview.dismiss_on_tap = Some(false);
        config.preview.page_spacing = Some(8.0);

        let options = Options::from_config(refs(1), &config).start_index(0);
        assert!(!options.dismiss_on_tap);
        assert_eq!(options.spacing, 8.0);
        assert_eq!(options, Options::new(refs(1)).dismiss_on_tap(false).spacing(8.0));
    }
}
