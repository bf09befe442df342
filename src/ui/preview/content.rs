// SPDX-License-Identifier: MPL-2.0
//! One page of the preview: a single image with its load progress and zoom.

use super::gesture::{is_predominantly_vertical, GestureArbiter};
use super::PageDescriptor;
use crate::geometry::aspect_fit;
use crate::media::{ImageRef, LoadEvent, LoadPriority, LoadRequest, LoadedImage};
use crate::transition::{RenderedImage, ThumbnailView, ViewId};
use crate::ui::state::ZoomState;
use iced::{Point, Rectangle, Vector};

/// Page views live in their own id range so they never clash with host views.
const PAGE_VIEW_BASE: u64 = 1 << 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadState {
    NotStarted,
    /// `progress` is unknown until the source reports a size.
    Loading { progress: Option<f32> },
    Loaded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct PageContent {
    index: usize,
    image_ref: ImageRef,
    placeholder: Option<RenderedImage>,
    image: Option<RenderedImage>,
    load_state: LoadState,
    indicator_visible: bool,
    zoom: ZoomState,
}

impl PageContent {
    #[must_use]
    pub fn new(descriptor: PageDescriptor, max_zoom_scale: f32) -> Self {
        Self {
            index: descriptor.index,
            image_ref: descriptor.image_ref,
            placeholder: None,
            image: None,
            load_state: LoadState::NotStarted,
            indicator_visible: false,
            zoom: ZoomState::new(max_zoom_scale),
        }
    }

    /// Shown until the full image arrives.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: Option<RenderedImage>) -> Self {
        self.placeholder = placeholder;
        self
    }

    #[must_use]
    pub fn image_ref(&self) -> &ImageRef {
        &self.image_ref
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    #[must_use]
    pub fn view_id(&self) -> ViewId {
        ViewId(PAGE_VIEW_BASE + self.index as u64)
    }

    /// Marks the page as loading and returns the request to issue, once.
    pub fn start_loading(&mut self, priority: LoadPriority) -> Option<LoadRequest> {
        if self.load_state != LoadState::NotStarted {
            return None;
        }
        self.load_state = LoadState::Loading { progress: None };
        Some(LoadRequest::new(self.image_ref.clone(), priority))
    }

    pub fn handle_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Progress { .. } => {
                if let LoadState::Loading { progress } = &mut self.load_state {
                    *progress = event.fraction().or(*progress);
                    self.indicator_visible = true;
                }
            }
            LoadEvent::Completed {
                image_ref, result, ..
            } => {
                if image_ref != self.image_ref {
                    log::warn!("page {} ignored image for {image_ref}", self.index);
                    return;
                }
                self.indicator_visible = false;
                match result {
                    Ok(loaded) => {
                        self.image = Some(rendered(&loaded));
                        self.load_state = LoadState::Loaded;
                    }
                    Err(err) => {
                        log::warn!("page {} failed to load {image_ref}: {err}", self.index);
                        self.load_state = LoadState::Failed;
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn is_indicator_visible(&self) -> bool {
        self.indicator_visible
    }

    /// Known load progress, for the indicator.
    #[must_use]
    pub fn progress(&self) -> f32 {
        match self.load_state {
            LoadState::Loading { progress } => progress.unwrap_or(0.0),
            LoadState::Loaded => 1.0,
            LoadState::NotStarted | LoadState::Failed => 0.0,
        }
    }

    /// The full image when loaded, the placeholder otherwise.
    #[must_use]
    pub fn displayed_image(&self) -> Option<&RenderedImage> {
        self.image.as_ref().or(self.placeholder.as_ref())
    }

    /// Where the displayed image is drawn for a page laid out at `page`.
    #[must_use]
    pub fn image_frame(&self, page: Rectangle) -> Option<Rectangle> {
        let image = self.displayed_image()?;
        Some(self.zoom.apply(aspect_fit(page, image.size), page))
    }

    /// The page's image view, as a transition source.
    ///
    /// The frame is the zoomed page frame; the image sits aspect-fitted in it.
    #[must_use]
    pub fn as_thumbnail_view(&self, page: Rectangle) -> ThumbnailView {
        ThumbnailView {
            id: self.view_id(),
            frame: self.zoom.apply(page, page),
            image: self.displayed_image().cloned(),
        }
    }

    #[must_use]
    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn double_tap(&mut self, at: Point, page: Rectangle) {
        let image = self.fitted_or_page(page);
        self.zoom.toggle_at(at, page, image);
        log::debug!("page {} zoom toggled to {}x", self.index, self.zoom.scale());
    }

    pub fn zoom_by(&mut self, factor: f32, anchor: Point, page: Rectangle) {
        let image = self.fitted_or_page(page);
        self.zoom.zoom_by(factor, anchor, page, image);
    }

    pub fn pan_by(&mut self, delta: Vector, page: Rectangle) {
        let image = self.fitted_or_page(page);
        self.zoom.pan_by(delta, page, image);
    }

    /// Called when the page leaves the screen.
    pub fn reset_zoom(&mut self) {
        self.zoom.reset();
    }

    fn fitted_or_page(&self, page: Rectangle) -> Rectangle {
        self.displayed_image()
            .map_or(page, |image| aspect_fit(page, image.size))
    }
}

impl GestureArbiter for PageContent {
    /// Only a mostly vertical drag on an unzoomed page dismisses.
    fn should_begin_dismiss(&self, translation: Vector) -> bool {
        is_predominantly_vertical(translation) && self.zoom.scale() == 1.0
    }
}

fn rendered(image: &LoadedImage) -> RenderedImage {
    RenderedImage {
        handle: image.handle.clone(),
        size: image.size(),
    }
}
