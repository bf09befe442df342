// SPDX-License-Identifier: MPL-2.0
//! Zoom state of a single page
//!
//! This module handles page zoom, including:
//! - Double-tap toggling between 1x and the maximum scale
//! - Wheel zoom around the cursor
//! - Panning a zoomed image without exposing gaps where avoidable
//!
//! Zoom is expressed as a scale about the page center plus a pan offset, so
//! a point `p` of the unzoomed page is drawn at
//! `center + offset + (p - center) * scale`.

pub use crate::config::{DEFAULT_MAX_ZOOM_SCALE, MAX_ZOOM_SCALE_LIMIT, MIN_ZOOM_SCALE};

use crate::geometry::center;
use iced::{Point, Rectangle, Vector};

/// Zoom scale, guaranteed to be within `[1, max]`.
///
/// This type ensures that scale values are always valid, eliminating
/// the need for manual clamping at usage sites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomScale(f32);

impl ZoomScale {
    /// Creates a new scale, clamping the value to `[1, max]`.
    #[must_use]
    pub fn new(scale: f32, max: f32) -> Self {
        let max = max.clamp(MIN_ZOOM_SCALE, MAX_ZOOM_SCALE_LIMIT);
        if scale.is_nan() {
            return Self(MIN_ZOOM_SCALE);
        }
        Self(scale.clamp(MIN_ZOOM_SCALE, max))
    }

    /// Returns the raw scale value.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns whether the page is shown at its natural size.
    #[must_use]
    pub fn is_identity(self) -> bool {
        self.0 <= MIN_ZOOM_SCALE
    }
}

impl Default for ZoomScale {
    fn default() -> Self {
        Self(MIN_ZOOM_SCALE)
    }
}

/// Zoom and pan of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomState {
    scale: ZoomScale,
    max_scale: f32,
    offset: Vector,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ZOOM_SCALE)
    }
}

impl ZoomState {
    #[must_use]
    pub fn new(max_scale: f32) -> Self {
        Self {
            scale: ZoomScale::default(),
            max_scale: max_scale.clamp(MIN_ZOOM_SCALE, MAX_ZOOM_SCALE_LIMIT),
            offset: Vector::ZERO,
        }
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    #[must_use]
    pub fn max_scale(&self) -> f32 {
        self.max_scale
    }

    #[must_use]
    pub fn offset(&self) -> Vector {
        self.offset
    }

    /// Exactly 1x with no pan.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.scale.is_identity() && self.offset == Vector::ZERO
    }

    /// Back to 1x.
    pub fn reset(&mut self) {
        self.scale = ZoomScale::default();
        self.offset = Vector::ZERO;
    }

    /// Toggles between 1x and the maximum scale. Zooming in brings the
    /// tapped point to the page center.
    pub fn toggle_at(&mut self, point: Point, page: Rectangle, image: Rectangle) {
        if self.scale.is_identity() {
            let scale = ZoomScale::new(self.max_scale, self.max_scale);
            let unzoomed = self.unproject(point, page);
            self.scale = scale;
            self.offset = (center(page) - unzoomed) * scale.value();
            self.clamp_offset(page, image);
        } else {
            self.reset();
        }
    }

    /// Multiplies the scale by `factor`, keeping `anchor` fixed on screen.
    pub fn zoom_by(&mut self, factor: f32, anchor: Point, page: Rectangle, image: Rectangle) {
        let unzoomed = self.unproject(anchor, page);
        self.scale = ZoomScale::new(self.scale.value() * factor, self.max_scale);
        if self.scale.is_identity() {
            self.offset = Vector::ZERO;
            return;
        }
        let page_center = center(page);
        self.offset = (anchor - page_center) - (unzoomed - page_center) * self.scale.value();
        self.clamp_offset(page, image);
    }

    /// Pans a zoomed page. Ignored at 1x.
    pub fn pan_by(&mut self, delta: Vector, page: Rectangle, image: Rectangle) {
        if self.scale.is_identity() {
            return;
        }
        self.offset = self.offset + delta;
        self.clamp_offset(page, image);
    }

    /// Where `image` (laid out at 1x) is drawn under the current zoom.
    #[must_use]
    pub fn apply(&self, image: Rectangle, page: Rectangle) -> Rectangle {
        let scale = self.scale.value();
        let origin = self.project(Point::new(image.x, image.y), page);
        Rectangle {
            x: origin.x,
            y: origin.y,
            width: image.width * scale,
            height: image.height * scale,
        }
    }

    fn project(&self, point: Point, page: Rectangle) -> Point {
        let page_center = center(page);
        page_center + self.offset + (point - page_center) * self.scale.value()
    }

    fn unproject(&self, point: Point, page: Rectangle) -> Point {
        let page_center = center(page);
        page_center + (point - page_center - self.offset) * (1.0 / self.scale.value())
    }

    /// Keeps the zoomed image covering the page along every axis where it is
    /// large enough to do so, and centered along the others.
    fn clamp_offset(&mut self, page: Rectangle, image: Rectangle) {
        let scale = self.scale.value();
        let slack_x = ((image.width * scale - page.width) / 2.0).max(0.0);
        let slack_y = ((image.height * scale - page.height) / 2.0).max(0.0);
        self.offset = Vector::new(
            self.offset.x.clamp(-slack_x, slack_x),
            self.offset.y.clamp(-slack_y, slack_y),
        );
    }
}
