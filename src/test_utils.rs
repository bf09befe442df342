// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and other common test helpers.
//!
//! This module re-exports the `approx` crate's assertion macros for float comparison,
//! which properly handle floating-point precision issues that `assert_eq!` cannot.

pub use approx::assert_abs_diff_eq;

use crate::transition::{RenderedImage, ThumbnailView, ViewId};
use iced::widget::image::Handle;
use iced::{Point, Rectangle, Size};

/// A tiny in-memory image handle; the pixels are never decoded in tests.
#[must_use]
pub fn rendered_image(width: f32, height: f32) -> RenderedImage {
    RenderedImage {
        handle: Handle::from_rgba(1, 1, vec![0, 0, 0, 255]),
        size: Size::new(width, height),
    }
}

/// A thumbnail at `frame` with a 4:3 image.
#[must_use]
pub fn thumbnail(id: u64, frame: Rectangle) -> ThumbnailView {
    ThumbnailView {
        id: ViewId(id),
        frame,
        image: Some(rendered_image(400.0, 300.0)),
    }
}

/// Rectangle from plain numbers.
#[must_use]
pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(width, height))
}

/// A 3x2 PNG encoded in memory.
#[must_use]
pub fn png_bytes() -> Vec<u8> {
    let image = image_rs::RgbaImage::from_pixel(3, 2, image_rs::Rgba([255, 0, 0, 255]));
    let mut bytes = Vec::new();
    image_rs::DynamicImage::ImageRgba8(image)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image_rs::ImageFormat::Png)
        .expect("encode png");
    bytes
}
