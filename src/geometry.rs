// SPDX-License-Identifier: MPL-2.0
//! Rectangle helpers shared by the transition animators and the pages.
//!
//! All rectangles are expressed in window coordinates.

use iced::{Point, Rectangle, Size, Vector};

/// Returns the rectangle an image occupies when drawn with "contain"
/// scaling inside `container`.
///
/// The axis with the smaller scale factor is the binding one; the other axis
/// keeps the image aspect ratio. The result is centered in the container.
/// A zero-sized image yields a zero-sized rectangle at the container center.
#[must_use]
pub fn aspect_fit(container: Rectangle, image: Size) -> Rectangle {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Rectangle::new(center(container), Size::ZERO);
    }

    let width_scale = container.width / image.width;
    let height_scale = container.height / image.height;

    let mut fitted = container.size();
    if height_scale < width_scale {
        fitted.width = height_scale * image.width;
    } else if width_scale < height_scale {
        fitted.height = width_scale * image.height;
    }

    Rectangle {
        x: container.x + (container.width - fitted.width) / 2.0,
        y: container.y + (container.height - fitted.height) / 2.0,
        width: fitted.width,
        height: fitted.height,
    }
}

/// Center point of a rectangle.
#[must_use]
pub fn center(rect: Rectangle) -> Point {
    Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

/// Translates `rect` by `offset`.
#[must_use]
pub fn offset_by(rect: Rectangle, offset: Vector) -> Rectangle {
    Rectangle {
        x: rect.x + offset.x,
        y: rect.y + offset.y,
        ..rect
    }
}

/// Same rectangle pushed one full height below itself.
#[must_use]
pub fn below(rect: Rectangle) -> Rectangle {
    offset_by(rect, Vector::new(0.0, rect.height))
}
