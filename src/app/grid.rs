// SPDX-License-Identifier: MPL-2.0
//! Thumbnail grid of the demo host.

use super::Message;
use crate::geometry::aspect_fit;
use crate::transition::RenderedImage;
use iced::widget::canvas::{self, Frame, Geometry};
use iced::{mouse, Color, Point, Rectangle, Renderer, Size, Theme};

pub const CELL_SIZE: f32 = 120.0;
pub const CELL_GAP: f32 = 8.0;

const CELL_BACKGROUND: Color = Color::from_rgb(0.16, 0.16, 0.16);

/// Cell rectangles for `count` thumbnails laid out row by row in `area`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn layout(count: usize, area: Rectangle) -> Vec<Rectangle> {
    let columns = (((area.width - CELL_GAP) / (CELL_SIZE + CELL_GAP)).floor() as usize).max(1);
    (0..count)
        .map(|index| {
            let column = (index % columns) as f32;
            let row = (index / columns) as f32;
            Rectangle::new(
                Point::new(
                    area.x + CELL_GAP + column * (CELL_SIZE + CELL_GAP),
                    area.y + CELL_GAP + row * (CELL_SIZE + CELL_GAP),
                ),
                Size::new(CELL_SIZE, CELL_SIZE),
            )
        })
        .collect()
}

/// Where a thumbnail's image is drawn inside its cell.
#[must_use]
pub fn image_frame(cell: Rectangle, image: Option<&RenderedImage>) -> Rectangle {
    image.map_or(cell, |image| aspect_fit(cell, image.size))
}

pub struct Cell<'a> {
    pub bounds: Rectangle,
    pub image: Option<&'a RenderedImage>,
    /// Covered by a running transition.
    pub hidden: bool,
}

pub struct ThumbnailGrid<'a> {
    pub cells: Vec<Cell<'a>>,
}

impl canvas::Program<Message> for ThumbnailGrid<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &iced::Event,
        _bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<iced::widget::Action<Message>> {
        use iced::widget::Action;

        let iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event else {
            return None;
        };
        let position = cursor.position()?;
        let index = self
            .cells
            .iter()
            .position(|cell| cell.bounds.contains(position))?;
        Some(Action::publish(Message::ThumbnailPressed(index)).and_capture())
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        for cell in &self.cells {
            frame.fill_rectangle(cell.bounds.position(), cell.bounds.size(), CELL_BACKGROUND);
            if cell.hidden {
                continue;
            }
            if let Some(image) = cell.image {
                frame.draw_image(
                    image_frame(cell.bounds, Some(image)),
                    canvas::Image::new(image.handle.clone()),
                );
            }
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, rect, rendered_image};

    #[test]
    fn cells_wrap_to_the_next_row() {
        // Room for three columns.
        let cells = layout(4, rect(0.0, 48.0, 400.0, 600.0));
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0], rect(8.0, 56.0, 120.0, 120.0));
        assert_eq!(cells[2].x, 8.0 + 2.0 * 128.0);
        assert_eq!(cells[3], rect(8.0, 184.0, 120.0, 120.0));
    }

    #[test]
    fn narrow_area_keeps_one_column() {
        let cells = layout(2, rect(0.0, 0.0, 50.0, 600.0));
        assert_eq!(cells[0].x, cells[1].x);
    }

    #[test]
    fn image_is_fitted_in_its_cell() {
        let cell = rect(0.0, 0.0, 120.0, 120.0);
        let image = rendered_image(400.0, 200.0);
        let frame = image_frame(cell, Some(&image));
        assert_abs_diff_eq!(frame.x, 0.0);
        assert_abs_diff_eq!(frame.y, 30.0, epsilon = 1e-4);
        assert_abs_diff_eq!(frame.width, 120.0, epsilon = 1e-4);
        assert_abs_diff_eq!(frame.height, 60.0, epsilon = 1e-4);
        assert_eq!(image_frame(cell, None), cell);
    }
}
