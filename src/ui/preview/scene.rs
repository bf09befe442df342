// SPDX-License-Identifier: MPL-2.0
//! Canvas program drawing one preview frame and forwarding mouse input.
//!
//! Layers, bottom to top: black page surface with the pages, dimming
//! overlay, transition snapshot, load progress.

use super::component::{Message, PointerEvent};
use crate::geometry::offset_by;
use crate::transition::TransitionFrame;
use crate::ui::widgets::CircularLoader;
use iced::widget::canvas::{self, Frame, Geometry};
use iced::widget::image::Handle;
use iced::{mouse, Color, Point, Rectangle, Renderer, Theme};

/// Pixels per wheel line for touchpads reporting pixel deltas.
const PIXELS_PER_LINE: f32 = 50.0;

/// One page image at its on-screen frame, before the surface offset.
#[derive(Debug, Clone)]
pub(super) struct PageLayer {
    pub(super) handle: Handle,
    pub(super) bounds: Rectangle,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Indicator {
    pub(super) center: Point,
    pub(super) progress: f32,
}

/// Everything needed to draw a frame, built by the component.
#[derive(Debug, Clone)]
pub(super) struct Scene {
    pub(super) viewport: Rectangle,
    pub(super) frame: TransitionFrame,
    /// Set while a presentation flies the thumbnail over the surface.
    pub(super) surface_hidden: bool,
    pub(super) pages: Vec<PageLayer>,
    pub(super) indicator: Option<Indicator>,
}

impl Scene {
    fn draw_surface(&self, frame: &mut Frame) {
        let surface = self.frame.surface;
        if !surface.visible || self.surface_hidden || surface.alpha <= 0.0 {
            return;
        }

        let area = offset_by(self.viewport, surface.offset);
        frame.fill_rectangle(
            area.position(),
            area.size(),
            Color {
                a: surface.alpha,
                ..Color::BLACK
            },
        );
        for page in &self.pages {
            frame.draw_image(
                offset_by(page.bounds, surface.offset),
                canvas::Image::new(page.handle.clone()).opacity(surface.alpha),
            );
        }

        if let Some(indicator) = self.indicator {
            CircularLoader::new(indicator.progress).draw(frame, indicator.center + surface.offset);
        }
    }
}

impl canvas::Program<Message> for Scene {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &iced::Event,
        _bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<iced::widget::Action<Message>> {
        use iced::widget::Action;

        let pointer = match event {
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                PointerEvent::Pressed(cursor.position()?)
            }
            iced::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                PointerEvent::Moved(*position)
            }
            iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                match cursor.position() {
                    Some(position) => PointerEvent::Released(position),
                    None => PointerEvent::Left,
                }
            }
            iced::Event::Mouse(mouse::Event::CursorLeft) => PointerEvent::Left,
            iced::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let delta_y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => *y,
                    mouse::ScrollDelta::Pixels { y, .. } => *y / PIXELS_PER_LINE,
                };
                PointerEvent::Wheel {
                    delta_y,
                    at: cursor.position()?,
                }
            }
            _ => return None,
        };

        Some(Action::publish(Message::Pointer(pointer)).and_capture())
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

        self.draw_surface(&mut frame);

        if self.frame.dim_alpha > 0.0 {
            frame.fill_rectangle(
                Point::ORIGIN,
                bounds.size(),
                Color {
                    a: self.frame.dim_alpha.clamp(0.0, 1.0),
                    ..Color::BLACK
                },
            );
        }

        if let Some(snapshot) = &self.frame.snapshot {
            frame.draw_image(
                snapshot.image_bounds(),
                canvas::Image::new(snapshot.image.handle.clone()),
            );
        }

        vec![frame.into_geometry()]
    }
}
