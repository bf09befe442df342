// SPDX-License-Identifier: MPL-2.0
//! Circular progress indicator drawn on a canvas frame.
//!
//! A faint full ring with an arc on top, starting at twelve o'clock and
//! sweeping clockwise as progress grows.

use crate::config::{LOADER_LINE_WIDTH, LOADER_RADIUS};
use iced::widget::canvas::{self, Frame, Path, Stroke};
use iced::{Color, Point};
use std::f32::consts::{PI, TAU};

/// Segments used to approximate a full circle.
const SEGMENTS: u16 = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularLoader {
    progress: f32,
    radius: f32,
    line_width: f32,
    color: Color,
}

impl Default for CircularLoader {
    fn default() -> Self {
        Self {
            progress: 0.0,
            radius: LOADER_RADIUS,
            line_width: LOADER_LINE_WIDTH,
            color: Color::WHITE,
        }
    }
}

impl CircularLoader {
    #[must_use]
    pub fn new(progress: f32) -> Self {
        Self::default().with_progress(progress)
    }

    /// Sets the progress, clamped into `[0, 1]`. NaN counts as no progress.
    #[must_use]
    pub fn with_progress(mut self, progress: f32) -> Self {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Angle covered by the progress arc, in radians.
    #[must_use]
    pub fn sweep(&self) -> f32 {
        self.progress * TAU
    }

    /// Draws the indicator centered on `center`.
    pub fn draw(&self, frame: &mut Frame, center: Point) {
        let track = Path::circle(center, self.radius);
        frame.stroke(
            &track,
            Stroke::default()
                .with_width(self.line_width)
                .with_color(Color {
                    a: 0.25,
                    ..self.color
                }),
        );

        if self.progress <= 0.0 {
            return;
        }

        let start_angle = -PI / 2.0;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segments = ((f32::from(SEGMENTS) * self.progress).ceil() as u16).max(1);

        let mut arc = canvas::path::Builder::new();
        arc.move_to(point_on_circle(center, self.radius, start_angle));
        for i in 1..=segments {
            let t = f32::from(i) / f32::from(segments);
            arc.line_to(point_on_circle(
                center,
                self.radius,
                start_angle + self.sweep() * t,
            ));
        }

        frame.stroke(
            &arc.build(),
            Stroke::default()
                .with_width(self.line_width)
                .with_color(self.color)
                .with_line_cap(canvas::LineCap::Round),
        );
    }
}

fn point_on_circle(center: Point, radius: f32, angle: f32) -> Point {
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn progress_is_clamped() {
        assert_eq!(CircularLoader::new(-0.5).progress(), 0.0);
        assert_eq!(CircularLoader::new(1.7).progress(), 1.0);
        assert_eq!(CircularLoader::new(f32::NAN).progress(), 0.0);
        assert_eq!(CircularLoader::new(0.4).progress(), 0.4);
    }

    #[test]
    fn defaults_match_indicator_style() {
        let loader = CircularLoader::default();
        assert_eq!(loader.radius, 20.0);
        assert_eq!(loader.line_width, 2.0);
        assert_eq!(loader.color, Color::WHITE);
    }

    #[test]
    fn sweep_follows_progress() {
        assert_abs_diff_eq!(CircularLoader::new(0.5).sweep(), PI);
        assert_abs_diff_eq!(CircularLoader::new(1.0).sweep(), TAU);
    }

    #[test]
    fn arc_starts_at_twelve_o_clock() {
        let top = point_on_circle(Point::new(50.0, 50.0), 20.0, -PI / 2.0);
        assert_abs_diff_eq!(top.x, 50.0, epsilon = 1e-4);
        assert_abs_diff_eq!(top.y, 30.0, epsilon = 1e-4);
    }
}
