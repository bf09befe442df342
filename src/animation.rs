// SPDX-License-Identifier: MPL-2.0
//! Time-driven interpolation used by every transition.
//!
//! Animations never own a clock: callers pass the current `Instant` (from
//! `iced::window::frames()` in the app, from a fixed base in tests).

use iced::{Point, Rectangle, Vector};
use std::time::{Duration, Instant};

/// Timing curve applied to the linear progress of a [`Tween`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` onto the curve.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Linear interpolation between two values of the same type.
pub trait Lerp {
    #[must_use]
    fn lerp(&self, to: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Point {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Point::new(self.x.lerp(&to.x, t), self.y.lerp(&to.y, t))
    }
}

impl Lerp for Vector {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Vector::new(self.x.lerp(&to.x, t), self.y.lerp(&to.y, t))
    }
}

impl Lerp for Rectangle {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Rectangle {
            x: self.x.lerp(&to.x, t),
            y: self.y.lerp(&to.y, t),
            width: self.width.lerp(&to.width, t),
            height: self.height.lerp(&to.height, t),
        }
    }
}

/// A value animated from `from` to `to` over `duration`, starting at `started_at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    started_at: Instant,
    duration: Duration,
    easing: Easing,
}

impl<T: Lerp + Copy> Tween<T> {
    #[must_use]
    pub fn new(from: T, to: T, started_at: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
            easing,
        }
    }

    /// Linear progress in `[0, 1]`. A zero duration is immediately complete.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Interpolated value at `now`.
    #[must_use]
    pub fn value(&self, now: Instant) -> T {
        let t = self.easing.apply(self.progress(now));
        self.from.lerp(&self.to, t)
    }

    #[must_use]
    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;
    use iced::Size;

    #[test]
    fn easing_curves_hit_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_abs_diff_eq!(easing.apply(0.0), 0.0);
            assert_abs_diff_eq!(easing.apply(1.0), 1.0);
        }
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
    }

    #[test]
    fn tween_interpolates_over_duration() {
        let start = Instant::now();
        let tween = Tween::new(0.0_f32, 10.0, start, Duration::from_millis(200), Easing::Linear);

        assert_abs_diff_eq!(tween.value(start), 0.0);
        assert_abs_diff_eq!(
            tween.value(start + Duration::from_millis(100)),
            5.0,
            epsilon = 1e-3
        );
        assert!(!tween.is_finished(start + Duration::from_millis(199)));
        assert!(tween.is_finished(start + Duration::from_millis(200)));
        assert_abs_diff_eq!(tween.value(start + Duration::from_secs(5)), 10.0);
    }

    #[test]
    fn zero_duration_tween_is_finished_immediately() {
        let start = Instant::now();
        let tween = Tween::new(1.0_f32, 0.0, start, Duration::ZERO, Easing::EaseOut);
        assert!(tween.is_finished(start));
        assert_abs_diff_eq!(tween.value(start), 0.0);
    }

    #[test]
    fn rectangles_interpolate_componentwise() {
        let a = Rectangle::new(Point::ORIGIN, Size::new(10.0, 10.0));
        let b = Rectangle::new(Point::new(10.0, 20.0), Size::new(30.0, 50.0));
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid, Rectangle::new(Point::new(5.0, 10.0), Size::new(20.0, 30.0)));
    }
}
