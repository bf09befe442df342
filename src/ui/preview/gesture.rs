// SPDX-License-Identifier: MPL-2.0
//! Pan and tap recognition on top of raw pointer events.
//!
//! A press turns into a pan once the pointer travels further than the slop;
//! a press released before that is a tap. Single taps are held back until a
//! double tap can no longer happen, so the two never fire together.

use crate::config::{DEFAULT_DOUBLE_TAP_TIMEOUT_MS, DEFAULT_PAN_SLOP};
use iced::{Point, Vector};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// One pan callback. `translation` is the movement since the previous
/// callback; for `Began` it covers the whole travel from the press point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanUpdate {
    pub phase: PanPhase,
    pub translation: Vector,
    pub position: Point,
}

#[derive(Debug, Clone)]
pub struct PanRecognizer {
    slop: f32,
    pressed_at: Option<Point>,
    last: Option<Point>,
    panning: bool,
}

impl Default for PanRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_PAN_SLOP)
    }
}

impl PanRecognizer {
    #[must_use]
    pub fn new(slop: f32) -> Self {
        Self {
            slop: slop.max(0.0),
            pressed_at: None,
            last: None,
            panning: false,
        }
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn press(&mut self, position: Point) {
        self.pressed_at = Some(position);
        self.last = Some(position);
        self.panning = false;
    }

    pub fn moved(&mut self, position: Point) -> Option<PanUpdate> {
        let pressed_at = self.pressed_at?;
        let last = self.last.unwrap_or(pressed_at);

        if !self.panning {
            let travel = position - pressed_at;
            if travel.x.hypot(travel.y) < self.slop {
                return None;
            }
            self.panning = true;
            self.last = Some(position);
            return Some(PanUpdate {
                phase: PanPhase::Began,
                translation: travel,
                position,
            });
        }

        self.last = Some(position);
        Some(PanUpdate {
            phase: PanPhase::Changed,
            translation: position - last,
            position,
        })
    }

    /// Ends the press. Returns `None` when the press never became a pan,
    /// in which case it counts as a tap.
    pub fn release(&mut self, position: Point) -> Option<PanUpdate> {
        let last = self.last.take();
        self.pressed_at = None;
        if !std::mem::take(&mut self.panning) {
            return None;
        }
        Some(PanUpdate {
            phase: PanPhase::Ended,
            translation: last.map_or(Vector::ZERO, |last| position - last),
            position,
        })
    }

    /// Aborts the press, for instance when the pointer leaves the window.
    pub fn cancel(&mut self) -> Option<PanUpdate> {
        let last = self.last.take();
        self.pressed_at = None;
        if !std::mem::take(&mut self.panning) {
            return None;
        }
        Some(PanUpdate {
            phase: PanPhase::Cancelled,
            translation: Vector::ZERO,
            position: last.unwrap_or(Point::ORIGIN),
        })
    }
}

/// Counts consecutive taps until `taps_required` land within the timeout.
#[derive(Debug, Clone)]
pub struct TapRecognizer {
    taps_required: u8,
    timeout: Duration,
    count: u8,
    last_tap: Option<Instant>,
}

impl TapRecognizer {
    #[must_use]
    pub fn new(taps_required: u8, timeout: Duration) -> Self {
        Self {
            taps_required: taps_required.max(1),
            timeout,
            count: 0,
            last_tap: None,
        }
    }

    #[must_use]
    pub fn taps_required(&self) -> u8 {
        self.taps_required
    }

    /// Registers a tap. Returns `true` when the sequence is complete.
    pub fn tap(&mut self, now: Instant) -> bool {
        let continues = self
            .last_tap
            .is_some_and(|last| now.saturating_duration_since(last) <= self.timeout);
        self.count = if continues { self.count + 1 } else { 1 };
        self.last_tap = Some(now);

        if self.count >= self.taps_required {
            self.reset();
            return true;
        }
        false
    }

    /// Whether a started sequence can still complete at `now`.
    #[must_use]
    pub fn is_possible(&self, now: Instant) -> bool {
        self.count > 0
            && self
                .last_tap
                .is_some_and(|last| now.saturating_duration_since(last) <= self.timeout)
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.last_tap = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tap {
    Single(Point),
    Double(Point),
}

/// Single and double tap, where the single tap waits for the double tap to fail.
#[derive(Debug, Clone)]
pub struct TapGestures {
    double: TapRecognizer,
    pending_single: Option<(Instant, Point)>,
    timeout: Duration,
}

impl Default for TapGestures {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DOUBLE_TAP_TIMEOUT_MS))
    }
}

impl TapGestures {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            double: TapRecognizer::new(2, timeout),
            pending_single: None,
            timeout,
        }
    }

    pub fn tap(&mut self, position: Point, now: Instant) -> Option<Tap> {
        if self.double.tap(now) {
            self.pending_single = None;
            return Some(Tap::Double(position));
        }
        self.pending_single = Some((now, position));
        None
    }

    /// Releases a pending single tap once the double tap has failed.
    pub fn poll(&mut self, now: Instant) -> Option<Tap> {
        let (tapped_at, position) = self.pending_single?;
        if now.saturating_duration_since(tapped_at) <= self.timeout {
            return None;
        }
        self.pending_single = None;
        self.double.reset();
        Some(Tap::Single(position))
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_single.is_some()
    }

    /// Forgets pending taps, for instance when a pan starts.
    pub fn reset(&mut self) {
        self.pending_single = None;
        self.double.reset();
    }
}

/// Whether a movement is mostly vertical.
#[must_use]
pub fn is_predominantly_vertical(translation: Vector) -> bool {
    translation.y.abs() > translation.x.abs()
}

/// Decides whether a pan may turn into a dismiss drag.
pub trait GestureArbiter {
    fn should_begin_dismiss(&self, translation: Vector) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(300);

    #[test]
    fn small_moves_stay_below_slop() {
        let mut pan = PanRecognizer::new(8.0);
        pan.press(Point::new(10.0, 10.0));
        assert!(pan.moved(Point::new(13.0, 14.0)).is_none());
        assert!(!pan.is_panning());
        assert!(pan.release(Point::new(13.0, 14.0)).is_none());
    }

    #[test]
    fn pan_reports_incremental_translation() {
        let mut pan = PanRecognizer::new(8.0);
        pan.press(Point::new(0.0, 0.0));

        let began = pan.moved(Point::new(0.0, 10.0)).expect("began");
        assert_eq!(began.phase, PanPhase::Began);
        assert_eq!(began.translation, Vector::new(0.0, 10.0));

        let changed = pan.moved(Point::new(2.0, 25.0)).expect("changed");
        assert_eq!(changed.phase, PanPhase::Changed);
        assert_eq!(changed.translation, Vector::new(2.0, 15.0));

        let ended = pan.release(Point::new(2.0, 30.0)).expect("ended");
        assert_eq!(ended.phase, PanPhase::Ended);
        assert_eq!(ended.translation, Vector::new(0.0, 5.0));
        assert!(!pan.is_pressed());
    }

    #[test]
    fn cancel_only_reports_active_pans() {
        let mut pan = PanRecognizer::new(8.0);
        pan.press(Point::ORIGIN);
        assert!(pan.cancel().is_none());

        pan.press(Point::ORIGIN);
        let _ = pan.moved(Point::new(20.0, 0.0));
        assert_eq!(pan.cancel().map(|u| u.phase), Some(PanPhase::Cancelled));
    }

    #[test]
    fn moves_without_press_are_ignored() {
        let mut pan = PanRecognizer::default();
        assert!(pan.moved(Point::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn tap_recognizer_honours_required_count() {
        let start = Instant::now();
        let mut triple = TapRecognizer::new(3, TIMEOUT);
        assert!(!triple.tap(start));
        assert!(!triple.tap(start + Duration::from_millis(100)));
        assert!(triple.tap(start + Duration::from_millis(200)));

        assert!(!triple.tap(start + Duration::from_millis(1_000)));
        assert!(triple.is_possible(start + Duration::from_millis(1_100)));
        assert!(!triple.is_possible(start + Duration::from_millis(2_000)));
    }

    #[test]
    fn single_tap_waits_for_double_tap_to_fail() {
        let start = Instant::now();
        let mut taps = TapGestures::new(TIMEOUT);
        let at = Point::new(5.0, 5.0);

        assert!(taps.tap(at, start).is_none());
        assert!(taps.has_pending());
        assert!(taps.poll(start + Duration::from_millis(100)).is_none());
        assert_eq!(
            taps.poll(start + Duration::from_millis(301)),
            Some(Tap::Single(at))
        );
        assert!(!taps.has_pending());
    }

    #[test]
    fn double_tap_suppresses_single() {
        let start = Instant::now();
        let mut taps = TapGestures::new(TIMEOUT);
        let at = Point::new(5.0, 5.0);

        assert!(taps.tap(at, start).is_none());
        assert_eq!(
            taps.tap(at, start + Duration::from_millis(150)),
            Some(Tap::Double(at))
        );
        assert!(taps.poll(start + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn slow_taps_are_two_singles() {
        let start = Instant::now();
        let mut taps = TapGestures::new(TIMEOUT);
        let at = Point::ORIGIN;

        let _ = taps.tap(at, start);
        assert_eq!(
            taps.poll(start + Duration::from_millis(400)),
            Some(Tap::Single(at))
        );
        assert!(taps.tap(at, start + Duration::from_millis(500)).is_none());
    }

    #[test]
    fn vertical_predominance() {
        assert!(is_predominantly_vertical(Vector::new(3.0, -9.0)));
        assert!(!is_predominantly_vertical(Vector::new(9.0, 3.0)));
        assert!(!is_predominantly_vertical(Vector::new(5.0, 5.0)));
    }
}
