// SPDX-License-Identifier: MPL-2.0
//! Horizontal paging between neighbouring pages.
//!
//! The pager only tracks the horizontal shift of the current page. A page
//! turn is reported once, when its settle animation completes; a swipe that
//! is released early or cancelled springs back and reports nothing.

use super::PageDirection;
use crate::animation::{Easing, Tween};
use crate::config::{PAGE_RUBBER_BAND, PAGE_SNAP_FRACTION};
use std::time::{Duration, Instant};

/// Which neighbours exist around the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbors {
    pub before: bool,
    pub after: bool,
}

impl Neighbors {
    fn has(self, direction: PageDirection) -> bool {
        match direction {
            PageDirection::Before => self.before,
            PageDirection::After => self.after,
        }
    }
}

#[derive(Debug, Clone)]
struct Settle {
    offset: Tween<f32>,
    turn: Option<PageDirection>,
}

#[derive(Debug, Clone)]
pub struct Pager {
    spacing: f32,
    duration: Duration,
    drag_offset: f32,
    dragging: bool,
    settle: Option<Settle>,
}

impl Pager {
    #[must_use]
    pub fn new(spacing: f32, duration: Duration) -> Self {
        Self {
            spacing: spacing.max(0.0),
            duration,
            drag_offset: 0.0,
            dragging: false,
            settle: None,
        }
    }

    #[must_use]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Horizontal distance between the origins of two adjacent pages.
    #[must_use]
    pub fn stride(&self, page_width: f32) -> f32 {
        page_width + self.spacing
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.settle.is_some()
    }

    /// Whether the current page is exactly in place.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.dragging && self.settle.is_none() && self.drag_offset == 0.0
    }

    /// Shift of the current page at `now`.
    #[must_use]
    pub fn offset(&self, now: Instant) -> f32 {
        match &self.settle {
            Some(settle) => settle.offset.value(now),
            None => self.drag_offset,
        }
    }

    /// Follows the pointer. Dragging toward a missing neighbour is damped.
    pub fn drag(&mut self, dx: f32, neighbors: Neighbors) {
        if self.settle.is_some() {
            return;
        }
        self.dragging = true;

        let next = self.drag_offset + dx;
        let revealing = if next < 0.0 {
            PageDirection::After
        } else {
            PageDirection::Before
        };
        self.drag_offset = if neighbors.has(revealing) {
            next
        } else {
            self.drag_offset + dx * PAGE_RUBBER_BAND
        };
    }

    /// Ends a drag, snapping to the neighbour when the swipe went far enough.
    pub fn release(&mut self, now: Instant, page_width: f32, neighbors: Neighbors) {
        if !self.dragging {
            return;
        }
        self.dragging = false;

        let stride = self.stride(page_width);
        let threshold = page_width * PAGE_SNAP_FRACTION;
        let turn = if self.drag_offset <= -threshold && neighbors.after {
            Some(PageDirection::After)
        } else if self.drag_offset >= threshold && neighbors.before {
            Some(PageDirection::Before)
        } else {
            None
        };
        self.settle_toward(now, turn, stride);
    }

    /// Springs back without turning.
    pub fn cancel(&mut self, now: Instant) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.settle_toward(now, None, 0.0);
    }

    /// Animated turn triggered without a drag (keyboard).
    pub fn turn(
        &mut self,
        direction: PageDirection,
        now: Instant,
        page_width: f32,
        neighbors: Neighbors,
    ) -> bool {
        if !self.is_idle() || !neighbors.has(direction) {
            return false;
        }
        self.settle_toward(now, Some(direction), self.stride(page_width));
        true
    }

    fn settle_toward(&mut self, now: Instant, turn: Option<PageDirection>, stride: f32) {
        let target = match turn {
            Some(PageDirection::After) => -stride,
            Some(PageDirection::Before) => stride,
            None => 0.0,
        };
        self.settle = Some(Settle {
            offset: Tween::new(self.drag_offset, target, now, self.duration, Easing::EaseOut),
            turn,
        });
    }

    /// Advances the settle animation. Returns the completed turn, if any.
    pub fn tick(&mut self, now: Instant) -> Option<PageDirection> {
        if !self
            .settle
            .as_ref()
            .is_some_and(|settle| settle.offset.is_finished(now))
        {
            return None;
        }
        let settle = self.settle.take()?;
        self.drag_offset = 0.0;
        if let Some(direction) = settle.turn {
            log::debug!("page turn to {direction:?} completed");
        }
        settle.turn
    }
}
