// SPDX-License-Identifier: MPL-2.0
//! Drag-driven, cancelable dismissal.
//!
//! ```text
//! Idle ──begin──▶ Armed ──update──▶ Tracking ──end──▶ Finishing ──┐
//!  ▲                 │                 │      └─────▶ Cancelling ──┤
//!  │                 └──── cancel ─────┴──── cancel ─────▶ ...     │
//!  └────────────────────── animation completed ◀───────────────────┘
//! ```
//!
//! The interactor is only offered to the runtime while it is `Armed` or
//! `Tracking`. The runtime then calls
//! [`DismissInteractor::start_interactive_transition`], after which gesture
//! updates move a floating snapshot of the page image. Ending the gesture
//! past the commit threshold (the top or bottom quarter of the destination
//! surface) finishes the dismissal; anything else rolls it back.

use super::{
    Snapshot, SnapshotFit, SurfaceFrame, ThumbnailView, TransitionContext, TransitionFrame,
    TransitionOutcome, Visibility, VisibilityToken,
};
use crate::animation::{Easing, Tween};
use crate::config::DISMISS_COMMIT_FRACTION;
use crate::geometry::{aspect_fit, below, center, offset_by};
use iced::{Rectangle, Vector};
use std::time::{Duration, Instant};

/// Coarse state of the interactor, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Armed,
    Tracking,
    Finishing,
    Cancelling,
}

/// Per-drag state, created on gesture begin and dropped once the
/// transition completes.
#[derive(Debug)]
struct DragSession {
    /// Where the dragged image was rendered when the gesture began.
    source_snapshot_origin: Rectangle,
    snapshot: Option<Snapshot>,
    live_offset: Vector,
    dim_alpha: f32,
    will_finish: bool,
    /// Supplied by the runtime once the dismissal actually starts.
    context: Option<TransitionContext>,
    hidden_target: Option<VisibilityToken>,
}

impl DragSession {
    fn new(source: ThumbnailView) -> Self {
        let snapshot = source.image.map(|image| Snapshot {
            image,
            frame: source.frame,
            fit: SnapshotFit::Contain,
        });
        Self {
            source_snapshot_origin: source.frame,
            snapshot,
            live_offset: Vector::ZERO,
            dim_alpha: 1.0,
            will_finish: false,
            context: None,
            hidden_target: None,
        }
    }

    fn destination(&self) -> Option<Rectangle> {
        self.context.as_ref().and_then(TransitionContext::to_view)
    }

    fn snapshot_frame(&self) -> Rectangle {
        self.snapshot
            .as_ref()
            .map_or(self.source_snapshot_origin, |snapshot| snapshot.frame)
    }

    /// Restores hidden views and signals completion, if a transition was
    /// ever started for this session.
    fn teardown(self, visibility: &mut Visibility, success: bool) -> Option<TransitionOutcome> {
        if let Some(token) = self.hidden_target {
            visibility.restore(token);
        }
        self.context
            .map(|context| context.complete_transition(success))
    }
}

/// The settle animation that resolves a drag into finish or cancel.
#[derive(Debug)]
struct Settle {
    session: DragSession,
    frame: Tween<Rectangle>,
    dim: Tween<f32>,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Armed(DragSession),
    Tracking(DragSession),
    Finishing(Settle),
    Cancelling(Settle),
}

#[derive(Debug)]
pub struct DismissInteractor {
    duration: Duration,
    /// Host thumbnail to fly back to; refreshed on every dismissal request.
    target: Option<ThumbnailView>,
    state: State,
}

impl DismissInteractor {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            target: None,
            state: State::Idle,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Armed(_) => Phase::Armed,
            State::Tracking(_) => Phase::Tracking,
            State::Finishing(_) => Phase::Finishing,
            State::Cancelling(_) => Phase::Cancelling,
        }
    }

    /// Whether a drag is genuinely in progress.
    #[must_use]
    pub fn has_started(&self) -> bool {
        matches!(self.state, State::Armed(_) | State::Tracking(_))
    }

    /// Whether the interactor owns a running transition or drag.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    #[must_use]
    pub fn will_finish(&self) -> bool {
        self.session().is_some_and(|session| session.will_finish)
    }

    #[must_use]
    pub fn dim_alpha(&self) -> Option<f32> {
        self.session().map(|session| session.dim_alpha)
    }

    #[must_use]
    pub fn live_offset(&self) -> Option<Vector> {
        self.session().map(|session| session.live_offset)
    }

    #[must_use]
    pub fn source_snapshot_origin(&self) -> Option<Rectangle> {
        self.session().map(|session| session.source_snapshot_origin)
    }

    /// Current frame of the dragged snapshot.
    #[must_use]
    pub fn snapshot_frame(&self) -> Option<Rectangle> {
        self.session().map(DragSession::snapshot_frame)
    }

    pub fn set_target(&mut self, target: Option<ThumbnailView>) {
        self.target = target;
    }

    fn session(&self) -> Option<&DragSession> {
        match &self.state {
            State::Armed(session) | State::Tracking(session) => Some(session),
            State::Finishing(settle) | State::Cancelling(settle) => Some(&settle.session),
            State::Idle => None,
        }
    }

    /// Gesture began on `source`. Ignored unless idle.
    pub fn begin(&mut self, source: ThumbnailView) -> bool {
        if !matches!(self.state, State::Idle) {
            log::warn!("dismiss drag began while {:?}, ignoring", self.phase());
            return false;
        }
        log::debug!("dismiss drag armed at {:?}", source.frame);
        self.state = State::Armed(DragSession::new(source));
        true
    }

    /// Called by the runtime once the dismissal has been requested.
    ///
    /// Without a destination surface the transition completes right away and
    /// the interactor returns to idle.
    pub fn start_interactive_transition(
        &mut self,
        context: TransitionContext,
        visibility: &mut Visibility,
    ) -> Option<TransitionOutcome> {
        if context.to_view().is_none() {
            log::warn!("interactive dismissal has no destination surface");
            let success = !context.transition_was_cancelled();
            let outcome = context.complete_transition(success);
            if let Some(session) = self.take_session() {
                let _ = session.teardown(visibility, success);
            }
            return Some(outcome);
        }

        match &mut self.state {
            State::Armed(session) | State::Tracking(session) if session.context.is_none() => {
                session.context = Some(context);
                None
            }
            _ => {
                log::warn!(
                    "interactive dismissal started while {:?}, cancelling it",
                    self.phase()
                );
                Some(context.complete_transition(false))
            }
        }
    }

    /// Gesture moved by `translation_y` since the previous update.
    pub fn update(&mut self, translation_y: f32, visibility: &mut Visibility) {
        let Some(mut session) = self.take_session() else {
            return;
        };

        if session.hidden_target.is_none() {
            session.hidden_target = self.target.as_ref().map(|target| visibility.hide(target.id));
        }

        session.live_offset.y += translation_y;
        let frame = offset_by(session.source_snapshot_origin, session.live_offset);
        if let Some(snapshot) = session.snapshot.as_mut() {
            snapshot.frame = frame;
        }

        // A collapsed surface (minimised window) keeps the last values.
        if let Some(destination) = session.destination().filter(|d| d.height > 0.0) {
            let height = destination.height;
            let center_y = center(frame).y;
            session.will_finish = center_y <= height * DISMISS_COMMIT_FRACTION
                || center_y >= height * (1.0 - DISMISS_COMMIT_FRACTION);
            let distance_to_edge = center_y.min(height - center_y);
            session.dim_alpha = (distance_to_edge / (height / 2.0)).clamp(0.0, 1.0);
        }

        self.state = State::Tracking(session);
    }

    /// Gesture ended: finish past the threshold, cancel otherwise.
    pub fn end(&mut self, now: Instant, visibility: &mut Visibility) -> Option<TransitionOutcome> {
        if self.will_finish() {
            self.finish(now, visibility)
        } else {
            self.cancel(now, visibility)
        }
    }

    /// Animates the snapshot onto the target thumbnail, or off screen.
    pub fn finish(&mut self, now: Instant, visibility: &mut Visibility) -> Option<TransitionOutcome> {
        let session = self.take_session()?;
        let start = session.snapshot_frame();

        let destination = session.destination();
        let target = self
            .target
            .as_ref()
            .and_then(|target| target.image.as_ref().map(|image| (target.frame, image.size)));

        let (from, to, fit, easing) = match (target, destination, session.snapshot.is_some()) {
            (Some((target_frame, image_size)), Some(_), true) => (
                aspect_fit(start, image_size),
                target_frame,
                SnapshotFit::Fill,
                Easing::Linear,
            ),
            (None, Some(destination), true) => {
                (start, below(destination), SnapshotFit::Contain, Easing::EaseInOut)
            }
            _ => {
                log::debug!("dismiss drag finished without animation");
                return session.teardown(visibility, true);
            }
        };

        let mut session = session;
        if let Some(snapshot) = session.snapshot.as_mut() {
            snapshot.fit = fit;
            snapshot.frame = from;
        }
        log::debug!("dismiss drag finishing toward {to:?}");
        self.state = State::Finishing(Settle {
            frame: Tween::new(from, to, now, self.duration, easing),
            dim: Tween::new(session.dim_alpha, 0.0, now, self.duration, easing),
            session,
        });
        None
    }

    /// Animates the snapshot back to where the drag began.
    ///
    /// Also the path for an explicit gesture cancellation.
    pub fn cancel(&mut self, now: Instant, visibility: &mut Visibility) -> Option<TransitionOutcome> {
        let session = self.take_session()?;

        if session.snapshot.is_none() || session.context.is_none() {
            log::debug!("dismiss drag cancelled without animation");
            return session.teardown(visibility, false);
        }

        let from = session.snapshot_frame();
        let to = session.source_snapshot_origin;
        log::debug!("dismiss drag cancelling back to {to:?}");
        self.state = State::Cancelling(Settle {
            frame: Tween::new(from, to, now, self.duration, Easing::Linear),
            dim: Tween::new(session.dim_alpha, 1.0, now, self.duration, Easing::Linear),
            session,
        });
        None
    }

    /// Advances the settle animation and completes the transition when done.
    pub fn tick(&mut self, now: Instant, visibility: &mut Visibility) -> Option<TransitionOutcome> {
        let finished = match &self.state {
            State::Finishing(settle) | State::Cancelling(settle) => settle.frame.is_finished(now),
            _ => false,
        };
        if !finished {
            return None;
        }

        match std::mem::take(&mut self.state) {
            State::Finishing(settle) => settle.session.teardown(visibility, true),
            State::Cancelling(settle) => settle.session.teardown(visibility, false),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// What to draw while the interactive transition is running.
    ///
    /// The host content covers the pages; the dimming overlay and the
    /// snapshot sit above it.
    #[must_use]
    pub fn frame(&self, now: Instant) -> Option<TransitionFrame> {
        let (session, dim_alpha, frame) = match &self.state {
            State::Armed(session) | State::Tracking(session) => {
                (session, session.dim_alpha, session.snapshot_frame())
            }
            State::Finishing(settle) | State::Cancelling(settle) => {
                (&settle.session, settle.dim.value(now), settle.frame.value(now))
            }
            State::Idle => return None,
        };
        session.context.as_ref()?;

        Some(TransitionFrame {
            surface: SurfaceFrame {
                visible: false,
                ..SurfaceFrame::default()
            },
            dim_alpha,
            snapshot: session.snapshot.as_ref().map(|snapshot| Snapshot {
                frame,
                ..snapshot.clone()
            }),
        })
    }

    /// Takes the live drag session out, leaving the interactor idle.
    /// Settling or idle interactors keep their state.
    fn take_session(&mut self) -> Option<DragSession> {
        match std::mem::take(&mut self.state) {
            State::Armed(session) | State::Tracking(session) => Some(session),
            other => {
                self.state = other;
                None
            }
        }
    }
}
