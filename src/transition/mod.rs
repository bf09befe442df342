// SPDX-License-Identifier: MPL-2.0
//! Present/dismiss transitions of the preview overlay.
//!
//! The overlay acts as its own transition runtime: it builds a
//! [`TransitionContext`] for every presentation or dismissal and hands it to
//! an animator ([`PresentAnimator`], [`DismissAnimator`]) or to the
//! [`DismissInteractor`] when a drag is in progress. The context is consumed
//! by [`TransitionContext::complete_transition`], so a transition can only be
//! completed once.
//!
//! ```text
//! TransitionProvider (preview component)
//!     ├── PresentAnimator   - thumbnail flies into place
//!     ├── DismissAnimator   - thumbnail flies back / surface slides away
//!     └── DismissInteractor - drag-driven, cancelable dismissal
//! ```

pub mod dismiss;
pub mod interactor;
pub mod present;
pub mod visibility;

pub use dismiss::DismissAnimator;
pub use interactor::{DismissInteractor, Phase};
pub use present::PresentAnimator;
pub use visibility::{Visibility, VisibilityToken};

use iced::widget::image::Handle;
use iced::{Rectangle, Size, Vector};
use std::time::Instant;

/// Identifies a view that can be hidden while a transition covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl ViewId {
    /// The overlay's own page surface.
    pub const PREVIEW_SURFACE: ViewId = ViewId(u64::MAX);
}

/// An image as currently drawn on screen, with its intrinsic size.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub handle: Handle,
    pub size: Size,
}

/// A view that shows an image: a host thumbnail or a page's image surface.
#[derive(Debug, Clone)]
pub struct ThumbnailView {
    pub id: ViewId,
    /// Frame in window coordinates.
    pub frame: Rectangle,
    pub image: Option<RenderedImage>,
}

impl ThumbnailView {
    /// The image together with the view frame, if the view shows one.
    #[must_use]
    pub fn rendered(&self) -> Option<(&RenderedImage, Rectangle)> {
        self.image.as_ref().map(|image| (image, self.frame))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    Present,
    Dismiss,
}

/// Views a transition animates between, resolved once per request.
#[derive(Debug, Clone, Default)]
pub struct TransitionTarget {
    pub source_view: Option<ThumbnailView>,
    /// Only present when the current page is the one the preview opened on.
    pub target_view: Option<ThumbnailView>,
}

/// What the provider hands to the runtime for one request. Derived, never stored.
#[derive(Debug, Clone)]
pub struct AnimatorRequest {
    pub direction: TransitionDirection,
    pub interactive: bool,
    pub target: TransitionTarget,
}

/// Result of a completed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub direction: TransitionDirection,
    /// `true` when the transition finished, `false` when it was cancelled.
    pub completed: bool,
}

/// Everything an animator may touch during one transition.
#[must_use = "a transition context must be completed"]
#[derive(Debug)]
pub struct TransitionContext {
    direction: TransitionDirection,
    container: Rectangle,
    from_view: Option<Rectangle>,
    to_view: Option<Rectangle>,
    cancelled: bool,
}

impl TransitionContext {
    pub fn new(direction: TransitionDirection, container: Rectangle) -> Self {
        Self {
            direction,
            container,
            from_view: None,
            to_view: None,
            cancelled: false,
        }
    }

    /// Sets the departing surface frame.
    pub fn with_from_view(mut self, frame: Rectangle) -> Self {
        self.from_view = Some(frame);
        self
    }

    /// Sets the arriving surface frame.
    pub fn with_to_view(mut self, frame: Rectangle) -> Self {
        self.to_view = Some(frame);
        self
    }

    #[must_use]
    pub fn direction(&self) -> TransitionDirection {
        self.direction
    }

    #[must_use]
    pub fn container(&self) -> Rectangle {
        self.container
    }

    #[must_use]
    pub fn from_view(&self) -> Option<Rectangle> {
        self.from_view
    }

    #[must_use]
    pub fn to_view(&self) -> Option<Rectangle> {
        self.to_view
    }

    /// Marks the transition as cancelled by the runtime.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub fn transition_was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Signals the end of the transition. Consumes the context.
    pub fn complete_transition(self, success: bool) -> TransitionOutcome {
        log::debug!(
            "{:?} transition completed (success: {success})",
            self.direction
        );
        TransitionOutcome {
            direction: self.direction,
            completed: success,
        }
    }
}

/// How a snapshot image is laid out inside its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotFit {
    /// The frame already has the image aspect ratio.
    #[default]
    Fill,
    /// The image is aspect-fitted inside the frame.
    Contain,
}

/// A floating clone of an image used while a transition runs.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub image: RenderedImage,
    pub frame: Rectangle,
    pub fit: SnapshotFit,
}

impl Snapshot {
    /// Where the image pixels actually land.
    #[must_use]
    pub fn image_bounds(&self) -> Rectangle {
        match self.fit {
            SnapshotFit::Fill => self.frame,
            SnapshotFit::Contain => crate::geometry::aspect_fit(self.frame, self.image.size),
        }
    }
}

/// How the overlay's page surface (black background and pages) is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceFrame {
    pub visible: bool,
    pub alpha: f32,
    pub offset: Vector,
}

impl Default for SurfaceFrame {
    fn default() -> Self {
        Self {
            visible: true,
            alpha: 1.0,
            offset: Vector::ZERO,
        }
    }
}

/// Render description of one animation frame.
///
/// Drawn bottom to top: host content, page surface, dimming overlay, snapshot.
#[derive(Debug, Clone, Default)]
pub struct TransitionFrame {
    pub surface: SurfaceFrame,
    /// Opacity of the extra black dimming overlay.
    pub dim_alpha: f32,
    pub snapshot: Option<Snapshot>,
}

/// A one-shot, time-driven transition.
pub trait AnimatedTransition: std::fmt::Debug {
    /// Starts animating. Returns an outcome when the transition completes
    /// immediately (for instance when a required surface is missing).
    fn animate_transition(
        &mut self,
        context: TransitionContext,
        visibility: &mut Visibility,
        now: Instant,
    ) -> Option<TransitionOutcome>;

    /// Advances the animation; returns the outcome once, when it completes.
    fn tick(&mut self, now: Instant, visibility: &mut Visibility) -> Option<TransitionOutcome>;

    /// What to draw at `now`.
    fn frame(&self, now: Instant) -> TransitionFrame;

    fn is_running(&self) -> bool;
}

/// Supplies animators and the interactive controller to the runtime.
pub trait TransitionProvider {
    fn animation_controller_for_presented(&self) -> Box<dyn AnimatedTransition>;

    fn animation_controller_for_dismissed(&self) -> Box<dyn AnimatedTransition>;

    /// The interactor, only while a dismiss drag is armed or tracking.
    fn interaction_controller_for_dismissal(&mut self) -> Option<&mut DismissInteractor>;
}
