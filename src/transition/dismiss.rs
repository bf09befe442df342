// SPDX-License-Identifier: MPL-2.0
//! Non-interactive dismissal, used when no drag is in progress (tap, Esc).

use super::{
    AnimatedTransition, RenderedImage, Snapshot, SnapshotFit, SurfaceFrame, ThumbnailView,
    TransitionContext, TransitionFrame, TransitionOutcome, Visibility, VisibilityToken,
};
use crate::animation::{Easing, Tween};
use crate::geometry::aspect_fit;
use iced::{Rectangle, Vector};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct DismissAnimator {
    duration: Duration,
    /// The page image view the dismissal started from.
    source: Option<ThumbnailView>,
    /// The host thumbnail to return to, if the current page is the opened one.
    target: Option<ThumbnailView>,
    running: Option<Running>,
}

#[derive(Debug)]
struct Running {
    context: TransitionContext,
    surface_alpha: Tween<f32>,
    motion: Motion,
}

#[derive(Debug)]
enum Motion {
    /// An image clone flies back onto the target thumbnail.
    ReturnToThumbnail {
        image: RenderedImage,
        frame: Tween<Rectangle>,
        hidden_target: VisibilityToken,
    },
    /// The whole surface drops off the bottom of the screen.
    SlideDown { offset: Tween<Vector> },
    FadeOut,
}

impl DismissAnimator {
    #[must_use]
    pub fn new(
        duration: Duration,
        source: Option<ThumbnailView>,
        target: Option<ThumbnailView>,
    ) -> Self {
        Self {
            duration,
            source,
            target,
            running: None,
        }
    }
}

impl AnimatedTransition for DismissAnimator {
    fn animate_transition(
        &mut self,
        context: TransitionContext,
        visibility: &mut Visibility,
        now: Instant,
    ) -> Option<TransitionOutcome> {
        let (Some(from_view), Some(_)) = (context.from_view(), context.to_view()) else {
            log::warn!("dismiss transition is missing a surface, completing immediately");
            let success = !context.transition_was_cancelled();
            return Some(context.complete_transition(success));
        };

        let source = self.source.as_ref().and_then(ThumbnailView::rendered);
        // Far enough for the surface top to clear the container's bottom edge.
        let container = context.container();
        let off_screen = container.y + container.height - from_view.y;

        let (easing, motion) = match (source, self.target.as_ref()) {
            (Some((image, source_frame)), Some(target)) => {
                let hidden_target = visibility.hide(target.id);
                let from = aspect_fit(source_frame, image.size);
                let to = aspect_fit(target.frame, image.size);
                (
                    Easing::Linear,
                    Motion::ReturnToThumbnail {
                        image: image.clone(),
                        frame: Tween::new(from, to, now, self.duration, Easing::Linear),
                        hidden_target,
                    },
                )
            }
            (Some(_), None) => (
                Easing::EaseOut,
                Motion::SlideDown {
                    offset: Tween::new(
                        Vector::ZERO,
                        Vector::new(0.0, off_screen),
                        now,
                        self.duration,
                        Easing::EaseOut,
                    ),
                },
            ),
            (None, _) => (Easing::EaseOut, Motion::FadeOut),
        };

        log::debug!(
            "dismiss animation started ({})",
            match &motion {
                Motion::ReturnToThumbnail { .. } => "return to thumbnail",
                Motion::SlideDown { .. } => "slide down",
                Motion::FadeOut => "fade out",
            }
        );

        self.running = Some(Running {
            context,
            surface_alpha: Tween::new(1.0, 0.0, now, self.duration, easing),
            motion,
        });
        None
    }

    fn tick(&mut self, now: Instant, visibility: &mut Visibility) -> Option<TransitionOutcome> {
        if !self
            .running
            .as_ref()
            .is_some_and(|running| running.surface_alpha.is_finished(now))
        {
            return None;
        }

        let running = self.running.take()?;
        if let Motion::ReturnToThumbnail { hidden_target, .. } = running.motion {
            visibility.restore(hidden_target);
        }
        let success = !running.context.transition_was_cancelled();
        Some(running.context.complete_transition(success))
    }

    fn frame(&self, now: Instant) -> TransitionFrame {
        let Some(running) = &self.running else {
            return TransitionFrame::default();
        };

        let alpha = running.surface_alpha.value(now);
        match &running.motion {
            Motion::ReturnToThumbnail { image, frame, .. } => TransitionFrame {
                surface: SurfaceFrame {
                    alpha,
                    ..SurfaceFrame::default()
                },
                dim_alpha: 0.0,
                snapshot: Some(Snapshot {
                    image: image.clone(),
                    frame: frame.value(now),
                    fit: SnapshotFit::Fill,
                }),
            },
            Motion::SlideDown { offset } => TransitionFrame {
                surface: SurfaceFrame {
                    visible: true,
                    alpha,
                    offset: offset.value(now),
                },
                dim_alpha: 0.0,
                snapshot: None,
            },
            Motion::FadeOut => TransitionFrame {
                surface: SurfaceFrame {
                    alpha,
                    ..SurfaceFrame::default()
                },
                dim_alpha: 0.0,
                snapshot: None,
            },
        }
    }

    fn is_running(&self) -> bool {
        self.running.is_some()
    }
}
