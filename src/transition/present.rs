// SPDX-License-Identifier: MPL-2.0
//! Non-interactive presentation: the tapped thumbnail flies into place.

use super::{
    AnimatedTransition, RenderedImage, Snapshot, SnapshotFit, SurfaceFrame, ThumbnailView,
    TransitionContext, TransitionFrame, TransitionOutcome, ViewId, Visibility, VisibilityToken,
};
use crate::animation::{Easing, Tween};
use crate::geometry::aspect_fit;
use iced::Rectangle;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct PresentAnimator {
    duration: Duration,
    source: Option<ThumbnailView>,
    running: Option<Running>,
}

#[derive(Debug)]
struct Running {
    context: TransitionContext,
    dim: Tween<f32>,
    motion: Motion,
}

#[derive(Debug)]
enum Motion {
    /// A clone of the source thumbnail flies to the page's image rect.
    Flying {
        image: RenderedImage,
        frame: Tween<Rectangle>,
        hidden: Vec<VisibilityToken>,
    },
    /// The page surface fades in over black.
    CrossFade { surface_alpha: Tween<f32> },
}

impl PresentAnimator {
    #[must_use]
    pub fn new(duration: Duration, source: Option<ThumbnailView>) -> Self {
        Self {
            duration,
            source,
            running: None,
        }
    }
}

impl AnimatedTransition for PresentAnimator {
    fn animate_transition(
        &mut self,
        context: TransitionContext,
        visibility: &mut Visibility,
        now: Instant,
    ) -> Option<TransitionOutcome> {
        let Some(to_view) = context.to_view() else {
            log::warn!("present transition has no destination surface");
            let success = !context.transition_was_cancelled();
            return Some(context.complete_transition(success));
        };

        let flying = self
            .source
            .as_ref()
            .and_then(|source| source.rendered().map(|(image, frame)| (source.id, image, frame)));

        let (dim, motion) = match flying {
            Some((source_id, image, source_frame)) => {
                let hidden = vec![
                    visibility.hide(ViewId::PREVIEW_SURFACE),
                    visibility.hide(source_id),
                ];
                let target = aspect_fit(to_view, image.size);
                (
                    Tween::new(0.0, 1.0, now, self.duration, Easing::Linear),
                    Motion::Flying {
                        image: image.clone(),
                        frame: Tween::new(source_frame, target, now, self.duration, Easing::Linear),
                        hidden,
                    },
                )
            }
            None => (
                Tween::new(0.0, 1.0, now, self.duration, Easing::EaseIn),
                Motion::CrossFade {
                    surface_alpha: Tween::new(0.0, 1.0, now, self.duration, Easing::EaseIn),
                },
            ),
        };

        self.running = Some(Running {
            context,
            dim,
            motion,
        });
        None
    }

    fn tick(&mut self, now: Instant, visibility: &mut Visibility) -> Option<TransitionOutcome> {
        let finished = match &self.running {
            Some(running) => running.dim.is_finished(now),
            None => return None,
        };
        if !finished {
            return None;
        }

        let running = self.running.take()?;
        if let Motion::Flying { hidden, .. } = running.motion {
            visibility.restore_all(hidden);
        }
        let success = !running.context.transition_was_cancelled();
        Some(running.context.complete_transition(success))
    }

    fn frame(&self, now: Instant) -> TransitionFrame {
        let Some(running) = &self.running else {
            return TransitionFrame::default();
        };

        match &running.motion {
            Motion::Flying { image, frame, .. } => TransitionFrame {
                surface: SurfaceFrame {
                    visible: false,
                    ..SurfaceFrame::default()
                },
                dim_alpha: running.dim.value(now),
                snapshot: Some(Snapshot {
                    image: image.clone(),
                    frame: frame.value(now),
                    fit: SnapshotFit::Fill,
                }),
            },
            Motion::CrossFade { surface_alpha } => TransitionFrame {
                surface: SurfaceFrame {
                    alpha: surface_alpha.value(now),
                    ..SurfaceFrame::default()
                },
                dim_alpha: running.dim.value(now),
                snapshot: None,
            },
        }
    }

    fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{rect, thumbnail};
    use crate::transition::TransitionDirection;

    const DURATION: Duration = Duration::from_millis(250);

    fn context() -> TransitionContext {
        let screen = rect(0.0, 0.0, 400.0, 800.0);
        TransitionContext::new(TransitionDirection::Present, screen).with_to_view(screen)
    }

    #[test]
    fn snapshot_flies_from_source_to_aspect_fit_rect() {
        let start = Instant::now();
        let mut visibility = Visibility::new();
        let source = thumbnail(7, rect(10.0, 10.0, 40.0, 30.0));
        let mut animator = PresentAnimator::new(DURATION, Some(source));

        assert!(animator
            .animate_transition(context(), &mut visibility, start)
            .is_none());
        assert!(visibility.is_hidden(ViewId(7)));
        assert!(visibility.is_hidden(ViewId::PREVIEW_SURFACE));

        let first = animator.frame(start);
        assert!(!first.surface.visible);
        assert_eq!(first.snapshot.as_ref().map(|s| s.frame), Some(rect(10.0, 10.0, 40.0, 30.0)));

        let last = animator.frame(start + DURATION);
        // 4:3 image in 400x800 -> 400x300 centered vertically.
        assert_eq!(last.snapshot.map(|s| s.frame), Some(rect(0.0, 250.0, 400.0, 300.0)));
        assert!((last.dim_alpha - 1.0).abs() < 1e-6);
    }

    #[test]
    fn completion_restores_views_and_reports_success() {
        let start = Instant::now();
        let mut visibility = Visibility::new();
        let source = thumbnail(7, rect(10.0, 10.0, 40.0, 30.0));
        let mut animator = PresentAnimator::new(DURATION, Some(source));
        let _ = animator.animate_transition(context(), &mut visibility, start);

        assert!(animator.tick(start + DURATION / 2, &mut visibility).is_none());
        let outcome = animator
            .tick(start + DURATION, &mut visibility)
            .expect("transition should complete");

        assert!(outcome.completed);
        assert!(visibility.all_visible());
        assert!(!animator.is_running());
        assert!(animator.tick(start + DURATION * 2, &mut visibility).is_none());
    }

    #[test]
    fn without_source_the_surface_cross_fades() {
        let start = Instant::now();
        let mut visibility = Visibility::new();
        let mut animator = PresentAnimator::new(DURATION, None);
        let _ = animator.animate_transition(context(), &mut visibility, start);

        assert!(visibility.all_visible());
        let frame = animator.frame(start);
        assert!(frame.surface.visible);
        assert!(frame.surface.alpha.abs() < 1e-6);
        assert!(frame.snapshot.is_none());
    }

    #[test]
    fn source_without_image_falls_back_to_cross_fade() {
        let start = Instant::now();
        let mut visibility = Visibility::new();
        let mut source = thumbnail(7, rect(10.0, 10.0, 40.0, 30.0));
        source.image = None;
        let mut animator = PresentAnimator::new(DURATION, Some(source));
        let _ = animator.animate_transition(context(), &mut visibility, start);

        assert!(!visibility.is_hidden(ViewId(7)));
        assert!(animator.frame(start).snapshot.is_none());
    }

    #[test]
    fn cancelled_context_reports_failure() {
        let start = Instant::now();
        let mut visibility = Visibility::new();
        let mut animator = PresentAnimator::new(DURATION, None);
        let mut ctx = context();
        ctx.cancel();
        let _ = animator.animate_transition(ctx, &mut visibility, start);

        let outcome = animator.tick(start + DURATION, &mut visibility);
        assert_eq!(outcome.map(|o| o.completed), Some(false));
    }

    #[test]
    fn missing_destination_completes_immediately() {
        let mut visibility = Visibility::new();
        let mut animator = PresentAnimator::new(DURATION, None);
        let ctx = TransitionContext::new(TransitionDirection::Present, rect(0.0, 0.0, 10.0, 10.0));

        let outcome = animator.animate_transition(ctx, &mut visibility, Instant::now());
        assert_eq!(outcome.map(|o| o.completed), Some(true));
        assert!(!animator.is_running());
    }
}
