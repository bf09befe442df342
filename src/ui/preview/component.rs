// SPDX-License-Identifier: MPL-2.0
//! Preview component: the page host and transition provider.
//!
//! Owns the gallery, the page controllers, the pager and the dismiss
//! interactor, and drives them from pointer, keyboard and frame messages.

use super::content::PageContent;
use super::gesture::{GestureArbiter, PanPhase, PanRecognizer, PanUpdate, Tap, TapGestures};
use super::pager::{Neighbors, Pager};
use super::scene::{Indicator, PageLayer, Scene};
use super::{GalleryState, Options, PageDirection, PageSource};
use crate::config::{MIN_PAGE_CACHE_CAPACITY, WHEEL_ZOOM_STEP};
use crate::geometry::center;
use crate::media::{ImageLoader, LoadEvent, LoadPriority};
use crate::transition::{
    AnimatedTransition, AnimatorRequest, DismissAnimator, DismissInteractor, PresentAnimator,
    ThumbnailView, TransitionContext, TransitionDirection, TransitionFrame, TransitionOutcome,
    TransitionProvider, TransitionTarget, ViewId, Visibility,
};
use iced::widget::canvas;
use iced::{event, keyboard, window, Element, Length, Point, Rectangle, Size, Subscription, Task};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

/// Pointer input, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed(Point),
    Moved(Point),
    Released(Point),
    /// Vertical wheel delta in lines; positive zooms in.
    Wheel { delta_y: f32, at: Point },
    /// The pointer left the window.
    Left,
}

#[derive(Debug, Clone)]
pub enum Message {
    Frame(Instant),
    Pointer(PointerEvent),
    Key(keyboard::Key),
    Page { index: usize, event: LoadEvent },
    Resized(Size),
}

/// Side effects the host must apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Hide (`true`) or show the host navigation bar.
    NavigationBarHidden(bool),
    /// A page turn completed; carries the new current index.
    PageChanged(usize),
    /// The dismissal finished. The host drops the preview.
    Dismissed { restore_navigation_bar: bool },
}

impl Effect {
    /// Keeps `self` unless it is `None`.
    fn or(self, other: Effect) -> Effect {
        match self {
            Effect::None => other,
            effect => effect,
        }
    }
}

/// What triggered a dismissal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissBy {
    /// A tap or the Escape key.
    Touch,
    /// A vertical drag, handled by the interactor.
    Drag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Hidden,
    Presenting,
    Presented,
    Dismissing,
}

/// What the current pan gesture drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    None,
    Paging,
    Dismissing,
    Panning,
}

pub struct PhotoPreview {
    options: Options,
    gallery: GalleryState,
    loader: Arc<dyn ImageLoader>,
    pages: LruCache<usize, PageContent>,
    pager: Pager,
    pan: PanRecognizer,
    taps: TapGestures,
    drag: DragMode,
    interactor: DismissInteractor,
    transition: Option<Box<dyn AnimatedTransition>>,
    visibility: Visibility,
    /// Host thumbnail the preview was opened from.
    source: Option<ThumbnailView>,
    viewport: Rectangle,
    lifecycle: Lifecycle,
    now: Instant,
}

impl std::fmt::Debug for PhotoPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoPreview")
            .field("lifecycle", &self.lifecycle)
            .field("current_index", &self.gallery.current_index())
            .field("drag", &self.drag)
            .field("interactor", &self.interactor.phase())
            .finish_non_exhaustive()
    }
}

impl PhotoPreview {
    #[must_use]
    pub fn new(options: Options, loader: Arc<dyn ImageLoader>) -> Self {
        let capacity = NonZeroUsize::new(options.page_cache_capacity.max(MIN_PAGE_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            gallery: GalleryState::new(options.image_refs.clone(), options.start_index),
            loader,
            pages: LruCache::new(capacity),
            pager: Pager::new(options.spacing, options.animation_duration),
            pan: PanRecognizer::new(options.pan_slop),
            taps: TapGestures::new(options.double_tap_timeout),
            drag: DragMode::None,
            interactor: DismissInteractor::new(options.animation_duration),
            transition: None,
            visibility: Visibility::new(),
            source: None,
            viewport: Rectangle::new(Point::ORIGIN, Size::ZERO),
            lifecycle: Lifecycle::Hidden,
            now: Instant::now(),
            options,
        }
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub fn gallery(&self) -> &GalleryState {
        &self.gallery
    }

    #[must_use]
    pub fn interactor(&self) -> &DismissInteractor {
        &self.interactor
    }

    #[must_use]
    pub fn page(&self, index: usize) -> Option<&PageContent> {
        self.pages.peek(&index)
    }

    /// Whether a host view is currently covered by a transition.
    #[must_use]
    pub fn is_hidden(&self, id: ViewId) -> bool {
        self.visibility.is_hidden(id)
    }

    /// Updates the host thumbnail after the host re-laid it out.
    pub fn set_host_thumbnail(&mut self, thumbnail: Option<ThumbnailView>) {
        self.source = thumbnail;
    }

    /// Shows the preview, flying `source` into place when it has an image.
    pub fn present(
        &mut self,
        source: Option<ThumbnailView>,
        viewport: Rectangle,
        now: Instant,
    ) -> (Effect, Task<Message>) {
        if self.lifecycle != Lifecycle::Hidden {
            log::warn!("present requested while {:?}, ignoring", self.lifecycle);
            return (Effect::None, Task::none());
        }
        let Some(current) = self.gallery.current_index() else {
            log::warn!("present requested for an empty gallery, ignoring");
            return (Effect::None, Task::none());
        };

        self.now = now;
        self.viewport = viewport;
        let placeholder = source.as_ref().and_then(|source| source.image.clone());
        self.source = source;
        self.ensure_page(current, placeholder);
        let task = self.load_around(current);

        self.lifecycle = Lifecycle::Presenting;
        log::info!("presenting preview at page {current}");

        let context =
            TransitionContext::new(TransitionDirection::Present, viewport).with_to_view(viewport);
        let mut animator = self.animation_controller_for_presented();
        let effect = match animator.animate_transition(context, &mut self.visibility, now) {
            Some(outcome) => self.complete(outcome),
            None => {
                self.transition = Some(animator);
                Effect::None
            }
        };

        let effect = if self.options.hide_navigation_bar_while_presenting {
            Effect::NavigationBarHidden(true).or(effect)
        } else {
            effect
        };
        (effect, task)
    }

    /// Source and target views for a transition, resolved from the current page.
    #[must_use]
    pub fn resolve_target(&self) -> TransitionTarget {
        let source_view = self
            .gallery
            .current_index()
            .and_then(|index| self.pages.peek(&index))
            .map(|page| page.as_thumbnail_view(self.viewport));
        let target_view = if self.gallery.target_is_source() {
            self.source.clone()
        } else {
            None
        };
        TransitionTarget {
            source_view,
            target_view,
        }
    }

    #[must_use]
    pub fn animator_request(&self, direction: TransitionDirection) -> AnimatorRequest {
        AnimatorRequest {
            direction,
            interactive: direction == TransitionDirection::Dismiss
                && self.interactor.has_started(),
            target: self.resolve_target(),
        }
    }

    /// Starts the dismissal. Uses the interactor when a drag is armed.
    pub fn request_dismiss(&mut self, by: DismissBy) -> Effect {
        if self.lifecycle != Lifecycle::Presented {
            log::warn!("dismiss ({by:?}) requested while {:?}, ignoring", self.lifecycle);
            return Effect::None;
        }

        let target = self.resolve_target();
        self.interactor.set_target(target.target_view);
        self.lifecycle = Lifecycle::Dismissing;
        log::info!("dismissing preview ({by:?})");

        let context = TransitionContext::new(TransitionDirection::Dismiss, self.viewport)
            .with_from_view(self.viewport)
            .with_to_view(self.viewport);

        let outcome = if self.interaction_controller_for_dismissal().is_some() {
            self.interactor
                .start_interactive_transition(context, &mut self.visibility)
        } else {
            let mut animator = self.animation_controller_for_dismissed();
            let outcome = animator.animate_transition(context, &mut self.visibility, self.now);
            if outcome.is_none() {
                self.transition = Some(animator);
            }
            outcome
        };

        outcome.map_or(Effect::None, |outcome| self.complete(outcome))
    }

    pub fn handle_message(&mut self, message: Message) -> (Effect, Task<Message>) {
        let now = match &message {
            Message::Frame(at) => *at,
            _ => Instant::now(),
        };
        self.update_at(message, now)
    }

    fn update_at(&mut self, message: Message, now: Instant) -> (Effect, Task<Message>) {
        self.now = self.now.max(now);
        match message {
            Message::Frame(_) => self.tick(),
            Message::Pointer(pointer) => (self.handle_pointer(pointer), Task::none()),
            Message::Key(key) => (self.handle_key(&key), Task::none()),
            Message::Page { index, event } => {
                match self.pages.get_mut(&index) {
                    Some(page) => page.handle_load_event(event),
                    None => log::debug!("load event for evicted page {index} dropped"),
                }
                (Effect::None, Task::none())
            }
            Message::Resized(size) => {
                self.viewport = Rectangle::new(self.viewport.position(), size);
                (Effect::None, Task::none())
            }
        }
    }

    /// Whether frames are needed to advance an animation or a pending tap.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
            || self.interactor.is_active()
            || self.pager.is_settling()
            || self.taps.has_pending()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let frames = if self.is_animating() {
            window::frames().map(Message::Frame)
        } else {
            Subscription::none()
        };

        let input = event::listen_with(|event, status, _window| match event {
            iced::Event::Keyboard(keyboard::Event::KeyPressed { key, .. })
                if status == event::Status::Ignored =>
            {
                Some(Message::Key(key))
            }
            iced::Event::Window(window::Event::Resized(size)) => Some(Message::Resized(size)),
            _ => None,
        });

        Subscription::batch([frames, input])
    }

    pub fn view(&self) -> Element<'_, Message> {
        canvas(self.scene())
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn tick(&mut self) -> (Effect, Task<Message>) {
        let now = self.now;
        let mut effect = Effect::None;

        if let Some(animator) = self.transition.as_mut() {
            if let Some(outcome) = animator.tick(now, &mut self.visibility) {
                self.transition = None;
                effect = effect.or(self.complete(outcome));
            }
        }
        if let Some(outcome) = self.interactor.tick(now, &mut self.visibility) {
            effect = effect.or(self.complete(outcome));
        }

        let mut task = Task::none();
        if let Some(direction) = self.pager.tick(now) {
            let (turned, load) = self.complete_page_turn(direction);
            effect = effect.or(turned);
            task = load;
        }

        if let Some(tap) = self.taps.poll(now) {
            effect = effect.or(self.handle_tap(tap));
        }
        (effect, task)
    }

    /// Applies a finished transition to the lifecycle.
    fn complete(&mut self, outcome: TransitionOutcome) -> Effect {
        match (outcome.direction, outcome.completed) {
            (TransitionDirection::Present, _) => {
                self.lifecycle = Lifecycle::Presented;
                log::info!("preview presented");
                Effect::None
            }
            (TransitionDirection::Dismiss, true) => {
                self.lifecycle = Lifecycle::Hidden;
                self.drag = DragMode::None;
                log::info!("preview dismissed");
                Effect::Dismissed {
                    restore_navigation_bar: self.options.hide_navigation_bar_while_presenting,
                }
            }
            (TransitionDirection::Dismiss, false) => {
                self.lifecycle = Lifecycle::Presented;
                log::info!("preview dismissal cancelled");
                Effect::None
            }
        }
    }

    fn complete_page_turn(&mut self, direction: PageDirection) -> (Effect, Task<Message>) {
        let previous = self.gallery.current_index();
        let Some(current) = self.gallery.complete_page_transition(direction) else {
            return (Effect::None, Task::none());
        };
        if let Some(page) = previous.and_then(|index| self.pages.get_mut(&index)) {
            page.reset_zoom();
        }
        log::debug!("current page is now {current}");
        (Effect::PageChanged(current), self.load_around(current))
    }

    fn handle_pointer(&mut self, pointer: PointerEvent) -> Effect {
        let accepts_input =
            self.lifecycle == Lifecycle::Presented || self.drag == DragMode::Dismissing;
        if !accepts_input {
            return Effect::None;
        }

        match pointer {
            PointerEvent::Pressed(position) => {
                self.pan.press(position);
                Effect::None
            }
            PointerEvent::Moved(position) => self
                .pan
                .moved(position)
                .map_or(Effect::None, |update| self.handle_pan(update)),
            PointerEvent::Released(position) => {
                let was_pressed = self.pan.is_pressed();
                match self.pan.release(position) {
                    Some(update) => self.handle_pan(update),
                    None if was_pressed => self
                        .taps
                        .tap(position, self.now)
                        .map_or(Effect::None, |tap| self.handle_tap(tap)),
                    None => Effect::None,
                }
            }
            PointerEvent::Left => self
                .pan
                .cancel()
                .map_or(Effect::None, |update| self.handle_pan(update)),
            PointerEvent::Wheel { delta_y, at } => {
                if self.drag == DragMode::None {
                    let viewport = self.viewport;
                    if let Some(page) = self.current_page_mut() {
                        page.zoom_by(WHEEL_ZOOM_STEP.powf(delta_y), at, viewport);
                    }
                }
                Effect::None
            }
        }
    }

    fn handle_pan(&mut self, update: PanUpdate) -> Effect {
        let now = self.now;
        let viewport = self.viewport;
        match update.phase {
            PanPhase::Began => {
                self.taps.reset();
                self.begin_drag(update)
            }
            PanPhase::Changed => {
                self.continue_drag(update);
                Effect::None
            }
            PanPhase::Ended => {
                self.continue_drag(update);
                let mode = std::mem::replace(&mut self.drag, DragMode::None);
                match mode {
                    DragMode::Paging => {
                        let neighbors = self.neighbors();
                        self.pager.release(now, viewport.width, neighbors);
                        Effect::None
                    }
                    DragMode::Dismissing => self
                        .interactor
                        .end(now, &mut self.visibility)
                        .map_or(Effect::None, |outcome| self.complete(outcome)),
                    DragMode::Panning | DragMode::None => Effect::None,
                }
            }
            PanPhase::Cancelled => {
                let mode = std::mem::replace(&mut self.drag, DragMode::None);
                match mode {
                    DragMode::Paging => {
                        self.pager.cancel(now);
                        Effect::None
                    }
                    DragMode::Dismissing => self
                        .interactor
                        .cancel(now, &mut self.visibility)
                        .map_or(Effect::None, |outcome| self.complete(outcome)),
                    DragMode::Panning | DragMode::None => Effect::None,
                }
            }
        }
    }

    /// Decides what a new pan drives: zoomed pages pan, vertical drags
    /// dismiss and everything else pages.
    fn begin_drag(&mut self, update: PanUpdate) -> Effect {
        if self.pager.is_settling() {
            return Effect::None;
        }
        let viewport = self.viewport;
        let Some(page) = self.current_page() else {
            return Effect::None;
        };

        if !page.zoom().is_identity() {
            self.drag = DragMode::Panning;
            self.continue_drag(update);
            return Effect::None;
        }

        if page.should_begin_dismiss(update.translation) {
            let source = page.as_thumbnail_view(viewport);
            if !self.interactor.begin(source) {
                return Effect::None;
            }
            self.drag = DragMode::Dismissing;
            let effect = self.request_dismiss(DismissBy::Drag);
            if self.lifecycle != Lifecycle::Dismissing {
                // The request was refused or completed on the spot.
                self.drag = DragMode::None;
                let _ = self.interactor.cancel(self.now, &mut self.visibility);
                return effect;
            }
            self.continue_drag(update);
            return effect;
        }

        self.drag = DragMode::Paging;
        self.continue_drag(update);
        Effect::None
    }

    fn continue_drag(&mut self, update: PanUpdate) {
        let viewport = self.viewport;
        match self.drag {
            DragMode::Paging => {
                let neighbors = self.neighbors();
                self.pager.drag(update.translation.x, neighbors);
            }
            DragMode::Dismissing => self
                .interactor
                .update(update.translation.y, &mut self.visibility),
            DragMode::Panning => {
                if let Some(page) = self.current_page_mut() {
                    page.pan_by(update.translation, viewport);
                }
            }
            DragMode::None => {}
        }
    }

    fn handle_tap(&mut self, tap: Tap) -> Effect {
        if self.lifecycle != Lifecycle::Presented {
            return Effect::None;
        }
        match tap {
            Tap::Single(_) if self.options.dismiss_on_tap => self.request_dismiss(DismissBy::Touch),
            Tap::Single(_) => Effect::None,
            Tap::Double(position) => {
                let viewport = self.viewport;
                if let Some(page) = self.current_page_mut() {
                    page.double_tap(position, viewport);
                }
                Effect::None
            }
        }
    }

    fn handle_key(&mut self, key: &keyboard::Key) -> Effect {
        if self.lifecycle != Lifecycle::Presented || self.drag != DragMode::None {
            return Effect::None;
        }
        let direction = match key {
            keyboard::Key::Named(keyboard::key::Named::Escape) => {
                return self.request_dismiss(DismissBy::Touch);
            }
            keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => PageDirection::Before,
            keyboard::Key::Named(keyboard::key::Named::ArrowRight) => PageDirection::After,
            _ => return Effect::None,
        };
        let neighbors = self.neighbors();
        if !self
            .pager
            .turn(direction, self.now, self.viewport.width, neighbors)
        {
            log::debug!("page turn to {direction:?} not possible");
        }
        Effect::None
    }

    fn current_page(&self) -> Option<&PageContent> {
        self.gallery
            .current_index()
            .and_then(|index| self.pages.peek(&index))
    }

    fn current_page_mut(&mut self) -> Option<&mut PageContent> {
        let index = self.gallery.current_index()?;
        self.pages.get_mut(&index)
    }

    fn neighbors(&self) -> Neighbors {
        let Some(current) = self.gallery.current_index() else {
            return Neighbors::default();
        };
        Neighbors {
            before: self.gallery.neighbor(current, PageDirection::Before).is_some(),
            after: self.gallery.neighbor(current, PageDirection::After).is_some(),
        }
    }

    fn ensure_page(&mut self, index: usize, placeholder: Option<crate::transition::RenderedImage>) {
        if self.pages.contains(&index) {
            return;
        }
        let Some(descriptor) = self.gallery.page(index) else {
            return;
        };
        let page =
            PageContent::new(descriptor, self.options.max_zoom_scale).with_placeholder(placeholder);
        if let Some((evicted, _)) = self.pages.push(index, page) {
            if evicted != index {
                log::debug!("page {evicted} evicted from the page cache");
            }
        }
    }

    /// Builds the current page and its neighbours and starts their loads.
    fn load_around(&mut self, current: usize) -> Task<Message> {
        let mut tasks = vec![self.load_page(current, LoadPriority::High)];
        for direction in [PageDirection::Before, PageDirection::After] {
            if let Some(neighbor) = self.gallery.neighbor(current, direction) {
                self.ensure_page(neighbor.index, None);
                tasks.push(self.load_page(neighbor.index, LoadPriority::Normal));
            }
        }
        // Touch the current page last so the neighbours are evicted first.
        let _ = self.pages.get(&current);
        Task::batch(tasks)
    }

    fn load_page(&mut self, index: usize, priority: LoadPriority) -> Task<Message> {
        let Some(request) = self
            .pages
            .get_mut(&index)
            .and_then(|page| page.start_loading(priority))
        else {
            return Task::none();
        };
        log::debug!("loading page {index} ({priority:?})");
        Task::stream(self.loader.load(request)).map(move |event| Message::Page { index, event })
    }

    fn transition_frame(&self) -> TransitionFrame {
        if let Some(animator) = &self.transition {
            return animator.frame(self.now);
        }
        self.interactor.frame(self.now).unwrap_or_default()
    }

    fn page_bounds(&self, dx: f32) -> Rectangle {
        Rectangle {
            x: self.viewport.x + dx,
            ..self.viewport
        }
    }

    fn scene(&self) -> Scene {
        let offset = self.pager.offset(self.now);
        let stride = self.pager.stride(self.viewport.width);

        let mut pages = Vec::with_capacity(3);
        let mut indicator = None;
        if let Some(current) = self.gallery.current_index() {
            for step in [-1_isize, 0, 1] {
                let Some(index) = current.checked_add_signed(step) else {
                    continue;
                };
                let Some(page) = self.pages.peek(&index) else {
                    continue;
                };
                #[allow(clippy::cast_precision_loss)]
                let bounds = self.page_bounds(step as f32 * stride + offset);
                if let (Some(image), Some(frame)) = (page.displayed_image(), page.image_frame(bounds))
                {
                    pages.push(PageLayer {
                        handle: image.handle.clone(),
                        bounds: frame,
                    });
                }
                if step == 0 && page.is_indicator_visible() {
                    indicator = Some(Indicator {
                        center: center(bounds),
                        progress: page.progress(),
                    });
                }
            }
        }

        Scene {
            viewport: self.viewport,
            frame: self.transition_frame(),
            surface_hidden: self.visibility.is_hidden(ViewId::PREVIEW_SURFACE),
            pages,
            indicator,
        }
    }
}

impl TransitionProvider for PhotoPreview {
    fn animation_controller_for_presented(&self) -> Box<dyn AnimatedTransition> {
        Box::new(PresentAnimator::new(
            self.options.animation_duration,
            self.source.clone(),
        ))
    }

    fn animation_controller_for_dismissed(&self) -> Box<dyn AnimatedTransition> {
        let target = self.resolve_target();
        Box::new(DismissAnimator::new(
            self.options.animation_duration,
            target.source_view,
            target.target_view,
        ))
    }

    fn interaction_controller_for_dismissal(&mut self) -> Option<&mut DismissInteractor> {
        self.interactor.has_started().then_some(&mut self.interactor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{ImageRef, LoadRequest};
    use crate::test_utils::{rect, thumbnail};
    use crate::transition::Phase;
    use futures_util::stream::{self, BoxStream, StreamExt};
    use std::time::Duration;

    const DURATION: Duration = Duration::from_millis(250);

    #[derive(Debug)]
    struct IdleLoader;

    impl ImageLoader for IdleLoader {
        fn load(&self, _request: LoadRequest) -> BoxStream<'static, LoadEvent> {
            stream::empty().boxed()
        }
    }

    fn refs(count: usize) -> Vec<ImageRef> {
        (0..count)
            .map(|i| ImageRef::Path(format!("{i}.png").into()))
            .collect()
    }

    fn screen() -> Rectangle {
        rect(0.0, 0.0, 400.0, 800.0)
    }

    fn preview(options: Options) -> PhotoPreview {
        PhotoPreview::new(options, Arc::new(IdleLoader))
    }

    /// A preview opened on `start` from host thumbnail `start`, fully presented.
    fn presented(count: usize, start: usize) -> (PhotoPreview, Instant) {
        let now = Instant::now();
        let mut preview = preview(Options::new(refs(count)).start_index(start));
        let source = thumbnail(start as u64, rect(10.0, 10.0, 40.0, 30.0));
        let _ = preview.present(Some(source), screen(), now);
        let later = now + DURATION;
        let _ = preview.update_at(Message::Frame(later), later);
        assert_eq!(preview.lifecycle(), Lifecycle::Presented);
        (preview, later)
    }

    fn pointer(preview: &mut PhotoPreview, event: PointerEvent, now: Instant) -> Effect {
        preview.update_at(Message::Pointer(event), now).0
    }

    #[test]
    fn present_hides_source_and_builds_neighbours() {
        let now = Instant::now();
        let mut preview = preview(Options::new(refs(5)).start_index(2));
        let source = thumbnail(2, rect(10.0, 10.0, 40.0, 30.0));
        let (effect, _) = preview.present(Some(source), screen(), now);

        assert_eq!(effect, Effect::None);
        assert_eq!(preview.lifecycle(), Lifecycle::Presenting);
        assert!(preview.is_hidden(ViewId(2)));
        for index in 1..=3 {
            assert!(preview.page(index).is_some(), "page {index} should exist");
        }
        assert!(preview.page(2).is_some_and(|p| p.displayed_image().is_some()));
        assert!(preview.page(1).is_some_and(|p| p.displayed_image().is_none()));

        let later = now + DURATION;
        let _ = preview.update_at(Message::Frame(later), later);
        assert_eq!(preview.lifecycle(), Lifecycle::Presented);
        assert!(!preview.is_hidden(ViewId(2)));
    }

    #[test]
    fn hidden_navigation_bar_is_requested_and_restored() {
        let now = Instant::now();
        let options = Options::new(refs(1)).hide_navigation_bar_while_presenting(true);
        let mut preview = preview(options);
        let (effect, _) = preview.present(None, screen(), now);
        assert_eq!(effect, Effect::NavigationBarHidden(true));

        let later = now + DURATION;
        let _ = preview.update_at(Message::Frame(later), later);
        assert_eq!(preview.request_dismiss(DismissBy::Touch), Effect::None);

        let done = later + DURATION;
        let (effect, _) = preview.update_at(Message::Frame(done), done);
        assert_eq!(
            effect,
            Effect::Dismissed {
                restore_navigation_bar: true
            }
        );
        assert_eq!(preview.lifecycle(), Lifecycle::Hidden);
    }

    #[test]
    fn target_resolves_only_on_the_opened_page() {
        let (mut preview, now) = presented(8, 2);
        let request = preview.animator_request(TransitionDirection::Dismiss);
        assert!(!request.interactive);
        assert_eq!(request.target.target_view.map(|view| view.id), Some(ViewId(2)));
        assert!(request.target.source_view.is_some());

        let mut at = now;
        for _ in 0..3 {
            let _ = preview.update_at(
                Message::Key(keyboard::Key::Named(keyboard::key::Named::ArrowRight)),
                at,
            );
            at += DURATION;
            let _ = preview.update_at(Message::Frame(at), at);
        }
        assert_eq!(preview.gallery().current_index(), Some(5));
        assert!(preview.resolve_target().target_view.is_none());
    }

    #[test]
    fn keyboard_turn_changes_index_only_when_settled() {
        let (mut preview, now) = presented(3, 0);
        let _ = preview.update_at(
            Message::Key(keyboard::Key::Named(keyboard::key::Named::ArrowLeft)),
            now,
        );
        assert_eq!(preview.gallery().current_index(), Some(0));

        let _ = preview.update_at(
            Message::Key(keyboard::Key::Named(keyboard::key::Named::ArrowRight)),
            now,
        );
        assert_eq!(preview.gallery().current_index(), Some(0));
        let (effect, _) = preview.update_at(Message::Frame(now + DURATION), now + DURATION);
        assert_eq!(effect, Effect::PageChanged(1));
        assert!(preview.page(2).is_some());
    }

    #[test]
    fn single_tap_dismisses_after_double_tap_timeout() {
        let (mut preview, now) = presented(3, 1);
        let at = Point::new(200.0, 400.0);
        let _ = pointer(&mut preview, PointerEvent::Pressed(at), now);
        let _ = pointer(&mut preview, PointerEvent::Released(at), now);
        assert_eq!(preview.lifecycle(), Lifecycle::Presented);
        assert!(preview.is_animating());

        let later = now + Duration::from_millis(400);
        let _ = preview.update_at(Message::Frame(later), later);
        assert_eq!(preview.lifecycle(), Lifecycle::Dismissing);
    }

    #[test]
    fn tap_is_ignored_when_dismiss_on_tap_is_off() {
        let now = Instant::now();
        let mut preview = preview(Options::new(refs(2)).dismiss_on_tap(false));
        let _ = preview.present(None, screen(), now);
        let now = now + DURATION;
        let _ = preview.update_at(Message::Frame(now), now);

        let at = Point::new(200.0, 400.0);
        let _ = pointer(&mut preview, PointerEvent::Pressed(at), now);
        let _ = pointer(&mut preview, PointerEvent::Released(at), now);
        let later = now + Duration::from_millis(400);
        let _ = preview.update_at(Message::Frame(later), later);
        assert_eq!(preview.lifecycle(), Lifecycle::Presented);
    }

    #[test]
    fn double_tap_zooms_and_blocks_dismiss_drag() {
        let (mut preview, now) = presented(3, 1);
        let at = Point::new(200.0, 400.0);
        for _ in 0..2 {
            let _ = pointer(&mut preview, PointerEvent::Pressed(at), now);
            let _ = pointer(&mut preview, PointerEvent::Released(at), now);
        }
        assert!(preview.page(1).is_some_and(|p| !p.zoom().is_identity()));

        let _ = pointer(&mut preview, PointerEvent::Pressed(at), now);
        let _ = pointer(&mut preview, PointerEvent::Moved(Point::new(200.0, 500.0)), now);
        assert_eq!(preview.interactor().phase(), Phase::Idle);
        assert_eq!(preview.lifecycle(), Lifecycle::Presented);
    }

    #[test]
    fn vertical_drag_past_threshold_dismisses_onto_thumbnail() {
        let (mut preview, now) = presented(3, 1);
        let _ = pointer(&mut preview, PointerEvent::Pressed(Point::new(200.0, 400.0)), now);
        let _ = pointer(&mut preview, PointerEvent::Moved(Point::new(200.0, 420.0)), now);

        assert_eq!(preview.lifecycle(), Lifecycle::Dismissing);
        assert_eq!(preview.interactor().phase(), Phase::Tracking);
        assert!(preview.animator_request(TransitionDirection::Dismiss).interactive);
        assert!(preview.is_hidden(ViewId(1)));

        let _ = pointer(&mut preview, PointerEvent::Moved(Point::new(200.0, 650.0)), now);
        assert!(preview.interactor().will_finish());
        let _ = pointer(&mut preview, PointerEvent::Released(Point::new(200.0, 650.0)), now);
        assert_eq!(preview.interactor().phase(), Phase::Finishing);

        let done = now + DURATION;
        let (effect, _) = preview.update_at(Message::Frame(done), done);
        assert_eq!(
            effect,
            Effect::Dismissed {
                restore_navigation_bar: false
            }
        );
        assert_eq!(preview.interactor().phase(), Phase::Idle);
        assert!(!preview.is_hidden(ViewId(1)));
    }

    #[test]
    fn short_vertical_drag_cancels_back_to_presented() {
        let (mut preview, now) = presented(3, 1);
        let _ = pointer(&mut preview, PointerEvent::Pressed(Point::new(200.0, 400.0)), now);
        let _ = pointer(&mut preview, PointerEvent::Moved(Point::new(200.0, 450.0)), now);
        let _ = pointer(&mut preview, PointerEvent::Released(Point::new(200.0, 460.0)), now);
        assert_eq!(preview.interactor().phase(), Phase::Cancelling);

        let done = now + DURATION;
        let (effect, _) = preview.update_at(Message::Frame(done), done);
        assert_eq!(effect, Effect::None);
        assert_eq!(preview.lifecycle(), Lifecycle::Presented);
        assert_eq!(preview.interactor().phase(), Phase::Idle);
        assert!(!preview.is_hidden(ViewId(1)));
    }

    #[test]
    fn pointer_leaving_cancels_the_dismiss_drag() {
        let (mut preview, now) = presented(3, 1);
        let _ = pointer(&mut preview, PointerEvent::Pressed(Point::new(200.0, 400.0)), now);
        let _ = pointer(&mut preview, PointerEvent::Moved(Point::new(200.0, 700.0)), now);
        let _ = pointer(&mut preview, PointerEvent::Left, now);
        assert_eq!(preview.interactor().phase(), Phase::Cancelling);
    }

    #[test]
    fn horizontal_swipe_turns_the_page() {
        let (mut preview, now) = presented(3, 1);
        let _ = pointer(&mut preview, PointerEvent::Pressed(Point::new(300.0, 400.0)), now);
        let _ = pointer(&mut preview, PointerEvent::Moved(Point::new(100.0, 405.0)), now);
        let _ = pointer(&mut preview, PointerEvent::Released(Point::new(100.0, 405.0)), now);
        assert_eq!(preview.interactor().phase(), Phase::Idle);
        assert_eq!(preview.gallery().current_index(), Some(1));

        let done = now + DURATION;
        let (effect, _) = preview.update_at(Message::Frame(done), done);
        assert_eq!(effect, Effect::PageChanged(2));
    }

    #[test]
    fn tiny_page_cache_keeps_the_current_page() {
        let now = Instant::now();
        let mut options = Options::new(refs(3)).start_index(1);
        options.page_cache_capacity = 1;
        let mut preview = preview(options);
        let source = thumbnail(1, rect(10.0, 10.0, 40.0, 30.0));
        let _ = preview.present(Some(source), screen(), now);
        let now = now + DURATION;
        let _ = preview.update_at(Message::Frame(now), now);
        for index in 0..3 {
            assert!(preview.page(index).is_some(), "page {index} should exist");
        }

        let _ = pointer(&mut preview, PointerEvent::Pressed(Point::new(200.0, 400.0)), now);
        let _ = pointer(&mut preview, PointerEvent::Moved(Point::new(200.0, 450.0)), now);
        assert_eq!(preview.interactor().phase(), Phase::Tracking);
    }

    #[test]
    fn second_dismiss_request_is_ignored() {
        let (mut preview, _) = presented(2, 0);
        assert_eq!(preview.request_dismiss(DismissBy::Touch), Effect::None);
        assert_eq!(preview.lifecycle(), Lifecycle::Dismissing);
        assert_eq!(preview.request_dismiss(DismissBy::Touch), Effect::None);
        assert_eq!(preview.lifecycle(), Lifecycle::Dismissing);
    }

    #[test]
    fn empty_gallery_never_presents() {
        let mut preview = preview(Options::new(Vec::new()));
        let (effect, _) = preview.present(None, screen(), Instant::now());
        assert_eq!(effect, Effect::None);
        assert_eq!(preview.lifecycle(), Lifecycle::Hidden);
    }

    #[test]
    fn scene_hides_surface_during_interactive_dismissal() {
        let (mut preview, now) = presented(3, 1);
        assert!(preview.scene().frame.surface.visible);

        let _ = pointer(&mut preview, PointerEvent::Pressed(Point::new(200.0, 400.0)), now);
        let _ = pointer(&mut preview, PointerEvent::Moved(Point::new(200.0, 500.0)), now);
        let scene = preview.scene();
        assert!(!scene.frame.surface.visible);
        assert!(scene.frame.snapshot.is_some());
    }
}
