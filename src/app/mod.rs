// SPDX-License-Identifier: MPL-2.0
//! Demo host: a thumbnail grid under a navigation bar, with the photo
//! preview presented on top when a thumbnail is clicked.
//!
//! The host owns the image loader and shares it with every preview it
//! presents, so thumbnails loaded for the grid are served from memory when
//! the preview asks for them.

pub mod grid;
mod message;

pub use message::{Flags, Message};

use crate::config::{self, Config};
use crate::error::Result;
use crate::media::{DefaultImageLoader, ImageLoader, ImageRef, LoadEvent, LoadPriority, LoadRequest};
use crate::transition::{RenderedImage, ThumbnailView, ViewId};
use crate::ui::preview::{Effect, Options, PhotoPreview};
use grid::{Cell, ThumbnailGrid};
use iced::widget::{canvas, container, text, Stack};
use iced::{
    event, window, Background, Color, Element, Length, Point, Rectangle, Size, Subscription, Task,
    Theme,
};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

pub const WINDOW_DEFAULT_WIDTH: u32 = 800;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 650;
pub const MIN_WINDOW_WIDTH: u32 = 320;
pub const MIN_WINDOW_HEIGHT: u32 = 320;
pub const NAV_BAR_HEIGHT: f32 = 48.0;

/// Root Iced application state of the demo host.
pub struct App {
    config: Config,
    images: Vec<ImageRef>,
    thumbnails: Vec<Option<RenderedImage>>,
    loader: Arc<dyn ImageLoader>,
    preview: Option<PhotoPreview>,
    nav_bar_hidden: bool,
    window_size: Size,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("images", &self.images.len())
            .field("preview", &self.preview)
            .finish()
    }
}

/// Builds the window settings
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(Size::new(MIN_WINDOW_WIDTH as f32, MIN_WINDOW_HEIGHT as f32)),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> Result<()> {
    use std::cell::RefCell;

    let (config, _warning) = config::load();
    let loader: Arc<dyn ImageLoader> =
        Arc::new(DefaultImageLoader::new(config.image_cache_capacity())?);

    // iced requires a `Fn` boot function; the flags are consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags, config.clone(), Arc::clone(&loader))
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()?;
    Ok(())
}

impl App {
    fn new(flags: Flags, config: Config, loader: Arc<dyn ImageLoader>) -> (Self, Task<Message>) {
        let images: Vec<ImageRef> = flags
            .images
            .iter()
            .filter_map(|raw| match ImageRef::parse(raw) {
                Ok(image_ref) => Some(image_ref),
                Err(err) => {
                    log::warn!("skipping {raw}: {err}");
                    None
                }
            })
            .collect();
        log::info!("gallery of {} images", images.len());

        let mut app = App {
            config,
            thumbnails: vec![None; images.len()],
            images,
            loader,
            preview: None,
            nav_bar_hidden: false,
            window_size: Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        };

        let mut tasks = app
            .images
            .iter()
            .enumerate()
            .map(|(index, image_ref)| {
                let request = LoadRequest::new(image_ref.clone(), LoadPriority::Normal);
                Task::stream(app.loader.load(request))
                    .map(move |event| Message::Thumbnail { index, event })
            })
            .collect::<Vec<_>>();

        if let Some(index) = flags.start {
            tasks.push(app.present(index));
        }
        (app, Task::batch(tasks))
    }

    fn title(&self) -> String {
        match self.preview.as_ref().and_then(|p| p.gallery().current_index()) {
            Some(index) => format!("Iced Preview - {} / {}", index + 1, self.images.len()),
            None => String::from("Iced Preview"),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Thumbnail { index, event } => {
                if let LoadEvent::Completed { result, .. } = event {
                    match result {
                        Ok(image) => {
                            if let Some(slot) = self.thumbnails.get_mut(index) {
                                *slot = Some(RenderedImage {
                                    size: image.size(),
                                    handle: image.handle,
                                });
                            }
                        }
                        Err(err) => log::warn!("thumbnail {index} failed: {err}"),
                    }
                }
                Task::none()
            }
            Message::ThumbnailPressed(index) => self.present(index),
            Message::Preview(message) => {
                let Some(preview) = self.preview.as_mut() else {
                    return Task::none();
                };
                let (effect, task) = preview.handle_message(message);
                self.apply(effect);
                task.map(Message::Preview)
            }
            Message::WindowResized(size) => {
                self.window_size = size;
                let opened_at = self
                    .preview
                    .as_ref()
                    .map(|preview| preview.gallery().opened_at_index());
                if let Some(index) = opened_at {
                    let thumbnail = self.thumbnail_view(index);
                    if let Some(preview) = self.preview.as_mut() {
                        preview.set_host_thumbnail(thumbnail);
                    }
                }
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let cells = self
            .cells()
            .into_iter()
            .enumerate()
            .map(|(index, bounds)| Cell {
                bounds,
                image: self.thumbnails.get(index).and_then(Option::as_ref),
                hidden: self
                    .preview
                    .as_ref()
                    .is_some_and(|preview| preview.is_hidden(view_id(index))),
            })
            .collect();

        let mut layers = Stack::new().push(
            canvas(ThumbnailGrid { cells })
                .width(Length::Fill)
                .height(Length::Fill),
        );

        if !self.nav_bar_hidden {
            layers = layers.push(
                container(text(format!("{} photos", self.images.len())).size(18))
                    .padding(12)
                    .width(Length::Fill)
                    .height(Length::Fixed(NAV_BAR_HEIGHT))
                    .style(nav_bar),
            );
        }

        if let Some(preview) = &self.preview {
            layers = layers.push(preview.view().map(Message::Preview));
        }

        layers.into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let resize = event::listen_with(|event, _status, _window| match event {
            iced::Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
            _ => None,
        });
        let preview = self
            .preview
            .as_ref()
            .map_or_else(Subscription::none, |preview| {
                preview.subscription().map(Message::Preview)
            });
        Subscription::batch([resize, preview])
    }

    fn present(&mut self, index: usize) -> Task<Message> {
        if self.preview.is_some() {
            log::warn!("preview already shown, ignoring thumbnail {index}");
            return Task::none();
        }
        if index >= self.images.len() {
            log::warn!("no image at index {index}");
            return Task::none();
        }

        let options = Options::from_config(self.images.clone(), &self.config).start_index(index);
        let mut preview = PhotoPreview::new(options, Arc::clone(&self.loader));
        let viewport = Rectangle::new(Point::ORIGIN, self.window_size);
        let (effect, task) = preview.present(self.thumbnail_view(index), viewport, Instant::now());
        self.preview = Some(preview);
        self.apply(effect);
        task.map(Message::Preview)
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::NavigationBarHidden(hidden) => self.nav_bar_hidden = hidden,
            Effect::PageChanged(index) => log::debug!("preview moved to image {index}"),
            Effect::Dismissed {
                restore_navigation_bar,
            } => {
                if restore_navigation_bar {
                    self.nav_bar_hidden = false;
                }
                self.preview = None;
            }
        }
    }

    fn cells(&self) -> Vec<Rectangle> {
        let area = Rectangle::new(
            Point::new(0.0, NAV_BAR_HEIGHT),
            Size::new(
                self.window_size.width,
                (self.window_size.height - NAV_BAR_HEIGHT).max(0.0),
            ),
        );
        grid::layout(self.images.len(), area)
    }

    /// The grid thumbnail at `index` as a transition endpoint.
    fn thumbnail_view(&self, index: usize) -> Option<ThumbnailView> {
        let cell = *self.cells().get(index)?;
        let image = self.thumbnails.get(index).cloned().flatten();
        Some(ThumbnailView {
            id: view_id(index),
            frame: grid::image_frame(cell, image.as_ref()),
            image,
        })
    }
}

#[allow(clippy::cast_possible_truncation)]
fn view_id(index: usize) -> ViewId {
    ViewId(index as u64)
}

fn nav_bar(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    let base = palette.background.weak.color;

    container::Style {
        background: Some(Background::Color(Color { a: 0.95, ..base })),
        text_color: Some(palette.background.weak.text),
        ..container::Style::default()
    }
}
