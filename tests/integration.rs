// SPDX-License-Identifier: MPL-2.0
use futures_util::stream::{self, BoxStream, StreamExt};
use iced::widget::image::Handle;
use iced::{keyboard, Point, Rectangle, Size};
use iced_preview::config::{self, Config};
use iced_preview::geometry::aspect_fit;
use iced_preview::media::{ImageLoader, ImageRef, LoadEvent, LoadRequest};
use iced_preview::transition::{
    DismissInteractor, Phase, RenderedImage, ThumbnailView, TransitionContext,
    TransitionDirection, ViewId, Visibility,
};
use iced_preview::ui::preview::{Effect, Lifecycle, Message, Options, PhotoPreview};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::tempdir;

const DURATION: Duration = Duration::from_millis(250);

#[derive(Debug)]
struct IdleLoader;

impl ImageLoader for IdleLoader {
    fn load(&self, _request: LoadRequest) -> BoxStream<'static, LoadEvent> {
        stream::empty().boxed()
    }
}

fn screen() -> Rectangle {
    Rectangle::new(Point::ORIGIN, Size::new(400.0, 800.0))
}

fn thumbnail(id: u64) -> ThumbnailView {
    ThumbnailView {
        id: ViewId(id),
        frame: Rectangle::new(Point::new(10.0, 10.0), Size::new(40.0, 30.0)),
        image: Some(RenderedImage {
            handle: Handle::from_rgba(1, 1, vec![0, 0, 0, 255]),
            size: Size::new(400.0, 300.0),
        }),
    }
}

#[test]
fn config_round_trip_through_settings_file() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let mut config = Config::default();
    config.preview.animation_duration_ms = Some(400);
    config.preview.hide_navigation_bar = Some(true);
    config.gestures.max_zoom_scale = Some(3.0);
    config::save_to_path(&config, &path).expect("Failed to write config file");

    let loaded = config::load_from_path(&path).expect("Failed to load config from path");
    assert_eq!(loaded, config);
    assert_eq!(loaded.animation_duration(), Duration::from_millis(400));

    let options = Options::from_config(vec![ImageRef::Path("a.png".into())], &loaded);
    assert!(options.hide_navigation_bar_while_presenting);
    assert_eq!(options.max_zoom_scale, 3.0);
}

#[test]
fn broken_settings_file_falls_back_to_defaults() {
    let dir = tempdir().expect("Failed to create temporary directory");
    std::fs::write(dir.path().join("settings.toml"), "preview = [").expect("write");

    let (config, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert_eq!(config, Config::default());
    assert!(warning.is_some());
}

#[test]
fn aspect_fit_is_deterministic_and_keeps_ratio() {
    let container = Rectangle::new(Point::new(5.0, 5.0), Size::new(300.0, 500.0));
    let image = Size::new(1600.0, 900.0);
    let first = aspect_fit(container, image);
    assert_eq!(first, aspect_fit(container, image));
    assert!((first.width / first.height - 16.0 / 9.0).abs() < 1e-4);
    assert_eq!(first.width, 300.0);
}

#[test]
fn interactor_returns_to_idle_with_every_view_restored() {
    let mut visibility = Visibility::new();
    let mut interactor = DismissInteractor::new(DURATION);
    interactor.set_target(Some(thumbnail(4)));

    for (drag, expected) in [(300.0, Phase::Finishing), (40.0, Phase::Cancelling)] {
        let start = Instant::now();
        let source = ThumbnailView {
            id: ViewId(100),
            frame: screen(),
            ..thumbnail(100)
        };
        assert!(interactor.begin(source));
        let context = TransitionContext::new(TransitionDirection::Dismiss, screen())
            .with_from_view(screen())
            .with_to_view(screen());
        assert!(interactor
            .start_interactive_transition(context, &mut visibility)
            .is_none());

        interactor.update(drag, &mut visibility);
        assert!(visibility.is_hidden(ViewId(4)));
        assert!(interactor.end(start, &mut visibility).is_none());
        assert_eq!(interactor.phase(), expected);

        let outcome = interactor
            .tick(start + DURATION, &mut visibility)
            .expect("settle completes");
        assert_eq!(outcome.completed, expected == Phase::Finishing);
        assert_eq!(interactor.phase(), Phase::Idle);
        assert!(interactor.live_offset().is_none());
        assert!(visibility.all_visible());
    }
}

#[test]
fn escape_dismisses_a_presented_preview() {
    let start = Instant::now();
    let images = (0..3)
        .map(|i| ImageRef::Path(format!("{i}.png").into()))
        .collect();
    let mut preview = PhotoPreview::new(Options::new(images).start_index(1), Arc::new(IdleLoader));

    let (effect, _) = preview.present(Some(thumbnail(1)), screen(), start);
    assert_eq!(effect, Effect::None);
    assert!(preview.is_hidden(ViewId(1)));

    let _ = preview.handle_message(Message::Frame(start + DURATION));
    assert_eq!(preview.lifecycle(), Lifecycle::Presented);

    let escape = keyboard::Key::Named(keyboard::key::Named::Escape);
    let _ = preview.handle_message(Message::Key(escape));
    assert_eq!(preview.lifecycle(), Lifecycle::Dismissing);
    assert!(preview.is_hidden(ViewId(1)));

    let (effect, _) = preview.handle_message(Message::Frame(start + DURATION * 3));
    assert_eq!(
        effect,
        Effect::Dismissed {
            restore_navigation_bar: false
        }
    );
    assert!(!preview.is_hidden(ViewId(1)));
}
