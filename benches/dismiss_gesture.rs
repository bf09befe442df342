// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use iced::widget::image::Handle;
use iced::{Point, Rectangle, Size};
use iced_preview::geometry::aspect_fit;
use iced_preview::transition::{
    DismissInteractor, RenderedImage, ThumbnailView, TransitionContext, TransitionDirection,
    ViewId, Visibility,
};
use std::hint::black_box;
use std::time::{Duration, Instant};

fn screen() -> Rectangle {
    Rectangle::new(Point::ORIGIN, Size::new(1080.0, 1920.0))
}

fn page_view() -> ThumbnailView {
    ThumbnailView {
        id: ViewId(1 << 32),
        frame: screen(),
        image: Some(RenderedImage {
            handle: Handle::from_rgba(1, 1, vec![0, 0, 0, 255]),
            size: Size::new(4000.0, 3000.0),
        }),
    }
}

fn aspect_fit_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");

    group.bench_function("aspect_fit", |b| {
        b.iter(|| aspect_fit(black_box(screen()), black_box(Size::new(4000.0, 3000.0))));
    });

    group.finish();
}

fn dismiss_drag_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dismiss_gesture");

    // One full drag: begin, sixty pointer updates, release and settle.
    group.bench_function("drag_and_settle", |b| {
        b.iter(|| {
            let start = Instant::now();
            let mut visibility = Visibility::new();
            let mut interactor = DismissInteractor::new(Duration::from_millis(250));
            interactor.begin(page_view());
            let context = TransitionContext::new(TransitionDirection::Dismiss, screen())
                .with_from_view(screen())
                .with_to_view(screen());
            let _ = interactor.start_interactive_transition(context, &mut visibility);
            for _ in 0..60 {
                interactor.update(black_box(12.0), &mut visibility);
            }
            let _ = interactor.end(start, &mut visibility);
            black_box(interactor.tick(start + Duration::from_millis(250), &mut visibility))
        });
    });

    group.finish();
}

criterion_group!(benches, aspect_fit_benchmark, dismiss_drag_benchmark);
criterion_main!(benches);
