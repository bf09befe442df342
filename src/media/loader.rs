// SPDX-License-Identifier: MPL-2.0
//! Asynchronous image loading with progress reporting.
//!
//! [`ImageLoader::load`] returns a stream that yields zero or more
//! [`LoadEvent::Progress`] events followed by exactly one
//! [`LoadEvent::Completed`]. The stream is meant to be handed to
//! `iced::Task::stream`, which delivers every event back to the update loop.

use super::{ImageRef, LoadedImage};
use crate::config::{DEFAULT_IMAGE_CACHE_CAPACITY, READ_CHUNK_SIZE};
use crate::error::{Error, Result};
use futures_util::stream::{self, BoxStream, StreamExt};
use iced::futures::channel::mpsc;
use iced::futures::SinkExt;
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::Mutex;

/// Buffered progress events per request before the worker waits.
const EVENT_BUFFER: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPriority {
    /// Neighbouring pages.
    #[default]
    Normal,
    /// The page on screen.
    High,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub image_ref: ImageRef,
    pub priority: LoadPriority,
}

impl LoadRequest {
    #[must_use]
    pub fn new(image_ref: ImageRef, priority: LoadPriority) -> Self {
        Self {
            image_ref,
            priority,
        }
    }
}

/// Where a completed image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheType {
    /// Fetched from its source.
    None,
    /// Served from the in-memory cache.
    Memory,
}

#[derive(Debug, Clone)]
pub enum LoadEvent {
    /// Bytes received so far. `expected` is unknown when the source does not
    /// announce its size.
    Progress { received: u64, expected: Option<u64> },
    Completed {
        image_ref: ImageRef,
        cache: CacheType,
        result: Result<LoadedImage>,
    },
}

impl LoadEvent {
    /// Fraction in `[0, 1]`, when the total size is known.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> Option<f32> {
        match self {
            LoadEvent::Progress {
                received,
                expected: Some(expected),
            } if *expected > 0 => Some((*received as f32 / *expected as f32).clamp(0.0, 1.0)),
            _ => None,
        }
    }
}

/// Fetches full-size images for the pages.
pub trait ImageLoader: Send + Sync + fmt::Debug {
    fn load(&self, request: LoadRequest) -> BoxStream<'static, LoadEvent>;
}

type SharedCache = Arc<Mutex<LruCache<ImageRef, LoadedImage>>>;

/// Loads local files and `http(s)` URLs, keeping recent images in memory.
///
/// Requests start as soon as their stream is polled; the priority is only
/// logged.
#[derive(Clone)]
pub struct DefaultImageLoader {
    client: reqwest::Client,
    cache: SharedCache,
}

impl fmt::Debug for DefaultImageLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultImageLoader").finish_non_exhaustive()
    }
}

impl DefaultImageLoader {
    pub fn new(cache_capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(cache_capacity)
            .or(NonZeroUsize::new(DEFAULT_IMAGE_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("IcedPreview/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        })
    }
}

impl ImageLoader for DefaultImageLoader {
    fn load(&self, request: LoadRequest) -> BoxStream<'static, LoadEvent> {
        let client = self.client.clone();
        let cache = Arc::clone(&self.cache);

        // Spawning is deferred until the stream is polled so it always
        // happens on the runtime.
        stream::once(async move {
            let (sender, receiver) = mpsc::channel(EVENT_BUFFER);
            tokio::spawn(run_request(client, cache, request, sender));
            receiver
        })
        .flatten()
        .boxed()
    }
}

async fn run_request(
    client: reqwest::Client,
    cache: SharedCache,
    request: LoadRequest,
    mut sender: mpsc::Sender<LoadEvent>,
) {
    let image_ref = request.image_ref;
    log::debug!("loading {image_ref} ({:?} priority)", request.priority);

    let cached = cache.lock().await.get(&image_ref).cloned();
    if let Some(image) = cached {
        let _ = sender
            .send(LoadEvent::Completed {
                image_ref,
                cache: CacheType::Memory,
                result: Ok(image),
            })
            .await;
        return;
    }

    let bytes = match &image_ref {
        ImageRef::Path(path) => read_file(path, &mut sender).await,
        ImageRef::Url(url) => download(&client, url, &mut sender).await,
    };
    let result = bytes.and_then(|bytes| LoadedImage::from_bytes(image_ref.clone(), bytes));

    match &result {
        Ok(image) => {
            cache.lock().await.put(image_ref.clone(), image.clone());
        }
        Err(err) => log::warn!("failed to load {image_ref}: {err}"),
    }

    let _ = sender
        .send(LoadEvent::Completed {
            image_ref,
            cache: CacheType::None,
            result,
        })
        .await;
}

async fn read_file(path: &Path, sender: &mut mpsc::Sender<LoadEvent>) -> Result<Vec<u8>> {
    let mut file = tokio::fs::File::open(path).await?;
    let expected = file.metadata().await.ok().map(|meta| meta.len());

    let mut bytes = Vec::with_capacity(
        expected
            .and_then(|len| usize::try_from(len).ok())
            .unwrap_or(READ_CHUNK_SIZE),
    );
    let mut chunk = vec![0; READ_CHUNK_SIZE];
    loop {
        let read = file.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..read]);
        report(sender, bytes.len() as u64, expected).await;
    }
    Ok(bytes)
}

async fn download(
    client: &reqwest::Client,
    url: &str,
    sender: &mut mpsc::Sender<LoadEvent>,
) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(Error::Network(format!("HTTP status: {}", response.status())));
    }

    let expected = response.content_length();
    let mut bytes = Vec::new();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        bytes.extend_from_slice(&chunk);
        report(sender, bytes.len() as u64, expected).await;
    }
    Ok(bytes)
}

async fn report(sender: &mut mpsc::Sender<LoadEvent>, received: u64, expected: Option<u64>) {
    // A dropped receiver means nobody shows progress any more.
    let _ = sender
        .send(LoadEvent::Progress { received, expected })
        .await;
}
