// SPDX-License-Identifier: MPL-2.0
//! Image references and loading.
//!
//! Pages only know [`ImageRef`]s; turning one into pixels is the job of an
//! [`ImageLoader`], which reports progress and completion as a stream of
//! [`LoadEvent`]s.

pub mod loader;

pub use loader::{
    CacheType, DefaultImageLoader, ImageLoader, LoadEvent, LoadPriority, LoadRequest,
};

use crate::error::{Error, Result};
use iced::widget::image;
use iced::Size;
use std::fmt;
use std::io::Cursor;
use std::path::PathBuf;
use std::str::FromStr;

/// Locator of a full-size image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageRef {
    Path(PathBuf),
    /// An `http` or `https` URL.
    Url(String),
}

impl ImageRef {
    /// Interprets `raw` as an `http(s)` URL when it carries that scheme and as
    /// a local path otherwise.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidImageRef("empty image reference".to_string()));
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(ImageRef::Url(trimmed.to_string()));
        }
        if let Some(path) = trimmed.strip_prefix("file://") {
            return Ok(ImageRef::Path(PathBuf::from(path)));
        }
        if lower.contains("://") {
            return Err(Error::InvalidImageRef(format!(
                "unsupported scheme in {trimmed}"
            )));
        }
        Ok(ImageRef::Path(PathBuf::from(trimmed)))
    }

    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, ImageRef::Url(_))
    }
}

impl FromStr for ImageRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::Path(path) => write!(f, "{}", path.display()),
            ImageRef::Url(url) => f.write_str(url),
        }
    }
}

/// A fetched image, ready to be drawn.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image_ref: ImageRef,
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
}

impl LoadedImage {
    /// Probes the dimensions of encoded bytes and wraps them in a handle.
    ///
    /// Only the header is parsed here; the renderer decodes the pixels.
    pub fn from_bytes(image_ref: ImageRef, bytes: Vec<u8>) -> Result<Self> {
        let (width, height) = image_rs::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        Ok(Self {
            image_ref,
            handle: image::Handle::from_bytes(bytes),
            width,
            height,
        })
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}
