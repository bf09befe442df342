// SPDX-License-Identifier: MPL-2.0
//! Crate-wide error type.
//!
//! Errors carry their messages as strings so they stay `Clone` and can travel
//! inside Iced messages.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Network Error: {0}")]
    Network(String),

    #[error("Decode Error: {0}")]
    Decode(String),

    /// The locator could not be interpreted as a path or an `http(s)` URL.
    #[error("Invalid image reference: {0}")]
    InvalidImageRef(String),

    #[error("Window Error: {0}")]
    Window(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<iced::Error> for Error {
    fn from(err: iced::Error) -> Self {
        Error::Window(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
