// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and launch flags of the demo host.

use crate::media::LoadEvent;
use crate::ui::preview;
use iced::Size;

#[derive(Debug, Clone)]
pub enum Message {
    /// Load progress of a grid thumbnail.
    Thumbnail { index: usize, event: LoadEvent },
    ThumbnailPressed(usize),
    Preview(preview::Message),
    WindowResized(Size),
}

/// Runtime flags passed in from the CLI.
#[derive(Debug, Default)]
pub struct Flags {
    /// Image to open the preview on right away.
    pub start: Option<usize>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ICED_PREVIEW_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
    /// Local paths or `http(s)` URLs, in gallery order.
    pub images: Vec<String>,
}
