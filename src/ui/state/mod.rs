// SPDX-License-Identifier: MPL-2.0
//! UI state management modules
//!
//! State that is independent from any particular widget lives here so it can
//! be tested without a renderer.

pub mod zoom;

pub use zoom::{ZoomScale, ZoomState};
