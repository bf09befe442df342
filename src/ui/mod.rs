// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! - [`preview`] - The photo preview overlay: page host, pages, gestures
//! - [`state`] - Reusable state (zoom)
//! - [`widgets`] - Canvas widgets (circular progress indicator)

pub mod preview;
pub mod state;
pub mod widgets;
