// SPDX-License-Identifier: MPL-2.0
//! `iced_preview` is a full-screen photo preview overlay for Iced
//! applications.
//!
//! It pages through a gallery with swipes and arrow keys, zooms with double
//! taps and the mouse wheel, and dismisses on tap or with an interactive,
//! cancelable vertical drag. Presenting and dismissing fly the host thumbnail
//! into and out of place.

pub mod animation;
pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod media;
pub mod transition;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
