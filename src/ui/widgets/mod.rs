// SPDX-License-Identifier: MPL-2.0
//! Custom widgets.

pub mod circular_loader;

pub use circular_loader::CircularLoader;
