// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the preview. Constants are organized by category.
//!
//! # Categories
//!
//! - **Transitions**: Present/dismiss timing and the drag commit threshold
//! - **Paging**: Inter-page spacing and snapping
//! - **Gestures**: Tap and pan recognition
//! - **Zoom**: Page zoom bounds
//! - **Loading**: Caches and the progress indicator

// ==========================================================================
// Transition Defaults
// ==========================================================================

/// Default duration of the present and dismiss animations (in milliseconds).
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 250;

/// Maximum accepted animation duration (in milliseconds).
pub const MAX_ANIMATION_DURATION_MS: u64 = 2_000;

/// Fraction of the surface height, measured from either edge, in which
/// releasing a dismiss drag commits the dismissal.
pub const DISMISS_COMMIT_FRACTION: f32 = 0.25;

/// Whether a single tap on a page dismisses the preview.
pub const DEFAULT_DISMISS_ON_TAP: bool = true;

/// Whether the host navigation bar is hidden while the preview is shown.
pub const DEFAULT_HIDE_NAVIGATION_BAR: bool = false;

// ==========================================================================
// Paging Defaults
// ==========================================================================

/// Default gap between two pages while swiping (in logical pixels).
pub const DEFAULT_PAGE_SPACING: f32 = 20.0;

/// Maximum accepted inter-page spacing.
pub const MAX_PAGE_SPACING: f32 = 200.0;

/// Fraction of the page width a horizontal swipe must travel to turn the page.
pub const PAGE_SNAP_FRACTION: f32 = 0.25;

/// Resistance applied when swiping past the first or last page.
pub const PAGE_RUBBER_BAND: f32 = 0.35;

// ==========================================================================
// Gesture Defaults
// ==========================================================================

/// How long a single tap waits for a second tap (in milliseconds).
pub const DEFAULT_DOUBLE_TAP_TIMEOUT_MS: u64 = 300;

/// Minimum pointer travel before a press becomes a pan (in logical pixels).
pub const DEFAULT_PAN_SLOP: f32 = 8.0;

// ==========================================================================
// Zoom Defaults
// ==========================================================================

/// Scale of a page at rest.
pub const MIN_ZOOM_SCALE: f32 = 1.0;

/// Default scale reached by double tap, and upper bound of wheel zoom.
pub const DEFAULT_MAX_ZOOM_SCALE: f32 = 4.0;

/// Highest maximum zoom a configuration may request.
pub const MAX_ZOOM_SCALE_LIMIT: f32 = 16.0;

/// Scale factor applied per wheel line.
pub const WHEEL_ZOOM_STEP: f32 = 1.1;

// ==========================================================================
// Loading Defaults
// ==========================================================================

/// Number of page controllers the preview keeps alive.
pub const DEFAULT_PAGE_CACHE_CAPACITY: usize = 5;

/// The current page and both of its neighbours.
pub const MIN_PAGE_CACHE_CAPACITY: usize = 3;

/// Number of loaded images kept in the default loader's memory cache.
pub const DEFAULT_IMAGE_CACHE_CAPACITY: usize = 64;

/// Maximum accepted cache capacity for either cache.
pub const MAX_CACHE_CAPACITY: usize = 1_024;

/// Size of a single read when loading local files (in bytes).
pub const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Radius of the circular progress indicator.
pub const LOADER_RADIUS: f32 = 20.0;

/// Stroke width of the circular progress indicator.
pub const LOADER_LINE_WIDTH: f32 = 2.0;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Transition validation
    assert!(DEFAULT_ANIMATION_DURATION_MS <= MAX_ANIMATION_DURATION_MS);
    assert!(DISMISS_COMMIT_FRACTION > 0.0);
    assert!(DISMISS_COMMIT_FRACTION < 0.5);

    // Paging validation
    assert!(DEFAULT_PAGE_SPACING >= 0.0);
    assert!(DEFAULT_PAGE_SPACING <= MAX_PAGE_SPACING);
    assert!(PAGE_SNAP_FRACTION > 0.0);
    assert!(PAGE_SNAP_FRACTION < 1.0);
    assert!(PAGE_RUBBER_BAND > 0.0);
    assert!(PAGE_RUBBER_BAND <= 1.0);

    // Gesture validation
    assert!(DEFAULT_DOUBLE_TAP_TIMEOUT_MS > 0);
    assert!(DEFAULT_PAN_SLOP > 0.0);

    // Zoom validation
    assert!(MIN_ZOOM_SCALE == 1.0);
    assert!(DEFAULT_MAX_ZOOM_SCALE > MIN_ZOOM_SCALE);
    assert!(DEFAULT_MAX_ZOOM_SCALE <= MAX_ZOOM_SCALE_LIMIT);
    assert!(WHEEL_ZOOM_STEP > 1.0);

    // Loading validation
    assert!(DEFAULT_PAGE_CACHE_CAPACITY >= MIN_PAGE_CACHE_CAPACITY);
    assert!(DEFAULT_PAGE_CACHE_CAPACITY <= MAX_CACHE_CAPACITY);
    assert!(DEFAULT_IMAGE_CACHE_CAPACITY > 0);
    assert!(DEFAULT_IMAGE_CACHE_CAPACITY <= MAX_CACHE_CAPACITY);
    assert!(READ_CHUNK_SIZE > 0);
    assert!(LOADER_RADIUS > LOADER_LINE_WIDTH);
};
