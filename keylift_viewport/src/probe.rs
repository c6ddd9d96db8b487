// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport height and visibility-boundary probing.
//!
//! A *boundary* is an absolute, viewport-relative Y coordinate below which
//! content is presumed hidden (for example by an overlaid keyboard). A target is
//! below the boundary when its bottom edge plus a safety margin crosses it:
//!
//! ```text
//! bottom + margin > boundary
//! ```

use kurbo::Rect;

/// Host-side view of the platform viewport and of the targets being managed.
///
/// `K` is the host's handle type for a target element (a DOM element, a node
/// id, an index). The probe never owns targets; it only asks the host about
/// them.
pub trait ViewportHost<K> {
    /// Live visual-viewport height, if the platform exposes one.
    ///
    /// On platforms that overlay the keyboard this tracks the visible area more
    /// closely than the layout height does.
    fn visual_viewport_height(&self) -> Option<f64>;

    /// Static window (layout) height.
    fn inner_height(&self) -> f64;

    /// Whether the target is still attached to the document.
    fn is_attached(&self, target: &K) -> bool;

    /// Viewport-relative bounding box of the target, or `None` if it has no
    /// layout box.
    fn bounding_rect(&self, target: &K) -> Option<Rect>;

    /// Requests a smooth scroll bringing the target toward the visible area.
    ///
    /// The scroll is asynchronous; implementations return before it completes.
    fn scroll_into_view(&mut self, target: &K);
}

/// Returns the usable viewport height.
///
/// Prefers the visual-viewport metric; falls back to the window height when it
/// is missing or not a finite number.
pub fn current_viewport_height<K, H>(host: &H) -> f64
where
    H: ViewportHost<K> + ?Sized,
{
    match host.visual_viewport_height() {
        Some(height) if height.is_finite() => height,
        _ => host.inner_height(),
    }
}

/// Whether a bottom edge at `bottom` plus `margin` crosses `boundary`.
#[must_use]
pub fn exceeds_boundary(bottom: f64, boundary: f64, margin: f64) -> bool {
    bottom + margin > boundary
}

/// Whether `target` sits below the visibility boundary.
///
/// A target without a layout box is never reported as below.
pub fn is_below_visibility_boundary<K, H>(host: &H, target: &K, boundary: f64, margin: f64) -> bool
where
    H: ViewportHost<K> + ?Sized,
{
    host.bounding_rect(target)
        .is_some_and(|rect| exceeds_boundary(rect.max_y(), boundary, margin))
}

/// Scrolls `target` toward view if it sits below the boundary.
///
/// Returns `true` when a scroll was requested. The scroll may still be animating
/// when this returns; callers that care about the result must re-check later.
pub fn scroll_into_view_if_needed<K, H>(
    host: &mut H,
    target: &K,
    boundary: f64,
    margin: f64,
) -> bool
where
    H: ViewportHost<K> + ?Sized,
{
    if !is_below_visibility_boundary(&*host, target, boundary, margin) {
        return false;
    }
    tracing::trace!(boundary, margin, "requesting scroll into view");
    host.scroll_into_view(target);
    true
}
