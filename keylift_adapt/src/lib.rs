// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keylift Adapt: keep focused inputs visible above on-screen keyboards.
//!
//! Mobile browsers disagree about what happens when the on-screen keyboard
//! opens. Some shrink the viewport, and content reflows on its own. Others
//! overlay the keyboard and leave the focused input hidden behind it.
//! [`KeyboardAdapter`] tells the two apart and, only in overlay mode, nudges the
//! page: first a scroll, then (if the input is still obscured) a temporary
//! bottom inset that manufactures scroll room, followed by a second scroll. The
//! inset is removed again when the keyboard closes.
//!
//! ## Driving protocol
//!
//! The adapter is host-driven and deterministic. It never reads a clock or
//! registers platform callbacks itself; the host forwards events with a
//! millisecond timestamp and services two wake-up sources:
//!
//! - [`KeyboardAdapter::on_pointer_start`] at pointer-down, to record the
//!   pre-keyboard viewport height. The reading is consumed by the next focus.
//! - [`KeyboardAdapter::on_focus`] / [`KeyboardAdapter::on_blur`] for the input.
//! - [`KeyboardAdapter::on_viewport_resize`] when the platform reports a
//!   viewport resize while [`KeyboardAdapter::is_awaiting_resize`] is `true`.
//! - [`KeyboardAdapter::advance`] once [`KeyboardAdapter::next_deadline`] has
//!   passed.
//! - [`KeyboardAdapter::dispose`] on teardown.
//!
//! Measurement goes through [`keylift_viewport::ViewportHost`], the inset
//! through [`keylift_viewport::InsetContainer`].
//!
//! ## Episode lifecycle
//!
//! A focus opens an *episode* and races a resize notification against the
//! settle-wait timeout ([`AdaptationParams::keyboard_expand_wait_time`]). A
//! timeout reads the viewport height at once; a resize cancels the timeout and
//! reads it [`AdaptationParams::resize_settle_time`] later, once the keyboard
//! animation is over. The reading is compared with the recorded baseline:
//!
//! 1. A drop larger than [`AdaptationParams::height_change_threshold`] means the
//!    platform resized the layout; nothing else happens.
//! 2. Otherwise the keyboard is assumed to cover the bottom
//!    [`AdaptationParams::estimated_keyboard_height`] pixels. If the input's
//!    bottom edge plus [`AdaptationParams::safe_input_padding`] crosses that
//!    boundary, it is scrolled into view and re-tested after
//!    [`AdaptationParams::scroll_recheck_interval`]. If it is still obscured,
//!    the spacer is applied once and the scroll re-issued.
//!
//! A new focus cancels everything in flight from the previous episode. A blur
//! schedules the spacer removal after
//! [`AdaptationParams::keyboard_collapse_cleanup_time`]; a focus arriving
//! before then cancels it, so hopping between inputs does not flicker.
//!
//! ## Minimal example
//!
//! ```rust
//! use keylift_adapt::{Adaptation, AdaptationParams, KeyboardAdapter, KeyboardPhase};
//! use keylift_viewport::{InsetContainer, ViewportHost};
//! use kurbo::Rect;
//!
//! /// A page whose keyboard overlays content and whose scrolls never help.
//! struct Page {
//!     height: f64,
//!     input_bottom: f64,
//! }
//!
//! impl ViewportHost<u32> for Page {
//!     fn visual_viewport_height(&self) -> Option<f64> {
//!         Some(self.height)
//!     }
//!     fn inner_height(&self) -> f64 {
//!         self.height
//!     }
//!     fn is_attached(&self, _: &u32) -> bool {
//!         true
//!     }
//!     fn bounding_rect(&self, _: &u32) -> Option<Rect> {
//!         Some(Rect::new(0.0, self.input_bottom - 40.0, 300.0, self.input_bottom))
//!     }
//!     fn scroll_into_view(&mut self, _: &u32) {}
//! }
//!
//! struct Body(String);
//!
//! impl InsetContainer for Body {
//!     fn computed_bottom_inset(&self) -> Option<String> {
//!         Some(self.0.clone())
//!     }
//!     fn set_bottom_inset(&mut self, value: &str) {
//!         self.0 = value.into();
//!     }
//! }
//!
//! let mut page = Page { height: 800.0, input_bottom: 800.0 };
//! let mut kb = KeyboardAdapter::new(AdaptationParams::default(), Body("0px".into()));
//!
//! kb.on_pointer_start(&page, 0);
//! kb.on_focus(&mut page, 7, 0);
//! assert_eq!(kb.phase(), KeyboardPhase::Expanding);
//!
//! // No resize arrives; the settle wait elapses and the first scroll is issued.
//! kb.advance(&mut page, 150);
//! assert_eq!(kb.last_adaptation(), Some(Adaptation::Scrolled));
//!
//! // Still obscured at the recheck: the spacer is applied.
//! kb.advance(&mut page, 250);
//! assert_eq!(kb.last_adaptation(), Some(Adaptation::Padded));
//! assert_eq!(kb.container().0, "300px");
//!
//! // Blur, then the debounced cleanup restores the inset.
//! kb.on_blur(1_000);
//! kb.advance(&mut page, 1_100);
//! assert_eq!(kb.container().0, "0px");
//! assert_eq!(kb.phase(), KeyboardPhase::Idle);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: `no_std` + `alloc` builds relying on `libm` for float math.
//! - `serde`: `Serialize`/`Deserialize` for [`AdaptationParams`].
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate alloc;

mod adapter;
mod episode;
mod params;

pub use adapter::{Adaptation, FocusOutcome, KeyboardAdapter};
pub use episode::{Episode, EpisodeId, KeyboardPhase};
pub use params::{
    AdaptationParams, DEFAULT_ESTIMATED_KEYBOARD_HEIGHT, DEFAULT_HEIGHT_CHANGE_THRESHOLD,
    DEFAULT_KEYBOARD_COLLAPSE_CLEANUP_TIME, DEFAULT_KEYBOARD_EXPAND_WAIT_TIME,
    DEFAULT_POINTER_BASELINE_MAX_AGE, DEFAULT_REFOCUS_GUARD, DEFAULT_RESIZE_SETTLE_TIME,
    DEFAULT_SAFE_INPUT_PADDING, DEFAULT_SCROLL_RECHECK_INTERVAL, ParamsError,
};
