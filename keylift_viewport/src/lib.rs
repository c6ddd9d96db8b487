// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keylift Viewport: measurement and reversible inset primitives.
//!
//! This crate holds the deterministic half of on-screen keyboard adaptation:
//!
//! - [`probe`]: reading the usable viewport height, testing whether a target's
//!   bottom edge falls below a visibility boundary, and requesting a scroll when
//!   it does. Everything goes through the [`ViewportHost`] trait, so the same
//!   logic runs against a DOM, a native shell, or a test double.
//! - [`spacer`]: the [`Spacer`] record, which enlarges a container's bottom inset
//!   by a fixed amount and restores the exact pre-existing value afterwards,
//!   without ever compounding repeated applications.
//!
//! Timing and sequencing live elsewhere (`keylift_adapt`); nothing here schedules
//! work or keeps state across calls except the [`Spacer`] record itself.
//!
//! ## Minimal example
//!
//! ```rust
//! use keylift_viewport::{InsetContainer, Spacer};
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
//! let mut body = Body("16px".into());
//! let mut spacer = Spacer::new();
//!
//! spacer.apply_bottom_inset(&mut body, 300.0);
//! spacer.apply_bottom_inset(&mut body, 300.0);
//! assert_eq!(body.0, "316px");
//!
//! spacer.clear_bottom_inset(&mut body);
//! assert_eq!(body.0, "16px");
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` + `alloc` builds relying on `libm` for float math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod probe;
pub mod spacer;

pub use probe::{
    ViewportHost, current_viewport_height, exceeds_boundary, is_below_visibility_boundary,
    scroll_into_view_if_needed,
};
pub use spacer::{InsetContainer, Spacer, grow_inset, parse_px};
