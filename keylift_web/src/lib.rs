// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keylift Web: the browser host for `keylift_adapt`.
//!
//! On `wasm32` this crate provides:
//!
//! - `DomViewport`: a [`keylift_viewport::ViewportHost`] over `window`,
//!   `visualViewport` and `document.body`, keyed by `HtmlElement`.
//! - `DomInset`: a [`keylift_viewport::InsetContainer`] that reads the computed
//!   `padding-bottom` of an element, writes its inline style, and puts the
//!   prior inline value back on restore.
//! - `KeyboardLift`: the lifecycle object a framework binding calls from its
//!   `pointerdown`, `focus` and `blur` handlers. It owns one
//!   [`keylift_adapt::KeyboardAdapter`], keeps a single `setTimeout` armed for
//!   the adapter's next deadline, and subscribes a `resize` listener on the
//!   visual viewport (or `window`) only while an episode is waiting for one.
//!
//! Timestamps come from `performance.now()`, so wall-clock adjustments do not
//! shift pending deadlines.
//!
//! DOM failures never surface as errors after construction; they are logged
//! with `tracing` at `warn` and the affected step degrades.
//!
//! On other targets only [`LiftError`] is compiled.

mod error;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod lift;

#[cfg(target_arch = "wasm32")]
pub use dom::{DomInset, DomViewport};
pub use error::LiftError;
#[cfg(target_arch = "wasm32")]
pub use lift::KeyboardLift;
