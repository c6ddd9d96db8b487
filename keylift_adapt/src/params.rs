// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adaptation parameters and their defaults.

/// Assumed keyboard height in overlay mode, in pixels.
pub const DEFAULT_ESTIMATED_KEYBOARD_HEIGHT: f64 = 300.0;
/// Clearance kept between an input's bottom edge and the keyboard, in pixels.
pub const DEFAULT_SAFE_INPUT_PADDING: f64 = 16.0;
/// Settle-wait after focus before the fallback adaptation check, in milliseconds.
pub const DEFAULT_KEYBOARD_EXPAND_WAIT_TIME: u64 = 150;
/// Delay before re-testing visibility after a scroll, in milliseconds.
pub const DEFAULT_SCROLL_RECHECK_INTERVAL: u64 = 100;
/// Debounce delay between blur and spacer removal, in milliseconds.
pub const DEFAULT_KEYBOARD_COLLAPSE_CLEANUP_TIME: u64 = 100;
/// Height drop, in pixels, above which the platform is assumed to have resized the layout.
///
/// Smaller drops are browser chrome or URL-bar jitter.
pub const DEFAULT_HEIGHT_CHANGE_THRESHOLD: f64 = 20.0;
/// Window, in milliseconds, in which a repeated focus is treated as churn.
pub const DEFAULT_REFOCUS_GUARD: u64 = 50;
/// Delay between the first resize notification and the height reading, in
/// milliseconds, so the keyboard animation can finish.
pub const DEFAULT_RESIZE_SETTLE_TIME: u64 = 100;
/// Age, in milliseconds, after which a pointer-start height reading is no
/// longer used as the baseline of a focus.
pub const DEFAULT_POINTER_BASELINE_MAX_AGE: u64 = 1_000;

/// Immutable per-instance configuration of a [`KeyboardAdapter`](crate::KeyboardAdapter).
///
/// Every field has a default (see the `DEFAULT_*` constants). With the `serde`
/// feature, missing fields deserialize to their defaults and field names use
/// camelCase (`estimatedKeyboardHeight`, `keyboardExpandWaitTime`, ...), so an
/// options object written for a web page maps directly onto this type.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct AdaptationParams {
    /// Assumed keyboard height in overlay mode, in pixels.
    pub estimated_keyboard_height: f64,
    /// Extra clearance above the keyboard boundary, in pixels.
    pub safe_input_padding: f64,
    /// Settle-wait before the fallback adaptation check, in milliseconds.
    pub keyboard_expand_wait_time: u64,
    /// Delay before re-testing visibility after a scroll, in milliseconds.
    pub scroll_recheck_interval: u64,
    /// Debounce delay before reversing the spacer after blur, in milliseconds.
    pub keyboard_collapse_cleanup_time: u64,
    /// Height drop (strictly greater than) that counts as a platform resize, in pixels.
    pub height_change_threshold: f64,
    /// Rapid-refocus guard window, in milliseconds.
    pub refocus_guard: u64,
    /// Wait after the first resize notification before the height is read, in
    /// milliseconds.
    pub resize_settle_time: u64,
    /// Maximum age of a pointer-start reading still usable as a baseline, in
    /// milliseconds.
    pub pointer_baseline_max_age: u64,
}

impl Default for AdaptationParams {
    fn default() -> Self {
        Self {
            estimated_keyboard_height: DEFAULT_ESTIMATED_KEYBOARD_HEIGHT,
            safe_input_padding: DEFAULT_SAFE_INPUT_PADDING,
            keyboard_expand_wait_time: DEFAULT_KEYBOARD_EXPAND_WAIT_TIME,
            scroll_recheck_interval: DEFAULT_SCROLL_RECHECK_INTERVAL,
            keyboard_collapse_cleanup_time: DEFAULT_KEYBOARD_COLLAPSE_CLEANUP_TIME,
            height_change_threshold: DEFAULT_HEIGHT_CHANGE_THRESHOLD,
            refocus_guard: DEFAULT_REFOCUS_GUARD,
            resize_settle_time: DEFAULT_RESIZE_SETTLE_TIME,
            pointer_baseline_max_age: DEFAULT_POINTER_BASELINE_MAX_AGE,
        }
    }
}

impl AdaptationParams {
    /// Sets [`AdaptationParams::estimated_keyboard_height`].
    #[must_use]
    pub const fn with_estimated_keyboard_height(mut self, px: f64) -> Self {
        self.estimated_keyboard_height = px;
        self
    }

    /// Sets [`AdaptationParams::safe_input_padding`].
    #[must_use]
    pub const fn with_safe_input_padding(mut self, px: f64) -> Self {
        self.safe_input_padding = px;
        self
    }

    /// Sets [`AdaptationParams::keyboard_expand_wait_time`].
    #[must_use]
    pub const fn with_keyboard_expand_wait_time(mut self, ms: u64) -> Self {
        self.keyboard_expand_wait_time = ms;
        self
    }

    /// Sets [`AdaptationParams::scroll_recheck_interval`].
    #[must_use]
    pub const fn with_scroll_recheck_interval(mut self, ms: u64) -> Self {
        self.scroll_recheck_interval = ms;
        self
    }

    /// Sets [`AdaptationParams::keyboard_collapse_cleanup_time`].
    #[must_use]
    pub const fn with_keyboard_collapse_cleanup_time(mut self, ms: u64) -> Self {
        self.keyboard_collapse_cleanup_time = ms;
        self
    }

    /// Sets [`AdaptationParams::height_change_threshold`].
    #[must_use]
    pub const fn with_height_change_threshold(mut self, px: f64) -> Self {
        self.height_change_threshold = px;
        self
    }

    /// Sets [`AdaptationParams::refocus_guard`].
    #[must_use]
    pub const fn with_refocus_guard(mut self, ms: u64) -> Self {
        self.refocus_guard = ms;
        self
    }

    /// Sets [`AdaptationParams::resize_settle_time`].
    #[must_use]
    pub const fn with_resize_settle_time(mut self, ms: u64) -> Self {
        self.resize_settle_time = ms;
        self
    }

    /// Sets [`AdaptationParams::pointer_baseline_max_age`].
    #[must_use]
    pub const fn with_pointer_baseline_max_age(mut self, ms: u64) -> Self {
        self.pointer_baseline_max_age = ms;
        self
    }

    /// Checks that every pixel quantity is finite and non-negative.
    ///
    /// Durations are unsigned and always valid.
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (field, value) in [
            ("estimatedKeyboardHeight", self.estimated_keyboard_height),
            ("safeInputPadding", self.safe_input_padding),
            ("heightChangeThreshold", self.height_change_threshold),
        ] {
            if !value.is_finite() {
                return Err(ParamsError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(ParamsError::Negative { field, value });
            }
        }
        Ok(())
    }
}

/// Rejected [`AdaptationParams`].
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ParamsError {
    /// A pixel quantity was NaN or infinite.
    #[error("`{field}` must be a finite number")]
    NonFinite {
        /// Option name, as spelled in configuration.
        field: &'static str,
    },
    /// A pixel quantity was negative.
    #[error("`{field}` must not be negative (got {value})")]
    Negative {
        /// Option name, as spelled in configuration.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}
