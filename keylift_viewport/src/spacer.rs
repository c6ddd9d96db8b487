// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reversible bottom-inset ("spacer") control.
//!
//! Overlay keyboards leave no room to scroll the last inputs of a page into the
//! visible area. Temporarily enlarging the bottom inset (padding) of a
//! container manufactures that room. [`Spacer`] records the container's
//! pre-existing inset the first time it is applied, derives every enlarged
//! value from that record, and writes the record back verbatim on clear.
//!
//! Insets are CSS-like length strings. Pixel values are added numerically; any
//! other unit is combined through `calc(..)` so the original value survives
//! untouched.

use alloc::format;
use alloc::string::String;

/// A container whose bottom inset can be read and overridden.
pub trait InsetContainer {
    /// Current computed bottom inset, for example `"16px"`.
    ///
    /// Returns `None` when the host cannot read computed style; the spacer then
    /// skips its work instead of guessing.
    fn computed_bottom_inset(&self) -> Option<String>;

    /// Overrides the bottom inset with `value`.
    fn set_bottom_inset(&mut self, value: &str);

    /// Undoes the override, given the computed inset read before it.
    ///
    /// The default writes `original` back with
    /// [`InsetContainer::set_bottom_inset`]. Hosts whose computed value differs
    /// from what was authored (an inline style over a stylesheet rule) override
    /// this to put the authored value back instead.
    fn restore_bottom_inset(&mut self, original: &str) {
        self.set_bottom_inset(original);
    }
}

/// Parses a pixel length (`"16px"`, `"0"`, `" 2.5px "`).
///
/// Returns `None` for other units, keywords, and non-finite numbers.
#[must_use]
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = if value == "0" {
        value
    } else {
        value.strip_suffix("px")?.trim_end()
    };
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Returns `original` enlarged by `amount` pixels.
///
/// ```rust
/// use keylift_viewport::grow_inset;
///
/// assert_eq!(grow_inset("16px", 300.0), "316px");
/// assert_eq!(grow_inset("", 300.0), "300px");
/// assert_eq!(grow_inset("2em", 300.0), "calc(2em + 300px)");
/// ```
#[must_use]
pub fn grow_inset(original: &str, amount: f64) -> String {
    let original = original.trim();
    if original.is_empty() {
        return format!("{amount}px");
    }
    match parse_px(original) {
        Some(px) => format!("{}px", px + amount),
        None => format!("calc({original} + {amount}px)"),
    }
}

/// Record of the single reversible inset modification.
///
/// The spacer is applied exactly while it holds an original value. That value is
/// captured once per unapplied → applied transition and is never overwritten
/// while applied, so repeated applications cannot lose the true original.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Spacer {
    original: Option<String>,
}

impl Spacer {
    /// Creates an unapplied spacer.
    #[must_use]
    pub const fn new() -> Self {
        Self { original: None }
    }

    /// Whether an enlarged inset is currently applied.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        self.original.is_some()
    }

    /// The inset captured before the current application, if applied.
    #[must_use]
    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    /// Sets the container's bottom inset to the saved original plus `amount`.
    ///
    /// The first call saves the computed inset; later calls re-derive from that
    /// saved value, so applying twice equals applying once.
    ///
    /// Returns `false` (and changes nothing) if the computed inset cannot be read
    /// or `amount` is not finite.
    pub fn apply_bottom_inset<C>(&mut self, container: &mut C, amount: f64) -> bool
    where
        C: InsetContainer + ?Sized,
    {
        if !amount.is_finite() {
            return false;
        }
        if self.original.is_none() {
            let Some(current) = container.computed_bottom_inset() else {
                tracing::debug!("computed inset unavailable; spacer skipped");
                return false;
            };
            self.original = Some(current);
        }
        let Some(original) = self.original.as_deref() else {
            return false;
        };
        let grown = grow_inset(original, amount);
        tracing::debug!(original, inset = %grown, "spacer applied");
        container.set_bottom_inset(&grown);
        true
    }

    /// Restores the saved original inset and forgets it.
    ///
    /// Returns `false` if nothing was applied.
    pub fn clear_bottom_inset<C>(&mut self, container: &mut C) -> bool
    where
        C: InsetContainer + ?Sized,
    {
        let Some(original) = self.original.take() else {
            return false;
        };
        tracing::debug!(inset = %original, "spacer cleared");
        container.restore_bottom_inset(&original);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[derive(Default)]
    struct Container {
        inset: String,
        unreadable: bool,
        writes: u32,
    }

    impl InsetContainer for Container {
        fn computed_bottom_inset(&self) -> Option<String> {
            (!self.unreadable).then(|| self.inset.clone())
        }
        fn set_bottom_inset(&mut self, value: &str) {
            self.inset = value.to_string();
            self.writes += 1;
        }
    }

    fn container(inset: &str) -> Container {
        Container {
            inset: inset.to_string(),
            ..Container::default()
        }
    }

    #[test]
    fn parse_px_accepts_pixels_and_bare_zero() {
        assert_eq!(parse_px("16px"), Some(16.0));
        assert_eq!(parse_px(" 2.5px "), Some(2.5));
        assert_eq!(parse_px("0"), Some(0.0));
        assert_eq!(parse_px("0px"), Some(0.0));
        assert_eq!(parse_px("1em"), None);
        assert_eq!(parse_px("auto"), None);
        assert_eq!(parse_px("px"), None);
        assert_eq!(parse_px("infpx"), None);
    }

    #[test]
    fn apply_adds_to_the_original() {
        let mut c = container("24px");
        let mut spacer = Spacer::new();

        assert!(spacer.apply_bottom_inset(&mut c, 300.0));
        assert_eq!(c.inset, "324px");
        assert_eq!(spacer.original(), Some("24px"));
    }

    #[test]
    fn repeated_apply_does_not_compound() {
        let mut c = container("0px");
        let mut spacer = Spacer::new();

        spacer.apply_bottom_inset(&mut c, 300.0);
        spacer.apply_bottom_inset(&mut c, 300.0);
        spacer.apply_bottom_inset(&mut c, 300.0);

        assert_eq!(c.inset, "300px");
        // The original was read once and never replaced by an enlarged value.
        assert_eq!(spacer.original(), Some("0px"));
    }

    #[test]
    fn clear_restores_non_pixel_original_verbatim() {
        let mut c = container("1.5rem");
        let mut spacer = Spacer::new();

        spacer.apply_bottom_inset(&mut c, 300.0);
        assert_eq!(c.inset, "calc(1.5rem + 300px)");

        assert!(spacer.clear_bottom_inset(&mut c));
        assert_eq!(c.inset, "1.5rem");
        assert!(!spacer.is_applied());
    }

    /// Inline value layered over a stylesheet rule of `16px`.
    struct Styled {
        inline: Option<String>,
        restores: u32,
    }

    impl InsetContainer for Styled {
        fn computed_bottom_inset(&self) -> Option<String> {
            Some(self.inline.clone().unwrap_or_else(|| "16px".to_string()))
        }
        fn set_bottom_inset(&mut self, value: &str) {
            self.inline = Some(value.to_string());
        }
        fn restore_bottom_inset(&mut self, _original: &str) {
            self.inline = None;
            self.restores += 1;
        }
    }

    #[test]
    fn clear_goes_through_the_restore_hook() {
        let mut c = Styled {
            inline: None,
            restores: 0,
        };
        let mut spacer = Spacer::new();

        spacer.apply_bottom_inset(&mut c, 300.0);
        assert_eq!(c.inline.as_deref(), Some("316px"));

        assert!(spacer.clear_bottom_inset(&mut c));
        assert_eq!(c.restores, 1);
        // The stylesheet rule is back in charge; no inline value pins it.
        assert_eq!(c.inline, None);
        assert!(!spacer.clear_bottom_inset(&mut c));
        assert_eq!(c.restores, 1);
    }

    #[test]
    fn clear_without_apply_is_a_no_op() {
        let mut c = container("8px");
        let mut spacer = Spacer::new();

        assert!(!spacer.clear_bottom_inset(&mut c));
        assert_eq!(c.writes, 0);
    }

    #[test]
    fn unreadable_style_skips_the_spacer() {
        let mut c = container("8px");
        c.unreadable = true;
        let mut spacer = Spacer::new();

        assert!(!spacer.apply_bottom_inset(&mut c, 300.0));
        assert!(!spacer.is_applied());
        assert_eq!(c.writes, 0);
    }

    #[test]
    fn non_finite_amount_is_ignored() {
        let mut c = container("8px");
        let mut spacer = Spacer::new();

        assert!(!spacer.apply_bottom_inset(&mut c, f64::NAN));
        assert_eq!(c.inset, "8px");
    }

    #[test]
    fn reapply_after_clear_recaptures() {
        let mut c = container("8px");
        let mut spacer = Spacer::new();

        spacer.apply_bottom_inset(&mut c, 100.0);
        spacer.clear_bottom_inset(&mut c);
        c.inset = "12px".to_string();
        spacer.apply_bottom_inset(&mut c, 100.0);

        assert_eq!(c.inset, "112px");
        assert_eq!(spacer.original(), Some("12px"));
    }
}
