// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM implementations of the viewport and inset traits.

use keylift_viewport::{InsetContainer, ViewportHost};
use kurbo::Rect;
use tracing::warn;
use web_sys::{
    HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::LiftError;

const PADDING_BOTTOM: &str = "padding-bottom";

fn window() -> Result<Window, LiftError> {
    web_sys::window().ok_or(LiftError::NoWindow)
}

fn body(window: &Window) -> Result<HtmlElement, LiftError> {
    window
        .document()
        .ok_or(LiftError::NoDocument)?
        .body()
        .ok_or(LiftError::NoBody)
}

/// Measures the browser viewport and the managed inputs.
///
/// An input counts as attached while `document.body` contains it.
#[derive(Clone, Debug)]
pub struct DomViewport {
    window: Window,
    body: HtmlElement,
}

impl DomViewport {
    /// Binds to the global window and its document body.
    pub fn new() -> Result<Self, LiftError> {
        let window = window()?;
        let body = body(&window)?;
        Ok(Self { window, body })
    }

    /// The window this viewport measures.
    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl ViewportHost<HtmlElement> for DomViewport {
    fn visual_viewport_height(&self) -> Option<f64> {
        self.window.visual_viewport().map(|vv| vv.height())
    }

    fn inner_height(&self) -> f64 {
        match self.window.inner_height() {
            Ok(height) => height.as_f64().unwrap_or(0.0),
            Err(err) => {
                warn!(?err, "window.innerHeight unavailable");
                0.0
            }
        }
    }

    fn is_attached(&self, target: &HtmlElement) -> bool {
        self.body.contains(Some(target.as_ref()))
    }

    fn bounding_rect(&self, target: &HtmlElement) -> Option<Rect> {
        let rect = target.get_bounding_client_rect();
        Some(Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom()))
    }

    fn scroll_into_view(&mut self, target: &HtmlElement) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_inline(ScrollLogicalPosition::End);
        target.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

/// An element whose bottom padding serves as the spacer.
///
/// The spacer is written as an inline style. Restoring puts back the inline
/// value the element had before the first write, or removes the property when
/// there was none, so stylesheet rules keep applying afterwards.
#[derive(Clone, Debug)]
pub struct DomInset {
    window: Window,
    element: HtmlElement,
    /// Inline `padding-bottom` before the first override.
    inline_before: Option<String>,
}

impl DomInset {
    /// Uses `element` as the padding container.
    pub fn new(element: HtmlElement) -> Result<Self, LiftError> {
        Ok(Self {
            window: window()?,
            element,
            inline_before: None,
        })
    }

    /// Uses `document.body`, the default padding container.
    pub fn body() -> Result<Self, LiftError> {
        let window = window()?;
        let element = body(&window)?;
        Ok(Self {
            window,
            element,
            inline_before: None,
        })
    }

    /// The padded element.
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl InsetContainer for DomInset {
    fn computed_bottom_inset(&self) -> Option<String> {
        let style = match self.window.get_computed_style(&self.element) {
            Ok(Some(style)) => style,
            Ok(None) => return None,
            Err(err) => {
                warn!(?err, "getComputedStyle failed");
                return None;
            }
        };
        style
            .get_property_value(PADDING_BOTTOM)
            .inspect_err(|err| warn!(?err, "computed padding-bottom unreadable"))
            .ok()
    }

    fn set_bottom_inset(&mut self, value: &str) {
        let style = self.element.style();
        if self.inline_before.is_none() {
            match style.get_property_value(PADDING_BOTTOM) {
                Ok(inline) => self.inline_before = Some(inline),
                Err(err) => warn!(?err, "inline padding-bottom unreadable"),
            }
        }
        if let Err(err) = style.set_property(PADDING_BOTTOM, value) {
            warn!(?err, value, "padding-bottom write rejected");
        }
    }

    fn restore_bottom_inset(&mut self, original: &str) {
        let style = self.element.style();
        let result = match self.inline_before.take() {
            Some(inline) if inline.is_empty() => style.remove_property(PADDING_BOTTOM).map(drop),
            Some(inline) => style.set_property(PADDING_BOTTOM, &inline),
            // Inline value never captured: fall back to the computed one.
            None => style.set_property(PADDING_BOTTOM, original),
        };
        if let Err(err) = result {
            warn!(?err, "padding-bottom restore rejected");
        }
    }
}
