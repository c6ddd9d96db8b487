// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated mobile browsers for driving `keylift_adapt` without a DOM.
//!
//! [`SimBrowser`] models a page of fixed content height inside a screen, a set
//! of named inputs, and an on-screen keyboard that either overlays the page or
//! shrinks the viewport. Scrolling is clamped to the available scroll room,
//! which is what makes the spacer necessary for inputs near the bottom of a
//! short page.

use std::cell::RefCell;
use std::rc::Rc;

use keylift_adapt::KeyboardAdapter;
use keylift_viewport::{InsetContainer, ViewportHost, parse_px};
use kurbo::Rect;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honoring `RUST_LOG` (default `debug`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// How the simulated platform reacts to the keyboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyboardMode {
    /// The keyboard covers the bottom of the page; the viewport keeps its size.
    Overlay,
    /// The viewport shrinks by the keyboard height.
    Resize,
}

/// A text input placed in document coordinates.
#[derive(Clone, Debug)]
pub struct SimInput {
    /// Handle used as the adapter's target key.
    pub name: &'static str,
    /// Bottom edge in document coordinates.
    pub bottom: f64,
    /// Box height.
    pub height: f64,
}

/// The page body; its inline padding is shared with the browser for layout.
#[derive(Clone, Debug)]
pub struct SimBody {
    padding: Rc<RefCell<String>>,
}

impl InsetContainer for SimBody {
    fn computed_bottom_inset(&self) -> Option<String> {
        Some(self.padding.borrow().clone())
    }

    fn set_bottom_inset(&mut self, value: &str) {
        debug!(value, "body padding-bottom");
        *self.padding.borrow_mut() = value.to_owned();
    }
}

/// A phone screen showing one scrollable page.
#[derive(Debug)]
pub struct SimBrowser {
    mode: KeyboardMode,
    screen_height: f64,
    keyboard_height: f64,
    keyboard_open: bool,
    content_height: f64,
    scroll_y: f64,
    inputs: Vec<SimInput>,
    padding: Rc<RefCell<String>>,
}

impl SimBrowser {
    /// Creates a page of `content_height` on a screen of `screen_height`.
    pub fn new(mode: KeyboardMode, screen_height: f64, content_height: f64) -> Self {
        Self {
            mode,
            screen_height,
            keyboard_height: 300.0,
            keyboard_open: false,
            content_height,
            scroll_y: 0.0,
            inputs: Vec::new(),
            padding: Rc::new(RefCell::new("0px".to_owned())),
        }
    }

    /// Sets the real keyboard height (the adapter only ever estimates it).
    pub fn with_keyboard_height(mut self, px: f64) -> Self {
        self.keyboard_height = px;
        self
    }

    /// Adds an input whose bottom edge sits at `bottom` in document coordinates.
    pub fn with_input(mut self, name: &'static str, bottom: f64) -> Self {
        self.inputs.push(SimInput {
            name,
            bottom,
            height: 44.0,
        });
        self
    }

    /// The body element, to be handed to the adapter as its container.
    pub fn body(&self) -> SimBody {
        SimBody {
            padding: Rc::clone(&self.padding),
        }
    }

    /// Current inline `padding-bottom` of the body.
    pub fn padding(&self) -> String {
        self.padding.borrow().clone()
    }

    /// Opens or closes the keyboard.
    pub fn set_keyboard(&mut self, open: bool) {
        info!(open, mode = ?self.mode, "keyboard");
        self.keyboard_open = open;
    }

    /// Removes an input from the page.
    pub fn remove_input(&mut self, name: &str) {
        self.inputs.retain(|input| input.name != name);
    }

    /// Scroll offset, clamped to the room the current layout allows.
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y.clamp(0.0, self.max_scroll())
    }

    /// Lowest viewport Y the user can actually see.
    pub fn visible_bottom(&self) -> f64 {
        match self.mode {
            KeyboardMode::Overlay if self.keyboard_open => {
                self.layout_height() - self.keyboard_height
            }
            _ => self.layout_height(),
        }
    }

    /// Whether any part of `name` is hidden behind the keyboard.
    pub fn is_obscured(&self, name: &str) -> bool {
        self.input(name)
            .is_some_and(|input| input.bottom - self.scroll_y() > self.visible_bottom())
    }

    fn layout_height(&self) -> f64 {
        match self.mode {
            KeyboardMode::Resize if self.keyboard_open => {
                self.screen_height - self.keyboard_height
            }
            _ => self.screen_height,
        }
    }

    fn max_scroll(&self) -> f64 {
        let padding = parse_px(&self.padding.borrow()).unwrap_or(0.0);
        (self.content_height + padding - self.layout_height()).max(0.0)
    }

    fn input(&self, name: &str) -> Option<&SimInput> {
        self.inputs.iter().find(|input| input.name == name)
    }
}

impl ViewportHost<&'static str> for SimBrowser {
    fn visual_viewport_height(&self) -> Option<f64> {
        Some(self.layout_height())
    }

    fn inner_height(&self) -> f64 {
        self.screen_height
    }

    fn is_attached(&self, target: &&'static str) -> bool {
        self.input(target).is_some()
    }

    fn bounding_rect(&self, target: &&'static str) -> Option<Rect> {
        let input = self.input(target)?;
        let bottom = input.bottom - self.scroll_y();
        Some(Rect::new(16.0, bottom - input.height, 344.0, bottom))
    }

    fn scroll_into_view(&mut self, target: &&'static str) {
        let Some(bottom) = self.input(target).map(|input| input.bottom) else {
            return;
        };
        // Align the bottom edge with the lowest visible row, as far as the
        // scroll room allows.
        let wanted = (bottom - self.visible_bottom()).max(self.scroll_y());
        self.scroll_y = wanted.clamp(0.0, self.max_scroll());
        info!(input = *target, scroll_y = self.scroll_y, "scrolled");
    }
}

/// Runs every adapter deadline up to and including `until`.
pub fn run_until(
    kb: &mut KeyboardAdapter<&'static str, SimBody>,
    browser: &mut SimBrowser,
    until: u64,
) {
    while let Some(deadline) = kb.next_deadline()
        && deadline <= until
    {
        kb.advance(browser, deadline);
    }
}
