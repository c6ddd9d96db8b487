// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser driver for the adaptation state machine.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use js_sys::Function;
use keylift_adapt::{AdaptationParams, FocusOutcome, KeyboardAdapter, KeyboardPhase};
use tracing::{trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{EventTarget, HtmlElement, Performance, Window};

use crate::{DomInset, DomViewport, LiftError};

#[expect(
    clippy::cast_possible_truncation,
    reason = "whole milliseconds are all the machine schedules with"
)]
fn millis(ms: f64) -> u64 {
    ms.max(0.0) as u64
}

struct Machine {
    adapter: KeyboardAdapter<HtmlElement, DomInset>,
    viewport: DomViewport,
}

struct Shared {
    window: Window,
    /// Monotonic clock; `Date.now()` is only used where it is missing.
    performance: Option<Performance>,
    machine: RefCell<Machine>,
    /// `visualViewport` when the platform has one, else `window`.
    resize_target: EventTarget,
    listening: Cell<bool>,
    timeout: Cell<Option<i32>>,
    on_tick: Closure<dyn FnMut()>,
    on_resize: Closure<dyn FnMut()>,
}

impl Shared {
    /// Runs `f` against the machine, then re-syncs the timer and listener.
    fn with_machine<R>(&self, f: impl FnOnce(&mut Machine, u64) -> R) -> Option<R> {
        let Ok(mut machine) = self.machine.try_borrow_mut() else {
            warn!("re-entrant keyboard event dropped");
            return None;
        };
        let now = self.now();
        let out = f(&mut *machine, now);
        self.rearm_timeout(machine.adapter.next_deadline(), now);
        self.set_listening(machine.adapter.is_awaiting_resize());
        Some(out)
    }

    fn now(&self) -> u64 {
        match &self.performance {
            Some(performance) => millis(performance.now()),
            None => millis(js_sys::Date::now()),
        }
    }

    /// Clears the timeout and removes the resize listener.
    fn detach(&self) {
        self.rearm_timeout(None, 0);
        self.set_listening(false);
    }

    fn rearm_timeout(&self, deadline: Option<u64>, now: u64) {
        if let Some(handle) = self.timeout.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        let Some(deadline) = deadline else {
            return;
        };
        let delay = i32::try_from(deadline.saturating_sub(now)).unwrap_or(i32::MAX);
        let callback: &Function = self.on_tick.as_ref().unchecked_ref();
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback, delay)
        {
            Ok(handle) => {
                trace!(deadline, delay, "timeout armed");
                self.timeout.set(Some(handle));
            }
            Err(err) => warn!(?err, deadline, "setTimeout failed"),
        }
    }

    fn set_listening(&self, listen: bool) {
        if self.listening.get() == listen {
            return;
        }
        let callback: &Function = self.on_resize.as_ref().unchecked_ref();
        let result = if listen {
            self.resize_target
                .add_event_listener_with_callback("resize", callback)
        } else {
            self.resize_target
                .remove_event_listener_with_callback("resize", callback)
        };
        match result {
            Ok(()) => self.listening.set(listen),
            Err(err) => warn!(?err, listen, "resize listener update failed"),
        }
    }
}

/// Keeps focused inputs of one page visible above an overlaid keyboard.
///
/// Create one per page (or per group of inputs that share a scroll container)
/// and forward the inputs' `pointerdown`, `focus` and `blur` events. Dropping
/// the lift disposes it.
pub struct KeyboardLift {
    shared: Rc<Shared>,
}

impl KeyboardLift {
    /// Creates a lift that pads `document.body`.
    pub fn new(params: AdaptationParams) -> Result<Self, LiftError> {
        Self::with_container(params, DomInset::body()?)
    }

    /// Creates a lift that pads `container`.
    pub fn with_container(
        params: AdaptationParams,
        container: DomInset,
    ) -> Result<Self, LiftError> {
        let viewport = DomViewport::new()?;
        let adapter = KeyboardAdapter::try_new(params, container)?;
        let window = viewport.window().clone();
        let performance = window.performance();
        if performance.is_none() {
            warn!("window.performance unavailable; timing follows the wall clock");
        }
        let resize_target: EventTarget = match window.visual_viewport() {
            Some(vv) => vv.into(),
            None => window.clone().into(),
        };

        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let tick = weak.clone();
            let on_tick = Closure::<dyn FnMut()>::new(move || {
                if let Some(shared) = tick.upgrade() {
                    shared.timeout.set(None);
                    shared.with_machine(|m, now| m.adapter.advance(&mut m.viewport, now));
                }
            });
            let resize = weak.clone();
            let on_resize = Closure::<dyn FnMut()>::new(move || {
                if let Some(shared) = resize.upgrade() {
                    shared.with_machine(|m, now| m.adapter.on_viewport_resize(now));
                }
            });
            Shared {
                window,
                performance,
                machine: RefCell::new(Machine { adapter, viewport }),
                resize_target,
                listening: Cell::new(false),
                timeout: Cell::new(None),
                on_tick,
                on_resize,
            }
        });
        Ok(Self { shared })
    }

    /// Call from the input's `pointerdown` (or `touchstart`) handler.
    pub fn on_pointer_start(&self) {
        self.shared
            .with_machine(|m, now| m.adapter.on_pointer_start(&m.viewport, now));
    }

    /// Call from the input's `focus` handler.
    ///
    /// Returns `None` if the event arrived while the lift was busy handling
    /// another one.
    pub fn on_focus(&self, element: HtmlElement) -> Option<FocusOutcome> {
        self.shared
            .with_machine(|m, now| m.adapter.on_focus(&mut m.viewport, element, now))
    }

    /// Call from the input's `blur` handler.
    pub fn on_blur(&self) {
        self.shared.with_machine(|m, now| m.adapter.on_blur(now));
    }

    /// Cancels pending work, restores the padding and detaches the listeners.
    pub fn dispose(&self) {
        self.shared.with_machine(|m, _| m.adapter.dispose());
    }

    /// Current phase of the underlying machine.
    ///
    /// `None` while the machine is busy handling an event.
    pub fn phase(&self) -> Option<KeyboardPhase> {
        let machine = self.shared.machine.try_borrow().ok()?;
        Some(machine.adapter.phase())
    }

    /// Configuration in use, or `None` while the machine is busy.
    pub fn params(&self) -> Option<AdaptationParams> {
        let machine = self.shared.machine.try_borrow().ok()?;
        Some(*machine.adapter.params())
    }

    /// Whether the resize listener is currently attached.
    pub fn is_listening(&self) -> bool {
        self.shared.listening.get()
    }

    /// Whether a `setTimeout` wake-up is armed.
    pub fn has_pending_timeout(&self) -> bool {
        self.shared.timeout.get().is_some()
    }
}

impl fmt::Debug for KeyboardLift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardLift")
            .field("phase", &self.phase())
            .field("listening", &self.is_listening())
            .field("timeout", &self.shared.timeout.get())
            .finish_non_exhaustive()
    }
}

impl Drop for KeyboardLift {
    fn drop(&mut self) {
        self.dispose();
        // Dropped from inside a handler: the machine was busy, but the
        // callbacks are about to go away, so unhook them regardless.
        self.shared.detach();
    }
}
