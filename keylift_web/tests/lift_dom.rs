// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser tests for the DOM driver.
//!
//! Run with `wasm-pack test --headless --chrome keylift_web`.

#![cfg(target_arch = "wasm32")]

use js_sys::{Function, Promise};
use keylift_adapt::{AdaptationParams, FocusOutcome, KeyboardPhase};
use keylift_viewport::Spacer;
use keylift_web::{DomInset, KeyboardLift};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Event, EventTarget, HtmlElement, Window};

wasm_bindgen_test_configure!(run_in_browser);

fn window() -> Window {
    web_sys::window().expect("window")
}

fn append(tag: &str) -> HtmlElement {
    let document = window().document().expect("document");
    let element = document.create_element(tag).expect("create element");
    document
        .body()
        .expect("body")
        .append_child(&element)
        .expect("append to body");
    element.dyn_into().expect("HtmlElement")
}

fn fire_resize() {
    let target: EventTarget = match window().visual_viewport() {
        Some(vv) => vv.into(),
        None => window().into(),
    };
    let event = Event::new("resize").expect("resize event");
    target.dispatch_event(&event).expect("dispatch resize");
}

async fn sleep(ms: i32) {
    let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
        window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .expect("setTimeout");
    });
    JsFuture::from(promise).await.expect("sleep");
}

fn padding_bottom(element: &HtmlElement) -> String {
    element
        .style()
        .get_property_value("padding-bottom")
        .expect("inline padding-bottom")
}

#[wasm_bindgen_test]
fn resize_listener_is_attached_only_while_awaiting() {
    let lift = KeyboardLift::new(AdaptationParams::default()).expect("lift");
    let field = append("input");
    assert!(!lift.is_listening());
    assert!(!lift.has_pending_timeout());

    assert!(matches!(
        lift.on_focus(field.clone()),
        Some(FocusOutcome::Started(_))
    ));
    assert!(lift.is_listening());
    assert!(lift.has_pending_timeout());

    fire_resize();
    assert!(!lift.is_listening(), "listener must be single-fire");
    // The settled reading is still ahead.
    assert!(lift.has_pending_timeout());
    assert_eq!(lift.phase(), Some(KeyboardPhase::Expanding));

    drop(lift);
    field.remove();
}

#[wasm_bindgen_test]
async fn settle_timeout_runs_the_episode_to_completion() {
    let lift = KeyboardLift::new(AdaptationParams::default()).expect("lift");
    let field = append("input");

    lift.on_pointer_start();
    lift.on_focus(field.clone());
    sleep(600).await;

    assert_eq!(lift.phase(), Some(KeyboardPhase::Idle));
    assert!(!lift.is_listening());
    assert!(!lift.has_pending_timeout());

    drop(lift);
    field.remove();
}

#[wasm_bindgen_test]
fn dispose_detaches_and_rejects_later_focus() {
    let lift = KeyboardLift::new(AdaptationParams::default()).expect("lift");
    let field = append("input");

    lift.on_focus(field.clone());
    lift.dispose();
    assert!(!lift.is_listening());
    assert!(!lift.has_pending_timeout());
    assert_eq!(lift.on_focus(field.clone()), Some(FocusOutcome::Disposed));
    assert!(!lift.is_listening());
    assert_eq!(lift.params(), Some(AdaptationParams::default()));

    drop(lift);
    field.remove();
}

#[wasm_bindgen_test]
async fn dropped_lift_leaves_no_callbacks_behind() {
    let lift = KeyboardLift::new(AdaptationParams::default()).expect("lift");
    let field = append("input");

    lift.on_focus(field.clone());
    assert!(lift.is_listening());
    drop(lift);

    // Neither the resize listener nor the timeout may reach freed closures.
    fire_resize();
    sleep(300).await;
    field.remove();
}

#[wasm_bindgen_test]
fn spacer_clear_removes_the_inline_padding() {
    let panel = append("div");
    let mut inset = DomInset::new(panel.clone()).expect("inset");
    let mut spacer = Spacer::new();

    assert!(spacer.apply_bottom_inset(&mut inset, 300.0));
    assert_eq!(padding_bottom(&panel), "300px");
    assert!(spacer.clear_bottom_inset(&mut inset));
    // No inline value pins the computed one; stylesheet rules apply again.
    assert_eq!(padding_bottom(&panel), "");

    panel.remove();
}

#[wasm_bindgen_test]
fn spacer_clear_restores_an_existing_inline_padding() {
    let panel = append("div");
    panel
        .style()
        .set_property("padding-bottom", "12px")
        .expect("inline padding");
    let mut inset = DomInset::new(panel.clone()).expect("inset");
    let mut spacer = Spacer::new();

    assert!(spacer.apply_bottom_inset(&mut inset, 300.0));
    assert_eq!(padding_bottom(&panel), "312px");
    assert!(spacer.clear_bottom_inset(&mut inset));
    assert_eq!(padding_bottom(&panel), "12px");

    panel.remove();
}
