// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An overlaying keyboard on a short page.
//!
//! The message field sits near the bottom of a page with little scroll room,
//! so the first scroll cannot lift it clear of the keyboard. The adapter pads
//! the body and scrolls again, keeps the padding while focus hops to another
//! field, and removes it once the keyboard closes.
//!
//! Run:
//! - `cargo run -p keylift_demos --example overlay_browser`
//! - `RUST_LOG=keylift_adapt=trace cargo run -p keylift_demos --example overlay_browser`

use anyhow::{Context, ensure};
use keylift_adapt::{Adaptation, AdaptationParams, KeyboardAdapter, KeyboardPhase};
use keylift_demos::{KeyboardMode, SimBrowser, init_tracing, run_until};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Options as a host page would pass them from JavaScript.
    let params: AdaptationParams =
        serde_json::from_str(r#"{ "estimatedKeyboardHeight": 300, "safeInputPadding": 16 }"#)
            .context("parsing adapter options")?;

    let mut browser = SimBrowser::new(KeyboardMode::Overlay, 800.0, 1_000.0)
        .with_input("subject", 600.0)
        .with_input("message", 980.0);
    let mut kb = KeyboardAdapter::try_new(params, browser.body())?;

    // Tap the message field; the keyboard slides in over the page.
    kb.on_pointer_start(&browser, 0);
    kb.on_focus(&mut browser, "message", 10);
    browser.set_keyboard(true);
    run_until(&mut kb, &mut browser, 400);

    info!(
        outcome = ?kb.last_adaptation(),
        padding = %browser.padding(),
        scroll_y = browser.scroll_y(),
        "message field settled"
    );
    ensure!(kb.last_adaptation() == Some(Adaptation::Padded));
    ensure!(!browser.is_obscured("message"), "message field still hidden");

    // Hop to the subject field: blur and focus land inside the cleanup delay.
    kb.on_blur(1_000);
    kb.on_pointer_start(&browser, 1_020);
    kb.on_focus(&mut browser, "subject", 1_030);
    run_until(&mut kb, &mut browser, 1_500);
    info!(outcome = ?kb.last_adaptation(), padding = %browser.padding(), "subject field settled");
    ensure!(browser.padding() == "300px", "padding dropped while hopping");

    // Dismiss the keyboard.
    kb.on_blur(2_000);
    browser.set_keyboard(false);
    run_until(&mut kb, &mut browser, 2_500);
    info!(padding = %browser.padding(), scroll_y = browser.scroll_y(), "keyboard closed");
    ensure!(browser.padding() == "0px");
    ensure!(kb.phase() == KeyboardPhase::Idle);

    kb.dispose();
    Ok(())
}
