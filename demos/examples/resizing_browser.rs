// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A keyboard that shrinks the viewport.
//!
//! The platform resizes the layout itself, so the adapter only observes the
//! height drop and stays out of the way: no scroll, no padding. A second
//! episode shows the same conclusion reached through the settle timeout when
//! the resize notification never arrives.
//!
//! Run:
//! - `cargo run -p keylift_demos --example resizing_browser`

use anyhow::ensure;
use keylift_adapt::{Adaptation, AdaptationParams, KeyboardAdapter};
use keylift_demos::{KeyboardMode, SimBrowser, init_tracing, run_until};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut browser = SimBrowser::new(KeyboardMode::Resize, 800.0, 1_600.0)
        .with_keyboard_height(280.0)
        .with_input("search", 760.0);
    let mut kb = KeyboardAdapter::try_new(AdaptationParams::default(), browser.body())?;

    // Resize notification arrives inside the settle wait.
    kb.on_pointer_start(&browser, 0);
    kb.on_focus(&mut browser, "search", 0);
    browser.set_keyboard(true);
    ensure!(kb.is_awaiting_resize());
    ensure!(kb.on_viewport_resize(60), "resize notification ignored");
    run_until(&mut kb, &mut browser, 400);
    info!(outcome = ?kb.last_adaptation(), "resize notification");
    ensure!(kb.last_adaptation() == Some(Adaptation::ResizeHandled));

    kb.on_blur(500);
    browser.set_keyboard(false);
    run_until(&mut kb, &mut browser, 700);

    // Same platform, but the notification is lost: the timeout decides.
    kb.on_pointer_start(&browser, 1_000);
    kb.on_focus(&mut browser, "search", 1_000);
    browser.set_keyboard(true);
    run_until(&mut kb, &mut browser, 1_500);
    info!(outcome = ?kb.last_adaptation(), "settle timeout");
    ensure!(kb.last_adaptation() == Some(Adaptation::ResizeHandled));

    ensure!(browser.scroll_y() == 0.0, "page was scrolled");
    ensure!(browser.padding() == "0px", "page was padded");
    Ok(())
}
