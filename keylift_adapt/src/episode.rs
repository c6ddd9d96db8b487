// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus episodes and machine phases.

/// Phase of the adaptation state machine.
///
/// ```text
/// Idle ──focus──▶ Expanding ──overlay──▶ Adapting ──▶ Idle
///                     └──resized / visible / detached──▶ Idle
/// Idle ──blur──▶ Collapsing ──cleanup──▶ Idle
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyboardPhase {
    /// No episode in flight.
    #[default]
    Idle,
    /// Focused; waiting for a resize notification or the settle timeout.
    Expanding,
    /// Overlay mode detected; running the scroll / recheck / pad ladder.
    Adapting,
    /// Blurred; the debounced spacer cleanup is pending.
    Collapsing,
}

/// Identifier of a focus episode, unique per machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpisodeId(pub(crate) u64);

impl EpisodeId {
    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One focus-to-blur cycle on a managed input.
///
/// The target is a host handle; the episode refers to the element, it does not
/// own it. The machine's current phase is reported by
/// [`KeyboardAdapter::phase`](crate::KeyboardAdapter::phase).
#[derive(Clone, Debug, PartialEq)]
pub struct Episode<K> {
    pub(crate) id: EpisodeId,
    pub(crate) target: K,
    pub(crate) baseline: f64,
    pub(crate) started_at: u64,
}

impl<K> Episode<K> {
    /// Episode identifier.
    #[must_use]
    pub const fn id(&self) -> EpisodeId {
        self.id
    }

    /// The focused input.
    #[must_use]
    pub const fn target(&self) -> &K {
        &self.target
    }

    /// Viewport height recorded before the keyboard started to show.
    #[must_use]
    pub const fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Timestamp of the focus that opened the episode.
    #[must_use]
    pub const fn started_at(&self) -> u64 {
        self.started_at
    }
}
