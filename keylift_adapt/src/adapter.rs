// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The adaptation state machine.

use keylift_timer::{TimerId, TimerRegistry};
use keylift_viewport::{
    InsetContainer, Spacer, ViewportHost, current_viewport_height, is_below_visibility_boundary,
    scroll_into_view_if_needed,
};

use crate::{AdaptationParams, Episode, EpisodeId, KeyboardPhase, ParamsError};

/// Deferred step of an episode.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Task {
    /// Fallback when no resize notification arrives.
    Settle(EpisodeId),
    /// Height reading once the keyboard animation behind a resize has finished.
    ResizeSettled(EpisodeId),
    /// Visibility re-test after the first scroll.
    Recheck { episode: EpisodeId, boundary: f64 },
    /// Debounced spacer removal after blur.
    Collapse,
}

/// What [`KeyboardAdapter::on_focus`] did with a focus event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusOutcome {
    /// A new episode started; its settle/resize race is armed.
    Started(EpisodeId),
    /// A focus on another input arrived inside the refocus guard window; the
    /// running episode now targets the new input without restarting its race.
    Retargeted(EpisodeId),
    /// The same input was focused again inside the refocus guard window.
    Duplicate,
    /// The target is not attached to the document.
    Detached,
    /// The machine has been disposed.
    Disposed,
}

/// Result of one adaptation step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Adaptation {
    /// The viewport shrank past the threshold: the platform resized the layout
    /// and nothing else is done.
    ResizeHandled,
    /// Overlay mode, but the input was already clear of the keyboard.
    AlreadyVisible,
    /// A scroll was requested; a visibility re-test is scheduled.
    Scrolled,
    /// The re-test found the input visible.
    VisibleAfterScroll,
    /// The input was still obscured; the spacer was applied and the scroll re-issued.
    Padded,
    /// The input was still obscured but the container inset could not be read,
    /// so only the scroll was re-issued.
    SpacerUnavailable,
    /// The target left the document mid-episode; the episode was dropped.
    Detached,
}

/// Keeps focused inputs visible above an overlaid on-screen keyboard.
///
/// One adapter is shared by every managed input of a page, so that switching
/// focus between inputs cancels the previous input's work. See the crate docs
/// for the driving protocol.
///
/// `K` is the host's target handle; `C` is the container receiving the
/// reversible bottom inset.
#[derive(Debug)]
pub struct KeyboardAdapter<K, C> {
    params: AdaptationParams,
    container: C,
    spacer: Spacer,
    timers: TimerRegistry<Task>,
    phase: KeyboardPhase,
    episode: Option<Episode<K>>,
    next_episode: u64,
    /// Height and timestamp of the last pointer start.
    pointer_baseline: Option<(f64, u64)>,
    last_focus_at: Option<u64>,
    /// Episode whose single-fire resize subscription is armed.
    awaiting_resize: Option<EpisodeId>,
    settle: Option<TimerId>,
    collapse: Option<TimerId>,
    last_adaptation: Option<Adaptation>,
}

fn transition(phase: &mut KeyboardPhase, to: KeyboardPhase) {
    if *phase != to {
        tracing::debug!(from = ?*phase, to = ?to, "keyboard phase");
        *phase = to;
    }
}

impl<K: PartialEq, C: InsetContainer> KeyboardAdapter<K, C> {
    /// Creates an idle adapter.
    ///
    /// `params` is taken as given; use [`KeyboardAdapter::try_new`] to reject
    /// non-finite or negative pixel values.
    pub fn new(params: AdaptationParams, container: C) -> Self {
        Self {
            params,
            container,
            spacer: Spacer::new(),
            timers: TimerRegistry::new(),
            phase: KeyboardPhase::Idle,
            episode: None,
            next_episode: 1,
            pointer_baseline: None,
            last_focus_at: None,
            awaiting_resize: None,
            settle: None,
            collapse: None,
            last_adaptation: None,
        }
    }

    /// Creates an idle adapter after validating `params`.
    pub fn try_new(params: AdaptationParams, container: C) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self::new(params, container))
    }

    /// Configuration in use.
    #[must_use]
    pub const fn params(&self) -> &AdaptationParams {
        &self.params
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> KeyboardPhase {
        self.phase
    }

    /// The episode in flight, if any.
    #[must_use]
    pub const fn episode(&self) -> Option<&Episode<K>> {
        self.episode.as_ref()
    }

    /// Outcome of the most recent adaptation step.
    #[must_use]
    pub const fn last_adaptation(&self) -> Option<Adaptation> {
        self.last_adaptation
    }

    /// The reversible inset record.
    #[must_use]
    pub const fn spacer(&self) -> &Spacer {
        &self.spacer
    }

    /// The container receiving the inset.
    #[must_use]
    pub const fn container(&self) -> &C {
        &self.container
    }

    /// Mutable access to the container.
    ///
    /// Replacing its inset behind the adapter's back while the spacer is applied
    /// is not tracked; the next clear restores the originally captured value.
    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    /// Whether the current episode waits for a viewport resize notification.
    ///
    /// Hosts subscribe a single-fire resize listener while this is `true` and
    /// remove it once it turns `false`.
    #[must_use]
    pub const fn is_awaiting_resize(&self) -> bool {
        self.awaiting_resize.is_some()
    }

    /// Whether a debounced collapse is pending.
    #[must_use]
    pub const fn has_pending_collapse(&self) -> bool {
        self.collapse.is_some()
    }

    /// Earliest timestamp at which [`KeyboardAdapter::advance`] has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Whether [`KeyboardAdapter::dispose`] has been called.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.timers.is_disposed()
    }

    /// Records the viewport height at time `now`, before the platform's focus
    /// sequence starts.
    ///
    /// Some platforms begin animating the keyboard before `focus` is delivered,
    /// so a reading taken at pointer-down is the trustworthy baseline. The next
    /// [`KeyboardAdapter::on_focus`] consumes it whatever its outcome, and
    /// ignores it once it is older than
    /// [`AdaptationParams::pointer_baseline_max_age`].
    pub fn on_pointer_start<H>(&mut self, host: &H, now: u64)
    where
        H: ViewportHost<K> + ?Sized,
    {
        if self.is_disposed() {
            return;
        }
        let baseline = current_viewport_height::<K, _>(host);
        tracing::trace!(baseline, "pointer baseline captured");
        self.pointer_baseline = Some((baseline, now));
    }

    /// Handles a focus event on `target` at time `now`.
    pub fn on_focus<H>(&mut self, host: &mut H, target: K, now: u64) -> FocusOutcome
    where
        H: ViewportHost<K> + ?Sized,
    {
        let max_age = self.params.pointer_baseline_max_age;
        let pointer = self
            .pointer_baseline
            .take()
            .filter(|&(_, at)| now.saturating_sub(at) <= max_age)
            .map(|(height, _)| height);
        if self.is_disposed() {
            return FocusOutcome::Disposed;
        }
        if !host.is_attached(&target) {
            tracing::debug!("focus on a detached target ignored");
            return FocusOutcome::Detached;
        }

        // Refocus before the keyboard finished closing.
        if let Some(timer) = self.collapse.take() {
            self.timers.cancel(timer);
            tracing::debug!("pending collapse canceled by focus");
        }

        let previous = self.last_focus_at.replace(now);
        let churn = self.phase == KeyboardPhase::Expanding
            && previous.is_some_and(|at| now.saturating_sub(at) < self.params.refocus_guard);
        if churn {
            if let Some(episode) = self.episode.as_mut() {
                if episode.target == target {
                    tracing::trace!(episode = episode.id.get(), "duplicate focus ignored");
                    return FocusOutcome::Duplicate;
                }
                episode.target = target;
                tracing::debug!(episode = episode.id.get(), "episode retargeted");
                return FocusOutcome::Retargeted(episode.id);
            }
        }

        self.start_episode(&*host, target, now, pointer)
    }

    fn start_episode<H>(
        &mut self,
        host: &H,
        target: K,
        now: u64,
        pointer: Option<f64>,
    ) -> FocusOutcome
    where
        H: ViewportHost<K> + ?Sized,
    {
        self.timers.cancel_all();
        self.awaiting_resize = None;
        self.settle = None;

        let baseline = pointer.unwrap_or_else(|| current_viewport_height::<K, _>(host));
        let id = EpisodeId(self.next_episode);
        self.next_episode += 1;
        self.episode = Some(Episode {
            id,
            target,
            baseline,
            started_at: now,
        });
        transition(&mut self.phase, KeyboardPhase::Expanding);

        // Race: resize notification vs. settle timeout, first one wins.
        self.awaiting_resize = Some(id);
        self.settle = self.timers.schedule(
            Task::Settle(id),
            now,
            self.params.keyboard_expand_wait_time,
        );
        tracing::debug!(episode = id.get(), baseline, "episode started");
        FocusOutcome::Started(id)
    }

    /// Handles a viewport resize notification at time `now`.
    ///
    /// Only the first notification after a focus counts. It cancels the settle
    /// timeout and schedules the height reading after
    /// [`AdaptationParams::resize_settle_time`], since the first notification
    /// usually arrives while the keyboard is still animating. Returns `false`
    /// when no episode was waiting for one.
    pub fn on_viewport_resize(&mut self, now: u64) -> bool {
        let Some(id) = self.awaiting_resize.take() else {
            return false;
        };
        if let Some(timer) = self.settle.take() {
            self.timers.cancel(timer);
        }
        self.timers.schedule(
            Task::ResizeSettled(id),
            now,
            self.params.resize_settle_time,
        );
        tracing::trace!(episode = id.get(), "resize won the race");
        true
    }

    /// Runs every deferred step due at `now`, in deadline order.
    ///
    /// Returns the number of steps that fired. Late calls are fine: everything
    /// overdue runs, and steps made stale by earlier ones are skipped.
    pub fn advance<H>(&mut self, host: &mut H, now: u64) -> usize
    where
        H: ViewportHost<K> + ?Sized,
    {
        let mut fired = 0;
        while let Some((timer, task)) = self.timers.pop_due(now) {
            fired += 1;
            match task {
                Task::Settle(id) => {
                    if self.settle == Some(timer) {
                        self.settle = None;
                    }
                    if self.awaiting_resize != Some(id) {
                        continue;
                    }
                    self.awaiting_resize = None;
                    let observed = current_viewport_height::<K, _>(&*host);
                    tracing::trace!(episode = id.get(), observed, "settle wait elapsed");
                    self.adapt(host, id, observed, now);
                }
                Task::ResizeSettled(id) => {
                    let observed = current_viewport_height::<K, _>(&*host);
                    tracing::trace!(episode = id.get(), observed, "resize settled");
                    self.adapt(host, id, observed, now);
                }
                Task::Recheck { episode, boundary } => {
                    self.recheck(host, episode, boundary);
                }
                Task::Collapse => {
                    if self.collapse == Some(timer) {
                        self.collapse = None;
                    }
                    self.spacer.clear_bottom_inset(&mut self.container);
                    self.episode = None;
                    transition(&mut self.phase, KeyboardPhase::Idle);
                }
            }
        }
        fired
    }

    /// Handles a blur event at time `now`.
    ///
    /// Cancels the in-flight ladder and schedules the spacer removal after the
    /// collapse cleanup delay. A focus before then cancels the removal.
    pub fn on_blur(&mut self, now: u64) {
        if self.is_disposed() {
            return;
        }
        self.timers.cancel_all();
        self.awaiting_resize = None;
        self.settle = None;
        transition(&mut self.phase, KeyboardPhase::Collapsing);
        self.collapse = self.timers.schedule(
            Task::Collapse,
            now,
            self.params.keyboard_collapse_cleanup_time,
        );
    }

    /// Tears everything down: cancels all pending work, restores the inset, and
    /// returns to idle. Later events are ignored. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.timers.dispose();
        self.awaiting_resize = None;
        self.settle = None;
        self.collapse = None;
        self.pointer_baseline = None;
        self.spacer.clear_bottom_inset(&mut self.container);
        self.episode = None;
        transition(&mut self.phase, KeyboardPhase::Idle);
    }

    fn adapt<H>(&mut self, host: &mut H, id: EpisodeId, observed: f64, now: u64)
    where
        H: ViewportHost<K> + ?Sized,
    {
        if self.phase != KeyboardPhase::Expanding {
            return;
        }
        let Some(episode) = self.episode.as_ref().filter(|e| e.id == id) else {
            return;
        };
        if !host.is_attached(&episode.target) {
            self.finish(Adaptation::Detached);
            return;
        }

        // Core rule 1: the platform resized the layout itself.
        if episode.baseline - observed > self.params.height_change_threshold {
            tracing::debug!(
                episode = id.get(),
                baseline = episode.baseline,
                observed,
                "layout resized by platform"
            );
            self.finish(Adaptation::ResizeHandled);
            return;
        }

        // Core rule 2: overlay mode.
        transition(&mut self.phase, KeyboardPhase::Adapting);
        let boundary =
            current_viewport_height::<K, _>(&*host) - self.params.estimated_keyboard_height;
        if !scroll_into_view_if_needed(
            host,
            &episode.target,
            boundary,
            self.params.safe_input_padding,
        ) {
            self.finish(Adaptation::AlreadyVisible);
            return;
        }
        self.timers.schedule(
            Task::Recheck {
                episode: id,
                boundary,
            },
            now,
            self.params.scroll_recheck_interval,
        );
        self.record(Adaptation::Scrolled);
    }

    fn recheck<H>(&mut self, host: &mut H, id: EpisodeId, boundary: f64)
    where
        H: ViewportHost<K> + ?Sized,
    {
        if self.phase != KeyboardPhase::Adapting {
            return;
        }
        let Some(episode) = self.episode.as_ref().filter(|e| e.id == id) else {
            return;
        };
        if !host.is_attached(&episode.target) {
            self.finish(Adaptation::Detached);
            return;
        }
        let margin = self.params.safe_input_padding;
        if !is_below_visibility_boundary(&*host, &episode.target, boundary, margin) {
            self.finish(Adaptation::VisibleAfterScroll);
            return;
        }

        // Single escalation: manufacture scroll room, then scroll once more.
        let keyboard = self.params.estimated_keyboard_height;
        let padded = self
            .spacer
            .apply_bottom_inset(&mut self.container, keyboard);
        let fresh = current_viewport_height::<K, _>(&*host) - keyboard;
        scroll_into_view_if_needed(host, &episode.target, fresh, margin);
        self.finish(if padded {
            Adaptation::Padded
        } else {
            Adaptation::SpacerUnavailable
        });
    }

    fn record(&mut self, outcome: Adaptation) {
        tracing::debug!(?outcome, "adaptation step");
        self.last_adaptation = Some(outcome);
    }

    fn finish(&mut self, outcome: Adaptation) {
        self.episode = None;
        self.awaiting_resize = None;
        self.settle = None;
        transition(&mut self.phase, KeyboardPhase::Idle);
        self.record(outcome);
    }
}
