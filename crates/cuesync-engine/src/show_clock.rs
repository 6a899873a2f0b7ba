//! The show clock — pure timing state machine.
//!
//! Show time is elapsed virtual milliseconds since the scheduled script
//! start, with all accumulated pause duration subtracted. It may be negative
//! before the show begins (pre-show countdown). Every pause duration folded
//! into the cumulative total is rounded to the nearest whole second so that
//! director and guests converge on identical tick boundaries.
//!
//! Invalid transition requests (a second `start()` while already playing, a
//! `pause()` while stopped) are ignored rather than rejected: command replay
//! and UI races make them expected, and the clock must stay robust through
//! them.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use cuesync_core::clock::WallClock;
use cuesync_core::element::PlaybackState;
use cuesync_core::subject::{Subject, SubscriptionId};
use cuesync_core::time::{millis_between, round_datetime_to_second, round_ms_to_nearest_second};

/// Authoritative timing state machine for one show session.
///
/// One instance exists per session (director or guest) and is destroyed with
/// it. The wall clock is injected so tests can drive time by hand.
pub struct ShowClock {
    wall: Arc<dyn WallClock>,
    script_start: Option<DateTime<Utc>>,
    show_started_at: Option<DateTime<Utc>>,
    paused_at: Option<DateTime<Utc>>,
    total_pause_ms: u64,
    state: PlaybackState,
    state_changes: Subject<PlaybackState>,
    show_time_updates: Subject<i64>,
    timestamp_updates: Subject<DateTime<Utc>>,
}

impl ShowClock {
    /// Creates a stopped clock with no script bound.
    #[must_use]
    pub fn new(wall: Arc<dyn WallClock>) -> Self {
        Self {
            wall,
            script_start: None,
            show_started_at: None,
            paused_at: None,
            total_pause_ms: 0,
            state: PlaybackState::Stopped,
            state_changes: Subject::new(),
            show_time_updates: Subject::new(),
            timestamp_updates: Subject::new(),
        }
    }

    /// Current playback state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Scheduled script start, if a script is bound.
    #[must_use]
    pub fn script_start(&self) -> Option<DateTime<Utc>> {
        self.script_start
    }

    /// Wall-clock instant `start()` was first invoked from stopped.
    #[must_use]
    pub fn show_started_at(&self) -> Option<DateTime<Utc>> {
        self.show_started_at
    }

    /// Wall-clock instant the current hold began, if any.
    #[must_use]
    pub fn paused_at(&self) -> Option<DateTime<Utc>> {
        self.paused_at
    }

    /// Cumulative pause duration in milliseconds (always whole seconds).
    #[must_use]
    pub fn total_pause_ms(&self) -> u64 {
        self.total_pause_ms
    }

    /// Starts or resumes the show.
    ///
    /// From stopped: stamps the show start, rounds the scheduled script start
    /// to the nearest second, and resets the pause total. From a hold:
    /// folds the finished pause (rounded) into the total. Any other state is
    /// ignored. Returns true when a transition to playing occurred.
    pub fn start(&mut self) -> bool {
        let now = self.wall.now();
        match self.state {
            PlaybackState::Stopped => {
                self.show_started_at = Some(now);
                self.script_start = self.script_start.map(round_datetime_to_second);
                self.total_pause_ms = 0;
                self.paused_at = None;
                self.transition(PlaybackState::Playing);
                self.emit_tick();
                true
            }
            PlaybackState::Paused | PlaybackState::Safety => {
                if let Some(paused_at) = self.paused_at.take() {
                    self.fold_pause(paused_at, now);
                }
                self.transition(PlaybackState::Playing);
                self.emit_tick();
                true
            }
            PlaybackState::Playing | PlaybackState::Complete => {
                tracing::debug!(state = ?self.state, "ignoring start request");
                false
            }
        }
    }

    /// Pauses a playing show. Ignored outside of playing.
    pub fn pause(&mut self) -> bool {
        self.hold(PlaybackState::Paused)
    }

    /// Puts a playing show into a safety hold. Same timing semantics as
    /// `pause()`, distinct downstream styling. Ignored outside of playing.
    pub fn safety(&mut self) -> bool {
        self.hold(PlaybackState::Safety)
    }

    /// Completes the show from any non-stopped state.
    ///
    /// An in-progress hold is folded into the pause total first; `paused_at`
    /// is then re-stamped to now so the displayed clock freezes at the
    /// completion instant.
    pub fn complete(&mut self) -> bool {
        if self.state == PlaybackState::Stopped || self.state == PlaybackState::Complete {
            tracing::debug!(state = ?self.state, "ignoring complete request");
            return false;
        }
        let now = self.wall.now();
        if let Some(paused_at) = self.paused_at.take() {
            self.fold_pause(paused_at, now);
        }
        self.paused_at = Some(now);
        self.transition(PlaybackState::Complete);
        self.emit_tick();
        true
    }

    /// Unconditionally resets every field to its initial value.
    pub fn stop(&mut self) {
        self.script_start = None;
        self.show_started_at = None;
        self.paused_at = None;
        self.total_pause_ms = 0;
        self.transition(PlaybackState::Stopped);
        self.emit_tick();
    }

    /// Binds (or unbinds) the scheduled script start.
    ///
    /// Resets playback to stopped and clears the start/hold stamps, but
    /// preserves the cumulative pause total: switching the bound script must
    /// not erase a late-joining guest's already-synchronized delay
    /// accounting.
    pub fn set_script(&mut self, start: Option<DateTime<Utc>>) {
        self.script_start = start;
        self.show_started_at = None;
        self.paused_at = None;
        self.transition(PlaybackState::Stopped);
    }

    /// Authoritative override of the cumulative pause total, used by drift
    /// correction. Clamped to zero and rounded to the nearest second;
    /// applying the same value twice is a no-op.
    pub fn set_total_pause_time(&mut self, ms: i64) {
        let rounded = round_ms_to_nearest_second(ms.max(0)).unsigned_abs();
        if rounded != self.total_pause_ms {
            tracing::trace!(from = self.total_pause_ms, to = rounded, "pause total corrected");
            self.total_pause_ms = rounded;
        }
    }

    /// Current show time in milliseconds; negative before the show, zero
    /// while no script is bound.
    #[must_use]
    pub fn current_show_time(&self) -> i64 {
        let Some(script_start) = self.script_start else {
            return 0;
        };
        let now = self.wall.now();
        let hold_ms = self
            .paused_at
            .map_or(0, |paused_at| (now - paused_at).num_milliseconds());
        (now - script_start).num_milliseconds() - i64::try_from(self.total_pause_ms).unwrap_or(i64::MAX) - hold_ms
    }

    /// Registers a playback-state listener.
    pub fn on_state_change(&mut self, listener: impl FnMut(&PlaybackState) + 'static) -> SubscriptionId {
        self.state_changes.subscribe(listener)
    }

    /// Registers a show-time listener (milliseconds).
    pub fn on_show_time_update(&mut self, listener: impl FnMut(&i64) + 'static) -> SubscriptionId {
        self.show_time_updates.subscribe(listener)
    }

    /// Registers a wall-clock timestamp listener.
    pub fn on_timestamp_update(
        &mut self,
        listener: impl FnMut(&DateTime<Utc>) + 'static,
    ) -> SubscriptionId {
        self.timestamp_updates.subscribe(listener)
    }

    /// Emits one show-time update and one timestamp update, in that order.
    ///
    /// The two always fire together so a consumer never observes one updated
    /// without the other.
    pub fn emit_tick(&mut self) {
        let show_time = self.current_show_time();
        let now = self.wall.now();
        self.show_time_updates.emit(&show_time);
        self.timestamp_updates.emit(&now);
    }

    /// Clears every listener registry. Idempotent.
    pub fn destroy(&mut self) {
        self.state_changes.clear();
        self.show_time_updates.clear();
        self.timestamp_updates.clear();
    }

    fn hold(&mut self, target: PlaybackState) -> bool {
        debug_assert!(target.is_hold());
        if self.state != PlaybackState::Playing {
            tracing::debug!(state = ?self.state, requested = ?target, "ignoring hold request");
            return false;
        }
        self.paused_at = Some(self.wall.now());
        self.transition(target);
        self.emit_tick();
        true
    }

    fn fold_pause(&mut self, paused_at: DateTime<Utc>, now: DateTime<Utc>) {
        let pause_ms = round_ms_to_nearest_second(millis_between(paused_at, now));
        self.total_pause_ms += pause_ms.unsigned_abs();
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state == next {
            return;
        }
        tracing::debug!(from = ?self.state, to = ?next, "playback state change");
        self.state = next;
        self.state_changes.emit(&next);
    }
}

impl std::fmt::Debug for ShowClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShowClock")
            .field("state", &self.state)
            .field("script_start", &self.script_start)
            .field("show_started_at", &self.show_started_at)
            .field("paused_at", &self.paused_at)
            .field("total_pause_ms", &self.total_pause_ms)
            .finish_non_exhaustive()
    }
}
