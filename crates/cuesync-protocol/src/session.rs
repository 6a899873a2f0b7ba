//! One show session: clock, scheduler, and element store wired together.
//!
//! The director and every guest own exactly one session; there is no shared
//! mutable state across sessions. Commands are handled to completion before
//! the next one is processed, and a command's boundary re-evaluation happens
//! synchronously inside the handler — never deferred to the next tick — so
//! the first rendered frame after a resume is never stale.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use cuesync_core::clock::WallClock;
use cuesync_core::element::{ElementId, ElementVisual, PlaybackState, ScriptElement};
use cuesync_core::error::EngineError;
use cuesync_core::script::ScriptRecord;
use cuesync_core::subject::SubscriptionId;
use cuesync_engine::boundary::{BoundaryScheduler, Evaluation};
use cuesync_engine::element_store::ElementStateStore;
use cuesync_engine::show_clock::ShowClock;

/// A single director or guest show session.
pub struct ShowSession {
    clock: ShowClock,
    scheduler: BoundaryScheduler,
    store: ElementStateStore,
}

impl ShowSession {
    /// Creates a stopped session with no script bound.
    #[must_use]
    pub fn new(wall: Arc<dyn WallClock>) -> Self {
        Self {
            clock: ShowClock::new(wall),
            scheduler: BoundaryScheduler::new(),
            store: ElementStateStore::new(),
        }
    }

    /// Binds the script record's scheduled start to the clock.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidStartTime` if the record's `start_time`
    /// cannot be interpreted.
    pub fn bind_script(&mut self, record: &ScriptRecord) -> Result<(), EngineError> {
        self.clock.set_script(record.resolved_start()?);
        Ok(())
    }

    /// Binds an already-resolved scheduled start (or unbinds with `None`).
    pub fn set_script_start(&mut self, start: Option<DateTime<Utc>>) {
        self.clock.set_script(start);
    }

    /// Loads a fresh element snapshot, resetting all derived element state,
    /// then re-evaluates immediately.
    pub fn load_elements(&mut self, elements: &[ScriptElement], lookahead_ms: i64) {
        self.scheduler.set_element_boundaries(elements, lookahead_ms);
        self.evaluate_now();
    }

    /// Applies a live re-time: boundaries are rebuilt but derived element
    /// state survives, so viewers see no flash back to inactive.
    pub fn retime_elements(&mut self, elements: &[ScriptElement], lookahead_ms: i64) {
        self.scheduler.update_element_boundaries(elements, lookahead_ms);
        self.evaluate_now();
    }

    /// Starts or resumes playback. Returns true when a transition occurred;
    /// a duplicate play while already playing is ignored.
    pub fn play(&mut self) -> bool {
        if !self.clock.start() {
            return false;
        }
        self.evaluate_now();
        true
    }

    /// Pauses playback. Ignored outside of playing.
    pub fn pause(&mut self) -> bool {
        let transitioned = self.clock.pause();
        if transitioned {
            self.evaluate_now();
        }
        transitioned
    }

    /// Enters a safety hold. Ignored outside of playing.
    pub fn safety(&mut self) -> bool {
        let transitioned = self.clock.safety();
        if transitioned {
            self.evaluate_now();
        }
        transitioned
    }

    /// Completes the show. Ignored when stopped or already complete.
    pub fn complete(&mut self) -> bool {
        let transitioned = self.clock.complete();
        if transitioned {
            self.evaluate_now();
        }
        transitioned
    }

    /// Full reset: clock, boundaries, and published element state. The
    /// script binding is dropped with everything else.
    pub fn stop(&mut self) {
        self.clock.stop();
        self.scheduler.clear();
        self.store.reset();
    }

    /// One 100 ms tick: emits show-time and timestamp updates together, then
    /// evaluates boundaries at the fresh show time.
    pub fn tick(&mut self) {
        self.clock.emit_tick();
        self.evaluate_now();
    }

    /// Authoritative pause-total override (drift correction).
    pub fn set_total_pause_time(&mut self, ms: i64) {
        self.clock.set_total_pause_time(ms);
    }

    /// Current playback state.
    #[must_use]
    pub fn playback_state(&self) -> PlaybackState {
        self.clock.state()
    }

    /// Current show time in milliseconds.
    #[must_use]
    pub fn current_show_time(&self) -> i64 {
        self.clock.current_show_time()
    }

    /// Cumulative pause total in milliseconds.
    #[must_use]
    pub fn total_pause_ms(&self) -> u64 {
        self.clock.total_pause_ms()
    }

    /// Wall-clock instant playback first started, if any.
    #[must_use]
    pub fn show_started_at(&self) -> Option<DateTime<Utc>> {
        self.clock.show_started_at()
    }

    /// Resolved visual pair for one element.
    #[must_use]
    pub fn element_visual(&self, element_id: &ElementId) -> ElementVisual {
        self.store.get(element_id)
    }

    /// Whether an element has fully passed (eligible for scroll-out).
    #[must_use]
    pub fn is_passed(&self, element_id: &ElementId) -> bool {
        self.scheduler.is_passed(element_id)
    }

    /// Subscribes to one element's visual changes.
    pub fn subscribe_element(
        &mut self,
        element_id: &ElementId,
        listener: impl FnMut(&ElementVisual) + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(element_id, listener)
    }

    /// Removes an element subscription.
    pub fn unsubscribe_element(&mut self, element_id: &ElementId, id: SubscriptionId) -> bool {
        self.store.unsubscribe(element_id, id)
    }

    /// Registers a playback-state listener on the clock.
    pub fn on_state_change(
        &mut self,
        listener: impl FnMut(&PlaybackState) + 'static,
    ) -> SubscriptionId {
        self.clock.on_state_change(listener)
    }

    /// Registers a show-time listener on the clock.
    pub fn on_show_time_update(&mut self, listener: impl FnMut(&i64) + 'static) -> SubscriptionId {
        self.clock.on_show_time_update(listener)
    }

    /// Registers a wall-clock timestamp listener on the clock.
    pub fn on_timestamp_update(
        &mut self,
        listener: impl FnMut(&DateTime<Utc>) + 'static,
    ) -> SubscriptionId {
        self.clock.on_timestamp_update(listener)
    }

    /// Clears every listener registry and all derived state. Idempotent.
    pub fn destroy(&mut self) {
        self.clock.destroy();
        self.scheduler.clear();
        self.store.destroy();
    }

    fn evaluate_now(&mut self) {
        // A show may be configured before a start time is set; with no
        // script bound there is no show time to evaluate against, so
        // element state stays untouched and the show can never
        // auto-complete.
        if self.clock.script_start().is_none() {
            return;
        }
        let show_time = self.clock.current_show_time();
        match self.scheduler.evaluate(show_time, self.clock.state()) {
            Evaluation::Skipped => {}
            Evaluation::ShowComplete => {
                // Every element has had its full dwell time: end the show,
                // then resolve final element states at the frozen instant.
                self.clock.complete();
                let frozen = self.clock.current_show_time();
                if let Evaluation::Changes(deltas) =
                    self.scheduler.evaluate(frozen, self.clock.state())
                {
                    self.store.publish(&deltas);
                }
            }
            Evaluation::Changes(deltas) => self.store.publish(&deltas),
        }
    }
}

impl std::fmt::Debug for ShowSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShowSession")
            .field("state", &self.clock.state())
            .field("show_time", &self.clock.current_show_time())
            .finish_non_exhaustive()
    }
}
