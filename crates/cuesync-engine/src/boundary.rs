//! Boundary derivation and evaluation.
//!
//! The scheduler converts the script-element snapshot plus a lookahead
//! window into a stably time-sorted list of transition boundaries, then
//! folds every boundary at or before the current show time into two
//! independent per-element tracks (highlight and border). Highlight and
//! border boundaries may share a timestamp; they never conflict because the
//! tracks are resolved separately.

use std::collections::{HashMap, HashSet};

use cuesync_core::element::{BorderState, ElementId, ElementVisual, HighlightState, PlaybackState, ScriptElement};

/// Fixed window after a cue's trigger during which it stays highlighted
/// `current` and red-bordered before becoming `past`.
pub const DWELL_MS: i64 = 5_000;

/// The transition a boundary applies when its time is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryAction {
    /// Sets the element's highlight track.
    Highlight(HighlightState),
    /// Sets the element's border track.
    Border(BorderState),
    /// Sentinel marking the end of the script's final dwell window.
    ScriptComplete,
}

/// A single timestamped transition event. Ephemeral: regenerated whenever
/// the element list or lookahead window changes, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingBoundary {
    /// Show time of the transition in milliseconds; may be negative.
    pub time: i64,
    /// Element the transition applies to; `None` for the script sentinel.
    pub element_id: Option<ElementId>,
    /// The transition to apply.
    pub action: BoundaryAction,
}

/// One element whose resolved visual pair changed during an evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDelta {
    /// The element that changed.
    pub element_id: ElementId,
    /// Its newly resolved pair.
    pub visual: ElementVisual,
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Playback is stopped; nothing was evaluated.
    Skipped,
    /// Every element has had its full dwell time; the caller should complete
    /// the show clock.
    ShowComplete,
    /// Elements whose resolved pair differs from the previous pass.
    Changes(Vec<ElementDelta>),
}

/// Derives boundaries from script elements and resolves per-element state
/// against the current show time.
#[derive(Debug, Default)]
pub struct BoundaryScheduler {
    boundaries: Vec<TimingBoundary>,
    element_order: Vec<ElementId>,
    tracks: HashMap<ElementId, Vec<(i64, BoundaryAction)>>,
    trigger_times: HashMap<ElementId, i64>,
    script_complete_at: Option<i64>,
    resolved: HashMap<ElementId, ElementVisual>,
    passed: HashSet<ElementId>,
}

impl BoundaryScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds boundaries from scratch and resets all derived state.
    ///
    /// Use this when the element list itself changed. Every element falls
    /// back to `(inactive, none)` until the next evaluation pass.
    pub fn set_element_boundaries(&mut self, elements: &[ScriptElement], lookahead_ms: i64) {
        self.resolved.clear();
        self.passed.clear();
        self.derive(elements, lookahead_ms);
    }

    /// Rebuilds boundaries without clearing derived state.
    ///
    /// Used for live re-times: when an offset is nudged slightly, viewers
    /// must not see a flash back to `inactive` before the next pass.
    pub fn update_element_boundaries(&mut self, elements: &[ScriptElement], lookahead_ms: i64) {
        self.derive(elements, lookahead_ms);
    }

    /// Evaluates all boundaries against `current_time_ms`.
    pub fn evaluate(&mut self, current_time_ms: i64, state: PlaybackState) -> Evaluation {
        if state == PlaybackState::Stopped {
            return Evaluation::Skipped;
        }

        // The show auto-completes once the final dwell window has elapsed
        // and no element is still strictly upcoming.
        if let Some(end) = self.script_complete_at {
            let any_upcoming = self
                .trigger_times
                .values()
                .any(|&trigger| trigger > current_time_ms);
            if end <= current_time_ms && !any_upcoming && state != PlaybackState::Complete {
                tracing::debug!(show_time = current_time_ms, "script complete boundary reached");
                return Evaluation::ShowComplete;
            }
        }

        let mut changes = Vec::new();
        for element_id in &self.element_order {
            let mut visual = ElementVisual::default();
            if let Some(track) = self.tracks.get(element_id) {
                for (time, action) in track {
                    if *time > current_time_ms {
                        break;
                    }
                    match action {
                        BoundaryAction::Highlight(h) => visual.highlight = *h,
                        BoundaryAction::Border(b) => visual.border = *b,
                        BoundaryAction::ScriptComplete => {}
                    }
                }
            }

            let previous = self.resolved.get(element_id).copied().unwrap_or_default();
            if visual != previous {
                self.resolved.insert(element_id.clone(), visual);
                changes.push(ElementDelta {
                    element_id: element_id.clone(),
                    visual,
                });
            }

            // Guard against slightly-stale snapshots: an element only counts
            // as fully passed once the show time is clear of its trigger by
            // more than the dwell window.
            if visual.highlight == HighlightState::Past && !self.passed.contains(element_id) {
                if let Some(&trigger) = self.trigger_times.get(element_id) {
                    if current_time_ms > trigger + DWELL_MS {
                        self.passed.insert(element_id.clone());
                    }
                }
            }
        }
        Evaluation::Changes(changes)
    }

    /// The full boundary list, stably sorted ascending by time.
    #[must_use]
    pub fn boundaries(&self) -> &[TimingBoundary] {
        &self.boundaries
    }

    /// The currently resolved pair for one element.
    #[must_use]
    pub fn visual(&self, element_id: &ElementId) -> ElementVisual {
        self.resolved.get(element_id).copied().unwrap_or_default()
    }

    /// Whether an element has fully passed (eligible for scroll-out).
    #[must_use]
    pub fn is_passed(&self, element_id: &ElementId) -> bool {
        self.passed.contains(element_id)
    }

    /// Number of fully passed elements.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.passed.len()
    }

    /// Show time of the script-complete sentinel, if any elements exist.
    #[must_use]
    pub fn script_complete_at(&self) -> Option<i64> {
        self.script_complete_at
    }

    /// Drops boundaries and all derived state (full guest reset).
    pub fn clear(&mut self) {
        self.boundaries.clear();
        self.element_order.clear();
        self.tracks.clear();
        self.trigger_times.clear();
        self.script_complete_at = None;
        self.resolved.clear();
        self.passed.clear();
    }

    fn derive(&mut self, elements: &[ScriptElement], lookahead_ms: i64) {
        self.boundaries.clear();
        self.element_order.clear();
        self.tracks.clear();
        self.trigger_times.clear();
        self.script_complete_at = None;

        let mut script_end: Option<i64> = None;
        for element in elements {
            let trigger = element.offset_ms;
            let id = element.element_id.clone();
            if !self.trigger_times.contains_key(&id) {
                self.element_order.push(id.clone());
            }
            self.trigger_times.insert(id.clone(), trigger);

            if lookahead_ms > 0 {
                self.push_boundary(trigger - lookahead_ms, &id, BoundaryAction::Highlight(HighlightState::Upcoming));
            }
            self.push_boundary(trigger, &id, BoundaryAction::Highlight(HighlightState::Current));
            self.push_boundary(trigger, &id, BoundaryAction::Border(BorderState::RedBorder));
            self.push_boundary(trigger + DWELL_MS, &id, BoundaryAction::Border(BorderState::None));
            self.push_boundary(trigger + DWELL_MS, &id, BoundaryAction::Highlight(HighlightState::Past));

            script_end = Some(script_end.map_or(trigger + DWELL_MS, |end| end.max(trigger + DWELL_MS)));
        }

        if let Some(end) = script_end {
            self.boundaries.push(TimingBoundary {
                time: end,
                element_id: None,
                action: BoundaryAction::ScriptComplete,
            });
            self.script_complete_at = Some(end);
        }

        // Stable: same-time boundaries keep insertion order, so the later
        // inserted action for a given (element, time) pair wins the fold.
        self.boundaries.sort_by_key(|boundary| boundary.time);

        for boundary in &self.boundaries {
            if let Some(id) = &boundary.element_id {
                self.tracks
                    .entry(id.clone())
                    .or_default()
                    .push((boundary.time, boundary.action));
            }
        }
    }

    fn push_boundary(&mut self, time: i64, element_id: &ElementId, action: BoundaryAction) {
        self.boundaries.push(TimingBoundary {
            time,
            element_id: Some(element_id.clone()),
            action,
        });
    }
}

#[cfg(test)]
mod tests {
    use cuesync_core::element::{
        BorderState, ElementId, ElementVisual, HighlightState, PlaybackState, ScriptElement,
    };

    use super::{BoundaryScheduler, Evaluation};

    fn element(id: &str, offset_ms: i64) -> ScriptElement {
        ScriptElement {
            element_id: ElementId::from(id),
            offset_ms,
            duration_ms: Some(0),
            element_name: format!("cue {id}"),
        }
    }

    fn visual_of(scheduler: &mut BoundaryScheduler, id: &str, at: i64) -> ElementVisual {
        // Mirrors the session: a show-complete outcome completes the clock
        // and immediately re-evaluates in the completed state.
        if scheduler.evaluate(at, PlaybackState::Playing) == Evaluation::ShowComplete {
            scheduler.evaluate(at, PlaybackState::Complete);
        }
        scheduler.visual(&ElementId::from(id))
    }

    #[test]
    fn test_boundaries_are_sorted_non_decreasing_by_time() {
        // Arrange
        let elements = vec![element("c", 30_000), element("a", 10_000), element("b", 20_000)];
        let mut scheduler = BoundaryScheduler::new();

        // Act
        scheduler.set_element_boundaries(&elements, 5_000);

        // Assert
        let times: Vec<i64> = scheduler.boundaries().iter().map(|b| b.time).collect();
        let mut sorted = times.clone();
        sorted.sort_unstable();
        assert_eq!(times, sorted);
        // 5 boundaries per element plus the sentinel.
        assert_eq!(times.len(), 16);
        assert_eq!(scheduler.script_complete_at(), Some(35_000));
    }

    #[test]
    fn test_scenario_single_element_walks_through_all_states() {
        // One element at offset 10 s with a 5 s lookahead, relative to a
        // script start of T = 0.
        let mut scheduler = BoundaryScheduler::new();
        scheduler.set_element_boundaries(&[element("e1", 10_000)], 5_000);

        assert_eq!(
            visual_of(&mut scheduler, "e1", -6_000),
            ElementVisual::new(HighlightState::Inactive, BorderState::None)
        );
        assert_eq!(
            visual_of(&mut scheduler, "e1", -4_000),
            ElementVisual::new(HighlightState::Upcoming, BorderState::None)
        );
        assert_eq!(
            visual_of(&mut scheduler, "e1", 10_000),
            ElementVisual::new(HighlightState::Current, BorderState::RedBorder)
        );
        assert_eq!(
            visual_of(&mut scheduler, "e1", 14_900),
            ElementVisual::new(HighlightState::Current, BorderState::RedBorder)
        );
        assert_eq!(
            visual_of(&mut scheduler, "e1", 15_500),
            ElementVisual::new(HighlightState::Past, BorderState::None)
        );
    }

    #[test]
    fn test_zero_lookahead_skips_upcoming_entirely() {
        // Arrange
        let mut scheduler = BoundaryScheduler::new();
        scheduler.set_element_boundaries(&[element("e1", 10_000)], 0);

        // Assert: no upcoming boundary exists and the element jumps straight
        // from inactive to current.
        assert!(
            scheduler
                .boundaries()
                .iter()
                .all(|b| b.action != super::BoundaryAction::Highlight(HighlightState::Upcoming))
        );
        assert_eq!(
            visual_of(&mut scheduler, "e1", 9_999).highlight,
            HighlightState::Inactive
        );
        assert_eq!(
            visual_of(&mut scheduler, "e1", 10_000).highlight,
            HighlightState::Current
        );
    }

    #[test]
    fn test_element_never_past_before_its_trigger_time() {
        let mut scheduler = BoundaryScheduler::new();
        scheduler.set_element_boundaries(&[element("e1", 10_000)], 5_000);

        for at in [-10_000, 0, 9_999, 10_000, 14_999] {
            assert_ne!(
                visual_of(&mut scheduler, "e1", at).highlight,
                HighlightState::Past,
                "element reported past at {at}"
            );
        }
    }

    #[test]
    fn test_passed_set_requires_dwell_elapsed_beyond_trigger() {
        // Arrange
        let mut scheduler = BoundaryScheduler::new();
        scheduler.set_element_boundaries(&[element("e1", 10_000)], 0);
        let id = ElementId::from("e1");

        // Act / Assert: highlight flips to past exactly at trigger + dwell,
        // but the passed set requires strictly more than dwell elapsed.
        scheduler.evaluate(15_000, PlaybackState::Playing);
        assert_eq!(scheduler.visual(&id).highlight, HighlightState::Past);
        assert!(!scheduler.is_passed(&id));

        scheduler.evaluate(15_001, PlaybackState::Playing);
        assert!(scheduler.is_passed(&id));
        assert_eq!(scheduler.passed_count(), 1);
    }

    #[test]
    fn test_simultaneous_cues_resolve_independently() {
        // Arrange: two elements share the same trigger time.
        let mut scheduler = BoundaryScheduler::new();
        scheduler.set_element_boundaries(&[element("e1", 10_000), element("e2", 10_000)], 5_000);

        // Act
        scheduler.evaluate(10_000, PlaybackState::Playing);

        // Assert
        for id in ["e1", "e2"] {
            assert_eq!(
                scheduler.visual(&ElementId::from(id)),
                ElementVisual::new(HighlightState::Current, BorderState::RedBorder)
            );
        }
    }

    #[test]
    fn test_evaluate_reports_only_changed_elements() {
        // Arrange
        let mut scheduler = BoundaryScheduler::new();
        scheduler.set_element_boundaries(&[element("e1", 10_000), element("e2", 60_000)], 5_000);

        // Act
        let first = scheduler.evaluate(10_000, PlaybackState::Playing);
        let second = scheduler.evaluate(10_100, PlaybackState::Playing);

        // Assert: only e1 changed on the first pass, nothing on the second.
        match first {
            Evaluation::Changes(changes) => {
                assert_eq!(changes.len(), 1);
                assert_eq!(changes[0].element_id, ElementId::from("e1"));
            }
            other => panic!("expected changes, got {other:?}"),
        }
        assert_eq!(second, Evaluation::Changes(Vec::new()));
    }

    #[test]
    fn test_evaluate_is_skipped_while_stopped() {
        let mut scheduler = BoundaryScheduler::new();
        scheduler.set_element_boundaries(&[element("e1", 0)], 0);
        assert_eq!(scheduler.evaluate(10_000, PlaybackState::Stopped), Evaluation::Skipped);
    }

    #[test]
    fn test_show_completes_after_final_dwell_window() {
        // Arrange
        let mut scheduler = BoundaryScheduler::new();
        scheduler.set_element_boundaries(&[element("e1", 0), element("e2", 10_000)], 0);

        // Act / Assert: not complete while e2's dwell is still running.
        assert!(matches!(
            scheduler.evaluate(14_000, PlaybackState::Playing),
            Evaluation::Changes(_)
        ));
        assert_eq!(
            scheduler.evaluate(15_000, PlaybackState::Playing),
            Evaluation::ShowComplete
        );
        // Once the clock is complete the sentinel no longer re-fires.
        assert!(matches!(
            scheduler.evaluate(15_100, PlaybackState::Complete),
            Evaluation::Changes(_)
        ));
    }

    #[test]
    fn test_set_boundaries_resets_derived_state_but_update_does_not() {
        // Arrange: resolve e1 to current.
        let mut scheduler = BoundaryScheduler::new();
        scheduler.set_element_boundaries(&[element("e1", 10_000)], 5_000);
        scheduler.evaluate(10_000, PlaybackState::Playing);
        let id = ElementId::from("e1");
        assert_eq!(scheduler.visual(&id).highlight, HighlightState::Current);

        // Act: a live re-time keeps the resolved pair (no flicker) ...
        scheduler.update_element_boundaries(&[element("e1", 10_200)], 5_000);
        assert_eq!(scheduler.visual(&id).highlight, HighlightState::Current);

        // ... while a full reload clears it.
        scheduler.set_element_boundaries(&[element("e1", 10_200)], 5_000);
        assert_eq!(scheduler.visual(&id).highlight, HighlightState::Inactive);
    }

    #[test]
    fn test_update_after_retime_does_not_reemit_unchanged_elements() {
        // Arrange
        let mut scheduler = BoundaryScheduler::new();
        scheduler.set_element_boundaries(&[element("e1", 10_000)], 5_000);
        scheduler.evaluate(10_500, PlaybackState::Playing);

        // Act: nudge the offset without crossing any boundary.
        scheduler.update_element_boundaries(&[element("e1", 10_200)], 5_000);
        let result = scheduler.evaluate(10_600, PlaybackState::Playing);

        // Assert: resolved pair is unchanged, so no delta is reported.
        assert_eq!(result, Evaluation::Changes(Vec::new()));
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut scheduler = BoundaryScheduler::new();
        scheduler.set_element_boundaries(&[element("e1", 0)], 1_000);
        scheduler.evaluate(10_000, PlaybackState::Playing);

        scheduler.clear();

        assert!(scheduler.boundaries().is_empty());
        assert_eq!(scheduler.script_complete_at(), None);
        assert_eq!(scheduler.visual(&ElementId::from("e1")), ElementVisual::default());
        assert!(!scheduler.is_passed(&ElementId::from("e1")));
    }
}
