//! Domain types shared between the timing engine and its consumers.

use serde::{Deserialize, Serialize};

/// Identifier of a script element, owned by the script-editing subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    /// Creates an element identifier from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Read-only snapshot of a script element as consumed from the
/// script-management subsystem. The engine only reads offsets and durations;
/// it never mutates or persists elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptElement {
    /// Stable element identifier.
    pub element_id: ElementId,
    /// Design-time scheduled offset from show start, in milliseconds.
    pub offset_ms: i64,
    /// Optional scheduled duration, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    /// Human-readable element name.
    pub element_name: String,
}

/// Playback state of the show clock.
///
/// `Stopped` and `Complete` are terminal with respect to timer activity;
/// `Complete` additionally freezes the displayed clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlaybackState {
    /// No show running; all timing fields are at their initial values.
    Stopped,
    /// The show clock is advancing; the tick timer is active.
    Playing,
    /// The director paused the show; the clock is frozen at the pause instant.
    Paused,
    /// Emergency technical hold; identical timing semantics to `Paused` with
    /// distinct downstream styling.
    Safety,
    /// The show has ended; the displayed clock is frozen.
    Complete,
}

impl PlaybackState {
    /// Returns true for the two hold states that stamp `paused_at`.
    #[must_use]
    pub fn is_hold(self) -> bool {
        matches!(self, Self::Paused | Self::Safety)
    }
}

/// Highlight state of a single element, derived on every evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightState {
    /// Not yet inside the lookahead window.
    #[default]
    Inactive,
    /// Inside the lookahead window, before the trigger time.
    Upcoming,
    /// Between the trigger time and the end of the dwell window.
    Current,
    /// Dwell window elapsed.
    Past,
}

/// Border state of a single element, derived independently of the highlight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderState {
    /// No border.
    #[default]
    None,
    /// Red trigger border, shown for the dwell window after the trigger.
    RedBorder,
}

/// The resolved `(highlight, border)` pair for one element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementVisual {
    /// Highlight track value.
    pub highlight: HighlightState,
    /// Border track value.
    pub border: BorderState,
}

impl ElementVisual {
    /// Builds a visual pair.
    #[must_use]
    pub fn new(highlight: HighlightState, border: BorderState) -> Self {
        Self { highlight, border }
    }
}

#[cfg(test)]
mod tests {
    use super::{BorderState, HighlightState, PlaybackState};

    #[test]
    fn test_playback_state_hold_covers_pause_and_safety_only() {
        assert!(PlaybackState::Paused.is_hold());
        assert!(PlaybackState::Safety.is_hold());
        assert!(!PlaybackState::Playing.is_hold());
        assert!(!PlaybackState::Stopped.is_hold());
        assert!(!PlaybackState::Complete.is_hold());
    }

    #[test]
    fn test_visual_states_serialize_with_wire_names() {
        assert_eq!(
            serde_json::to_string(&HighlightState::Upcoming).unwrap(),
            "\"upcoming\""
        );
        assert_eq!(
            serde_json::to_string(&BorderState::RedBorder).unwrap(),
            "\"red_border\""
        );
        assert_eq!(serde_json::to_string(&BorderState::None).unwrap(), "\"none\"");
    }
}
