//! The script record consumed from the script-management subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Scheduled start of a script, as delivered on the wire.
///
/// The script-management subsystem exposes `start_time` either as an
/// ISO-8601 string or as epoch milliseconds; both forms resolve to the same
/// wall-clock instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartTime {
    /// Milliseconds since the Unix epoch.
    EpochMs(i64),
    /// ISO-8601 / RFC 3339 timestamp.
    Iso(String),
}

impl StartTime {
    /// Resolves the wire value to a wall-clock instant.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidStartTime` if the ISO string does not
    /// parse or the epoch value is out of range.
    pub fn resolve(&self) -> Result<DateTime<Utc>, EngineError> {
        match self {
            Self::EpochMs(ms) => DateTime::from_timestamp_millis(*ms)
                .ok_or_else(|| EngineError::InvalidStartTime(format!("epoch ms out of range: {ms}"))),
            Self::Iso(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| EngineError::InvalidStartTime(format!("{raw}: {e}"))),
        }
    }
}

/// Read-only view of the script record bound to a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRecord {
    /// Scheduled show start; absent while the show is still unscheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<StartTime>,
}

impl ScriptRecord {
    /// Resolves the scheduled start, if any.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidStartTime` if a present value cannot be
    /// interpreted.
    pub fn resolved_start(&self) -> Result<Option<DateTime<Utc>>, EngineError> {
        self.start_time.as_ref().map(StartTime::resolve).transpose()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{ScriptRecord, StartTime};

    #[test]
    fn test_start_time_resolves_iso_8601() {
        let start = StartTime::Iso("2026-03-01T20:00:00Z".to_owned());
        assert_eq!(
            start.resolve().unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_start_time_resolves_epoch_ms() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap();
        let start = StartTime::EpochMs(expected.timestamp_millis());
        assert_eq!(start.resolve().unwrap(), expected);
    }

    #[test]
    fn test_start_time_rejects_garbage() {
        let start = StartTime::Iso("eight o'clock-ish".to_owned());
        assert!(start.resolve().is_err());
    }

    #[test]
    fn test_record_deserializes_both_wire_forms() {
        let iso: ScriptRecord = serde_json::from_str(r#"{"start_time": "2026-03-01T20:00:00Z"}"#).unwrap();
        let epoch: ScriptRecord = serde_json::from_str(r#"{"start_time": 1772395200000}"#).unwrap();
        assert_eq!(
            iso.resolved_start().unwrap(),
            epoch.resolved_start().unwrap()
        );
    }

    #[test]
    fn test_record_tolerates_missing_start_time() {
        let record: ScriptRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.resolved_start().unwrap(), None);
    }
}
