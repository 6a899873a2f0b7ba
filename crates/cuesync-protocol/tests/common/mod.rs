//! Shared fixtures for protocol integration tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use cuesync_core::element::{ElementId, ScriptElement};
use cuesync_protocol::runtime::ShowRuntime;
use cuesync_test_support::ManualClock;

/// A wall clock frozen at curtain time: 2026-03-01 20:00:00 UTC.
pub fn curtain_wall() -> ManualClock {
    ManualClock::starting_at(Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap())
}

/// A runtime on the given wall clock with a script scheduled at curtain.
pub fn runtime_at_curtain(wall: &ManualClock) -> ShowRuntime {
    let runtime = ShowRuntime::new(Arc::new(wall.clone()));
    runtime
        .session()
        .borrow_mut()
        .set_script_start(Some(Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap()));
    runtime
}

/// A script element snapshot entry.
pub fn cue(id: &str, offset_ms: i64) -> ScriptElement {
    ScriptElement {
        element_id: ElementId::from(id),
        offset_ms,
        duration_ms: None,
        element_name: format!("cue {id}"),
    }
}
