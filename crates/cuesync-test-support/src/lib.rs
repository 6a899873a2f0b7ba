//! Shared test doubles and utilities for the Cuesync engine.

mod clock;
mod recorder;

pub use clock::ManualClock;
pub use recorder::{SharedRecorder, recorder};
