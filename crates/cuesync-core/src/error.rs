//! Engine error types.

use thiserror::Error;

/// Top-level engine error type.
///
/// The timing core itself never fails: invalid transitions are ignored by
/// contract and missing script bindings degrade to a zero show time. Errors
/// only arise at the edges, when external data cannot be interpreted.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A script `start_time` value could not be interpreted as either an
    /// ISO-8601 timestamp or epoch milliseconds.
    #[error("invalid script start time: {0}")]
    InvalidStartTime(String),
}
