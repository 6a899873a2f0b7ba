//! Protocol error types.

use thiserror::Error;

/// Errors raised while interpreting transport payloads.
///
/// Stale, duplicated, or out-of-order messages are *not* errors — every
/// handler tolerates them by construction. Only payloads that cannot be
/// decoded at all surface here.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A payload was not valid JSON for its message type.
    #[error("malformed sync payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A script record carried an uninterpretable start time.
    #[error(transparent)]
    Engine(#[from] cuesync_core::error::EngineError),
}
