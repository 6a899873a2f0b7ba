//! Cuesync Protocol — director/guest synchronization.
//!
//! The director and every guest run the identical show engine; only the
//! director issues raw transport-level commands. Guests consume a discrete
//! command stream plus a lower-frequency status heartbeat that corrects
//! cumulative-pause drift for late joiners and dropped connections. All
//! handlers are idempotent: duplicated or out-of-order delivery degrades to
//! a transient visual desync that self-heals on the next message.

pub mod error;
pub mod message;
pub mod runtime;
pub mod session;
