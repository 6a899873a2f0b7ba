//! Cuesync Core — shared abstractions.
//!
//! This crate defines the fundamental types and traits that the timing
//! engine and the sync protocol depend on. It contains no engine logic.

pub mod clock;
pub mod element;
pub mod error;
pub mod script;
pub mod subject;
pub mod time;
