//! Cuesync Engine — show time engine and boundary scheduler.
//!
//! The engine turns wall-clock samples plus accumulated pause duration into
//! an authoritative "show time", derives timestamped transition boundaries
//! from script elements, and resolves per-element highlight/border state on
//! every evaluation pass. It owns no transport and persists nothing.

pub mod boundary;
pub mod element_store;
pub mod show_clock;
pub mod ticker;
