//! Shared record types and serialization for the vaccination-opinion simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod counts;
pub mod record;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export count types
pub use counts::TickCounts;

// Re-export run records
pub use record::{generate_run_id, Edge, NetKind, ReplicateRecord, RunRecord, RunSummary};
