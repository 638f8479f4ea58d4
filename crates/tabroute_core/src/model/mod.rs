//! Domain model for tab routing.
//!
//! # Responsibility
//! - Define the group configuration consumed read-only by routing logic.
//! - Define the core's view of externally owned windows and tabs.
//!
//! # Invariants
//! - Group names are unique inside one `Config`.
//! - Lower `priority` values win; priorities are renumbered to `0..n-1`
//!   after every structural change.

pub mod config;
pub mod window;
