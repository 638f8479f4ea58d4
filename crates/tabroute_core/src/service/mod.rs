//! Core use-case services.
//!
//! # Responsibility
//! - Wire storage, host and routing engine into one process-lifetime facade.
//! - Expose the UI-facing request surface on top of that facade.

pub mod message;
pub mod router_service;
