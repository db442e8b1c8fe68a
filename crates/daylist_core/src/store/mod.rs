//! Persistence service and its request/response boundary.
//!
//! # Responsibility
//! - Own the primary data file and its fallback copy.
//! - Keep file-system details out of the list controller.
//!
//! # Invariants
//! - Boundary calls report failures as envelopes, never as panics.

pub mod boundary;
pub mod dialog;
pub mod json_file;
pub mod service;
