//! Todo domain model.
//!
//! # Responsibility
//! - Define the item record and the two-list document shape.
//! - Keep JSON wire naming (`todo`/`done`) in one place.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - An item belongs to exactly one list.

pub mod document;
pub mod item;
