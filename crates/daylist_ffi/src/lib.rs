//! Flutter-facing bindings over `daylist_core`.

pub mod api;
