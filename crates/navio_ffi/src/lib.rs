//! Flutter-facing bindings for `navio_core`.

pub mod api;
