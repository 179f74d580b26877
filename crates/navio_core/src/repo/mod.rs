//! Typed repositories over the persisted key-value store.
//!
//! # Responsibility
//! - Own the persisted key names and value shapes.
//! - Keep JSON and key details away from service orchestration.
//!
//! # Invariants
//! - Key names are stable across releases.
//! - Repositories never hold in-memory caches; every read hits the store.

pub mod favorite_repo;
pub mod recent_repo;
