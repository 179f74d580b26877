//! Domain value types.
//!
//! # Responsibility
//! - Define plain records shared by live objects, repositories and services.
//! - Provide the observable field wrapper used by live objects.
//!
//! # Invariants
//! - Value types carry no identity; identity lives in `registry::ObjectId`.

pub mod observable;
pub mod place;
