//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repositories, providers and the live object graph.
//! - Keep UI/FFI layers decoupled from storage and SDK details.

pub mod favorite_service;
pub mod location_service;
pub mod recent_service;
pub mod search_service;
