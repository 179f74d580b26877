//! Core domain logic for Navio.
//! This crate is the single source of truth for favorite and recent state.

pub mod board;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod provider;
pub mod registry;
pub mod repo;
pub mod service;
pub mod store;

pub use board::home::{HomeBoard, Spot};
pub use board::map::MapBoard;
pub use board::place::{LikePlace, Place, SearchPlace};
pub use board::setting::Setting;
pub use board::Navio;
pub use config::{load_config, ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::observable::{Observable, SubscriptionId};
pub use model::place::{
    Coordinate, FavoriteSnapshot, PlaceRecord, PlaceValidationError, RecentPlaceRef,
};
pub use provider::{
    LocationHandler, LocationProvider, PlacePhoto, PlaceSearchProvider, PlaceSummary,
    ProviderError, ProviderResult,
};
pub use registry::{ObjectId, Owned, Registered, Registry};
pub use repo::favorite_repo::{
    FavoriteRepository, FavoriteState, KvFavoriteRepository, LegacyFlag, LIKED_ORDER_KEY,
    LIKED_PLACES_KEY,
};
pub use repo::recent_repo::{KvRecentRepository, RecentRepository, RECENT_PLACES_KEY};
pub use service::favorite_service::{FavoriteOutcome, FavoriteService};
pub use service::recent_service::RecentService;
pub use service::search_service::SearchService;
pub use store::{
    KeyValueStore, KvWrite, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
