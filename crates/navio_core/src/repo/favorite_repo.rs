//! Favorite ("liked place") persistence.
//!
//! # Responsibility
//! - Read and write the `LIKED_PLACES` map and `MAPBOARD_LIKEPLACE_IDS` order.
//! - Maintain the per-place legacy `"<name>.isLiked"` flag.
//!
//! # Invariants
//! - `commit` writes the map, the order and the legacy flag as one batch.
//! - A missing key reads as empty, never as an error.

use crate::model::place::FavoriteSnapshot;
use crate::store::{KeyValueStore, KvWrite, StoreResult};
use std::collections::{BTreeMap, BTreeSet};

/// Key of the name -> snapshot map.
pub const LIKED_PLACES_KEY: &str = "LIKED_PLACES";
/// Key of the most-recently-liked-first name list.
pub const LIKED_ORDER_KEY: &str = "MAPBOARD_LIKEPLACE_IDS";
const LEGACY_FLAG_SUFFIX: &str = ".isLiked";

pub type FavoriteMap = BTreeMap<String, FavoriteSnapshot>;

/// Returns the legacy per-place flag key.
pub fn legacy_flag_key(name: &str) -> String {
    format!("{name}{LEGACY_FLAG_SUFFIX}")
}

/// Persisted favorite projections read together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteState {
    pub entries: FavoriteMap,
    /// Most-recently-liked first.
    pub order: Vec<String>,
}

impl FavoriteState {
    pub fn is_liked(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether the order list holds exactly the map's keys, each once.
    pub fn is_consistent(&self) -> bool {
        self.order.len() == self.entries.len()
            && self.order.iter().all(|name| self.entries.contains_key(name))
            && !has_duplicates(&self.order)
    }
}

fn has_duplicates(names: &[String]) -> bool {
    let mut seen = BTreeSet::new();
    names.iter().any(|name| !seen.insert(name.as_str()))
}

/// Legacy flag write accompanying a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyFlag {
    Set(String),
    Clear(String),
}

/// Repository interface for persisted favorite state.
pub trait FavoriteRepository {
    fn liked_places(&self) -> StoreResult<FavoriteMap>;
    fn liked_order(&self) -> StoreResult<Vec<String>>;
    fn legacy_flag(&self, name: &str) -> StoreResult<Option<bool>>;
    /// Writes the order list only.
    fn save_order(&self, order: &[String]) -> StoreResult<()>;
    /// Writes map, order and legacy flag changes together.
    fn commit(&self, state: &FavoriteState, legacy: &[LegacyFlag]) -> StoreResult<()>;
}

/// Favorite repository over any [`KeyValueStore`].
pub struct KvFavoriteRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvFavoriteRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> FavoriteRepository for KvFavoriteRepository<S> {
    fn liked_places(&self) -> StoreResult<FavoriteMap> {
        Ok(self
            .store
            .get_json::<FavoriteMap>(LIKED_PLACES_KEY)?
            .unwrap_or_default())
    }

    fn liked_order(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .store
            .get_json::<Vec<String>>(LIKED_ORDER_KEY)?
            .unwrap_or_default())
    }

    fn legacy_flag(&self, name: &str) -> StoreResult<Option<bool>> {
        self.store.get_json::<bool>(&legacy_flag_key(name))
    }

    fn save_order(&self, order: &[String]) -> StoreResult<()> {
        self.store.put_json(LIKED_ORDER_KEY, order)
    }

    fn commit(&self, state: &FavoriteState, legacy: &[LegacyFlag]) -> StoreResult<()> {
        let mut writes = Vec::with_capacity(legacy.len() + 2);
        for flag in legacy {
            match flag {
                LegacyFlag::Set(name) => {
                    writes.push(KvWrite::put_json(legacy_flag_key(name), &true)?);
                }
                LegacyFlag::Clear(name) => writes.push(KvWrite::remove(legacy_flag_key(name))),
            }
        }
        writes.push(KvWrite::put_json(LIKED_PLACES_KEY, &state.entries)?);
        writes.push(KvWrite::put_json(LIKED_ORDER_KEY, &state.order)?);
        self.store.apply(&writes)
    }
}
