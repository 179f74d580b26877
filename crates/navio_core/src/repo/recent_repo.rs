//! Recently searched places persistence (`savedGooglePlaceIDs`).

use crate::model::place::RecentPlaceRef;
use crate::store::{KeyValueStore, StoreResult};

pub const RECENT_PLACES_KEY: &str = "savedGooglePlaceIDs";

pub trait RecentRepository {
    /// Most-recent first.
    fn recent_places(&self) -> StoreResult<Vec<RecentPlaceRef>>;
    fn save_recent_places(&self, places: &[RecentPlaceRef]) -> StoreResult<()>;
}

pub struct KvRecentRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvRecentRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> RecentRepository for KvRecentRepository<S> {
    fn recent_places(&self) -> StoreResult<Vec<RecentPlaceRef>> {
        Ok(self
            .store
            .get_json::<Vec<RecentPlaceRef>>(RECENT_PLACES_KEY)?
            .unwrap_or_default())
    }

    fn save_recent_places(&self, places: &[RecentPlaceRef]) -> StoreResult<()> {
        if places.is_empty() {
            return self.store.remove(RECENT_PLACES_KEY);
        }
        self.store.put_json(RECENT_PLACES_KEY, places)
    }
}
