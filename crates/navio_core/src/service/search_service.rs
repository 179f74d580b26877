//! Place search orchestration over a [`PlaceSearchProvider`].
//!
//! # Invariants
//! - Provider failures yield an empty candidate list, never an error.
//! - At most `limit` candidates are kept, whatever the provider returns.
//! - Photo failures leave the candidate without a photo.

use crate::board::map::MapBoard;
use crate::board::place::{Place, SearchPlace};
use crate::provider::PlaceSearchProvider;
use crate::registry::ObjectId;
use crate::repo::recent_repo::RecentRepository;
use crate::service::recent_service::RecentService;
use log::{debug, info, warn};

pub struct SearchService<P: PlaceSearchProvider> {
    provider: P,
    limit: usize,
}

impl<P: PlaceSearchProvider> SearchService<P> {
    pub fn new(provider: P, limit: usize) -> Self {
        Self {
            provider,
            limit: limit.max(1),
        }
    }

    /// Replaces the board's search candidates with results for `query`.
    pub fn search(&self, board: &mut MapBoard, query: &str) -> Vec<ObjectId<SearchPlace>> {
        let query = query.trim();
        if query.is_empty() {
            board.clear_search_places();
            return Vec::new();
        }

        let mut summaries = match self.provider.search(query, self.limit) {
            Ok(summaries) => summaries,
            Err(err) => {
                warn!(
                    "event=place_search module=search status=error provider={} code={} retryable={}",
                    err.provider_id, err.code, err.retryable
                );
                board.clear_search_places();
                return Vec::new();
            }
        };
        summaries.truncate(self.limit);

        let ids = board.replace_search_places(summaries);
        for id in &ids {
            self.attach_photo(*id);
        }

        info!(
            "event=place_search module=search status=ok provider={} results={}",
            self.provider.provider_id(),
            ids.len()
        );
        ids
    }

    /// Opens a candidate as a map place and records it as a recent search.
    ///
    /// Reuses an existing place with the same name. Returns `None` when the
    /// candidate is gone.
    pub fn open_candidate<R: RecentRepository>(
        &self,
        board: &mut MapBoard,
        candidate: ObjectId<SearchPlace>,
        recents: &RecentService<R>,
    ) -> Option<ObjectId<Place>> {
        let record = candidate.with(SearchPlace::to_record)?;
        if let Some(place_id) = &record.place_id {
            recents.record(place_id, &record.name);
        }

        let id = match board.find_place(&record.name) {
            Some(existing) => existing,
            None => board.add_place(record),
        };
        Some(id)
    }

    fn attach_photo(&self, id: ObjectId<SearchPlace>) {
        let Some(place_id) = id.with(|candidate| candidate.summary().place_id.clone()) else {
            return;
        };
        match self.provider.photo(&place_id) {
            Ok(photo) => {
                id.with_mut(|candidate| candidate.set_photo(photo));
            }
            Err(err) => {
                debug!(
                    "event=place_photo module=search status=error provider={} code={}",
                    err.provider_id, err.code
                );
            }
        }
    }
}
