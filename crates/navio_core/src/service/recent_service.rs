//! Recently searched places.
//!
//! # Invariants
//! - The list is most-recent first and holds each `rawValue` at most once.
//! - The list never grows past the configured limit.
//! - Store failures degrade to an empty list and are logged.

use crate::model::place::RecentPlaceRef;
use crate::repo::recent_repo::RecentRepository;
use log::{error, info, warn};

pub struct RecentService<R: RecentRepository> {
    repo: R,
    limit: usize,
}

impl<R: RecentRepository> RecentService<R> {
    /// `limit` is clamped to at least one entry.
    pub fn new(repo: R, limit: usize) -> Self {
        Self {
            repo,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn list(&self) -> Vec<RecentPlaceRef> {
        self.repo.recent_places().unwrap_or_else(|err| {
            warn!("event=recent_read module=recent status=error error={err}");
            Vec::new()
        })
    }

    /// Moves (or inserts) `raw_value` to the front and returns the new list.
    pub fn record(&self, raw_value: &str, name: &str) -> Vec<RecentPlaceRef> {
        let raw_value = raw_value.trim();
        if raw_value.is_empty() {
            warn!("event=recent_record module=recent status=skipped reason=empty_place_id");
            return self.list();
        }

        let mut places = self.list();
        places.retain(|place| place.raw_value != raw_value);
        places.insert(0, RecentPlaceRef::new(raw_value, name));
        places.truncate(self.limit);
        self.write(&places);

        info!(
            "event=recent_record module=recent status=ok count={}",
            places.len()
        );
        places
    }

    /// Removes one entry. Returns whether it was present.
    pub fn remove(&self, raw_value: &str) -> bool {
        let mut places = self.list();
        let before = places.len();
        places.retain(|place| place.raw_value != raw_value.trim());
        if places.len() == before {
            return false;
        }
        self.write(&places);
        true
    }

    pub fn clear(&self) {
        self.write(&[]);
        info!("event=recent_clear module=recent status=ok");
    }

    fn write(&self, places: &[RecentPlaceRef]) {
        if let Err(err) = self.repo.save_recent_places(places) {
            error!("event=recent_write module=recent status=error error={err}");
        }
    }
}
