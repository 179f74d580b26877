//! Live place objects shown on the map board.

use crate::model::observable::{Notification, Observable, SubscriptionId};
use crate::model::place::PlaceRecord;
use crate::provider::{PlacePhoto, PlaceSummary};

/// A place the user is looking at, with its observable liked state.
#[derive(Debug)]
pub struct Place {
    record: PlaceRecord,
    liked: Observable<bool>,
    loaded_from_store: bool,
}

crate::registered_entity!(Place, "place");

impl Place {
    pub fn new(record: PlaceRecord) -> Self {
        Self {
            record,
            liked: Observable::new(false),
            loaded_from_store: false,
        }
    }

    pub fn record(&self) -> &PlaceRecord {
        &self.record
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Replaces display fields. Favorite snapshots pick the change up on the
    /// next like.
    pub fn update_record(&mut self, record: PlaceRecord) {
        self.record = record;
    }

    pub fn is_liked(&self) -> bool {
        *self.liked.get()
    }

    pub fn subscribe_liked(&mut self, listener: impl Fn(&bool) + 'static) -> SubscriptionId {
        self.liked.subscribe(listener)
    }

    pub fn unsubscribe_liked(&mut self, id: SubscriptionId) -> bool {
        self.liked.unsubscribe(id)
    }

    #[must_use = "dispatch after releasing the place borrow"]
    pub(crate) fn set_liked(&mut self, liked: bool) -> Option<Notification<bool>> {
        self.liked.set(liked)
    }

    /// Whether favorite state was already loaded from the store.
    pub fn is_loaded(&self) -> bool {
        self.loaded_from_store
    }

    pub(crate) fn mark_loaded(&mut self) {
        self.loaded_from_store = true;
    }
}

/// In-memory favorite shown in the liked list.
#[derive(Debug, Clone, PartialEq)]
pub struct LikePlace {
    record: PlaceRecord,
}

crate::registered_entity!(LikePlace, "like_place");

impl LikePlace {
    pub fn new(record: PlaceRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &PlaceRecord {
        &self.record
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub(crate) fn set_record(&mut self, record: PlaceRecord) {
        self.record = record;
    }
}

/// Search candidate returned by the places provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlace {
    summary: PlaceSummary,
    photo: Option<PlacePhoto>,
}

crate::registered_entity!(SearchPlace, "search_place");

impl SearchPlace {
    pub fn new(summary: PlaceSummary) -> Self {
        Self {
            summary,
            photo: None,
        }
    }

    pub fn summary(&self) -> &PlaceSummary {
        &self.summary
    }

    pub fn photo(&self) -> Option<&PlacePhoto> {
        self.photo.as_ref()
    }

    pub fn set_photo(&mut self, photo: Option<PlacePhoto>) {
        self.photo = photo;
    }

    /// Builds the place record used when the candidate is opened.
    pub fn to_record(&self) -> PlaceRecord {
        let mut record = self.summary.to_record();
        if let Some(photo) = &self.photo {
            record.image_name = photo.reference.clone();
        }
        record
    }
}
