//! Map board: places on the map, liked places and search candidates.
//!
//! # Invariants
//! - `like_places` holds at most one entry per name.
//! - Removing an object from the board unregisters it.

use super::place::{LikePlace, Place, SearchPlace};
use crate::model::place::{Coordinate, PlaceRecord};
use crate::provider::PlaceSummary;
use crate::registry::{ObjectId, Owned};

#[derive(Debug, Default)]
pub struct MapBoard {
    places: Vec<Owned<Place>>,
    like_places: Vec<Owned<LikePlace>>,
    search_places: Vec<Owned<SearchPlace>>,
    current_location: Option<Coordinate>,
}

crate::registered_entity!(MapBoard, "map_board");

impl MapBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a place and returns its id.
    pub fn add_place(&mut self, record: PlaceRecord) -> ObjectId<Place> {
        let place = Owned::new(Place::new(record));
        let id = place.id();
        self.places.push(place);
        id
    }

    /// Removes a place. Returns whether it belonged to this board.
    pub fn remove_place(&mut self, id: ObjectId<Place>) -> bool {
        let before = self.places.len();
        self.places.retain(|place| place.id() != id);
        before != self.places.len()
    }

    pub fn place_ids(&self) -> Vec<ObjectId<Place>> {
        self.places.iter().map(Owned::id).collect()
    }

    pub fn find_place(&self, name: &str) -> Option<ObjectId<Place>> {
        self.places
            .iter()
            .find(|place| place.borrow().name() == name)
            .map(Owned::id)
    }

    pub fn like_place_ids(&self) -> Vec<ObjectId<LikePlace>> {
        self.like_places.iter().map(Owned::id).collect()
    }

    /// Liked names in in-memory display order.
    pub fn like_place_names(&self) -> Vec<String> {
        self.like_places
            .iter()
            .map(|like| like.borrow().name().to_string())
            .collect()
    }

    pub fn find_like_place(&self, name: &str) -> Option<ObjectId<LikePlace>> {
        self.like_places
            .iter()
            .find(|like| like.borrow().name() == name)
            .map(Owned::id)
    }

    /// Creates a favorite at the front unless one with the same name exists.
    ///
    /// Returns whether an object was created.
    pub(crate) fn ensure_like_place(&mut self, record: &PlaceRecord) -> bool {
        if self.find_like_place(&record.name).is_some() {
            return false;
        }
        self.like_places
            .insert(0, Owned::new(LikePlace::new(record.clone())));
        true
    }

    /// Moves (or creates) the favorite for `record.name` to the front and
    /// refreshes its fields.
    pub(crate) fn promote_like_place(&mut self, record: &PlaceRecord) {
        match self
            .like_places
            .iter()
            .position(|like| like.borrow().name() == record.name)
        {
            Some(index) => {
                let like = self.like_places.remove(index);
                like.borrow_mut().set_record(record.clone());
                self.like_places.insert(0, like);
            }
            None => self
                .like_places
                .insert(0, Owned::new(LikePlace::new(record.clone()))),
        }
    }

    /// Removes every favorite named `name`. Returns whether any was removed.
    pub(crate) fn remove_like_place(&mut self, name: &str) -> bool {
        let before = self.like_places.len();
        self.like_places.retain(|like| like.borrow().name() != name);
        before != self.like_places.len()
    }

    /// Sorts favorites to follow `order`. Names missing from `order` keep
    /// their relative position after the listed ones.
    pub(crate) fn order_like_places(&mut self, order: &[String]) {
        self.like_places.sort_by_cached_key(|like| {
            let like = like.borrow();
            order
                .iter()
                .position(|name| name == like.name())
                .unwrap_or(order.len())
        });
    }

    /// Replaces all favorites, keeping the given order.
    pub(crate) fn replace_like_places(&mut self, records: Vec<PlaceRecord>) {
        self.like_places = records
            .into_iter()
            .map(|record| Owned::new(LikePlace::new(record)))
            .collect();
    }

    /// Replaces the current search candidates.
    pub fn replace_search_places(
        &mut self,
        summaries: Vec<PlaceSummary>,
    ) -> Vec<ObjectId<SearchPlace>> {
        self.search_places = summaries
            .into_iter()
            .map(|summary| Owned::new(SearchPlace::new(summary)))
            .collect();
        self.search_place_ids()
    }

    pub fn search_place_ids(&self) -> Vec<ObjectId<SearchPlace>> {
        self.search_places.iter().map(Owned::id).collect()
    }

    pub fn clear_search_places(&mut self) {
        self.search_places.clear();
    }

    pub fn current_location(&self) -> Option<Coordinate> {
        self.current_location
    }

    pub fn set_current_location(&mut self, coordinate: Option<Coordinate>) {
        self.current_location = coordinate;
    }
}
