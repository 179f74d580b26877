//! Home board: curated spots.

use crate::model::place::Coordinate;
use crate::registry::{ObjectId, Owned};

/// Curated highlight shown on the home board.
#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    pub name: String,
    pub image_name: String,
    pub summary: String,
    pub coordinate: Coordinate,
}

crate::registered_entity!(Spot, "spot");

#[derive(Debug, Default)]
pub struct HomeBoard {
    spots: Vec<Owned<Spot>>,
}

crate::registered_entity!(HomeBoard, "home_board");

impl HomeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_spot(&mut self, spot: Spot) -> ObjectId<Spot> {
        let spot = Owned::new(spot);
        let id = spot.id();
        self.spots.push(spot);
        id
    }

    pub fn remove_spot(&mut self, id: ObjectId<Spot>) -> bool {
        let before = self.spots.len();
        self.spots.retain(|spot| spot.id() != id);
        before != self.spots.len()
    }

    pub fn spot_ids(&self) -> Vec<ObjectId<Spot>> {
        self.spots.iter().map(Owned::id).collect()
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}
