//! Live object graph.
//!
//! # Responsibility
//! - Own the live domain objects behind the UI: boards, places, favorites.
//! - Register every object so callers can keep `ObjectId`s instead.
//!
//! # Invariants
//! - Each object is owned by exactly one parent; dropping the parent
//!   unregisters the whole subtree.
//! - Objects are confined to the thread that created them.

pub mod home;
pub mod map;
pub mod place;
pub mod setting;

use crate::registry::{ObjectId, Owned};
use home::HomeBoard;
use map::MapBoard;
use setting::Setting;

/// Root of the object graph.
#[derive(Debug)]
pub struct Navio {
    home_board: Owned<HomeBoard>,
    map_board: Owned<MapBoard>,
    setting: Owned<Setting>,
}

crate::registered_entity!(Navio, "navio");

impl Navio {
    pub fn new(setting: Setting) -> Self {
        Self {
            home_board: Owned::new(HomeBoard::new()),
            map_board: Owned::new(MapBoard::new()),
            setting: Owned::new(setting),
        }
    }

    pub fn home_board(&self) -> &Owned<HomeBoard> {
        &self.home_board
    }

    pub fn map_board(&self) -> &Owned<MapBoard> {
        &self.map_board
    }

    pub fn setting(&self) -> &Owned<Setting> {
        &self.setting
    }

    pub fn map_board_id(&self) -> ObjectId<MapBoard> {
        self.map_board.id()
    }
}

#[cfg(test)]
mod tests {
    use super::setting::Setting;
    use super::Navio;
    use crate::model::place::PlaceRecord;

    #[test]
    fn dropping_root_unregisters_subtree() {
        let navio = Navio::new(Setting::default());
        let board_id = navio.map_board_id();
        let setting_id = navio.setting().id();
        let place_id = navio
            .map_board()
            .borrow_mut()
            .add_place(PlaceRecord::new("Jagalchi"));

        assert!(board_id.exists());
        assert!(place_id.exists());

        drop(navio);
        assert!(!board_id.exists());
        assert!(!setting_id.exists());
        assert!(!place_id.exists());
    }
}
