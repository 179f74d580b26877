//! Favorite state reconciler.
//!
//! # Responsibility
//! - Keep the in-memory liked list, the persisted `LIKED_PLACES` map and the
//!   persisted `MAPBOARD_LIKEPLACE_IDS` order consistent.
//! - Drive the observable liked flag of live places.
//!
//! # Invariants
//! - After `load`, a place is liked iff its name is a key of the persisted map.
//! - After every operation that writes, the order list holds exactly the map's
//!   keys, each once.
//! - Store failures never abort an operation: failed reads count as empty,
//!   failed writes are logged and in-memory state is kept.
//! - Place names are only logged as lengths.

use crate::board::map::MapBoard;
use crate::board::place::Place;
use crate::model::place::PlaceRecord;
use crate::registry::ObjectId;
use crate::repo::favorite_repo::{FavoriteRepository, FavoriteState, LegacyFlag};
use log::{debug, error, info, warn};

/// Result of a load or toggle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Liked,
    Unliked,
    /// `load` already ran for this place; nothing changed.
    AlreadyLoaded,
    /// The place id no longer resolves.
    PlaceNotFound,
}

impl FavoriteOutcome {
    fn from_liked(liked: bool) -> Self {
        if liked {
            Self::Liked
        } else {
            Self::Unliked
        }
    }
}

pub struct FavoriteService<R: FavoriteRepository> {
    repo: R,
    write_legacy_flags: bool,
}

impl<R: FavoriteRepository> FavoriteService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            write_legacy_flags: true,
        }
    }

    /// Enables or disables writes of the legacy `"<name>.isLiked"` key.
    pub fn with_legacy_flags(mut self, enabled: bool) -> Self {
        self.write_legacy_flags = enabled;
        self
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Derives a place's liked state from the persisted map.
    ///
    /// Creates or removes the in-memory favorite to match, fixes the place's
    /// position in the order list and sorts the in-memory list to follow it. Runs once per place; repeated calls
    /// return [`FavoriteOutcome::AlreadyLoaded`].
    pub fn load(&self, board: &mut MapBoard, place_id: ObjectId<Place>) -> FavoriteOutcome {
        let Some(place) = place_id.resolve() else {
            warn!("event=favorite_load module=favorite status=skipped reason=place_not_found");
            return FavoriteOutcome::PlaceNotFound;
        };
        let (record, already_loaded) = {
            let place = place.borrow();
            (place.record().clone(), place.is_loaded())
        };
        if already_loaded {
            info!(
                "event=favorite_load module=favorite status=skipped reason=already_loaded name_len={}",
                record.name.len()
            );
            return FavoriteOutcome::AlreadyLoaded;
        }

        let (mut state, readable) = self.read_state();
        let liked = state.is_liked(&record.name);

        if liked {
            board.ensure_like_place(&record);
        } else {
            board.remove_like_place(&record.name);
        }

        let in_order = state.order.iter().any(|name| *name == record.name);
        let mut order_changed = false;
        if liked && !in_order {
            state.order.insert(0, record.name.clone());
            order_changed = true;
        } else if !liked && in_order {
            state.order.retain(|name| *name != record.name);
            order_changed = true;
        }
        order_changed |= repair_order(&mut state);
        board.order_like_places(&state.order);

        if order_changed {
            if readable {
                self.write_order(&state.order);
            } else {
                warn!(
                    "event=favorite_load module=favorite status=degraded reason=store_unreadable write=skipped"
                );
            }
        }

        let notification = {
            let mut place = place.borrow_mut();
            place.mark_loaded();
            place.set_liked(liked)
        };
        if let Some(notification) = notification {
            notification.notify();
        }

        debug!(
            "event=favorite_load module=favorite status=ok liked={liked} order_changed={order_changed}"
        );
        FavoriteOutcome::from_liked(liked)
    }

    /// Flips a place's liked state and persists it.
    ///
    /// Liking (again) moves the name to the front of the order list and
    /// refreshes the stored snapshot.
    pub fn toggle(&self, board: &mut MapBoard, place_id: ObjectId<Place>) -> FavoriteOutcome {
        let Some(place) = place_id.resolve() else {
            warn!("event=favorite_toggle module=favorite status=skipped reason=place_not_found");
            return FavoriteOutcome::PlaceNotFound;
        };
        let (record, currently_liked) = {
            let place = place.borrow();
            (place.record().clone(), place.is_liked())
        };
        let target = !currently_liked;
        let name = record.name.clone();

        let (mut state, readable) = self.read_state();
        if !readable {
            warn!(
                "event=favorite_toggle module=favorite status=degraded reason=store_unreadable write=overwrite"
            );
        }

        let mut legacy = Vec::new();
        state.order.retain(|entry| *entry != name);
        if target {
            state.entries.insert(name.clone(), record.snapshot());
            state.order.insert(0, name.clone());
            if self.write_legacy_flags {
                legacy.push(LegacyFlag::Set(name.clone()));
            }
            board.promote_like_place(&record);
        } else {
            state.entries.remove(&name);
            legacy.push(LegacyFlag::Clear(name.clone()));
            board.remove_like_place(&name);
        }
        repair_order(&mut state);
        board.order_like_places(&state.order);
        self.write_state(&state, &legacy);

        let notification = place.borrow_mut().set_liked(target);
        if let Some(notification) = notification {
            notification.notify();
        }

        info!(
            "event=favorite_toggle module=favorite status=ok liked={target} favorites={}",
            state.entries.len()
        );
        FavoriteOutcome::from_liked(target)
    }

    /// Rebuilds the in-memory liked list from the store, in display order.
    ///
    /// Places on the board get their liked flag refreshed. Live records are
    /// preferred over stored snapshots since snapshots carry no coordinate.
    pub fn restore(&self, board: &mut MapBoard) -> usize {
        let (mut state, readable) = self.read_state();
        if repair_order(&mut state) && readable {
            self.write_order(&state.order);
        }

        let records = state
            .order
            .iter()
            .map(|name| {
                board
                    .find_place(name)
                    .and_then(|id| id.with(|place| place.record().clone()))
                    .unwrap_or_else(|| {
                        let snapshot = state.entries.get(name).cloned().unwrap_or_default();
                        PlaceRecord::from_snapshot(name.clone(), &snapshot)
                    })
            })
            .collect::<Vec<_>>();
        let count = records.len();
        board.replace_like_places(records);

        for place_id in board.place_ids() {
            let notification = place_id
                .with_mut(|place| {
                    let liked = state.is_liked(place.name());
                    place.mark_loaded();
                    place.set_liked(liked)
                })
                .flatten();
            if let Some(notification) = notification {
                notification.notify();
            }
        }

        info!("event=favorite_restore module=favorite status=ok favorites={count}");
        count
    }

    /// Repairs order drift in the store. Returns whether anything changed.
    pub fn repair(&self) -> bool {
        let (mut state, readable) = self.read_state();
        if !readable {
            warn!("event=favorite_repair module=favorite status=skipped reason=store_unreadable");
            return false;
        }
        let changed = repair_order(&mut state);
        if changed {
            self.write_order(&state.order);
        }
        changed
    }

    /// Whether `name` is liked according to the store.
    pub fn is_liked(&self, name: &str) -> bool {
        self.read_state().0.is_liked(name)
    }

    /// Liked names, most recently liked first.
    pub fn liked_names(&self) -> Vec<String> {
        let (mut state, _) = self.read_state();
        repair_order(&mut state);
        state.order
    }

    /// Removes every favorite from the store and the board.
    pub fn clear_all(&self, board: &mut MapBoard) -> usize {
        let (state, _) = self.read_state();
        let legacy = state
            .entries
            .keys()
            .chain(state.order.iter())
            .map(|name| LegacyFlag::Clear(name.clone()))
            .collect::<Vec<_>>();
        let removed = state.entries.len();
        self.write_state(&FavoriteState::default(), &legacy);
        board.replace_like_places(Vec::new());

        for place_id in board.place_ids() {
            let notification = place_id.with_mut(|place| place.set_liked(false)).flatten();
            if let Some(notification) = notification {
                notification.notify();
            }
        }

        info!("event=favorite_clear module=favorite status=ok removed={removed}");
        removed
    }

    /// Reads both projections. The flag is `false` when any read failed.
    fn read_state(&self) -> (FavoriteState, bool) {
        let mut readable = true;
        let entries = self.repo.liked_places().unwrap_or_else(|err| {
            readable = false;
            warn!(
                "event=favorite_read module=favorite status=error key=liked_places error={err}"
            );
            Default::default()
        });
        let order = self.repo.liked_order().unwrap_or_else(|err| {
            readable = false;
            warn!("event=favorite_read module=favorite status=error key=liked_order error={err}");
            Vec::new()
        });
        (FavoriteState { entries, order }, readable)
    }

    fn write_state(&self, state: &FavoriteState, legacy: &[LegacyFlag]) {
        if let Err(err) = self.repo.commit(state, legacy) {
            error!("event=favorite_write module=favorite status=error error={err}");
        }
    }

    fn write_order(&self, order: &[String]) {
        if let Err(err) = self.repo.save_order(order) {
            error!("event=favorite_write module=favorite status=error key=liked_order error={err}");
        }
    }
}

/// Makes the order list hold each map key exactly once.
///
/// Keeps the relative order of known names, drops orphans and duplicates, and
/// puts keys missing from the order at the front. Returns whether it changed.
pub fn repair_order(state: &mut FavoriteState) -> bool {
    if state.is_consistent() {
        return false;
    }

    let mut seen = std::collections::BTreeSet::new();
    let kept = state
        .order
        .iter()
        .filter(|name| state.entries.contains_key(*name) && seen.insert((*name).clone()))
        .cloned()
        .collect::<Vec<_>>();
    let mut repaired = state
        .entries
        .keys()
        .filter(|name| !seen.contains(*name))
        .cloned()
        .collect::<Vec<_>>();
    repaired.extend(kept);

    state.order = repaired;
    true
}
