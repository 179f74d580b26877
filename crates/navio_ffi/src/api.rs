//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the live object graph and store for the calling thread.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - All calls are sync and run on the Dart UI thread; state is thread-local.
//! - Object ids cross the boundary as UUID strings and may go stale.

use log::{info, warn};
use navio_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Coordinate, CoreConfig, FavoriteOutcome, FavoriteService, KvFavoriteRepository,
    KvRecentRepository, MapBoard, Navio, ObjectId, Owned, Place, PlacePhoto, PlaceRecord,
    PlaceSearchProvider, PlaceSummary, ProviderResult, RecentPlaceRef, RecentService,
    SearchPlace, SearchService, Setting, SqliteKeyValueStore,
};
use std::cell::RefCell;
use std::rc::Rc;

type Store = Rc<SqliteKeyValueStore>;

const HOST_PROVIDER_ID: &str = "host";

struct AppState {
    navio: Owned<Navio>,
    favorites: FavoriteService<KvFavoriteRepository<Store>>,
    recents: RecentService<KvRecentRepository<Store>>,
}

thread_local! {
    static APP_STATE: RefCell<Option<AppState>> = const { RefCell::new(None) };
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Builds the object graph and opens the store from a JSON config.
///
/// Replaces any previous state on this thread; ids handed out before no longer
/// resolve. Liked places are restored from the store.
///
/// # FFI contract
/// - Sync call; opens (and migrates) the store file.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure(config_json: String) -> String {
    match build_state(&config_json) {
        Ok(state) => {
            APP_STATE.with(|slot| *slot.borrow_mut() = Some(state));
            String::new()
        }
        Err(message) => {
            warn!("event=ffi_configure module=ffi status=error");
            message
        }
    }
}

/// Liked place item returned in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikedPlaceItem {
    pub name: String,
    pub image_name: String,
    pub address: String,
    pub phone_number: String,
}

/// Recent search item, most recent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentPlaceItem {
    /// Provider place id.
    pub raw_value: String,
    pub name: String,
}

/// Action response envelope for place commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Place id the action applied to.
    pub place_id: Option<String>,
    /// Liked state after the action, when it applies.
    pub liked: Option<bool>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl PlaceActionResponse {
    fn success(message: impl Into<String>, place_id: String, liked: Option<bool>) -> Self {
        Self {
            ok: true,
            place_id: Some(place_id),
            liked,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            place_id: None,
            liked: None,
            message: message.into(),
        }
    }
}

/// Adds a place to the map board.
///
/// # FFI contract
/// - Rejects blank names and out-of-range coordinates.
/// - Returns the new place id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn place_add(
    name: String,
    image_name: String,
    address: String,
    phone_number: String,
    latitude: f64,
    longitude: f64,
) -> PlaceActionResponse {
    let record = PlaceRecord::new(name.trim())
        .with_image(image_name)
        .with_address(address)
        .with_phone_number(phone_number)
        .with_coordinate(Coordinate::new(latitude, longitude));
    if let Err(err) = record.validate() {
        return PlaceActionResponse::failure(format!("place_add failed: {err}"));
    }

    with_state(|state| {
        let id = with_board(state, |board| board.add_place(record));
        PlaceActionResponse::success("Place added.", id.to_string(), Some(false))
    })
    .unwrap_or_else(|message| PlaceActionResponse::failure(format!("place_add failed: {message}")))
}

/// Derives a place's liked state from the store.
#[flutter_rust_bridge::frb(sync)]
pub fn place_load_like(place_id: String) -> PlaceActionResponse {
    favorite_action("place_load_like", &place_id, |state, board, id| {
        state.favorites.load(board, id)
    })
}

/// Flips a place's liked state and persists it.
#[flutter_rust_bridge::frb(sync)]
pub fn place_toggle_like(place_id: String) -> PlaceActionResponse {
    favorite_action("place_toggle_like", &place_id, |state, board, id| {
        state.favorites.toggle(board, id)
    })
}

/// Removes a place from the map board. Its favorite, if any, is kept.
#[flutter_rust_bridge::frb(sync)]
pub fn place_delete(place_id: String) -> PlaceActionResponse {
    let Some(id) = ObjectId::<Place>::parse_str(&place_id) else {
        return PlaceActionResponse::failure("place_delete failed: invalid place id");
    };
    with_state(|state| {
        if with_board(state, |board| board.remove_place(id)) {
            PlaceActionResponse::success("Place deleted.", id.to_string(), None)
        } else {
            PlaceActionResponse::failure("place_delete failed: place not found")
        }
    })
    .unwrap_or_else(|message| {
        PlaceActionResponse::failure(format!("place_delete failed: {message}"))
    })
}

/// Liked places in display order (most recently liked first).
#[flutter_rust_bridge::frb(sync)]
pub fn liked_places() -> Vec<LikedPlaceItem> {
    with_state(|state| {
        with_board(state, |board| {
            board
                .like_place_ids()
                .into_iter()
                .filter_map(|id| id.with(|like| to_liked_place_item(like.record())))
                .collect()
        })
    })
    .unwrap_or_default()
}

/// Removes every favorite. Returns how many were removed.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_clear() -> u32 {
    with_state(|state| {
        let removed = with_board(state, |board| state.favorites.clear_all(board));
        u32::try_from(removed).unwrap_or(u32::MAX)
    })
    .unwrap_or(0)
}

/// Records a recent search and returns the updated list.
#[flutter_rust_bridge::frb(sync)]
pub fn recent_record(raw_value: String, name: String) -> Vec<RecentPlaceItem> {
    with_state(|state| to_recent_items(state.recents.record(&raw_value, name.trim())))
        .unwrap_or_default()
}

#[flutter_rust_bridge::frb(sync)]
pub fn recent_list() -> Vec<RecentPlaceItem> {
    with_state(|state| to_recent_items(state.recents.list())).unwrap_or_default()
}

/// Removes one recent search. Returns whether it was present.
#[flutter_rust_bridge::frb(sync)]
pub fn recent_remove(raw_value: String) -> bool {
    with_state(|state| state.recents.remove(&raw_value)).unwrap_or(false)
}

/// Clears recent searches. Returns `false` when the core is not configured.
#[flutter_rust_bridge::frb(sync)]
pub fn recent_clear() -> bool {
    with_state(|state| state.recents.clear()).is_ok()
}

/// Place search result fetched by the host from the places API.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultInput {
    /// Provider place id.
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Photo reference usable as an image name.
    pub photo_reference: Option<String>,
}

/// Search candidate shown in the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidateItem {
    /// Candidate id; valid until the next search.
    pub candidate_id: String,
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub image_name: String,
}

/// Replaces the map board's search candidates with host-fetched results.
///
/// # FFI contract
/// - Keeps at most the configured `search_limit` candidates.
/// - Blank queries clear the candidates and return an empty list.
/// - Previous candidate ids stop resolving.
#[flutter_rust_bridge::frb(sync)]
pub fn search_submit(query: String, results: Vec<SearchResultInput>) -> Vec<SearchCandidateItem> {
    with_state(|state| {
        let limit = state.navio.borrow().setting().borrow().search_limit;
        let search = SearchService::new(HostSearchResults { results }, limit);
        with_board(state, |board| search.search(board, &query))
            .into_iter()
            .filter_map(to_candidate_item)
            .collect()
    })
    .unwrap_or_default()
}

/// Opens a search candidate as a map place and records it as a recent search.
///
/// Returns the (possibly existing) place id.
#[flutter_rust_bridge::frb(sync)]
pub fn search_open(candidate_id: String) -> PlaceActionResponse {
    let Some(id) = ObjectId::<SearchPlace>::parse_str(&candidate_id) else {
        return PlaceActionResponse::failure("search_open failed: invalid candidate id");
    };
    with_state(|state| {
        let search = SearchService::new(HostSearchResults::default(), 1);
        match with_board(state, |board| search.open_candidate(board, id, &state.recents)) {
            Some(place_id) => PlaceActionResponse::success(
                "Place opened.",
                place_id.to_string(),
                place_id.with(|place| place.is_liked()),
            ),
            None => PlaceActionResponse::failure("search_open failed: candidate not found"),
        }
    })
    .unwrap_or_else(|message| PlaceActionResponse::failure(format!("search_open failed: {message}")))
}

/// Serves results the host already fetched; the core only applies limits and
/// builds candidates.
#[derive(Default)]
struct HostSearchResults {
    results: Vec<SearchResultInput>,
}

impl PlaceSearchProvider for HostSearchResults {
    fn provider_id(&self) -> &str {
        HOST_PROVIDER_ID
    }

    fn search(&self, _query: &str, limit: usize) -> ProviderResult<Vec<PlaceSummary>> {
        Ok(self
            .results
            .iter()
            .take(limit)
            .map(|result| PlaceSummary {
                coordinate: Coordinate::new(result.latitude, result.longitude),
                address: result.address.clone(),
                phone_number: result.phone_number.clone(),
                ..PlaceSummary::new(result.place_id.clone(), result.name.clone())
            })
            .collect())
    }

    fn photo(&self, place_id: &str) -> ProviderResult<Option<PlacePhoto>> {
        Ok(self
            .results
            .iter()
            .find(|result| result.place_id == place_id)
            .and_then(|result| result.photo_reference.clone())
            .map(|reference| PlacePhoto {
                reference,
                attribution: None,
                bytes: Vec::new(),
            }))
    }
}

fn build_state(config_json: &str) -> Result<AppState, String> {
    let config = CoreConfig::from_json_str(config_json).map_err(|err| err.to_string())?;
    if let Some(log_dir) = &config.log_dir {
        init_logging_inner(&config.log_level, &log_dir.to_string_lossy())
            .map_err(|err| err.to_string())?;
    }

    let store = match &config.db_path {
        Some(path) => SqliteKeyValueStore::open(path),
        None => SqliteKeyValueStore::open_in_memory(),
    }
    .map_err(|err| format!("store open failed: {err}"))?;
    let store = Rc::new(store);

    let setting = Setting::from_config(&config);
    let state = AppState {
        navio: Owned::new(Navio::new(setting.clone())),
        favorites: FavoriteService::new(KvFavoriteRepository::new(Rc::clone(&store)))
            .with_legacy_flags(setting.write_legacy_flags),
        recents: RecentService::new(KvRecentRepository::new(store), setting.recent_limit),
    };
    let restored = with_board(&state, |board| state.favorites.restore(board));
    info!(
        "event=ffi_configure module=ffi status=ok persistent={} favorites={restored}",
        config.db_path.is_some()
    );
    Ok(state)
}

fn with_state<T>(f: impl FnOnce(&AppState) -> T) -> Result<T, String> {
    APP_STATE
        .try_with(|slot| {
            let slot = slot.try_borrow().map_err(|_| "core state is busy".to_string())?;
            let state = slot
                .as_ref()
                .ok_or_else(|| "core is not configured".to_string())?;
            Ok(f(state))
        })
        .map_err(|_| "core state is unavailable".to_string())?
}

fn with_board<T>(state: &AppState, f: impl FnOnce(&mut MapBoard) -> T) -> T {
    let root = state.navio.borrow();
    let mut board = root.map_board().borrow_mut();
    f(&mut board)
}

fn favorite_action(
    action: &str,
    place_id: &str,
    f: impl FnOnce(&AppState, &mut MapBoard, ObjectId<Place>) -> FavoriteOutcome,
) -> PlaceActionResponse {
    let Some(id) = ObjectId::<Place>::parse_str(place_id) else {
        return PlaceActionResponse::failure(format!("{action} failed: invalid place id"));
    };
    with_state(|state| {
        let outcome = with_board(state, |board| f(state, board, id));
        match outcome {
            FavoriteOutcome::Liked => PlaceActionResponse::success("Liked.", id.to_string(), Some(true)),
            FavoriteOutcome::Unliked => {
                PlaceActionResponse::success("Not liked.", id.to_string(), Some(false))
            }
            FavoriteOutcome::AlreadyLoaded => {
                let liked = id.with(|place| place.is_liked());
                PlaceActionResponse::success("Already loaded.", id.to_string(), liked)
            }
            FavoriteOutcome::PlaceNotFound => {
                PlaceActionResponse::failure(format!("{action} failed: place not found"))
            }
        }
    })
    .unwrap_or_else(|message| PlaceActionResponse::failure(format!("{action} failed: {message}")))
}

fn to_candidate_item(id: ObjectId<SearchPlace>) -> Option<SearchCandidateItem> {
    id.with(|candidate| {
        let record = candidate.to_record();
        SearchCandidateItem {
            candidate_id: id.to_string(),
            place_id: candidate.summary().place_id.clone(),
            name: record.name,
            address: record.address,
            image_name: record.image_name,
        }
    })
}

fn to_liked_place_item(record: &PlaceRecord) -> LikedPlaceItem {
    LikedPlaceItem {
        name: record.name.clone(),
        image_name: record.image_name.clone(),
        address: record.address.clone(),
        phone_number: record.phone_number.clone(),
    }
}

fn to_recent_items(places: Vec<RecentPlaceRef>) -> Vec<RecentPlaceItem> {
    places
        .into_iter()
        .map(|place| RecentPlaceItem {
            raw_value: place.raw_value,
            name: place.name,
        })
        .collect()
}
