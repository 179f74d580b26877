use navio_core::{
    FavoriteOutcome, FavoriteRepository, FavoriteService, FavoriteSnapshot, KeyValueStore,
    KvFavoriteRepository, MapBoard, MemoryKeyValueStore, PlaceRecord, LIKED_ORDER_KEY,
    LIKED_PLACES_KEY,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

type Service = FavoriteService<KvFavoriteRepository<Rc<MemoryKeyValueStore>>>;

fn service() -> (Rc<MemoryKeyValueStore>, Service) {
    let store = Rc::new(MemoryKeyValueStore::new());
    let service = FavoriteService::new(KvFavoriteRepository::new(Rc::clone(&store)));
    (store, service)
}

fn record(name: &str) -> PlaceRecord {
    PlaceRecord::new(name)
        .with_image(format!("{}.jpg", name.to_lowercase()))
        .with_address(format!("{name} street"))
        .with_phone_number("010-0000-0000")
}

fn persisted_map(service: &Service) -> BTreeMap<String, FavoriteSnapshot> {
    service.repo().liked_places().unwrap()
}

fn persisted_order(service: &Service) -> Vec<String> {
    service.repo().liked_order().unwrap()
}

fn assert_projections_agree(service: &Service) {
    let map = persisted_map(service);
    let mut order = persisted_order(service);
    order.sort();
    let keys = map.keys().cloned().collect::<Vec<_>>();
    assert_eq!(order, keys, "order list and favorites map diverged");
}

#[test]
fn toggle_scenario_a_b_a() {
    let (_store, service) = service();
    let mut board = MapBoard::new();
    let a = board.add_place(record("A"));
    let b = board.add_place(record("B"));

    assert_eq!(service.toggle(&mut board, a), FavoriteOutcome::Liked);
    let map = persisted_map(&service);
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["A"]);
    assert_eq!(map["A"].image_name, "a.jpg");
    assert_eq!(map["A"].address, "A street");
    assert_eq!(map["A"].number, "010-0000-0000");
    assert_eq!(persisted_order(&service), vec!["A"]);
    assert_eq!(a.with(|place| place.is_liked()), Some(true));

    assert_eq!(service.toggle(&mut board, b), FavoriteOutcome::Liked);
    assert_eq!(persisted_order(&service), vec!["B", "A"]);
    assert_eq!(board.like_place_names(), vec!["B", "A"]);

    assert_eq!(service.toggle(&mut board, a), FavoriteOutcome::Unliked);
    assert_eq!(
        persisted_map(&service).keys().collect::<Vec<_>>(),
        vec!["B"]
    );
    assert_eq!(persisted_order(&service), vec!["B"]);
    assert_eq!(a.with(|place| place.is_liked()), Some(false));
    assert_eq!(board.like_place_names(), vec!["B"]);
}

#[test]
fn load_of_unknown_place_changes_nothing() {
    let (store, service) = service();
    let mut board = MapBoard::new();
    let c = board.add_place(record("C"));

    assert_eq!(service.load(&mut board, c), FavoriteOutcome::Unliked);

    assert_eq!(c.with(|place| place.is_liked()), Some(false));
    assert!(store.get_raw(LIKED_PLACES_KEY).unwrap().is_none());
    assert!(store.get_raw(LIKED_ORDER_KEY).unwrap().is_none());
    assert!(board.like_place_ids().is_empty());
}

#[test]
fn load_matches_persisted_map_and_repairs_order() {
    let (store, service) = service();
    let mut entries = BTreeMap::new();
    entries.insert("D".to_string(), record("D").snapshot());
    store.put_json(LIKED_PLACES_KEY, &entries).unwrap();
    store
        .put_json(LIKED_ORDER_KEY, &vec!["Ghost".to_string()])
        .unwrap();

    let mut board = MapBoard::new();
    let d = board.add_place(record("D"));

    assert_eq!(service.load(&mut board, d), FavoriteOutcome::Liked);
    assert_eq!(d.with(|place| place.is_liked()), Some(true));
    assert_eq!(board.like_place_names(), vec!["D"]);
    assert_eq!(persisted_order(&service), vec!["D"]);
    assert_projections_agree(&service);
}

#[test]
fn loading_places_one_by_one_follows_persisted_order() {
    let (store, service) = service();
    let mut entries = BTreeMap::new();
    for name in ["A", "B", "C"] {
        entries.insert(name.to_string(), record(name).snapshot());
    }
    store.put_json(LIKED_PLACES_KEY, &entries).unwrap();
    store
        .put_json(LIKED_ORDER_KEY, &vec!["A", "B", "C"])
        .unwrap();

    let mut board = MapBoard::new();
    for name in ["A", "C", "B"] {
        let id = board.add_place(record(name));
        assert_eq!(service.load(&mut board, id), FavoriteOutcome::Liked);
        let mut expected = persisted_order(&service);
        expected.retain(|liked| board.find_like_place(liked).is_some());
        assert_eq!(board.like_place_names(), expected);
    }

    assert_eq!(board.like_place_names(), vec!["A", "B", "C"]);
    assert_eq!(board.like_place_names(), service.liked_names());
}

#[test]
fn load_removes_stale_in_memory_favorite_and_order_entry() {
    let (store, service) = service();
    store
        .put_json(LIKED_ORDER_KEY, &vec!["E".to_string()])
        .unwrap();

    let mut board = MapBoard::new();
    let e = board.add_place(record("E"));
    let other = board.add_place(record("E"));
    service.toggle(&mut board, other);
    store
        .put_json(LIKED_PLACES_KEY, &BTreeMap::<String, FavoriteSnapshot>::new())
        .unwrap();

    assert_eq!(service.load(&mut board, e), FavoriteOutcome::Unliked);
    assert!(board.find_like_place("E").is_none());
    assert!(persisted_order(&service).is_empty());
}

#[test]
fn load_is_guarded_against_repeat_calls() {
    let (store, service) = service();
    let mut board = MapBoard::new();
    let f = board.add_place(record("F"));

    assert_eq!(service.load(&mut board, f), FavoriteOutcome::Unliked);

    let mut entries = BTreeMap::new();
    entries.insert("F".to_string(), record("F").snapshot());
    store.put_json(LIKED_PLACES_KEY, &entries).unwrap();

    assert_eq!(service.load(&mut board, f), FavoriteOutcome::AlreadyLoaded);
    assert_eq!(f.with(|place| place.is_liked()), Some(false));
    assert!(board.like_place_ids().is_empty());
}

#[test]
fn load_never_duplicates_in_memory_favorite() {
    let (_store, service) = service();
    let mut board = MapBoard::new();
    let first = board.add_place(record("G"));
    let second = board.add_place(record("G"));

    service.toggle(&mut board, first);
    service.load(&mut board, second);

    assert_eq!(board.like_place_names(), vec!["G"]);
    assert_eq!(second.with(|place| place.is_liked()), Some(true));
}

#[test]
fn toggling_twice_restores_all_projections() {
    let (store, service) = service();
    let mut board = MapBoard::new();
    let keep = board.add_place(record("Keep"));
    service.toggle(&mut board, keep);

    let h = board.add_place(record("H"));
    let map_before = persisted_map(&service);
    let order_before = persisted_order(&service);
    let keys_before = store.keys().unwrap();
    let like_names_before = board.like_place_names();

    service.toggle(&mut board, h);
    service.toggle(&mut board, h);

    assert_eq!(persisted_map(&service), map_before);
    assert_eq!(persisted_order(&service), order_before);
    assert_eq!(store.keys().unwrap(), keys_before);
    assert_eq!(board.like_place_names(), like_names_before);
    assert_eq!(h.with(|place| place.is_liked()), Some(false));
}

#[test]
fn relike_moves_name_to_front_without_touching_other_entries() {
    let (_store, service) = service();
    let mut board = MapBoard::new();
    for name in ["A", "B", "C"] {
        let id = board.add_place(record(name));
        service.toggle(&mut board, id);
    }
    assert_eq!(persisted_order(&service), vec!["C", "B", "A"]);
    let map_before = persisted_map(&service);

    // A second live object for "A" that has not seen the stored like yet.
    let again = board.add_place(record("A").with_address("moved"));
    assert_eq!(service.toggle(&mut board, again), FavoriteOutcome::Liked);

    assert_eq!(persisted_order(&service), vec!["A", "C", "B"]);
    let map_after = persisted_map(&service);
    assert_eq!(map_after.len(), 3);
    assert_eq!(map_after["A"].address, "moved");
    assert_eq!(map_after["B"], map_before["B"]);
    assert_eq!(map_after["C"], map_before["C"]);
    assert_eq!(board.like_place_names(), vec!["A", "C", "B"]);
}

#[test]
fn projections_stay_consistent_over_toggle_sequences() {
    let (_store, service) = service();
    let mut board = MapBoard::new();
    let ids = ["A", "B", "C", "D"]
        .iter()
        .map(|name| board.add_place(record(name)))
        .collect::<Vec<_>>();

    for step in [0, 1, 2, 1, 3, 0, 0, 2, 3, 1] {
        service.toggle(&mut board, ids[step]);
        assert_projections_agree(&service);
        let mut in_memory = board.like_place_names();
        in_memory.sort();
        let keys = persisted_map(&service).keys().cloned().collect::<Vec<_>>();
        assert_eq!(in_memory, keys);
    }
}

#[test]
fn legacy_flag_follows_like_state() {
    let (_store, service) = service();
    let mut board = MapBoard::new();
    let i = board.add_place(record("I"));

    service.toggle(&mut board, i);
    assert_eq!(service.repo().legacy_flag("I").unwrap(), Some(true));
    service.toggle(&mut board, i);
    assert_eq!(service.repo().legacy_flag("I").unwrap(), None);
}

#[test]
fn legacy_flag_writes_can_be_disabled() {
    let store = Rc::new(MemoryKeyValueStore::new());
    let service = FavoriteService::new(KvFavoriteRepository::new(Rc::clone(&store)))
        .with_legacy_flags(false);
    let mut board = MapBoard::new();
    let j = board.add_place(record("J"));

    service.toggle(&mut board, j);
    assert_eq!(service.repo().legacy_flag("J").unwrap(), None);
    assert!(service.is_liked("J"));
}

#[test]
fn toggle_notifies_observers() {
    let (_store, service) = service();
    let mut board = MapBoard::new();
    let k = board.add_place(record("K"));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    k.with_mut(|place| {
        place.subscribe_liked(move |liked| {
            // Listeners may resolve the place they observe.
            let resolved = k.with(|place| place.is_liked());
            sink.borrow_mut().push((*liked, resolved));
        })
    })
    .unwrap();

    service.toggle(&mut board, k);
    service.toggle(&mut board, k);

    assert_eq!(
        *seen.borrow(),
        vec![(true, Some(true)), (false, Some(false))]
    );
}

#[test]
fn operations_on_deleted_place_report_not_found() {
    let (store, service) = service();
    let mut board = MapBoard::new();
    let gone = board.add_place(record("Gone"));
    board.remove_place(gone);

    assert_eq!(service.toggle(&mut board, gone), FavoriteOutcome::PlaceNotFound);
    assert_eq!(service.load(&mut board, gone), FavoriteOutcome::PlaceNotFound);
    assert!(store.is_empty());
}

#[test]
fn unreadable_map_is_treated_as_empty() {
    let (store, service) = service();
    store.insert_raw(LIKED_PLACES_KEY, "{broken");
    store.insert_raw(LIKED_ORDER_KEY, r#"["L"]"#);

    let mut board = MapBoard::new();
    let l = board.add_place(record("L"));
    assert_eq!(service.load(&mut board, l), FavoriteOutcome::Unliked);
    assert_eq!(l.with(|place| place.is_liked()), Some(false));
    // Order is left alone while the map cannot be read.
    assert_eq!(store.get_raw(LIKED_ORDER_KEY).unwrap().as_deref(), Some(r#"["L"]"#));

    assert_eq!(service.toggle(&mut board, l), FavoriteOutcome::Liked);
    assert_eq!(persisted_order(&service), vec!["L"]);
    assert_projections_agree(&service);
}

#[test]
fn restore_rebuilds_liked_list_in_display_order() {
    let (store, service) = service();
    let mut entries = BTreeMap::new();
    for name in ["A", "B", "C"] {
        entries.insert(name.to_string(), record(name).snapshot());
    }
    store.put_json(LIKED_PLACES_KEY, &entries).unwrap();
    store
        .put_json(LIKED_ORDER_KEY, &vec!["B".to_string(), "A".to_string()])
        .unwrap();

    let mut board = MapBoard::new();
    let b = board.add_place(record("B"));
    let z = board.add_place(record("Z"));

    assert_eq!(service.restore(&mut board), 3);
    assert_eq!(board.like_place_names(), vec!["C", "B", "A"]);
    assert_eq!(persisted_order(&service), vec!["C", "B", "A"]);
    assert_eq!(b.with(|place| place.is_liked()), Some(true));
    assert_eq!(z.with(|place| place.is_liked()), Some(false));
    assert_eq!(service.load(&mut board, b), FavoriteOutcome::AlreadyLoaded);

    let restored_c = board.find_like_place("C").unwrap();
    assert_eq!(
        restored_c
            .with(|like| like.record().image_name.clone())
            .as_deref(),
        Some("c.jpg")
    );
}

#[test]
fn repair_and_liked_names_fix_drift() {
    let (store, service) = service();
    let mut entries = BTreeMap::new();
    entries.insert("A".to_string(), FavoriteSnapshot::default());
    store.put_json(LIKED_PLACES_KEY, &entries).unwrap();
    store
        .put_json(
            LIKED_ORDER_KEY,
            &vec!["X".to_string(), "A".to_string(), "A".to_string()],
        )
        .unwrap();

    assert_eq!(service.liked_names(), vec!["A"]);
    assert!(service.repair());
    assert!(!service.repair());
    assert_eq!(persisted_order(&service), vec!["A"]);
}

#[test]
fn clear_all_removes_every_projection() {
    let (store, service) = service();
    let mut board = MapBoard::new();
    let a = board.add_place(record("A"));
    let b = board.add_place(record("B"));
    service.toggle(&mut board, a);
    service.toggle(&mut board, b);

    assert_eq!(service.clear_all(&mut board), 2);

    assert!(persisted_map(&service).is_empty());
    assert!(persisted_order(&service).is_empty());
    assert!(board.like_place_ids().is_empty());
    assert_eq!(a.with(|place| place.is_liked()), Some(false));
    assert!(store.get_raw("A.isLiked").unwrap().is_none());
}
