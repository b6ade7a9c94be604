//! Catalog manager operations against a catalog loaded from disk.

mod common;

use common::*;
use platform_catalog::catalog::{PlatformKey, UpsertOutcome};

#[tokio::test]
async fn test_append_ten_records_in_call_order() {
    let catalog = TestCatalog::create().await;
    let (mut manager, _) = catalog.load().await;
    let key = PlatformKey::new(ARCADE, FLASH);
    let before = ids_of(manager.platform(&key).unwrap().records());

    let mut added = vec![];
    for i in 0..10 {
        let id = format!("new-{i}");
        let outcome = manager.upsert(test_record(&id, ARCADE, FLASH, &format!("New {i}")));
        assert_eq!(outcome, UpsertOutcome::Added);
        assert_mirrored(&manager);
        added.push(id);
    }

    let expected: Vec<String> = before.into_iter().chain(added).collect();
    let flash = manager.platform(&key).unwrap();
    assert_eq!(ids_of(flash.records()), expected);
    let raw_ids: Vec<&str> = flash
        .raw()
        .map(|raw| raw["ID"].as_str().unwrap())
        .collect();
    assert_eq!(raw_ids, expected);
}

#[tokio::test]
async fn test_add_to_unknown_platform_creates_it() {
    let catalog = TestCatalog::create().await;
    let (mut manager, _) = catalog.load().await;

    let outcome = manager.upsert(test_record("unity-1", ARCADE, "Unity", "Cube World"));
    assert_eq!(outcome, UpsertOutcome::Added);

    let unity = manager.platform(&PlatformKey::new(ARCADE, "Unity")).unwrap();
    assert_eq!(unity.path(), catalog.platform_path(ARCADE, "Unity"));
    assert_eq!(ids_of(unity.records()), vec!["unity-1"]);
    assert_eq!(manager.platforms().len(), FIXTURE_PLATFORM_COUNT + 1);
    assert_mirrored(&manager);
    // Nothing is written until saved.
    assert!(!catalog.platform_path(ARCADE, "Unity").exists());
}

#[tokio::test]
async fn test_move_between_platforms_appends_at_end() {
    let catalog = TestCatalog::create().await;
    let (mut manager, _) = catalog.load().await;
    let flash_key = PlatformKey::new(ARCADE, FLASH);
    let html5_key = PlatformKey::new(ARCADE, HTML5);

    let mut record = manager.record(FLASH_GAME_2_ID).unwrap().clone();
    record.platform = HTML5.to_string();
    let outcome = manager.upsert(record);

    assert_eq!(
        outcome,
        UpsertOutcome::Moved {
            from: flash_key.clone()
        }
    );
    assert_eq!(
        ids_of(manager.platform(&flash_key).unwrap().records()),
        vec![FLASH_GAME_1_ID, FLASH_GAME_3_ID]
    );
    assert_eq!(
        ids_of(manager.platform(&html5_key).unwrap().records()),
        vec![HTML5_GAME_1_ID, HTML5_GAME_2_ID, FLASH_GAME_2_ID]
    );
    assert_eq!(manager.record_count(), FIXTURE_GAME_COUNT);
    assert_mirrored(&manager);

    // Moving it back lands at the end again, not at its old index.
    let mut record = manager.record(FLASH_GAME_2_ID).unwrap().clone();
    record.platform = FLASH.to_string();
    manager.upsert(record);
    assert_eq!(
        ids_of(manager.platform(&flash_key).unwrap().records()),
        vec![FLASH_GAME_1_ID, FLASH_GAME_3_ID, FLASH_GAME_2_ID]
    );
}

#[tokio::test]
async fn test_move_between_libraries() {
    let catalog = TestCatalog::create().await;
    let (mut manager, _) = catalog.load().await;

    let mut record = manager.record(SHOCKWAVE_GAME_1_ID).unwrap().clone();
    record.library = ARCADE.to_string();
    record.platform = FLASH.to_string();
    let outcome = manager.upsert(record);

    assert_eq!(
        outcome,
        UpsertOutcome::Moved {
            from: PlatformKey::new(THEATRE, SHOCKWAVE)
        }
    );
    let shockwave = manager.platform(&PlatformKey::new(THEATRE, SHOCKWAVE)).unwrap();
    assert!(shockwave.is_empty());
    assert_eq!(manager.record(SHOCKWAVE_GAME_1_ID).unwrap().library, ARCADE);
    assert_mirrored(&manager);
}

#[tokio::test]
async fn test_update_title_in_place() {
    let catalog = TestCatalog::create().await;
    let (mut manager, _) = catalog.load().await;
    let key = PlatformKey::new(ARCADE, FLASH);
    let before: Vec<_> = manager.platform(&key).unwrap().entries().to_vec();

    let mut record = manager.record(FLASH_GAME_2_ID).unwrap().clone();
    record.set_title("Bravo's Quest: Remastered");
    let outcome = manager.upsert(record);
    assert_eq!(outcome, UpsertOutcome::Updated { index: 1 });

    let flash = manager.platform(&key).unwrap();
    assert_eq!(flash.position(FLASH_GAME_2_ID), Some(1));
    assert_eq!(flash.entries()[0], before[0]);
    assert_eq!(flash.entries()[2], before[2]);
    assert_eq!(
        flash.entries()[1].raw()["Title"],
        "Bravo&#39;s Quest: Remastered"
    );
    assert_eq!(
        flash.get(1).unwrap().order_title(),
        "bravo's quest: remastered"
    );
    assert_mirrored(&manager);
}

#[tokio::test]
async fn test_update_keeps_opaque_keys() {
    let catalog = TestCatalog::create().await;
    let (mut manager, _) = catalog.load().await;

    let mut record = manager.record(FLASH_GAME_3_ID).unwrap().clone();
    record.status = "Partial".to_string();
    manager.upsert(record);

    let flash = manager.platform(&PlatformKey::new(ARCADE, FLASH)).unwrap();
    let raw = flash.entries()[2].raw();
    assert_eq!(raw["Status"], "Partial");
    assert_eq!(raw["Favorite"], true);
}

#[tokio::test]
async fn test_remove_ten_records_out_of_order() {
    let catalog = TestCatalog::empty();
    let mut manager = platform_catalog::CatalogManager::new(catalog.options());
    let key = PlatformKey::new(ARCADE, FLASH);

    let mut expected: Vec<String> = (0..10).map(|i| format!("game-{i}")).collect();
    for id in &expected {
        manager.upsert(test_record(id, ARCADE, FLASH, id));
    }

    for i in 0..10usize {
        let index = (i + 7).pow(3) % expected.len();
        let id = expected.remove(index);

        let removed = manager.remove(&id).unwrap();
        assert_eq!(removed.id, id);

        let flash = manager.platform(&key).unwrap();
        assert_eq!(ids_of(flash.records()), expected);
        assert_mirrored(&manager);
    }

    assert!(manager.platform(&key).unwrap().is_empty());
    assert!(manager.remove("game-0").is_none());
}

#[tokio::test]
async fn test_find() {
    let catalog = TestCatalog::create().await;
    let (manager, _) = catalog.load().await;

    assert!(manager.find(|r| r.title == "Nothing Like This").is_none());

    // Every fixture game is "Playable"; the first one in catalog order wins.
    let first = manager.find(|r| r.status == "Playable").unwrap();
    assert_eq!(first.id, FLASH_GAME_1_ID);

    let html5 = manager.find(|r| r.platform == HTML5).unwrap();
    assert_eq!(html5.id, HTML5_GAME_1_ID);
}

#[tokio::test]
async fn test_placeholder_is_skipped() {
    let catalog = TestCatalog::create().await;
    let (mut manager, _) = catalog.load().await;

    let outcome = manager.upsert(platform_catalog::Record::placeholder(ARCADE, FLASH));
    assert_eq!(outcome, UpsertOutcome::SkippedPlaceholder);
    assert_eq!(manager.record_count(), FIXTURE_GAME_COUNT);
}
