//! Test fixture creation
//!
//! Builds a platforms directory on disk with a known set of games.

#![allow(dead_code)]

use super::constants::*;
use platform_catalog::catalog::codec;
use platform_catalog::catalog::{CatalogManager, CatalogOptions, ParseError, Record};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary platforms directory. Removed when dropped.
pub struct TestCatalog {
    _dir: TempDir,
    pub root: PathBuf,
}

impl TestCatalog {
    /// An empty platforms directory.
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir.path().join("Platforms");
        std::fs::create_dir_all(&root).expect("Failed to create platforms root");
        Self { _dir: dir, root }
    }

    /// A platforms directory holding arcade/Flash (3 games), arcade/HTML5
    /// (2 games) and theatre/Shockwave (1 game).
    pub async fn create() -> Self {
        let catalog = Self::empty();
        let mut favorite = game_entry(FLASH_GAME_3_ID, "Charlie &amp; Co", FLASH);
        favorite["Favorite"] = json!(true);
        catalog
            .write_platform(
                ARCADE,
                FLASH,
                json!({
                    "LaunchBox": {
                        "Game": [
                            game_entry(FLASH_GAME_1_ID, "Alpha Blaster", FLASH),
                            game_entry(FLASH_GAME_2_ID, "Bravo&#39;s Quest", FLASH),
                            favorite
                        ],
                        "AdditionalApplication": [
                            { "GameID": FLASH_GAME_1_ID, "Name": "Manual" }
                        ]
                    }
                }),
            )
            .await;
        catalog
            .write_platform(
                ARCADE,
                HTML5,
                json!({
                    "LaunchBox": {
                        "Game": [
                            game_entry(HTML5_GAME_1_ID, "Delta Run", HTML5),
                            game_entry(HTML5_GAME_2_ID, "Echo Park", HTML5)
                        ]
                    }
                }),
            )
            .await;
        catalog
            .write_platform(
                THEATRE,
                SHOCKWAVE,
                json!({
                    "LaunchBox": {
                        "Game": game_entry(SHOCKWAVE_GAME_1_ID, "Foxtrot", SHOCKWAVE)
                    }
                }),
            )
            .await;
        catalog
    }

    pub fn platform_path(&self, library: &str, platform: &str) -> PathBuf {
        self.root.join(library).join(format!("{}.json", platform))
    }

    pub async fn write_platform(&self, library: &str, platform: &str, document: Value) {
        self.write_raw(library, &format!("{}.json", platform), &document.to_string())
            .await;
    }

    pub async fn write_raw(&self, library: &str, file_name: &str, content: &str) {
        let dir = self.root.join(library);
        tokio::fs::create_dir_all(&dir)
            .await
            .expect("Failed to create library dir");
        tokio::fs::write(dir.join(file_name), content)
            .await
            .expect("Failed to write platform file");
    }

    pub fn options(&self) -> CatalogOptions {
        CatalogOptions::new(&self.root)
    }

    pub async fn load(&self) -> (CatalogManager, Vec<ParseError>) {
        CatalogManager::load_all(self.options())
            .await
            .expect("Failed to load catalog")
    }

    pub async fn read(&self, path: &Path) -> String {
        tokio::fs::read_to_string(path)
            .await
            .expect("Failed to read platform file")
    }
}

/// One raw game entry the way legacy tools write them.
pub fn game_entry(id: &str, title: &str, platform: &str) -> Value {
    json!({
        "ID": id,
        "Title": title,
        "Platform": platform,
        "Developer": "Fixture Studio",
        "PlayMode": "Single Player; Cooperative",
        "Status": "Playable",
        "ApplicationPath": "FPSoftware\\Flash\\flashplayer.exe",
        "CommandLine": format!("http://example.com/{}.swf", id),
        "Broken": "false",
        "Hide": 0
    })
}

pub fn test_record(id: &str, library: &str, platform: &str, title: &str) -> Record {
    let mut record = Record::with_id(id, library, platform);
    record.set_title(title);
    record.developer = "Test Developer".to_string();
    record.tags = vec!["Action".to_string(), "Arcade".to_string()];
    record
}

pub fn ids_of<'a>(records: impl Iterator<Item = &'a Record>) -> Vec<String> {
    records.map(|record| record.id.clone()).collect()
}

/// Every platform's raw entries mirror its records.
pub fn assert_mirrored(manager: &CatalogManager) {
    for platform in manager.platforms() {
        assert_eq!(
            platform.raw().count(),
            platform.records().count(),
            "raw and records differ in length for {}",
            platform.key()
        );
        for entry in platform.entries() {
            assert_eq!(
                codec::known_fields(entry.raw()),
                codec::encode(entry.record()),
                "raw entry out of sync in {}",
                platform.key()
            );
        }
    }
}
