use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one platform file: the library folder and the platform name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformKey {
    pub library: String,
    pub platform: String,
}

impl PlatformKey {
    pub fn new(library: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            platform: platform.into(),
        }
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.library, self.platform)
    }
}

/// A single catalog entry.
///
/// `order_title` is derived from `title` on every call. `placeholder` records
/// exist for presentation purposes only and are never written to disk or
/// deserialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub series: String,
    pub developer: String,
    pub platform: String,
    pub library: String,
    pub date_added: String,
    pub release_date: String,
    pub version: String,
    pub language: Vec<String>,
    pub tags: Vec<String>,
    pub play_mode: Vec<String>,
    pub status: String,
    pub notes: String,
    pub curation_notes: String,
    pub source: String,
    pub application_path: String,
    pub launch_command: String,
    pub original_description: String,
    pub broken: bool,
    pub extreme: bool,
    #[serde(skip)]
    placeholder: bool,
}

impl Record {
    /// Creates a fresh record with a random id, stamped with the current time.
    pub fn new(library: &str, platform: &str, title: &str) -> Self {
        let mut record = Self::with_id(uuid::Uuid::new_v4().to_string(), library, platform);
        record.date_added = Utc::now().to_rfc3339();
        record.set_title(title);
        record
    }

    /// Creates an empty record with the given id. Every text field is empty.
    pub fn with_id(id: impl Into<String>, library: &str, platform: &str) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            series: String::new(),
            developer: String::new(),
            platform: platform.to_owned(),
            library: library.to_owned(),
            date_added: String::new(),
            release_date: String::new(),
            version: String::new(),
            language: vec![],
            tags: vec![],
            play_mode: vec![],
            status: String::new(),
            notes: String::new(),
            curation_notes: String::new(),
            source: String::new(),
            application_path: String::new(),
            launch_command: String::new(),
            original_description: String::new(),
            broken: false,
            extreme: false,
            placeholder: false,
        }
    }

    /// A transient record used to fill a view. It can never be stored.
    pub fn placeholder(library: &str, platform: &str) -> Self {
        let mut record = Self::with_id(String::new(), library, platform);
        record.placeholder = true;
        record
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }

    /// Sort key for the title.
    pub fn order_title(&self) -> String {
        self.title.to_lowercase()
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn key(&self) -> PlatformKey {
        PlatformKey::new(self.library.clone(), self.platform.clone())
    }
}
