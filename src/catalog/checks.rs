//! Health checks over a loaded catalog.
//!
//! None of these are enforced when loading; they report problems that were
//! already present in the platform files.

use super::Record;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

lazy_static! {
    static ref UUID_SHAPE_REGEX: Regex = Regex::new(
        "^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .expect("Invalid uuid regex");
}

/// Record fields that can be checked for emptiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckedField {
    Developer,
    Source,
    Platform,
    PlayMode,
    Status,
    ApplicationPath,
    LaunchCommand,
}

impl CheckedField {
    pub const DEFAULTS: [CheckedField; 7] = [
        CheckedField::Developer,
        CheckedField::Source,
        CheckedField::Platform,
        CheckedField::PlayMode,
        CheckedField::Status,
        CheckedField::ApplicationPath,
        CheckedField::LaunchCommand,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "developer" | "author" => Some(Self::Developer),
            "source" => Some(Self::Source),
            "platform" => Some(Self::Platform),
            "play_mode" | "level_type" => Some(Self::PlayMode),
            "status" => Some(Self::Status),
            "application_path" => Some(Self::ApplicationPath),
            "launch_command" => Some(Self::LaunchCommand),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Source => "source",
            Self::Platform => "platform",
            Self::PlayMode => "play_mode",
            Self::Status => "status",
            Self::ApplicationPath => "application_path",
            Self::LaunchCommand => "launch_command",
        }
    }

    fn is_empty_in(&self, record: &Record) -> bool {
        match self {
            Self::Developer => record.developer.is_empty(),
            Self::Source => record.source.is_empty(),
            Self::Platform => record.platform.is_empty(),
            Self::PlayMode => record.play_mode.is_empty(),
            Self::Status => record.status.is_empty(),
            Self::ApplicationPath => record.application_path.is_empty(),
            Self::LaunchCommand => record.launch_command.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub empty_fields: Vec<CheckedField>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            empty_fields: CheckedField::DEFAULTS.to_vec(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CheckReport {
    pub checked: usize,
    /// id -> how many records share it
    pub duplicate_ids: BTreeMap<String, usize>,
    /// (id, title) of records whose id is not shaped like a UUID
    pub invalid_ids: Vec<(String, String)>,
    /// platform -> upper-cased title -> how many records share it
    pub duplicate_titles: BTreeMap<String, BTreeMap<String, usize>>,
    /// field -> ids of records where it is empty
    pub empty_fields: BTreeMap<CheckedField, Vec<String>>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty()
            && self.invalid_ids.is_empty()
            && self.duplicate_titles.is_empty()
            && self.empty_fields.is_empty()
    }
}

fn duplicates(keys: impl Iterator<Item = String>) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    counts.retain(|_, count| *count > 1);
    counts
}

pub fn run_checks<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    options: &CheckOptions,
) -> CheckReport {
    let records: Vec<&Record> = records.into_iter().collect();
    let mut report = CheckReport {
        checked: records.len(),
        ..Default::default()
    };

    report.duplicate_ids = duplicates(records.iter().map(|r| r.id.clone()));

    report.invalid_ids = records
        .iter()
        .filter(|r| !UUID_SHAPE_REGEX.is_match(&r.id))
        .map(|r| (r.id.clone(), r.title.clone()))
        .collect();

    let mut by_platform: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    for record in &records {
        by_platform.entry(&record.platform).or_default().push(record);
    }
    for (platform, games) in by_platform {
        let dupes = duplicates(games.iter().map(|r| r.title.to_uppercase()));
        if !dupes.is_empty() {
            report.duplicate_titles.insert(platform.to_owned(), dupes);
        }
    }

    for field in &options.empty_fields {
        let ids: Vec<String> = records
            .iter()
            .filter(|r| field.is_empty_in(r))
            .map(|r| r.id.clone())
            .collect();
        if !ids.is_empty() {
            report.empty_fields.insert(*field, ids);
        }
    }

    report
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Checked {} games", self.checked)?;
        writeln!(f)?;
        writeln!(f, "Games with duplicate IDs ({}):", self.duplicate_ids.len())?;
        for (id, count) in &self.duplicate_ids {
            writeln!(f, "  ID: \"{}\" | Games: {}", id, count)?;
        }
        writeln!(f)?;
        writeln!(f, "Games with invalid IDs ({}):", self.invalid_ids.len())?;
        for (id, title) in &self.invalid_ids {
            writeln!(f, "  \"{}\" (ID: {})", title, id)?;
        }
        writeln!(f)?;
        writeln!(f, "Identical titles on the same platform:")?;
        if self.duplicate_titles.is_empty() {
            writeln!(f, "  No duplicates found!")?;
        }
        for (platform, titles) in &self.duplicate_titles {
            writeln!(f, "  Platform: \"{}\" ({})", platform, titles.len())?;
            for (title, count) in titles {
                writeln!(f, "    \"{}\" (Games: {})", title, count)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Empty fields:")?;
        for (field, ids) in &self.empty_fields {
            writeln!(f, "  \"{}\" has {} games with missing values", field.name(), ids.len())?;
        }
        Ok(())
    }
}
