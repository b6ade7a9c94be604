//! Curation meta: the loose, human-edited field map that ships with a new
//! curation, and the conversion between it and [`Record`].
//!
//! Input is an already parsed document (any serde data format will do, it is
//! consumed as a [`serde_json::Value`]). Keys are matched case-insensitively.

use crate::catalog::codec::{join_field_value, split_field_value, MULTI_VALUE_SEPARATOR};
use crate::catalog::Record;
use serde_json::{Map, Value};
use tracing::debug;

/// Library used when a curation does not name one.
pub const DEFAULT_LIBRARY: &str = "arcade";

/// Fields read from a curation meta document. `None` means the document did
/// not set the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurationMeta {
    pub title: Option<String>,
    pub library: Option<String>,
    pub series: Option<String>,
    pub developer: Option<String>,
    pub play_mode: Option<String>,
    pub release_date: Option<String>,
    pub version: Option<String>,
    pub language: Option<String>,
    pub extreme: Option<bool>,
    pub tags: Option<String>,
    pub source: Option<String>,
    pub platform: Option<String>,
    pub status: Option<String>,
    pub application_path: Option<String>,
    pub launch_command: Option<String>,
    pub notes: Option<String>,
    pub original_description: Option<String>,
    pub curation_notes: Option<String>,
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Like [`text`], but lists become `"; "` separated values.
fn list_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(text)
            .collect::<Vec<_>>()
            .join(MULTI_VALUE_SEPARATOR),
        other => text(other),
    }
}

/// Reads a curation meta document. Anything that is not a map yields an
/// empty meta.
pub fn parse_curation_meta(document: &Value) -> CurationMeta {
    let mut meta = CurationMeta::default();
    let Value::Object(fields) = document else {
        debug!("Curation meta is not a map, ignoring it");
        return meta;
    };

    let lower: Map<String, Value> = fields
        .iter()
        .filter(|(_, value)| is_set(value))
        .map(|(key, value)| (key.to_lowercase(), value.clone()))
        .collect();

    debug!("Reading curation meta with {} set keys", lower.len());

    // Later keys win, so aliases read after a name override it.
    let get = |key: &str| lower.get(key);

    if let Some(v) = get("author notes") {
        meta.curation_notes = Some(text(v));
    }
    if let Some(v) = get("notes") {
        meta.notes = Some(text(v));
    }
    if let Some(v) = get("application path") {
        meta.application_path = Some(text(v));
    }
    if let Some(v) = get("curation notes") {
        meta.curation_notes = Some(text(v));
    }
    if let Some(v) = get("author") {
        meta.developer = Some(list_text(v));
    }
    if let Some(v) = get("developer") {
        meta.developer = Some(list_text(v));
    }
    if let Some(v) = get("extreme") {
        meta.extreme = Some(text(v).eq_ignore_ascii_case("yes"));
    }
    if let Some(v) = get("game notes") {
        meta.notes = Some(text(v));
    }
    if let Some(v) = get("languages") {
        meta.language = Some(list_text(v));
    }
    if let Some(v) = get("launch command") {
        meta.launch_command = Some(text(v));
    }
    if let Some(v) = get("description") {
        meta.original_description = Some(text(v));
    }
    if let Some(v) = get("original description") {
        meta.original_description = Some(text(v));
    }
    if let Some(v) = get("play mode") {
        meta.play_mode = Some(list_text(v));
    }
    if let Some(v) = get("level type") {
        meta.play_mode = Some(list_text(v));
    }
    if let Some(v) = get("platform") {
        meta.platform = Some(text(v));
    }
    if let Some(v) = get("release date") {
        meta.release_date = Some(text(v));
    }
    if let Some(v) = get("series") {
        meta.series = Some(text(v));
    }
    if let Some(v) = get("source") {
        meta.source = Some(text(v));
    }
    if let Some(v) = get("status") {
        meta.status = Some(text(v));
    }
    if let Some(v) = get("title") {
        meta.title = Some(text(v));
    }
    if let Some(v) = get("version") {
        meta.version = Some(text(v));
    }
    if let Some(v) = get("revision") {
        meta.version = Some(text(v));
    }
    // Libraries are folder names and always lower case.
    if let Some(v) = get("library") {
        meta.library = Some(text(v).to_lowercase());
    }
    for key in ["genre", "genres", "tags"] {
        if let Some(v) = get(key) {
            meta.tags = Some(list_text(v));
        }
    }
    if let Some(v) = get("animation notes") {
        meta.notes = Some(text(v));
    }

    meta
}

impl CurationMeta {
    /// A new record for this curation, with a fresh id and `date_added`.
    pub fn into_record(self) -> Record {
        let library = self.library.as_deref().unwrap_or(DEFAULT_LIBRARY);
        let platform = self.platform.as_deref().unwrap_or_default();
        let title = self.title.as_deref().unwrap_or_default();
        let mut record = Record::new(library, platform, title);
        self.apply_to(&mut record);
        record
    }

    /// Overwrites the fields of `record` that this meta sets.
    pub fn apply_to(&self, record: &mut Record) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
        fn set_list(target: &mut Vec<String>, value: &Option<String>) {
            if let Some(value) = value {
                *target = split_field_value(value);
            }
        }

        if let Some(title) = &self.title {
            record.set_title(title);
        }
        set(&mut record.library, &self.library);
        set(&mut record.series, &self.series);
        set(&mut record.developer, &self.developer);
        set_list(&mut record.play_mode, &self.play_mode);
        set(&mut record.release_date, &self.release_date);
        set(&mut record.version, &self.version);
        set_list(&mut record.language, &self.language);
        if let Some(extreme) = self.extreme {
            record.extreme = extreme;
        }
        set_list(&mut record.tags, &self.tags);
        set(&mut record.source, &self.source);
        set(&mut record.platform, &self.platform);
        set(&mut record.status, &self.status);
        set(&mut record.application_path, &self.application_path);
        set(&mut record.launch_command, &self.launch_command);
        set(&mut record.notes, &self.notes);
        set(&mut record.original_description, &self.original_description);
        set(&mut record.curation_notes, &self.curation_notes);
    }
}

/// The curation meta field map for `record`, in the order curation tools
/// write it.
pub fn curation_meta_from_record(record: &Record) -> Map<String, Value> {
    let entries: [(&str, String); 18] = [
        ("Title", record.title.clone()),
        ("Library", record.library.clone()),
        ("Series", record.series.clone()),
        ("Developer", record.developer.clone()),
        ("Level Type", join_field_value(&record.play_mode)),
        ("Release Date", record.release_date.clone()),
        ("Version", record.version.clone()),
        ("Languages", join_field_value(&record.language)),
        ("Extreme", if record.extreme { "Yes" } else { "No" }.to_string()),
        ("Tags", join_field_value(&record.tags)),
        ("Source", record.source.clone()),
        ("Platform", record.platform.clone()),
        ("Status", record.status.clone()),
        ("Application Path", record.application_path.clone()),
        ("Launch Command", record.launch_command.clone()),
        ("Game Notes", record.notes.clone()),
        ("Original Description", record.original_description.clone()),
        ("Curation Notes", record.curation_notes.clone()),
    ];
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), Value::String(value)))
        .collect()
}
