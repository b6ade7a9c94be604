//! Conversion between raw platform-file field maps and [`Record`]s.
//!
//! Text fields go through a legacy HTML-entity table. The table is not a
//! bijection: apostrophes are written as `&#39;` while `&apos;` and any
//! numeric reference are accepted on the way in, so `encode(decode(raw))`
//! does not reproduce `raw` in general. Files written by older tools rely on
//! the canonical encoded form, so both directions are kept exactly as they are.

use super::Record;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;

/// One game entry as stored in a platform file, keys in file order.
pub type RawFields = serde_json::Map<String, Value>;

pub const FIELD_ID: &str = "ID";
pub const FIELD_TITLE: &str = "Title";
pub const FIELD_SERIES: &str = "Series";
pub const FIELD_DEVELOPER: &str = "Developer";
pub const FIELD_PLATFORM: &str = "Platform";
pub const FIELD_DATE_ADDED: &str = "DateAdded";
pub const FIELD_RELEASE_DATE: &str = "ReleaseDate";
pub const FIELD_VERSION: &str = "Version";
pub const FIELD_LANGUAGE: &str = "Language";
pub const FIELD_GENRE: &str = "Genre";
pub const FIELD_PLAY_MODE: &str = "PlayMode";
pub const FIELD_STATUS: &str = "Status";
pub const FIELD_NOTES: &str = "Notes";
pub const FIELD_CURATION_NOTES: &str = "CurationNotes";
pub const FIELD_SOURCE: &str = "Source";
pub const FIELD_APPLICATION_PATH: &str = "ApplicationPath";
pub const FIELD_COMMAND_LINE: &str = "CommandLine";
pub const FIELD_ORIGINAL_DESCRIPTION: &str = "OriginalDescription";
pub const FIELD_BROKEN: &str = "Broken";
pub const FIELD_HIDE: &str = "Hide";

/// Every key [`encode`] writes, in the order it writes them.
pub const KNOWN_FIELDS: [&str; 20] = [
    FIELD_ID,
    FIELD_TITLE,
    FIELD_SERIES,
    FIELD_DEVELOPER,
    FIELD_PLATFORM,
    FIELD_DATE_ADDED,
    FIELD_BROKEN,
    FIELD_HIDE,
    FIELD_PLAY_MODE,
    FIELD_STATUS,
    FIELD_NOTES,
    FIELD_GENRE,
    FIELD_SOURCE,
    FIELD_APPLICATION_PATH,
    FIELD_COMMAND_LINE,
    FIELD_RELEASE_DATE,
    FIELD_VERSION,
    FIELD_ORIGINAL_DESCRIPTION,
    FIELD_LANGUAGE,
    FIELD_CURATION_NOTES,
];

/// Named entities accepted when decoding.
const NAMED_ENTITIES: [(&str, char); 12] = [
    ("nbsp", '\u{a0}'),
    ("cent", '¢'),
    ("pound", '£'),
    ("yen", '¥'),
    ("euro", '€'),
    ("copy", '©'),
    ("reg", '®'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("amp", '&'),
    ("apos", '\''),
];

/// Characters replaced when encoding. Apostrophe has no named form here.
const ESCAPED_CHARS: [(char, &str); 11] = [
    ('¢', "&cent;"),
    ('£', "&pound;"),
    ('¥', "&yen;"),
    ('€', "&euro;"),
    ('©', "&copy;"),
    ('®', "&reg;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('&', "&amp;"),
    ('\'', "&#39;"),
];

pub const MULTI_VALUE_SEPARATOR: &str = "; ";

lazy_static! {
    static ref ENTITY_REGEX: Regex = Regex::new("&([^;]+);").expect("Invalid entity regex");
    static ref HEX_REFERENCE_REGEX: Regex =
        Regex::new("^#x([0-9a-fA-F]+)$").expect("Invalid hex reference regex");
    static ref DECIMAL_REFERENCE_REGEX: Regex =
        Regex::new("^#([0-9]+)$").expect("Invalid decimal reference regex");
    static ref MULTI_VALUE_SPLIT_REGEX: Regex =
        Regex::new(r"\s?;\s?").expect("Invalid multi value regex");
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match ESCAPED_CHARS.iter().find(|(escaped, _)| *escaped == c) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

pub fn unescape_html(text: &str) -> String {
    ENTITY_REGEX
        .replace_all(text, |caps: &Captures| {
            let code = &caps[1];
            resolve_entity(code).map_or_else(|| caps[0].to_owned(), String::from)
        })
        .into_owned()
}

fn resolve_entity(code: &str) -> Option<char> {
    if let Some((_, c)) = NAMED_ENTITIES.iter().find(|(name, _)| *name == code) {
        return Some(*c);
    }
    if let Some(caps) = HEX_REFERENCE_REGEX.captures(code) {
        return u32::from_str_radix(&caps[1], 16).ok().and_then(char::from_u32);
    }
    if let Some(caps) = DECIMAL_REFERENCE_REGEX.captures(code) {
        return caps[1].parse::<u32>().ok().and_then(char::from_u32);
    }
    None
}

/// Splits a multi-value field. An empty value holds no items.
pub fn split_field_value(value: &str) -> Vec<String> {
    if value.is_empty() {
        return vec![];
    }
    MULTI_VALUE_SPLIT_REGEX
        .split(value)
        .map(str::to_owned)
        .collect()
}

pub fn join_field_value<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(MULTI_VALUE_SEPARATOR)
}

fn text_of(fields: &RawFields, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => unescape_html(s),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn flag_of(fields: &RawFields, key: &str) -> bool {
    match fields.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            !(s.is_empty() || s.eq_ignore_ascii_case("false") || s == "0")
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Builds a record from a raw entry. `library` comes from the file location.
pub fn decode(fields: &RawFields, library: &str) -> Record {
    let mut record = Record::with_id(text_of(fields, FIELD_ID), library, "");
    record.title = text_of(fields, FIELD_TITLE);
    record.series = text_of(fields, FIELD_SERIES);
    record.developer = text_of(fields, FIELD_DEVELOPER);
    record.platform = text_of(fields, FIELD_PLATFORM);
    record.date_added = text_of(fields, FIELD_DATE_ADDED);
    record.release_date = text_of(fields, FIELD_RELEASE_DATE);
    record.version = text_of(fields, FIELD_VERSION);
    record.language = split_field_value(&text_of(fields, FIELD_LANGUAGE));
    record.tags = split_field_value(&text_of(fields, FIELD_GENRE));
    record.play_mode = split_field_value(&text_of(fields, FIELD_PLAY_MODE));
    record.status = text_of(fields, FIELD_STATUS);
    record.notes = text_of(fields, FIELD_NOTES);
    record.curation_notes = text_of(fields, FIELD_CURATION_NOTES);
    record.source = text_of(fields, FIELD_SOURCE);
    record.application_path = text_of(fields, FIELD_APPLICATION_PATH);
    record.launch_command = text_of(fields, FIELD_COMMAND_LINE);
    record.original_description = text_of(fields, FIELD_ORIGINAL_DESCRIPTION);
    record.broken = flag_of(fields, FIELD_BROKEN);
    record.extreme = flag_of(fields, FIELD_HIDE);
    record
}

/// Builds the raw entry for a record. Derived and transient fields
/// (`order_title`, `library`, `placeholder`) are not written.
pub fn encode(record: &Record) -> RawFields {
    let text = |s: &str| Value::String(escape_html(s));
    let list = |values: &[String]| Value::String(escape_html(&join_field_value(values)));

    let mut fields = RawFields::new();
    fields.insert(FIELD_ID.into(), text(&record.id));
    fields.insert(FIELD_TITLE.into(), text(&record.title));
    fields.insert(FIELD_SERIES.into(), text(&record.series));
    fields.insert(FIELD_DEVELOPER.into(), text(&record.developer));
    fields.insert(FIELD_PLATFORM.into(), text(&record.platform));
    fields.insert(FIELD_DATE_ADDED.into(), text(&record.date_added));
    fields.insert(FIELD_BROKEN.into(), Value::Bool(record.broken));
    fields.insert(FIELD_HIDE.into(), Value::Bool(record.extreme));
    fields.insert(FIELD_PLAY_MODE.into(), list(&record.play_mode));
    fields.insert(FIELD_STATUS.into(), text(&record.status));
    fields.insert(FIELD_NOTES.into(), text(&record.notes));
    fields.insert(FIELD_GENRE.into(), list(&record.tags));
    fields.insert(FIELD_SOURCE.into(), text(&record.source));
    fields.insert(FIELD_APPLICATION_PATH.into(), text(&record.application_path));
    fields.insert(FIELD_COMMAND_LINE.into(), text(&record.launch_command));
    fields.insert(FIELD_RELEASE_DATE.into(), text(&record.release_date));
    fields.insert(FIELD_VERSION.into(), text(&record.version));
    fields.insert(
        FIELD_ORIGINAL_DESCRIPTION.into(),
        text(&record.original_description),
    );
    fields.insert(FIELD_LANGUAGE.into(), list(&record.language));
    fields.insert(FIELD_CURATION_NOTES.into(), text(&record.curation_notes));
    fields
}

/// Keys of `fields` that the codec does not own.
pub fn opaque_fields(fields: &RawFields) -> RawFields {
    fields
        .iter()
        .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Projection of `fields` onto the keys written by [`encode`].
pub fn known_fields(fields: &RawFields) -> RawFields {
    fields
        .iter()
        .filter(|(key, _)| KNOWN_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
