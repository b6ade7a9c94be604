//! One platform file: its on-disk entries and the records decoded from them.
//!
//! A platform file is a JSON document shaped like the legacy LaunchBox
//! platform files once parsed:
//!
//! ```json
//! { "LaunchBox": { "Game": [ { "ID": "...", "Title": "..." } ], "AdditionalApplication": [] } }
//! ```
//!
//! Every key under `LaunchBox` other than `Game` is kept as an opaque section
//! and written back untouched, after the games.

use super::codec::{self, RawFields};
use super::{ParseError, PlatformKey, Record};
use serde_json::Value;
use std::path::{Path, PathBuf};

const ROOT_ELEMENT: &str = "LaunchBox";
const GAME_ELEMENT: &str = "Game";

/// Builds `<root>/<library>/<platform>.<extension>`.
pub fn platform_file_path(root: &Path, key: &PlatformKey, extension: &str) -> PathBuf {
    root.join(&key.library)
        .join(format!("{}.{}", key.platform, extension))
}

/// A record together with the raw entry it is stored as.
///
/// The raw entry always holds `codec::encode(&record)` plus any keys the codec
/// does not own, so the two can never drift apart.
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformEntry {
    raw: RawFields,
    record: Record,
}

impl PlatformEntry {
    fn new(record: Record, opaque: RawFields) -> Self {
        let mut raw = codec::encode(&record);
        raw.extend(opaque);
        Self { raw, record }
    }

    pub fn raw(&self) -> &RawFields {
        &self.raw
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    fn opaque(&self) -> RawFields {
        codec::opaque_fields(&self.raw)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlatformFile {
    path: PathBuf,
    key: PlatformKey,
    entries: Vec<PlatformEntry>,
    sections: RawFields,
}

/// The parsed shape of a platform file, before any decoding.
pub struct ParsedPlatform {
    pub games: Vec<RawFields>,
    pub sections: RawFields,
}

/// Parses file content into its ordered raw entries.
pub fn parse_platform_content(path: &Path, content: &str) -> Result<ParsedPlatform, ParseError> {
    let document: Value =
        serde_json::from_str(content).map_err(|err| ParseError::new(path, err))?;

    let mut root = match document {
        Value::Object(mut object) => match object.remove(ROOT_ELEMENT) {
            Some(Value::Object(root)) => root,
            Some(Value::Null) => RawFields::new(),
            Some(_) => {
                return Err(ParseError::structure(
                    path,
                    format!("\"{ROOT_ELEMENT}\" is not an object"),
                ))
            }
            None => {
                return Err(ParseError::structure(
                    path,
                    format!("missing \"{ROOT_ELEMENT}\" element"),
                ))
            }
        },
        _ => {
            return Err(ParseError::structure(
                path,
                "document root is not an object",
            ))
        }
    };

    // A single game may be stored as a bare object instead of a list.
    let games = match root.remove(GAME_ELEMENT) {
        None | Some(Value::Null) => vec![],
        Some(Value::Object(game)) => vec![game],
        Some(Value::Array(items)) => {
            let mut games = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                match item {
                    Value::Object(game) => games.push(game),
                    _ => {
                        return Err(ParseError::structure(
                            path,
                            format!("\"{GAME_ELEMENT}\" entry #{index} is not an object"),
                        ))
                    }
                }
            }
            games
        }
        Some(_) => {
            return Err(ParseError::structure(
                path,
                format!("\"{GAME_ELEMENT}\" is neither a list nor an object"),
            ))
        }
    };

    Ok(ParsedPlatform {
        games,
        sections: root,
    })
}

/// Structural inverse of [`parse_platform_content`].
pub fn serialize_platform<'a>(
    games: impl IntoIterator<Item = &'a RawFields>,
    sections: &RawFields,
) -> Result<String, serde_json::Error> {
    let mut root = RawFields::new();
    root.insert(
        GAME_ELEMENT.into(),
        Value::Array(games.into_iter().cloned().map(Value::Object).collect()),
    );
    root.extend(sections.iter().map(|(k, v)| (k.clone(), v.clone())));

    let mut document = RawFields::new();
    document.insert(ROOT_ELEMENT.into(), Value::Object(root));
    serde_json::to_string_pretty(&Value::Object(document))
}

impl PlatformFile {
    /// An empty platform file. Nothing is written until it is saved.
    pub fn new(root: &Path, key: PlatformKey, extension: &str) -> Self {
        Self {
            path: platform_file_path(root, &key, extension),
            key,
            entries: vec![],
            sections: RawFields::new(),
        }
    }

    /// Reads and decodes the platform file at `path`. The platform name is
    /// the file stem.
    pub async fn load(path: &Path, library: &str) -> Result<Self, ParseError> {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| ParseError::structure(path, "file has no name"))?;
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| ParseError::new(path, err))?;
        Self::from_content(path, PlatformKey::new(library, name), &content)
    }

    pub fn from_content(path: &Path, key: PlatformKey, content: &str) -> Result<Self, ParseError> {
        let parsed = parse_platform_content(path, content)?;
        let entries = parsed
            .games
            .iter()
            .map(|raw| {
                let mut record = codec::decode(raw, &key.library);
                // Entries without a platform belong to the file they sit in.
                if record.platform.is_empty() {
                    record.platform.clone_from(&key.platform);
                }
                PlatformEntry::new(record, codec::opaque_fields(raw))
            })
            .collect();
        Ok(Self {
            path: path.to_owned(),
            key,
            entries,
            sections: parsed.sections,
        })
    }

    /// The file content for the current raw entries.
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serialize_platform(self.raw(), &self.sections)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &PlatformKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.platform
    }

    pub fn library(&self) -> &str {
        &self.key.library
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PlatformEntry] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.entries.iter().map(PlatformEntry::record)
    }

    pub fn raw(&self) -> impl Iterator<Item = &RawFields> + '_ {
        self.entries.iter().map(PlatformEntry::raw)
    }

    /// Opaque sections stored next to the games.
    pub fn sections(&self) -> &RawFields {
        &self.sections
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.record.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.entries.get(index).map(PlatformEntry::record)
    }

    /// Replaces the record at `index`, keeping its opaque raw keys.
    pub(crate) fn touch(&mut self, index: usize, record: Record) {
        let opaque = self.entries[index].opaque();
        self.entries[index] = PlatformEntry::new(record, opaque);
    }

    pub(crate) fn push(&mut self, record: Record, opaque: RawFields) {
        debug_assert!(
            self.position(&record.id).is_none(),
            "record {} is already in {}",
            record.id,
            self.key
        );
        self.entries.push(PlatformEntry::new(record, opaque));
    }

    /// Removes the record with `id`, returning it with its opaque raw keys.
    /// The remaining entries keep their relative order.
    pub(crate) fn take(&mut self, id: &str) -> Option<(Record, RawFields)> {
        let index = self.position(id)?;
        let entry = self.entries.remove(index);
        let opaque = entry.opaque();
        Some((entry.record, opaque))
    }
}
