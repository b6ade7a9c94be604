use super::codec::RawFields;
use super::{PlatformFile, PlatformKey, Record, WriteError, WriteErrorKind};
use crate::task_queue::TaskQueue;
use futures::future::{join_all, BoxFuture};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_PLATFORM_EXTENSION: &str = "json";

/// Where the platform files live and how they are named.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub root: PathBuf,
    pub extension: String,
    /// Treat a missing root as an empty catalog instead of an error.
    pub create_root: bool,
}

impl CatalogOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_PLATFORM_EXTENSION.to_string(),
            create_root: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The record was new and was appended to its platform.
    Added,
    /// The record replaced an existing one at the same index.
    Updated { index: usize },
    /// The record left another platform and was appended to its new one.
    Moved { from: PlatformKey },
    /// Placeholders are never stored.
    SkippedPlaceholder,
}

/// Per-platform results of one `save` call.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub saved: Vec<PlatformKey>,
    pub failed: Vec<WriteError>,
}

impl SaveReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn first_error(&self) -> Option<&WriteError> {
        self.failed.first()
    }

    pub fn into_result(self) -> Result<Vec<PlatformKey>, WriteError> {
        match self.failed.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.saved),
        }
    }
}

/// Resolves once every write requested by a `save` call has finished.
pub type SaveBatch = BoxFuture<'static, SaveReport>;

/// The raw entries of one platform, captured when a save is requested.
struct PlatformSnapshot {
    key: PlatformKey,
    path: PathBuf,
    games: Vec<RawFields>,
    sections: RawFields,
}

impl PlatformSnapshot {
    fn of(platform: &PlatformFile) -> Self {
        Self {
            key: platform.key().clone(),
            path: platform.path().to_owned(),
            games: platform.raw().cloned().collect(),
            sections: platform.sections().clone(),
        }
    }

    async fn write(self) -> Result<(), WriteErrorKind> {
        let content = super::platform::serialize_platform(&self.games, &self.sections)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, content).await?;
        debug!(
            "Wrote {} games for platform {} to {}",
            self.games.len(),
            self.key,
            self.path.display()
        );
        Ok(())
    }
}

/// In-memory catalog over a tree of platform files.
///
/// Mutations are synchronous and expect a single owner. Writes to disk go
/// through a [`TaskQueue`], so overlapping `save` calls never interleave.
pub struct CatalogManager {
    options: CatalogOptions,
    platforms: Vec<PlatformFile>,
    save_queue: TaskQueue,
}

impl CatalogManager {
    /// An empty catalog. Must be called from within a tokio runtime.
    pub fn new(options: CatalogOptions) -> Self {
        Self::with_platforms(options, vec![])
    }

    pub(crate) fn with_platforms(options: CatalogOptions, platforms: Vec<PlatformFile>) -> Self {
        Self {
            options,
            platforms,
            save_queue: TaskQueue::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.options.root
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    pub fn platforms(&self) -> &[PlatformFile] {
        &self.platforms
    }

    pub fn platform(&self, key: &PlatformKey) -> Option<&PlatformFile> {
        self.platforms.iter().find(|p| p.key() == key)
    }

    pub fn record(&self, id: &str) -> Option<&Record> {
        self.find(|record| record.id == id)
    }

    pub fn record_count(&self) -> usize {
        self.platforms.iter().map(PlatformFile::len).sum()
    }

    /// Returns the index of the platform for `key`, creating an empty one if
    /// none exists yet.
    fn ensure_platform(&mut self, key: &PlatformKey) -> usize {
        if let Some(index) = self.platforms.iter().position(|p| p.key() == key) {
            return index;
        }
        info!("Creating platform {}", key);
        self.platforms.push(PlatformFile::new(
            &self.options.root,
            key.clone(),
            &self.options.extension,
        ));
        self.platforms.len() - 1
    }

    /// (platform index, entry index) of the record with `id`.
    fn locate(&self, id: &str) -> Option<(usize, usize)> {
        self.platforms
            .iter()
            .enumerate()
            .find_map(|(p, platform)| platform.position(id).map(|i| (p, i)))
    }

    /// Adds, updates or moves `record` depending on where its id is found.
    ///
    /// - id not in the catalog: appended to the end of its platform.
    /// - id in the same platform: replaced in place, index unchanged.
    /// - id in another platform: removed there and appended to the end of
    ///   its new platform.
    pub fn upsert(&mut self, record: Record) -> UpsertOutcome {
        if record.is_placeholder() {
            warn!("Refusing to store placeholder record \"{}\"", record.title);
            return UpsertOutcome::SkippedPlaceholder;
        }
        let target_key = record.key();
        let target = self.ensure_platform(&target_key);

        match self.locate(&record.id) {
            None => {
                debug!("Adding record {} to {}", record.id, target_key);
                self.platforms[target].push(record, RawFields::new());
                UpsertOutcome::Added
            }
            Some((source, index)) if source == target => {
                debug!("Updating record {} in {} at {}", record.id, target_key, index);
                self.platforms[target].touch(index, record);
                UpsertOutcome::Updated { index }
            }
            Some((source, _)) => {
                let from = self.platforms[source].key().clone();
                debug!("Moving record {} from {} to {}", record.id, from, target_key);
                let opaque = self.platforms[source]
                    .take(&record.id)
                    .map(|(_, opaque)| opaque)
                    .unwrap_or_default();
                self.platforms[target].push(record, opaque);
                UpsertOutcome::Moved { from }
            }
        }
    }

    /// Removes the record with `id`. Removing an unknown id does nothing.
    pub fn remove(&mut self, id: &str) -> Option<Record> {
        let (platform, _) = self.locate(id)?;
        let (record, _) = self.platforms[platform].take(id)?;
        debug!("Removed record {} from {}", id, self.platforms[platform].key());
        Some(record)
    }

    /// First record matching `predicate`, in platform order then file order.
    pub fn find<P>(&self, predicate: P) -> Option<&Record>
    where
        P: FnMut(&Record) -> bool,
    {
        find_record(&self.platforms, predicate)
    }

    /// Queues one write per platform in `keys`. The writes happen in call
    /// order relative to every other `save` on this catalog.
    ///
    /// The returned batch reports every platform individually; a key that
    /// names no platform is reported as failed.
    pub fn save<'a>(&self, keys: impl IntoIterator<Item = &'a PlatformKey>) -> SaveBatch {
        let mut report = SaveReport::default();
        let mut pending = vec![];

        for key in keys {
            match self.platform(key) {
                Some(platform) => {
                    let snapshot = PlatformSnapshot::of(platform);
                    let path = snapshot.path.clone();
                    let handle = self.save_queue.enqueue(snapshot.write());
                    pending.push((key.clone(), path, handle));
                }
                None => {
                    warn!("Asked to save unknown platform {}", key);
                    report.failed.push(WriteError {
                        platform: key.clone(),
                        path: super::platform_file_path(
                            &self.options.root,
                            key,
                            &self.options.extension,
                        ),
                        kind: WriteErrorKind::UnknownPlatform,
                    });
                }
            }
        }

        Box::pin(async move {
            let (keys, handles): (Vec<_>, Vec<_>) = pending
                .into_iter()
                .map(|(key, path, handle)| ((key, path), handle))
                .unzip();
            let results = join_all(handles).await;

            for ((platform, path), result) in keys.into_iter().zip(results) {
                match result.map_err(WriteErrorKind::from).and_then(|r| r) {
                    Ok(()) => report.saved.push(platform),
                    Err(kind) => {
                        let err = WriteError {
                            platform,
                            path,
                            kind,
                        };
                        warn!("{}", err);
                        report.failed.push(err);
                    }
                }
            }
            report
        })
    }

    pub fn save_all(&self) -> SaveBatch {
        let keys: Vec<PlatformKey> = self.platforms.iter().map(|p| p.key().clone()).collect();
        self.save(&keys)
    }
}

/// First record in `platforms` matching `predicate`, scanning platforms in
/// order and each platform's records in file order.
pub fn find_record<'a, P>(
    platforms: impl IntoIterator<Item = &'a PlatformFile>,
    mut predicate: P,
) -> Option<&'a Record>
where
    P: FnMut(&Record) -> bool,
{
    platforms
        .into_iter()
        .flat_map(|platform| platform.records())
        .find(|record| predicate(record))
}
