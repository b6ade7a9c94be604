//! Catalog loading functionality

use super::{
    CatalogManager, CatalogOptions, LoadError, ParseError, ParseErrorKind, PlatformFile,
};
use std::collections::HashSet;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Entries of `dir` whose metadata (following symlinks) passes `keep`.
/// Entries that cannot be inspected are reported in `problems`.
async fn list_entries(
    dir: &Path,
    problems: &mut Vec<ParseError>,
    keep: impl Fn(&Path, &Metadata) -> bool,
) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = vec![];
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if keep(&path, &metadata) => paths.push(path),
            Ok(_) => {}
            Err(err) => problems.push(ParseError::new(path, err)),
        }
    }
    paths.sort();
    Ok(paths)
}

/// Sorted sub-directories (libraries) of `root`.
async fn list_libraries(
    root: &Path,
    problems: &mut Vec<ParseError>,
) -> std::io::Result<Vec<(String, PathBuf)>> {
    let dirs = list_entries(root, problems, |_, metadata| metadata.is_dir()).await?;
    Ok(dirs
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            Some((name, path))
        })
        .collect())
}

/// Sorted files in `dir` whose extension matches, ignoring case.
async fn list_platform_files(
    dir: &Path,
    extension: &str,
    problems: &mut Vec<ParseError>,
) -> std::io::Result<Vec<PathBuf>> {
    list_entries(dir, problems, |path, metadata| {
        metadata.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
    })
    .await
}

impl CatalogManager {
    /// Loads every platform file under `options.root`.
    ///
    /// Files that fail to load are returned as errors next to the catalog of
    /// everything that did load. Only an unreadable root fails the call.
    pub async fn load_all(
        options: CatalogOptions,
    ) -> Result<(CatalogManager, Vec<ParseError>), LoadError> {
        let root = options.root.clone();

        let mut problems = vec![];
        let libraries = match list_libraries(&root, &mut problems).await {
            Ok(libraries) => libraries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && options.create_root => {
                info!("Platforms root {} does not exist, creating it.", root.display());
                tokio::fs::create_dir_all(&root)
                    .await
                    .map_err(|source| LoadError::RootUnreadable {
                        path: root.clone(),
                        source,
                    })?;
                vec![]
            }
            Err(source) => return Err(LoadError::RootUnreadable { path: root, source }),
        };

        let mut platforms: Vec<PlatformFile> = vec![];
        let mut loaded_keys = HashSet::new();

        for (library, dir) in libraries {
            let files = match list_platform_files(&dir, &options.extension, &mut problems).await {
                Ok(files) => files,
                Err(err) => {
                    problems.push(ParseError::new(dir, err));
                    continue;
                }
            };
            for path in files {
                match PlatformFile::load(&path, &library).await {
                    // Names differing only in extension case map to one platform.
                    Ok(platform) if !loaded_keys.insert(platform.key().clone()) => {
                        let key = platform.key().clone();
                        problems.push(ParseError::new(
                            path,
                            ParseErrorKind::DuplicatePlatform(key),
                        ));
                    }
                    Ok(platform) => platforms.push(platform),
                    Err(err) => problems.push(err),
                }
            }
        }

        if !problems.is_empty() {
            warn!("Found {} problems:", problems.len());
            for problem in problems.iter() {
                warn!("- {}", problem);
            }
        }

        let manager = CatalogManager::with_platforms(options, platforms);
        info!(
            "Catalog has:\n{} platforms\n{} games",
            manager.platforms().len(),
            manager.record_count()
        );
        Ok((manager, problems))
    }
}
