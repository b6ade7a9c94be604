mod file_config;

pub use file_config::{ChecksConfig, FileConfig};

use crate::catalog::checks::{CheckOptions, CheckedField};
use crate::catalog::{CatalogOptions, DEFAULT_PLATFORM_EXTENSION};
use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub platforms_root: Option<PathBuf>,
    pub platform_extension: Option<String>,
    pub create_root: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub platforms_root: PathBuf,
    pub platform_extension: String,
    pub create_root: bool,

    pub checks: CheckOptions,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let platforms_root = file
            .platforms_root
            .map(PathBuf::from)
            .or_else(|| cli.platforms_root.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "platforms_root must be specified on the command line or in config file"
                )
            })?;

        if platforms_root.exists() && !platforms_root.is_dir() {
            bail!("platforms_root is not a directory: {:?}", platforms_root);
        }

        let create_root = file.create_root.unwrap_or(cli.create_root);
        if !create_root && !platforms_root.exists() {
            bail!("Platforms root does not exist: {:?}", platforms_root);
        }

        let platform_extension = file
            .platform_extension
            .or_else(|| cli.platform_extension.clone())
            .map(|ext| ext.trim_start_matches('.').to_string())
            .unwrap_or_else(|| DEFAULT_PLATFORM_EXTENSION.to_string());
        if platform_extension.is_empty() {
            bail!("platform_extension must not be empty");
        }

        let checks = match file.checks.unwrap_or_default().empty_fields {
            None => CheckOptions::default(),
            Some(names) => {
                let mut empty_fields = Vec::with_capacity(names.len());
                for name in names {
                    match CheckedField::parse(&name) {
                        Some(field) => empty_fields.push(field),
                        None => bail!("Unknown field in checks.empty_fields: {:?}", name),
                    }
                }
                CheckOptions { empty_fields }
            }
        };

        Ok(AppConfig {
            platforms_root,
            platform_extension,
            create_root,
            checks,
        })
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            root: self.platforms_root.clone(),
            extension: self.platform_extension.clone(),
            create_root: self.create_root,
        }
    }
}
