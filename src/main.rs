use anyhow::{bail, Context, Result};
use clap::Parser;
use platform_catalog::catalog::checks::run_checks;
use platform_catalog::catalog::CatalogManager;
use platform_catalog::config::{AppConfig, CliConfig, FileConfig};
use std::path::PathBuf;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the platforms directory, holding one folder per library.
    #[clap(value_parser = parse_path)]
    pub platforms_root: Option<PathBuf>,

    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Extension of platform files, without the dot.
    #[clap(long)]
    pub extension: Option<String>,

    /// Create the platforms directory if it does not exist.
    #[clap(long)]
    pub create_root: bool,

    /// Run health checks over the loaded catalog and print a report.
    #[clap(long)]
    pub check: bool,

    /// Write every loaded platform back to disk.
    #[clap(long)]
    pub resave: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        platforms_root: cli_args.platforms_root,
        platform_extension: cli_args.extension,
        create_root: cli_args.create_root,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Loading platforms from {:?}...", config.platforms_root);
    let (catalog, problems) = CatalogManager::load_all(config.catalog_options()).await?;
    for problem in problems.iter() {
        println!("{}", problem);
    }

    if cli_args.check {
        let records = catalog.platforms().iter().flat_map(|p| p.records());
        let report = run_checks(records, &config.checks);
        println!("{}", report);
    }

    if cli_args.resave {
        info!("Saving {} platforms...", catalog.platforms().len());
        let report = catalog.save_all().await;
        for key in report.saved.iter() {
            info!("Saved {}", key);
        }
        for err in report.failed.iter() {
            error!("{}", err);
        }
        if !report.is_success() {
            bail!("{} platforms could not be saved", report.failed.len());
        }
    }

    Ok(())
}
