//! Command dispatch for the `lazyprops` binary.
//!
//! - `run()`: parses arguments, installs logging and dispatches
//! - `handle_*()`: per-command handlers that call the library and print
//! - `Document`: the scratch host `merge` writes collections to

use super::render::{render_collection, render_config};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use lazyprops::config::{PropsConfig, CONFIG_FILENAME};
use lazyprops::error::{PropsError, Result};
use lazyprops::model::{ConfigFactory, ConfigModel, ModelKind};
use lazyprops::schema::SchemaBuilder;
use lazyprops::storage::{Slots, Storage};
use lazyprops::{CollectionAttribute, Field};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_ENV: &str = "LAZYPROPS_LOG";

/// Scratch host for a single merged collection.
#[derive(Default)]
struct Document {
    slots: Slots,
}

impl Storage for Document {
    fn slots(&self) -> Option<&Slots> {
        Some(&self.slots)
    }
}

struct AppContext {
    config_dir: PathBuf,
    config: PropsConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Merge { file, kind } => handle_merge(&ctx, &file, kind),
        Commands::Config { key, value } => handle_config(ctx, key, value),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => default_config_dir(),
    };
    let config = PropsConfig::load(&config_dir)?;
    tracing::debug!(dir = %config_dir.display(), "loaded configuration");
    Ok(AppContext { config_dir, config })
}

fn default_config_dir() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if cwd.join(CONFIG_FILENAME).exists() {
        return cwd;
    }
    ProjectDirs::from("com", "lazyprops", "lazyprops")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or(cwd)
}

fn entries_attribute(
    config: &PropsConfig,
    kind: String,
) -> Result<CollectionAttribute<Document, ConfigModel>> {
    let factory = ConfigFactory::for_config(config, ModelKind::new(kind));
    let mut schema = SchemaBuilder::new("Document").with_config(config.clone());
    schema.collection("entries", factory, Field::default_value())
}

fn handle_merge(ctx: &AppContext, file: &Path, kind: String) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let entries = entries_attribute(&ctx.config, kind)?;
    let document = Document::default();
    entries.write_json(&document, value)?;

    let merged = entries
        .read(&document)?
        .into_option()
        .unwrap_or_default();
    println!("{}", render_collection(&merged)?);
    Ok(())
}

fn handle_config(mut ctx: AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key, value) {
        (None, _) => print!("{}", render_config(&ctx.config)),
        (Some(key), None) => {
            let value = ctx
                .config
                .get(&key)
                .ok_or_else(|| PropsError::Config(format!("Unknown config key: {}", key)))?;
            println!("{}", value);
        }
        (Some(key), Some(value)) => {
            ctx.config.set(&key, &value)?;
            ctx.config.save(&ctx.config_dir)?;
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}
