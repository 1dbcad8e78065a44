//! On2Cook media CLI
//!
//! Local entry point for checking recipe images and CSV exports.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use on2cook_media::{
    error::{AppError, Result},
    models::{Config, ImageRequest, RecipeCatalog},
    pipeline::ImageSlot,
    services::{
        CsvOptions, CsvParser, RecipeResolver, UrlProber, first_success, smart_variants, variants,
    },
    source::HttpImageSource,
    utils::http,
};
use tokio_util::sync::CancellationToken;

/// on2cook-media - Recipe image and CSV toolkit
#[derive(Parser, Debug)]
#[command(
    name = "on2cook-media",
    version,
    about = "Recipe image resolution and CSV ingestion for On2Cook"
)]

struct Cli {
    /// Directory containing config.toml and recipes.toml
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a recipe name to its catalog image locator
    Resolve {
        /// Free-text recipe name
        name: String,
    },

    /// List alternative URLs for an image locator
    Variants {
        locator: String,

        /// Reorder by reliability tier
        #[arg(long)]
        smart: bool,
    },

    /// Probe a locator's variants and report the first reachable one
    Probe { locator: String },

    /// Parse a CSV file or URL
    Csv {
        /// Local path or http(s) URL (default: csv.source_url from config)
        source: Option<String>,

        /// Treat the first row as field names
        #[arg(long)]
        headers: bool,
    },

    /// Run the fallback loader for a recipe and print the outcome
    Load {
        name: String,

        /// Locator stored with the record
        #[arg(long)]
        original: Option<String>,
    },

    /// Validate configuration files
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(cli.data_dir.join("config.toml"));
    let catalog = RecipeCatalog::load_or_default(cli.data_dir.join("recipes.toml"));
    log::debug!(
        "Loaded configuration and {} recipes from {}",
        catalog.len(),
        cli.data_dir.display()
    );

    match cli.command {
        Command::Resolve { name } => {
            let resolver = RecipeResolver::new(&catalog);
            match resolver.resolve_detailed(&name) {
                Some(hit) => {
                    log::info!("{:?} match on {:?}", hit.kind, hit.key);
                    println!("{}", hit.locator);
                }
                None => log::warn!("No catalog image for {:?}", name),
            }
        }

        Command::Variants { locator, smart } => {
            let list = if smart {
                smart_variants(&locator)
            } else {
                variants(&locator)
            };
            for url in list {
                println!("{url}");
            }
        }

        Command::Probe { locator } => {
            let client = http::create_async_client(&config.http)?;
            let prober = UrlProber::new(client, config.probe.clone());
            let list = smart_variants(&locator);

            let results = prober.probe_all(&list).await;
            for result in &results {
                println!("{}", serde_json::to_string(result)?);
            }
            match first_success(&results) {
                Some(url) => log::info!("First working variant: {}", url),
                None => log::warn!("None of the leading variants responded"),
            }
        }

        Command::Csv { source, headers } => {
            let source = source
                .or_else(|| config.csv.source_url.clone())
                .ok_or_else(|| AppError::config("No CSV source given and csv.source_url unset"))?;
            let parser = CsvParser::new(CsvOptions::from(&config.csv));

            let table = if source.starts_with("http://") || source.starts_with("https://") {
                let client = http::create_async_client(&config.http)?;
                parser.fetch(&client, &source).await?
            } else {
                parser.parse(&tokio::fs::read_to_string(&source).await?)
            };

            log::info!("Parsed {} rows from {}", table.len(), source);
            if headers {
                let records = table.into_records();
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&table.rows)?);
            }
        }

        Command::Load { name, original } => {
            let client = http::create_async_client(&config.http)?;
            let source = Arc::new(HttpImageSource::new(client, &cli.data_dir));
            let resolver = Arc::new(RecipeResolver::new(&catalog));

            let mut request = ImageRequest::new(name);
            request.original_locator = original;

            let mut slot = ImageSlot::new(
                resolver,
                Arc::new(config.fallbacks.clone()),
                config.loader.clone(),
                request,
            );
            log::info!(
                "Trying up to {} candidates",
                slot.loader().variants().len()
            );

            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrl_c.cancel();
                }
            });

            let report = slot.load(source, &cancel).await;
            if report.exhausted {
                log::error!("External images failed; showing {}", report.url);
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            if let Err(e) = catalog.validate() {
                log::error!("Recipe catalog validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Recipe catalog OK ({} recipes)", catalog.len());

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
