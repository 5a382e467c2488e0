use anyhow::Result;
use clap::Parser;
use ouilookup::{ingest, Config, HttpSource, IndexStore, LookupResult, Resolver, SourceFormat};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_PATH: &str = "/etc/ouilookup/config.yaml";

/// OUI lookup - resolve MAC addresses to their hardware vendor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Data directory for the index and the downloaded vendor list
    #[arg(short, long)]
    data_dir: Option<String>,

    /// Vendor list format (long-form or short-form)
    #[arg(long)]
    format: Option<SourceFormat>,

    /// Reject addresses that are not exactly 6 hex octets
    #[arg(long)]
    strict: bool,

    /// Print one JSON object per result
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    target: Target,
}

#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
struct Target {
    /// MAC address to look up
    #[arg(short = 'm', long = "mac")]
    mac_address: Option<String>,

    /// File containing one MAC address per line
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Download the vendor list again and add new prefixes to the index
    #[arg(long)]
    update: bool,

    /// Write the effective configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing; stdout is reserved for results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ouilookup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&args);

    if let Some(path) = &args.target.write_config {
        config.to_file(path)?;
        info!("Configuration written to {}", path);
        return Ok(());
    }

    let db_path = config.database_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let store = match IndexStore::open(&db_path).await {
        Ok(store) => {
            info!("Index opened at {}", db_path.display());
            store
        }
        Err(e) => {
            error!("Failed to open index {}: {}", db_path.display(), e);
            return Err(e.into());
        }
    };

    let outcome = run(&args, &config, &store).await;
    store.close().await;

    if let Err(e) = &outcome {
        error!("{:#}", e);
    }
    outcome
}

fn load_config(args: &Args) -> Config {
    // Try the specified path, then the current directory
    let config_path = if std::path::Path::new(&args.config).exists() {
        Some(args.config.clone())
    } else if args.config == DEFAULT_CONFIG_PATH && std::path::Path::new("config.yaml").exists() {
        Some("config.yaml".to_string())
    } else {
        None
    };

    let mut config = match config_path {
        Some(path) => match Config::from_file(&path) {
            Ok(cfg) => {
                info!("Loaded configuration from {}", path);
                cfg
            }
            Err(e) => {
                error!("Failed to load configuration from {}: {}", path, e);
                info!("Using default configuration");
                Config::default()
            }
        },
        None => Config::default(),
    };

    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
        info!("Using data directory: {}", data_dir);
    }
    if let Some(format) = args.format {
        config.source.format = format;
    }
    if args.strict {
        config.lookup.strict = true;
    }

    config
}

async fn run(args: &Args, config: &Config, store: &IndexStore) -> Result<()> {
    let source = HttpSource::new(config.source_url());
    let list_path = config.source_path();
    let format = config.source.format;

    if args.target.update {
        let summary = ingest::refresh(store, &source, &list_path, format, true).await?;
        println!(
            "Processed {} records: {} new, {} already present, {} malformed lines skipped",
            summary.report.processed,
            summary.report.inserted,
            summary.report.ignored(),
            summary.skipped
        );
        return Ok(());
    }

    ingest::ensure_populated(store, &source, &list_path, format).await?;

    let resolver = Resolver::new(store).strict(config.lookup.strict);

    if let Some(file) = &args.target.file {
        for result in resolver.resolve_file(file).await? {
            print_result(&result, args.json)?;
        }
    } else if let Some(mac) = &args.target.mac_address {
        let result = resolver.resolve(mac).await?;
        print_result(&result, args.json)?;
    }

    Ok(())
}

fn print_result(result: &LookupResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(result)?);
        return Ok(());
    }

    match &result.vendor_name {
        Some(vendor) => println!("{:<20} {:<10} {}", result.input, result.queried_prefix, vendor),
        None => println!("{:<20} {:<10} vendor not found", result.input, result.queried_prefix),
    }
    Ok(())
}
