//! padmap - inspect and serve gamepad mapping tables

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use padmap::paths::ConfigLocation;
use padmap::{
    ButtonId, CatalogWatcher, DeviceIdentity, EngineConfig, MappingCatalog, MappingCategory, SharedCatalog,
    TriggerId,
};

/// padmap - per-device gamepad mapping tables
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every mapping file and print a summary per device
    Check,

    /// Resolve a raw code for one device
    Resolve {
        /// Vendor ID (hexadecimal)
        vendor: String,
        /// Product ID (hexadecimal)
        product: String,
        /// button, trigger, dpad or stick
        category: MappingCategory,
        /// Raw button number or axis index
        code: u32,
    },

    /// Print the labels of one device, with default fallbacks
    Labels {
        /// Vendor ID (hexadecimal)
        vendor: String,
        /// Product ID (hexadecimal)
        product: String,
    },

    /// Keep reloading the mapping resources until Ctrl+C
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    let config = load_config(args.config.as_deref()).await?;

    match args.command {
        Command::Check => {
            let catalog = MappingCatalog::load(&config.sources)?;
            print_summary(&catalog);
        },
        Command::Resolve {
            vendor,
            product,
            category,
            code,
        } => {
            let catalog = MappingCatalog::load(&config.sources)?;
            let device = parse_device(&vendor, &product)?;
            match catalog.resolve(device, category, code) {
                Some(name) => println!("{} {} {} -> {}", device, category, code, name.green()),
                None => println!("{} {} {} -> {}", device, category, code, "unmapped".yellow()),
            }
        },
        Command::Labels { vendor, product } => {
            let catalog = MappingCatalog::load(&config.sources)?;
            let device = parse_device(&vendor, &product)?;
            print_labels(&catalog, device);
        },
        Command::Watch => run_watch(&config).await?,
    }

    Ok(())
}

async fn load_config(explicit: Option<&std::path::Path>) -> Result<EngineConfig> {
    match ConfigLocation::detect(explicit) {
        Some(location) => {
            info!("Configuration file: {} ({:?})", location.path.display(), location.origin);
            EngineConfig::load(&location.path).await
        },
        None => {
            info!("No configuration file found, using built-in mappings");
            Ok(EngineConfig::default())
        },
    }
}

fn parse_device(vendor: &str, product: &str) -> Result<DeviceIdentity> {
    DeviceIdentity::from_hex(Some(vendor), Some(product)).context("Invalid device identifiers")
}

async fn run_watch(config: &EngineConfig) -> Result<()> {
    let shared = SharedCatalog::new(MappingCatalog::load(&config.sources)?);
    print_summary(&shared.snapshot());

    let mut watcher = CatalogWatcher::new(config, shared.clone())?;
    info!("Watching mapping resources (Ctrl+C to stop)");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            update = watcher.next_catalog() => match update {
                Some(catalog) => print_summary(&catalog),
                None => break,
            },
        }
    }

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

fn print_summary(catalog: &MappingCatalog) {
    println!("\n{}", "=== Mapping Catalog ===".bold().cyan());
    println!("  Devices: {}", catalog.len().to_string().green());
    println!("  Default labels: {}", catalog.defaults().len().to_string().green());

    for device in catalog.devices() {
        let Some(tables) = catalog.tables(device) else {
            continue;
        };
        let view = catalog.device(device);
        let sticks = view.stick_count().unwrap_or_default();
        let triggers = view.trigger_count().unwrap_or_default();

        println!("\n  {}:", device.to_string().bright_white());
        println!(
            "    buttons: {}  triggers: {}  d-pad axes: {}  sticks: {}",
            tables.buttons.len().to_string().green(),
            triggers.to_string().green(),
            tables.dpad_axes.len().to_string().green(),
            sticks.to_string().green()
        );
        println!(
            "    labels: {}  label keys: {}",
            (tables.button_labels.len() + tables.trigger_labels.len()).to_string().green(),
            (tables.button_label_keys.len() + tables.trigger_label_keys.len()).to_string().green()
        );
    }
}

fn print_labels(catalog: &MappingCatalog, device: DeviceIdentity) {
    let view = catalog.device(device);
    if !view.is_known() {
        println!("{} {}", device, "has no mapping tables".yellow());
    }

    println!("\n{}", format!("=== Labels for {} ===", device).bold().cyan());
    for id in ButtonId::ALL {
        print_label_row(id.name(), view.button_label(*id), catalog.default_button_label(*id), view.button_label_key(*id));
    }
    for id in TriggerId::ALL {
        print_label_row(id.name(), view.trigger_label(*id), catalog.default_trigger_label(*id), view.trigger_label_key(*id));
    }
}

fn print_label_row(name: &str, label: Option<&str>, default: Option<&str>, key: Option<&str>) {
    let text = match (label, default) {
        (Some(label), _) => label.green().to_string(),
        (None, Some(default)) => format!("{} (default)", default).dimmed().to_string(),
        (None, None) => "-".dimmed().to_string(),
    };
    let key = key.map(|k| k.cyan().to_string()).unwrap_or_default();
    println!("  {:<14} {:<24} {}", name, text, key);
}
