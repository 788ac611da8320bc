// SPDX-FileCopyrightText: 2026 Nodeplug Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! nodeplug - resource plugin registry for a cluster worker node.
//!
//! This is the binary entry point. It loads the layered configuration,
//! activates the configured plugins, and reports what was registered.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use nodeplug_config::NodePlugConfig;
use nodeplug_core::{Context, NodePlugError};
use nodeplug_plugin::{
    ConfiguredResourceTypes, ExtensionCatalog, PluginMap, ResourcePluginRegistry,
    ResourceTypeCatalog,
};

/// nodeplug - resource plugin registry for a cluster worker node.
#[derive(Parser, Debug)]
#[command(name = "nodeplug", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the registry, print the registered plugins, and clean up.
    Check,
    /// Print the effective merged configuration.
    Config,
    /// List the resource-type catalog.
    Catalog,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => nodeplug_config::load_and_validate_path(path),
        None => nodeplug_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            nodeplug_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.node.log_level);

    match cli.command {
        Some(Commands::Check) => {
            if let Err(e) = run_check(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("error: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
        Some(Commands::Catalog) => {
            print!("{}", render_catalog(&ConfiguredResourceTypes::from_config(&config)));
        }
        None => {
            println!("nodeplug: use --help for available commands");
        }
    }
}

/// Vendor device plugins compiled into this binary.
///
/// Vendor crates add themselves here; a stock build ships none, so any
/// `device_framework.device_classes` entry fails with a class load error.
fn linked_extensions() -> ExtensionCatalog {
    ExtensionCatalog::new()
}

async fn run_check(config: NodePlugConfig) -> Result<(), NodePlugError> {
    let catalog = ConfiguredResourceTypes::from_config(&config);
    let registry = ResourcePluginRegistry::new(linked_extensions(), Arc::new(catalog));
    let ctx = Context::new(config);

    registry.initialize(&ctx).await?;
    print!("{}", render_plugins(&registry.name_to_plugins()));
    if let Some(manager) = registry.mapping_manager() {
        println!("device sets: {}", manager.resource_names().await.len());
    }
    registry.cleanup().await
}

fn render_plugins(plugins: &PluginMap) -> String {
    if plugins.is_empty() {
        return "no resource plugins registered\n".to_string();
    }
    let mut out = String::new();
    for (name, plugin) in plugins {
        let _ = writeln!(out, "{name}\t{}", plugin.describe());
    }
    out
}

fn render_catalog(catalog: &dyn ResourceTypeCatalog) -> String {
    let mut out = String::new();
    for info in catalog.resource_types() {
        let units = if info.units.is_empty() { "-" } else { info.units.as_str() };
        let _ = writeln!(
            out,
            "{}\tunits={units}\tmin={}\tmax={}",
            info.name, info.minimum_allocation, info.maximum_allocation
        );
    }
    out
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "nodeplug={log_level},nodeplug_plugin={log_level},nodeplug_config={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
