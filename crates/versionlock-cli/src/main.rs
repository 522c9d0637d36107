//! Versionlock - inspect and edit versionlock files
//!
//! Usage:
//!   versionlock list                  # Show locked packages
//!   versionlock check                 # Report invalid entries
//!   versionlock add kernel --condition version '<' 6.9
//!   versionlock remove kernel

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use versionlock_core::prelude::*;

#[derive(Parser)]
#[command(name = "versionlock")]
#[command(about = "Versionlock configuration tool", long_about = None)]
struct Cli {
    /// Path to the versionlock file
    #[arg(
        long,
        short,
        global = true,
        env = "VERSIONLOCK_FILE",
        default_value = "versionlock.toml"
    )]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List locked packages and their conditions
    List {
        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },

    /// Validate every package and condition
    Check {
        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },

    /// Add a package entry
    Add {
        /// Package name
        name: String,

        /// Condition as KEY COMPARATOR VALUE (repeatable)
        #[arg(
            long = "condition",
            short = 'c',
            num_args = 3,
            value_names = ["KEY", "COMPARATOR", "VALUE"]
        )]
        conditions: Vec<String>,
    },

    /// Remove all entries for a package
    #[command(alias = "rm")]
    Remove {
        /// Package name
        name: String,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "versionlock=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { format } => run_list(&cli.file, format),
        Commands::Check { format } => run_check(&cli.file, format),
        Commands::Add { name, conditions } => run_add(&cli.file, name, &conditions),
        Commands::Remove { name } => run_remove(&cli.file, &name),
    }
}

#[derive(Serialize)]
struct PackageView {
    name: String,
    valid: bool,
    errors: Vec<String>,
    conditions: Vec<ConditionView>,
}

#[derive(Serialize)]
struct ConditionView {
    key: String,
    comparator: String,
    value: String,
    valid: bool,
    errors: Vec<String>,
}

impl From<&Package> for PackageView {
    fn from(package: &Package) -> Self {
        Self {
            name: package.name().to_string(),
            valid: package.is_valid(),
            errors: package.errors().to_vec(),
            conditions: package
                .conditions()
                .iter()
                .map(|condition| ConditionView {
                    key: condition.key_str().to_string(),
                    comparator: condition.comparator_str().to_string(),
                    value: condition.value().to_string(),
                    valid: condition.is_valid(),
                    errors: condition.errors().to_vec(),
                })
                .collect(),
        }
    }
}

fn run_list(path: &std::path::Path, format: OutputFormat) -> Result<()> {
    let config = VersionlockConfig::load(path)?;

    match format {
        OutputFormat::Table => print_packages_table(&config),
        OutputFormat::Json => {
            let views: Vec<PackageView> =
                config.packages().iter().map(PackageView::from).collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
    }

    Ok(())
}

fn print_packages_table(config: &VersionlockConfig) {
    if config.packages().is_empty() {
        println!("No versionlock entries in {}", config.path().display());
        return;
    }

    println!("Versionlock: {}", config.path().display());
    println!();
    println!("  {:<30} Conditions", "Package");
    println!("  {}", "-".repeat(60));

    for package in config.packages() {
        let conditions = if package.conditions().is_empty() {
            "-".to_string()
        } else {
            package
                .conditions()
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let name = if package.name().is_empty() {
            "<missing>"
        } else {
            package.name()
        };
        println!("  {:<30} {}", truncate(name, 30), conditions);
    }
}

fn run_check(path: &std::path::Path, format: OutputFormat) -> Result<()> {
    let config = VersionlockConfig::load(path)?;
    let diagnostics = config.diagnostics();

    match format {
        OutputFormat::Table => {
            for diagnostic in &diagnostics {
                let package = if diagnostic.package_name.is_empty() {
                    format!("#{}", diagnostic.package_index + 1)
                } else {
                    diagnostic.package_name.clone()
                };
                match &diagnostic.condition {
                    Some(condition) => println!(
                        "  {}: condition \"{}\": {}",
                        package, condition, diagnostic.message
                    ),
                    None => println!("  {}: {}", package, diagnostic.message),
                }
            }
            if diagnostics.is_empty() {
                println!("{} entries, all OK", config.packages().len());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diagnostics)?),
    }

    if !diagnostics.is_empty() {
        anyhow::bail!(
            "{} problem(s) found in {}",
            diagnostics.len(),
            config.path().display()
        );
    }
    Ok(())
}

fn run_add(path: &std::path::Path, name: String, raw_conditions: &[String]) -> Result<()> {
    let mut config = VersionlockConfig::load(path)?;

    let conditions = raw_conditions
        .chunks(3)
        .map(|triple| match triple {
            [key, comparator, value] => {
                Condition::new(key.as_str(), comparator.as_str(), value.as_str())
            }
            _ => Condition::new("", "", ""),
        })
        .collect();
    let package = Package::new(name).with_conditions(conditions);

    for message in package.errors() {
        tracing::warn!("{}", message);
    }
    for condition in package.conditions() {
        for message in condition.errors() {
            tracing::warn!(condition = %condition, "{}", message);
        }
    }

    let name = package.name().to_string();
    config.add_package(package);
    config.save()?;

    println!("Added versionlock entry for '{}'", name);
    Ok(())
}

fn run_remove(path: &std::path::Path, name: &str) -> Result<()> {
    let mut config = VersionlockConfig::load(path)?;

    let removed = config.remove_packages(name);
    if removed == 0 {
        anyhow::bail!("No versionlock entry for '{}'", name);
    }
    config.save()?;

    println!("Removed {} versionlock entry(ies) for '{}'", removed, name);
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
