use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotsmith_core::installer::{InstallOptions, Installer};
use dotsmith_core::packages::PackageManager;

mod commands;

/// dotsmith - a personal dotfiles installer
#[derive(Parser)]
#[command(name = "dotsmith")]
#[command(about = "Clone and maintain configuration repositories from GitHub")]
#[command(version)]
struct Cli {
    /// Path to the dotsmith manifest
    #[arg(short, long, default_value = "dotsmith.yml")]
    manifest: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone every configured repository
    Install {
        /// Glob over repository names; everything else is left untouched
        #[arg(long)]
        only: Option<String>,
        /// Back up and re-clone destinations that already exist
        #[arg(long)]
        force: bool,
        /// Report what would happen without executing anything
        #[arg(long)]
        dry_run: bool,
        /// Number of clones allowed to run at once
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// List configured repositories and their state
    List,
    /// Install the manifest's package list
    Packages {
        /// Print the package-manager invocation instead of running it
        #[arg(long)]
        plan: bool,
        /// Use a specific package manager instead of detecting one
        #[arg(long)]
        manager: Option<String>,
    },
    /// Generate flags.sh from the manifest's flags file
    Generate,
    /// Download a manifest and cache it locally
    Fetch {
        /// Manifest URL
        url: String,
        /// Re-download even if a cached copy exists
        #[arg(long)]
        refresh: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Execute command (CLI layer only handles presentation)
    match cli.command {
        Commands::Install {
            only,
            force,
            dry_run,
            jobs,
        } => {
            let installer = build_installer(
                &cli.manifest,
                InstallOptions {
                    dry_run,
                    force,
                    jobs,
                    only,
                    manager: None,
                },
            )?;
            commands::install::execute(&installer).await
        }
        Commands::List => {
            let installer = build_installer(&cli.manifest, InstallOptions::default())?;
            commands::list::execute(&installer)
        }
        Commands::Packages { plan, manager } => {
            let manager = match manager.as_deref() {
                Some(name) => Some(PackageManager::from_name(name).ok_or_else(|| {
                    anyhow::anyhow!(
                        "unknown package manager '{}' (expected apt, dnf, pacman, or brew)",
                        name
                    )
                })?),
                None => None,
            };
            let installer = build_installer(
                &cli.manifest,
                InstallOptions {
                    manager,
                    ..InstallOptions::default()
                },
            )?;
            commands::packages::execute(&installer, plan).await
        }
        Commands::Generate => {
            let installer = build_installer(&cli.manifest, InstallOptions::default())?;
            commands::generate::execute(&installer)
        }
        Commands::Fetch { url, refresh } => commands::fetch::execute(&url, refresh).await,
    }
}

fn build_installer(manifest: &Path, options: InstallOptions) -> Result<Installer> {
    Installer::new(manifest, options)
        .map_err(|e| anyhow::anyhow!("Failed to load manifest: {}", e))
}
