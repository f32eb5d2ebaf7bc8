//! dotsmith core library
//!
//! This is the core library for the dotsmith dotfiles installer. It provides
//! the logic for cloning configuration repositories, installing packages,
//! backing up existing configs, and generating flag-driven config snippets.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`installer`] - High-level installer interface
//! - [`execution`] - Bounded-concurrency task runner and command capability
//! - [`configs`] - Manifest and flags-file parsing
//! - [`tasks`] - Turns manifest entries into runner tasks
//! - [`github`] - Clone-URL construction
//! - [`backup`] - Timestamped backups of pre-existing directories
//! - [`packages`] - Package-manager detection and install commands
//! - [`remote`] - Remote manifest fetching and caching
//! - [`results`] - Result types for installer operations
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! The primary entry point is the [`Installer`], which provides a high-level
//! interface over a loaded manifest:
//!
//! ```rust,no_run
//! use dotsmith_core::installer::{InstallOptions, Installer};
//! use std::path::Path;
//!
//! # async fn example() -> dotsmith_core::types::DotsmithResult<()> {
//! let installer = Installer::new(Path::new("dotsmith.yml"), InstallOptions::default())?;
//! let report = installer.install().await?;
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod configs;
pub mod execution;
pub mod github;
pub mod installer;
pub mod packages;
pub mod remote;
pub mod results;
pub mod tasks;
pub mod types;

// Re-export the main types for easier usage
pub use installer::{InstallOptions, Installer};
pub use types::{DotsmithError, DotsmithResult};
