//! High-level installer interface
//!
//! This module provides the [`Installer`], the primary entry point for all
//! dotsmith operations. It loads the manifest once, carries a single
//! immutable [`InstallOptions`] value, and hands the actual work to the
//! bounded task runner.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dotsmith_core::installer::{InstallOptions, Installer};
//! use std::path::Path;
//!
//! # async fn example() -> dotsmith_core::types::DotsmithResult<()> {
//! let installer = Installer::new(
//!     Path::new("dotsmith.yml"),
//!     InstallOptions {
//!         dry_run: true,
//!         ..InstallOptions::default()
//!     },
//! )?;
//!
//! let report = installer.install().await?;
//! println!("{} repos processed", report.summary.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::Glob;

use crate::configs::flags::generate_flags_script;
use crate::configs::manifest::{Manifest, RepoConfig};
use crate::execution::{run_tasks, CommandRunner, RunSummary, SystemCommandRunner};
use crate::github;
use crate::packages::PackageManager;
use crate::results::{InstallReport, PackagePlan, RepoInfo, RepoListResult};
use crate::tasks::{clone_task, get_repo_color, package_task};
use crate::types::{DotsmithError, DotsmithResult};

/// Per-run options, fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Report what would happen without executing anything.
    pub dry_run: bool,
    /// Back up and re-clone destinations that already exist.
    pub force: bool,
    /// Override the manifest's job count.
    pub jobs: Option<usize>,
    /// Glob over repository names; unmatched repos are not dispatched.
    pub only: Option<String>,
    /// Override package-manager detection.
    pub manager: Option<PackageManager>,
}

/// High-level installer that encapsulates manifest, options, and execution
pub struct Installer {
    pub manifest: Manifest,
    pub options: InstallOptions,
    manifest_dir: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl Installer {
    /// Load the manifest at `manifest_path` and build an installer around it.
    pub fn new(manifest_path: &Path, options: InstallOptions) -> DotsmithResult<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let manifest_dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::with_runner(
            manifest,
            manifest_dir,
            options,
            Arc::new(SystemCommandRunner),
        ))
    }

    /// Build an installer with an explicit command runner. Tests use this
    /// with a scripted runner so nothing shells out.
    pub fn with_runner(
        manifest: Manifest,
        manifest_dir: PathBuf,
        options: InstallOptions,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            manifest,
            options,
            manifest_dir,
            runner,
        }
    }

    /// Job count after applying the command-line override.
    pub fn effective_jobs(&self) -> usize {
        self.options.jobs.unwrap_or_else(|| self.manifest.jobs())
    }

    /// List every configured repository with its destination state.
    pub fn list_repos(&self) -> DotsmithResult<RepoListResult> {
        let config_dir = self.manifest.config_dir()?;
        let repos = self
            .manifest
            .repos
            .iter()
            .map(|repo| {
                let dest = repo.dest_dir(&config_dir);
                RepoInfo {
                    name: repo.name.clone(),
                    url: github::clone_url(&self.manifest.org, &repo.name, self.manifest.protocol),
                    present: dest.exists(),
                    dest,
                    enabled: repo.is_enabled(),
                    color: get_repo_color(&repo.name),
                }
            })
            .collect();

        Ok(RepoListResult { repos, config_dir })
    }

    /// Clone every selected repository through the bounded runner.
    pub async fn install(&self) -> DotsmithResult<InstallReport> {
        let config_dir = self.manifest.config_dir()?;
        if !self.options.dry_run {
            tokio::fs::create_dir_all(&config_dir).await?;
        }

        let tasks = self
            .selected_repos()?
            .into_iter()
            .map(|repo| {
                clone_task(
                    &self.manifest,
                    repo,
                    &config_dir,
                    self.options.dry_run,
                    self.options.force,
                    Arc::clone(&self.runner),
                )
            })
            .collect();

        let jobs = self.effective_jobs();
        let summary = run_tasks(tasks, jobs).await?;

        Ok(InstallReport {
            summary,
            config_dir,
            jobs,
        })
    }

    /// Describe the package installation without running it.
    pub fn package_plan(&self) -> DotsmithResult<Option<PackagePlan>> {
        let packages = self.manifest.packages.clone().unwrap_or_default();
        if packages.is_empty() {
            return Ok(None);
        }

        let manager = self.resolve_manager()?;
        let (program, args) = manager.install_command(&packages);
        Ok(Some(PackagePlan {
            manager,
            packages,
            program,
            args,
        }))
    }

    /// Install the manifest's package list as a single runner task.
    pub async fn install_packages(&self) -> DotsmithResult<RunSummary> {
        let packages = self.manifest.packages.clone().unwrap_or_default();
        if packages.is_empty() {
            return Ok(RunSummary::default());
        }

        let manager = self.resolve_manager()?;
        let task = package_task(
            manager,
            packages,
            self.options.dry_run,
            Arc::clone(&self.runner),
        );
        run_tasks(vec![task], 1).await
    }

    /// Generate the flags.sh snippet if the manifest points at a flags file.
    pub fn generate_flags(&self) -> DotsmithResult<Option<PathBuf>> {
        let Some(rel) = &self.manifest.flags else {
            return Ok(None);
        };
        let flags_path = self.manifest_dir.join(rel);
        let config_dir = self.manifest.config_dir()?;
        Ok(Some(generate_flags_script(&flags_path, &config_dir)?))
    }

    fn resolve_manager(&self) -> DotsmithResult<PackageManager> {
        match self.options.manager {
            Some(manager) => Ok(manager),
            None => PackageManager::detect(),
        }
    }

    fn selected_repos(&self) -> DotsmithResult<Vec<&RepoConfig>> {
        let matcher = match &self.options.only {
            Some(pattern) => Some(
                Glob::new(pattern)
                    .map_err(|e| {
                        DotsmithError::Config(format!(
                            "invalid repository filter '{}': {}",
                            pattern, e
                        ))
                    })?
                    .compile_matcher(),
            ),
            None => None,
        };

        Ok(self
            .manifest
            .enabled_repos()
            .filter(|repo| {
                matcher
                    .as_ref()
                    .map_or(true, |m| m.is_match(repo.name.as_str()))
            })
            .collect())
    }
}
