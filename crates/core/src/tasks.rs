//! Installer task construction and repository label colors
//!
//! The functions here turn manifest entries into runner [`Task`]s. All side
//! effects live inside the task actions, so nothing happens until the runner
//! dispatches them.

use std::path::Path;
use std::sync::Arc;

use colored::Color;

use crate::backup;
use crate::configs::manifest::{Manifest, RepoConfig};
use crate::execution::{Completion, CommandRunner, GitClient, Task};
use crate::github;
use crate::packages::PackageManager;
use crate::types::DotsmithError;

/// Get a consistent color for a repository name
pub fn get_repo_color(repo_name: &str) -> Color {
    // Simple byte hash keeps the color stable across runs
    let hash = repo_name
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));

    // Label palette; avoids the red/yellow/green the status glyphs use
    let colors = [
        Color::TrueColor {
            r: 95,
            g: 158,
            b: 224,
        }, // steel blue
        Color::TrueColor {
            r: 186,
            g: 104,
            b: 200,
        }, // orchid
        Color::TrueColor {
            r: 77,
            g: 182,
            b: 172,
        }, // sea teal
        Color::TrueColor {
            r: 240,
            g: 150,
            b: 75,
        }, // amber
        Color::TrueColor {
            r: 121,
            g: 134,
            b: 203,
        }, // periwinkle
    ];

    colors[(hash % colors.len() as u64) as usize]
}

/// Build the clone task for one repository.
///
/// Behavior at dispatch time: a dry run skips immediately; an existing
/// destination skips unless `force` is set, in which case it is backed up
/// (renamed) before a fresh clone.
pub fn clone_task(
    manifest: &Manifest,
    repo: &RepoConfig,
    config_dir: &Path,
    dry_run: bool,
    force: bool,
    runner: Arc<dyn CommandRunner>,
) -> Task {
    let url = github::clone_url(&manifest.org, &repo.name, manifest.protocol);
    let dest = repo.dest_dir(config_dir);
    let shallow = manifest.shallow;

    Task::new(repo.name.clone(), async move {
        if dry_run {
            return Ok(Completion::Skipped("dry-run".to_string()));
        }

        if dest.exists() {
            if !force {
                return Ok(Completion::Skipped("already present".to_string()));
            }
            backup::backup_dir(&dest).await?;
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        GitClient::new(runner).clone_repo(&url, &dest, shallow).await?;
        Ok(Completion::Done)
    })
}

/// Build the single package-install task. The whole package list goes to the
/// manager in one invocation.
pub fn package_task(
    manager: PackageManager,
    packages: Vec<String>,
    dry_run: bool,
    runner: Arc<dyn CommandRunner>,
) -> Task {
    Task::new("packages", async move {
        if packages.is_empty() {
            return Ok(Completion::Skipped("no packages listed".to_string()));
        }
        if dry_run {
            return Ok(Completion::Skipped("dry-run".to_string()));
        }

        let (program, args) = manager.install_command(&packages);
        let output = runner.run(&program, &args, None).await?;
        if !output.success() {
            return Err(DotsmithError::Task(format!(
                "{} install failed: {}",
                manager.binary(),
                output.stderr_tail()
            )));
        }
        Ok(Completion::Done)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::configs::manifest::parse_manifest;
    use crate::execution::command::ScriptedRunner;
    use crate::execution::{run_tasks, CommandOutput, TaskOutcome};

    fn manifest_for(temp_dir: &Path) -> Manifest {
        parse_manifest(&format!(
            "org: acme-dotfiles\nconfigDir: {}\nrepos:\n  - name: nvim\n",
            temp_dir.display()
        ))
        .unwrap()
    }

    #[test]
    fn repo_color_is_stable() {
        assert_eq!(get_repo_color("nvim"), get_repo_color("nvim"));
    }

    #[tokio::test]
    async fn dry_run_skips_without_touching_git() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manifest = manifest_for(temp_dir.path());
        let runner = Arc::new(ScriptedRunner::always_ok());

        let task = clone_task(
            &manifest,
            &manifest.repos[0],
            temp_dir.path(),
            true,
            false,
            Arc::clone(&runner) as Arc<dyn CommandRunner>,
        );
        let summary = run_tasks(vec![task], 1).await.unwrap();

        assert_eq!(
            summary.get("nvim").unwrap().outcome,
            TaskOutcome::Skipped("dry-run".to_string())
        );
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn existing_destination_skips_unless_forced() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manifest = manifest_for(temp_dir.path());
        std::fs::create_dir(temp_dir.path().join("nvim")).unwrap();
        let runner = Arc::new(ScriptedRunner::always_ok());

        let task = clone_task(
            &manifest,
            &manifest.repos[0],
            temp_dir.path(),
            false,
            false,
            Arc::clone(&runner) as Arc<dyn CommandRunner>,
        );
        let summary = run_tasks(vec![task], 1).await.unwrap();

        assert_eq!(
            summary.get("nvim").unwrap().outcome,
            TaskOutcome::Skipped("already present".to_string())
        );
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn force_backs_up_then_clones() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manifest = manifest_for(temp_dir.path());
        let nvim = temp_dir.path().join("nvim");
        std::fs::create_dir(&nvim).unwrap();
        std::fs::write(nvim.join("init.lua"), "old").unwrap();
        let runner = Arc::new(ScriptedRunner::always_ok());

        let task = clone_task(
            &manifest,
            &manifest.repos[0],
            temp_dir.path(),
            false,
            true,
            Arc::clone(&runner) as Arc<dyn CommandRunner>,
        );
        let summary = run_tasks(vec![task], 1).await.unwrap();

        assert_eq!(summary.get("nvim").unwrap().outcome, TaskOutcome::Succeeded);

        // The old directory moved aside rather than being deleted.
        let backups: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("nvim.bak."))
            .collect();
        assert_eq!(backups.len(), 1);

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (program, args) = &calls[0];
        assert_eq!(program, "git");
        assert!(args.contains(&"https://github.com/acme-dotfiles/nvim.git".to_string()));
    }

    #[tokio::test]
    async fn clone_failure_surfaces_the_git_reason() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manifest = manifest_for(temp_dir.path());
        let runner = Arc::new(ScriptedRunner::new(|_, _| CommandOutput {
            status: Some(128),
            stdout: String::new(),
            stderr: "fatal: could not read from remote repository\n".to_string(),
        }));

        let task = clone_task(
            &manifest,
            &manifest.repos[0],
            temp_dir.path(),
            false,
            false,
            Arc::clone(&runner) as Arc<dyn CommandRunner>,
        );
        let summary = run_tasks(vec![task], 1).await.unwrap();

        match &summary.get("nvim").unwrap().outcome {
            TaskOutcome::Failed(reason) => {
                assert!(reason.contains("could not read from remote repository"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn package_task_runs_one_manager_invocation() {
        let runner = Arc::new(ScriptedRunner::always_ok());
        let task = package_task(
            PackageManager::Brew,
            vec!["git".to_string(), "ripgrep".to_string()],
            false,
            Arc::clone(&runner) as Arc<dyn CommandRunner>,
        );

        let summary = run_tasks(vec![task], 1).await.unwrap();
        assert_eq!(summary.succeeded(), 1);

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (program, args) = &calls[0];
        assert_eq!(program, "brew");
        assert_eq!(args, &vec!["install", "git", "ripgrep"]);
    }

    #[tokio::test]
    async fn empty_package_list_is_skipped() {
        let runner = Arc::new(ScriptedRunner::always_ok());
        let task = package_task(
            PackageManager::Apt,
            Vec::new(),
            false,
            Arc::clone(&runner) as Arc<dyn CommandRunner>,
        );

        let summary = run_tasks(vec![task], 1).await.unwrap();
        assert_eq!(summary.skipped(), 1);
        assert!(runner.calls.lock().unwrap().is_empty());
    }
}
