//! External command execution
//!
//! Every installer step that shells out (git, the system package manager)
//! goes through the [`CommandRunner`] capability, so tests can substitute a
//! scripted fake instead of invoking real binaries.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::types::{DotsmithError, DotsmithResult};

/// Captured result of one external command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Process exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Last non-empty stderr line, used for compact failure reasons.
    pub fn stderr_tail(&self) -> &str {
        self.stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}

/// Capability interface for invoking external processes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: Option<&Path>,
    ) -> DotsmithResult<CommandOutput>;
}

/// Runs commands on the host via tokio's process API, capturing output.
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: Option<&Path>,
    ) -> DotsmithResult<CommandOutput> {
        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| {
            DotsmithError::Task(format!("failed to execute '{}': {}", program, e))
        })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Thin git front-end over the command capability.
pub struct GitClient {
    runner: Arc<dyn CommandRunner>,
}

impl GitClient {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Clone `url` into `dest`. The destination must not exist yet; git
    /// creates it.
    pub async fn clone_repo(&self, url: &str, dest: &Path, shallow: bool) -> DotsmithResult<()> {
        let mut args = vec!["clone".to_string()];
        if shallow {
            args.push("--depth".to_string());
            args.push("1".to_string());
        }
        args.push(url.to_string());
        args.push(dest.display().to_string());

        let output = self.runner.run("git", &args, None).await?;
        if !output.success() {
            return Err(DotsmithError::Task(format!(
                "git clone failed for {}: {}",
                url,
                output.stderr_tail()
            )));
        }
        Ok(())
    }
}

/// Scripted command runner for tests: answers from a closure and records
/// every invocation.
#[cfg(test)]
pub(crate) struct ScriptedRunner {
    script: Box<dyn Fn(&str, &[String]) -> CommandOutput + Send + Sync>,
    pub calls: std::sync::Mutex<Vec<(String, Vec<String>)>>,
}

#[cfg(test)]
impl ScriptedRunner {
    pub fn new(
        script: impl Fn(&str, &[String]) -> CommandOutput + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn always_ok() -> Self {
        Self::new(|_, _| CommandOutput {
            status: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

#[cfg(test)]
#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        _cwd: Option<&Path>,
    ) -> DotsmithResult<CommandOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        Ok((self.script)(program, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_tail_picks_last_non_empty_line() {
        let output = CommandOutput {
            status: Some(128),
            stdout: String::new(),
            stderr: "Cloning into 'nvim'...\nfatal: repository not found\n\n".to_string(),
        };
        assert_eq!(output.stderr_tail(), "fatal: repository not found");
    }

    #[tokio::test]
    async fn git_client_reports_clone_failure_with_reason() {
        let runner = Arc::new(ScriptedRunner::new(|_, _| CommandOutput {
            status: Some(128),
            stdout: String::new(),
            stderr: "fatal: repository not found\n".to_string(),
        }));
        let git = GitClient::new(Arc::clone(&runner) as Arc<dyn CommandRunner>);

        let err = git
            .clone_repo(
                "https://github.com/acme/missing.git",
                Path::new("/tmp/missing"),
                false,
            )
            .await
            .expect_err("clone should fail");

        assert!(err.to_string().contains("repository not found"));
    }

    #[tokio::test]
    async fn git_client_builds_shallow_clone_invocation() {
        let runner = Arc::new(ScriptedRunner::always_ok());
        let git = GitClient::new(Arc::clone(&runner) as Arc<dyn CommandRunner>);

        git.clone_repo(
            "git@github.com:acme/nvim.git",
            Path::new("/tmp/nvim"),
            true,
        )
        .await
        .unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (program, args) = &calls[0];
        assert_eq!(program, "git");
        assert_eq!(
            args,
            &vec![
                "clone".to_string(),
                "--depth".to_string(),
                "1".to_string(),
                "git@github.com:acme/nvim.git".to_string(),
                "/tmp/nvim".to_string(),
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_captures_status_and_output() {
        let runner = SystemCommandRunner;
        let output = runner
            .run(
                "sh",
                &["-c".to_string(), "printf hi; exit 3".to_string()],
                None,
            )
            .await
            .unwrap();

        assert_eq!(output.status, Some(3));
        assert_eq!(output.stdout, "hi");
        assert!(!output.success());
    }
}
