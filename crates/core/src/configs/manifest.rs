use std::collections::HashSet;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{DotsmithError, DotsmithResult};

const DEFAULT_CONFIG_DIR: &str = "~/.config";
const DEFAULT_JOBS: usize = 4;

/// Protocol used when constructing clone URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum CloneProtocol {
    #[default]
    Https,
    Ssh,
}

/// One configuration repository to install.
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RepoConfig {
    pub name: String,
    pub description: Option<String>,
    /// Destination directory relative to the config dir; defaults to the
    /// repository name.
    pub target: Option<String>,
    pub enabled: Option<bool>,
}

impl RepoConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Where this repository gets cloned.
    pub fn dest_dir(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(self.target.as_deref().unwrap_or(&self.name))
    }
}

/// The dotsmith.yml manifest: which repositories to clone from which GitHub
/// organization, plus optional packages and a flags file.
#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    /// GitHub organization the configuration repositories live under.
    pub org: String,
    #[serde(default)]
    pub protocol: CloneProtocol,
    /// Directory repositories are cloned into. Defaults to `~/.config`.
    pub config_dir: Option<String>,
    /// Default number of clone tasks allowed to run at once.
    pub jobs: Option<usize>,
    /// Clone with `--depth 1`.
    #[serde(default)]
    pub shallow: bool,
    pub repos: Vec<RepoConfig>,
    pub packages: Option<Vec<String>>,
    /// Path to a flags.json file, relative to the manifest location.
    pub flags: Option<String>,
}

impl Manifest {
    /// Read and parse a manifest from disk.
    pub fn load(path: &Path) -> DotsmithResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DotsmithError::Config(format!(
                "failed to read manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        parse_manifest(&content)
    }

    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or(DEFAULT_JOBS)
    }

    pub fn config_dir(&self) -> DotsmithResult<PathBuf> {
        expand_tilde(self.config_dir.as_deref().unwrap_or(DEFAULT_CONFIG_DIR))
    }

    pub fn enabled_repos(&self) -> impl Iterator<Item = &RepoConfig> {
        self.repos.iter().filter(|r| r.is_enabled())
    }

    fn validate(&self) -> DotsmithResult<()> {
        if self.org.trim().is_empty() {
            return Err(DotsmithError::Config(
                "manifest 'org' must not be empty".to_string(),
            ));
        }

        if self.jobs == Some(0) {
            return Err(DotsmithError::Config(
                "manifest 'jobs' must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for repo in &self.repos {
            if repo.name.trim().is_empty() {
                return Err(DotsmithError::Config(
                    "repository entries must have a non-empty name".to_string(),
                ));
            }
            if !seen.insert(repo.name.as_str()) {
                return Err(DotsmithError::Config(format!(
                    "duplicate repository '{}' in manifest",
                    repo.name
                )));
            }
        }

        Ok(())
    }
}

pub fn parse_manifest(yaml_str: &str) -> DotsmithResult<Manifest> {
    let manifest: Manifest = serde_yaml::from_str(yaml_str)?;
    manifest.validate()?;
    Ok(manifest)
}

/// Expand a leading `~` to the current user's home directory.
pub fn expand_tilde(path: &str) -> DotsmithResult<PathBuf> {
    let home = || {
        dirs::home_dir().ok_or_else(|| {
            DotsmithError::Path("could not determine home directory".to_string())
        })
    };

    if path == "~" {
        return home();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home()?.join(rest));
    }
    Ok(PathBuf::from(path))
}
