//! Package-manager detection and install command construction

use crate::types::{DotsmithError, DotsmithResult};

/// Supported package-manager front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Pacman,
    Brew,
}

impl PackageManager {
    /// Probe order when detecting the host's manager.
    pub const DETECTION_ORDER: [PackageManager; 4] = [
        PackageManager::Apt,
        PackageManager::Dnf,
        PackageManager::Pacman,
        PackageManager::Brew,
    ];

    /// Binary looked up on PATH.
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Pacman => "pacman",
            PackageManager::Brew => "brew",
        }
    }

    /// Parse a manager name as written in user input.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "apt" | "apt-get" => Some(PackageManager::Apt),
            "dnf" => Some(PackageManager::Dnf),
            "pacman" => Some(PackageManager::Pacman),
            "brew" | "homebrew" => Some(PackageManager::Brew),
            _ => None,
        }
    }

    /// Detect the first manager present on PATH.
    pub fn detect() -> DotsmithResult<Self> {
        Self::DETECTION_ORDER
            .iter()
            .copied()
            .find(|manager| which::which(manager.binary()).is_ok())
            .ok_or_else(|| {
                DotsmithError::Config(
                    "no supported package manager found (apt-get, dnf, pacman, brew)"
                        .to_string(),
                )
            })
    }

    /// System managers run under sudo; brew refuses to.
    pub fn use_sudo(&self) -> bool {
        !matches!(self, PackageManager::Brew)
    }

    /// Build the single non-interactive install invocation for `packages`.
    pub fn install_command(&self, packages: &[String]) -> (String, Vec<String>) {
        let mut args = Vec::new();
        let program = if self.use_sudo() {
            args.push(self.binary().to_string());
            "sudo".to_string()
        } else {
            self.binary().to_string()
        };

        match self {
            PackageManager::Apt | PackageManager::Dnf => {
                args.push("install".to_string());
                args.push("-y".to_string());
            }
            PackageManager::Pacman => {
                args.push("-S".to_string());
                args.push("--noconfirm".to_string());
                args.push("--needed".to_string());
            }
            PackageManager::Brew => {
                args.push("install".to_string());
            }
        }

        args.extend(packages.iter().cloned());
        (program, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packages() -> Vec<String> {
        vec!["git".to_string(), "ripgrep".to_string()]
    }

    #[test]
    fn from_name_accepts_common_aliases() {
        assert_eq!(PackageManager::from_name("apt"), Some(PackageManager::Apt));
        assert_eq!(
            PackageManager::from_name("apt-get"),
            Some(PackageManager::Apt)
        );
        assert_eq!(
            PackageManager::from_name("homebrew"),
            Some(PackageManager::Brew)
        );
        assert_eq!(PackageManager::from_name("chocolatey"), None);
    }

    #[test]
    fn apt_installs_noninteractively_under_sudo() {
        let (program, args) = PackageManager::Apt.install_command(&packages());
        assert_eq!(program, "sudo");
        assert_eq!(args, vec!["apt-get", "install", "-y", "git", "ripgrep"]);
    }

    #[test]
    fn pacman_uses_needed_to_stay_idempotent() {
        let (program, args) = PackageManager::Pacman.install_command(&packages());
        assert_eq!(program, "sudo");
        assert_eq!(
            args,
            vec!["pacman", "-S", "--noconfirm", "--needed", "git", "ripgrep"]
        );
    }

    #[test]
    fn brew_runs_without_sudo() {
        let (program, args) = PackageManager::Brew.install_command(&packages());
        assert_eq!(program, "brew");
        assert_eq!(args, vec!["install", "git", "ripgrep"]);
    }
}
