//! GitHub clone-URL construction

use crate::configs::manifest::CloneProtocol;

/// Build the clone URL for a repository under the manifest's organization.
pub fn clone_url(org: &str, repo: &str, protocol: CloneProtocol) -> String {
    match protocol {
        CloneProtocol::Https => format!("https://github.com/{org}/{repo}.git"),
        CloneProtocol::Ssh => format!("git@github.com:{org}/{repo}.git"),
    }
}

/// Browser URL for a repository, used in listings.
pub fn web_url(org: &str, repo: &str) -> String {
    format!("https://github.com/{org}/{repo}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_clone_url() {
        assert_eq!(
            clone_url("acme-dotfiles", "nvim", CloneProtocol::Https),
            "https://github.com/acme-dotfiles/nvim.git"
        );
    }

    #[test]
    fn ssh_clone_url() {
        assert_eq!(
            clone_url("acme-dotfiles", "nvim", CloneProtocol::Ssh),
            "git@github.com:acme-dotfiles/nvim.git"
        );
    }

    #[test]
    fn web_url_has_no_git_suffix() {
        assert_eq!(
            web_url("acme-dotfiles", "zsh"),
            "https://github.com/acme-dotfiles/zsh"
        );
    }
}
