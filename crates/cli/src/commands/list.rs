use anyhow::Result;
use colored::*;
use dotsmith_core::installer::Installer;

pub fn execute(installer: &Installer) -> Result<()> {
    let listing = installer
        .list_repos()
        .map_err(|e| anyhow::anyhow!("Failed to list repositories: {}", e))?;

    println!("{}", "Repositories".bold().underline());

    if listing.repos.is_empty() {
        println!("  {}", "No repositories configured".dimmed());
        return Ok(());
    }

    for repo in &listing.repos {
        let state = if !repo.enabled {
            "[disabled]".bright_black()
        } else if repo.present {
            "[cloned]".green()
        } else {
            "[missing]".yellow()
        };
        println!(
            "{} {} {}",
            repo.name.color(repo.color).bold(),
            state,
            repo.url.dimmed()
        );
    }

    println!();
    println!(
        "{} {}",
        "Config dir:".bright_black(),
        listing.config_dir.display()
    );

    Ok(())
}
