use anyhow::Result;
use colored::*;
use dotsmith_core::configs::expand_tilde;
use dotsmith_core::remote::ManifestFetcher;

const CACHE_DIR: &str = "~/.config/dotsmith/cache";

pub async fn execute(url: &str, refresh: bool) -> Result<()> {
    let cache_dir = expand_tilde(CACHE_DIR)
        .map_err(|e| anyhow::anyhow!("Failed to resolve cache directory: {}", e))?;
    let fetcher = ManifestFetcher::new(cache_dir);

    println!("{} {}", "Fetching manifest from".bold(), url.cyan());

    let path = fetcher
        .fetch(url, refresh)
        .await
        .map_err(|e| anyhow::anyhow!("Fetch failed: {}", e))?;

    println!(
        "{} {}",
        "✓".green().bold(),
        format!("Cached at {}", path.display()).green()
    );

    Ok(())
}
