use anyhow::Result;
use colored::*;
use dotsmith_core::installer::Installer;

pub fn execute(installer: &Installer) -> Result<()> {
    let written = installer
        .generate_flags()
        .map_err(|e| anyhow::anyhow!("Failed to generate flags: {}", e))?;

    match written {
        Some(path) => println!(
            "{} {}",
            "✓".green().bold(),
            format!("Wrote {}", path.display()).green()
        ),
        None => println!("{}", "No flags file configured in the manifest.".dimmed()),
    }

    Ok(())
}
