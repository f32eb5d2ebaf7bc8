use anyhow::Result;
use colored::*;
use dotsmith_core::execution::TaskOutcome;
use dotsmith_core::installer::Installer;
use dotsmith_core::tasks::get_repo_color;

pub async fn execute(installer: &Installer) -> Result<()> {
    println!(
        "{} {}",
        "Installing dotfiles from".bold(),
        installer.manifest.org.cyan()
    );
    println!();

    let report = installer
        .install()
        .await
        .map_err(|e| anyhow::anyhow!("Install failed: {}", e))?;

    for result in report.summary.results() {
        let label = result.id.color(get_repo_color(&result.id)).bold();
        match &result.outcome {
            TaskOutcome::Succeeded => println!("{} {}", "✓".green().bold(), label),
            TaskOutcome::Skipped(reason) => println!(
                "{} {} {}",
                "-".bright_black().bold(),
                label,
                format!("({})", reason).dimmed()
            ),
            TaskOutcome::Failed(reason) => {
                println!("{} {} {}", "✗".red().bold(), label, reason.red())
            }
        }
    }

    println!();
    println!(
        "{} {} succeeded, {} skipped, {} failed {} {}",
        "Done:".bold(),
        report.summary.succeeded().to_string().green(),
        report.summary.skipped().to_string().bright_black(),
        report.summary.failed().to_string().red(),
        "->".bright_black(),
        report.config_dir.display()
    );

    if report.summary.has_failures() {
        anyhow::bail!(
            "{} of {} repositories failed",
            report.summary.failed(),
            report.summary.len()
        );
    }

    Ok(())
}
