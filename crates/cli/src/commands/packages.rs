use anyhow::Result;
use colored::*;
use dotsmith_core::installer::Installer;

pub async fn execute(installer: &Installer, plan_only: bool) -> Result<()> {
    let plan = installer
        .package_plan()
        .map_err(|e| anyhow::anyhow!("Failed to plan package install: {}", e))?;

    let Some(plan) = plan else {
        println!("{}", "No packages configured in the manifest.".dimmed());
        return Ok(());
    };

    println!(
        "{} {} {}",
        "Packages".bold(),
        "via".bright_black(),
        plan.manager.binary().cyan()
    );
    for package in &plan.packages {
        println!("  {}", package);
    }
    println!();

    if plan_only {
        println!(
            "{} {} {}",
            "Would run:".bright_black(),
            plan.program,
            plan.args.join(" ")
        );
        return Ok(());
    }

    let summary = installer
        .install_packages()
        .await
        .map_err(|e| anyhow::anyhow!("Package install failed: {}", e))?;

    if summary.has_failures() {
        for result in summary.results() {
            if let dotsmith_core::execution::TaskOutcome::Failed(reason) = &result.outcome {
                println!("{} {}", "✗".red().bold(), reason.red());
            }
        }
        anyhow::bail!("package installation failed");
    }

    println!(
        "{} {}",
        "✓".green().bold(),
        "Packages installed".green().bold()
    );

    Ok(())
}
