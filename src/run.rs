use crate::cli;
use crate::config::Config;
use crate::detector::{self, Delivery};
use crate::github::client::GitHubClient;
use crate::output;
use anyhow::Context;

pub async fn run(
    args: Vec<String>,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
) -> anyhow::Result<()> {
    let delivery = match cli::parser::parse_args(&args) {
        cli::parser::Command::Run => Delivery::Post,
        cli::parser::Command::Check => Delivery::DryRun,
        cli::parser::Command::Help => {
            output::println(&cli::parser::usage(), &mut stdout_additional)?;
            return Ok(());
        }
        cli::parser::Command::Unknown(cmd) => {
            return Err(anyhow::anyhow!(
                "Unknown command '{cmd}'. Use `issuedup help` for usage."
            ));
        }
    };

    let config = Config::from_env().context("Failed to load configuration")?;
    let client = GitHubClient::new(&config.api_url, config.repository.clone(), &config.token)
        .context("Failed to create GitHub client")?;

    let target = detector::resolve_target(&client, &config.target)
        .await
        .context("Failed to load the issue to check")?;
    tracing::info!(issue = target.number, title = %target.title, "checking for duplicates");

    let outcome = detector::detect_duplicates(&client, &config, target, delivery, chrono::Utc::now())
        .await
        .with_context(|| format!("Duplicate detection failed for {}", config.repository))?;

    if delivery == Delivery::DryRun {
        match &outcome.comment {
            Some(comment) => output::println(comment, &mut stdout_additional)?,
            None => output::println(
                &format!(
                    "No similar issues found for #{} (threshold {}).",
                    outcome.target.number, config.report.threshold
                ),
                &mut stdout_additional,
            )?,
        }
    }

    Ok(())
}
