// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the revq CLI.

pub mod apply;
pub mod classify;
pub mod review;
pub mod threads;
pub mod triage;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::CommandFactory;

use crate::cli::{Cli, Commands, OutputContext};
use crate::output;
use crate::provider::CliTokenProvider;
use revq_core::{AppConfig, build_client, check_rate_limit};

/// Reads command input from a file path, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// Dispatch to the appropriate command handler.
pub async fn run(
    command: Commands,
    ctx: OutputContext,
    config: &AppConfig,
    repo_context: Option<&str>,
) -> Result<()> {
    match command {
        Commands::Review { reference } => {
            let result = review::run(&reference, repo_context, config).await?;
            output::render(&result, &ctx)
        }

        Commands::Threads {
            reference,
            needs_response,
        } => {
            let result = threads::run(&reference, repo_context, needs_response, config).await?;
            output::render(&result, &ctx)
        }

        Commands::Classify { login, name } => {
            let result = classify::run(&login, name.as_deref(), config)?;
            output::render(&result, &ctx)
        }

        Commands::Triage { event, policy } => {
            let result = triage::run(&event, policy.as_deref(), config)?;
            output::render(&result, &ctx)
        }

        Commands::Apply { file, dry_run } => {
            let result = apply::run(&file, dry_run, config).await?;
            output::render(&result, &ctx)
        }

        Commands::Status => {
            let client = build_client(&CliTokenProvider, &config.github)?;
            let status = check_rate_limit(&client).await?;
            output::render(&status, &ctx)
        }

        Commands::Completion { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "revq", &mut std::io::stdout());
            Ok(())
        }
    }
}
