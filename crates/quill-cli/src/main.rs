//! Quill CLI - classify, plan and dry-run document editing requests
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

use std::io;

use anyhow::Result;
use clap::Parser as _;
use cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

mod cli;
mod handlers;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries JSON output, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=info,quill_orchestrator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { request } => handlers::handle_classify(&request)?,
        Commands::Style { style } => handlers::handle_style(style)?,
        Commands::ReviewPlan { request, findings } => {
            handlers::handle_review_plan(&request, &findings)?;
        }
        Commands::Prompt {
            request,
            summary,
            findings,
        } => handlers::handle_prompt(&request, summary.as_deref(), findings.as_deref())?,
        Commands::Plan {
            request,
            max_steps,
            confirm_steps,
        } => {
            let config = handlers::load_config(cli.config.as_deref())?;
            handlers::handle_plan(config, &request, max_steps, confirm_steps)?;
        }
        Commands::Simulate {
            request,
            timeout_ms,
            continue_on_error,
            verbose,
            fail,
        } => {
            let config = handlers::load_config(cli.config.as_deref())?;
            let args = handlers::SimulateArgs {
                timeout_ms,
                continue_on_error,
                verbose,
                fail,
            };
            handlers::handle_simulate(&config, &request, &args).await?;
        }
        Commands::Config => {
            let config = handlers::load_config(cli.config.as_deref())?;
            handlers::handle_config(&config)?;
        }
    }

    Ok(())
}
