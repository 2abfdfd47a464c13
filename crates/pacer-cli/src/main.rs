//! Pacer CLI Application
//!
//! Command-line interface and MCP server for the pacer training planner.

mod advice;
mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, PacerMcpServer};
use pacer_core::{params::ListPlans, PlannerBuilder};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let planner = PlannerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize planner")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Pacer started");

    match command {
        Some(Plan { command }) => {
            Cli::new(planner, renderer)
                .handle_plan_command(command)
                .await
        }
        Some(Log { command }) => Cli::new(planner, renderer).handle_log_command(command).await,
        Some(Proposal { command }) => {
            Cli::new(planner, renderer)
                .handle_proposal_command(command)
                .await
        }
        Some(Serve) => {
            info!("Starting Pacer MCP server");
            run_stdio_server(PacerMcpServer::new(planner))
                .await
                .context("MCP server failed")
        }
        None => {
            Cli::new(planner, renderer)
                .list_plans(&ListPlans::default())
                .await
        }
    }
}
