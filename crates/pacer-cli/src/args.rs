use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{LogCommands, PlanCommands, ProposalCommands};

/// Training calendar planner
///
/// Pacer keeps running training plans as weeks of days, resolves them to
/// calendar dates from the race date, and applies coach proposals only after
/// the athlete confirms them. Days the athlete already completed are never
/// changed by a proposal.
#[derive(Parser)]
#[command(version, about, name = "pacer")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to $PACER_DATABASE, then
    /// $XDG_DATA_HOME/pacer/pacer.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
///
/// - `plan`: create, import and manage training plans
/// - `log`: record what the athlete actually did
/// - `proposal`: preview and apply calendar change proposals
/// - `serve`: start the MCP server
#[derive(Subcommand)]
pub enum Commands {
    /// Manage plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Log executed workouts
    #[command(alias = "l")]
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
    /// Preview and apply proposals
    #[command(alias = "pr")]
    Proposal {
        #[command(subcommand)]
        command: ProposalCommands,
    },
    /// Start the MCP server
    Serve,
}
