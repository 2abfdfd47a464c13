//! Command-line argument structures and their handlers.
//!
//! Each clap argument struct converts into the matching core parameter type
//! from [`pacer_core::params`], so the CLI and the MCP server validate input
//! through the same code:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Planner
//! ```

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use log::debug;
use pacer_core::{
    display::{CreateResult, OperationStatus, UpdateResult},
    params::*,
    Planner,
};
use serde_json::Value;

use crate::{advice::FileAdvice, renderer::TerminalRenderer};

// ============================================================================
// Plan commands
// ============================================================================

/// Create a new plan with empty weeks
#[derive(Args)]
pub struct CreatePlanArgs {
    /// Title of the plan
    pub title: String,
    /// Race date (YYYY-MM-DD) the final week ends on
    #[arg(short, long)]
    pub race_date: Option<String>,
    /// Monday (YYYY-MM-DD) week 1 starts on, instead of a race date
    #[arg(long, conflicts_with = "race_date")]
    pub start_date: Option<String>,
    /// Number of empty weeks to create
    #[arg(short, long, default_value_t = 0)]
    pub weeks: u32,
    /// Coach or account owning the plan
    #[arg(long)]
    pub owner: Option<String>,
    /// Athlete the plan is written for
    #[arg(long)]
    pub athlete: Option<String>,
}

impl From<CreatePlanArgs> for CreatePlan {
    fn from(val: CreatePlanArgs) -> Self {
        CreatePlan {
            title: val.title,
            race_date: val.race_date,
            start_date: val.start_date,
            week_count: val.weeks,
            owner: val.owner,
            athlete: val.athlete,
        }
    }
}

/// Import a plan from a weekly-grid template file
#[derive(Args)]
pub struct ImportPlanArgs {
    /// Template JSON produced by the PDF table extractor
    pub file: PathBuf,
    /// Plan title; defaults to the template's program name
    #[arg(short, long)]
    pub title: Option<String>,
    /// Race date (YYYY-MM-DD) the final week ends on
    #[arg(short, long)]
    pub race_date: Option<String>,
    /// Monday (YYYY-MM-DD) week 1 starts on, instead of a race date
    #[arg(long, conflicts_with = "race_date")]
    pub start_date: Option<String>,
}

impl ImportPlanArgs {
    fn into_params(self) -> Result<ImportTemplate> {
        let template_json = fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read template {}", self.file.display()))?;
        Ok(ImportTemplate {
            template_json,
            title: self.title,
            race_date: self.race_date,
            start_date: self.start_date,
        })
    }
}

/// List plans
#[derive(Args)]
pub struct ListPlansArgs {
    /// Include archived plans
    #[arg(long)]
    pub archived: bool,
    /// Only plans with this status (draft, active, archived)
    #[arg(short, long)]
    pub status: Option<String>,
}

impl From<ListPlansArgs> for ListPlans {
    fn from(val: ListPlansArgs) -> Self {
        ListPlans {
            archived: val.archived,
            status: val.status,
        }
    }
}

/// A plan, identified by ID
#[derive(Args)]
pub struct PlanIdArgs {
    /// Unique identifier of the plan
    pub id: u64,
}

impl From<PlanIdArgs> for Id {
    fn from(val: PlanIdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Set or clear a plan's race date
#[derive(Args)]
pub struct RaceDateArgs {
    /// Unique identifier of the plan
    pub id: u64,
    /// New race date (YYYY-MM-DD); omit to clear it
    pub race_date: Option<String>,
}

impl From<RaceDateArgs> for SetRaceDate {
    fn from(val: RaceDateArgs) -> Self {
        SetRaceDate {
            id: val.id,
            race_date: val.race_date,
        }
    }
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a new plan with empty weeks
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// Import a plan from a weekly-grid template
    #[command(alias = "i")]
    Import(ImportPlanArgs),
    /// Show a plan's calendar
    #[command(alias = "s")]
    Show(PlanIdArgs),
    /// List plans
    #[command(aliases = ["l", "ls"])]
    List(ListPlansArgs),
    /// Publish a draft plan
    Publish(PlanIdArgs),
    /// Archive a plan
    #[command(alias = "a")]
    Archive(PlanIdArgs),
    /// Restore an archived plan
    #[command(alias = "u")]
    Unarchive(PlanIdArgs),
    /// Set or clear the race date
    RaceDate(RaceDateArgs),
}

// ============================================================================
// Log commands
// ============================================================================

/// Mark an activity completed
#[derive(Args)]
pub struct LogActivityArgs {
    /// Activity that was executed
    pub activity_id: u64,
    /// Distance actually covered, in the activity's unit
    #[arg(short, long)]
    pub distance: Option<f64>,
    /// Minutes actually spent
    #[arg(short = 't', long)]
    pub duration: Option<u32>,
    /// Pace actually run
    #[arg(short, long)]
    pub pace: Option<String>,
}

impl From<LogActivityArgs> for LogActivity {
    fn from(val: LogActivityArgs) -> Self {
        LogActivity {
            activity_id: val.activity_id,
            actual_distance: val.distance,
            actual_duration: val.duration,
            actual_pace: val.pace,
        }
    }
}

/// Mark a whole day done
#[derive(Args)]
pub struct DayDoneArgs {
    pub day_id: u64,
}

impl From<DayDoneArgs> for MarkDayDone {
    fn from(val: DayDoneArgs) -> Self {
        MarkDayDone { day_id: val.day_id }
    }
}

/// Record a workout imported from another provider
#[derive(Args)]
pub struct MatchArgs {
    pub plan_id: u64,
    /// Provider name, e.g. strava
    pub provider: String,
    /// Identifier of the workout at the provider
    pub external_id: String,
    /// Planned activity the workout corresponds to
    #[arg(short, long)]
    pub activity: Option<u64>,
}

impl From<MatchArgs> for RecordExternalActivity {
    fn from(val: MatchArgs) -> Self {
        RecordExternalActivity {
            plan_id: val.plan_id,
            provider: val.provider,
            external_id: val.external_id,
            matched_activity_id: val.activity,
        }
    }
}

#[derive(Subcommand)]
pub enum LogCommands {
    /// Mark an activity completed and record actuals
    #[command(alias = "a")]
    Activity(LogActivityArgs),
    /// Mark a whole day done
    #[command(alias = "d")]
    DayDone(DayDoneArgs),
    /// Record an external workout
    #[command(alias = "m")]
    Match(MatchArgs),
}

// ============================================================================
// Proposal commands
// ============================================================================

/// Preview a proposal drafted in a JSON file
#[derive(Args)]
pub struct PreviewArgs {
    pub plan_id: u64,
    /// Proposal JSON file
    #[arg(short, long)]
    pub file: PathBuf,
    /// What the athlete asked for
    #[arg(short = 'm', long)]
    pub feedback: String,
}

/// Apply a previewed proposal
#[derive(Args)]
pub struct ApplyArgs {
    pub plan_id: u64,
    /// Proposal JSON file, as previewed
    #[arg(short, long)]
    pub file: PathBuf,
    /// Confirm the athlete approved the changes
    #[arg(short, long)]
    pub yes: bool,
}

impl ApplyArgs {
    fn into_params(self) -> Result<ApplyProposal> {
        let raw = fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read proposal {}", self.file.display()))?;
        let proposal: Value = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not JSON", self.file.display()))?;
        Ok(ApplyProposal {
            plan_id: self.plan_id,
            proposal,
            confirmed: self.yes,
        })
    }
}

#[derive(Subcommand)]
pub enum ProposalCommands {
    /// Show what a proposal would change, without writing anything
    #[command(alias = "p")]
    Preview(PreviewArgs),
    /// Apply a proposal; requires --yes
    #[command(alias = "a")]
    Apply(ApplyArgs),
}

// ============================================================================
// Handlers
// ============================================================================

/// Runs CLI commands against a planner and renders the output.
pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Create(args) => {
                let plan = self
                    .planner
                    .create_plan(&args.into())
                    .await
                    .context("Failed to create plan")?;
                self.renderer.render(&CreateResult::new(plan).to_string())
            }
            PlanCommands::Import(args) => {
                let params = args.into_params()?;
                let plan = self
                    .planner
                    .import_template(&params)
                    .await
                    .context("Failed to import template")?;
                self.renderer.render(&CreateResult::new(plan).to_string())
            }
            PlanCommands::Show(args) => {
                let plan = self
                    .planner
                    .show_plan(&args.into())
                    .await
                    .context("Failed to show plan")?;
                self.renderer.render(&plan.to_string())
            }
            PlanCommands::List(args) => self.list_plans(&args.into()).await,
            PlanCommands::Publish(args) => {
                let plan = self
                    .planner
                    .publish_plan(&args.into())
                    .await
                    .context("Failed to publish plan")?;
                let change = format!("Status is now {}", plan.status);
                self.renderer
                    .render(&UpdateResult::with_changes(plan, vec![change]).to_string())
            }
            PlanCommands::Archive(args) => {
                let plan = self
                    .planner
                    .archive_plan(&args.into())
                    .await
                    .context("Failed to archive plan")?;
                let status = OperationStatus::success(format!(
                    "Archived plan with ID {}. Use 'pacer plan unarchive {}' to restore it.",
                    plan.id, plan.id
                ));
                self.renderer.render(&status.to_string())
            }
            PlanCommands::Unarchive(args) => {
                let plan = self
                    .planner
                    .unarchive_plan(&args.into())
                    .await
                    .context("Failed to unarchive plan")?;
                let status =
                    OperationStatus::success(format!("Restored plan with ID {}", plan.id));
                self.renderer.render(&status.to_string())
            }
            PlanCommands::RaceDate(args) => {
                let plan = self
                    .planner
                    .set_race_date(&args.into())
                    .await
                    .context("Failed to set race date")?;
                let change = match plan.race_date {
                    Some(date) => format!("Race date set to {date}"),
                    None => "Race date cleared".to_string(),
                };
                self.renderer
                    .render(&UpdateResult::with_changes(plan, vec![change]).to_string())
            }
        }
    }

    pub async fn handle_log_command(&self, command: LogCommands) -> Result<()> {
        match command {
            LogCommands::Activity(args) => {
                let activity = self
                    .planner
                    .log_activity(&args.into())
                    .await
                    .context("Failed to log activity")?;
                self.renderer.render(
                    &UpdateResult::with_changes(activity, vec!["Marked completed".to_string()])
                        .to_string(),
                )
            }
            LogCommands::DayDone(args) => {
                let day = self
                    .planner
                    .mark_day_done(&args.into())
                    .await
                    .context("Failed to mark day done")?;
                self.renderer.render(
                    &UpdateResult::with_changes(day, vec!["Marked done".to_string()]).to_string(),
                )
            }
            LogCommands::Match(args) => {
                let external = self
                    .planner
                    .record_external_activity(&args.into())
                    .await
                    .context("Failed to record external activity")?;
                let status = OperationStatus::success(external.to_string().trim_end().to_string());
                self.renderer.render(&status.to_string())
            }
        }
    }

    pub async fn handle_proposal_command(&self, command: ProposalCommands) -> Result<()> {
        match command {
            ProposalCommands::Preview(args) => {
                debug!("previewing {} for plan {}", args.file.display(), args.plan_id);
                let advice = FileAdvice::new(args.file);
                let preview = self
                    .planner
                    .preview_proposal(
                        &PreviewProposal {
                            plan_id: args.plan_id,
                            feedback: args.feedback,
                        },
                        &advice,
                    )
                    .await
                    .context("Failed to preview proposal")?;
                self.renderer.render(&preview.to_string())
            }
            ProposalCommands::Apply(args) => {
                let params = args.into_params()?;
                let outcome = self
                    .planner
                    .apply_proposal(&params)
                    .await
                    .context("Failed to apply proposal")?;
                self.renderer.render(&outcome.to_string())
            }
        }
    }

    pub async fn list_plans(&self, params: &ListPlans) -> Result<()> {
        let summaries = self
            .planner
            .list_plans_summary(params)
            .await
            .context("Failed to list plans")?;

        let title = match params.status.as_deref() {
            Some(status) => format!("Plans ({status})"),
            None if params.archived => "All Plans".to_string(),
            None => "Plans".to_string(),
        };
        self.renderer.render(&format!("# {title}\n\n{summaries}"))
    }
}
