//! Core library for the Pacer training calendar.
//!
//! Pacer stores running training plans as weeks of seven days, resolves each
//! day to a calendar date on demand, and lets an external advice service
//! propose calendar changes that are applied only after validation and
//! sanitization against what the athlete has already executed.
//!
//! # Pipeline
//!
//! - [`calendar`]: week and day date resolution from explicit dates or the
//!   race date
//! - [`locks`]: which days and activities are protected as history
//! - [`proposal`]: validation of untrusted proposals and removal of changes
//!   that touch protected history
//! - [`db`]: SQLite storage and the atomic proposal applier
//! - [`planner`]: async entry point used by the CLI and the MCP server
//!
//! Output formatting lives in [`display`]: domain models implement
//! [`std::fmt::Display`] as markdown, and the CLI renders it in the terminal.
//!
//! # Quick Start
//!
//! ```rust
//! use pacer_core::{params::CreatePlan, PlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("test.db"))
//!     .build()
//!     .await?;
//!
//! let plan = planner
//!     .create_plan(&CreatePlan {
//!         title: "Spring Half".to_string(),
//!         race_date: Some("2026-04-19".to_string()),
//!         week_count: 12,
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{plan}");
//!
//! use pacer_core::params::ListPlans;
//! let plans = planner.list_plans_summary(&ListPlans::default()).await?;
//! for plan in &plans {
//!     println!("Plan: {}", plan.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod advice;
pub mod calendar;
pub mod db;
pub mod display;
pub mod error;
pub mod locks;
pub mod models;
pub mod params;
pub mod planner;
pub mod proposal;
pub mod templates;

pub use advice::{AdviceContext, AdviceError, AdviceService, StaticAdvice};
pub use db::Database;
pub use display::{CreateResult, LocalDateTime, OperationStatus, PlanSummaries, UpdateResult};
pub use error::{PlannerError, Result};
pub use locks::LockState;
pub use models::{
    Activity, ActivityType, Day, ExternalActivity, Plan, PlanFilter, PlanStatus, PlanSummary, Week,
};
pub use params::{
    ApplyProposal, CreatePlan, Id, ImportTemplate, ListPlans, LogActivity, MarkDayDone,
    PreviewProposal, PreviewSuppliedProposal, RecordExternalActivity, SetRaceDate,
};
pub use planner::{Planner, PlannerBuilder};
pub use proposal::{ApplyOutcome, Change, Proposal, ProposalPreview};
