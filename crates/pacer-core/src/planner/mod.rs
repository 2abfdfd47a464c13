//! High-level planner API for training plans and proposals.
//!
//! The [`Planner`] is the entry point for every interface (CLI and MCP). It
//! validates parameters, runs blocking SQLite work on the tokio blocking pool
//! and talks to the advice service.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Interfaces    │    │     Planner     │    │    Database     │
//! │  (CLI, MCP)     │───▶│ (params, async, │───▶│   (via db/)     │
//! │                 │    │  advice calls)  │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for [`Planner`] instances
//! - [`plan_ops`]: Plan creation, import, listing and lifecycle
//! - [`log_ops`]: Athlete logging
//! - [`proposal_ops`]: Proposal preview and apply
//!
//! # Usage
//!
//! ```rust,no_run
//! use pacer_core::{params::{CreatePlan, ListPlans}, PlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("/tmp/pacer.db"))
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
//!
//! let summaries = planner.list_plans_summary(&ListPlans::default()).await?;
//! assert_eq!(summaries.0[0].id, plan.id);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tokio::task;

use crate::{
    db::Database,
    error::{PlannerError, Result},
};

pub mod builder;
pub mod log_ops;
pub mod plan_ops;
pub mod proposal_ops;


pub use builder::PlannerBuilder;

/// Main planner interface for managing plans and proposals.
pub struct Planner {
    pub(crate) db_path: PathBuf,
}

impl Planner {
    /// Creates a new planner with the specified database path.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Path of the SQLite database this planner works on.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Run `f` against a fresh connection on the blocking pool.
    async fn with_database<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
