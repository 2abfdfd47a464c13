//! Boundary to the external advice service that drafts proposals.
//!
//! The service receives an [`AdviceContext`] and answers with untrusted JSON.
//! Nothing it returns is applied without going through
//! [`crate::proposal::validate_proposal`] and the sanitizer first.

use std::future::Future;

use jiff::civil::Date;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::{
    calendar::{day_date, week_dates},
    locks::LockState,
    models::{Activity, Plan, PlanStatus},
};

/// Failure reported by an advice service.
#[derive(Error, Debug)]
pub enum AdviceError {
    /// The service could not be reached or refused to answer
    #[error("advice service unavailable: {0}")]
    Unavailable(String),
    /// The service answered with something that is not JSON
    #[error("advice service returned malformed output: {0}")]
    Malformed(String),
}

/// A day as the advice service sees it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextDay {
    pub day_id: u64,
    pub day_of_week: u8,
    /// `None` when the week is unscheduled
    pub date: Option<Date>,
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub activities: Vec<Activity>,
}

/// A week with its resolved bounds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextWeek {
    pub week_id: u64,
    pub week_index: u32,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub days: Vec<ContextDay>,
}

/// Everything the advice service is told about a plan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceContext {
    pub plan_id: u64,
    pub title: String,
    pub status: PlanStatus,
    pub race_date: Option<Date>,
    pub today: Date,
    /// Days the service must not touch, ascending
    pub locked_day_ids: Vec<u64>,
    pub weeks: Vec<ContextWeek>,
    /// What the athlete asked for
    pub feedback: String,
}

impl AdviceContext {
    /// Snapshot `plan` with resolved dates and current lock state.
    pub fn from_plan(plan: &Plan, locks: &LockState, today: Date, feedback: &str) -> Self {
        let weeks = plan
            .weeks
            .iter()
            .map(|week| {
                let dates = week_dates(plan, week);
                ContextWeek {
                    week_id: week.id,
                    week_index: week.week_index,
                    start_date: dates.start_date,
                    end_date: dates.end_date,
                    days: week
                        .days
                        .iter()
                        .map(|day| ContextDay {
                            day_id: day.id,
                            day_of_week: day.day_of_week,
                            date: day_date(dates.start_date, day.day_of_week),
                            locked: locks.is_day_locked(day.id),
                            notes: day.notes.clone(),
                            activities: day.activities.clone(),
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            plan_id: plan.id,
            title: plan.title.clone(),
            status: plan.status,
            race_date: plan.race_date,
            today,
            locked_day_ids: locks.locked_days(),
            weeks,
            feedback: feedback.to_string(),
        }
    }
}

/// A source of draft proposals.
pub trait AdviceService {
    /// Draft a proposal for the plan described by `context`.
    fn propose(
        &self,
        context: &AdviceContext,
    ) -> impl Future<Output = Result<Value, AdviceError>> + Send;
}

/// Advice service that always answers with the same response.
#[derive(Debug, Clone)]
pub struct StaticAdvice {
    response: Result<Value, String>,
}

impl StaticAdvice {
    /// Always propose `proposal`.
    pub fn new(proposal: Value) -> Self {
        Self {
            response: Ok(proposal),
        }
    }

    /// Always fail as unavailable.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            response: Err(reason.into()),
        }
    }
}

impl AdviceService for StaticAdvice {
    async fn propose(&self, _context: &AdviceContext) -> Result<Value, AdviceError> {
        self.response.clone().map_err(AdviceError::Unavailable)
    }
}
