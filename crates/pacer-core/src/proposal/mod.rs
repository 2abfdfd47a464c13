//! Structured calendar change proposals.
//!
//! A proposal arrives as untrusted JSON from the advice service (or from a
//! caller replaying a preview). It goes through three stages:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   validate      │    │    sanitize     │    │   db::apply     │
//! │ (JSON → typed)  │───▶│ (drop changes   │───▶│ (one IMMEDIATE  │
//! │  fails closed   │    │  on locked days)│    │  transaction)   │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! [`Change`] is a closed enum; validation, sanitization and application all
//! match on it exhaustively so a new kind of change cannot slip through one
//! of the stages unnoticed.
//!
//! The serialized form of a validated [`Proposal`] is accepted again by
//! [`validate_proposal`], so a preview can be handed back to apply as-is.

use jiff::civil::Date;
use serde::Serialize;

use crate::models::{ActivityType, DistanceUnit, Priority};

pub mod sanitize;
pub mod validate;

#[cfg(test)]
mod tests;

pub use sanitize::{sanitize, DroppedChange, SanitizedProposal};
pub use validate::validate_proposal;

/// How sure the advice service is about its proposal.
#[derive(Debug, Clone, Copy, Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

/// Optional planning fields carried by `edit_activity` and `add_activity`.
///
/// Only fields that are `Some` are written; execution state (completion and
/// actuals) is deliberately absent.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_unit: Option<DistanceUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_do: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bail_allowed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl ActivityPatch {
    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self == &ActivityPatch::default()
    }
}

/// One proposed calendar change.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Change {
    MoveActivity {
        activity_id: u64,
        target_day_id: u64,
        reason: String,
    },
    EditActivity {
        activity_id: u64,
        reason: String,
        #[serde(flatten)]
        patch: ActivityPatch,
    },
    AddActivity {
        day_id: u64,
        #[serde(rename = "type")]
        activity_type: ActivityType,
        title: String,
        reason: String,
        #[serde(flatten)]
        patch: ActivityPatch,
    },
    DeleteActivity {
        activity_id: u64,
        reason: String,
    },
    ExtendPlan {
        new_start_date: Date,
        reason: String,
    },
}

impl Change {
    /// Wire name of the operation.
    pub fn op(&self) -> &'static str {
        match self {
            Change::MoveActivity { .. } => "move_activity",
            Change::EditActivity { .. } => "edit_activity",
            Change::AddActivity { .. } => "add_activity",
            Change::DeleteActivity { .. } => "delete_activity",
            Change::ExtendPlan { .. } => "extend_plan",
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Change::MoveActivity { reason, .. }
            | Change::EditActivity { reason, .. }
            | Change::AddActivity { reason, .. }
            | Change::DeleteActivity { reason, .. }
            | Change::ExtendPlan { reason, .. } => reason,
        }
    }
}

/// A validated proposal.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub coach_reply: String,
    pub summary: String,
    pub confidence: Confidence,
    pub risk_flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_question: Option<String>,
    pub changes: Vec<Change>,
}

impl Proposal {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// What a preview returns to the caller: the proposal as validated, and the
/// version that would actually be applied right now.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalPreview {
    pub plan_id: u64,
    pub proposal: Proposal,
    pub sanitized: SanitizedProposal,
}

/// Result of a committed apply.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    pub plan_id: u64,
    /// Changes that actually mutated the calendar
    pub applied_count: usize,
    /// Lead-in weeks prepended by `extend_plan`, 0 when none
    pub extended_weeks: u32,
    /// Summary of the proposal as applied (annotated when changes were dropped)
    pub summary: String,
    /// Changes that were accepted but turned out to be no-ops, with the reason
    pub notes: Vec<String>,
    /// Changes removed by the commit-time sanitization
    pub dropped: Vec<DroppedChange>,
}
