//! Result wrapper types for displaying operation outcomes.
//!
//! Also home to the `Display` implementations of proposal previews and
//! apply outcomes, which are results rather than stored models.

use std::fmt;

use crate::{
    models::{Activity, Day, Plan},
    proposal::{ApplyOutcome, DroppedChange, ProposalPreview},
};

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use pacer_core::{
///     display::CreateResult,
///     models::{Plan, PlanStatus},
/// };
/// use jiff::Timestamp;
///
/// let plan = Plan {
///     id: 1,
///     title: "Spring Half".to_string(),
///     status: PlanStatus::Draft,
///     race_date: None,
///     week_count: 0,
///     source_id: None,
///     owner: None,
///     athlete: None,
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
///     weeks: vec![],
/// };
///
/// let output = CreateResult::new(plan).to_string();
/// assert!(output.starts_with("Created plan with ID: 1"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created plan with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, with an
/// optional list of what changed.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }

    fn fmt_changes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for UpdateResult<Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated plan with ID: {}", self.resource.id)?;
        self.fmt_changes(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<Activity> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated activity with ID: {}", self.resource.id)?;
        self.fmt_changes(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<Day> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated day with ID: {}", self.resource.id)?;
        self.fmt_changes(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for DroppedChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}: {}", self.index + 1, self.change, self.reason)
    }
}

impl fmt::Display for ProposalPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let proposal = &self.proposal;
        let applicable = &self.sanitized.proposal;

        writeln!(f, "# Proposal for plan {}", self.plan_id)?;
        writeln!(f)?;
        writeln!(f, "{}", proposal.coach_reply)?;
        writeln!(f)?;
        writeln!(f, "- **Summary**: {}", applicable.summary)?;
        writeln!(f, "- **Confidence**: {}", proposal.confidence.as_str())?;
        if !proposal.risk_flags.is_empty() {
            writeln!(f, "- **Risk flags**: {}", proposal.risk_flags.join(", "))?;
        }
        if let Some(question) = &proposal.follow_up_question {
            writeln!(f, "- **Follow-up**: {question}")?;
        }

        writeln!(f)?;
        if applicable.changes.is_empty() {
            writeln!(f, "No changes can be applied.")?;
        } else {
            writeln!(f, "## Changes")?;
            writeln!(f)?;
            for (position, change) in applicable.changes.iter().enumerate() {
                writeln!(f, "{}. {change}", position + 1)?;
            }
        }

        if !self.sanitized.dropped.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Skipped")?;
            writeln!(f)?;
            for dropped in &self.sanitized.dropped {
                writeln!(f, "- {dropped}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Applied {} change(s) to plan {}",
            self.applied_count, self.plan_id
        )?;
        if self.extended_weeks > 0 {
            writeln!(f, "Added {} lead-in week(s)", self.extended_weeks)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.summary)?;

        if !self.notes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Notes:")?;
            for note in &self.notes {
                writeln!(f, "- {note}")?;
            }
        }
        if !self.dropped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped:")?;
            for dropped in &self.dropped {
                writeln!(f, "- {dropped}")?;
            }
        }
        Ok(())
    }
}
