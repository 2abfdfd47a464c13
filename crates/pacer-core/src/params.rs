//! Parameter structures shared by the CLI and MCP interfaces.
//!
//! These are the untyped shapes callers send (dates as `YYYY-MM-DD` strings,
//! statuses as lowercase names). Each one validates into the typed values the
//! planner works with, so both interfaces reject bad input the same way.
//!
//! JSON schemas for the MCP server are derived only with the `schema`
//! feature:
//!
//! ```ignore
//! // In pacer-cli/src/mcp/handlers.rs
//! #[tool(name = "show_plan", description = "...")]
//! async fn show_plan(&self, Parameters(params): Parameters<Id>) -> Result<CallToolResult, McpError>
//! ```

use jiff::civil::{Date, Weekday};
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{PlannerError, Result},
    models::{ActivityLog, NewPlan, PlanFilter, PlanStatus},
    proposal::validate::{clamp_text, MAX_NOTES_CHARS, MAX_TARGET_CHARS, MAX_TITLE_CHARS},
};

/// Longest athlete feedback accepted for a preview.
pub const MAX_FEEDBACK_CHARS: usize = 2000;

/// Longest plan a caller may create in one go.
pub const MAX_WEEK_COUNT: u32 = 52;

/// Parse a `YYYY-MM-DD` date supplied for `field`.
pub fn parse_date(field: &str, value: &str) -> Result<Date> {
    value.trim().parse::<Date>().map_err(|e| {
        PlannerError::invalid_input(field).with_reason(format!("'{value}' is not a date: {e}"))
    })
}

fn optional_date(field: &str, value: Option<&str>) -> Result<Option<Date>> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| parse_date(field, v))
        .transpose()
}

/// Parse the two ways a plan is anchored to the calendar: a race date that
/// the final week ends on, or a Monday that week 1 starts on.
fn plan_anchor(
    race_date: Option<&str>,
    start_date: Option<&str>,
) -> Result<(Option<Date>, Option<Date>)> {
    let race_date = optional_date("race_date", race_date)?;
    let start_date = optional_date("start_date", start_date)?;
    if race_date.is_some() && start_date.is_some() {
        return Err(PlannerError::invalid_input("start_date")
            .with_reason("Give either a race date or a start date, not both"));
    }
    if let Some(start) = start_date {
        if start.weekday() != Weekday::Monday {
            return Err(PlannerError::invalid_input("start_date")
                .with_reason(format!("{start} is a {:?}, weeks start on Monday", start.weekday())));
        }
    }
    Ok((race_date, start_date))
}

fn optional_text(value: Option<&str>, max: usize) -> Option<String> {
    value.map(|v| clamp_text(v, max)).filter(|v| !v.is_empty())
}

/// Generic parameters for operations requiring just an ID.
///
/// Used for show_plan, publish_plan, archive_plan and unarchive_plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a new plan with empty weeks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreatePlan {
    /// Title of the plan (required)
    pub title: String,
    /// Race date (YYYY-MM-DD) the final week ends on
    pub race_date: Option<String>,
    /// Monday (YYYY-MM-DD) week 1 starts on; stores fixed week dates instead
    /// of counting back from a race date
    pub start_date: Option<String>,
    /// Number of empty weeks to create
    pub week_count: u32,
    /// Coach or account owning the plan
    pub owner: Option<String>,
    /// Athlete the plan is written for
    pub athlete: Option<String>,
}

impl CreatePlan {
    /// Validate into a [`NewPlan`].
    ///
    /// # Errors
    ///
    /// * `PlannerError::InvalidInput` - blank title, bad dates, both a race
    ///   date and a start date, or more than [`MAX_WEEK_COUNT`] weeks
    pub fn validate(&self) -> Result<NewPlan> {
        let title = clamp_text(&self.title, MAX_TITLE_CHARS);
        if title.is_empty() {
            return Err(PlannerError::invalid_input("title").with_reason("Title must not be empty"));
        }
        if self.week_count > MAX_WEEK_COUNT {
            return Err(PlannerError::invalid_input("week_count").with_reason(format!(
                "A plan can have at most {MAX_WEEK_COUNT} weeks, got {}",
                self.week_count
            )));
        }

        let (race_date, start_date) =
            plan_anchor(self.race_date.as_deref(), self.start_date.as_deref())?;

        Ok(NewPlan {
            title,
            race_date,
            start_date,
            week_count: self.week_count,
            owner: optional_text(self.owner.as_deref(), MAX_TITLE_CHARS),
            athlete: optional_text(self.athlete.as_deref(), MAX_TITLE_CHARS),
        })
    }
}

/// Parameters for importing a weekly-grid template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ImportTemplate {
    /// Template JSON as produced by the PDF table extractor
    pub template_json: String,
    /// Plan title; defaults to the template's program name
    pub title: Option<String>,
    /// Race date (YYYY-MM-DD) the final week ends on
    pub race_date: Option<String>,
    /// Monday (YYYY-MM-DD) week 1 starts on, as an alternative to a race date
    pub start_date: Option<String>,
}

impl ImportTemplate {
    /// Race date and start date, at most one of them set.
    ///
    /// # Errors
    ///
    /// * `PlannerError::InvalidInput` - bad dates, a start date that is not a
    ///   Monday, or both dates given
    pub fn anchor(&self) -> Result<(Option<Date>, Option<Date>)> {
        plan_anchor(self.race_date.as_deref(), self.start_date.as_deref())
    }
}

/// Parameters for listing plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListPlans {
    /// Include archived plans
    #[serde(default)]
    pub archived: bool,
    /// Only plans with this status ('draft', 'active' or 'archived')
    pub status: Option<String>,
}

impl ListPlans {
    /// Validate into a [`PlanFilter`].
    pub fn validate(&self) -> Result<PlanFilter> {
        match self.status.as_deref() {
            Some(status) => {
                let status = status.parse::<PlanStatus>().map_err(|e| {
                    PlannerError::invalid_input("status")
                        .with_reason(format!("{e}. Must be 'draft', 'active' or 'archived'"))
                })?;
                Ok(PlanFilter::with_status(status))
            }
            None => Ok(PlanFilter {
                status: None,
                include_archived: self.archived,
            }),
        }
    }
}

/// Parameters for setting or clearing a plan's race date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SetRaceDate {
    /// Plan to update
    pub id: u64,
    /// New race date (YYYY-MM-DD); omit to clear it
    pub race_date: Option<String>,
}

impl SetRaceDate {
    pub fn validate(&self) -> Result<Option<Date>> {
        optional_date("race_date", self.race_date.as_deref())
    }
}

/// Parameters for logging an activity as executed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct LogActivity {
    /// Activity that was executed
    pub activity_id: u64,
    /// Distance actually covered, in the activity's unit
    pub actual_distance: Option<f64>,
    /// Minutes actually spent
    pub actual_duration: Option<u32>,
    /// Pace actually run, free text
    pub actual_pace: Option<String>,
}

impl LogActivity {
    /// Validate into an [`ActivityLog`].
    pub fn validate(&self) -> Result<ActivityLog> {
        if let Some(distance) = self.actual_distance {
            if !distance.is_finite() || distance < 0.0 {
                return Err(PlannerError::invalid_input("actual_distance")
                    .with_reason("Distance must be a non-negative number"));
            }
        }

        Ok(ActivityLog {
            actual_distance: self.actual_distance,
            actual_duration_minutes: self.actual_duration,
            actual_pace: optional_text(self.actual_pace.as_deref(), MAX_TARGET_CHARS),
        })
    }
}

/// Parameters for marking a whole day done by hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct MarkDayDone {
    pub day_id: u64,
}

/// Parameters for recording a workout imported from another provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RecordExternalActivity {
    pub plan_id: u64,
    /// Provider name, e.g. "strava"
    pub provider: String,
    /// Identifier of the workout at the provider
    pub external_id: String,
    /// Planned activity the workout corresponds to
    pub matched_activity_id: Option<u64>,
}

impl RecordExternalActivity {
    /// Trimmed `(provider, external_id)`.
    pub fn validate(&self) -> Result<(String, String)> {
        let provider = clamp_text(&self.provider, MAX_TARGET_CHARS);
        let external_id = clamp_text(&self.external_id, MAX_NOTES_CHARS);
        if provider.is_empty() {
            return Err(PlannerError::invalid_input("provider").with_reason("Provider must not be empty"));
        }
        if external_id.is_empty() {
            return Err(PlannerError::invalid_input("external_id")
                .with_reason("External ID must not be empty"));
        }
        Ok((provider, external_id))
    }
}

/// Parameters for asking the advice service for a proposal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PreviewProposal {
    pub plan_id: u64,
    /// What the athlete wants changed, in their own words
    pub feedback: String,
}

impl PreviewProposal {
    /// Trimmed feedback.
    ///
    /// # Errors
    ///
    /// * `PlannerError::InvalidInput` - empty feedback or longer than
    ///   [`MAX_FEEDBACK_CHARS`]
    pub fn validate(&self) -> Result<String> {
        let feedback = self.feedback.trim();
        if feedback.is_empty() {
            return Err(PlannerError::invalid_input("feedback").with_reason("Feedback must not be empty"));
        }
        let length = feedback.chars().count();
        if length > MAX_FEEDBACK_CHARS {
            return Err(PlannerError::invalid_input("feedback").with_reason(format!(
                "Feedback can be at most {MAX_FEEDBACK_CHARS} characters, got {length}"
            )));
        }
        Ok(feedback.to_string())
    }
}

/// Parameters for previewing a proposal the caller already drafted.
///
/// The proposal is validated and sanitized exactly as if an advice service
/// had returned it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PreviewSuppliedProposal {
    pub plan_id: u64,
    /// What the athlete asked for, in their own words
    pub feedback: String,
    /// The drafted proposal object
    pub proposal: Value,
}

impl PreviewSuppliedProposal {
    /// Split into the preview request and the proposal to replay.
    pub fn into_parts(self) -> (PreviewProposal, Value) {
        (
            PreviewProposal {
                plan_id: self.plan_id,
                feedback: self.feedback,
            },
            self.proposal,
        )
    }
}

/// Parameters for applying a proposal returned by a preview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ApplyProposal {
    pub plan_id: u64,
    /// The proposal object, exactly as returned by the preview
    pub proposal: Value,
    /// Must be true; the caller confirms the athlete approved the changes
    #[serde(default)]
    pub confirmed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_plan_validate() {
        let params = CreatePlan {
            title: "  Spring Half  ".to_string(),
            race_date: Some("2026-04-19".to_string()),
            week_count: 12,
            owner: Some(" ".to_string()),
            athlete: Some("sam".to_string()),
            ..Default::default()
        };
        let plan = params.validate().unwrap();
        assert_eq!(plan.title, "Spring Half");
        assert_eq!(plan.race_date, Some(jiff::civil::date(2026, 4, 19)));
        assert_eq!(plan.owner, None);
        assert_eq!(plan.athlete.as_deref(), Some("sam"));
    }

    #[test]
    fn test_create_plan_rejects_bad_input() {
        let blank = CreatePlan {
            title: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            blank.validate(),
            Err(PlannerError::InvalidInput { field, .. }) if field == "title"
        ));

        let bad_date = CreatePlan {
            title: "Plan".to_string(),
            race_date: Some("April 19".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_date.validate(),
            Err(PlannerError::InvalidInput { field, .. }) if field == "race_date"
        ));

        let too_long = CreatePlan {
            title: "Plan".to_string(),
            week_count: 53,
            ..Default::default()
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_start_date_must_be_a_lone_monday() {
        let plan = CreatePlan {
            title: "Base".to_string(),
            start_date: Some("2026-01-05".to_string()),
            week_count: 4,
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(plan.start_date, Some(jiff::civil::date(2026, 1, 5)));
        assert_eq!(plan.race_date, None);

        let tuesday = ImportTemplate {
            start_date: Some("2026-01-06".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            tuesday.anchor(),
            Err(PlannerError::InvalidInput { field, .. }) if field == "start_date"
        ));

        let both = CreatePlan {
            title: "Base".to_string(),
            race_date: Some("2026-04-19".to_string()),
            start_date: Some("2026-01-05".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            both.validate(),
            Err(PlannerError::InvalidInput { field, .. }) if field == "start_date"
        ));
    }

    #[test]
    fn test_list_plans_validate() {
        let filter = ListPlans::default().validate().unwrap();
        assert_eq!(filter.status, None);
        assert!(!filter.include_archived);

        let filter = ListPlans {
            archived: false,
            status: Some("archived".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(filter.status, Some(PlanStatus::Archived));
        assert!(filter.include_archived);

        assert!(ListPlans {
            archived: false,
            status: Some("paused".to_string()),
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_preview_feedback_bounds() {
        let ok = PreviewProposal {
            plan_id: 1,
            feedback: "  my knee hurts  ".to_string(),
        };
        assert_eq!(ok.validate().unwrap(), "my knee hurts");

        let empty = PreviewProposal {
            plan_id: 1,
            feedback: " ".to_string(),
        };
        assert!(empty.validate().is_err());

        let long = PreviewProposal {
            plan_id: 1,
            feedback: "a".repeat(MAX_FEEDBACK_CHARS + 1),
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_log_activity_validate() {
        let params = LogActivity {
            activity_id: 3,
            actual_distance: Some(-1.0),
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = LogActivity {
            activity_id: 3,
            actual_distance: Some(5.2),
            actual_duration: Some(48),
            actual_pace: Some(" 9:15/mi ".to_string()),
        };
        let log = params.validate().unwrap();
        assert_eq!(log.actual_duration_minutes, Some(48));
        assert_eq!(log.actual_pace.as_deref(), Some("9:15/mi"));
    }

    #[test]
    fn test_set_race_date_clears_on_blank() {
        let params = SetRaceDate {
            id: 1,
            race_date: Some("".to_string()),
        };
        assert_eq!(params.validate().unwrap(), None);
    }
}
