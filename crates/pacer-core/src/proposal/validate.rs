//! Strict validation of untrusted proposals.
//!
//! Validation fails closed: one unknown field, unknown `op`, wrong type or
//! out-of-range number rejects the whole proposal. Free text is trimmed and
//! clamped to its length bound rather than rejected.

use jiff::civil::Date;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};

use super::{ActivityPatch, Change, Confidence, Proposal};
use crate::{
    error::{PlannerError, Result},
    models::{ActivityType, DistanceUnit, Priority},
};

pub const MAX_CHANGES: usize = 12;
pub const MAX_RISK_FLAGS: usize = 6;
pub const MAX_COACH_REPLY_CHARS: usize = 2000;
pub const MAX_SUMMARY_CHARS: usize = 600;
pub const MAX_RISK_FLAG_CHARS: usize = 120;
pub const MAX_FOLLOW_UP_CHARS: usize = 300;
pub const MAX_REASON_CHARS: usize = 400;
pub const MAX_TITLE_CHARS: usize = 120;
pub const MAX_TARGET_CHARS: usize = 80;
pub const MAX_NOTES_CHARS: usize = 1000;
pub const MAX_DURATION_MINUTES: f64 = 600.0;
pub const MAX_DISTANCE: f64 = 200.0;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawProposal {
    coach_reply: String,
    summary: String,
    confidence: Confidence,
    #[serde(default)]
    risk_flags: Option<Vec<String>>,
    #[serde(default)]
    follow_up_question: Option<String>,
    changes: Vec<Value>,
}

/// Optional planning fields shared by `edit_activity` and `add_activity`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawFields {
    #[serde(default, rename = "type")]
    activity_type: Option<ActivityType>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    distance_unit: Option<DistanceUnit>,
    #[serde(default)]
    pace_target: Option<String>,
    #[serde(default)]
    effort_target: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    must_do: Option<bool>,
    #[serde(default)]
    bail_allowed: Option<bool>,
    #[serde(default)]
    priority: Option<Priority>,
}

/// Trim and clamp free text to `max` characters.
pub(crate) fn clamp_text(text: &str, max: usize) -> String {
    let clamped: String = text.trim().chars().take(max).collect();
    clamped.trim_end().to_string()
}

/// Clamp optional text; blank text counts as absent.
fn clamp_optional(text: Option<String>, max: usize) -> Option<String> {
    text.map(|t| clamp_text(&t, max)).filter(|t| !t.is_empty())
}

fn required_text(text: &str, max: usize, what: &str) -> Result<String> {
    let clamped = clamp_text(text, max);
    if clamped.is_empty() {
        return Err(PlannerError::invalid_proposal(format!("{what} must not be empty")));
    }
    Ok(clamped)
}

/// Validate an untrusted proposal value into a typed [`Proposal`].
///
/// # Errors
///
/// Returns `PlannerError::InvalidProposalShape` describing the first
/// violation found.
pub fn validate_proposal(value: &Value) -> Result<Proposal> {
    if !value.is_object() {
        return Err(PlannerError::invalid_proposal("proposal must be a JSON object"));
    }

    let raw: RawProposal = serde_json::from_value(value.clone())
        .map_err(|e| PlannerError::invalid_proposal(e.to_string()))?;

    if raw.changes.len() > MAX_CHANGES {
        return Err(PlannerError::invalid_proposal(format!(
            "at most {MAX_CHANGES} changes are allowed, got {}",
            raw.changes.len()
        )));
    }

    let risk_flags = raw.risk_flags.unwrap_or_default();
    if risk_flags.len() > MAX_RISK_FLAGS {
        return Err(PlannerError::invalid_proposal(format!(
            "at most {MAX_RISK_FLAGS} risk flags are allowed, got {}",
            risk_flags.len()
        )));
    }
    let risk_flags = risk_flags
        .iter()
        .map(|flag| clamp_text(flag, MAX_RISK_FLAG_CHARS))
        .filter(|flag| !flag.is_empty())
        .collect();

    let changes = raw
        .changes
        .iter()
        .enumerate()
        .map(|(index, change)| parse_change(index, change))
        .collect::<Result<Vec<_>>>()?;

    Ok(Proposal {
        coach_reply: required_text(&raw.coach_reply, MAX_COACH_REPLY_CHARS, "coachReply")?,
        summary: required_text(&raw.summary, MAX_SUMMARY_CHARS, "summary")?,
        confidence: raw.confidence,
        risk_flags,
        follow_up_question: clamp_optional(raw.follow_up_question, MAX_FOLLOW_UP_CHARS),
        changes,
    })
}

/// Cursor over the fields of one change object. Every field must be consumed
/// exactly once; leftovers are rejected as unknown.
struct ChangeFields {
    index: usize,
    op: String,
    fields: Map<String, Value>,
}

impl ChangeFields {
    fn error(&self, message: impl std::fmt::Display) -> PlannerError {
        PlannerError::invalid_proposal(format!(
            "change #{} ({}): {message}",
            self.index + 1,
            self.op
        ))
    }

    fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<T> {
        let value = self
            .fields
            .remove(key)
            .ok_or_else(|| self.error(format!("missing field `{key}`")))?;
        serde_json::from_value(value).map_err(|e| self.error(format!("field `{key}`: {e}")))
    }

    fn reason(&mut self) -> Result<String> {
        let reason: String = self.take("reason")?;
        let reason = clamp_text(&reason, MAX_REASON_CHARS);
        if reason.is_empty() {
            return Err(self.error("`reason` must not be empty"));
        }
        Ok(reason)
    }

    fn finish(self) -> Result<()> {
        match self.fields.keys().next() {
            Some(key) => Err(self.error(format!("unknown field `{key}`"))),
            None => Ok(()),
        }
    }

    /// Consume every remaining field as optional activity fields.
    fn into_patch(mut self) -> Result<ActivityPatch> {
        let rest = Value::Object(std::mem::take(&mut self.fields));
        let raw: RawFields =
            serde_json::from_value(rest).map_err(|e| self.error(e.to_string()))?;

        let duration_minutes = match raw.duration {
            Some(d) if !d.is_finite() || !(0.0..=MAX_DURATION_MINUTES).contains(&d) => {
                return Err(self.error(format!(
                    "`duration` must be between 0 and {MAX_DURATION_MINUTES} minutes"
                )));
            }
            Some(d) => Some(d.round() as u32),
            None => None,
        };

        if let Some(distance) = raw.distance {
            if !distance.is_finite() || !(0.0..=MAX_DISTANCE).contains(&distance) {
                return Err(self.error(format!("`distance` must be between 0 and {MAX_DISTANCE}")));
            }
        }

        let title = match raw.title {
            Some(title) => {
                let title = clamp_text(&title, MAX_TITLE_CHARS);
                if title.is_empty() {
                    return Err(self.error("`title` must not be empty"));
                }
                Some(title)
            }
            None => None,
        };

        Ok(ActivityPatch {
            activity_type: raw.activity_type,
            title,
            duration_minutes,
            distance: raw.distance,
            distance_unit: raw.distance_unit,
            pace_target: clamp_optional(raw.pace_target, MAX_TARGET_CHARS),
            effort_target: clamp_optional(raw.effort_target, MAX_TARGET_CHARS),
            notes: clamp_optional(raw.notes, MAX_NOTES_CHARS),
            must_do: raw.must_do,
            bail_allowed: raw.bail_allowed,
            priority: raw.priority,
        })
    }
}

fn parse_change(index: usize, value: &Value) -> Result<Change> {
    let Some(object) = value.as_object() else {
        return Err(PlannerError::invalid_proposal(format!(
            "change #{} must be a JSON object",
            index + 1
        )));
    };

    let mut fields = object.clone();
    let op = match fields.remove("op") {
        Some(Value::String(op)) => op,
        _ => {
            return Err(PlannerError::invalid_proposal(format!(
                "change #{} is missing a string `op`",
                index + 1
            )));
        }
    };

    let mut cursor = ChangeFields {
        index,
        op: op.clone(),
        fields,
    };

    let change = match op.as_str() {
        "move_activity" => {
            let activity_id = cursor.take("activityId")?;
            let target_day_id = cursor.take("targetDayId")?;
            let reason = cursor.reason()?;
            cursor.finish()?;
            Change::MoveActivity {
                activity_id,
                target_day_id,
                reason,
            }
        }
        "edit_activity" => {
            let activity_id = cursor.take("activityId")?;
            let reason = cursor.reason()?;
            let patch = cursor.into_patch()?;
            Change::EditActivity {
                activity_id,
                reason,
                patch,
            }
        }
        "add_activity" => {
            let day_id = cursor.take("dayId")?;
            let reason = cursor.reason()?;
            let mut patch = cursor.into_patch()?;
            let activity_type = patch.activity_type.take().ok_or_else(|| {
                PlannerError::invalid_proposal(format!(
                    "change #{} (add_activity): missing field `type`",
                    index + 1
                ))
            })?;
            let title = patch.title.take().ok_or_else(|| {
                PlannerError::invalid_proposal(format!(
                    "change #{} (add_activity): missing field `title`",
                    index + 1
                ))
            })?;
            Change::AddActivity {
                day_id,
                activity_type,
                title,
                reason,
                patch,
            }
        }
        "delete_activity" => {
            let activity_id = cursor.take("activityId")?;
            let reason = cursor.reason()?;
            cursor.finish()?;
            Change::DeleteActivity {
                activity_id,
                reason,
            }
        }
        "extend_plan" => {
            let raw_date: String = cursor.take("newStartDate")?;
            let new_start_date = raw_date
                .trim()
                .parse::<Date>()
                .map_err(|e| cursor.error(format!("`newStartDate` is not a date: {e}")))?;
            let reason = cursor.reason()?;
            cursor.finish()?;
            Change::ExtendPlan {
                new_start_date,
                reason,
            }
        }
        other => {
            return Err(PlannerError::invalid_proposal(format!(
                "change #{}: unknown op `{other}`",
                index + 1
            )));
        }
    };

    Ok(change)
}
