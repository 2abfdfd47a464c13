//! Display implementations for domain models.
//!
//! Plans render as markdown: one section per week with its resolved dates
//! (or `unscheduled`), one line per day with its derived date, and a lock
//! marker on days the athlete has already executed.

use std::fmt;

use super::datetime::{weekday_name, DateRange, LocalDateTime, MaybeDate};
use crate::{
    calendar::{day_date, week_dates},
    locks::LockState,
    models::{Activity, Day, ExternalActivity, Plan, PlanStatus, PlanSummary},
    proposal::{ActivityPatch, Change},
};

const LOCK_ICON: &str = "🔒";

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.title)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Race date: {}", MaybeDate(self.race_date))?;
        writeln!(f, "- Weeks: {}", self.week_count)?;
        if let Some(athlete) = &self.athlete {
            writeln!(f, "- Athlete: {athlete}")?;
        }
        if let Some(owner) = &self.owner {
            writeln!(f, "- Owner: {owner}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if self.weeks.is_empty() {
            return writeln!(f, "\nNo weeks in this plan.");
        }

        let locks = LockState::from_plan(self);
        for week in &self.weeks {
            let dates = week_dates(self, week);
            writeln!(f)?;
            writeln!(f, "## Week {} ({})", week.week_index, DateRange(dates))?;
            writeln!(f)?;

            for day in &week.days {
                let date = day_date(dates.start_date, day.day_of_week);
                write!(f, "### {}", weekday_name(day.day_of_week))?;
                if let Some(date) = date {
                    write!(f, " {date}")?;
                }
                write!(f, " (day {})", day.id)?;
                if locks.is_day_locked(day.id) {
                    write!(f, " {LOCK_ICON}")?;
                }
                writeln!(f)?;

                if let Some(notes) = &day.notes {
                    writeln!(f, "_{notes}_")?;
                }
                for activity in &day.activities {
                    write!(f, "{activity}")?;
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} (day {})", weekday_name(self.day_of_week), self.id)?;
        if let Some(notes) = &self.notes {
            writeln!(f, "_{notes}_")?;
        }
        for activity in &self.activities {
            write!(f, "{activity}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = if self.completed { "✓" } else { "○" };
        write!(
            f,
            "- {icon} {}. {} ({}",
            self.id,
            self.title,
            self.activity_type.as_str()
        )?;
        if let Some(distance) = self.distance {
            write!(f, ", {distance}")?;
            if let Some(unit) = self.distance_unit {
                write!(f, " {}", unit.label())?;
            }
        }
        if let Some(minutes) = self.duration_minutes {
            write!(f, ", {minutes} min")?;
        }
        write!(f, ")")?;
        if self.must_do {
            write!(f, " must-do")?;
        }
        writeln!(f)?;

        if let Some(pace) = &self.pace_target {
            writeln!(f, "  - Pace: {pace}")?;
        }
        if let Some(effort) = &self.effort_target {
            writeln!(f, "  - Effort: {effort}")?;
        }
        if let Some(notes) = &self.notes {
            writeln!(f, "  - Notes: {notes}")?;
        }
        if self.completed {
            let mut actuals = Vec::new();
            if let Some(distance) = self.actual_distance {
                actuals.push(format!("{distance}"));
            }
            if let Some(minutes) = self.actual_duration_minutes {
                actuals.push(format!("{minutes} min"));
            }
            if let Some(pace) = &self.actual_pace {
                actuals.push(pace.clone());
            }
            if !actuals.is_empty() {
                writeln!(f, "  - Actual: {}", actuals.join(", "))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_activities > 0 {
            format!(" ({}/{})", self.completed_activities, self.total_activities)
        } else {
            String::new()
        };

        writeln!(f, "## {} (ID: {}){progress}", self.title, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Status**: {}", self.status)?;
        writeln!(f, "- **Race date**: {}", MaybeDate(self.race_date))?;
        writeln!(f, "- **Weeks**: {}", self.week_count)?;
        if let Some(athlete) = &self.athlete {
            writeln!(f, "- **Athlete**: {athlete}")?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for ExternalActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} recorded for plan {}",
            self.provider, self.external_id, self.plan_id
        )?;
        match self.matched_activity_id {
            Some(id) => writeln!(f, ", matched to activity {id}"),
            None => writeln!(f, ", unmatched"),
        }
    }
}

fn patch_fields(patch: &ActivityPatch) -> Vec<String> {
    let mut fields = Vec::new();
    if let Some(activity_type) = patch.activity_type {
        fields.push(format!("type {}", activity_type.as_str()));
    }
    if let Some(title) = &patch.title {
        fields.push(format!("title \"{title}\""));
    }
    if let Some(minutes) = patch.duration_minutes {
        fields.push(format!("{minutes} min"));
    }
    if let Some(distance) = patch.distance {
        match patch.distance_unit {
            Some(unit) => fields.push(format!("{distance} {}", unit.label())),
            None => fields.push(format!("distance {distance}")),
        }
    } else if let Some(unit) = patch.distance_unit {
        fields.push(format!("unit {}", unit.label()));
    }
    if let Some(pace) = &patch.pace_target {
        fields.push(format!("pace {pace}"));
    }
    if let Some(effort) = &patch.effort_target {
        fields.push(format!("effort {effort}"));
    }
    if let Some(priority) = patch.priority {
        fields.push(format!("priority {}", priority.as_str()));
    }
    if let Some(must_do) = patch.must_do {
        fields.push(format!("must-do {must_do}"));
    }
    if let Some(bail_allowed) = patch.bail_allowed {
        fields.push(format!("bail allowed {bail_allowed}"));
    }
    if patch.notes.is_some() {
        fields.push("notes".to_string());
    }
    fields
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::MoveActivity {
                activity_id,
                target_day_id,
                ..
            } => write!(f, "Move activity {activity_id} to day {target_day_id}")?,
            Change::EditActivity {
                activity_id, patch, ..
            } => {
                write!(f, "Edit activity {activity_id}")?;
                let fields = patch_fields(patch);
                if !fields.is_empty() {
                    write!(f, ": {}", fields.join(", "))?;
                }
            }
            Change::AddActivity {
                day_id,
                activity_type,
                title,
                patch,
                ..
            } => {
                write!(
                    f,
                    "Add {} \"{title}\" on day {day_id}",
                    activity_type.as_str()
                )?;
                let fields = patch_fields(patch);
                if !fields.is_empty() {
                    write!(f, " ({})", fields.join(", "))?;
                }
            }
            Change::DeleteActivity { activity_id, .. } => {
                write!(f, "Delete activity {activity_id}")?
            }
            Change::ExtendPlan { new_start_date, .. } => {
                write!(f, "Extend plan to start on {new_start_date}")?
            }
        }
        write!(f, " ({})", self.reason())
    }
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, Timestamp};

    use super::*;
    use crate::models::{ActivityType, DistanceUnit, Priority, Week};

    fn activity(id: u64, day_id: u64, completed: bool) -> Activity {
        Activity {
            id,
            plan_id: 1,
            day_id,
            activity_type: ActivityType::Run,
            title: "Easy run".to_string(),
            duration_minutes: Some(45),
            distance: Some(5.0),
            distance_unit: Some(DistanceUnit::Miles),
            pace_target: None,
            effort_target: None,
            notes: None,
            priority: Priority::Medium,
            must_do: false,
            bail_allowed: false,
            completed,
            actual_distance: completed.then_some(5.2),
            actual_duration_minutes: None,
            actual_pace: None,
        }
    }

    fn plan(race_date: Option<jiff::civil::Date>) -> Plan {
        let days = (1..=7)
            .map(|dow| Day {
                id: 10 + u64::from(dow),
                week_id: 1,
                day_of_week: dow,
                raw_text: None,
                notes: None,
                activities: match dow {
                    1 => vec![activity(100, 11, true)],
                    3 => vec![activity(101, 13, false)],
                    _ => vec![],
                },
            })
            .collect();

        Plan {
            id: 1,
            title: "Spring Half".to_string(),
            status: PlanStatus::Active,
            race_date,
            week_count: 1,
            source_id: None,
            owner: None,
            athlete: None,
            created_at: Timestamp::from_second(1767225600).unwrap(),
            updated_at: Timestamp::from_second(1767225600).unwrap(),
            weeks: vec![Week {
                id: 1,
                plan_id: 1,
                week_index: 1,
                start_date: None,
                end_date: None,
                days,
            }],
        }
    }

    #[test]
    fn test_plan_display_with_race_date() {
        let output = plan(Some(date(2026, 4, 19))).to_string();
        assert!(output.contains("# 1. Spring Half"));
        assert!(output.contains("## Week 1 (2026-04-13 to 2026-04-19)"));
        assert!(output.contains("### Mon 2026-04-13 (day 11) 🔒"));
        assert!(output.contains("### Wed 2026-04-15 (day 13)\n"));
        assert!(output.contains("- ✓ 100. Easy run (RUN, 5 mi, 45 min)"));
        assert!(output.contains("  - Actual: 5.2"));
        assert!(output.contains("- ○ 101. Easy run"));
    }

    #[test]
    fn test_plan_display_unscheduled() {
        let output = plan(None).to_string();
        assert!(output.contains("- Race date: none"));
        assert!(output.contains("## Week 1 (unscheduled)"));
        assert!(output.contains("### Mon (day 11) 🔒"));
    }

    #[test]
    fn test_change_display() {
        let change = Change::EditActivity {
            activity_id: 7,
            reason: "knee soreness".to_string(),
            patch: ActivityPatch {
                distance: Some(3.0),
                distance_unit: Some(DistanceUnit::Miles),
                ..Default::default()
            },
        };
        assert_eq!(
            change.to_string(),
            "Edit activity 7: 3 mi (knee soreness)"
        );

        let extend = Change::ExtendPlan {
            new_start_date: date(2026, 1, 5),
            reason: "more base".to_string(),
        };
        assert_eq!(
            extend.to_string(),
            "Extend plan to start on 2026-01-05 (more base)"
        );
    }
}
