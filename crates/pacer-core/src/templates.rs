//! Weekly-grid plan templates.
//!
//! Templates come from the PDF table extractor, which emits one JSON object
//! per plan:
//!
//! ```json
//! {
//!   "program_name": "Half Marathon Novice",
//!   "weeks": [
//!     {
//!       "week_number": 1,
//!       "days": {
//!         "monday": { "raw": "Rest", "type_guess": "rest", "metrics": {} },
//!         "tuesday": {
//!           "raw": "3 miles easy",
//!           "type_guess": "easy-run",
//!           "metrics": { "distance_value": 3.0, "distance_unit": "miles" }
//!         }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Extra keys the extractor writes (glossary, segment breakdowns, ranges) are
//! ignored. Each non-empty cell becomes one activity.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{
    error::{PlannerError, Result},
    models::{ActivityType, DistanceUnit},
};

const DAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

#[derive(Deserialize)]
struct RawTemplate {
    #[serde(default)]
    program_name: Option<String>,
    weeks: Vec<RawWeek>,
}

#[derive(Deserialize)]
struct RawWeek {
    week_number: u32,
    #[serde(default)]
    days: BTreeMap<String, RawCell>,
}

#[derive(Deserialize, Default)]
struct RawCell {
    #[serde(default)]
    raw: String,
    #[serde(default)]
    type_guess: Option<String>,
    #[serde(default)]
    metrics: RawMetrics,
}

#[derive(Deserialize, Default)]
struct RawMetrics {
    #[serde(default)]
    distance_value: Option<f64>,
    #[serde(default)]
    distance_unit: Option<String>,
    #[serde(default)]
    duration_minutes: Option<f64>,
}

/// A parsed template, weeks ordered by their number.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub program_name: Option<String>,
    pub weeks: Vec<TemplateWeek>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateWeek {
    pub week_number: u32,
    /// Only days present in the grid, Monday first
    pub days: Vec<TemplateDay>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDay {
    /// 1..=7, Monday = 1
    pub day_of_week: u8,
    pub raw_text: String,
    pub activity: Option<TemplateActivity>,
}

/// The single activity created for a non-empty cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateActivity {
    pub activity_type: ActivityType,
    pub title: String,
    pub distance: Option<f64>,
    pub distance_unit: Option<DistanceUnit>,
    pub duration_minutes: Option<u32>,
}

/// Map an extractor segment label to an activity type.
pub fn activity_type_for(type_guess: &str) -> ActivityType {
    match type_guess {
        "rest" => ActivityType::Rest,
        "strength" => ActivityType::Strength,
        "cross-training" => ActivityType::CrossTrain,
        "race" | "training-race" => ActivityType::Race,
        "hike" => ActivityType::Hike,
        _ => ActivityType::Run,
    }
}

fn title_for(type_guess: &str) -> &'static str {
    match type_guess {
        "rest" => "Rest",
        "race" => "Race",
        "training-race" => "Training race",
        "strength" => "Strength",
        "tempo" => "Tempo run",
        "hills" => "Hills",
        "hill-pyramid" => "Hill pyramid",
        "incline-treadmill" => "Incline treadmill",
        "progression" => "Progression run",
        "trail-run" => "Trail run",
        "recovery" => "Recovery run",
        "easy-run" => "Easy run",
        "cross-training" => "Cross training",
        "hike" => "Hike",
        "lrl" => "Long run",
        "fast-finish" => "Fast finish run",
        _ => "Run",
    }
}

fn day_of_week(name: &str) -> Option<u8> {
    let name = name.to_lowercase();
    DAY_NAMES
        .iter()
        .position(|d| *d == name)
        .map(|i| i as u8 + 1)
}

fn parse_cell(day_of_week: u8, cell: RawCell) -> TemplateDay {
    let raw_text = cell.raw.trim().to_string();
    if raw_text.is_empty() {
        return TemplateDay {
            day_of_week,
            raw_text,
            activity: None,
        };
    }

    let guess = cell
        .type_guess
        .as_deref()
        .map(str::trim)
        .unwrap_or("unknown")
        .to_lowercase();

    let metrics = cell.metrics;
    let distance_unit = metrics
        .distance_unit
        .as_deref()
        .and_then(|unit| unit.parse::<DistanceUnit>().ok());
    let distance = metrics
        .distance_value
        .filter(|d| d.is_finite() && *d >= 0.0 && distance_unit.is_some());
    let duration_minutes = metrics
        .duration_minutes
        .filter(|m| m.is_finite() && *m >= 0.0)
        .map(|m| m.round() as u32);

    TemplateDay {
        day_of_week,
        activity: Some(TemplateActivity {
            activity_type: activity_type_for(&guess),
            title: title_for(&guess).to_string(),
            distance,
            distance_unit: distance.and(distance_unit),
            duration_minutes,
        }),
        raw_text,
    }
}

impl Template {
    /// Parse extractor output.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::InvalidInput` when the document is not valid
    /// extractor JSON, has no weeks, repeats a week number, or names a day
    /// that is not a weekday.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawTemplate = serde_json::from_str(json).map_err(|e| {
            PlannerError::invalid_input("template").with_reason(format!("not a plan template: {e}"))
        })?;

        if raw.weeks.is_empty() {
            return Err(PlannerError::invalid_input("template").with_reason("template has no weeks"));
        }

        let mut weeks = Vec::with_capacity(raw.weeks.len());
        for raw_week in raw.weeks {
            let mut days = Vec::with_capacity(raw_week.days.len());
            for (name, cell) in raw_week.days {
                let Some(dow) = day_of_week(&name) else {
                    return Err(PlannerError::invalid_input("template").with_reason(format!(
                        "week {} has unknown day '{name}'",
                        raw_week.week_number
                    )));
                };
                days.push(parse_cell(dow, cell));
            }
            days.sort_by_key(|d| d.day_of_week);
            weeks.push(TemplateWeek {
                week_number: raw_week.week_number,
                days,
            });
        }

        weeks.sort_by_key(|w| w.week_number);
        if let Some(pair) = weeks.windows(2).find(|w| w[0].week_number == w[1].week_number) {
            return Err(PlannerError::invalid_input("template").with_reason(format!(
                "week {} appears more than once",
                pair[0].week_number
            )));
        }

        Ok(Self {
            program_name: raw
                .program_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            weeks,
        })
    }

    /// Number of activities the template will create.
    pub fn activity_count(&self) -> usize {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .filter(|d| d.activity.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "source_pdf": "novice.pdf",
        "program_name": "Half Novice",
        "generated_at": "2026-01-01T00:00:00Z",
        "glossary": {"entries": {}},
        "weeks": [
            {"week_number": 2, "days": {
                "sunday": {"raw": "6 miles LRL", "type_guess": "lrl",
                           "metrics": {"distance_value": 6.0, "distance_unit": "miles"}}
            }},
            {"week_number": 1, "days": {
                "Monday": {"raw": "Rest", "segments": ["Rest"], "type_guess": "rest", "metrics": {}},
                "tuesday": {"raw": "30 min cross-training", "type_guess": "cross-training",
                            "metrics": {"duration_minutes": 30, "distance_unit": null}},
                "wednesday": {"raw": "", "type_guess": "unknown", "metrics": {}},
                "saturday": {"raw": "5K race", "type_guess": "training-race",
                             "metrics": {"distance_value": 5.0, "distance_unit": "km"}}
            }}
        ]
    }"#;

    #[test]
    fn parses_extractor_output() {
        let template = Template::from_json(SAMPLE).unwrap();

        assert_eq!(template.program_name.as_deref(), Some("Half Novice"));
        assert_eq!(template.weeks.len(), 2);
        assert_eq!(template.weeks[0].week_number, 1);
        assert_eq!(template.activity_count(), 4);

        let week1 = &template.weeks[0];
        let days: Vec<u8> = week1.days.iter().map(|d| d.day_of_week).collect();
        assert_eq!(days, vec![1, 2, 3, 6]);

        let rest = week1.days[0].activity.as_ref().unwrap();
        assert_eq!(rest.activity_type, ActivityType::Rest);

        let cross = week1.days[1].activity.as_ref().unwrap();
        assert_eq!(cross.activity_type, ActivityType::CrossTrain);
        assert_eq!(cross.duration_minutes, Some(30));
        assert_eq!(cross.distance, None);

        assert!(week1.days[2].activity.is_none());

        let race = week1.days[3].activity.as_ref().unwrap();
        assert_eq!(race.activity_type, ActivityType::Race);
        assert_eq!(race.distance_unit, Some(DistanceUnit::Km));

        let long = template.weeks[1].days[0].activity.as_ref().unwrap();
        assert_eq!(long.activity_type, ActivityType::Run);
        assert_eq!(long.title, "Long run");
        assert_eq!(long.distance, Some(6.0));
        assert_eq!(long.distance_unit, Some(DistanceUnit::Miles));
    }

    #[test]
    fn unknown_guesses_become_runs() {
        assert_eq!(activity_type_for("tempo"), ActivityType::Run);
        assert_eq!(activity_type_for("unknown"), ActivityType::Run);
        assert_eq!(activity_type_for("hike"), ActivityType::Hike);
    }

    #[test]
    fn rejects_bad_templates() {
        assert!(Template::from_json("not json").is_err());
        assert!(Template::from_json(r#"{"weeks": []}"#).is_err());
        assert!(Template::from_json(
            r#"{"weeks": [{"week_number": 1, "days": {"funday": {"raw": "x"}}}]}"#
        )
        .is_err());
        assert!(Template::from_json(
            r#"{"weeks": [{"week_number": 1}, {"week_number": 1}]}"#
        )
        .is_err());
    }
}
