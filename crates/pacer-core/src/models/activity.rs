//! Activity model definition and the enumerations describing workout intent.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of workout scheduled on a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Run,
    Strength,
    CrossTrain,
    Rest,
    Mobility,
    Yoga,
    Hike,
    Race,
    Other,
}

impl ActivityType {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Run => "RUN",
            ActivityType::Strength => "STRENGTH",
            ActivityType::CrossTrain => "CROSS_TRAIN",
            ActivityType::Rest => "REST",
            ActivityType::Mobility => "MOBILITY",
            ActivityType::Yoga => "YOGA",
            ActivityType::Hike => "HIKE",
            ActivityType::Race => "RACE",
            ActivityType::Other => "OTHER",
        }
    }

    /// Rest activities never count towards a day being done.
    pub fn is_rest(&self) -> bool {
        matches!(self, ActivityType::Rest)
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "RUN" => Ok(ActivityType::Run),
            "STRENGTH" => Ok(ActivityType::Strength),
            "CROSS_TRAIN" => Ok(ActivityType::CrossTrain),
            "REST" => Ok(ActivityType::Rest),
            "MOBILITY" => Ok(ActivityType::Mobility),
            "YOGA" => Ok(ActivityType::Yoga),
            "HIKE" => Ok(ActivityType::Hike),
            "RACE" => Ok(ActivityType::Race),
            "OTHER" => Ok(ActivityType::Other),
            _ => Err(format!("Invalid activity type: {s}")),
        }
    }
}

/// How important an activity is within its week.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Key,
    #[default]
    Medium,
    Optional,
}

impl Priority {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Key => "KEY",
            Priority::Medium => "MEDIUM",
            Priority::Optional => "OPTIONAL",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "KEY" => Ok(Priority::Key),
            "MEDIUM" => Ok(Priority::Medium),
            "OPTIONAL" => Ok(Priority::Optional),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

/// Unit attached to a planned or actual distance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistanceUnit {
    Miles,
    Km,
    M,
}

impl DistanceUnit {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Miles => "MILES",
            DistanceUnit::Km => "KM",
            DistanceUnit::M => "M",
        }
    }

    /// Short label used when rendering distances.
    pub fn label(&self) -> &'static str {
        match self {
            DistanceUnit::Miles => "mi",
            DistanceUnit::Km => "km",
            DistanceUnit::M => "m",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "miles" | "mile" | "mi" => Ok(DistanceUnit::Miles),
            "km" | "kms" | "kilometers" | "kilometres" => Ok(DistanceUnit::Km),
            "m" | "meters" | "metres" => Ok(DistanceUnit::M),
            _ => Err(format!("Invalid distance unit: {s}")),
        }
    }
}

/// A single workout scheduled on a day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    /// Unique identifier for the activity
    pub id: u64,

    /// ID of the owning plan (denormalized from the day's week)
    pub plan_id: u64,

    /// ID of the day the activity is scheduled on
    pub day_id: u64,

    /// Kind of workout
    pub activity_type: ActivityType,

    /// Short title of the workout
    pub title: String,

    /// Planned duration in minutes
    pub duration_minutes: Option<u32>,

    /// Planned distance, in `distance_unit`
    pub distance: Option<f64>,

    pub distance_unit: Option<DistanceUnit>,

    pub pace_target: Option<String>,

    pub effort_target: Option<String>,

    /// Free-text coaching notes
    pub notes: Option<String>,

    #[serde(default)]
    pub priority: Priority,

    /// The workout should not be skipped
    #[serde(default)]
    pub must_do: bool,

    /// The athlete may cut the workout short
    #[serde(default)]
    pub bail_allowed: bool,

    /// Whether the athlete has logged the activity as executed
    #[serde(default)]
    pub completed: bool,

    pub actual_distance: Option<f64>,

    pub actual_duration_minutes: Option<u32>,

    pub actual_pace: Option<String>,
}
