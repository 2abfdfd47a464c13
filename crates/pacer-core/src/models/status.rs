//! Status enumerations for plans.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of plan lifecycle statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Plan is being reviewed before it is published to the athlete
    #[default]
    Draft,

    /// Plan is published and being trained against
    Active,

    /// Plan is archived; no further edits are accepted
    Archived,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PlanStatus::Draft),
            "active" => Ok(PlanStatus::Active),
            "archived" => Ok(PlanStatus::Archived),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Active => "active",
            PlanStatus::Archived => "archived",
        }
    }

    /// Whether the calendar may still be reshaped.
    pub fn is_editable(&self) -> bool {
        !matches!(self, PlanStatus::Archived)
    }
}
