//! Workouts imported from external providers.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A workout recorded by a third-party provider, optionally matched to a
/// planned activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalActivity {
    pub id: u64,

    pub plan_id: u64,

    /// Provider name, e.g. "strava"
    pub provider: String,

    /// Identifier of the workout at the provider
    pub external_id: String,

    /// Planned activity this workout was matched to. Cleared when that
    /// activity is deleted.
    pub matched_activity_id: Option<u64>,

    pub created_at: Timestamp,
}
