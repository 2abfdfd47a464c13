//! Filter types for querying plans.

use super::PlanStatus;

/// Filter options for listing plans.
#[derive(Debug, Clone, Default)]
pub struct PlanFilter {
    /// Only plans with this status
    pub status: Option<PlanStatus>,

    /// Include archived plans when no explicit status is requested
    pub include_archived: bool,
}

impl PlanFilter {
    /// Filter matching exactly one status.
    pub fn with_status(status: PlanStatus) -> Self {
        Self {
            status: Some(status),
            include_archived: status == PlanStatus::Archived,
        }
    }
}
