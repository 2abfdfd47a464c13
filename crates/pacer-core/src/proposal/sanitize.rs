//! Removal of proposal changes that would touch protected history.

use log::debug;
use serde::Serialize;

use super::{Change, Proposal};
use crate::locks::LockState;

/// A change removed during sanitization.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DroppedChange {
    /// Position of the change in the proposal as submitted
    pub index: usize,
    pub change: Change,
    /// Why the change was removed
    pub reason: String,
}

/// A proposal with every protected change removed.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedProposal {
    pub proposal: Proposal,
    pub dropped: Vec<DroppedChange>,
}

impl SanitizedProposal {
    pub fn is_empty(&self) -> bool {
        self.proposal.is_empty()
    }
}

/// Days a change touches. Activities missing from the snapshot contribute no
/// day; the applier rejects them as stale.
pub fn touched_days(change: &Change, locks: &LockState) -> Vec<u64> {
    match change {
        Change::MoveActivity {
            activity_id,
            target_day_id,
            ..
        } => locks
            .day_of(*activity_id)
            .into_iter()
            .chain(std::iter::once(*target_day_id))
            .collect(),
        Change::EditActivity { activity_id, .. } | Change::DeleteActivity { activity_id, .. } => {
            locks.day_of(*activity_id).into_iter().collect()
        }
        Change::AddActivity { day_id, .. } => vec![*day_id],
        Change::ExtendPlan { .. } => Vec::new(),
    }
}

/// Why a change must be dropped, or `None` if it may be applied.
fn protection(change: &Change, locks: &LockState) -> Option<String> {
    let activity_id = match change {
        Change::MoveActivity { activity_id, .. }
        | Change::EditActivity { activity_id, .. }
        | Change::DeleteActivity { activity_id, .. } => Some(*activity_id),
        Change::AddActivity { .. } | Change::ExtendPlan { .. } => None,
    };

    if let Some(id) = activity_id {
        if locks.is_activity_completed(id) {
            return Some(format!("activity {id} is already completed"));
        }
    }

    touched_days(change, locks)
        .into_iter()
        .find(|day| locks.is_day_locked(*day))
        .map(|day| format!("day {day} is already done"))
}

fn annotate_summary(summary: &str, dropped: usize) -> String {
    format!(
        "{summary} (Note: {dropped} proposed change(s) were skipped because they touch days or workouts that are already completed.)"
    )
}

/// Drop every change that touches a locked day or a completed activity.
///
/// Idempotent: sanitizing an already sanitized proposal against the same lock
/// state drops nothing and leaves the summary untouched.
pub fn sanitize(proposal: &Proposal, locks: &LockState) -> SanitizedProposal {
    let mut kept = Vec::with_capacity(proposal.changes.len());
    let mut dropped = Vec::new();

    for (index, change) in proposal.changes.iter().enumerate() {
        match protection(change, locks) {
            Some(reason) => {
                debug!("dropping change #{} ({}): {reason}", index + 1, change.op());
                dropped.push(DroppedChange {
                    index,
                    change: change.clone(),
                    reason,
                });
            }
            None => kept.push(change.clone()),
        }
    }

    let summary = if dropped.is_empty() {
        proposal.summary.clone()
    } else {
        annotate_summary(&proposal.summary, dropped.len())
    };

    SanitizedProposal {
        proposal: Proposal {
            summary,
            changes: kept,
            ..proposal.clone()
        },
        dropped,
    }
}
