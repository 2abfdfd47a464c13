//! Advice service backed by a proposal file.
//!
//! The CLI does not talk to a model itself. A coach (human or otherwise)
//! drafts the proposal JSON and `pacer proposal preview --file` runs it
//! through the same validation and sanitization a live service would.

use std::{fs, path::PathBuf};

use log::debug;
use pacer_core::{AdviceContext, AdviceError, AdviceService};
use serde_json::Value;

/// Reads the proposal from a JSON file on every call.
pub struct FileAdvice {
    path: PathBuf,
}

impl FileAdvice {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl AdviceService for FileAdvice {
    async fn propose(&self, context: &AdviceContext) -> Result<Value, AdviceError> {
        debug!(
            "reading proposal for plan {} from {}",
            context.plan_id,
            self.path.display()
        );
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            AdviceError::Unavailable(format!("cannot read {}: {e}", self.path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| AdviceError::Malformed(e.to_string()))
    }
}
