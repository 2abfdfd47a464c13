//! Database schema initialization.

use std::time::Duration;

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Enables foreign keys and creates any missing tables from the embedded
    /// schema. Every statement is idempotent, so this runs on each open.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        // Wait for a concurrent writer rather than failing with SQLITE_BUSY.
        self.connection
            .busy_timeout(Duration::from_secs(5))
            .db_context("Failed to set busy timeout")?;

        self.connection
            .execute_batch(include_str!("../../assets/schema.sql"))
            .db_context("Failed to initialize database schema")
    }
}
