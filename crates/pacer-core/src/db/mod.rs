//! Database operations and SQLite management for training plans.
//!
//! This module provides the low-level storage layer: connection handling,
//! schema management, row mapping, and the specialized query interfaces for
//! plans, athlete logging and proposal application.

use std::path::Path;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::{DatabaseResultExt, Result};

pub mod apply;
pub mod calendar_queries;
pub mod plan_queries;
pub mod schema;
pub(crate) mod rows;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Begins a deferred transaction for ordinary read-modify-write work.
    fn begin(&mut self) -> Result<Transaction<'_>> {
        self.connection
            .transaction()
            .db_context("Failed to begin transaction")
    }

    /// Begins a transaction holding the write lock from its first statement.
    ///
    /// Used when a decision read at the start of the transaction (lock state)
    /// must not be invalidated by a concurrent writer before commit.
    fn begin_immediate(&mut self) -> Result<Transaction<'_>> {
        self.connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin immediate transaction")
    }
}
