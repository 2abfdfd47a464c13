//! Construction of [`Planner`] instances.
//!
//! The database location is chosen in this order:
//!
//! 1. A path given to [`PlannerBuilder::with_database_path`]
//! 2. The `PACER_DATABASE` environment variable
//! 3. `$XDG_DATA_HOME/pacer/pacer.db` (usually `~/.local/share/pacer/pacer.db`)

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use tokio::task;

use super::Planner;
use crate::{
    db::Database,
    error::{PlannerError, Result},
};

/// Environment variable overriding the default database location.
pub const DATABASE_ENV: &str = "PACER_DATABASE";

/// Builder for [`Planner`].
#[derive(Debug, Clone, Default)]
pub struct PlannerBuilder {
    database_path: Option<PathBuf>,
}

impl PlannerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `path` as the SQLite file. `None` keeps the default lookup.
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Resolve the database location, create its directory and bring the
    /// schema up to date.
    ///
    /// # Errors
    ///
    /// * `PlannerError::XdgDirectory` - no path given and no data directory
    /// * `PlannerError::FileSystem` - the parent directory cannot be created
    /// * `PlannerError::Database` - the database cannot be opened
    pub async fn build(self) -> Result<Planner> {
        let db_path =
            resolve_database_path(self.database_path, std::env::var_os(DATABASE_ENV))?;
        debug!("using database {}", db_path.display());

        let path = db_path.clone();
        task::spawn_blocking(move || {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| PlannerError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
            Database::new(&path).map(drop)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Planner::new(db_path))
    }
}

/// Pick the database path from an explicit choice, the environment, or XDG.
///
/// A blank environment value counts as unset.
fn resolve_database_path(explicit: Option<PathBuf>, env: Option<OsString>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = env.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    xdg::BaseDirectories::with_prefix("pacer")
        .place_data_file("pacer.db")
        .map_err(|e| PlannerError::XdgDirectory(e.to_string()))
}
