//! Connection factory and unit-of-work helper.
//!
//! Connections are never shared: every unit of work opens its own, runs
//! inside one transaction, and drops the connection on every exit path.

use super::error::{Result, StoreError};
use super::schema::SCHEMA_SQL;
use rusqlite::{Connection, Transaction};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long SQLite waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Store location and connection policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database file
    pub path: PathBuf,
    /// Connection attempts before reporting the store unavailable
    pub connect_attempts: u32,
    /// Fixed delay between attempts
    pub retry_delay: Duration,
    /// Maximum rows returned by task listings
    pub page_size: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            connect_attempts: 5,
            retry_delay: Duration::from_millis(1000),
            page_size: 10,
        }
    }
}

impl StoreConfig {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.connect_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// `<data dir>/atlas/atlas.db`, or `./atlas.db` when no data dir exists
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("atlas").join("atlas.db"))
        .unwrap_or_else(|| PathBuf::from("atlas.db"))
}

/// Handle to the relational store
#[derive(Debug, Clone)]
pub struct Store {
    config: StoreConfig,
    bootstrap_schema: bool,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            bootstrap_schema: false,
        }
    }

    /// Create missing tables inside every unit of work, on the same
    /// connection the work uses.
    ///
    /// For one-shot processes that may run before any schema exists; the
    /// connection retry policy then applies once per operation.
    pub fn with_schema_bootstrap(mut self) -> Self {
        self.bootstrap_schema = true;
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    /// Open a fresh connection, retrying with a fixed delay.
    pub fn connect(&self) -> Result<Connection> {
        let attempts = self.config.connect_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.open() {
                Ok(conn) => {
                    if attempt > 1 {
                        info!("Store connected on attempt {}/{}", attempt, attempts);
                    }
                    return Ok(conn);
                }
                Err(e) => {
                    warn!(
                        "Store connection attempt {}/{} failed: {}",
                        attempt, attempts, e
                    );
                    last_error = e.to_string();
                    if attempt < attempts {
                        std::thread::sleep(self.config.retry_delay);
                    }
                }
            }
        }

        Err(StoreError::Unavailable {
            attempts,
            reason: last_error,
        })
    }

    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&self.config.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Run `work` in one transaction on its own connection.
    ///
    /// Commits on `Ok`, rolls back on `Err` (and on unwind, when the
    /// transaction is dropped). The connection is released either way.
    pub fn unit_of_work<T, E, F>(&self, work: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction().map_err(StoreError::from)?;
        if self.bootstrap_schema {
            tx.execute_batch(SCHEMA_SQL).map_err(StoreError::from)?;
        }

        match work(&tx) {
            Ok(value) => {
                tx.commit().map_err(StoreError::from)?;
                debug!("Unit of work committed");
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback() {
                    warn!("Rollback failed: {}", rollback);
                }
                debug!("Unit of work rolled back");
                Err(e)
            }
        }
    }

    /// Create tables if they do not exist.
    pub fn initialize_schema(&self) -> Result<()> {
        self.unit_of_work(|tx| {
            tx.execute_batch(SCHEMA_SQL)?;
            Ok::<_, StoreError>(())
        })?;
        info!("Store schema ready at {}", self.config.path.display());
        Ok(())
    }

    /// Number of projects; used as a connectivity check.
    pub fn count_projects(&self) -> Result<i64> {
        self.unit_of_work(|tx| {
            let count = tx.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;
            Ok::<_, StoreError>(count)
        })
    }
}
