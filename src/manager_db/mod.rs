pub mod errors;

use log::warn;
use rusqlite::{params, Connection};
use crate::manager_db::errors::DBError;
use crate::manager_summary::models::{DailySummary, UserAlertConfig};

const SUMMARIES_KEY: &str = "weather_summaries";
const CONFIG_KEY: &str = "user_token";

/// Persisted state, read and written as whole records.
///
/// A missing or undecodable record is treated as absent and replaced by
/// defaults, so alert evaluation can always proceed.
pub trait StateStore {
    fn load_config(&self) -> UserAlertConfig;
    fn save_config(&self, config: &UserAlertConfig) -> Result<(), DBError>;
    fn append_summaries(&self, summaries: &[DailySummary]) -> Result<(), DBError>;
    fn recent_summaries(&self, limit: usize) -> Result<Vec<DailySummary>, DBError>;
}

pub struct DB {
    db_conn: Connection,
}

impl DB {

    /// Creates a new instance of DB
    ///
    /// # Arguments
    ///
    /// * 'db_path' - full path to db file
    pub fn new(db_path: &str) -> Result<Self, DBError> {
        Self::init(Connection::open(db_path)?)
    }

    /// Creates a DB backed by an in-memory database, used in tests
    pub fn open_in_memory() -> Result<Self, DBError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(db_conn: Connection) -> Result<Self, DBError> {
        db_conn.execute(
           "CREATE TABLE IF NOT EXISTS blobs (
                key text primary key,
                value text not null
           )",
           [],
        )?;

        Ok(DB { db_conn })
    }

    fn read_blob(&self, key: &str) -> Result<Option<String>, DBError> {
        let mut stmt = self.db_conn.prepare(
            "SELECT value FROM blobs WHERE key = ?1;",
        )?;

        let response: rusqlite::Result<String> = stmt.query_one(params![key], |row| row.get(0));
        match response {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DBError::from(e)),
        }
    }

    fn write_blob(&self, key: &str, value: &str) -> Result<(), DBError> {
        self.db_conn.execute(
            "INSERT OR REPLACE INTO blobs (key, value) values (?1, ?2)",
            params![key, value],
        )?;

        Ok(())
    }

    fn load_summaries(&self) -> Vec<DailySummary> {
        match self.read_blob(SUMMARIES_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(summaries) => summaries,
                Err(e) => {
                    warn!("undecodable summary history, starting over: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("failed to read summary history: {}", e);
                Vec::new()
            }
        }
    }
}

impl StateStore for DB {
    fn load_config(&self) -> UserAlertConfig {
        match self.read_blob(CONFIG_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    warn!("undecodable user settings, using defaults: {}", e);
                    UserAlertConfig::default()
                }
            },
            Ok(None) => UserAlertConfig::default(),
            Err(e) => {
                warn!("failed to read user settings: {}", e);
                UserAlertConfig::default()
            }
        }
    }

    fn save_config(&self, config: &UserAlertConfig) -> Result<(), DBError> {
        self.write_blob(CONFIG_KEY, &serde_json::to_string(config)?)
    }

    fn append_summaries(&self, summaries: &[DailySummary]) -> Result<(), DBError> {
        let mut existing = self.load_summaries();
        existing.extend_from_slice(summaries);
        self.write_blob(SUMMARIES_KEY, &serde_json::to_string(&existing)?)
    }

    fn recent_summaries(&self, limit: usize) -> Result<Vec<DailySummary>, DBError> {
        let all = self.load_summaries();
        let skip = all.len().saturating_sub(limit);
        Ok(all.into_iter().skip(skip).collect())
    }
}
