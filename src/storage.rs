use crate::errors::AppError;
use crate::models::{HabitRecord, StatsSnapshot};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, warn};

pub const RECORDS_KEY: &str = "trackerItems";
pub const STATS_KEY: &str = "userStats";

/// Key-value file standing in for the browser's local storage.
///
/// The file is one JSON object; each key holds an independent value, and keys
/// this service does not know about are kept intact on every write.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

/// Result of reading `trackerItems`.
#[derive(Debug, Default)]
pub struct StoredRecords {
    pub records: Vec<HabitRecord>,
    /// The key was present but held something that is not a record list, or
    /// some entries had to be dropped.
    pub malformed: bool,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load_records(&self) -> Vec<HabitRecord> {
        self.read_records().await.records
    }

    /// Loads every readable record, skipping entries that cannot be parsed.
    pub async fn read_records(&self) -> StoredRecords {
        let entries = match read_object(&self.path).await.remove(RECORDS_KEY) {
            None | Some(Value::Null) => return StoredRecords::default(),
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                warn!(
                    "`{RECORDS_KEY}` in {} is not a list: {other}",
                    self.path.display()
                );
                return StoredRecords {
                    records: Vec::new(),
                    malformed: true,
                };
            }
        };

        let total = entries.len();
        let records: Vec<HabitRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!("skipping unreadable `{RECORDS_KEY}` entry {index}: {err}");
                    None
                }
            })
            .collect();

        StoredRecords {
            malformed: records.len() < total,
            records,
        }
    }

    pub async fn load_stats(&self) -> StatsSnapshot {
        self.load_key(STATS_KEY).await.unwrap_or_default()
    }

    pub async fn save_records(&self, records: &[HabitRecord]) -> Result<(), AppError> {
        self.save_entries(&[(RECORDS_KEY, to_value(records)?)]).await
    }

    pub async fn save_stats(&self, stats: &StatsSnapshot) -> Result<(), AppError> {
        self.save_entries(&[(STATS_KEY, to_value(stats)?)]).await
    }

    /// Writes records and snapshot together in a single file write.
    pub async fn save_all(
        &self,
        records: &[HabitRecord],
        stats: &StatsSnapshot,
    ) -> Result<(), AppError> {
        self.save_entries(&[(RECORDS_KEY, to_value(records)?), (STATS_KEY, to_value(stats)?)])
            .await
    }

    async fn load_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = read_object(&self.path).await.remove(key)?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!("ignoring unparsable `{key}` in {}: {err}", self.path.display());
                None
            }
        }
    }

    async fn save_entries(&self, entries: &[(&str, Value)]) -> Result<(), AppError> {
        let mut object = read_object(&self.path).await;
        for (key, value) in entries {
            object.insert((*key).to_string(), value.clone());
        }

        let payload = serde_json::to_vec_pretty(&object).map_err(AppError::internal)?;
        fs::write(&self.path, payload)
            .await
            .map_err(|err| AppError::persistence(&self.path, err))?;
        debug!("wrote {} key(s) to {}", entries.len(), self.path.display());
        Ok(())
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(AppError::internal)
}

async fn read_object(path: &Path) -> Map<String, Value> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<Map<String, Value>>(&bytes) {
            Ok(object) => object,
            Err(err) => {
                error!("failed to parse data file: {err}");
                Map::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
        Err(err) => {
            error!("failed to read data file: {err}");
            Map::new()
        }
    }
}
