//! Interaction log implementations
//!
//! The CSV layout is one row per action, no header:
//!
//! ```text
//! 2024-05-01T10:00:00Z,USR_001,ACCEPTED,Travel Rewards Card: Since you fly often...
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nexora_core::{InteractionAction, InteractionRecord};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::{error::RepositoryError, traits::InteractionLog, RepositoryResult};

/// CSV file backed interaction log
///
/// Appends are serialized through an async mutex so concurrent requests
/// never interleave partial rows.
pub struct CsvInteractionLog {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvInteractionLog {
    /// Create a log writing to `path`; the file is created on first append
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl InteractionLog for CsvInteractionLog {
    async fn append(&self, record: InteractionRecord) -> RepositoryResult<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();

        debug!(
            "Logging {} for user {} to {}",
            record.action,
            record.user_id,
            path.display()
        );

        tokio::task::spawn_blocking(move || -> RepositoryResult<()> {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.write_record([
                record.timestamp.to_rfc3339(),
                record.user_id,
                record.action.to_string(),
                record.summary,
            ])?;
            writer.flush()?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::Log(format!("Log writer task failed: {}", e)))?
    }

    async fn read_all(&self) -> RepositoryResult<Vec<InteractionRecord>> {
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || -> RepositoryResult<Vec<InteractionRecord>> {
            if !path.exists() {
                return Ok(Vec::new());
            }

            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .from_path(&path)?;

            let mut records = Vec::new();
            for row in reader.records() {
                let row = row?;
                if row.len() != 4 {
                    return Err(RepositoryError::Log(format!(
                        "Expected 4 columns, found {}",
                        row.len()
                    )));
                }

                let timestamp = DateTime::parse_from_rfc3339(&row[0])
                    .map_err(|e| RepositoryError::Log(format!("Bad timestamp {}: {}", &row[0], e)))?
                    .with_timezone(&Utc);
                let action: InteractionAction =
                    row[2].parse().map_err(RepositoryError::Log)?;

                records.push(InteractionRecord {
                    timestamp,
                    user_id: row[1].to_string(),
                    action,
                    summary: row[3].to_string(),
                });
            }

            Ok(records)
        })
        .await
        .map_err(|e| RepositoryError::Log(format!("Log reader task failed: {}", e)))?
    }
}

/// In-memory interaction log
#[derive(Default)]
pub struct InMemoryInteractionLog {
    records: RwLock<Vec<InteractionRecord>>,
}

impl InMemoryInteractionLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InteractionLog for InMemoryInteractionLog {
    async fn append(&self, record: InteractionRecord) -> RepositoryResult<()> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn read_all(&self) -> RepositoryResult<Vec<InteractionRecord>> {
        Ok(self.records.read().await.clone())
    }
}
