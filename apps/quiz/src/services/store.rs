//! Card persistence.
//!
//! The catalogue lives in one JSON document keyed by card. Saving a card
//! replaces only that card's entry; the completion stamp lives in a
//! separate small document.

use async_trait::async_trait;
use hanzi_core::{Catalogue, CatalogueError, CharacterCard, QuizStatus};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),
}

/// Durable storage for cards and the completion stamp.
#[async_trait]
pub trait CardStore: Send {
    /// Load every card.
    async fn load_catalogue(&mut self) -> Result<Catalogue, StoreError>;

    /// Replace the stored record of one card.
    async fn save_card(&mut self, key: &str, card: &CharacterCard) -> Result<(), StoreError>;

    /// Record that a batch was completed.
    async fn save_quiz_status(&mut self, status: &QuizStatus) -> Result<(), StoreError>;
}

/// Card store backed by JSON files on disk.
#[derive(Debug, Clone)]
pub struct JsonStore {
    database_path: PathBuf,
    status_path: PathBuf,
}

impl JsonStore {
    /// Create a store over a catalogue file and a quiz-status file.
    pub fn new(database_path: impl Into<PathBuf>, status_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            status_path: status_path.into(),
        }
    }

    /// Copy of the catalogue written on every load.
    pub fn backup_path(&self) -> PathBuf {
        self.database_path.with_file_name("database_backup.json")
    }

    async fn read_database(&self) -> Result<String, StoreError> {
        tokio::fs::read_to_string(&self.database_path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.database_path.clone(),
                source,
            })
    }

    async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        let io_err = |source: std::io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        tokio::fs::write(&tmp, content).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)
    }
}

#[async_trait]
impl CardStore for JsonStore {
    async fn load_catalogue(&mut self) -> Result<Catalogue, StoreError> {
        let content = self.read_database().await?;

        let backup = self.backup_path();
        if let Err(e) = tokio::fs::write(&backup, &content).await {
            tracing::warn!("Failed to write backup {}: {}", backup.display(), e);
        }

        let catalogue = Catalogue::from_json(&content)?;
        tracing::info!(
            "Loaded {} cards from {}",
            catalogue.len(),
            self.database_path.display()
        );
        Ok(catalogue)
    }

    async fn save_card(&mut self, key: &str, card: &CharacterCard) -> Result<(), StoreError> {
        let content = self.read_database().await?;
        let mut entries: Map<String, Value> = serde_json::from_str(&content)?;
        entries.insert(key.to_string(), serde_json::to_value(card)?);
        Self::write_json(&self.database_path, &entries).await?;
        tracing::debug!("Saved card {}", key);
        Ok(())
    }

    async fn save_quiz_status(&mut self, status: &QuizStatus) -> Result<(), StoreError> {
        Self::write_json(&self.status_path, status).await?;
        tracing::info!("Quiz completed on {}", status.last_completed);
        Ok(())
    }
}
