use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::common::error::{Result, WeekError};
use crate::domain::WeekData;

/// Storage trait for the weekly dataset. The dataset is always read and
/// written as a whole document, never incrementally.
#[async_trait]
pub trait WeekStore: Send + Sync {
    async fn load(&self) -> Result<WeekData>;
    async fn save(&self, week: &WeekData) -> Result<()>;

    /// Like `load`, but a dataset that does not exist yet is an empty week
    /// rather than an error.
    async fn load_or_default(&self) -> Result<WeekData> {
        match self.load().await {
            Ok(week) => Ok(week),
            Err(WeekError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                Ok(WeekData::default())
            }
            Err(err) => Err(err),
        }
    }
}

/// File-backed store for the published JSON document (`data/week.json` in
/// the default deployment). Writes are pretty-printed UTF-8.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WeekStore for FileStore {
    async fn load(&self) -> Result<WeekData> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn save(&self, week: &WeekData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut text = serde_json::to_string_pretty(week)?;
        text.push('\n');
        tokio::fs::write(&self.path, text).await?;
        debug!(path = %self.path.display(), events = week.total_events(), "saved week data");
        Ok(())
    }
}

/// In-memory store for tests and local experimentation.
pub struct InMemoryStore {
    week: Mutex<WeekData>,
}

impl InMemoryStore {
    pub fn new(week: WeekData) -> Self {
        Self {
            week: Mutex::new(week),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(WeekData::default())
    }
}

#[async_trait]
impl WeekStore for InMemoryStore {
    async fn load(&self) -> Result<WeekData> {
        Ok(self.week.lock().unwrap().clone())
    }

    async fn save(&self, week: &WeekData) -> Result<()> {
        *self.week.lock().unwrap() = week.clone();
        Ok(())
    }
}
