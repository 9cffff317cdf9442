use async_trait::async_trait;
use chrono::{DateTime, Utc};
use selector_core::scorm::ScormVersion;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Identifies one learner's attempt at one course package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptKey {
    pub course_id: String,
    pub learner_id: String,
}

impl AttemptKey {
    #[must_use]
    pub fn new(course_id: impl Into<String>, learner_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            learner_id: learner_id.into(),
        }
    }
}

impl fmt::Display for AttemptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.course_id, self.learner_id)
    }
}

/// Committed run-time data for an attempt.
///
/// `values` holds the data-model elements exactly as the content wrote them,
/// keyed by the element string of `version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub key: AttemptKey,
    pub version: ScormVersion,
    pub values: BTreeMap<String, String>,
    pub commit_count: u32,
    pub committed_at: DateTime<Utc>,
}

/// Repository contract for local LMS attempts.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Fetch the last committed state of an attempt.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing attempt is `Ok(None)`.
    async fn load_attempt(&self, key: &AttemptKey) -> Result<Option<AttemptRecord>, StorageError>;

    /// Replace the stored state of an attempt with `record`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_attempt(&self, record: &AttemptRecord) -> Result<(), StorageError>;

    /// Remove an attempt and all of its values.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the attempt does not exist.
    async fn delete_attempt(&self, key: &AttemptKey) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    attempts: Arc<Mutex<HashMap<AttemptKey, AttemptRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn load_attempt(&self, key: &AttemptKey) -> Result<Option<AttemptRecord>, StorageError> {
        let guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn save_attempt(&self, record: &AttemptRecord) -> Result<(), StorageError> {
        let mut guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(record.key.clone(), record.clone());
        Ok(())
    }

    async fn delete_attempt(&self, key: &AttemptKey) -> Result<(), StorageError> {
        let mut guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key).map(|_| ()).ok_or(StorageError::NotFound)
    }
}

/// Repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub attempts: Arc<dyn AttemptRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let attempts: Arc<dyn AttemptRepository> = Arc::new(InMemoryRepository::new());
        Self { attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selector_core::time::fixed_now;

    fn record(key: &AttemptKey, status: &str) -> AttemptRecord {
        let mut values = BTreeMap::new();
        values.insert("cmi.core.lesson_status".to_string(), status.to_string());
        AttemptRecord {
            key: key.clone(),
            version: ScormVersion::Scorm12,
            values,
            commit_count: 1,
            committed_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn save_replaces_previous_record() {
        let repo = InMemoryRepository::new();
        let key = AttemptKey::new("course", "learner");
        assert!(repo.load_attempt(&key).await.unwrap().is_none());

        repo.save_attempt(&record(&key, "incomplete")).await.unwrap();
        repo.save_attempt(&record(&key, "completed")).await.unwrap();

        let loaded = repo.load_attempt(&key).await.unwrap().unwrap();
        assert_eq!(
            loaded.values.get("cmi.core.lesson_status").map(String::as_str),
            Some("completed")
        );
    }

    #[tokio::test]
    async fn attempts_are_isolated_per_learner() {
        let repo = InMemoryRepository::new();
        let a = AttemptKey::new("course", "a");
        let b = AttemptKey::new("course", "b");
        repo.save_attempt(&record(&a, "completed")).await.unwrap();
        assert!(repo.load_attempt(&b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_attempt_is_not_found() {
        let repo = InMemoryRepository::new();
        let key = AttemptKey::new("course", "learner");
        assert!(matches!(
            repo.delete_attempt(&key).await,
            Err(StorageError::NotFound)
        ));
        repo.save_attempt(&record(&key, "incomplete")).await.unwrap();
        repo.delete_attempt(&key).await.unwrap();
        assert!(repo.load_attempt(&key).await.unwrap().is_none());
    }
}
