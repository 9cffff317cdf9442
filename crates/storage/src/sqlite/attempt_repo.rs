use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use selector_core::scorm::ScormVersion;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{AttemptKey, AttemptRecord, AttemptRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl AttemptRepository for SqliteRepository {
    async fn load_attempt(&self, key: &AttemptKey) -> Result<Option<AttemptRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT scorm_version, commit_count, committed_at
            FROM attempts
            WHERE course_id = ?1 AND learner_id = ?2
            ",
        )
        .bind(&key.course_id)
        .bind(&key.learner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let version: ScormVersion = row
            .try_get::<String, _>("scorm_version")
            .map_err(ser)?
            .parse()
            .map_err(ser)?;
        let commit_count: i64 = row.try_get("commit_count").map_err(ser)?;
        let commit_count =
            u32::try_from(commit_count).map_err(|_| ser("commit_count out of range"))?;
        let committed_at: DateTime<Utc> = row.try_get("committed_at").map_err(ser)?;

        let value_rows = sqlx::query(
            r"
            SELECT element, value
            FROM cmi_values
            WHERE course_id = ?1 AND learner_id = ?2
            ",
        )
        .bind(&key.course_id)
        .bind(&key.learner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut values = BTreeMap::new();
        for row in value_rows {
            let element: String = row.try_get("element").map_err(ser)?;
            let value: String = row.try_get("value").map_err(ser)?;
            values.insert(element, value);
        }

        Ok(Some(AttemptRecord {
            key: key.clone(),
            version,
            values,
            commit_count,
            committed_at,
        }))
    }

    async fn save_attempt(&self, record: &AttemptRecord) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO attempts (course_id, learner_id, scorm_version, commit_count, committed_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(course_id, learner_id) DO UPDATE SET
                scorm_version = excluded.scorm_version,
                commit_count = excluded.commit_count,
                committed_at = excluded.committed_at
            ",
        )
        .bind(&record.key.course_id)
        .bind(&record.key.learner_id)
        .bind(record.version.as_str())
        .bind(i64::from(record.commit_count))
        .bind(record.committed_at)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        sqlx::query("DELETE FROM cmi_values WHERE course_id = ?1 AND learner_id = ?2")
            .bind(&record.key.course_id)
            .bind(&record.key.learner_id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (element, value) in &record.values {
            sqlx::query(
                r"
                INSERT INTO cmi_values (course_id, learner_id, element, value)
                VALUES (?1, ?2, ?3, ?4)
                ",
            )
            .bind(&record.key.course_id)
            .bind(&record.key.learner_id)
            .bind(element)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn delete_attempt(&self, key: &AttemptKey) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM attempts WHERE course_id = ?1 AND learner_id = ?2")
            .bind(&key.course_id)
            .bind(&key.learner_id)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
