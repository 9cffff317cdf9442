use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Brings the attempt schema up to date.
///
/// Version 1 creates `attempts` (one row per course/learner) and
/// `cmi_values` (one row per data-model element of an attempt).
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS attempts (
                    course_id TEXT NOT NULL,
                    learner_id TEXT NOT NULL,
                    scorm_version TEXT NOT NULL CHECK (scorm_version IN ('1.2', '2004')),
                    commit_count INTEGER NOT NULL CHECK (commit_count >= 0),
                    committed_at TEXT NOT NULL,
                    PRIMARY KEY (course_id, learner_id)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS cmi_values (
                    course_id TEXT NOT NULL,
                    learner_id TEXT NOT NULL,
                    element TEXT NOT NULL,
                    value TEXT NOT NULL,
                    PRIMARY KEY (course_id, learner_id, element),
                    FOREIGN KEY (course_id, learner_id)
                        REFERENCES attempts(course_id, learner_id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
