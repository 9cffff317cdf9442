use std::collections::BTreeMap;

use chrono::Duration;
use selector_core::scorm::ScormVersion;
use selector_core::time::fixed_now;
use storage::repository::{AttemptKey, AttemptRecord, AttemptRepository, StorageError};
use storage::sqlite::SqliteRepository;

fn record(key: &AttemptKey, pairs: &[(&str, &str)], commit_count: u32) -> AttemptRecord {
    AttemptRecord {
        key: key.clone(),
        version: ScormVersion::Scorm2004,
        values: pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<BTreeMap<_, _>>(),
        commit_count,
        committed_at: fixed_now() + Duration::minutes(i64::from(commit_count)),
    }
}

#[tokio::test]
async fn sqlite_roundtrip_persists_values_and_metadata() {
    let repo =
        SqliteRepository::connect("sqlite:file:memdb_attempt_roundtrip?mode=memory&cache=shared")
            .await
            .expect("connect");
    repo.migrate().await.expect("migrate");

    let key = AttemptKey::new("competency-selector", "learner-1");
    assert!(repo.load_attempt(&key).await.unwrap().is_none());

    let saved = record(
        &key,
        &[
            ("cmi.suspend_data", r#"{"ind-x":true}"#),
            ("cmi.completion_status", "incomplete"),
        ],
        1,
    );
    repo.save_attempt(&saved).await.unwrap();

    let loaded = repo.load_attempt(&key).await.unwrap().expect("attempt");
    assert_eq!(loaded, saved);
}

#[tokio::test]
async fn sqlite_save_replaces_removed_elements() {
    let repo =
        SqliteRepository::connect("sqlite:file:memdb_attempt_replace?mode=memory&cache=shared")
            .await
            .expect("connect");
    repo.migrate().await.expect("migrate");

    let key = AttemptKey::new("course", "learner");
    repo.save_attempt(&record(
        &key,
        &[("cmi.location", "page-3"), ("cmi.completion_status", "incomplete")],
        1,
    ))
    .await
    .unwrap();
    repo.save_attempt(&record(&key, &[("cmi.completion_status", "completed")], 2))
        .await
        .unwrap();

    let loaded = repo.load_attempt(&key).await.unwrap().expect("attempt");
    assert_eq!(loaded.commit_count, 2);
    assert_eq!(loaded.values.len(), 1);
    assert_eq!(
        loaded.values.get("cmi.completion_status").map(String::as_str),
        Some("completed")
    );
}

#[tokio::test]
async fn sqlite_delete_cascades_values() {
    let repo =
        SqliteRepository::connect("sqlite:file:memdb_attempt_delete?mode=memory&cache=shared")
            .await
            .expect("connect");
    repo.migrate().await.expect("migrate");
    // Running migrations twice is a no-op.
    repo.migrate().await.expect("migrate again");

    let key = AttemptKey::new("course", "learner");
    repo.save_attempt(&record(&key, &[("cmi.suspend_data", "{}")], 1))
        .await
        .unwrap();
    repo.delete_attempt(&key).await.unwrap();
    assert!(repo.load_attempt(&key).await.unwrap().is_none());

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cmi_values")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    assert!(matches!(
        repo.delete_attempt(&key).await,
        Err(StorageError::NotFound)
    ));
}
