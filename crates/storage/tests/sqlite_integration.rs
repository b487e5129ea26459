use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_slot_roundtrip_and_overwrite() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("quizHistory").await.unwrap(), None);

    repo.set("quizHistory", "[]").await.unwrap();
    repo.set("quizHistory", r#"[{"correctCount":1}]"#).await.unwrap();
    assert_eq!(
        repo.get("quizHistory").await.unwrap().as_deref(),
        Some(r#"[{"correctCount":1}]"#)
    );

    repo.remove("quizHistory").await.unwrap();
    assert_eq!(repo.get("quizHistory").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(applied, 1);
}

#[tokio::test]
async fn storage_sqlite_keeps_keys_separate() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_keys?mode=memory&cache=shared")
        .await
        .expect("open storage");

    storage.slots.set("a", "1").await.unwrap();
    storage.slots.set("b", "2").await.unwrap();

    assert_eq!(storage.slots.get("a").await.unwrap().as_deref(), Some("1"));
    assert_eq!(storage.slots.get("b").await.unwrap().as_deref(), Some("2"));
}
