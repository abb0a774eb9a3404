use super::SqliteStore;
use agriwaste_core::config::DatabaseConfig;
use agriwaste_core::error::AgriError;
use agriwaste_core::record::LookupKey;
use agriwaste_core::traits::{RecordFilter, RecordStore};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Create an in-memory store for testing.
async fn test_store() -> SqliteStore {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    SqliteStore::run_migrations(&pool).await.unwrap();
    SqliteStore { pool }
}

/// Insert a record directly; the store itself has no write path.
#[allow(clippy::too_many_arguments)]
async fn insert(
    store: &SqliteStore,
    product: &str,
    moisture: &str,
    intended_use: &str,
    active: bool,
    process: &str,
    final_output: &str,
    benefits: &str,
    notes: &str,
) {
    sqlx::query(
        "INSERT INTO recommendations \
         (product_id, moisture, intended_use, is_active, process, final_output, benefits, notes) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(product)
    .bind(moisture)
    .bind(intended_use)
    .bind(active)
    .bind(process)
    .bind(final_output)
    .bind(benefits)
    .bind(notes)
    .execute(store.pool())
    .await
    .unwrap();
}

async fn insert_rice_husk(store: &SqliteStore, active: bool) {
    insert(
        store,
        "rice-husk",
        "low",
        "fuel",
        active,
        r#"{"en": ["dry", "grind"], "hi": ["सूखा", "पीस"]}"#,
        r#"{"en": "pellet"}"#,
        r#"{"en": "low cost"}"#,
        r#"{"en": "n/a"}"#,
    )
    .await;
}

fn filter(moisture: &str) -> RecordFilter {
    RecordFilter::active(LookupKey::new("rice-husk", moisture, "fuel"))
}

#[tokio::test]
async fn test_find_one_decodes_localized_maps() {
    let store = test_store().await;
    insert_rice_husk(&store, true).await;

    let rec = store.find_one(&filter("low")).await.unwrap().unwrap();
    assert_eq!(rec.product_id, "rice-husk");
    assert!(rec.is_active);
    assert_eq!(rec.process.languages(), vec!["en", "hi"]);
    assert_eq!(rec.process.get("hi").unwrap(), &vec!["सूखा", "पीस"]);
    assert_eq!(rec.final_output.get("en").unwrap(), "pellet");
    assert!(rec.final_output.get("hi").is_none());
}

#[tokio::test]
async fn test_find_one_no_match() {
    let store = test_store().await;
    insert_rice_husk(&store, true).await;

    assert!(store.find_one(&filter("high")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_one_ignores_inactive() {
    let store = test_store().await;
    insert_rice_husk(&store, false).await;

    assert!(store.find_one(&filter("low")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_one_key_is_exact() {
    let store = test_store().await;
    insert_rice_husk(&store, true).await;

    let upper = RecordFilter::active(LookupKey::new("Rice-Husk", "low", "fuel"));
    assert!(store.find_one(&upper).await.unwrap().is_none());
    let other_use = RecordFilter::active(LookupKey::new("rice-husk", "low", "compost"));
    assert!(store.find_one(&other_use).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_one_duplicates_return_single_record() {
    let store = test_store().await;
    insert_rice_husk(&store, true).await;
    insert(
        &store,
        "rice-husk",
        "low",
        "fuel",
        true,
        r#"{"en": ["soak"]}"#,
        r#"{"en": "briquette"}"#,
        "{}",
        "{}",
    )
    .await;

    let rec = store.find_one(&filter("low")).await.unwrap().unwrap();
    assert_eq!(rec.key(), LookupKey::new("rice-husk", "low", "fuel"));
}

#[tokio::test]
async fn test_find_one_default_columns_are_empty_maps() {
    let store = test_store().await;
    sqlx::query(
        "INSERT INTO recommendations (product_id, moisture, intended_use) \
         VALUES ('straw', 'high', 'compost')",
    )
    .execute(store.pool())
    .await
    .unwrap();

    let f = RecordFilter::active(LookupKey::new("straw", "high", "compost"));
    let rec = store.find_one(&f).await.unwrap().unwrap();
    assert!(rec.process.is_empty());
    assert!(rec.notes.is_empty());
}

#[tokio::test]
async fn test_find_one_malformed_json_is_serialization_error() {
    let store = test_store().await;
    insert(
        &store, "rice-husk", "low", "fuel", true, "not json", "{}", "{}", "{}",
    )
    .await;

    let err = store.find_one(&filter("low")).await.unwrap_err();
    assert!(matches!(err, AgriError::Serialization(_)));
}

#[tokio::test]
async fn test_count_active() {
    let store = test_store().await;
    insert_rice_husk(&store, true).await;
    insert_rice_husk(&store, false).await;
    assert_eq!(store.count_active().await.unwrap(), 1);
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    SqliteStore::run_migrations(store.pool()).await.unwrap();
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_connect_in_memory() {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..Default::default()
    };
    let store = SqliteStore::connect(&config).await.unwrap();
    store.ping().await.unwrap();
    assert_eq!(store.count_active().await.unwrap(), 0);
    store.close().await;
}

#[tokio::test]
async fn test_connect_bad_url_is_startup_failure() {
    let config = DatabaseConfig {
        url: "postgres://localhost/agri".to_string(),
        ..Default::default()
    };
    let err = SqliteStore::connect(&config).await.err().unwrap();
    assert!(matches!(err, AgriError::Startup(_)));
    assert!(err.to_string().contains("unsupported database url"));
}

#[tokio::test]
async fn test_connect_bad_params_is_startup_failure() {
    let config = DatabaseConfig {
        url: "sqlite:agri.db?bogus=1".to_string(),
        ..Default::default()
    };
    let err = SqliteStore::connect(&config).await.err().unwrap();
    assert!(matches!(err, AgriError::Startup(_)));
}

#[tokio::test]
async fn test_closed_store_is_unavailable() {
    let store = test_store().await;
    store.close().await;
    let err = store.find_one(&filter("low")).await.unwrap_err();
    assert!(err.is_unavailable());
    assert!(store.ping().await.unwrap_err().is_unavailable());
}
