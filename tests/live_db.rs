//! Live-database tests for the transactional batch operations.
//!
//! These need a reachable PostgreSQL instance and are skipped when
//! DATABASE_URL is unset, so the rest of the suite stays runnable offline.

use admin_panel_sdk::{resolve, RecordService, SchemaConfig};
use serde_json::{json, Map, Value};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

async fn pool_or_skip() -> Option<sqlx::PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping live-db test");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to DATABASE_URL");
    Some(pool)
}

fn record(email: &str) -> Map<String, Value> {
    json!({"email": email}).as_object().unwrap().clone()
}

#[tokio::test]
async fn create_many_is_all_or_nothing() {
    let Some(pool) = pool_or_skip().await else {
        return;
    };
    // Unique table per run so parallel/leftover state cannot interfere.
    let table = format!("contacts_{}", uuid::Uuid::new_v4().simple());
    sqlx::query(&format!(
        "CREATE TABLE \"{}\" (id SERIAL PRIMARY KEY, email TEXT NOT NULL UNIQUE)",
        table
    ))
    .execute(&pool)
    .await
    .expect("create table");

    let config: SchemaConfig = serde_json::from_value(json!({
        "entities": [{
            "name": "Contact",
            "dbName": table,
            "fields": [
                {"name": "id", "type": "Int", "isId": true, "hasDefault": true},
                {"name": "email", "type": "String", "isUnique": true}
            ]
        }]
    }))
    .unwrap();
    let model = resolve(&config).unwrap();
    let service = RecordService::new(pool.clone(), Arc::clone(&model.entities[0]), None);

    // Second element violates the unique constraint; neither row may survive.
    let result = service
        .create_many(&[record("a@example.com"), record("a@example.com")])
        .await;
    assert!(result.is_err(), "duplicate batch must fail");

    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{}\"", table))
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "failed batch must roll back every row");

    // A clean batch commits and keeps input order.
    let rows = service
        .create_many(&[record("a@example.com"), record("b@example.com")])
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["email"], "a@example.com");
    assert_eq!(rows[1]["email"], "b@example.com");

    sqlx::query(&format!("DROP TABLE \"{}\"", table))
        .execute(&pool)
        .await
        .unwrap();
}
