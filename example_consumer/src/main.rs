//! Example consumer: an admin back-office server built from a JSON schema.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Expects DATABASE_URL (default `postgres://localhost/admin_panel`) with the
//! `users` and `posts` tables already in place; the SDK does no migration.

use admin_panel_sdk::{
    build_router, resolve, AugmentGroup, NameMatcher, PanelOptions, SchemaConfig,
};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

fn schema_config() -> SchemaConfig {
    serde_json::from_value(serde_json::json!({
        "entities": [
            {
                "name": "User",
                "dbName": "users",
                "documentation": "Registered accounts",
                "fields": [
                    {"name": "id", "type": "Int", "isId": true, "hasDefault": true},
                    {"name": "email", "type": "String", "isUnique": true},
                    {"name": "name", "type": "String", "isRequired": false},
                    {"name": "createdAt", "type": "DateTime", "dbName": "created_at", "hasDefault": true}
                ]
            },
            {
                "name": "Post",
                "dbName": "posts",
                "fields": [
                    {"name": "id", "type": "Int", "isId": true, "hasDefault": true},
                    {"name": "title", "type": "String"},
                    {"name": "views", "type": "Int", "hasDefault": true},
                    {"name": "authorId", "type": "Int", "dbName": "author_id"}
                ]
            }
        ]
    }))
    .expect("static schema config is well-formed")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("admin_panel_sdk=info")),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/admin_panel".into());
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let model = resolve(&schema_config())?;

    // Request tracing on every generated route except the user entity's,
    // purely to show include/exclude matching.
    let trace_group = AugmentGroup {
        augment: vec![Arc::new(|router: Router| router.layer(TraceLayer::new_for_http()))],
        include: None,
        exclude: vec![NameMatcher::literal("user")],
    };

    let app = build_router(
        pool,
        model,
        PanelOptions {
            base_path: "/admin".into(),
            augmentations: vec![trace_group],
            ..Default::default()
        },
    );

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("admin panel listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
