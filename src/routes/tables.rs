//! Schema-wide metadata route pair: entity listing and count.

use crate::handlers::tables::{table_list, tables_count};
use crate::schema::SchemaModel;
use axum::{routing::get, Router};
use std::sync::Arc;

/// `prefix` is the absolute prefix, e.g. `/db-tables`.
pub fn table_routes(prefix: &str, model: Arc<SchemaModel>) -> Router {
    Router::new()
        .route(&format!("{}/list", prefix), get(table_list))
        .route(&format!("{}/count", prefix), get(tables_count))
        .with_state(model)
}
