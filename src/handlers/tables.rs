//! Schema-wide metadata handlers: list all entities and their count.

use crate::response::TableInfo;
use crate::schema::SchemaModel;
use axum::{extract::State, Json};
use std::sync::Arc;

pub async fn table_list(State(model): State<Arc<SchemaModel>>) -> Json<Vec<TableInfo>> {
    Json(model.entities.iter().map(|e| TableInfo::from(e.as_ref())).collect())
}

pub async fn tables_count(State(model): State<Arc<SchemaModel>>) -> Json<usize> {
    Json(model.len())
}
