//! Entity CRUD handlers: pure delegation to the bound record service.

use crate::error::AppError;
use crate::filter::{parse_filters_param, FindManyResult};
use crate::schema::{EntityDescriptor, FieldConfig, FieldType};
use crate::service::RecordService;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct FiltersQuery {
    pub filters: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNameQuery {
    pub field_name: Option<String>,
}

impl FieldNameQuery {
    fn name(&self) -> &str {
        self.field_name.as_deref().unwrap_or("id")
    }
}

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::bad_request()),
    }
}

fn bodies_to_maps(values: Vec<Value>) -> Result<Vec<Map<String, Value>>, AppError> {
    values.into_iter().map(body_to_map).collect()
}

/// Coerce a path/query string to the field's declared type so it binds
/// correctly. Unparseable or unknown values stay strings; the SQL cast or
/// the unknown-field check deals with them downstream.
fn coerce_value(entity: &EntityDescriptor, field_name: &str, raw: &str) -> Value {
    match entity.field(field_name).map(|f| &f.field_type) {
        Some(FieldType::Int) | Some(FieldType::BigInt) => raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        Some(FieldType::Float) => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.to_string())),
        Some(FieldType::Boolean) if raw.eq_ignore_ascii_case("true") => Value::Bool(true),
        Some(FieldType::Boolean) if raw.eq_ignore_ascii_case("false") => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

pub async fn get_fields(State(service): State<Arc<RecordService>>) -> Json<Vec<FieldConfig>> {
    Json(service.get_fields().to_vec())
}

pub async fn create(
    State(service): State<Arc<RecordService>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let record = body_to_map(body)?;
    Ok(Json(service.create(&record).await?))
}

pub async fn create_many(
    State(service): State<Arc<RecordService>>,
    Json(body): Json<Vec<Value>>,
) -> Result<Json<Vec<Value>>, AppError> {
    let records = bodies_to_maps(body)?;
    Ok(Json(service.create_many(&records).await?))
}

pub async fn find_many(
    State(service): State<Arc<RecordService>>,
    Query(query): Query<FiltersQuery>,
) -> Result<Json<FindManyResult>, AppError> {
    let req = parse_filters_param(query.filters.as_deref())?;
    Ok(Json(service.find_many(&req).await?))
}

pub async fn find_one(
    State(service): State<Arc<RecordService>>,
    Path(id): Path<String>,
    Query(query): Query<FieldNameQuery>,
) -> Result<Json<Value>, AppError> {
    let value = coerce_value(service.entity(), query.name(), &id);
    Ok(Json(service.find_one(query.name(), &value).await?))
}

pub async fn update(
    State(service): State<Arc<RecordService>>,
    Path(id): Path<String>,
    Query(query): Query<FieldNameQuery>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let data = body_to_map(body)?;
    let value = coerce_value(service.entity(), query.name(), &id);
    Ok(Json(service.update(query.name(), &value, &data).await?))
}

pub async fn update_many(
    State(service): State<Arc<RecordService>>,
    Path(id): Path<String>,
    Query(query): Query<FieldNameQuery>,
    Json(body): Json<Vec<Value>>,
) -> Result<Json<Vec<Value>>, AppError> {
    let records = bodies_to_maps(body)?;
    let value = coerce_value(service.entity(), query.name(), &id);
    Ok(Json(service.update_many(query.name(), &value, &records).await?))
}

pub async fn remove(
    State(service): State<Arc<RecordService>>,
    Path(id): Path<String>,
    Query(query): Query<FieldNameQuery>,
) -> Result<Json<Value>, AppError> {
    let value = coerce_value(service.entity(), query.name(), &id);
    Ok(Json(service.remove(query.name(), &value).await?))
}

pub async fn remove_many(
    State(service): State<Arc<RecordService>>,
    Query(query): Query<FieldNameQuery>,
    Json(values): Json<Vec<Value>>,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(service.remove_many(query.name(), &values).await?))
}
