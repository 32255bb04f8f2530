//! Generic record service: one per entity, the single data-access facade.
//!
//! Every operation wraps its storage interaction in the same failure
//! translation: log the real cause, offer it to the caller-supplied catch
//! hook, then surface the uniform bad-request classification. The client
//! never learns whether the fault was not-found, a constraint violation, or
//! a connectivity problem; the log does.

use crate::error::AppError;
use crate::filter::{FindManyRequest, FindManyResult};
use crate::schema::{EntityDescriptor, FieldConfig};
use crate::sql::{self, PgBindValue, QueryBuf};
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

/// Caller-supplied hook observing a failed operation. Returning `Some`
/// replaces the outgoing error with a custom classification; `None` falls
/// through to the uniform bad request. The original error never reaches the
/// client either way.
pub type CatchHook = Arc<dyn Fn(&AppError) -> Option<AppError> + Send + Sync>;

pub struct RecordService {
    pool: PgPool,
    entity: Arc<EntityDescriptor>,
    catch_hook: Option<CatchHook>,
}

impl RecordService {
    pub fn new(pool: PgPool, entity: Arc<EntityDescriptor>, catch_hook: Option<CatchHook>) -> Self {
        RecordService {
            pool,
            entity,
            catch_hook,
        }
    }

    pub fn entity(&self) -> &EntityDescriptor {
        &self.entity
    }

    /// Field metadata. No failure path.
    pub fn get_fields(&self) -> &[FieldConfig] {
        &self.entity.fields
    }

    /// Insert one record; absent columns take their database defaults.
    pub async fn create(&self, record: &Map<String, Value>) -> Result<Value, AppError> {
        self.try_create(record).await.map_err(|e| self.fail("create", e))
    }

    /// Insert a batch as one transaction; rows return in input order.
    pub async fn create_many(&self, records: &[Map<String, Value>]) -> Result<Vec<Value>, AppError> {
        self.try_create_many(records)
            .await
            .map_err(|e| self.fail("createMany", e))
    }

    /// Windowed read plus total count, issued concurrently.
    pub async fn find_many(&self, req: &FindManyRequest) -> Result<FindManyResult, AppError> {
        self.try_find_many(req).await.map_err(|e| self.fail("findMany", e))
    }

    /// Exactly one record matching the field predicate; zero or several both fail.
    pub async fn find_one(&self, field_name: &str, value: &Value) -> Result<Value, AppError> {
        self.try_find_one(field_name, value)
            .await
            .map_err(|e| self.fail("findOne", e))
    }

    /// Partial update of the single matching record.
    pub async fn update(
        &self,
        field_name: &str,
        value: &Value,
        data: &Map<String, Value>,
    ) -> Result<Value, AppError> {
        self.try_update(field_name, value, data)
            .await
            .map_err(|e| self.fail("update", e))
    }

    /// Apply a batch of updates, each keyed by the SAME field predicate, as
    /// one transaction. Callers wanting per-record keys issue one `update`
    /// per record instead.
    pub async fn update_many(
        &self,
        field_name: &str,
        value: &Value,
        records: &[Map<String, Value>],
    ) -> Result<Vec<Value>, AppError> {
        self.try_update_many(field_name, value, records)
            .await
            .map_err(|e| self.fail("updateMany", e))
    }

    /// Delete the single matching record, returning it.
    pub async fn remove(&self, field_name: &str, value: &Value) -> Result<Value, AppError> {
        self.try_remove(field_name, value)
            .await
            .map_err(|e| self.fail("remove", e))
    }

    /// One delete per value, same field, one transaction.
    pub async fn remove_many(&self, field_name: &str, values: &[Value]) -> Result<Vec<Value>, AppError> {
        self.try_remove_many(field_name, values)
            .await
            .map_err(|e| self.fail("removeMany", e))
    }

    /// The single failure translation point: log with full detail, offer the
    /// fault to the catch hook, fall through to the uniform classification.
    fn fail(&self, op: &'static str, err: AppError) -> AppError {
        tracing::error!(entity = %self.entity.name, op, error = %err, "operation failed");
        if let Some(hook) = &self.catch_hook {
            if let Some(custom) = hook(&err) {
                return custom;
            }
        }
        AppError::bad_request()
    }

    async fn try_create(&self, record: &Map<String, Value>) -> Result<Value, AppError> {
        let q = sql::insert(&self.entity, record)?;
        self.fetch_one(&q).await
    }

    async fn try_create_many(&self, records: &[Map<String, Value>]) -> Result<Vec<Value>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            let q = sql::insert(&self.entity, record)?;
            out.push(fetch_one_tx(&mut tx, &q).await?);
        }
        tx.commit().await?;
        Ok(out)
    }

    async fn try_find_many(&self, req: &FindManyRequest) -> Result<FindManyResult, AppError> {
        let window = sql::select_window(&self.entity, req)?;
        let total = sql::count(&self.entity, req)?;
        let (rows, count) = tokio::try_join!(self.fetch_all(&window), self.fetch_count(&total))?;
        Ok(FindManyResult::new(rows, count, req.page, req.page_size))
    }

    async fn try_find_one(&self, field_name: &str, value: &Value) -> Result<Value, AppError> {
        let q = sql::select_by_field(&self.entity, field_name, value)?;
        let rows = self.fetch_all(&q).await?;
        exactly_one(rows)
    }

    async fn try_update(
        &self,
        field_name: &str,
        value: &Value,
        data: &Map<String, Value>,
    ) -> Result<Value, AppError> {
        let q = sql::update_by_field(&self.entity, field_name, value, data)?;
        let mut tx = self.pool.begin().await?;
        let rows = fetch_all_tx(&mut tx, &q).await?;
        let row = exactly_one(rows)?;
        tx.commit().await?;
        Ok(row)
    }

    async fn try_update_many(
        &self,
        field_name: &str,
        value: &Value,
        records: &[Map<String, Value>],
    ) -> Result<Vec<Value>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            let q = sql::update_by_field(&self.entity, field_name, value, record)?;
            let rows = fetch_all_tx(&mut tx, &q).await?;
            out.push(exactly_one(rows)?);
        }
        tx.commit().await?;
        Ok(out)
    }

    async fn try_remove(&self, field_name: &str, value: &Value) -> Result<Value, AppError> {
        let q = sql::delete_by_field(&self.entity, field_name, value)?;
        let mut tx = self.pool.begin().await?;
        let rows = fetch_all_tx(&mut tx, &q).await?;
        let row = exactly_one(rows)?;
        tx.commit().await?;
        Ok(row)
    }

    async fn try_remove_many(&self, field_name: &str, values: &[Value]) -> Result<Vec<Value>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            let q = sql::delete_by_field(&self.entity, field_name, value)?;
            let rows = fetch_all_tx(&mut tx, &q).await?;
            out.push(exactly_one(rows)?);
        }
        tx.commit().await?;
        Ok(out)
    }

    async fn fetch_one(&self, q: &QueryBuf) -> Result<Value, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from(p));
        }
        let row = query.fetch_one(&self.pool).await?;
        Ok(row_to_json(&row))
    }

    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from(p));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn fetch_count(&self, q: &QueryBuf) -> Result<i64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_scalar::<_, i64>(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from(p));
        }
        Ok(query.fetch_one(&self.pool).await?)
    }
}

/// Zero or several matches are the same failure: the predicate did not pick
/// out a single record. Dropping the open transaction rolls any writes back.
fn exactly_one(mut rows: Vec<Value>) -> Result<Value, AppError> {
    match rows.len() {
        1 => Ok(rows.remove(0)),
        matched => Err(AppError::NotExactlyOne { matched }),
    }
}

async fn fetch_one_tx(tx: &mut Transaction<'_, Postgres>, q: &QueryBuf) -> Result<Value, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(PgBindValue::from(p));
    }
    let row = query.fetch_one(&mut **tx).await?;
    Ok(row_to_json(&row))
}

async fn fetch_all_tx(tx: &mut Transaction<'_, Postgres>, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(PgBindValue::from(p));
    }
    let rows = query.fetch_all(&mut **tx).await?;
    Ok(rows.iter().map(row_to_json).collect())
}

fn row_to_json(row: &PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exactly_one_returns_the_single_row() {
        let row = exactly_one(vec![json!({"id": 1})]).unwrap();
        assert_eq!(row, json!({"id": 1}));
    }

    #[test]
    fn zero_matches_fail_rather_than_return_null() {
        let err = exactly_one(vec![]).unwrap_err();
        assert!(matches!(err, AppError::NotExactlyOne { matched: 0 }));
    }

    #[test]
    fn multiple_matches_fail() {
        // The same check aborts update/remove before their transaction
        // commits, rolling the write back.
        let err = exactly_one(vec![json!({"id": 1}), json!({"id": 2})]).unwrap_err();
        assert!(matches!(err, AppError::NotExactlyOne { matched: 2 }));
    }
}
