//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from an entity descriptor.

use crate::error::AppError;
use crate::filter::{render_order, render_where, FindManyRequest};
use crate::schema::{EntityDescriptor, FieldConfig, FieldType};
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL (safe: only from the resolved schema).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    pub fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a parameter and return its placeholder, cast included when the
    /// field type needs one (e.g. `$1::timestamptz`).
    pub fn bind(&mut self, v: Value, cast: Option<&str>) -> String {
        self.params.push(v);
        let n = self.params.len();
        match cast {
            Some(c) => format!("${}::{}", n, c),
            None => format!("${}", n),
        }
    }
}

impl Default for QueryBuf {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up a field by API name; unknown names are an error, never silently
/// dropped, so they surface through the uniform failure path.
pub fn field_of<'a>(entity: &'a EntityDescriptor, name: &str) -> Result<&'a FieldConfig, AppError> {
    entity
        .field(name)
        .ok_or_else(|| AppError::UnknownField(name.to_string()))
}

/// SELECT/RETURNING column list. Decimal columns cast to text so decoding
/// does not lose precision.
fn column_list(entity: &EntityDescriptor) -> String {
    entity
        .fields
        .iter()
        .map(|f| {
            let q = quoted(f.column_name());
            if f.field_type == FieldType::Decimal {
                format!("{}::text AS {}", q, q)
            } else {
                q
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// INSERT one record: columns from the provided keys only, so absent columns
/// take their database defaults. Unknown keys are an error.
pub fn insert(entity: &EntityDescriptor, record: &Map<String, Value>) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let table = quoted(&entity.storage_name);
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (name, value) in record {
        let field = field_of(entity, name)?;
        let ph = q.bind(value.clone(), field.field_type.sql_cast());
        cols.push(quoted(field.column_name()));
        placeholders.push(ph);
    }
    let returning = column_list(entity);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, returning)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table,
            cols.join(", "),
            placeholders.join(", "),
            returning
        )
    };
    Ok(q)
}

/// Windowed SELECT: filter tree, order list, LIMIT page_size OFFSET skip.
/// Without an explicit order the id field keeps pagination stable.
pub fn select_window(entity: &EntityDescriptor, req: &FindManyRequest) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let table = quoted(&entity.storage_name);
    let cols = column_list(entity);
    let where_clause = match render_where(&req.where_, entity, &mut q)? {
        Some(w) => format!(" WHERE {}", w),
        None => String::new(),
    };
    let order_clause = match render_order(&req.order_by, entity)? {
        Some(o) => format!(" ORDER BY {}", o),
        None => entity
            .fields
            .iter()
            .find(|f| f.is_id)
            .map(|f| format!(" ORDER BY {}", quoted(f.column_name())))
            .unwrap_or_default(),
    };
    q.sql = format!(
        "SELECT {} FROM {}{}{} LIMIT {} OFFSET {}",
        cols,
        table,
        where_clause,
        order_clause,
        req.page_size,
        req.skip()
    );
    Ok(q)
}

/// SELECT COUNT(*) under the same filter tree as the window read.
pub fn count(entity: &EntityDescriptor, req: &FindManyRequest) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let table = quoted(&entity.storage_name);
    let where_clause = match render_where(&req.where_, entity, &mut q)? {
        Some(w) => format!(" WHERE {}", w),
        None => String::new(),
    };
    q.sql = format!("SELECT COUNT(*) FROM {}{}", table, where_clause);
    Ok(q)
}

/// SELECT by an arbitrary field. LIMIT 2 is enough to prove the match is not
/// unique without reading the whole table.
pub fn select_by_field(
    entity: &EntityDescriptor,
    field_name: &str,
    value: &Value,
) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let field = field_of(entity, field_name)?;
    let table = quoted(&entity.storage_name);
    let cols = column_list(entity);
    let ph = q.bind(value.clone(), field.field_type.sql_cast());
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {} LIMIT 2",
        cols,
        table,
        quoted(field.column_name()),
        ph
    );
    Ok(q)
}

/// UPDATE by field predicate, SET only the provided keys. An empty body
/// degrades to a plain SELECT so the caller still gets the matching record.
pub fn update_by_field(
    entity: &EntityDescriptor,
    field_name: &str,
    value: &Value,
    data: &Map<String, Value>,
) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let field = field_of(entity, field_name)?;
    let table = quoted(&entity.storage_name);
    let cols = column_list(entity);
    let mut sets = Vec::new();
    for (name, v) in data {
        let f = field_of(entity, name)?;
        let ph = q.bind(v.clone(), f.field_type.sql_cast());
        sets.push(format!("{} = {}", quoted(f.column_name()), ph));
    }
    let ph = q.bind(value.clone(), field.field_type.sql_cast());
    let col = quoted(field.column_name());
    q.sql = if sets.is_empty() {
        format!("SELECT {} FROM {} WHERE {} = {} LIMIT 2", cols, table, col, ph)
    } else {
        format!(
            "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
            table,
            sets.join(", "),
            col,
            ph,
            cols
        )
    };
    Ok(q)
}

/// DELETE by field predicate, returning the removed rows.
pub fn delete_by_field(
    entity: &EntityDescriptor,
    field_name: &str,
    value: &Value,
) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let field = field_of(entity, field_name)?;
    let table = quoted(&entity.storage_name);
    let cols = column_list(entity);
    let ph = q.bind(value.clone(), field.field_type.sql_cast());
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {} RETURNING {}",
        table,
        quoted(field.column_name()),
        ph,
        cols
    );
    Ok(q)
}
