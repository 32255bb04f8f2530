//! Find-many request/result types and the lenient `filters` query parsing.

use crate::error::AppError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Recursive filter tree: AND/OR/NOT branches plus field predicates.
/// A field predicate value is either a scalar (equality, null means IS NULL)
/// or an operator object (`equals`, `in`, `lt`, `contains`, ...).
#[derive(Clone, Debug, Default)]
pub struct WhereTree {
    pub and: Vec<WhereTree>,
    pub or: Vec<WhereTree>,
    pub not: Vec<WhereTree>,
    pub fields: Vec<(String, Value)>,
}

impl WhereTree {
    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty() && self.not.is_empty() && self.fields.is_empty()
    }
}

impl<'de> Deserialize<'de> for WhereTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = serde_json::Map::deserialize(deserializer)?;
        let mut tree = WhereTree::default();
        for (key, value) in map {
            match key.as_str() {
                "AND" => tree.and = branch_list::<D>(value)?,
                "OR" => tree.or = branch_list::<D>(value)?,
                "NOT" => tree.not = branch_list::<D>(value)?,
                _ => tree.fields.push((key, value)),
            }
        }
        Ok(tree)
    }
}

/// A logical branch accepts a single object or an array of objects.
fn branch_list<'de, D>(value: Value) -> Result<Vec<WhereTree>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(D::Error::custom))
            .collect(),
        Value::Object(_) => Ok(vec![
            serde_json::from_value(value).map_err(D::Error::custom)?
        ]),
        other => Err(D::Error::custom(format!(
            "logical operator expects object or array, got {}",
            other
        ))),
    }
}

/// Per-request find-many parameters, constructed and discarded within one
/// request. Zero page/pageSize coerce to defaults; negatives pass through
/// unvalidated and fail (if at all) at the storage layer.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindManyRequest {
    pub page: i64,
    pub page_size: i64,
    pub order_by: Vec<BTreeMap<String, SortOrder>>,
    #[serde(rename = "where")]
    pub where_: WhereTree,
}

impl Default for FindManyRequest {
    fn default() -> Self {
        FindManyRequest {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            order_by: Vec::new(),
            where_: WhereTree::default(),
        }
    }
}

impl FindManyRequest {
    /// Coerce falsy pagination values to their defaults.
    pub fn coerced(mut self) -> Self {
        if self.page == 0 {
            self.page = DEFAULT_PAGE;
        }
        if self.page_size == 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        self
    }

    /// Window start: `max(page - 1, 0) * page_size`.
    pub fn skip(&self) -> i64 {
        (self.page - 1).max(0) * self.page_size
    }
}

/// Parse the `filters` query parameter.
///
/// Malformed JSON silently falls back to the defaults. JSON that parses but
/// cannot be read as a request object (`null`, or an object with wrong-typed
/// members) is the one user-facing bad request, with the parse detail attached.
/// Scalars and arrays destructure to nothing and also fall back to defaults.
pub fn parse_filters_param(raw: Option<&str>) -> Result<FindManyRequest, AppError> {
    let Some(raw) = raw else {
        return Ok(FindManyRequest::default());
    };
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(_) => return Ok(FindManyRequest::default()),
    };
    match value {
        Value::Object(_) => serde_json::from_value::<FindManyRequest>(value)
            .map(FindManyRequest::coerced)
            .map_err(|e| AppError::bad_request_with(Value::String(e.to_string()))),
        Value::Null => Err(AppError::bad_request_with(Value::String(
            "filters must be an object".to_string(),
        ))),
        _ => Ok(FindManyRequest::default()),
    }
}

/// Result of a paginated read: the window plus the total ignoring pagination.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindManyResult {
    pub data: Vec<Value>,
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl FindManyResult {
    pub fn new(data: Vec<Value>, count: i64, page: i64, page_size: i64) -> Self {
        FindManyResult {
            data,
            count,
            page,
            page_size,
            total_pages: total_pages(count, page_size),
        }
    }
}

/// `ceil(count / page_size)`; zero when the page size is not positive.
pub fn total_pages(count: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    (count + page_size - 1) / page_size
}
