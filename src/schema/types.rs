//! Raw schema types matching the JSON supplied by the introspection collaborator.

use serde::{Deserialize, Serialize};

/// Scalar type of a field, used to pick SQL casts and to coerce path/query
/// values. Unknown type strings deserialize as `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Int,
    BigInt,
    Float,
    Decimal,
    String,
    Boolean,
    DateTime,
    Json,
    Uuid,
    Bytes,
    #[serde(untagged)]
    Other(String),
}

impl FieldType {
    /// SQL cast appended to bind placeholders so string-typed JSON values
    /// bind correctly (e.g. `$1::timestamptz`).
    pub fn sql_cast(&self) -> Option<&'static str> {
        match self {
            FieldType::DateTime => Some("timestamptz"),
            FieldType::Decimal => Some("numeric"),
            FieldType::BigInt => Some("bigint"),
            FieldType::Json => Some("jsonb"),
            FieldType::Uuid => Some("uuid"),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Column name when it differs from the field name.
    #[serde(default)]
    pub db_name: Option<String>,
    #[serde(default)]
    pub is_id: bool,
    #[serde(default = "default_true")]
    pub is_required: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default)]
    pub documentation: Option<String>,
}

impl FieldConfig {
    pub fn column_name(&self) -> &str {
        self.db_name.as_deref().unwrap_or(&self.name)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityConfig {
    pub name: String,
    /// Underlying table name when it differs from the entity name.
    #[serde(default)]
    pub db_name: Option<String>,
    #[serde(default)]
    pub documentation: Option<String>,
    pub fields: Vec<FieldConfig>,
}

/// The whole schema description, supplied wholesale at startup.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub entities: Vec<EntityConfig>,
}
