//! Wire types for the metadata routes and the error envelope helper.

use crate::schema::EntityDescriptor;
use serde::Serialize;

/// One entry of the schema-wide table listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub name: String,
    /// Always the resolved storage name: the configured table name when one
    /// was given, otherwise the entity name. Never null, even for entities
    /// that configured no explicit table name.
    pub db_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl From<&EntityDescriptor> for TableInfo {
    fn from(entity: &EntityDescriptor) -> Self {
        TableInfo {
            name: entity.name.clone(),
            db_name: entity.storage_name.clone(),
            documentation: entity.documentation.clone(),
        }
    }
}

pub fn error_body(code: &str, message: String, details: Option<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message,
            "details": details
        }
    })
}
