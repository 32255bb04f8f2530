//! Render the order-by list into an ORDER BY fragment.

use crate::error::AppError;
use crate::filter::types::SortOrder;
use crate::schema::EntityDescriptor;
use crate::sql::{field_of, quoted};
use std::collections::BTreeMap;

/// `None` when no ordering was requested. Unknown field names are errors.
pub fn render_order(
    order_by: &[BTreeMap<String, SortOrder>],
    entity: &EntityDescriptor,
) -> Result<Option<String>, AppError> {
    let mut parts = Vec::new();
    for entry in order_by {
        for (name, direction) in entry {
            let field = field_of(entity, name)?;
            parts.push(format!("{} {}", quoted(field.column_name()), direction.sql()));
        }
    }
    if parts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(parts.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{resolve, EntityConfig, FieldConfig, FieldType, SchemaConfig};

    fn entity() -> EntityDescriptor {
        let field = |name: &str, db: Option<&str>| FieldConfig {
            name: name.into(),
            field_type: FieldType::String,
            db_name: db.map(Into::into),
            is_id: false,
            is_required: true,
            is_unique: false,
            is_list: false,
            has_default: false,
            documentation: None,
        };
        let config = SchemaConfig {
            entities: vec![EntityConfig {
                name: "Post".into(),
                db_name: None,
                documentation: None,
                fields: vec![field("title", None), field("createdAt", Some("created_at"))],
            }],
        };
        resolve(&config).unwrap().entities[0].as_ref().clone()
    }

    #[test]
    fn empty_order_renders_nothing() {
        assert!(render_order(&[], &entity()).unwrap().is_none());
    }

    #[test]
    fn directions_and_column_names_apply() {
        let order: Vec<BTreeMap<String, SortOrder>> = serde_json::from_str(
            r#"[{"createdAt": "desc"}, {"title": "asc"}]"#,
        )
        .unwrap();
        assert_eq!(
            render_order(&order, &entity()).unwrap().unwrap(),
            "\"created_at\" DESC, \"title\" ASC"
        );
    }

    #[test]
    fn unknown_field_is_error() {
        let order: Vec<BTreeMap<String, SortOrder>> =
            serde_json::from_str(r#"[{"nope": "asc"}]"#).unwrap();
        assert!(render_order(&order, &entity()).is_err());
    }
}
