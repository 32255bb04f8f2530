//! Resolved entity model: schema validated and flattened for runtime use.

use crate::case::lower_first;
use crate::error::SchemaError;
use crate::schema::types::{EntityConfig, FieldConfig, SchemaConfig};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One entity of the schema, immutable after resolve. Shared by the route
/// synthesizer and the record service bound to it.
#[derive(Clone, Debug)]
pub struct EntityDescriptor {
    pub name: String,
    /// Route prefix segment: entity name with the first character lower-cased.
    pub route_name: String,
    /// Underlying table name.
    pub storage_name: String,
    pub documentation: Option<String>,
    pub fields: Vec<FieldConfig>,
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// All resolved entities plus a lookup by route name.
#[derive(Clone, Debug, Default)]
pub struct SchemaModel {
    pub entities: Vec<Arc<EntityDescriptor>>,
    entity_by_route: HashMap<String, Arc<EntityDescriptor>>,
}

impl SchemaModel {
    pub fn entity_by_route(&self, route: &str) -> Option<&Arc<EntityDescriptor>> {
        self.entity_by_route.get(route)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Build the resolved model from the raw schema description.
///
/// Route-name collisions after lower-casing are NOT rejected here (router
/// construction panics on the duplicate path); a warning is logged so the
/// collision is visible before the panic.
pub fn resolve(config: &SchemaConfig) -> Result<SchemaModel, SchemaError> {
    let mut names = HashSet::new();
    let mut routes = HashSet::new();
    let mut entities = Vec::with_capacity(config.entities.len());
    let mut entity_by_route = HashMap::new();

    for entity in &config.entities {
        validate_entity(entity)?;
        if !names.insert(entity.name.clone()) {
            return Err(SchemaError::DuplicateEntity(entity.name.clone()));
        }
        let route_name = lower_first(&entity.name);
        if !routes.insert(route_name.clone()) {
            tracing::warn!(
                entity = %entity.name,
                route = %route_name,
                "route name collides with another entity; generated routes will overlap"
            );
        }
        let descriptor = Arc::new(EntityDescriptor {
            name: entity.name.clone(),
            route_name: route_name.clone(),
            storage_name: entity.db_name.clone().unwrap_or_else(|| entity.name.clone()),
            documentation: entity.documentation.clone(),
            fields: entity.fields.clone(),
        });
        entity_by_route.insert(route_name, descriptor.clone());
        entities.push(descriptor);
    }

    Ok(SchemaModel {
        entities,
        entity_by_route,
    })
}

fn validate_entity(entity: &EntityConfig) -> Result<(), SchemaError> {
    if entity.name.is_empty() {
        return Err(SchemaError::EmptyEntityName);
    }
    if entity.fields.is_empty() {
        return Err(SchemaError::NoFields(entity.name.clone()));
    }
    let mut seen = HashSet::new();
    for field in &entity.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                entity: entity.name.clone(),
                field: field.name.clone(),
            });
        }
    }
    Ok(())
}
