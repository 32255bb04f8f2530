//! Composition root: wires the resolved schema, the pool, and caller options
//! into one router. Services are constructed explicitly per entity and handed
//! to the route table by ownership; there is no runtime registry or lookup.

use crate::augment::AugmentGroup;
use crate::routes::{entity_routes, table_routes};
use crate::schema::{EntityDescriptor, SchemaModel};
use crate::service::{CatchHook, RecordService};
use axum::Router;
use sqlx::PgPool;
use std::sync::Arc;

/// Inclusion predicate over resolved entities; entities it rejects get no routes.
pub type EntityPredicate = Arc<dyn Fn(&EntityDescriptor) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct PanelOptions {
    /// Prefix for every generated route, e.g. "/admin". Empty means root.
    pub base_path: String,
    /// Prefix segment of the metadata route pair.
    pub tables_path: String,
    pub include_entity: Option<EntityPredicate>,
    pub augmentations: Vec<AugmentGroup>,
    /// Observes every operation failure; see [`CatchHook`].
    pub catch_hook: Option<CatchHook>,
}

impl Default for PanelOptions {
    fn default() -> Self {
        PanelOptions {
            base_path: String::new(),
            tables_path: "db-tables".to_string(),
            include_entity: None,
            augmentations: Vec::new(),
            catch_hook: None,
        }
    }
}

/// Build the full admin-panel router: one CRUD route set per included entity
/// plus the metadata route pair.
pub fn build_router(pool: PgPool, model: SchemaModel, options: PanelOptions) -> Router {
    let base = normalize_base(&options.base_path);
    let mut app = Router::new();

    for entity in &model.entities {
        if let Some(include) = &options.include_entity {
            if !include(entity) {
                continue;
            }
        }
        let service = Arc::new(RecordService::new(
            pool.clone(),
            entity.clone(),
            options.catch_hook.clone(),
        ));
        let prefix = format!("{}/{}", base, entity.route_name);
        let mut router = entity_routes(&prefix, service);
        for group in &options.augmentations {
            if group.applies_to(&entity.route_name) {
                router = group.apply(router);
            }
        }
        tracing::info!(entity = %entity.name, prefix = %prefix, "registered CRUD routes");
        app = app.merge(router);
    }

    let tables_prefix = format!("{}/{}", base, options.tables_path);
    app.merge(table_routes(&tables_prefix, Arc::new(model)))
}

fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_normalization() {
        assert_eq!(normalize_base(""), "");
        assert_eq!(normalize_base("/admin"), "/admin");
        assert_eq!(normalize_base("admin"), "/admin");
        assert_eq!(normalize_base("/admin/"), "/admin");
    }
}
