//! The eight CRUD routes of one entity, bound to its record service.
//!
//! Routes use absolute paths and merge into the caller's router, so two
//! entities whose names collapse to the same route name collide at merge
//! time (a startup panic, not a silent override).
//!
//! The static `/many` segment takes precedence over `/:id`, so
//! `GET {prefix}/many` answers 405 rather than looking up a record whose id
//! is the string "many". That is deliberate: a literal id of "many" is
//! unreachable through these routes.

use crate::handlers::entity::{
    create, create_many, find_many, find_one, get_fields, remove, remove_many, update, update_many,
};
use crate::service::RecordService;
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

/// `prefix` is the absolute route prefix, e.g. `/user` or `/admin/user`.
pub fn entity_routes(prefix: &str, service: Arc<RecordService>) -> Router {
    Router::new()
        .route(&format!("{}/fields", prefix), get(get_fields))
        .route(prefix, get(find_many).post(create))
        .route(&format!("{}/many", prefix), post(create_many).delete(remove_many))
        .route(&format!("{}/many/:id", prefix), patch(update_many))
        .route(
            &format!("{}/:id", prefix),
            get(find_one).patch(update).delete(remove),
        )
        .with_state(service)
}
