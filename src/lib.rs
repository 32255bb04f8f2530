//! Admin Panel SDK: schema-driven CRUD route generator.
//!
//! Given a schema description (entities with typed fields), builds one full
//! set of REST routes per entity plus a metadata route listing all entities.
//! Persistence runs against PostgreSQL through sqlx; everything else (TLS,
//! auth, validation) is the caller's concern and attaches via route
//! augmentations.

pub mod augment;
pub mod case;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod panel;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;

pub use augment::{AugmentGroup, NameMatcher, RouteAugmentation};
pub use error::{AppError, SchemaError};
pub use filter::{FindManyRequest, FindManyResult, SortOrder, WhereTree};
pub use panel::{build_router, EntityPredicate, PanelOptions};
pub use response::error_body;
pub use schema::{resolve, EntityConfig, EntityDescriptor, FieldConfig, SchemaConfig, SchemaModel};
pub use service::{CatchHook, RecordService};
