//! Route tables built at startup from the resolved schema.

pub mod entity;
pub mod tables;

pub use entity::entity_routes;
pub use tables::table_routes;
