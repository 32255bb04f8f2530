//! HTTP handlers for entity CRUD and the schema-wide metadata routes.

pub mod entity;
pub mod tables;
