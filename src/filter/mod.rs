//! Filter model: per-request find-many parameters and their SQL rendering.

pub mod order;
pub mod types;
pub mod where_clause;

pub use order::render_order;
pub use types::{parse_filters_param, FindManyRequest, FindManyResult, SortOrder, WhereTree};
pub use where_clause::render_where;
