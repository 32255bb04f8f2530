//! RecordService: generic per-entity CRUD using the safe SQL builder.

mod record;
pub use record::{CatchHook, RecordService};
