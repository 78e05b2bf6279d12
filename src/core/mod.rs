pub mod errors;
pub mod parsing;
pub mod types;

pub use errors::{Error, Result};
pub use parsing::{parse_item, parse_items, priority_from_raw, status_from_raw};
pub use types::{Item, ItemTimestamps, Priority, Status};
