pub mod manager;
pub mod store;

pub use manager::{DatabaseError, PgStore};
pub use store::{Row, RowStore};
