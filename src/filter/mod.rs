pub mod descriptor;
pub mod error;
pub mod filter;
pub mod filter_page;
pub mod filter_where;
pub mod types;

pub use descriptor::{AllowedFilter, QueryDescriptor};
pub use error::FilterError;
pub use filter::Filter;
pub use filter_where::SqlBuilder;
pub use types::*;
