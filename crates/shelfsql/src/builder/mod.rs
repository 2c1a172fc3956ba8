//! Statement builders.
//!
//! Every builder renders one statement as a [`CompiledStatement`](crate::CompiledStatement): SQL text
//! with positional `?` placeholders plus the values to bind, in order.
//!
//! - Identifiers are validated and quoted; values are never inlined.
//! - UPDATE requires a non-empty filter; DELETE does not.
//! - INSERT and UPDATE reject an empty row.

pub mod delete;
pub mod insert;
pub mod select;
pub mod table;
pub mod traits;
pub mod update;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::{CountBuilder, Pagination, SelectBuilder, SelectConfig};
pub use table::{PageQuery, Table};
pub use traits::SqlBuilder;
pub use update::UpdateBuilder;
