//! # shelfsql
//!
//! Parameter-safe SQL statement generation from declarative filter trees.
//!
//! ## Features
//!
//! - **Filter trees**: nested `AND` / `OR` groups of field predicates, built in
//!   Rust or parsed from JSON
//! - **Placeholders only**: every value, including `LIMIT` / `OFFSET`, is bound
//!   through a positional `?`; identifiers are validated and quoted
//! - **Safe defaults**: UPDATE requires a non-empty filter
//! - **Optional logging**: enable the `tracing` feature to log built SQL
//!
//! ## Example
//!
//! ```rust
//! use shelfsql::{Predicate, WhereExpr, compile_where};
//!
//! let filter = WhereExpr::or([
//!     WhereExpr::field("author", Predicate::contains("Doe")),
//!     WhereExpr::field("copies", Predicate::greater_than_equals(10)),
//! ]);
//! let stmt = compile_where(&filter).unwrap();
//! assert_eq!(stmt.query, "((`author` LIKE ?) OR (`copies` >= ?))");
//! assert_eq!(stmt.values.len(), 2);
//! ```
//!
//! The same filter can come from JSON:
//!
//! ```rust
//! use shelfsql::{WhereExpr, build_delete};
//!
//! let filter = WhereExpr::from_json(r#"{"id": {"op": "EQUALS", "value": 5}}"#).unwrap();
//! let stmt = build_delete("books", Some(&filter)).unwrap();
//! assert_eq!(stmt.query, "DELETE FROM books WHERE (`id` = ?)");
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod expr;
pub mod ident;
pub mod request;
pub mod statement;
pub mod value;

mod compile;
mod generator;
mod trace;

pub use builder::{
    CountBuilder, DeleteBuilder, InsertBuilder, PageQuery, Pagination, SelectBuilder,
    SelectConfig, SqlBuilder, Table, UpdateBuilder,
};
pub use config::{Dialect, GeneratorConfig};
pub use error::{QueryError, QueryResult};
pub use expr::{NestedQuery, Operand, Operator, Predicate, SimpleExpr, WhereExpr, Wildcard};
pub use generator::QueryGenerator;
pub use ident::{Ident, IdentPart, quote_ident};
pub use request::QueryRequest;
pub use statement::{CompiledStatement, QueryKind};
pub use value::{Row, Value};

/// Compile a filter tree with the default config.
pub fn compile_where(expr: &WhereExpr) -> QueryResult<CompiledStatement> {
    QueryGenerator::default().compile_where(expr)
}

/// `SELECT` with the default config. `None` selects every column of every row.
pub fn build_select(table: &str, config: Option<&SelectConfig>) -> QueryResult<CompiledStatement> {
    QueryGenerator::default().build_select(table, config)
}

pub fn build_count(table: &str, filter: Option<&WhereExpr>) -> QueryResult<CompiledStatement> {
    QueryGenerator::default().build_count(table, filter)
}

pub fn build_insert(table: &str, row: &Row) -> QueryResult<CompiledStatement> {
    QueryGenerator::default().build_insert(table, row)
}

/// `UPDATE` with the default config. Fails without a non-empty filter.
pub fn build_update(
    table: &str,
    row: &Row,
    filter: Option<&WhereExpr>,
) -> QueryResult<CompiledStatement> {
    QueryGenerator::default().build_update(table, row, filter)
}

pub fn build_delete(table: &str, filter: Option<&WhereExpr>) -> QueryResult<CompiledStatement> {
    QueryGenerator::default().build_delete(table, filter)
}
