use super::traits::SqlBuilder;
use crate::config::GeneratorConfig;
use crate::error::{QueryError, QueryResult};
use crate::ident::quote_ident;
use crate::statement::{CompiledStatement, QueryKind};
use crate::value::{Row, Value};

/// `INSERT INTO <table> (<cols>) VALUES (?, ...)`
pub(crate) fn render_insert(
    table: &str,
    row: &Row,
    config: &GeneratorConfig,
) -> QueryResult<CompiledStatement> {
    if row.is_empty() {
        return Err(QueryError::EmptyRow {
            table: table.to_string(),
        });
    }
    let quoted_table = quote_ident(table, config.dialect)?;

    let mut cols = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());
    for (col, value) in row.iter() {
        cols.push(quote_ident(col, config.dialect)?);
        values.push(value.clone());
    }
    let placeholders = vec!["?"; values.len()].join(", ");

    Ok(CompiledStatement::new(
        format!(
            "INSERT INTO {quoted_table} ({}) VALUES ({placeholders})",
            cols.join(", ")
        ),
        values,
    ))
}

/// INSERT builder for a single row.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertBuilder {
    table: String,
    row: Row,
}

impl InsertBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            row: Row::new(),
        }
    }

    /// Set a column. Setting it again replaces the value in place.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.row.insert(column, value);
        self
    }

    /// Set an optional column (None => skip).
    pub fn set_opt<T: Into<Value>>(&mut self, column: &str, value: Option<T>) -> &mut Self {
        if let Some(v) = value {
            self.set(column, v);
        }
        self
    }

    /// Replace all columns.
    pub fn row(&mut self, row: Row) -> &mut Self {
        self.row = row;
        self
    }
}

impl SqlBuilder for InsertBuilder {
    fn kind(&self) -> QueryKind {
        QueryKind::Insert
    }

    fn render(&self, config: &GeneratorConfig) -> QueryResult<CompiledStatement> {
        render_insert(&self.table, &self.row, config)
    }
}
