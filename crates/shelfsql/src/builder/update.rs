use super::traits::SqlBuilder;
use crate::compile::append_where;
use crate::config::GeneratorConfig;
use crate::error::{QueryError, QueryResult};
use crate::expr::WhereExpr;
use crate::ident::{plain_ident, quote_ident};
use crate::statement::{CompiledStatement, QueryKind};
use crate::value::{Row, Value};

/// `UPDATE <table> SET <col> = ?, ... WHERE ...`
///
/// A missing or empty filter is rejected rather than updating every row.
pub(crate) fn render_update(
    table: &str,
    row: &Row,
    filter: Option<&WhereExpr>,
    config: &GeneratorConfig,
) -> QueryResult<CompiledStatement> {
    let missing_where = || QueryError::MissingWhereClause {
        table: table.to_string(),
    };
    let filter = filter.ok_or_else(missing_where)?;
    if row.is_empty() {
        return Err(QueryError::EmptyRow {
            table: table.to_string(),
        });
    }
    let plain_table = plain_ident(table, config.dialect)?;

    let mut assignments = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());
    for (col, value) in row.iter() {
        assignments.push(format!("{} = ?", quote_ident(col, config.dialect)?));
        values.push(value.clone());
    }

    let mut stmt = CompiledStatement::new(
        format!("UPDATE {plain_table} SET {}", assignments.join(", ")),
        values,
    );
    if !append_where(&mut stmt, Some(filter), config, 0)? {
        return Err(missing_where());
    }
    Ok(stmt)
}

/// UPDATE builder. Building without a non-empty filter fails with
/// [`QueryError::MissingWhereClause`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBuilder {
    table: String,
    row: Row,
    filter: Option<WhereExpr>,
}

impl UpdateBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            row: Row::new(),
            filter: None,
        }
    }

    /// Set a column.
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

    /// Replace all SET columns.
    pub fn row(&mut self, row: Row) -> &mut Self {
        self.row = row;
        self
    }

    pub fn filter(&mut self, expr: WhereExpr) -> &mut Self {
        self.filter = Some(expr);
        self
    }
}

impl SqlBuilder for UpdateBuilder {
    fn kind(&self) -> QueryKind {
        QueryKind::Update
    }

    fn render(&self, config: &GeneratorConfig) -> QueryResult<CompiledStatement> {
        render_update(&self.table, &self.row, self.filter.as_ref(), config)
    }
}
