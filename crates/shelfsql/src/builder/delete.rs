use super::traits::SqlBuilder;
use crate::compile::append_where;
use crate::config::GeneratorConfig;
use crate::error::QueryResult;
use crate::expr::WhereExpr;
use crate::ident::plain_ident;
use crate::statement::{CompiledStatement, QueryKind};

/// `DELETE FROM <table> [WHERE ...]`
///
/// Unlike UPDATE, an absent or empty filter is allowed and deletes every row.
pub(crate) fn render_delete(
    table: &str,
    filter: Option<&WhereExpr>,
    config: &GeneratorConfig,
) -> QueryResult<CompiledStatement> {
    let table = plain_ident(table, config.dialect)?;
    let mut stmt = CompiledStatement::new(format!("DELETE FROM {table}"), Vec::new());
    append_where(&mut stmt, filter, config, 0)?;
    Ok(stmt)
}

/// DELETE builder.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteBuilder {
    table: String,
    filter: Option<WhereExpr>,
}

impl DeleteBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filter: None,
        }
    }

    pub fn filter(&mut self, expr: WhereExpr) -> &mut Self {
        self.filter = Some(expr);
        self
    }
}

impl SqlBuilder for DeleteBuilder {
    fn kind(&self) -> QueryKind {
        QueryKind::Delete
    }

    fn render(&self, config: &GeneratorConfig) -> QueryResult<CompiledStatement> {
        render_delete(&self.table, self.filter.as_ref(), config)
    }
}
