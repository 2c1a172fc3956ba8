use super::traits::SqlBuilder;
use crate::compile::append_where;
use crate::config::GeneratorConfig;
use crate::error::QueryResult;
use crate::expr::{NestedQuery, WhereExpr};
use crate::ident::{plain_ident, quote_ident};
use crate::statement::{CompiledStatement, QueryKind};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// LIMIT / OFFSET settings. Both are bound as values, never inlined.
///
/// MySQL rejects `OFFSET` without `LIMIT`; set `limit` whenever `offset` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pagination {
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl Pagination {
    pub fn new(offset: Option<u64>, limit: Option<u64>) -> Self {
        Self { offset, limit }
    }

    /// 1-based page of `per_page` rows.
    pub fn page(page: u64, per_page: u64) -> Self {
        Self {
            offset: Some(page.saturating_sub(1).saturating_mul(per_page)),
            limit: Some(per_page),
        }
    }
}

/// Options of a SELECT: projection, filter and pagination.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SelectConfig {
    /// Columns to return. Empty selects `*`.
    #[serde(default)]
    pub fields_to_select: Vec<String>,
    #[serde(default, rename = "where", alias = "whereExpression")]
    pub where_expr: Option<WhereExpr>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Borrowed view of everything needed to render a SELECT.
pub(crate) struct SelectParts<'a> {
    pub(crate) table: &'a str,
    pub(crate) fields: &'a [String],
    pub(crate) filter: Option<&'a WhereExpr>,
    pub(crate) pagination: Option<&'a Pagination>,
}

impl<'a> SelectParts<'a> {
    pub(crate) fn new(table: &'a str, config: Option<&'a SelectConfig>) -> Self {
        match config {
            Some(c) => Self {
                table,
                fields: &c.fields_to_select,
                filter: c.where_expr.as_ref(),
                pagination: c.pagination.as_ref(),
            },
            None => Self {
                table,
                fields: &[],
                filter: None,
                pagination: None,
            },
        }
    }

    pub(crate) fn from_nested(query: &'a NestedQuery) -> Self {
        Self {
            table: &query.table_name,
            fields: &query.fields_to_select,
            filter: query.where_expression.as_ref(),
            pagination: query.pagination.as_ref(),
        }
    }
}

/// `SELECT <fields> FROM <table> [WHERE ...] [LIMIT ?] [OFFSET ?]`
pub(crate) fn render_select(
    parts: SelectParts<'_>,
    config: &GeneratorConfig,
    depth: usize,
) -> QueryResult<CompiledStatement> {
    let table = quote_ident(parts.table, config.dialect)?;
    let projection = if parts.fields.is_empty() {
        "*".to_string()
    } else {
        parts
            .fields
            .iter()
            .map(|f| match f.as_str() {
                "*" => Ok("*".to_string()),
                name => quote_ident(name, config.dialect),
            })
            .collect::<QueryResult<Vec<_>>>()?
            .join(", ")
    };

    let mut stmt = CompiledStatement::new(format!("SELECT {projection} FROM {table}"), Vec::new());
    append_where(&mut stmt, parts.filter, config, depth)?;

    if let Some(pagination) = parts.pagination {
        if let Some(limit) = pagination.limit {
            stmt.query.push_str(" LIMIT ?");
            stmt.values.push(Value::from(limit));
        }
        if let Some(offset) = pagination.offset {
            stmt.query.push_str(" OFFSET ?");
            stmt.values.push(Value::from(offset));
        }
    }
    Ok(stmt)
}

/// `SELECT COUNT(*) AS <alias> FROM <table> [WHERE ...]`
pub(crate) fn render_count(
    table: &str,
    filter: Option<&WhereExpr>,
    config: &GeneratorConfig,
) -> QueryResult<CompiledStatement> {
    let table = plain_ident(table, config.dialect)?;
    let alias = quote_ident(&config.count_alias, config.dialect)?;
    let mut stmt =
        CompiledStatement::new(format!("SELECT COUNT(*) AS {alias} FROM {table}"), Vec::new());
    append_where(&mut stmt, filter, config, 0)?;
    Ok(stmt)
}

/// SELECT builder.
///
/// # Example
///
/// ```rust
/// use shelfsql::{Predicate, SelectBuilder, SqlBuilder, WhereExpr};
///
/// let mut qb = SelectBuilder::new("books");
/// qb.select_cols(&["title", "author"])
///     .filter(WhereExpr::field("author", Predicate::contains("Doe")))
///     .limit(10);
/// let stmt = qb.build().unwrap();
/// assert_eq!(
///     stmt.query,
///     "SELECT `title`, `author` FROM `books` WHERE (`author` LIKE ?) LIMIT ?"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectBuilder {
    table: String,
    fields: Vec<String>,
    filter: Option<WhereExpr>,
    pagination: Option<Pagination>,
}

impl SelectBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            fields: Vec::new(),
            filter: None,
            pagination: None,
        }
    }

    pub fn from_config(table: &str, config: SelectConfig) -> Self {
        Self {
            table: table.to_string(),
            fields: config.fields_to_select,
            filter: config.where_expr,
            pagination: config.pagination,
        }
    }

    /// Replace the projection.
    pub fn select_cols(&mut self, cols: &[&str]) -> &mut Self {
        self.fields = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn add_col(&mut self, col: &str) -> &mut Self {
        self.fields.push(col.to_string());
        self
    }

    pub fn filter(&mut self, expr: WhereExpr) -> &mut Self {
        self.filter = Some(expr);
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.pagination.get_or_insert_with(Pagination::default).limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.pagination.get_or_insert_with(Pagination::default).offset = Some(offset);
        self
    }

    /// 1-based page of `per_page` rows.
    pub fn paginate(&mut self, page: u64, per_page: u64) -> &mut Self {
        self.pagination = Some(Pagination::page(page, per_page));
        self
    }

    pub fn pagination(&mut self, pagination: Pagination) -> &mut Self {
        self.pagination = Some(pagination);
        self
    }

    /// Count of the rows this query filters, ignoring projection and pagination.
    pub fn count(&self) -> CountBuilder {
        CountBuilder {
            table: self.table.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl SqlBuilder for SelectBuilder {
    fn kind(&self) -> QueryKind {
        QueryKind::Select
    }

    fn render(&self, config: &GeneratorConfig) -> QueryResult<CompiledStatement> {
        let parts = SelectParts {
            table: &self.table,
            fields: &self.fields,
            filter: self.filter.as_ref(),
            pagination: self.pagination.as_ref(),
        };
        render_select(parts, config, 0)
    }
}

/// COUNT builder.
#[derive(Debug, Clone, PartialEq)]
pub struct CountBuilder {
    table: String,
    filter: Option<WhereExpr>,
}

impl CountBuilder {
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

impl SqlBuilder for CountBuilder {
    fn kind(&self) -> QueryKind {
        QueryKind::Count
    }

    fn render(&self, config: &GeneratorConfig) -> QueryResult<CompiledStatement> {
        render_count(&self.table, self.filter.as_ref(), config)
    }
}
