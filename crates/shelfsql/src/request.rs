//! Declarative query requests.
//!
//! A [`QueryRequest`] names the statement kind, the table and whichever of
//! projection, row, filter and pagination that kind uses:
//!
//! ```json
//! { "kind": "update",
//!   "table": "members",
//!   "row": { "name": "Tejas", "address": "Pune" },
//!   "where": { "id": { "op": "EQUALS", "value": 4 } } }
//! ```

use crate::builder::insert::render_insert;
use crate::builder::select::{Pagination, SelectParts, render_count, render_select};
use crate::builder::update::render_update;
use crate::builder::delete::render_delete;
use crate::config::GeneratorConfig;
use crate::error::{QueryError, QueryResult};
use crate::expr::WhereExpr;
use crate::statement::{CompiledStatement, QueryKind};
use crate::trace;
use crate::value::Row;
use serde::Deserialize;

/// One statement to generate, as accepted by [`QueryGenerator::generate`](crate::QueryGenerator::generate).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QueryRequest {
    #[serde(alias = "queryType")]
    pub kind: QueryKind,
    #[serde(alias = "tableName")]
    pub table: String,
    #[serde(default)]
    pub fields_to_select: Option<Vec<String>>,
    #[serde(default)]
    pub row: Option<Row>,
    #[serde(default, rename = "where", alias = "whereExpression")]
    pub where_expr: Option<WhereExpr>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl QueryRequest {
    pub fn new(kind: QueryKind, table: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            fields_to_select: None,
            row: None,
            where_expr: None,
            pagination: None,
        }
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields_to_select = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn row(mut self, row: Row) -> Self {
        self.row = Some(row);
        self
    }

    pub fn filter(mut self, expr: WhereExpr) -> Self {
        self.where_expr = Some(expr);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn from_json(json: &str) -> QueryResult<Self> {
        serde_json::from_str(json).map_err(|e| QueryError::invalid_request(e.to_string()))
    }

    /// Parse either a single request object or an array of them.
    pub fn from_json_many(json: &str) -> QueryResult<Vec<Self>> {
        let parsed = if json.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<QueryRequest>>(json)
        } else {
            serde_json::from_str::<QueryRequest>(json).map(|r| vec![r])
        };
        parsed.map_err(|e| QueryError::invalid_request(e.to_string()))
    }

    /// Reject fields that the statement kind would silently ignore.
    fn check_applicable(&self) -> QueryResult<()> {
        let present = [
            ("fieldsToSelect", self.fields_to_select.is_some()),
            ("row", self.row.is_some()),
            ("where", self.where_expr.is_some()),
            ("pagination", self.pagination.is_some()),
        ];
        let allowed: &[&str] = match self.kind {
            QueryKind::Select => &["fieldsToSelect", "where", "pagination"],
            QueryKind::Count => &["where"],
            QueryKind::Insert => &["row"],
            QueryKind::Update => &["row", "where"],
            QueryKind::Delete => &["where"],
        };
        match present
            .iter()
            .find(|(name, set)| *set && !allowed.contains(name))
        {
            Some((name, _)) => Err(QueryError::invalid_request(format!(
                "`{name}` does not apply to {} requests",
                self.kind
            ))),
            None => Ok(()),
        }
    }

    fn render(&self, config: &GeneratorConfig) -> QueryResult<CompiledStatement> {
        self.check_applicable()?;
        let filter = self.where_expr.as_ref();
        match self.kind {
            QueryKind::Select => {
                let parts = SelectParts {
                    table: &self.table,
                    fields: self.fields_to_select.as_deref().unwrap_or(&[]),
                    filter,
                    pagination: self.pagination.as_ref(),
                };
                render_select(parts, config, 0)
            }
            QueryKind::Count => render_count(&self.table, filter, config),
            QueryKind::Insert => match &self.row {
                Some(row) => render_insert(&self.table, row, config),
                None => Err(QueryError::EmptyRow {
                    table: self.table.clone(),
                }),
            },
            QueryKind::Update => {
                let empty = Row::new();
                let row = self.row.as_ref().unwrap_or(&empty);
                render_update(&self.table, row, filter, config)
            }
            QueryKind::Delete => render_delete(&self.table, filter, config),
        }
    }

    /// Dispatch to the builder for `kind`.
    pub fn build_with(&self, config: &GeneratorConfig) -> QueryResult<CompiledStatement> {
        let result = self.render(config);
        trace::record(self.kind, config, &result);
        result
    }
}
