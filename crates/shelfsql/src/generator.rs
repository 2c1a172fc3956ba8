use crate::builder::delete::render_delete;
use crate::builder::insert::render_insert;
use crate::builder::select::{SelectConfig, SelectParts, render_count, render_select};
use crate::builder::update::render_update;
use crate::compile::WhereCompiler;
use crate::config::GeneratorConfig;
use crate::error::QueryResult;
use crate::expr::WhereExpr;
use crate::request::QueryRequest;
use crate::statement::{CompiledStatement, QueryKind};
use crate::trace;
use crate::value::Row;

/// Statement generator bound to one [`GeneratorConfig`].
///
/// Stateless apart from the config, so a single instance can be shared
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct QueryGenerator {
    config: GeneratorConfig,
}

impl QueryGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn logged(
        &self,
        kind: QueryKind,
        result: QueryResult<CompiledStatement>,
    ) -> QueryResult<CompiledStatement> {
        trace::record(kind, &self.config, &result);
        result
    }

    /// Compile a filter tree into a parenthesized boolean expression.
    ///
    /// An empty tree yields an empty statement.
    pub fn compile_where(&self, expr: &WhereExpr) -> QueryResult<CompiledStatement> {
        WhereCompiler::new(&self.config).compile(expr)
    }

    pub fn build_select(
        &self,
        table: &str,
        config: Option<&SelectConfig>,
    ) -> QueryResult<CompiledStatement> {
        let result = render_select(SelectParts::new(table, config), &self.config, 0);
        self.logged(QueryKind::Select, result)
    }

    pub fn build_count(
        &self,
        table: &str,
        filter: Option<&WhereExpr>,
    ) -> QueryResult<CompiledStatement> {
        let result = render_count(table, filter, &self.config);
        self.logged(QueryKind::Count, result)
    }

    pub fn build_insert(&self, table: &str, row: &Row) -> QueryResult<CompiledStatement> {
        let result = render_insert(table, row, &self.config);
        self.logged(QueryKind::Insert, result)
    }

    pub fn build_update(
        &self,
        table: &str,
        row: &Row,
        filter: Option<&WhereExpr>,
    ) -> QueryResult<CompiledStatement> {
        let result = render_update(table, row, filter, &self.config);
        self.logged(QueryKind::Update, result)
    }

    pub fn build_delete(
        &self,
        table: &str,
        filter: Option<&WhereExpr>,
    ) -> QueryResult<CompiledStatement> {
        let result = render_delete(table, filter, &self.config);
        self.logged(QueryKind::Delete, result)
    }

    /// Build whichever statement `request.kind` names.
    pub fn generate(&self, request: &QueryRequest) -> QueryResult<CompiledStatement> {
        request.build_with(&self.config)
    }
}
