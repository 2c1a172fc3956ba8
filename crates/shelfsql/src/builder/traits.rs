use crate::config::GeneratorConfig;
use crate::error::QueryResult;
use crate::statement::{CompiledStatement, QueryKind};
use crate::trace;

/// Base trait for statement builders.
pub trait SqlBuilder {
    /// Statement kind, used in logs.
    fn kind(&self) -> QueryKind;

    /// Render the statement. Does not log.
    fn render(&self, config: &GeneratorConfig) -> QueryResult<CompiledStatement>;

    /// Build against an explicit config.
    fn build_with(&self, config: &GeneratorConfig) -> QueryResult<CompiledStatement> {
        let result = self.render(config);
        trace::record(self.kind(), config, &result);
        result
    }

    /// Build with the default config (MySQL quoting).
    fn build(&self) -> QueryResult<CompiledStatement> {
        self.build_with(&GeneratorConfig::default())
    }

    /// Debug helper.
    fn to_sql(&self) -> QueryResult<String> {
        self.build().map(|stmt| stmt.query)
    }
}
