//! SQL logging.
//!
//! With the `tracing` feature enabled, every built statement is emitted as a
//! DEBUG event on target `shelfsql.sql`, rejected builds included.
//! Without the feature [`record`] compiles to nothing.

use crate::config::GeneratorConfig;
use crate::error::QueryResult;
use crate::statement::{CompiledStatement, QueryKind};

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

#[cfg(feature = "tracing")]
pub(crate) fn record(
    kind: QueryKind,
    config: &GeneratorConfig,
    result: &QueryResult<CompiledStatement>,
) {
    match result {
        Ok(stmt) => tracing::debug!(
            target: "shelfsql.sql",
            kind = %kind,
            dialect = config.dialect.name(),
            param_count = stmt.values.len(),
            sql = %truncate_sql(&stmt.query, config.log_sql_max_len),
        ),
        Err(err) => tracing::debug!(
            target: "shelfsql.sql",
            kind = %kind,
            error = %err,
            "statement rejected",
        ),
    }
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub(crate) fn record(
    _kind: QueryKind,
    _config: &GeneratorConfig,
    _result: &QueryResult<CompiledStatement>,
) {
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation() {
        assert_eq!(truncate_sql("SELECT * FROM books", Some(10)), "SELECT * F...");
        assert_eq!(truncate_sql("SELECT 1", Some(10)), "SELECT 1");
        assert_eq!(truncate_sql("SELECT * FROM books", None), "SELECT * FROM books");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("héllo", 2), "h");
    }
}
