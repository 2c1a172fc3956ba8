//! Compiled statement output.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL text plus the values for its `?` placeholders, in placeholder order.
///
/// The N-th `?` in `query` is bound to `values[N]`. Every builder and the
/// WHERE compiler preserve that alignment when they concatenate fragments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledStatement {
    pub query: String,
    pub values: Vec<Value>,
}

impl CompiledStatement {
    pub fn new(query: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            query: query.into(),
            values,
        }
    }

    /// True for an empty clause (e.g. a filter with no predicates).
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// Number of `?` in `query`. Identifiers never contain `?`, so each one
    /// is a placeholder.
    pub fn placeholder_count(&self) -> usize {
        placeholder_positions(&self.query).len()
    }

    /// Substitute each value as a literal. For logs and debugging only: the
    /// result must never be executed.
    pub fn to_inline_sql(&self) -> String {
        let positions = placeholder_positions(&self.query);
        let mut out = String::with_capacity(self.query.len() + self.values.len() * 8);
        let mut last = 0;
        for (pos, value) in positions.iter().zip(&self.values) {
            out.push_str(&self.query[last..*pos]);
            out.push_str(&value.to_sql_literal());
            last = pos + 1;
        }
        out.push_str(&self.query[last..]);
        out
    }
}

impl fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

/// Byte offsets of `?` placeholders.
fn placeholder_positions(sql: &str) -> Vec<usize> {
    sql.match_indices('?').map(|(i, _)| i).collect()
}

/// Statement kinds produced by the builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Select,
    Count,
    Insert,
    Update,
    Delete,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Select => "select",
            QueryKind::Count => "count",
            QueryKind::Insert => "insert",
            QueryKind::Update => "update",
            QueryKind::Delete => "delete",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_question_mark_counts() {
        let stmt = CompiledStatement::new(
            "SELECT * FROM `books` WHERE (`title` = ? AND `pages` > ?)",
            vec![Value::from("why?"), Value::Int(2)],
        );
        assert_eq!(stmt.placeholder_count(), 2);
        assert_eq!(stmt.query.matches('?').count(), stmt.values.len());
        assert_eq!(
            stmt.to_inline_sql(),
            "SELECT * FROM `books` WHERE (`title` = 'why?' AND `pages` > 2)"
        );
    }

    #[test]
    fn inline_sql_quotes_text() {
        let stmt = CompiledStatement::new(
            "INSERT INTO `books` (`title`, `pages`) VALUES (?, ?)",
            vec![Value::from("It's"), Value::from(100)],
        );
        assert_eq!(
            stmt.to_inline_sql(),
            "INSERT INTO `books` (`title`, `pages`) VALUES ('It''s', 100)"
        );
    }

    #[test]
    fn serializes_as_query_and_values() {
        let stmt = CompiledStatement::new("DELETE FROM books WHERE (`id` = ?)", vec![Value::Int(5)]);
        assert_eq!(
            serde_json::to_string(&stmt).unwrap(),
            r#"{"query":"DELETE FROM books WHERE (`id` = ?)","values":[5]}"#
        );
    }
}
