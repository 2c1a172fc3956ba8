//! WHERE clause compiler.
//!
//! Compiles a [`WhereExpr`] into a boolean SQL expression plus the values for
//! its `?` placeholders. Each call returns its own `(text, values)` pair and
//! the parent concatenates children in order, so value order always follows
//! placeholder order:
//!
//! - every simple expression and every AND/OR group is wrapped in parentheses
//! - nested-query values are spliced where the sub-select appears
//! - empty groups and empty simple expressions compile to an empty clause and
//!   are dropped by their parent

use crate::builder::select::{SelectParts, render_select};
use crate::config::GeneratorConfig;
use crate::error::{QueryError, QueryResult};
use crate::expr::{Operand, Operator, Predicate, SimpleExpr, WhereExpr};
use crate::ident::quote_ident;
use crate::statement::CompiledStatement;
use crate::value::Value;

pub(crate) struct WhereCompiler<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> WhereCompiler<'a> {
    pub(crate) fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    pub(crate) fn compile(&self, expr: &WhereExpr) -> QueryResult<CompiledStatement> {
        self.compile_at(expr, 0)
    }

    /// `depth` counts AND/OR levels and nested queries above `expr`.
    pub(crate) fn compile_at(&self, expr: &WhereExpr, depth: usize) -> QueryResult<CompiledStatement> {
        if depth > self.config.max_depth {
            return Err(QueryError::malformed(format!(
                "expression nesting exceeds {} levels",
                self.config.max_depth
            )));
        }
        match expr {
            WhereExpr::And(children) => self.compile_group(children, " AND ", depth),
            WhereExpr::Or(children) => self.compile_group(children, " OR ", depth),
            WhereExpr::Simple(simple) => self.compile_simple(simple, depth),
        }
    }

    fn compile_group(
        &self,
        children: &[WhereExpr],
        joiner: &str,
        depth: usize,
    ) -> QueryResult<CompiledStatement> {
        let mut parts = Vec::with_capacity(children.len());
        let mut values = Vec::new();
        for child in children {
            let compiled = self.compile_at(child, depth + 1)?;
            if compiled.is_empty() {
                continue;
            }
            parts.push(compiled.query);
            values.extend(compiled.values);
        }
        Ok(wrap(&parts, joiner, values))
    }

    fn compile_simple(&self, simple: &SimpleExpr, depth: usize) -> QueryResult<CompiledStatement> {
        let mut parts = Vec::with_capacity(simple.len());
        let mut values = Vec::new();
        for (field, predicate) in simple.iter() {
            let compiled = self.compile_predicate(field, predicate, depth)?;
            parts.push(compiled.query);
            values.extend(compiled.values);
        }
        Ok(wrap(&parts, " AND ", values))
    }

    fn compile_predicate(
        &self,
        field: &str,
        predicate: &Predicate,
        depth: usize,
    ) -> QueryResult<CompiledStatement> {
        let column = quote_ident(field, self.config.dialect)?;
        let op = predicate.op;

        match &predicate.value {
            Operand::Scalar(Value::Null) => {
                if op.is_vector() {
                    return Err(QueryError::mismatch(
                        field,
                        op.name(),
                        "expected a list or nested query, got null",
                    ));
                }
                let test = if op == Operator::Equals {
                    "IS NULL"
                } else {
                    "IS NOT NULL"
                };
                Ok(CompiledStatement::new(format!("{column} {test}"), Vec::new()))
            }
            Operand::Scalar(value) => compile_scalar(field, &column, op, value),
            Operand::List(items) => {
                if !op.is_vector() {
                    return Err(QueryError::mismatch(
                        field,
                        op.name(),
                        "list values require IN or NOT_IN",
                    ));
                }
                if items.is_empty() {
                    let always = if op == Operator::In { "1=0" } else { "1=1" };
                    return Ok(CompiledStatement::new(always, Vec::new()));
                }
                let placeholders = vec!["?"; items.len()].join(", ");
                Ok(CompiledStatement::new(
                    format!("{column} {} ({placeholders})", op.sql()),
                    items.clone(),
                ))
            }
            Operand::Subquery(nested) => {
                if !op.is_vector() {
                    return Err(QueryError::mismatch(
                        field,
                        op.name(),
                        "nested queries require IN or NOT_IN",
                    ));
                }
                let sub = render_select(SelectParts::from_nested(nested), self.config, depth + 1)?;
                Ok(CompiledStatement::new(
                    format!("{column} {} ({})", op.sql(), sub.query),
                    sub.values,
                ))
            }
        }
    }
}

fn compile_scalar(
    field: &str,
    column: &str,
    op: Operator,
    value: &Value,
) -> QueryResult<CompiledStatement> {
    if op.is_vector() {
        return Err(QueryError::mismatch(
            field,
            op.name(),
            format!("expected a list or nested query, got {}", value.kind()),
        ));
    }

    let (sql_op, wildcard) = op.lookup();
    let bound = match (wildcard, value) {
        (Some(wildcard), Value::Text(text)) => Value::Text(wildcard.apply(text)),
        (Some(_), other) => {
            return Err(QueryError::mismatch(
                field,
                op.name(),
                format!("pattern operators need a string, got {}", other.kind()),
            ));
        }
        (None, Value::Bool(_)) if op.is_ordering() => {
            return Err(QueryError::mismatch(
                field,
                op.name(),
                "booleans only support EQUALS and NOT_EQUALS",
            ));
        }
        (None, other) => other.clone(),
    };

    Ok(CompiledStatement::new(format!("{column} {sql_op} ?"), vec![bound]))
}

fn wrap(parts: &[String], joiner: &str, values: Vec<Value>) -> CompiledStatement {
    if parts.is_empty() {
        return CompiledStatement::default();
    }
    CompiledStatement::new(format!("({})", parts.join(joiner)), values)
}

/// Append ` WHERE <clause>` when `filter` compiles to a non-empty clause.
///
/// Returns whether a WHERE clause was written.
pub(crate) fn append_where(
    stmt: &mut CompiledStatement,
    filter: Option<&WhereExpr>,
    config: &GeneratorConfig,
    depth: usize,
) -> QueryResult<bool> {
    let Some(filter) = filter else {
        return Ok(false);
    };
    let clause = WhereCompiler::new(config).compile_at(filter, depth)?;
    if clause.is_empty() {
        return Ok(false);
    }
    stmt.query.push_str(" WHERE ");
    stmt.query.push_str(&clause.query);
    stmt.values.extend(clause.values);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dialect;
    use crate::expr::NestedQuery;

    fn compile(expr: &WhereExpr) -> QueryResult<CompiledStatement> {
        WhereCompiler::new(&GeneratorConfig::default()).compile(expr)
    }

    #[test]
    fn contains_wraps_value() {
        let stmt = compile(&WhereExpr::field("author", Predicate::contains("Doe"))).unwrap();
        assert_eq!(stmt.query, "(`author` LIKE ?)");
        assert_eq!(stmt.values, vec![Value::from("%Doe%")]);
    }

    #[test]
    fn pattern_wildcard_placement() {
        let cases = [
            (Predicate::starts_with("Do"), "LIKE", "Do%"),
            (Predicate::not_starts_with("Do"), "NOT LIKE", "Do%"),
            (Predicate::ends_with("oe"), "LIKE", "%oe"),
            (Predicate::not_ends_with("oe"), "NOT LIKE", "%oe"),
            (Predicate::contains("o"), "LIKE", "%o%"),
            (Predicate::not_contains("o"), "NOT LIKE", "%o%"),
        ];
        for (predicate, sql_op, bound) in cases {
            let stmt = compile(&WhereExpr::field("author", predicate)).unwrap();
            assert_eq!(stmt.query, format!("(`author` {sql_op} ?)"));
            assert_eq!(stmt.values, vec![Value::from(bound)]);
        }
    }

    #[test]
    fn comparison_operators() {
        let cases = [
            (Predicate::equals(1), "="),
            (Predicate::not_equals(1), "!="),
            (Predicate::greater_than(1), ">"),
            (Predicate::greater_than_equals(1), ">="),
            (Predicate::lesser_than(1), "<"),
            (Predicate::lesser_than_equals(1), "<="),
        ];
        for (predicate, sql_op) in cases {
            let stmt = compile(&WhereExpr::field("copies", predicate)).unwrap();
            assert_eq!(stmt.query, format!("(`copies` {sql_op} ?)"));
            assert_eq!(stmt.values, vec![Value::Int(1)]);
        }
    }

    #[test]
    fn or_of_simple_expressions() {
        let expr = WhereExpr::or([
            WhereExpr::field("author", Predicate::contains("Doe")),
            WhereExpr::field("copies", Predicate::greater_than_equals(10)),
        ]);
        let stmt = compile(&expr).unwrap();
        assert_eq!(stmt.query, "((`author` LIKE ?) OR (`copies` >= ?))");
        assert_eq!(stmt.values, vec![Value::from("%Doe%"), Value::Int(10)]);
    }

    #[test]
    fn or_nested_in_and_keeps_precedence() {
        let expr = WhereExpr::and([
            WhereExpr::or([
                WhereExpr::field("author", Predicate::contains("Doe")),
                WhereExpr::field("copies", Predicate::greater_than_equals(10)),
            ]),
            WhereExpr::field("publisher", Predicate::contains("Penguin UK")),
        ]);
        let stmt = compile(&expr).unwrap();
        assert_eq!(
            stmt.query,
            "(((`author` LIKE ?) OR (`copies` >= ?)) AND (`publisher` LIKE ?))"
        );
        assert_eq!(
            stmt.values,
            vec![Value::from("%Doe%"), Value::Int(10), Value::from("%Penguin UK%")]
        );
    }

    #[test]
    fn multiple_fields_are_anded_in_insertion_order() {
        let expr = WhereExpr::Simple(
            SimpleExpr::new()
                .with("name", Predicate::equals("Tejas"))
                .with("phoneNumber", Predicate::equals("9123456789")),
        );
        let stmt = compile(&expr).unwrap();
        assert_eq!(stmt.query, "(`name` = ? AND `phoneNumber` = ?)");
        assert_eq!(stmt.values, vec![Value::from("Tejas"), Value::from("9123456789")]);
    }

    #[test]
    fn null_semantics() {
        let stmt = compile(&WhereExpr::field("returnedAt", Predicate::is_null())).unwrap();
        assert_eq!(stmt.query, "(`returnedAt` IS NULL)");
        assert!(stmt.values.is_empty());

        let stmt = compile(&WhereExpr::field("returnedAt", Predicate::is_not_null())).unwrap();
        assert_eq!(stmt.query, "(`returnedAt` IS NOT NULL)");

        let stmt = compile(&WhereExpr::field(
            "returnedAt",
            Predicate::new(Operator::GreaterThan, Operand::Scalar(Value::Null)),
        ))
        .unwrap();
        assert_eq!(stmt.query, "(`returnedAt` IS NOT NULL)");
    }

    #[test]
    fn in_list_preserves_order() {
        let stmt = compile(&WhereExpr::field("id", Predicate::in_list([3, 1, 2]))).unwrap();
        assert_eq!(stmt.query, "(`id` IN (?, ?, ?))");
        assert_eq!(stmt.values, vec![Value::Int(3), Value::Int(1), Value::Int(2)]);

        let stmt = compile(&WhereExpr::field("id", Predicate::not_in([2, 2]))).unwrap();
        assert_eq!(stmt.query, "(`id` NOT IN (?, ?))");
        assert_eq!(stmt.values, vec![Value::Int(2), Value::Int(2)]);
    }

    #[test]
    fn empty_in_lists() {
        let stmt = compile(&WhereExpr::field("id", Predicate::in_list(Vec::<i64>::new()))).unwrap();
        assert_eq!(stmt.query, "(1=0)");
        let stmt = compile(&WhereExpr::field("id", Predicate::not_in(Vec::<i64>::new()))).unwrap();
        assert_eq!(stmt.query, "(1=1)");
        assert!(stmt.values.is_empty());
    }

    #[test]
    fn nested_query_values_are_spliced_in_position() {
        let expr = WhereExpr::Simple(
            SimpleExpr::new()
                .with("status", Predicate::equals("issued"))
                .with(
                    "memberId",
                    Predicate::in_query(
                        NestedQuery::new("members")
                            .fields(&["id"])
                            .filter(WhereExpr::field("name", Predicate::starts_with("Te"))),
                    ),
                )
                .with("bookId", Predicate::lesser_than(50)),
        );
        let stmt = compile(&expr).unwrap();
        assert_eq!(
            stmt.query,
            "(`status` = ? AND `memberId` IN (SELECT `id` FROM `members` WHERE (`name` LIKE ?)) AND `bookId` < ?)"
        );
        assert_eq!(
            stmt.values,
            vec![Value::from("issued"), Value::from("Te%"), Value::Int(50)]
        );
        assert_eq!(stmt.placeholder_count(), stmt.values.len());
    }

    #[test]
    fn empty_groups_compile_to_nothing() {
        assert!(compile(&WhereExpr::and([])).unwrap().is_empty());
        assert!(compile(&WhereExpr::or([WhereExpr::default()])).unwrap().is_empty());

        let expr = WhereExpr::and([
            WhereExpr::or([]),
            WhereExpr::field("id", Predicate::equals(1)),
        ]);
        assert_eq!(compile(&expr).unwrap().query, "((`id` = ?))");
    }

    #[test]
    fn vector_operator_with_scalar_is_mismatch() {
        let err = compile(&WhereExpr::field(
            "id",
            Predicate::new(Operator::In, Operand::Scalar(Value::Int(1))),
        ))
        .unwrap_err();
        assert!(err.is_mismatch());

        let err = compile(&WhereExpr::field(
            "id",
            Predicate::new(Operator::NotIn, Operand::Scalar(Value::Null)),
        ))
        .unwrap_err();
        assert!(err.is_mismatch());
    }

    #[test]
    fn list_with_scalar_operator_is_mismatch() {
        let err = compile(&WhereExpr::field(
            "id",
            Predicate::new(Operator::Equals, Operand::List(vec![Value::Int(1)])),
        ))
        .unwrap_err();
        assert!(err.is_mismatch());

        let err = compile(&WhereExpr::field(
            "id",
            Predicate::new(
                Operator::Equals,
                Operand::Subquery(Box::new(NestedQuery::new("members"))),
            ),
        ))
        .unwrap_err();
        assert!(err.is_mismatch());
    }

    #[test]
    fn pattern_on_number_and_ordering_on_bool_are_mismatches() {
        assert!(compile(&WhereExpr::field("copies", Predicate::contains(10)))
            .unwrap_err()
            .is_mismatch());
        assert!(compile(&WhereExpr::field("available", Predicate::greater_than(true)))
            .unwrap_err()
            .is_mismatch());
        assert!(compile(&WhereExpr::field("available", Predicate::not_equals(true))).is_ok());
    }

    #[test]
    fn a_bad_leaf_fails_the_whole_tree() {
        let expr = WhereExpr::or([
            WhereExpr::field("id", Predicate::equals(1)),
            WhereExpr::field("copies", Predicate::contains(10)),
        ]);
        assert!(compile(&expr).is_err());
    }

    #[test]
    fn invalid_column_is_rejected() {
        let err = compile(&WhereExpr::field("id` = 1 OR `x", Predicate::equals(1))).unwrap_err();
        assert!(matches!(err, QueryError::InvalidIdentifier(_)));
    }

    #[test]
    fn depth_limit() {
        let mut expr = WhereExpr::field("id", Predicate::equals(1));
        for _ in 0..5 {
            expr = WhereExpr::and([expr]);
        }
        let config = GeneratorConfig::default().max_depth(4);
        let err = WhereCompiler::new(&config).compile(&expr).unwrap_err();
        assert!(err.is_malformed());

        let config = GeneratorConfig::default().max_depth(5);
        assert!(WhereCompiler::new(&config).compile(&expr).is_ok());
    }

    #[test]
    fn ansi_dialect_quotes_columns() {
        let config = GeneratorConfig::default().dialect(Dialect::Ansi);
        let stmt = WhereCompiler::new(&config)
            .compile(&WhereExpr::field("title", Predicate::equals("T")))
            .unwrap();
        assert_eq!(stmt.query, "(\"title\" = ?)");
    }
}
