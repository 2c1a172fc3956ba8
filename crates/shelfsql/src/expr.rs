//! Filter expression trees.
//!
//! A [`WhereExpr`] is one of three shapes:
//!
//! - **Simple**: field name → [`Predicate`] entries, implicitly ANDed
//! - **And**: every child must hold
//! - **Or**: at least one child must hold
//!
//! The JSON form mirrors the shapes directly:
//!
//! ```json
//! { "AND": [
//!     { "OR": [
//!         { "author": { "op": "CONTAINS", "value": "Doe" } },
//!         { "copies": { "op": "GREATER_THAN_EQUALS", "value": 10 } }
//!     ] },
//!     { "publisher": { "op": "EQUALS", "value": "Penguin" } }
//! ] }
//! ```
//!
//! A JSON node that mixes `AND`, `OR` and field keys is rejected with
//! [`QueryError::MalformedExpression`].

use crate::builder::select::Pagination;
use crate::error::{QueryError, QueryResult};
use crate::value::Value;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;

/// Comparison operator of a [`Predicate`].
///
/// String fields use the equality, pattern and list operators; numeric fields
/// the equality, ordering and list operators; boolean fields only equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    NotEquals,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    Contains,
    NotContains,
    GreaterThan,
    GreaterThanEquals,
    LesserThan,
    LesserThanEquals,
    In,
    NotIn,
}

/// Where the `%` wildcard goes around a pattern operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wildcard {
    /// `value%`
    Trailing,
    /// `%value`
    Leading,
    /// `%value%`
    Both,
}

impl Wildcard {
    pub fn apply(self, value: &str) -> String {
        match self {
            Wildcard::Trailing => format!("{value}%"),
            Wildcard::Leading => format!("%{value}"),
            Wildcard::Both => format!("%{value}%"),
        }
    }
}

impl Operator {
    /// SQL fragment and operand wildcard for this operator.
    pub const fn lookup(self) -> (&'static str, Option<Wildcard>) {
        match self {
            Operator::Equals => ("=", None),
            Operator::NotEquals => ("!=", None),
            Operator::StartsWith => ("LIKE", Some(Wildcard::Trailing)),
            Operator::NotStartsWith => ("NOT LIKE", Some(Wildcard::Trailing)),
            Operator::EndsWith => ("LIKE", Some(Wildcard::Leading)),
            Operator::NotEndsWith => ("NOT LIKE", Some(Wildcard::Leading)),
            Operator::Contains => ("LIKE", Some(Wildcard::Both)),
            Operator::NotContains => ("NOT LIKE", Some(Wildcard::Both)),
            Operator::GreaterThan => (">", None),
            Operator::GreaterThanEquals => (">=", None),
            Operator::LesserThan => ("<", None),
            Operator::LesserThanEquals => ("<=", None),
            Operator::In => ("IN", None),
            Operator::NotIn => ("NOT IN", None),
        }
    }

    pub const fn sql(self) -> &'static str {
        self.lookup().0
    }

    pub const fn wildcard(self) -> Option<Wildcard> {
        self.lookup().1
    }

    /// Wire name, e.g. `GREATER_THAN_EQUALS`.
    pub const fn name(self) -> &'static str {
        match self {
            Operator::Equals => "EQUALS",
            Operator::NotEquals => "NOT_EQUALS",
            Operator::StartsWith => "STARTS_WITH",
            Operator::NotStartsWith => "NOT_STARTS_WITH",
            Operator::EndsWith => "ENDS_WITH",
            Operator::NotEndsWith => "NOT_ENDS_WITH",
            Operator::Contains => "CONTAINS",
            Operator::NotContains => "NOT_CONTAINS",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::GreaterThanEquals => "GREATER_THAN_EQUALS",
            Operator::LesserThan => "LESSER_THAN",
            Operator::LesserThanEquals => "LESSER_THAN_EQUALS",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
        }
    }

    /// `IN` / `NOT_IN`: the only operators taking a list or nested query.
    pub const fn is_vector(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    pub const fn is_ordering(self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::GreaterThanEquals
                | Operator::LesserThan
                | Operator::LesserThanEquals
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Right-hand side of a [`Predicate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A single value. [`Value::Null`] selects `IS` / `IS NOT` semantics.
    Scalar(Value),
    /// Values for `IN` / `NOT_IN`, bound in order.
    List(Vec<Value>),
    /// Sub-select for `IN` / `NOT_IN`.
    Subquery(Box<NestedQuery>),
}

impl Operand {
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Scalar(v) => v.kind(),
            Operand::List(_) => "list",
            Operand::Subquery(_) => "nested query",
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Scalar(v)
    }
}

struct OperandVisitor;

impl<'de> Visitor<'de> for OperandVisitor {
    type Value = Operand;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, null, an array of scalars or a nested query object")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Operand, E> {
        Ok(Operand::Scalar(Value::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Operand, E> {
        Ok(Operand::Scalar(Value::Null))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Operand, E> {
        Ok(Operand::Scalar(Value::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Operand, E> {
        Ok(Operand::Scalar(Value::Int(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Operand, E> {
        Ok(Operand::Scalar(Value::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Operand, E> {
        Ok(Operand::Scalar(Value::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Operand, E> {
        Ok(Operand::Scalar(Value::Text(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Operand, E> {
        Ok(Operand::Scalar(Value::Text(v)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Operand, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Operand::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Operand, A::Error> {
        let nested = NestedQuery::deserialize(de::value::MapAccessDeserializer::new(map))?;
        Ok(Operand::Subquery(Box::new(nested)))
    }
}

impl<'de> Deserialize<'de> for Operand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OperandVisitor)
    }
}

/// One `{op, value}` comparison against a field.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Predicate {
    pub op: Operator,
    pub value: Operand,
}

impl Predicate {
    pub fn new(op: Operator, value: Operand) -> Self {
        Self { op, value }
    }

    fn scalar(op: Operator, value: Value) -> Self {
        Self {
            op,
            value: Operand::Scalar(value),
        }
    }

    pub fn equals(v: impl Into<Value>) -> Self {
        Self::scalar(Operator::Equals, v.into())
    }

    pub fn not_equals(v: impl Into<Value>) -> Self {
        Self::scalar(Operator::NotEquals, v.into())
    }

    pub fn starts_with(v: impl Into<Value>) -> Self {
        Self::scalar(Operator::StartsWith, v.into())
    }

    pub fn not_starts_with(v: impl Into<Value>) -> Self {
        Self::scalar(Operator::NotStartsWith, v.into())
    }

    pub fn ends_with(v: impl Into<Value>) -> Self {
        Self::scalar(Operator::EndsWith, v.into())
    }

    pub fn not_ends_with(v: impl Into<Value>) -> Self {
        Self::scalar(Operator::NotEndsWith, v.into())
    }

    pub fn contains(v: impl Into<Value>) -> Self {
        Self::scalar(Operator::Contains, v.into())
    }

    pub fn not_contains(v: impl Into<Value>) -> Self {
        Self::scalar(Operator::NotContains, v.into())
    }

    pub fn greater_than(v: impl Into<Value>) -> Self {
        Self::scalar(Operator::GreaterThan, v.into())
    }

    pub fn greater_than_equals(v: impl Into<Value>) -> Self {
        Self::scalar(Operator::GreaterThanEquals, v.into())
    }

    pub fn lesser_than(v: impl Into<Value>) -> Self {
        Self::scalar(Operator::LesserThan, v.into())
    }

    pub fn lesser_than_equals(v: impl Into<Value>) -> Self {
        Self::scalar(Operator::LesserThanEquals, v.into())
    }

    /// `EQUALS null`, rendered `IS NULL`.
    pub fn is_null() -> Self {
        Self::scalar(Operator::Equals, Value::Null)
    }

    /// `NOT_EQUALS null`, rendered `IS NOT NULL`.
    pub fn is_not_null() -> Self {
        Self::scalar(Operator::NotEquals, Value::Null)
    }

    pub fn in_list<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            op: Operator::In,
            value: Operand::List(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn not_in<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            op: Operator::NotIn,
            value: Operand::List(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn in_query(query: NestedQuery) -> Self {
        Self {
            op: Operator::In,
            value: Operand::Subquery(Box::new(query)),
        }
    }

    pub fn not_in_query(query: NestedQuery) -> Self {
        Self {
            op: Operator::NotIn,
            value: Operand::Subquery(Box::new(query)),
        }
    }
}

/// Field → predicate entries, in insertion order, implicitly ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleExpr {
    fields: Vec<(String, Predicate)>,
}

impl SimpleExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field predicate (builder style).
    pub fn with(mut self, field: impl Into<String>, predicate: Predicate) -> Self {
        self.push(field, predicate);
        self
    }

    /// Add a field predicate. A repeated field replaces its earlier predicate.
    pub fn push(&mut self, field: impl Into<String>, predicate: Predicate) {
        let field = field.into();
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = predicate,
            None => self.fields.push((field, predicate)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.fields.iter().map(|(f, p)| (f.as_str(), p))
    }
}

/// Boolean filter tree compiled into a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereExpr {
    Simple(SimpleExpr),
    And(Vec<WhereExpr>),
    Or(Vec<WhereExpr>),
}

impl Default for WhereExpr {
    fn default() -> Self {
        WhereExpr::Simple(SimpleExpr::default())
    }
}

impl From<SimpleExpr> for WhereExpr {
    fn from(simple: SimpleExpr) -> Self {
        WhereExpr::Simple(simple)
    }
}

impl WhereExpr {
    /// Single-field simple expression.
    pub fn field(name: impl Into<String>, predicate: Predicate) -> Self {
        WhereExpr::Simple(SimpleExpr::new().with(name, predicate))
    }

    pub fn and(children: impl IntoIterator<Item = WhereExpr>) -> Self {
        WhereExpr::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = WhereExpr>) -> Self {
        WhereExpr::Or(children.into_iter().collect())
    }

    /// True when the expression contains no predicate at all.
    pub fn is_empty(&self) -> bool {
        match self {
            WhereExpr::Simple(simple) => simple.is_empty(),
            WhereExpr::And(children) | WhereExpr::Or(children) => {
                children.iter().all(WhereExpr::is_empty)
            }
        }
    }

    /// Parse the JSON form.
    pub fn from_json(json: &str) -> QueryResult<Self> {
        serde_json::from_str(json).map_err(|e| QueryError::malformed(e.to_string()))
    }

    /// Convert an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> QueryResult<Self> {
        serde_json::from_value(value).map_err(|e| QueryError::malformed(e.to_string()))
    }
}

#[derive(Clone, Copy)]
enum Group {
    And,
    Or,
}

struct WhereExprVisitor;

impl<'de> Visitor<'de> for WhereExprVisitor {
    type Value = WhereExpr;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with an AND key, an OR key, or field predicates")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<WhereExpr, A::Error> {
        let mut group: Option<(Group, Vec<WhereExpr>)> = None;
        let mut simple = SimpleExpr::new();

        while let Some(key) = map.next_key::<String>()? {
            let kind = match key.as_str() {
                "AND" => Some(Group::And),
                "OR" => Some(Group::Or),
                _ => None,
            };
            match kind {
                Some(kind) => {
                    if group.is_some() {
                        return Err(de::Error::custom(
                            "expression node has more than one AND/OR key",
                        ));
                    }
                    let children: Vec<WhereExpr> = map.next_value()?;
                    group = Some((kind, children));
                }
                None => {
                    let predicate: Predicate = map.next_value()?;
                    simple.push(key, predicate);
                }
            }
        }

        match group {
            Some(_) if !simple.is_empty() => Err(de::Error::custom(
                "expression node mixes AND/OR with field keys",
            )),
            Some((Group::And, children)) => Ok(WhereExpr::And(children)),
            Some((Group::Or, children)) => Ok(WhereExpr::Or(children)),
            None => Ok(WhereExpr::Simple(simple)),
        }
    }
}

impl<'de> Deserialize<'de> for WhereExpr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(WhereExprVisitor)
    }
}

/// Sub-select used as the right-hand side of `IN` / `NOT_IN`.
///
/// Compiles to `(SELECT <fields> FROM <table> [WHERE ...] [LIMIT ?] [OFFSET ?])`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NestedQuery {
    pub table_name: String,
    #[serde(default)]
    pub fields_to_select: Vec<String>,
    #[serde(default, alias = "where")]
    pub where_expression: Option<WhereExpr>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl NestedQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table_name: table.into(),
            fields_to_select: Vec::new(),
            where_expression: None,
            pagination: None,
        }
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields_to_select = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn filter(mut self, expr: WhereExpr) -> Self {
        self.where_expression = Some(expr);
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}
