use super::delete::DeleteBuilder;
use super::insert::InsertBuilder;
use super::select::{CountBuilder, Pagination, SelectBuilder};
use super::traits::SqlBuilder;
use super::update::UpdateBuilder;
use crate::config::GeneratorConfig;
use crate::error::QueryResult;
use crate::expr::{Predicate, WhereExpr};
use crate::statement::CompiledStatement;
use crate::value::Value;

/// Table metadata helper.
///
/// Creates builders with a consistent default projection and id column.
///
/// # Example
///
/// ```rust
/// use shelfsql::{SqlBuilder, Table};
///
/// const BOOKS: Table = Table::new("books").with_select_cols(&["id", "title", "author"]);
///
/// let stmt = BOOKS.find_by_id(7).build().unwrap();
/// assert_eq!(
///     stmt.query,
///     "SELECT `id`, `title`, `author` FROM `books` WHERE (`id` = ?) LIMIT ?"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub name: &'static str,
    pub select_cols: &'static [&'static str],
    pub id_col: &'static str,
}

impl Table {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            select_cols: &[],
            id_col: "id",
        }
    }

    pub const fn with_select_cols(mut self, cols: &'static [&'static str]) -> Self {
        self.select_cols = cols;
        self
    }

    pub const fn with_id_col(mut self, col: &'static str) -> Self {
        self.id_col = col;
        self
    }

    pub fn select(&self) -> SelectBuilder {
        let mut qb = SelectBuilder::new(self.name);
        if !self.select_cols.is_empty() {
            qb.select_cols(self.select_cols);
        }
        qb
    }

    pub fn count(&self) -> CountBuilder {
        CountBuilder::new(self.name)
    }

    pub fn insert(&self) -> InsertBuilder {
        InsertBuilder::new(self.name)
    }

    pub fn update(&self) -> UpdateBuilder {
        UpdateBuilder::new(self.name)
    }

    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(self.name)
    }

    fn id_filter(&self, id: impl Into<Value>) -> WhereExpr {
        WhereExpr::field(self.id_col, Predicate::equals(id))
    }

    /// Single row by id (`LIMIT 1`).
    pub fn find_by_id(&self, id: impl Into<Value>) -> SelectBuilder {
        let mut qb = self.select();
        qb.filter(self.id_filter(id)).limit(1);
        qb
    }

    pub fn update_by_id(&self, id: impl Into<Value>) -> UpdateBuilder {
        let mut builder = self.update();
        builder.filter(self.id_filter(id));
        builder
    }

    pub fn delete_by_id(&self, id: impl Into<Value>) -> DeleteBuilder {
        let mut builder = self.delete();
        builder.filter(self.id_filter(id));
        builder
    }

    /// One page of rows plus the total count under the same filter.
    pub fn page(&self, filter: Option<WhereExpr>, pagination: Pagination) -> PageQuery {
        let mut items = self.select();
        items.pagination(pagination);
        if let Some(filter) = filter {
            items.filter(filter);
        }
        let total = items.count();
        PageQuery { items, total }
    }
}

/// Statement pair for paginated listings.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub items: SelectBuilder,
    pub total: CountBuilder,
}

impl PageQuery {
    /// Returns `(items, total)`.
    pub fn build_with(
        &self,
        config: &GeneratorConfig,
    ) -> QueryResult<(CompiledStatement, CompiledStatement)> {
        Ok((self.items.build_with(config)?, self.total.build_with(config)?))
    }

    pub fn build(&self) -> QueryResult<(CompiledStatement, CompiledStatement)> {
        self.build_with(&GeneratorConfig::default())
    }
}
